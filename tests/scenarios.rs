//! End-to-end sanction workflow scenarios against a file-backed ledger

use anyhow::Context;
use sanction_ledger::config::Config;
use sanction_ledger::error::SanctionError;
use sanction_ledger::record::SanctionType;
use sanction_ledger::service::{AnnulRequest, SanctionRequest, SanctionService};
use sanction_ledger::store::JsonFileStore;
use tempfile::tempdir;

const GUILD: &str = "900000000000000001";
const USER_42: &str = "111222333444555666";
const AUTHORIZER: &str = "222333444555666777";
const ISSUER: &str = "333444555666777888";

fn warn_request(reason: &str, ticket: Option<&str>) -> SanctionRequest {
    SanctionRequest {
        // mention text, the way the form delivers it
        target: format!("<@{USER_42}>"),
        target_tag: Some("u42#0042".to_string()),
        kind: "warn".to_string(),
        reason: reason.to_string(),
        authorizer: AUTHORIZER.to_string(),
        authorizer_tag: Some("lead#0001".to_string()),
        issuer_id: ISSUER.to_string(),
        issuer_tag: "mod#0002".to_string(),
        ticket: ticket.map(str::to_string),
    }
}

fn annul_by_ticket(ticket: &str) -> AnnulRequest {
    AnnulRequest {
        target: None,
        kind: None,
        ticket: Some(ticket.to_string()),
        reason: "appeal accepted".to_string(),
        authorizer: AUTHORIZER.to_string(),
        authorizer_tag: Some("lead#0001".to_string()),
        actor_id: ISSUER.to_string(),
        actor_tag: "mod#0002".to_string(),
    }
}

fn annul_by_type(kind: &str) -> AnnulRequest {
    AnnulRequest {
        target: Some(USER_42.to_string()),
        kind: Some(kind.to_string()),
        ticket: None,
        reason: "appeal accepted".to_string(),
        authorizer: AUTHORIZER.to_string(),
        authorizer_tag: Some("lead#0001".to_string()),
        actor_id: ISSUER.to_string(),
        actor_tag: "mod#0002".to_string(),
    }
}

#[test]
fn third_warn_escalates_to_exactly_one_strike() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let store = JsonFileStore::new(dir.path().join("sanctions.json"));
    let service = SanctionService::new(store, Config::default());

    let first = service
        .apply_sanction(GUILD, warn_request("R1", None))
        .context("first warn failed")?;
    assert!(first.escalation.is_none());

    let second = service
        .apply_sanction(GUILD, warn_request("R2", Some("T-2")))
        .context("second warn failed")?;
    assert!(second.escalation.is_none());

    let third = service
        .apply_sanction(GUILD, warn_request("R3", None))
        .context("third warn failed")?;

    let strike = third.escalation.as_ref().expect("third warn must escalate");
    assert_eq!(strike.kind, SanctionType::Strike);
    assert!(strike.reason.contains("Automatic strike"));
    assert_eq!(strike.issued_by_id, ISSUER);

    assert_eq!(third.progress.to_string(), "Warns 3/3 · Strikes 1/7");

    // 3 warns + 1 automatic strike, all active
    let report = service.search_user(GUILD, USER_42)?;
    assert_eq!(report.records.len(), 4);
    assert!(report.records.iter().all(|r| r.active));
    Ok(())
}

#[test]
fn sixth_warn_escalates_again_without_resetting_warns() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let store = JsonFileStore::new(dir.path().join("sanctions.json"));
    let service = SanctionService::new(store, Config::default());

    let mut strikes = 0;
    for i in 1..=6 {
        let outcome = service.apply_sanction(GUILD, warn_request(&format!("R{i}"), None))?;
        if outcome.escalation.is_some() {
            strikes += 1;
        }
    }

    assert_eq!(strikes, 2); // fired at 3 and at 6
    let report = service.search_user(GUILD, USER_42)?;
    assert_eq!(report.progress.warns, 6);
    assert_eq!(report.progress.strikes, 2);
    Ok(())
}

#[test]
fn annulling_the_second_warn_and_repeating_is_rejected() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let store = JsonFileStore::new(dir.path().join("sanctions.json"));
    let service = SanctionService::new(store, Config::default());

    service.apply_sanction(GUILD, warn_request("R1", None))?;
    service.apply_sanction(GUILD, warn_request("R2", Some("T-2")))?;
    service.apply_sanction(GUILD, warn_request("R3", None))?;

    // address the second warn through its ticket
    let annulled = service.annul_sanction(GUILD, annul_by_ticket("T-2"))?;
    assert_eq!(annulled.record.reason, "R2");
    assert_eq!(annulled.progress.warns, 2);
    assert_eq!(annulled.progress.strikes, 1); // the auto strike stays

    let err = service
        .annul_sanction(GUILD, annul_by_ticket("T-2"))
        .unwrap_err();
    assert!(matches!(err, SanctionError::AlreadyAnnulled(_)));
    Ok(())
}

#[test]
fn annul_by_type_takes_the_most_recent_active_warn() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let store = JsonFileStore::new(dir.path().join("sanctions.json"));
    let service = SanctionService::new(store, Config::default());

    service.apply_sanction(GUILD, warn_request("old", None))?;
    service.apply_sanction(GUILD, warn_request("newer", None))?;

    let annulled = service.annul_sanction(GUILD, annul_by_type("w"))?;
    assert_eq!(annulled.record.reason, "newer");

    // repeating the request now resolves the remaining warn
    let annulled = service.annul_sanction(GUILD, annul_by_type("warn"))?;
    assert_eq!(annulled.record.reason, "old");

    let err = service.annul_sanction(GUILD, annul_by_type("warn")).unwrap_err();
    assert_eq!(err, SanctionError::NotFound);
    Ok(())
}

#[test]
fn ledger_survives_a_restart_in_order() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("sanctions.json");

    {
        let service = SanctionService::new(JsonFileStore::new(&path), Config::default());
        service.apply_sanction(GUILD, warn_request("R1", None))?;
        service.apply_sanction(GUILD, warn_request("R2", Some("T-2")))?;
    }

    // a fresh service over the same file sees the same sequence
    let service = SanctionService::new(JsonFileStore::new(&path), Config::default());
    let report = service.search_user(GUILD, USER_42)?;
    assert_eq!(report.records.len(), 2);
    assert_eq!(report.records[0].reason, "R1");
    assert_eq!(report.records[0].ticket, None);
    assert_eq!(report.records[1].ticket.as_deref(), Some("T-2"));

    // "most recent" still means what it meant before the restart
    let annulled = service.annul_sanction(GUILD, annul_by_type("warn"))?;
    assert_eq!(annulled.record.reason, "R2");
    Ok(())
}

#[test]
fn validation_failures_mutate_nothing() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let store = JsonFileStore::new(dir.path().join("sanctions.json"));
    let service = SanctionService::new(store, Config::default());

    let mut bad_user = warn_request("R1", None);
    bad_user.target = "not a user".to_string();
    assert!(matches!(
        service.apply_sanction(GUILD, bad_user).unwrap_err(),
        SanctionError::InvalidUser(_)
    ));

    let mut bad_type = warn_request("R1", None);
    bad_type.kind = "warning".to_string(); // prefix spellings are not accepted
    assert!(matches!(
        service.apply_sanction(GUILD, bad_type).unwrap_err(),
        SanctionError::InvalidType(_)
    ));

    assert!(matches!(
        service.annul_sanction(GUILD, annul_by_type("warn")).unwrap_err(),
        SanctionError::NotFound
    ));

    let report = service.search_user(GUILD, USER_42)?;
    assert!(report.records.is_empty());
    Ok(())
}

#[test]
fn list_groups_active_sanctions_by_user() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let store = JsonFileStore::new(dir.path().join("sanctions.json"));
    let service = SanctionService::new(store, Config::default());

    let other = "999888777666555444";
    service.apply_sanction(GUILD, warn_request("R1", None))?;
    let mut for_other = warn_request("R2", None);
    for_other.target = other.to_string();
    for_other.target_tag = Some("other#0009".to_string());
    service.apply_sanction(GUILD, for_other)?;
    service.apply_sanction(GUILD, warn_request("R3", None))?;

    let report = service.list_active(GUILD);
    assert_eq!(report.total_active, 3);
    assert_eq!(report.users.len(), 2);
    // grouped in first-appearance order
    assert_eq!(report.users[0].user_id, USER_42);
    assert_eq!(report.users[0].records.len(), 2);
    assert_eq!(report.users[1].user_id, other);
    Ok(())
}

#[test]
fn persistence_policy_decides_how_save_failures_surface() -> anyhow::Result<()> {
    let dir = tempdir()?;
    // a plain file where the store expects a parent directory
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "in the way")?;
    let path = blocker.join("sanctions.json");

    let lenient = SanctionService::new(JsonFileStore::new(&path), Config::default());
    let outcome = lenient.apply_sanction(GUILD, warn_request("R1", None))?;
    assert!(!outcome.persisted); // mutation kept, failure only logged

    let strict = SanctionService::new(
        JsonFileStore::new(&path),
        Config {
            strict_persistence: true,
            ..Config::default()
        },
    );
    let err = strict.apply_sanction(GUILD, warn_request("R1", None)).unwrap_err();
    assert_eq!(err, SanctionError::PersistenceFailed);
    Ok(())
}
