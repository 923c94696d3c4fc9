//! Quick driver for the file-backed ledger: applies a few sanctions,
//! annuls one and prints the resulting reports.
//!
//! Run with `cargo run --example file_store`.

use sanction_ledger::config::Config;
use sanction_ledger::service::{AnnulRequest, SanctionRequest, SanctionService};
use sanction_ledger::store::JsonFileStore;

const GUILD: &str = "900000000000000001";
const TARGET: &str = "<@111222333444555666>";
const AUTHORIZER: &str = "222333444555666777";
const ISSUER: &str = "333444555666777888";

fn sanction(kind: &str, reason: &str, ticket: Option<&str>) -> SanctionRequest {
    SanctionRequest {
        target: TARGET.to_string(),
        target_tag: Some("troublemaker#0001".to_string()),
        kind: kind.to_string(),
        reason: reason.to_string(),
        authorizer: AUTHORIZER.to_string(),
        authorizer_tag: Some("lead#0001".to_string()),
        issuer_id: ISSUER.to_string(),
        issuer_tag: "mod#0002".to_string(),
        ticket: ticket.map(str::to_string),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();

    let dir = std::env::temp_dir().join("sanction-ledger-demo");
    let store = JsonFileStore::new(dir.join("sanctions.json"));
    let service = SanctionService::new(store, Config::default());

    // three warns: the third crosses the default limit and escalates
    for (i, reason) in ["spam", "spam again", "still spamming"].iter().enumerate() {
        let outcome = service.apply_sanction(GUILD, sanction("warn", reason, None))?;
        println!(
            "warn {} -> id {} | {}{}",
            i + 1,
            outcome.record.id,
            outcome.progress,
            match &outcome.escalation {
                Some(strike) => format!(" | auto strike {}", strike.id),
                None => String::new(),
            }
        );
    }

    let outcome = service.apply_sanction(GUILD, sanction("s", "ban evasion", Some("T-1042")))?;
    println!("strike -> id {} | {}", outcome.record.id, outcome.progress);

    let annulled = service.annul_sanction(
        GUILD,
        AnnulRequest {
            target: None,
            kind: None,
            ticket: Some("T-1042".to_string()),
            reason: "appeal accepted".to_string(),
            authorizer: AUTHORIZER.to_string(),
            authorizer_tag: Some("lead#0001".to_string()),
            actor_id: ISSUER.to_string(),
            actor_tag: "mod#0002".to_string(),
        },
    )?;
    println!("annulled {} | {}", annulled.record.id, annulled.progress);

    let report = service.search_user(GUILD, TARGET)?;
    println!("\n{} ({}) | {}", report.user_tag, report.user_id, report.progress);
    for record in &report.records {
        println!(
            "  {} | {} | {}{}",
            record.kind,
            record.reason,
            record.id,
            match &record.ticket {
                Some(t) => format!(" | ticket {t}"),
                None => String::new(),
            }
        );
    }

    Ok(())
}
