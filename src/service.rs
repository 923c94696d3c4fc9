//! Service layer API for sanction workflow operations
use crate::config::Config;
use crate::error::SanctionError;
use crate::escalation::EscalationPolicy;
use crate::ledger::{GuildLedger, LedgerDocument, Progress, Resolution};
use crate::record::{Annulment, SanctionRecord, SanctionType};
use crate::store::JsonFileStore;
use crate::utils::{extract_user_id, new_sanction_id};
use chrono::Utc;
use tracing::{error, info};

/// Guild-scoped sanction operations behind one surface. Every operation is
/// a fresh load → mutate → save cycle over the whole document; no document
/// state is held between requests.
pub struct SanctionService {
    store: JsonFileStore,
    config: Config,
}

/// Raw form fields for applying a sanction, exactly as the platform handed
/// them over. User and authorizer references are mention-or-id text; tags
/// are the display names the router already resolved, when it did.
#[derive(Debug, Clone)]
pub struct SanctionRequest {
    pub target: String,
    pub target_tag: Option<String>,
    pub kind: String,
    pub reason: String,
    pub authorizer: String,
    pub authorizer_tag: Option<String>,
    pub issuer_id: String,
    pub issuer_tag: String,
    pub ticket: Option<String>,
}

/// Raw form fields for an annulment. Which fields were filled in selects
/// the resolution strategy: user + type, or ticket alone.
#[derive(Debug, Clone)]
pub struct AnnulRequest {
    pub target: Option<String>,
    pub kind: Option<String>,
    pub ticket: Option<String>,
    pub reason: String,
    pub authorizer: String,
    pub authorizer_tag: Option<String>,
    pub actor_id: String,
    pub actor_tag: String,
}

#[derive(Debug, Clone)]
pub struct SanctionOutcome {
    pub record: SanctionRecord,
    /// The automatic strike, when this warn crossed the limit.
    pub escalation: Option<SanctionRecord>,
    pub progress: Progress,
    /// False when the save failed and the lenient persistence policy kept
    /// the in-memory result anyway.
    pub persisted: bool,
}

#[derive(Debug, Clone)]
pub struct AnnulOutcome {
    pub record: SanctionRecord,
    pub progress: Progress,
    pub persisted: bool,
}

/// Active sanctions and accumulation for one user.
#[derive(Debug, Clone)]
pub struct UserReport {
    pub user_id: String,
    pub user_tag: String,
    pub records: Vec<SanctionRecord>,
    pub progress: Progress,
}

/// Guild-wide view: every active sanction grouped by user, in order of each
/// user's first appearance in the ledger.
#[derive(Debug, Clone)]
pub struct GuildReport {
    pub users: Vec<UserReport>,
    pub total_active: usize,
}

impl SanctionService {
    pub fn new(store: JsonFileStore, config: Config) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Validate the form fields, append the sanction, run escalation and
    /// persist. Escalation only ever fires here, driven by the warn count
    /// after this single append.
    pub fn apply_sanction(
        &self,
        guild_id: &str,
        request: SanctionRequest,
    ) -> Result<SanctionOutcome, SanctionError> {
        let user_id = extract_user_id(&request.target)
            .ok_or_else(|| SanctionError::InvalidUser(request.target.clone()))?;
        let authorized_by_id = extract_user_id(&request.authorizer)
            .ok_or_else(|| SanctionError::InvalidUser(request.authorizer.clone()))?;
        let kind = SanctionType::parse(&request.kind)
            .ok_or_else(|| SanctionError::InvalidType(request.kind.clone()))?;
        let ticket = clean_ticket(request.ticket);

        let user_tag = request.target_tag.unwrap_or_else(|| user_id.clone());
        let authorized_by_tag = request
            .authorizer_tag
            .unwrap_or_else(|| authorized_by_id.clone());

        let mut doc = self.store.load();
        let ledger = doc.guild_mut(guild_id);

        let record = SanctionRecord {
            id: new_sanction_id(),
            user_id: user_id.clone(),
            user_tag: user_tag.clone(),
            kind,
            reason: request.reason,
            authorized_by_id: authorized_by_id.clone(),
            authorized_by_tag: authorized_by_tag.clone(),
            issued_by_id: request.issuer_id.clone(),
            issued_by_tag: request.issuer_tag.clone(),
            created_at: Utc::now(),
            active: true,
            ticket: ticket.clone(),
            annul: None,
        };
        ledger.append(record.clone());

        let mut escalation = None;
        if kind == SanctionType::Warn {
            let policy = EscalationPolicy::new(self.config.limits.warns);
            let warns = ledger.count_active(&user_id, SanctionType::Warn);
            if policy.should_escalate(warns) {
                let strike = SanctionRecord {
                    id: new_sanction_id(),
                    user_id: user_id.clone(),
                    user_tag,
                    kind: SanctionType::Strike,
                    reason: policy.synthesized_reason(warns),
                    authorized_by_id,
                    authorized_by_tag,
                    issued_by_id: request.issuer_id,
                    issued_by_tag: request.issuer_tag,
                    created_at: Utc::now(),
                    active: true,
                    ticket,
                    annul: None,
                };
                info!(guild = guild_id, user = %user_id, warns, "warn limit crossed, issuing automatic strike");
                ledger.append(strike.clone());
                escalation = Some(strike);
            }
        }

        let progress = ledger.progress(&user_id, self.config.limits.warns, self.config.limits.strikes);
        let persisted = self.commit(&doc)?;

        Ok(SanctionOutcome {
            record,
            escalation,
            progress,
            persisted,
        })
    }

    /// Resolve the target record from whichever fields the form supplied,
    /// flip it to annulled and persist.
    pub fn annul_sanction(
        &self,
        guild_id: &str,
        request: AnnulRequest,
    ) -> Result<AnnulOutcome, SanctionError> {
        let authorized_by_id = extract_user_id(&request.authorizer)
            .ok_or_else(|| SanctionError::InvalidUser(request.authorizer.clone()))?;
        let authorized_by_tag = request
            .authorizer_tag
            .unwrap_or_else(|| authorized_by_id.clone());
        let ticket = clean_ticket(request.ticket);

        let resolution = match (&request.target, ticket.as_ref()) {
            (Some(target), _) => {
                let user_id = extract_user_id(target)
                    .ok_or_else(|| SanctionError::InvalidUser(target.clone()))?;
                let kind_text = request.kind.as_deref().unwrap_or_default();
                let kind = SanctionType::parse(kind_text)
                    .ok_or_else(|| SanctionError::InvalidType(kind_text.to_string()))?;
                Resolution::ByUserAndType { user_id, kind }
            }
            (None, Some(ticket)) => Resolution::ByTicket {
                ticket: ticket.clone(),
            },
            (None, None) => return Err(SanctionError::InvalidUser(String::new())),
        };

        let mut doc = self.store.load();
        let ledger = doc.guild_mut(guild_id);

        let index = ledger.resolve_annul_target(&resolution)?;
        ledger.annul(
            index,
            Annulment {
                reason: request.reason,
                authorized_by_id,
                authorized_by_tag,
                by_id: request.actor_id,
                by_tag: request.actor_tag,
                at: Utc::now(),
                ticket,
            },
        )?;

        let record = ledger.sanctions[index].clone();
        let progress = ledger.progress(
            &record.user_id,
            self.config.limits.warns,
            self.config.limits.strikes,
        );
        let persisted = self.commit(&doc)?;

        Ok(AnnulOutcome {
            record,
            progress,
            persisted,
        })
    }

    /// Active sanctions of one user plus their accumulation, for the search
    /// form. Read-only; nothing is persisted.
    pub fn search_user(&self, guild_id: &str, user_text: &str) -> Result<UserReport, SanctionError> {
        let user_id = extract_user_id(user_text)
            .ok_or_else(|| SanctionError::InvalidUser(user_text.to_string()))?;

        let doc = self.store.load();
        let empty = GuildLedger::default();
        let ledger = doc.guild(guild_id).unwrap_or(&empty);

        Ok(self.report_for(ledger_records(ledger, &user_id), &user_id, ledger))
    }

    /// Every active sanction in the guild, grouped by user in order of each
    /// user's first appearance.
    pub fn list_active(&self, guild_id: &str) -> GuildReport {
        let doc = self.store.load();
        let empty = GuildLedger::default();
        let ledger = doc.guild(guild_id).unwrap_or(&empty);

        let mut users: Vec<UserReport> = Vec::new();
        let mut total_active = 0;
        for record in ledger.active() {
            total_active += 1;
            if !users.iter().any(|u| u.user_id == record.user_id) {
                let records = ledger_records(ledger, &record.user_id);
                users.push(self.report_for(records, &record.user_id, ledger));
            }
        }
        GuildReport { users, total_active }
    }

    fn report_for(
        &self,
        records: Vec<SanctionRecord>,
        user_id: &str,
        ledger: &GuildLedger,
    ) -> UserReport {
        let user_tag = records
            .last()
            .map(|r| r.user_tag.clone())
            .unwrap_or_else(|| user_id.to_string());
        UserReport {
            user_id: user_id.to_string(),
            user_tag,
            records,
            progress: ledger.progress(user_id, self.config.limits.warns, self.config.limits.strikes),
        }
    }

    /// The mutation is committed in memory before the save; what a failed
    /// save means for the caller is the configured persistence policy.
    fn commit(&self, doc: &LedgerDocument) -> Result<bool, SanctionError> {
        match self.store.save(doc) {
            Ok(()) => Ok(true),
            Err(err) => {
                error!(path = %self.store.path().display(), error = %err, "failed to persist ledger document");
                if self.config.strict_persistence {
                    Err(SanctionError::PersistenceFailed)
                } else {
                    Ok(false)
                }
            }
        }
    }
}

fn ledger_records(ledger: &GuildLedger, user_id: &str) -> Vec<SanctionRecord> {
    ledger
        .active_for_user(user_id)
        .into_iter()
        .cloned()
        .collect()
}

// empty-after-trim tickets are treated as not supplied
fn clean_ticket(ticket: Option<String>) -> Option<String> {
    ticket
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}
