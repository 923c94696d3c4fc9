//! In-memory ledger document and the sanction bookkeeping over it
use crate::error::SanctionError;
use crate::record::{Annulment, SanctionRecord, SanctionType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Top-level persisted state: one ledger per guild, lazily created.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerDocument {
    #[serde(default)]
    pub guilds: BTreeMap<String, GuildLedger>,
}

/// Ordered sequence of sanctions for one guild. Insertion order is the only
/// ordering and is what "most recent" means everywhere below.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuildLedger {
    #[serde(default)]
    pub sanctions: Vec<SanctionRecord>,
}

/// How an annulment request selects its target record. Selected by which
/// form fields the caller supplied, never by duplicated scan logic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Most recently appended active record of this type for this user.
    ByUserAndType {
        user_id: String,
        kind: SanctionType,
    },
    /// Most recently appended record carrying this ticket, any user.
    /// Duplicate tickets were never prevented upstream, so most recent wins.
    ByTicket { ticket: String },
}

impl LedgerDocument {
    pub fn guild(&self, guild_id: &str) -> Option<&GuildLedger> {
        self.guilds.get(guild_id)
    }

    pub fn guild_mut(&mut self, guild_id: &str) -> &mut GuildLedger {
        self.guilds.entry(guild_id.to_string()).or_default()
    }
}

impl GuildLedger {
    pub fn append(&mut self, record: SanctionRecord) {
        self.sanctions.push(record);
    }

    /// Active count is always recomputed from the record set, never cached.
    pub fn count_active(&self, user_id: &str, kind: SanctionType) -> usize {
        self.sanctions
            .iter()
            .filter(|s| s.active && s.user_id == user_id && s.kind == kind)
            .count()
    }

    pub fn active(&self) -> impl Iterator<Item = &SanctionRecord> {
        self.sanctions.iter().filter(|s| s.active)
    }

    pub fn active_for_user(&self, user_id: &str) -> Vec<&SanctionRecord> {
        self.active().filter(|s| s.user_id == user_id).collect()
    }

    /// Select the record an annulment request refers to, returning its
    /// position in the sequence.
    ///
    /// A ticket that only matches already-annulled records reports
    /// `AlreadyAnnulled` rather than `NotFound`, so a repeated annulment of
    /// the same record is answered accurately.
    pub fn resolve_annul_target(&self, resolution: &Resolution) -> Result<usize, SanctionError> {
        match resolution {
            Resolution::ByUserAndType { user_id, kind } => self
                .sanctions
                .iter()
                .rposition(|s| s.active && s.user_id == *user_id && s.kind == *kind)
                .ok_or(SanctionError::NotFound),
            Resolution::ByTicket { ticket } => {
                let matches_ticket =
                    |s: &SanctionRecord| s.ticket.as_deref() == Some(ticket.as_str());
                if let Some(idx) = self
                    .sanctions
                    .iter()
                    .rposition(|s| s.active && matches_ticket(s))
                {
                    return Ok(idx);
                }
                match self.sanctions.iter().rfind(|s| matches_ticket(s)) {
                    Some(annulled) => Err(SanctionError::AlreadyAnnulled(annulled.id.clone())),
                    None => Err(SanctionError::NotFound),
                }
            }
        }
    }

    /// Flip a record to annulled. At most one transition per record: a
    /// second attempt is rejected, never silently ignored.
    pub fn annul(&mut self, index: usize, annulment: Annulment) -> Result<(), SanctionError> {
        let record = self.sanctions.get_mut(index).ok_or(SanctionError::NotFound)?;
        if !record.active {
            return Err(SanctionError::AlreadyAnnulled(record.id.clone()));
        }
        record.active = false;
        record.annul = Some(annulment);
        Ok(())
    }

    pub fn progress(&self, user_id: &str, warn_limit: u32, strike_limit: u32) -> Progress {
        Progress {
            warns: self.count_active(user_id, SanctionType::Warn),
            strikes: self.count_active(user_id, SanctionType::Strike),
            warn_limit,
            strike_limit,
        }
    }
}

/// Read-only accumulation snapshot shown in every reply. Recomputed fresh
/// after each mutation; the strike limit is informational only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    pub warns: usize,
    pub strikes: usize,
    pub warn_limit: u32,
    pub strike_limit: u32,
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Warns {}/{} · Strikes {}/{}",
            self.warns, self.warn_limit, self.strikes, self.strike_limit
        )
    }
}
