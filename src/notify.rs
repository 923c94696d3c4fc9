//! Best-effort user notification with channel fallback
use crate::ledger::Progress;
use crate::record::{SanctionRecord, SanctionType};
use tracing::{error, warn};

/// What a notice announces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Sanction,
    Annulment,
}

/// Render-ready payload for one notification. Carries everything a
/// transport needs so the delivery layer never reaches back into the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub sanction_type: SanctionType,
    pub record_id: String,
    pub user_id: String,
    pub user_tag: String,
    pub reason: String,
    pub authorized_by_tag: String,
    pub progress: String,
    pub ticket: Option<String>,
}

impl Notice {
    pub fn sanction(record: &SanctionRecord, progress: &Progress) -> Self {
        Self::build(NoticeKind::Sanction, record, record.reason.clone(), progress)
    }

    /// Annulment notices carry the annulment reason, not the original one.
    pub fn annulment(record: &SanctionRecord, progress: &Progress) -> Self {
        let reason = record
            .annul
            .as_ref()
            .map(|a| a.reason.clone())
            .unwrap_or_default();
        Self::build(NoticeKind::Annulment, record, reason, progress)
    }

    fn build(kind: NoticeKind, record: &SanctionRecord, reason: String, progress: &Progress) -> Self {
        Self {
            kind,
            sanction_type: record.kind,
            record_id: record.id.clone(),
            user_id: record.user_id.clone(),
            user_tag: record.user_tag.clone(),
            reason,
            authorized_by_tag: record.authorized_by_tag.clone(),
            progress: progress.to_string(),
            ticket: record.ticket.clone(),
        }
    }
}

/// Transport seam. The real implementation talks to the chat platform;
/// tests substitute a recorder.
pub trait Notifier {
    fn send_direct(&self, user_id: &str, notice: &Notice) -> anyhow::Result<()>;
    fn send_channel(&self, channel_id: &str, notice: &Notice) -> anyhow::Result<()>;
}

/// How a notice ended up being delivered, reported back as a secondary
/// annotation on the reply. Never affects the committed ledger mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Direct,
    ChannelFallback,
    Undelivered,
}

/// Try the direct message first; if the user cannot be reached, fall back to
/// the configured log channel. Both steps are best-effort.
pub fn dispatch(notifier: &dyn Notifier, log_channel_id: &str, notice: &Notice) -> Delivery {
    match notifier.send_direct(&notice.user_id, notice) {
        Ok(()) => return Delivery::Direct,
        Err(err) => {
            warn!(user = %notice.user_id, error = %err, "direct notice failed, trying channel fallback");
        }
    }

    if log_channel_id.is_empty() {
        return Delivery::Undelivered;
    }
    match notifier.send_channel(log_channel_id, notice) {
        Ok(()) => Delivery::ChannelFallback,
        Err(err) => {
            error!(channel = %log_channel_id, error = %err, "fallback notice failed");
            Delivery::Undelivered
        }
    }
}
