//! Automatic strike escalation when warns cross the configured limit

/// Decides whether a just-appended warn crossed an escalation boundary.
///
/// Driven by the count *after* a single append, so the policy fires exactly
/// once per crossing (3, 6, 9, ...) and never re-fires on sweeps, strike
/// appends or annulments. Escalation strikes do not consume warns; the
/// active warns keep counting toward the next boundary.
#[derive(Debug, Clone, Copy)]
pub struct EscalationPolicy {
    warn_limit: u32,
}

impl EscalationPolicy {
    pub fn new(warn_limit: u32) -> Self {
        Self { warn_limit }
    }

    pub fn should_escalate(&self, active_warns: usize) -> bool {
        self.warn_limit > 0 && active_warns > 0 && active_warns % self.warn_limit as usize == 0
    }

    /// Reason attached to the synthesized strike, worded so automatic
    /// strikes stay auditable among staff-issued ones.
    pub fn synthesized_reason(&self, active_warns: usize) -> String {
        format!(
            "Automatic strike: {} active warns reached the limit of {}",
            active_warns, self.warn_limit
        )
    }
}
