//! Error taxonomy surfaced to the interaction layer

/// Every expected failure of a ledger operation. The router maps each
/// variant to a user-facing message; none of these abort the process.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum SanctionError {
    #[error("could not resolve a user reference from {0:?}")]
    InvalidUser(String),
    #[error("unrecognized sanction type {0:?}, expected warn or strike")]
    InvalidType(String),
    #[error("no active sanction matched the annulment request")]
    NotFound,
    #[error("sanction {0} has already been annulled")]
    AlreadyAnnulled(String),
    #[error("ledger document could not be persisted")]
    PersistenceFailed,
}

/// Why a ledger document could not be written.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("io error writing ledger: {0}")]
    Io(#[from] std::io::Error),
    #[error("ledger serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}
