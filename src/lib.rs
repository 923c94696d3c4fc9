pub mod config;
pub mod error;
pub mod escalation;
pub mod ledger;
pub mod notify;
pub mod record;
pub mod service;
pub mod store;
pub mod utils;
