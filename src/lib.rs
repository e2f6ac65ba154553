pub mod config;
pub mod format;
pub mod humanize;
pub mod ledger;
pub mod observability;
pub mod tail;
