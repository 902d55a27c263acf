//! Reconciles the joint accounts two people share by attributing every
//! transfer to the personal account of whoever sent or received it.

#[cfg(test)]
use rstest_reuse;

pub mod account;
pub mod attribution;
pub mod cashflow;
pub mod config;
pub mod error;
pub mod model;
pub mod reconciliation;
pub mod report;
pub mod source;
pub mod up;
