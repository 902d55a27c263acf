use thiserror::Error;

use crate::{
    reconciliation::{Player, ReconcileError},
    report::ReportError,
    source::SourceError,
};

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("no token configured for {0}")]
    MissingToken(Player),
    #[error("client error: {0}")]
    Source(#[from] SourceError),
    #[error("{0}")]
    Reconcile(#[from] ReconcileError),
    #[error("report error: {0}")]
    Report(#[from] ReportError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
