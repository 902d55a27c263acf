mod summary_csv;
mod text;

use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

pub use summary_csv::{AccountSummary, AccountSummaryCsvWriter};
pub use text::TextReportWriter;

use crate::reconciliation::Reconciliation;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Csv,
}

impl FromStr for ReportFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "csv" => Ok(Self::Csv),
            other => Err(ReportError::UnknownFormat(other.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to serialise the AccountSummary: {0}")]
    SerialisationError(String),
    #[error("Unknown report format: {0}")]
    UnknownFormat(String),
}

pub fn render(
    reconciliation: &Reconciliation,
    format: ReportFormat,
) -> Result<Vec<u8>, ReportError> {
    match format {
        ReportFormat::Text => TextReportWriter::write(reconciliation)
            .map(String::into_bytes)
            .map_err(|e| ReportError::SerialisationError(e.to_string())),
        ReportFormat::Csv => AccountSummaryCsvWriter::write(reconciliation),
    }
}
