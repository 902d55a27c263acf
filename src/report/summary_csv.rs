use csv::WriterBuilder;
use serde::Serialize;

use crate::{
    cashflow::Cashflow,
    reconciliation::{AccountReport, GrandTotals, Reconciliation},
};

use super::ReportError;

pub const TOTAL_ROW: &str = "TOTAL";

/// One CSV row: the three player buckets of a joint account, or of the grand
/// totals.
#[derive(Debug, PartialEq, Serialize)]
pub struct AccountSummary {
    pub account: String,
    pub player_1_in: String,
    pub player_1_out: String,
    pub player_2_in: String,
    pub player_2_out: String,
    pub unaccounted_in: String,
    pub unaccounted_out: String,
}

impl AccountSummary {
    fn new(account: &str, player_1: Cashflow, player_2: Cashflow, unaccounted: Cashflow) -> Self {
        Self {
            account: account.to_string(),
            player_1_in: player_1.in_flow.to_str(),
            player_1_out: player_1.out_flow.to_str(),
            player_2_in: player_2.in_flow.to_str(),
            player_2_out: player_2.out_flow.to_str(),
            unaccounted_in: unaccounted.in_flow.to_str(),
            unaccounted_out: unaccounted.out_flow.to_str(),
        }
    }
}

impl From<&AccountReport> for AccountSummary {
    fn from(report: &AccountReport) -> Self {
        let attribution = &report.attribution;
        Self::new(
            &report.name,
            attribution.player_1,
            attribution.player_2,
            attribution.unaccounted,
        )
    }
}

impl From<&GrandTotals> for AccountSummary {
    fn from(totals: &GrandTotals) -> Self {
        Self::new(
            TOTAL_ROW,
            totals.player_1,
            totals.player_2,
            totals.unaccounted,
        )
    }
}

pub struct AccountSummaryCsvWriter;

impl AccountSummaryCsvWriter {
    pub fn write(reconciliation: &Reconciliation) -> Result<Vec<u8>, ReportError> {
        let mut wtr = WriterBuilder::new().from_writer(vec![]);
        let summaries = reconciliation
            .accounts
            .iter()
            .map(AccountSummary::from)
            .chain(std::iter::once(AccountSummary::from(&reconciliation.totals)));
        for summary in summaries {
            wtr.serialize(summary)
                .map_err(|e| ReportError::SerialisationError(e.to_string()))?;
        }
        wtr.into_inner()
            .map_err(|e| ReportError::SerialisationError(e.to_string()))
    }
}
