use std::fmt::{self, Write};

use crate::{
    cashflow::Cashflow,
    reconciliation::{AccountReport, Reconciliation},
};

pub struct TextReportWriter;

impl TextReportWriter {
    pub fn write(reconciliation: &Reconciliation) -> Result<String, fmt::Error> {
        let mut out = String::new();
        for report in &reconciliation.accounts {
            write_account(&mut out, reconciliation, report)?;
            writeln!(out)?;
        }
        let totals = &reconciliation.totals;
        writeln!(out, "Total")?;
        write_line(&mut out, "player 1", &totals.player_1)?;
        write_line(&mut out, "player 2", &totals.player_2)?;
        write_line(&mut out, "unaccounted", &totals.unaccounted)?;
        Ok(out)
    }
}

fn write_account(
    out: &mut String,
    reconciliation: &Reconciliation,
    report: &AccountReport,
) -> fmt::Result {
    let attribution = &report.attribution;
    writeln!(
        out,
        "{} ({} transactions)",
        report.name, attribution.transaction_count
    )?;
    write_line(out, "player 1", &attribution.player_1)?;
    write_line(out, "player 2", &attribution.player_2)?;
    write_line(out, "unaccounted", &attribution.unaccounted)?;
    for (account_id, cashflow) in attribution.transfers_with_other_joint_accounts() {
        if !cashflow.is_empty() {
            let label = format!("<-> {}", reconciliation.name_of(account_id));
            write_line(out, &label, cashflow)?;
        }
    }
    Ok(())
}

fn write_line(out: &mut String, label: &str, cashflow: &Cashflow) -> fmt::Result {
    writeln!(
        out,
        "  {label:<20} in {:>12}  out {:>12}",
        cashflow.in_flow.to_str(),
        cashflow.out_flow.to_str()
    )
}
