use thiserror::Error;

use crate::model::Amount;

/// A bucket total left the `i64` range of minor units.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
#[error("Cashflow total overflows 64-bit minor units")]
pub struct CashflowOverflow;

/// Signed money totals routed to one bucket.
/// `in_flow` accumulates every non-negative amount and is never below zero,
/// `out_flow` accumulates every negative amount and is never above zero.
/// Both sides are summed with checked `i64` arithmetic, so a total is either
/// exact or reported as [`CashflowOverflow`].
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct Cashflow {
    pub in_flow: Amount,
    pub out_flow: Amount,
}

impl Cashflow {
    pub fn new(in_flow: i64, out_flow: i64) -> Self {
        Self {
            in_flow: Amount::from(in_flow),
            out_flow: Amount::from(out_flow),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Zero counts as an inflow. On overflow the cashflow is left unchanged.
    pub fn update(&mut self, amount: Amount) -> Result<(), CashflowOverflow> {
        let side = if amount.0 >= 0 {
            &mut self.in_flow
        } else {
            &mut self.out_flow
        };
        side.0 = side.0.checked_add(amount.0).ok_or(CashflowOverflow)?;
        Ok(())
    }

    pub fn merge(&self, other: &Cashflow) -> Result<Cashflow, CashflowOverflow> {
        Ok(Cashflow {
            in_flow: checked_sum(self.in_flow, other.in_flow)?,
            out_flow: checked_sum(self.out_flow, other.out_flow)?,
        })
    }

    /// Cannot overflow: `in_flow` and `out_flow` never share a sign.
    pub fn net(&self) -> Amount {
        Amount::from(self.in_flow.0 + self.out_flow.0)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::empty()
    }

    /// Merges every cashflow, starting from [`Cashflow::empty`].
    pub fn merge_all<'a>(
        cashflows: impl IntoIterator<Item = &'a Cashflow>,
    ) -> Result<Cashflow, CashflowOverflow> {
        cashflows
            .into_iter()
            .try_fold(Cashflow::empty(), |acc, cashflow| acc.merge(cashflow))
    }
}

fn checked_sum(a: Amount, b: Amount) -> Result<Amount, CashflowOverflow> {
    a.0.checked_add(b.0).map(Amount::from).ok_or(CashflowOverflow)
}
