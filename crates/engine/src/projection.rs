//! Linear balance projection.
//!
//! The model is deliberately naive: all-time income and expense are each
//! divided by a fixed 12 to get a monthly average, whatever span the history
//! actually covers, and the current balance is extended by the monthly net
//! for every projected month. No seasonality, no trend, no compounding.
use serde::Serialize;

use crate::{
    EngineError, MAX_HORIZON_MONTHS, MoneyCents, ResultEngine, TransactionEntry, reports::Totals,
};

/// Divisor applied to all-time totals to get a monthly average.
pub const MONTHS_PER_AVERAGE: i64 = 12;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Projection {
    /// Balance at the end of projected month 1, 2, ...
    pub balances: Vec<MoneyCents>,
    pub income_per_month: MoneyCents,
    pub expense_per_month: MoneyCents,
    pub current_balance: MoneyCents,
}

/// One projected month, as rendered in charts and tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ProjectedMonth {
    /// 1-based month offset from today.
    pub month: u32,
    pub income: MoneyCents,
    pub expense: MoneyCents,
    pub balance: MoneyCents,
}

impl Projection {
    pub fn horizon(&self) -> usize {
        self.balances.len()
    }

    /// Income and expense stay flat at the monthly average for every month.
    pub fn months(&self) -> impl Iterator<Item = ProjectedMonth> + '_ {
        self.balances
            .iter()
            .zip(1u32..)
            .map(|(balance, month)| ProjectedMonth {
                month,
                income: self.income_per_month,
                expense: self.expense_per_month,
                balance: *balance,
            })
    }
}

fn monthly_average(total: MoneyCents) -> MoneyCents {
    if !total.is_positive() {
        return MoneyCents::ZERO;
    }
    total
        .mul_div_round(1, MONTHS_PER_AVERAGE)
        .unwrap_or(MoneyCents::ZERO)
}

/// Projects the balance `horizon_months` months ahead.
///
/// Month `i` holds `current_balance + (income_per_month - expense_per_month) * i`.
/// Since the current balance is exactly `income_total - expense_total`, the
/// monthly net is `current_balance / 12`; month `i` is evaluated as
/// `current_balance * i / 12` and rounded once, so a fractional monthly
/// average does not drift over a long horizon.
///
/// A horizon of zero or less gives an empty series, one above
/// [`MAX_HORIZON_MONTHS`] is [`EngineError::InvalidHorizon`]. A balance that
/// does not fit in an `i64` of cents is [`EngineError::InvalidAmount`].
pub fn project(entries: &[TransactionEntry], horizon_months: i64) -> ResultEngine<Projection> {
    if horizon_months > MAX_HORIZON_MONTHS {
        return Err(EngineError::InvalidHorizon(horizon_months));
    }

    let totals = Totals::of(entries);
    let current_balance = totals.net();

    let balances = (1..=horizon_months.max(0))
        .map(|i| {
            current_balance
                .mul_div_round(i, MONTHS_PER_AVERAGE)
                .and_then(|growth| current_balance.checked_add(growth))
        })
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| {
            EngineError::InvalidAmount(format!(
                "projected balance from {current_balance} exceeds the supported range"
            ))
        })?;

    tracing::debug!(
        horizon_months,
        income_total = %totals.income,
        expense_total = %totals.expense,
        "computed projection"
    );

    Ok(Projection {
        balances,
        income_per_month: monthly_average(totals.income),
        expense_per_month: monthly_average(totals.expense),
        current_balance,
    })
}
