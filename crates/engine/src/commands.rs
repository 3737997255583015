//! Inputs and outputs of the [`Engine`](crate::Engine) command handlers.
//!
//! Each user action maps to one handler that takes its command, reads the
//! store fresh and returns a [`View`]; no state survives between calls
//! except what is in the file.

use chrono::NaiveDate;
use serde::Serialize;

use crate::{
    Category, EngineError, Ledger, MoneyCents, PaymentMethod, Report, ResultEngine,
    TransactionEntry,
};

pub const MIN_HORIZON_MONTHS: i64 = 1;
pub const MAX_HORIZON_MONTHS: i64 = 24;

/// Checks a user-chosen projection horizon.
pub fn validate_horizon(months: i64) -> ResultEngine<i64> {
    if (MIN_HORIZON_MONTHS..=MAX_HORIZON_MONTHS).contains(&months) {
        Ok(months)
    } else {
        Err(EngineError::InvalidHorizon(months))
    }
}

/// Record a new income or expense.
#[derive(Clone, Debug)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub category: Category,
    pub amount: MoneyCents,
    pub description: String,
    pub payment_method: Option<PaymentMethod>,
}

impl NewTransaction {
    #[must_use]
    pub fn new(date: NaiveDate, category: Category, amount: MoneyCents) -> Self {
        Self {
            date,
            category,
            amount,
            description: String::new(),
            payment_method: None,
        }
    }

    #[must_use]
    pub fn income(date: NaiveDate, amount: MoneyCents) -> Self {
        Self::new(date, Category::Income, amount)
    }

    #[must_use]
    pub fn expense(date: NaiveDate, amount: MoneyCents) -> Self {
        Self::new(date, Category::Expense, amount)
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn payment_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = Some(method);
        self
    }
}

impl TryFrom<NewTransaction> for TransactionEntry {
    type Error = EngineError;

    fn try_from(cmd: NewTransaction) -> Result<Self, Self::Error> {
        let description = cmd.description.trim();
        if description.contains(['\n', '\r']) {
            return Err(EngineError::InvalidEntry(
                "description must be a single line".to_string(),
            ));
        }
        let entry = TransactionEntry::new(cmd.date, cmd.category, cmd.amount, description)?;
        Ok(match cmd.payment_method {
            Some(method) => entry.payment_method(method),
            None => entry,
        })
    }
}

/// Report selection as chosen by the user. Missing bounds default to the
/// first and last entry dates.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReportRequest {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub category: Option<Category>,
    pub payment_method: Option<PaymentMethod>,
}

/// A report with the range it was actually computed over. The bounds are
/// `None` only when neither the request nor the ledger provided one.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RangeReport {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub report: Report,
}

/// A command result together with what the front end should tell the user
/// about the data it was computed from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct View<T> {
    pub data: T,
    /// Present when the store was unreadable and `data` was computed from
    /// an empty ledger.
    pub warning: Option<String>,
    /// Rows left out because a cell could not be parsed.
    pub skipped_rows: usize,
}

impl<T> View<T> {
    pub(crate) fn of(ledger: &Ledger, data: T) -> Self {
        Self {
            data,
            warning: ledger.warning.clone(),
            skipped_rows: ledger.skipped.len(),
        }
    }
}
