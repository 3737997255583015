//! Wire types of the SiKas HTTP API.
//!
//! Amounts travel as integer minor units (`*_minor`, cents) and dates as
//! `YYYY-MM-DD` strings.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Idr,
    Eur,
}

/// Data-quality notes attached to every read response.
#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notices {
    /// Set when the transaction file could not be read; the response was
    /// computed from an empty ledger.
    pub warning: Option<String>,
    /// Rows left out because a cell could not be parsed.
    pub skipped_rows: usize,
}

pub mod session {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SessionInfo {
        pub username: String,
        pub currency: Currency,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Category {
        Income,
        Expense,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum PaymentMethod {
        Cash,
        BankTransfer,
        Card,
        EWallet,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub date: NaiveDate,
        pub category: Category,
        /// Must be >= 0. The category gives the direction.
        pub amount_minor: i64,
        #[serde(default)]
        pub description: String,
        pub payment_method: Option<PaymentMethod>,
    }

    #[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct TransactionView {
        pub date: NaiveDate,
        pub category: Category,
        pub amount_minor: i64,
        pub description: String,
        pub payment_method: Option<PaymentMethod>,
    }
}

pub mod report {
    use super::*;
    use crate::transaction::{Category, PaymentMethod, TransactionView};

    /// Query string of `GET /transactions`. Missing dates default to the
    /// first/last recorded entry.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ReportQuery {
        pub from: Option<NaiveDate>,
        pub to: Option<NaiveDate>,
        pub category: Option<Category>,
        pub payment_method: Option<PaymentMethod>,
    }

    #[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Totals {
        pub income_minor: i64,
        pub expense_minor: i64,
        pub net_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReportResponse {
        pub from: Option<NaiveDate>,
        pub to: Option<NaiveDate>,
        pub transactions: Vec<TransactionView>,
        pub totals: Totals,
        #[serde(flatten)]
        pub notices: Notices,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct YearQuery {
        pub year: i32,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct YearlySummaryResponse {
        pub year: i32,
        pub income: Vec<TransactionView>,
        pub expense: Vec<TransactionView>,
        pub totals: Totals,
        #[serde(flatten)]
        pub notices: Notices,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthView {
        pub year: i32,
        pub month: u32,
        pub totals: Totals,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlyHistoryResponse {
        pub months: Vec<MonthView>,
        #[serde(flatten)]
        pub notices: Notices,
    }
}

pub mod projection {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProjectionQuery {
        /// 1 to 24.
        pub months: i64,
    }

    #[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ProjectedMonth {
        pub month: u32,
        pub income_minor: i64,
        pub expense_minor: i64,
        pub balance_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProjectionResponse {
        pub current_balance_minor: i64,
        pub income_per_month_minor: i64,
        pub expense_per_month_minor: i64,
        pub months: Vec<ProjectedMonth>,
        #[serde(flatten)]
        pub notices: Notices,
    }
}
