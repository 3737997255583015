//! The module contains [`TransactionEntry`], a single dated income or expense,
//! and the enums it is built from.
//!
//! Labels follow the transaction file, which is written in Indonesian
//! (`Pendapatan`, `Pengeluaran`, ...). Parsing also accepts the English names.
use core::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::{EngineError, MoneyCents, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Income,
    Expense,
}

impl Category {
    /// Label stored in the `kategori` column.
    pub fn label(self) -> &'static str {
        match self {
            Self::Income => "Pendapatan",
            Self::Expense => "Pengeluaran",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<&str> for Category {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "pendapatan" | "pemasukan" | "income" => Ok(Self::Income),
            "pengeluaran" | "expense" => Ok(Self::Expense),
            other => Err(EngineError::InvalidEntry(format!(
                "invalid category: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    BankTransfer,
    Card,
    EWallet,
}

impl PaymentMethod {
    /// Label stored in the `metode_pembayaran` column.
    pub fn label(self) -> &'static str {
        match self {
            Self::Cash => "Tunai",
            Self::BankTransfer => "Transfer",
            Self::Card => "Kartu",
            Self::EWallet => "E-Wallet",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<&str> for PaymentMethod {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized: String = value
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();
        match normalized.as_str() {
            "tunai" | "cash" => Ok(Self::Cash),
            "transfer" | "transferbank" | "banktransfer" => Ok(Self::BankTransfer),
            "kartu" | "card" | "kartukredit" | "kartudebit" => Ok(Self::Card),
            "ewallet" | "dompetdigital" => Ok(Self::EWallet),
            _ => Err(EngineError::InvalidEntry(format!(
                "invalid payment method: {}",
                value.trim()
            ))),
        }
    }
}

/// One income or expense record.
///
/// Entries are only ever appended to the store; there is no edit or delete
/// path. `amount` is never negative, the sign comes from `category`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionEntry {
    pub date: NaiveDate,
    pub category: Category,
    pub amount: MoneyCents,
    pub description: String,
    pub payment_method: Option<PaymentMethod>,
}

impl TransactionEntry {
    pub fn new(
        date: NaiveDate,
        category: Category,
        amount: MoneyCents,
        description: impl Into<String>,
    ) -> ResultEngine<Self> {
        if amount.is_negative() {
            return Err(EngineError::InvalidAmount(format!(
                "amount must be >= 0, got {amount}"
            )));
        }
        Ok(Self {
            date,
            category,
            amount,
            description: description.into(),
            payment_method: None,
        })
    }

    #[must_use]
    pub fn payment_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = Some(method);
        self
    }

    /// Amount with the category sign applied: income positive, expense
    /// negative.
    pub fn signed_amount(&self) -> MoneyCents {
        match self.category {
            Category::Income => self.amount,
            Category::Expense => -self.amount,
        }
    }
}

impl fmt::Display for TransactionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.date, self.category, self.amount, self.description
        )
    }
}

/// Parses a date cell down to calendar-date granularity.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` (what spreadsheet tools write
/// back after touching the file) and RFC 3339.
pub fn parse_date(raw: &str) -> ResultEngine<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Ok(datetime.date());
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Ok(datetime.date_naive());
    }
    Err(EngineError::InvalidEntry(format!("invalid date: {raw}")))
}
