use serde::{Deserialize, Serialize};

use crate::{EngineError, MoneyCents};

/// Currency used to display amounts.
///
/// SiKas keeps a single ledger in one currency and never converts between
/// currencies: the value only drives how [`MoneyCents`] are rendered
/// (`Rp 1,200.00`). Amounts are always stored with two minor units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Idr,
    Eur,
}

impl Currency {
    /// Canonical currency code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Currency::Idr => "IDR",
            Currency::Eur => "EUR",
        }
    }

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Currency::Idr => "Rp",
            Currency::Eur => "€",
        }
    }

    /// Renders an amount for people, e.g. `Rp 1,200.00`.
    #[must_use]
    pub fn format(self, amount: MoneyCents) -> String {
        format!("{} {}", self.symbol(), amount.grouped())
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for Currency {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "IDR" | "RP" => Ok(Currency::Idr),
            "EUR" => Ok(Currency::Eur),
            other => Err(EngineError::InvalidEntry(format!(
                "unsupported currency: {other}"
            ))),
        }
    }
}
