//! SiKas engine: a cash-flow ledger kept in a CSV file.
//!
//! The crate holds the data model ([`TransactionEntry`]), the
//! [`TransactionStore`], the aggregation and projection arithmetic, and the
//! [`Engine`] facade that front ends call once per user action.
use std::{path::PathBuf, sync::Mutex};

pub use auth::{AuthContext, CredentialVerifier, Session, StaticCredentials, authenticate};
pub use commands::{
    MAX_HORIZON_MONTHS, MIN_HORIZON_MONTHS, NewTransaction, RangeReport, ReportRequest, View,
    validate_horizon,
};
pub use currency::Currency;
pub use entry::{Category, PaymentMethod, TransactionEntry, parse_date};
pub use error::EngineError;
pub use money::MoneyCents;
pub use projection::{ProjectedMonth, Projection, project};
pub use reports::{
    MonthTotals, Report, ReportFilter, Totals, YearlySummary, date_bounds, filter_and_summarize,
    monthly_totals, yearly_summary,
};
pub use store::{Ledger, ParseSkip, SchemaVersion, SkipReason, TransactionStore};

mod auth;
mod commands;
mod currency;
mod entry;
mod error;
mod money;
mod projection;
mod reports;
pub mod store;

type ResultEngine<T> = Result<T, EngineError>;

/// Where the store lives when the builder is not told otherwise.
pub const DEFAULT_STORE_PATH: &str = "data/transaksi.csv";

pub struct Engine {
    store: TransactionStore,
    verifier: Box<dyn CredentialVerifier>,
    currency: Currency,
    // Serialises appends made through this engine. Other processes are not
    // covered.
    write_lock: Mutex<()>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("store", &self.store)
            .field("currency", &self.currency)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn store(&self) -> &TransactionStore {
        &self.store
    }

    pub fn login(&self, username: &str, password: &str) -> ResultEngine<AuthContext> {
        authenticate(self.verifier.as_ref(), username, password)
    }

    /// Current contents of the store. An unreadable store yields an empty
    /// ledger with [`Ledger::warning`] set.
    pub fn ledger(&self, _auth: &AuthContext) -> Ledger {
        self.store.load_or_empty()
    }

    pub fn add_transaction(
        &self,
        auth: &AuthContext,
        cmd: NewTransaction,
    ) -> ResultEngine<TransactionEntry> {
        let entry = TransactionEntry::try_from(cmd)?;
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| EngineError::Write("store lock poisoned".to_string()))?;
        // A row the next load would drop as overflow is refused up front.
        let existing = self.store.load().map(|ledger| ledger.entries).unwrap_or_default();
        let totals = Totals::of(&existing);
        if totals.checked_add(&entry).is_none() {
            return Err(EngineError::InvalidAmount(format!(
                "{} would push the {} total past the supported range",
                entry.amount,
                entry.category.label()
            )));
        }
        self.store.append(&entry)?;
        tracing::debug!(username = auth.username(), "transaction recorded");
        Ok(entry)
    }

    /// Report over a date range. A missing bound falls back to the earliest
    /// or latest entry date.
    pub fn report(&self, auth: &AuthContext, request: ReportRequest) -> View<RangeReport> {
        let ledger = self.ledger(auth);
        let bounds = date_bounds(&ledger.entries);
        let start = request.from.or(bounds.map(|(lo, _)| lo));
        let end = request.to.or(bounds.map(|(_, hi)| hi));

        let report = match (start, end) {
            (Some(start), Some(end)) => {
                let mut filter = ReportFilter::new(start, end);
                filter.category = request.category;
                filter.payment_method = request.payment_method;
                filter.apply(&ledger.entries)
            }
            _ => Report::default(),
        };
        tracing::debug!(
            username = auth.username(),
            entries = report.entries.len(),
            "built report"
        );

        View::of(&ledger, RangeReport { start, end, report })
    }

    /// Balance projection for 1 to 24 months.
    pub fn predict(&self, auth: &AuthContext, months: i64) -> ResultEngine<View<Projection>> {
        let months = validate_horizon(months)?;
        let ledger = self.ledger(auth);
        Ok(View::of(&ledger, project(&ledger.entries, months)?))
    }

    pub fn yearly_summary(&self, auth: &AuthContext, year: i32) -> View<YearlySummary> {
        let ledger = self.ledger(auth);
        View::of(&ledger, yearly_summary(&ledger.entries, year))
    }

    pub fn monthly_history(&self, auth: &AuthContext) -> View<Vec<MonthTotals>> {
        let ledger = self.ledger(auth);
        View::of(&ledger, monthly_totals(&ledger.entries))
    }

    /// Rewrites the store in the current layout, see [`TransactionStore::migrate`].
    pub fn migrate(&self, auth: &AuthContext) -> ResultEngine<SchemaVersion> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| EngineError::Write("store lock poisoned".to_string()))?;
        let from = self.store.migrate()?;
        tracing::debug!(username = auth.username(), ?from, "store migration checked");
        Ok(from)
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    store: Option<PathBuf>,
    verifier: Option<Box<dyn CredentialVerifier>>,
    currency: Currency,
}

impl EngineBuilder {
    /// Path of the CSV file backing the store.
    pub fn store(mut self, path: impl Into<PathBuf>) -> EngineBuilder {
        self.store = Some(path.into());
        self
    }

    /// How logins are checked. Without one nobody can log in.
    pub fn verifier(mut self, verifier: impl CredentialVerifier + 'static) -> EngineBuilder {
        self.verifier = Some(Box::new(verifier));
        self
    }

    pub fn currency(mut self, currency: Currency) -> EngineBuilder {
        self.currency = currency;
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> Engine {
        let path = self
            .store
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH));
        let verifier = self.verifier.unwrap_or_else(|| {
            tracing::warn!("no credential verifier configured, every login will fail");
            Box::new(StaticCredentials::default()) as Box<dyn CredentialVerifier>
        });

        Engine {
            store: TransactionStore::new(path),
            verifier,
            currency: self.currency,
            write_lock: Mutex::new(()),
        }
    }
}
