//! CSV-backed transaction store.
//!
//! The file has the columns `tanggal`, `kategori`, `jumlah`, `deskripsi` and,
//! in newer files, `metode_pembayaran`. Three layouts exist in the wild:
//!
//! - [`SchemaVersion::Full`]: header with all five columns;
//! - [`SchemaVersion::Legacy`]: header without `metode_pembayaran`;
//! - [`SchemaVersion::Headerless`]: rows appended to a fresh file without
//!   ever writing a header, read positionally.
//!
//! Reading tolerates all three. Writing always produces the full layout: an
//! append rewrites the whole file into a temporary sibling and renames it
//! over the store file, so a failed append never leaves a half-written row.
//!
//! There is no file locking. Two processes appending at the same time can
//! lose one of the appends.
use std::{
    fs::{self, File},
    path::{Path, PathBuf},
};

use csv::{ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use serde::Serialize;

use crate::{
    Category, EngineError, MoneyCents, PaymentMethod, ResultEngine, Totals, TransactionEntry,
    entry::parse_date,
};

pub const COL_DATE: &str = "tanggal";
pub const COL_CATEGORY: &str = "kategori";
pub const COL_AMOUNT: &str = "jumlah";
pub const COL_DESCRIPTION: &str = "deskripsi";
pub const COL_PAYMENT_METHOD: &str = "metode_pembayaran";

const FULL_HEADER: [&str; 5] = [
    COL_DATE,
    COL_CATEGORY,
    COL_AMOUNT,
    COL_DESCRIPTION,
    COL_PAYMENT_METHOD,
];

/// Layout of the transaction file, see the module docs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaVersion {
    Headerless,
    Legacy,
    Full,
}

/// Why a row was left out of a [`Ledger`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    Date,
    Category,
    Amount,
    /// The amount parses but would push the ledger's income or expense total
    /// past the largest representable sum.
    Overflow,
}

/// A row that could not be turned into a [`TransactionEntry`].
///
/// Skipped rows stay in the file untouched; they are only excluded from
/// listings and sums.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ParseSkip {
    /// 1-based line in the file.
    pub line: u64,
    pub column: &'static str,
    pub value: String,
    pub reason: SkipReason,
}

/// Entries loaded from the store, plus what had to be left out.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Ledger {
    pub entries: Vec<TransactionEntry>,
    pub skipped: Vec<ParseSkip>,
    /// Set when the store could not be read and the ledger is empty because
    /// of it.
    pub warning: Option<String>,
}

impl Ledger {
    pub fn new(entries: Vec<TransactionEntry>) -> Self {
        Self {
            entries,
            ..Self::default()
        }
    }

    fn unavailable(err: &EngineError) -> Self {
        Self {
            warning: Some(err.to_string()),
            ..Self::default()
        }
    }
}

/// Column positions resolved from the header (or assumed, without one).
#[derive(Clone, Copy, Debug)]
struct Columns {
    date: usize,
    category: usize,
    amount: usize,
    description: usize,
    payment_method: Option<usize>,
}

impl Columns {
    const POSITIONAL: Columns = Columns {
        date: 0,
        category: 1,
        amount: 2,
        description: 3,
        payment_method: Some(4),
    };

    fn from_header(header: &StringRecord) -> ResultEngine<Self> {
        let find = |name: &str| {
            header.iter().position(|field| {
                field
                    .trim_start_matches('\u{feff}')
                    .trim()
                    .eq_ignore_ascii_case(name)
            })
        };
        let require = |name: &str| {
            find(name).ok_or_else(|| EngineError::DataUnavailable(format!("missing column {name}")))
        };

        Ok(Self {
            date: require(COL_DATE)?,
            category: require(COL_CATEGORY)?,
            amount: require(COL_AMOUNT)?,
            description: require(COL_DESCRIPTION)?,
            payment_method: find(COL_PAYMENT_METHOD),
        })
    }
}

/// Raw contents of the file: every row exactly as read.
struct RawTable {
    schema: SchemaVersion,
    columns: Columns,
    rows: Vec<StringRecord>,
}

impl RawTable {
    fn empty() -> Self {
        Self {
            schema: SchemaVersion::Full,
            columns: Columns::POSITIONAL,
            rows: Vec::new(),
        }
    }

    fn read(path: &Path) -> ResultEngine<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .map_err(|err| EngineError::DataUnavailable(format!("{}: {err}", path.display())))?;

        let mut rows = reader
            .records()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| EngineError::DataUnavailable(format!("{}: {err}", path.display())))?;

        if rows.is_empty() {
            return Ok(Self::empty());
        }

        if !is_header(&rows[0]) {
            return Ok(Self {
                schema: SchemaVersion::Headerless,
                columns: Columns::POSITIONAL,
                rows,
            });
        }

        let header = rows.remove(0);
        let columns = Columns::from_header(&header)?;
        let schema = if columns.payment_method.is_some() {
            SchemaVersion::Full
        } else {
            SchemaVersion::Legacy
        };
        Ok(Self {
            schema,
            columns,
            rows,
        })
    }

    /// Re-lays a raw row out in the full schema, keeping every cell verbatim.
    fn normalized(&self, row: &StringRecord) -> StringRecord {
        let cell = |idx: usize| row.get(idx).unwrap_or("");
        let c = self.columns;
        StringRecord::from(vec![
            cell(c.date),
            cell(c.category),
            cell(c.amount),
            cell(c.description),
            c.payment_method.map(cell).unwrap_or(""),
        ])
    }

    fn overflow_skip(&self, index: usize, row: &StringRecord) -> ParseSkip {
        ParseSkip {
            line: line_of(index, row),
            column: COL_AMOUNT,
            value: row.get(self.columns.amount).unwrap_or("").trim().to_string(),
            reason: SkipReason::Overflow,
        }
    }

    fn parse_row(&self, index: usize, row: &StringRecord) -> Result<TransactionEntry, ParseSkip> {
        let line = line_of(index, row);
        let cell = |idx: usize| row.get(idx).unwrap_or("").trim();
        let c = self.columns;
        let skip = |column: &'static str, value: &str, reason: SkipReason| ParseSkip {
            line,
            column,
            value: value.to_string(),
            reason,
        };

        let date = parse_date(cell(c.date))
            .map_err(|_| skip(COL_DATE, cell(c.date), SkipReason::Date))?;
        let category = Category::try_from(cell(c.category))
            .map_err(|_| skip(COL_CATEGORY, cell(c.category), SkipReason::Category))?;
        let amount = cell(c.amount)
            .parse::<MoneyCents>()
            .ok()
            .filter(|amount| !amount.is_negative())
            .ok_or_else(|| skip(COL_AMOUNT, cell(c.amount), SkipReason::Amount))?;

        let mut entry = TransactionEntry {
            date,
            category,
            amount,
            description: cell(c.description).to_string(),
            payment_method: None,
        };

        if let Some(raw) = c.payment_method.map(cell).filter(|raw| !raw.is_empty()) {
            match PaymentMethod::try_from(raw) {
                Ok(method) => entry.payment_method = Some(method),
                Err(_) => tracing::warn!(line, value = raw, "unknown payment method, ignoring it"),
            }
        }

        Ok(entry)
    }
}

/// A first row is a header when it names both `tanggal` and `jumlah`. One
/// matching cell is not enough: a headerless file may well carry the word
/// `tanggal` as a description.
fn is_header(row: &StringRecord) -> bool {
    let names = |name: &str| {
        row.iter().any(|field| {
            field
                .trim_start_matches('\u{feff}')
                .trim()
                .eq_ignore_ascii_case(name)
        })
    };
    names(COL_DATE) && names(COL_AMOUNT)
}

fn line_of(index: usize, row: &StringRecord) -> u64 {
    row.position()
        .map(|pos| pos.line())
        .unwrap_or(index as u64 + 1)
}

fn entry_record(entry: &TransactionEntry) -> StringRecord {
    let date = entry.date.format("%Y-%m-%d").to_string();
    let amount = entry.amount.to_string();
    StringRecord::from(vec![
        date.as_str(),
        entry.category.label(),
        amount.as_str(),
        entry.description.as_str(),
        entry.payment_method.map(|m| m.label()).unwrap_or(""),
    ])
}

/// Append-only store over a single CSV file.
#[derive(Clone, Debug)]
pub struct TransactionStore {
    path: PathBuf,
}

impl TransactionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every entry in file order.
    ///
    /// Fails with [`EngineError::DataUnavailable`] when the file is missing,
    /// is not valid CSV or lacks a required column. Rows with a bad date,
    /// category or amount are reported in [`Ledger::skipped`] instead.
    pub fn load(&self) -> ResultEngine<Ledger> {
        let table = RawTable::read(&self.path)?;

        let mut ledger = Ledger::default();
        let mut totals = Totals::default();
        for (index, row) in table.rows.iter().enumerate() {
            let parsed = table.parse_row(index, row).and_then(|entry| {
                match totals.checked_add(&entry) {
                    Some(next) => {
                        totals = next;
                        Ok(entry)
                    }
                    None => Err(table.overflow_skip(index, row)),
                }
            });
            match parsed {
                Ok(entry) => ledger.entries.push(entry),
                Err(skip) => {
                    tracing::warn!(
                        line = skip.line,
                        column = skip.column,
                        value = %skip.value,
                        "skipping unparseable row"
                    );
                    ledger.skipped.push(skip);
                }
            }
        }

        tracing::debug!(
            path = %self.path.display(),
            entries = ledger.entries.len(),
            skipped = ledger.skipped.len(),
            "loaded transactions"
        );
        Ok(ledger)
    }

    /// Like [`load`](Self::load), but an unreadable store degrades to an empty
    /// ledger carrying the error as a warning.
    pub fn load_or_empty(&self) -> Ledger {
        match self.load() {
            Ok(ledger) => ledger,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), "{err}");
                Ledger::unavailable(&err)
            }
        }
    }

    /// Persists one more entry.
    ///
    /// A missing file is created with the full header. An existing file is
    /// migrated to the full layout on the way; rows that fail to parse are
    /// carried over verbatim.
    pub fn append(&self, entry: &TransactionEntry) -> ResultEngine<()> {
        let table = if self.path.exists() {
            RawTable::read(&self.path)?
        } else {
            RawTable::empty()
        };

        let mut rows: Vec<StringRecord> = table.rows.iter().map(|r| table.normalized(r)).collect();
        rows.push(entry_record(entry));

        self.replace_contents(&rows)?;
        tracing::info!(
            path = %self.path.display(),
            date = %entry.date,
            category = %entry.category,
            amount = %entry.amount,
            "appended transaction"
        );
        Ok(())
    }

    /// Rewrites a legacy or headerless file in the full layout.
    ///
    /// Returns the layout the file had before; a file already in the full
    /// layout is left untouched.
    pub fn migrate(&self) -> ResultEngine<SchemaVersion> {
        let table = RawTable::read(&self.path)?;
        if table.schema == SchemaVersion::Full {
            return Ok(SchemaVersion::Full);
        }

        let rows: Vec<StringRecord> = table.rows.iter().map(|r| table.normalized(r)).collect();
        self.replace_contents(&rows)?;
        tracing::info!(
            path = %self.path.display(),
            from = ?table.schema,
            rows = rows.len(),
            "migrated transaction file"
        );
        Ok(table.schema)
    }

    /// Writes header + rows to a temporary sibling, syncs it and renames it
    /// over the store file.
    fn replace_contents(&self, rows: &[StringRecord]) -> ResultEngine<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(EngineError::write)?;
        }

        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| EngineError::Write(format!("{} is not a file", self.path.display())))?;
        let mut tmp_name = std::ffi::OsString::from(".");
        tmp_name.push(file_name);
        tmp_name.push(".tmp");
        let tmp = self.path.with_file_name(tmp_name);

        let result = write_csv(&tmp, rows)
            .and_then(|()| fs::rename(&tmp, &self.path).map_err(csv::Error::from));
        if let Err(err) = result {
            let _ = fs::remove_file(&tmp);
            tracing::error!(path = %self.path.display(), "failed to write transactions: {err}");
            return Err(EngineError::write(err));
        }
        Ok(())
    }
}

fn write_csv(path: &Path, rows: &[StringRecord]) -> Result<(), csv::Error> {
    let file = File::create(path)?;
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(file);
    writer.write_record(FULL_HEADER)?;
    for row in rows {
        writer.write_record(row)?;
    }
    let file = writer
        .into_inner()
        .map_err(|err| csv::Error::from(std::io::Error::other(err.to_string())))?;
    file.sync_all()?;
    Ok(())
}
