//! Aggregation over loaded entries: date-range reports, yearly summaries and
//! per-month totals.
//!
//! Every function here borrows the entries and returns fresh values; nothing
//! mutates the input, so calling them twice gives the same answer.
use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::{Category, MoneyCents, PaymentMethod, TransactionEntry};

/// Income and expense sums. A category with no entries sums to zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub income: MoneyCents,
    pub expense: MoneyCents,
}

impl Totals {
    pub fn of<'a>(entries: impl IntoIterator<Item = &'a TransactionEntry>) -> Self {
        entries.into_iter().fold(Self::default(), |mut acc, entry| {
            acc.add(entry);
            acc
        })
    }

    // Saturates; ledgers coming from the store never get near the limit, see
    // `checked_add`.
    fn add(&mut self, entry: &TransactionEntry) {
        match entry.category {
            Category::Income => self.income += entry.amount,
            Category::Expense => self.expense += entry.amount,
        }
    }

    /// Adds one entry, or `None` if its category sum would overflow.
    ///
    /// Both sums are non-negative, so [`net`](Self::net) of a result is always
    /// exact.
    #[must_use]
    pub fn checked_add(self, entry: &TransactionEntry) -> Option<Self> {
        let mut next = self;
        match entry.category {
            Category::Income => next.income = self.income.checked_add(entry.amount)?,
            Category::Expense => next.expense = self.expense.checked_add(entry.amount)?,
        }
        Some(next)
    }

    pub fn get(&self, category: Category) -> MoneyCents {
        match category {
            Category::Income => self.income,
            Category::Expense => self.expense,
        }
    }

    /// Income minus expense ("sisa kas").
    pub fn net(&self) -> MoneyCents {
        self.income - self.expense
    }
}

/// Entries inside a date range, in file order, with their totals.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub entries: Vec<TransactionEntry>,
    pub totals: Totals,
}

/// Selection applied by [`ReportFilter::apply`].
///
/// Both ends of the date range are inclusive. A range with `start > end`
/// selects nothing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportFilter {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub category: Option<Category>,
    pub payment_method: Option<PaymentMethod>,
}

impl ReportFilter {
    #[must_use]
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end,
            category: None,
            payment_method: None,
        }
    }

    #[must_use]
    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    #[must_use]
    pub fn payment_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = Some(method);
        self
    }

    pub fn matches(&self, entry: &TransactionEntry) -> bool {
        (self.start..=self.end).contains(&entry.date)
            && self.category.is_none_or(|c| c == entry.category)
            && self
                .payment_method
                .is_none_or(|m| entry.payment_method == Some(m))
    }

    pub fn apply(&self, entries: &[TransactionEntry]) -> Report {
        let entries: Vec<TransactionEntry> =
            entries.iter().filter(|e| self.matches(e)).cloned().collect();
        let totals = Totals::of(&entries);
        Report { entries, totals }
    }
}

/// Entries dated within `[start_date, end_date]` and their per-category sums.
pub fn filter_and_summarize(
    entries: &[TransactionEntry],
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Report {
    ReportFilter::new(start_date, end_date).apply(entries)
}

/// Earliest and latest entry date, `None` without entries.
pub fn date_bounds(entries: &[TransactionEntry]) -> Option<(NaiveDate, NaiveDate)> {
    let first = entries.first()?.date;
    Some(
        entries
            .iter()
            .fold((first, first), |(lo, hi), e| (lo.min(e.date), hi.max(e.date))),
    )
}

/// Income and expense entries of one calendar year.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct YearlySummary {
    pub year: i32,
    pub income: Vec<TransactionEntry>,
    pub expense: Vec<TransactionEntry>,
}

impl YearlySummary {
    pub fn totals(&self) -> Totals {
        Totals {
            income: self.income.iter().map(|e| e.amount).sum(),
            expense: self.expense.iter().map(|e| e.amount).sum(),
        }
    }
}

pub fn yearly_summary(entries: &[TransactionEntry], year: i32) -> YearlySummary {
    let (income, expense): (Vec<_>, Vec<_>) = entries
        .iter()
        .filter(|e| e.date.year() == year)
        .cloned()
        .partition(|e| e.category == Category::Income);
    YearlySummary {
        year,
        income,
        expense,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct MonthTotals {
    pub year: i32,
    pub month: u32,
    pub totals: Totals,
}

/// Sums per calendar month, oldest first. Months without entries are left
/// out.
pub fn monthly_totals(entries: &[TransactionEntry]) -> Vec<MonthTotals> {
    let mut months: BTreeMap<(i32, u32), Totals> = BTreeMap::new();
    for entry in entries {
        months
            .entry((entry.date.year(), entry.date.month()))
            .or_default()
            .add(entry);
    }
    months
        .into_iter()
        .map(|((year, month), totals)| MonthTotals {
            year,
            month,
            totals,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(date: &str, category: Category, cents: i64) -> TransactionEntry {
        TransactionEntry::new(
            date.parse().unwrap(),
            category,
            MoneyCents::new(cents),
            format!("{category} {date}"),
        )
        .unwrap()
    }

    fn day(raw: &str) -> NaiveDate {
        raw.parse().unwrap()
    }

    fn sample() -> Vec<TransactionEntry> {
        vec![
            entry("2024-01-10", Category::Income, 120_000),
            entry("2024-01-15", Category::Expense, 20_000),
            entry("2024-02-01", Category::Expense, 5_000),
            entry("2024-02-20", Category::Income, 30_000),
            entry("2025-01-05", Category::Income, 1_000),
        ]
    }

    #[test]
    fn range_is_inclusive_and_keeps_order() {
        let entries = sample();
        let report = filter_and_summarize(&entries, day("2024-01-15"), day("2024-02-20"));

        let dates: Vec<NaiveDate> = report.entries.iter().map(|e| e.date).collect();
        assert_eq!(
            dates,
            vec![day("2024-01-15"), day("2024-02-01"), day("2024-02-20")]
        );
        assert_eq!(report.totals.income, MoneyCents::new(30_000));
        assert_eq!(report.totals.expense, MoneyCents::new(25_000));
        assert_eq!(report.totals.net(), MoneyCents::new(5_000));
    }

    #[test]
    fn every_selected_entry_is_in_range_and_net_matches() {
        let entries = sample();
        let (start, end) = (day("2024-01-01"), day("2024-12-31"));
        let report = filter_and_summarize(&entries, start, end);

        assert!(report.entries.iter().all(|e| e.date >= start && e.date <= end));
        let signed: MoneyCents = report.entries.iter().map(|e| e.signed_amount()).sum();
        assert_eq!(signed, report.totals.net());
        assert_eq!(
            report.totals.get(Category::Income) - report.totals.get(Category::Expense),
            report.totals.net()
        );
    }

    #[test]
    fn empty_or_inverted_range_gives_zero_totals() {
        let entries = sample();
        let report = filter_and_summarize(&entries, day("2030-01-01"), day("2030-12-31"));
        assert!(report.entries.is_empty());
        assert_eq!(report.totals, Totals::default());

        let inverted = filter_and_summarize(&entries, day("2024-12-31"), day("2024-01-01"));
        assert!(inverted.entries.is_empty());
        assert_eq!(inverted.totals.net(), MoneyCents::ZERO);
    }

    #[test]
    fn summarizing_twice_is_identical() {
        let entries = sample();
        let before = entries.clone();
        let a = filter_and_summarize(&entries, day("2024-01-01"), day("2025-12-31"));
        let b = filter_and_summarize(&entries, day("2024-01-01"), day("2025-12-31"));
        assert_eq!(a, b);
        assert_eq!(entries, before);
    }

    #[test]
    fn filter_by_category_and_method() {
        let mut entries = sample();
        entries[1] = entries[1].clone().payment_method(PaymentMethod::Card);

        let expenses = ReportFilter::new(day("2024-01-01"), day("2024-12-31"))
            .category(Category::Expense)
            .apply(&entries);
        assert_eq!(expenses.entries.len(), 2);
        assert_eq!(expenses.totals.income, MoneyCents::ZERO);

        let card = ReportFilter::new(day("2024-01-01"), day("2024-12-31"))
            .payment_method(PaymentMethod::Card)
            .apply(&entries);
        assert_eq!(card.entries.len(), 1);
        assert_eq!(card.totals.expense, MoneyCents::new(20_000));
    }

    #[test]
    fn bounds_span_all_entries() {
        let mut entries = sample();
        entries.swap(0, 4);
        assert_eq!(
            date_bounds(&entries),
            Some((day("2024-01-10"), day("2025-01-05")))
        );
        assert_eq!(date_bounds(&[]), None);
    }

    #[test]
    fn yearly_summary_splits_by_category() {
        let summary = yearly_summary(&sample(), 2024);
        assert_eq!(summary.income.len(), 2);
        assert_eq!(summary.expense.len(), 2);
        assert_eq!(summary.totals().income, MoneyCents::new(150_000));
        assert_eq!(summary.totals().expense, MoneyCents::new(25_000));

        let empty = yearly_summary(&sample(), 1999);
        assert!(empty.income.is_empty() && empty.expense.is_empty());
    }

    #[test]
    fn monthly_totals_are_sorted() {
        let months = monthly_totals(&sample());
        let keys: Vec<(i32, u32)> = months.iter().map(|m| (m.year, m.month)).collect();
        assert_eq!(keys, vec![(2024, 1), (2024, 2), (2025, 1)]);
        assert_eq!(months[0].totals.net(), MoneyCents::new(100_000));
    }
}
