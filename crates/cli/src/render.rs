//! Plain-text rendering of reports and projections.
use std::fmt::Write;

use engine::{Currency, MoneyCents, Projection, RangeReport, TransactionEntry, YearlySummary};

const BAR_WIDTH: usize = 30;

/// Horizontal bar, `value` relative to `max`. Negative values draw empty.
#[must_use]
pub fn bar(value: MoneyCents, max: MoneyCents, width: usize) -> String {
    if !max.is_positive() {
        return "░".repeat(width);
    }

    let value = i128::from(value.cents().clamp(0, max.cents()));
    let filled = usize::try_from(value * width as i128 / i128::from(max.cents()))
        .unwrap_or(0)
        .min(width);
    let empty = width.saturating_sub(filled);

    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

fn entries_table(out: &mut String, currency: Currency, entries: &[TransactionEntry]) {
    let _ = writeln!(
        out,
        "{:<10}  {:<11}  {:>18}  {:<8}  Deskripsi",
        "Tanggal", "Kategori", "Jumlah", "Metode"
    );
    for entry in entries {
        let method = entry.payment_method.map(|m| m.label()).unwrap_or("-");
        let _ = writeln!(
            out,
            "{:<10}  {:<11}  {:>18}  {:<8}  {}",
            entry.date.format("%Y-%m-%d"),
            entry.category.label(),
            currency.format(entry.amount),
            method,
            entry.description
        );
    }
}

fn totals_bars(out: &mut String, currency: Currency, income: MoneyCents, expense: MoneyCents) {
    let max = income.max(expense);
    let _ = writeln!(
        out,
        "Pendapatan   {} {}",
        bar(income, max, BAR_WIDTH),
        currency.format(income)
    );
    let _ = writeln!(
        out,
        "Pengeluaran  {} {}",
        bar(expense, max, BAR_WIDTH),
        currency.format(expense)
    );
    let _ = writeln!(out, "Sisa Kas     {}", currency.format(income - expense));
}

#[must_use]
pub fn report(currency: Currency, range: &RangeReport) -> String {
    let mut out = String::new();
    match (range.start, range.end) {
        (Some(start), Some(end)) => {
            let _ = writeln!(out, "Laporan {start} s/d {end}");
        }
        _ => {
            out.push_str("Belum ada transaksi.\n");
            return out;
        }
    }
    out.push('\n');

    if range.report.entries.is_empty() {
        out.push_str("Tidak ada transaksi pada rentang ini.\n");
    } else {
        entries_table(&mut out, currency, &range.report.entries);
    }
    out.push('\n');

    let totals = &range.report.totals;
    totals_bars(&mut out, currency, totals.income, totals.expense);
    out
}

/// Averages on top, then one block per month: income and expense bars
/// scaled against each other, followed by the projected balance.
#[must_use]
pub fn projection(currency: Currency, projection: &Projection) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Saldo saat ini             {}",
        currency.format(projection.current_balance)
    );
    let _ = writeln!(
        out,
        "Rata-rata pemasukan/bln    {}",
        currency.format(projection.income_per_month)
    );
    let _ = writeln!(
        out,
        "Rata-rata pengeluaran/bln  {}",
        currency.format(projection.expense_per_month)
    );

    let max = projection.income_per_month.max(projection.expense_per_month);
    for month in projection.months() {
        let _ = writeln!(
            out,
            "\nBulan {:>2}  Pemasukan    {} {}",
            month.month,
            bar(month.income, max, BAR_WIDTH),
            currency.format(month.income)
        );
        let _ = writeln!(
            out,
            "          Pengeluaran  {} {}",
            bar(month.expense, max, BAR_WIDTH),
            currency.format(month.expense)
        );
        let _ = writeln!(out, "          Saldo        {}", currency.format(month.balance));
    }
    out
}

#[must_use]
pub fn yearly(currency: Currency, summary: &YearlySummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Ringkasan tahun {}", summary.year);

    for (title, entries) in [
        ("Pendapatan", &summary.income),
        ("Pengeluaran", &summary.expense),
    ] {
        let _ = writeln!(out, "\n{title}");
        if entries.is_empty() {
            out.push_str("(kosong)\n");
        } else {
            entries_table(&mut out, currency, entries);
        }
    }
    out.push('\n');

    let totals = summary.totals();
    totals_bars(&mut out, currency, totals.income, totals.expense);
    out
}

/// Line for stderr describing problems with the data file, if any.
#[must_use]
pub fn notices(warning: Option<&str>, skipped_rows: usize) -> Option<String> {
    match (warning, skipped_rows) {
        (Some(warning), _) => Some(format!("peringatan: {warning}")),
        (None, 0) => None,
        (None, n) => Some(format!("peringatan: {n} baris tidak terbaca dan dilewati")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use engine::{Category, Report, Totals};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn bar_scales_and_clamps() {
        let max = MoneyCents::new(100);
        assert_eq!(bar(MoneyCents::new(50), max, 4), "██░░");
        assert_eq!(bar(MoneyCents::new(500), max, 4), "████");
        assert_eq!(bar(MoneyCents::new(-5), max, 4), "░░░░");
        assert_eq!(bar(MoneyCents::new(5), MoneyCents::ZERO, 3), "░░░");
    }

    #[test]
    fn report_shows_net_cash() {
        let entries = vec![
            TransactionEntry::new(day(10), Category::Income, MoneyCents::new(1200_00), "Gaji")
                .unwrap(),
            TransactionEntry::new(day(11), Category::Expense, MoneyCents::new(200_50), "Listrik")
                .unwrap(),
        ];
        let range = RangeReport {
            start: Some(day(1)),
            end: Some(day(31)),
            report: Report {
                totals: Totals::of(&entries),
                entries,
            },
        };

        let text = report(Currency::Idr, &range);
        assert!(text.starts_with("Laporan 2024-01-01 s/d 2024-01-31\n"));
        assert!(text.contains("Listrik"));
        assert!(text.contains("Sisa Kas     Rp 999.50"));
    }

    #[test]
    fn report_without_entries() {
        let text = report(Currency::Idr, &RangeReport::default());
        assert_eq!(text, "Belum ada transaksi.\n");
    }

    #[test]
    fn projection_lists_each_month() {
        let entries = vec![
            TransactionEntry::new(day(10), Category::Income, MoneyCents::new(1200_00), "Gaji")
                .unwrap(),
        ];
        let text = projection(Currency::Idr, &engine::project(&entries, 3).unwrap());
        assert!(text.contains("Bulan  1"));
        assert!(text.contains("Bulan  3"));
        assert!(text.contains("Saldo        Rp 1,500.00"));
        assert!(!text.contains("Bulan  4"));
    }

    #[test]
    fn notices_prefer_warning() {
        assert_eq!(notices(None, 0), None);
        assert!(notices(None, 2).unwrap().contains("2 baris"));
        assert!(notices(Some("file hilang"), 2).unwrap().contains("file hilang"));
    }

    #[test]
    fn projection_pairs_income_and_expense_bars() {
        let entries = vec![
            TransactionEntry::new(day(10), Category::Income, MoneyCents::new(2400_00), "Gaji")
                .unwrap(),
            TransactionEntry::new(day(11), Category::Expense, MoneyCents::new(1200_00), "Sewa")
                .unwrap(),
        ];
        let text = projection(Currency::Idr, &engine::project(&entries, 2).unwrap());

        let income: Vec<&str> = text.lines().filter(|l| l.contains("Pemasukan  ")).collect();
        let expense: Vec<&str> = text.lines().filter(|l| l.contains("Pengeluaran  ")).collect();
        assert_eq!(income.len(), 2);
        assert_eq!(expense.len(), 2);

        let full = "█".repeat(BAR_WIDTH);
        let half = format!("{}{}", "█".repeat(BAR_WIDTH / 2), "░".repeat(BAR_WIDTH / 2));
        assert!(income[0].contains(&format!("{full} Rp 200.00")));
        assert!(expense[0].contains(&format!("{half} Rp 100.00")));
    }
}
