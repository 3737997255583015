use std::{fs, path::PathBuf};

use chrono::NaiveDate;
use engine::{
    Category, Engine, EngineError, MoneyCents, NewTransaction, PaymentMethod, ReportRequest,
    SchemaVersion, SkipReason, StaticCredentials, TransactionEntry, TransactionStore,
    filter_and_summarize,
};
use uuid::Uuid;

fn test_file(contents: Option<&str>) -> PathBuf {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../target/test_data");
    fs::create_dir_all(&root).unwrap();

    let path = root.join(format!("transaksi_{}.csv", Uuid::new_v4()));
    if let Some(contents) = contents {
        fs::write(&path, contents).unwrap();
    }
    path
}

fn day(raw: &str) -> NaiveDate {
    raw.parse().unwrap()
}

fn engine_with_file(contents: Option<&str>) -> (Engine, PathBuf) {
    let path = test_file(contents);
    let engine = Engine::builder()
        .store(&path)
        .verifier(StaticCredentials::default().user("admin", "admin123"))
        .build();
    (engine, path)
}

#[test]
fn missing_file_is_unavailable_and_degrades_to_empty() {
    let store = TransactionStore::new(test_file(None));

    assert!(matches!(store.load(), Err(EngineError::DataUnavailable(_))));

    let ledger = store.load_or_empty();
    assert!(ledger.entries.is_empty());
    assert!(ledger.warning.is_some());
}

#[test]
fn non_numeric_amount_is_skipped_not_fatal() {
    let path = test_file(Some(
        "tanggal,kategori,jumlah,deskripsi\n\
         2024-01-10,Pendapatan,1200,Gaji\n\
         2024-01-11,Pengeluaran,abc,Rusak\n\
         2024-01-12,Pengeluaran,200.50,Listrik\n",
    ));
    let ledger = TransactionStore::new(&path).load().unwrap();

    assert_eq!(ledger.entries.len(), 2);
    assert_eq!(ledger.skipped.len(), 1);
    assert_eq!(ledger.skipped[0].reason, SkipReason::Amount);
    assert_eq!(ledger.skipped[0].line, 3);

    let report = filter_and_summarize(&ledger.entries, day("2024-01-01"), day("2024-01-31"));
    assert_eq!(report.totals.income, MoneyCents::new(1200_00));
    assert_eq!(report.totals.expense, MoneyCents::new(200_50));
    assert_eq!(report.totals.net(), MoneyCents::new(999_50));
}

#[test]
fn append_then_load_round_trips() {
    let path = test_file(None);
    let store = TransactionStore::new(&path);

    let entry = TransactionEntry::new(
        day("2024-03-05"),
        Category::Expense,
        MoneyCents::new(75_25),
        "Belanja, pasar \"pagi\"",
    )
    .unwrap()
    .payment_method(PaymentMethod::EWallet);
    store.append(&entry).unwrap();

    let ledger = store.load().unwrap();
    assert_eq!(ledger.entries, vec![entry]);

    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.starts_with("tanggal,kategori,jumlah,deskripsi,metode_pembayaran\n"));
}

#[test]
fn append_keeps_order_and_unparseable_rows() {
    let path = test_file(Some(
        "tanggal,kategori,jumlah,deskripsi\n\
         2024-01-10,Pendapatan,1200,Gaji\n\
         2024-01-11,Pengeluaran,abc,Rusak\n",
    ));
    let store = TransactionStore::new(&path);
    let entry =
        TransactionEntry::new(day("2024-01-09"), Category::Income, MoneyCents::new(5_00), "Bonus")
            .unwrap();
    store.append(&entry).unwrap();

    let raw = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = raw.lines().collect();
    assert_eq!(
        lines,
        vec![
            "tanggal,kategori,jumlah,deskripsi,metode_pembayaran",
            "2024-01-10,Pendapatan,1200,Gaji,",
            "2024-01-11,Pengeluaran,abc,Rusak,",
            "2024-01-09,Pendapatan,5.00,Bonus,",
        ]
    );

    let ledger = store.load().unwrap();
    let descriptions: Vec<&str> = ledger.entries.iter().map(|e| e.description.as_str()).collect();
    assert_eq!(descriptions, vec!["Gaji", "Bonus"]);
    assert_eq!(ledger.skipped.len(), 1);
}

#[test]
fn failed_append_leaves_file_untouched() {
    let contents = "tanggal,kategori,jumlah\n2024-01-10,Pendapatan,1200\n";
    let path = test_file(Some(contents));
    let store = TransactionStore::new(&path);
    let entry =
        TransactionEntry::new(day("2024-01-11"), Category::Income, MoneyCents::new(1), "x").unwrap();

    assert!(store.append(&entry).is_err());
    assert_eq!(fs::read_to_string(&path).unwrap(), contents);
}

#[test]
fn failed_write_keeps_original_bytes() {
    let contents = "tanggal,kategori,jumlah,deskripsi,metode_pembayaran\n2024-01-10,Pendapatan,1200,Gaji,\n";
    let path = test_file(Some(contents));
    let file_name = path.file_name().unwrap().to_str().unwrap();
    let tmp = path.with_file_name(format!(".{file_name}.tmp"));
    fs::create_dir(&tmp).unwrap();

    let store = TransactionStore::new(&path);
    let entry =
        TransactionEntry::new(day("2024-01-11"), Category::Expense, MoneyCents::new(1), "x").unwrap();

    assert!(matches!(store.append(&entry), Err(EngineError::Write(_))));
    assert_eq!(fs::read_to_string(&path).unwrap(), contents);
    assert_eq!(store.load().unwrap().entries.len(), 1);

    fs::remove_dir(&tmp).unwrap();
    store.append(&entry).unwrap();
    assert_eq!(store.load().unwrap().entries.len(), 2);
}

#[test]
fn headerless_file_with_header_word_in_description() {
    let path = test_file(Some(
        "2024-01-10,Pendapatan,1200,tanggal\n2024-01-12,Pengeluaran,100,x\n",
    ));
    let store = TransactionStore::new(&path);

    let ledger = store.load().unwrap();
    assert_eq!(ledger.entries.len(), 2);
    assert_eq!(ledger.entries[0].description, "tanggal");

    let entry =
        TransactionEntry::new(day("2024-01-13"), Category::Income, MoneyCents::new(5_00), "Bonus")
            .unwrap();
    store.append(&entry).unwrap();
    assert_eq!(store.load().unwrap().entries.len(), 3);
}

#[test]
fn rows_overflowing_the_totals_are_skipped() {
    let (engine, path) = engine_with_file(Some(
        "tanggal,kategori,jumlah,deskripsi\n\
         2024-01-10,Pendapatan,90000000000000000,A\n\
         2024-01-11,Pendapatan,90000000000000000,B\n\
         2024-01-12,Pengeluaran,10,C\n",
    ));
    let auth = engine.login("admin", "admin123").unwrap();

    let ledger = TransactionStore::new(&path).load().unwrap();
    assert_eq!(ledger.entries.len(), 2);
    assert_eq!(ledger.skipped.len(), 1);
    assert_eq!(ledger.skipped[0].reason, SkipReason::Overflow);
    assert_eq!(ledger.skipped[0].line, 3);

    let report = engine.report(&auth, ReportRequest::default());
    assert_eq!(report.skipped_rows, 1);
    assert_eq!(
        report.data.report.totals.income,
        MoneyCents::new(9_000_000_000_000_000_000)
    );

    assert!(matches!(
        engine.predict(&auth, 24),
        Err(EngineError::InvalidAmount(_))
    ));

    let err = engine
        .add_transaction(
            &auth,
            NewTransaction::income(day("2024-02-01"), MoneyCents::new(i64::MAX)),
        )
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
    assert_eq!(TransactionStore::new(&path).load().unwrap().skipped.len(), 1);
}

#[test]
fn legacy_file_is_migrated() {
    let path = test_file(Some(
        "tanggal,kategori,jumlah,deskripsi\n2024-01-10 00:00:00,Pendapatan,1200.0,Gaji\n",
    ));
    let store = TransactionStore::new(&path);

    assert_eq!(store.migrate().unwrap(), SchemaVersion::Legacy);
    assert_eq!(store.migrate().unwrap(), SchemaVersion::Full);

    let raw = fs::read_to_string(&path).unwrap();
    assert_eq!(
        raw,
        "tanggal,kategori,jumlah,deskripsi,metode_pembayaran\n2024-01-10 00:00:00,Pendapatan,1200.0,Gaji,\n"
    );
    let ledger = store.load().unwrap();
    assert_eq!(ledger.entries[0].date, day("2024-01-10"));
    assert_eq!(ledger.entries[0].amount, MoneyCents::new(1200_00));
}

#[test]
fn headerless_file_is_read_positionally() {
    let path = test_file(Some(
        "2024-01-10,Pendapatan,1200.0,Gaji\n2024-01-12,Pengeluaran,100.0,Pulsa\n",
    ));
    let store = TransactionStore::new(&path);

    let ledger = store.load().unwrap();
    assert_eq!(ledger.entries.len(), 2);
    assert_eq!(ledger.entries[1].category, Category::Expense);

    assert_eq!(store.migrate().unwrap(), SchemaVersion::Headerless);
    let ledger_after = store.load().unwrap();
    assert_eq!(ledger.entries, ledger_after.entries);
}

#[test]
fn engine_login_add_report_predict() {
    let (engine, _path) = engine_with_file(None);

    assert_eq!(engine.login("admin", "nope").unwrap_err(), EngineError::Unauthorized);
    let auth = engine.login("admin", "admin123").unwrap();

    let empty = engine.report(&auth, ReportRequest::default());
    assert!(empty.warning.is_some());
    assert!(empty.data.start.is_none());

    engine
        .add_transaction(
            &auth,
            NewTransaction::income(day("2024-01-10"), MoneyCents::new(1200_00)).description("Gaji"),
        )
        .unwrap();
    engine
        .add_transaction(
            &auth,
            NewTransaction::expense(day("2024-02-10"), MoneyCents::new(300_00))
                .description("Sewa")
                .payment_method(PaymentMethod::BankTransfer),
        )
        .unwrap();

    let report = engine.report(&auth, ReportRequest::default());
    assert!(report.warning.is_none());
    assert_eq!(report.data.start, Some(day("2024-01-10")));
    assert_eq!(report.data.end, Some(day("2024-02-10")));
    assert_eq!(report.data.report.totals.net(), MoneyCents::new(900_00));

    let expenses = engine.report(
        &auth,
        ReportRequest {
            category: Some(Category::Expense),
            ..ReportRequest::default()
        },
    );
    assert_eq!(expenses.data.report.entries.len(), 1);

    let projection = engine.predict(&auth, 3).unwrap().data;
    assert_eq!(projection.income_per_month, MoneyCents::new(100_00));
    assert_eq!(projection.expense_per_month, MoneyCents::new(25_00));
    assert_eq!(
        projection.balances,
        vec![
            MoneyCents::new(975_00),
            MoneyCents::new(1050_00),
            MoneyCents::new(1125_00)
        ]
    );

    assert_eq!(
        engine.predict(&auth, 0).unwrap_err(),
        EngineError::InvalidHorizon(0)
    );

    let summary = engine.yearly_summary(&auth, 2024).data;
    assert_eq!(summary.totals().income, MoneyCents::new(1200_00));

    let history = engine.monthly_history(&auth).data;
    assert_eq!(history.len(), 2);
}

#[test]
fn engine_rejects_negative_amount_without_writing() {
    let (engine, path) = engine_with_file(None);
    let auth = engine.login("admin", "admin123").unwrap();

    let err = engine
        .add_transaction(
            &auth,
            NewTransaction::expense(day("2024-01-01"), MoneyCents::new(-5)),
        )
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
    assert!(!path.exists());
}
