use std::error::Error;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use engine::{
    AuthContext, Category, Engine, MoneyCents, NewTransaction, PaymentMethod, ReportRequest,
    SchemaVersion, View,
};
use tracing_subscriber::EnvFilter;

mod config;
mod prompt;
mod render;

#[derive(Parser, Debug)]
#[command(name = "sikas_cli")]
#[command(about = "Record income and expenses, print reports and balance projections")]
struct Cli {
    /// Transaction file (also read from `SIKAS_DATA`). Overrides `[store] path`.
    #[arg(long, env = "SIKAS_DATA")]
    data: Option<String>,
    /// Settings file (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Login name; prompted for when missing.
    #[arg(long, env = "SIKAS_USERNAME")]
    username: Option<String>,
    /// Log level written to stderr, `RUST_LOG` takes precedence.
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record a new transaction.
    Add(AddArgs),
    /// Transactions of a date range with totals.
    Report(ReportArgs),
    /// Balance projection from the all-time monthly average.
    Predict(PredictArgs),
    /// Income and expense of one calendar year.
    Summary(SummaryArgs),
    /// Rewrite the transaction file with the current columns.
    Migrate,
}

#[derive(Args, Debug)]
struct AddArgs {
    #[arg(long, value_parser = parse_date)]
    date: NaiveDate,
    /// `pendapatan`/`income` or `pengeluaran`/`expense`.
    #[arg(long, value_parser = parse_category)]
    category: Category,
    /// Non-negative, `.` or `,` as decimal separator.
    #[arg(long, value_parser = parse_amount)]
    amount: MoneyCents,
    #[arg(long, default_value = "")]
    description: String,
    /// `tunai`, `transfer`, `kartu` or `e-wallet`.
    #[arg(long, value_parser = parse_method)]
    method: Option<PaymentMethod>,
}

#[derive(Args, Debug)]
struct ReportArgs {
    #[arg(long, value_parser = parse_date)]
    from: Option<NaiveDate>,
    #[arg(long, value_parser = parse_date)]
    to: Option<NaiveDate>,
    #[arg(long, value_parser = parse_category)]
    category: Option<Category>,
    #[arg(long, value_parser = parse_method)]
    method: Option<PaymentMethod>,
}

#[derive(Args, Debug)]
struct PredictArgs {
    /// 1 to 24.
    #[arg(long, default_value_t = 12)]
    months: i64,
}

#[derive(Args, Debug)]
struct SummaryArgs {
    #[arg(long)]
    year: i32,
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    engine::parse_date(raw).map_err(|err| err.to_string())
}

fn parse_category(raw: &str) -> Result<Category, String> {
    Category::try_from(raw).map_err(|err| err.to_string())
}

fn parse_method(raw: &str) -> Result<PaymentMethod, String> {
    PaymentMethod::try_from(raw).map_err(|err| err.to_string())
}

fn parse_amount(raw: &str) -> Result<MoneyCents, String> {
    raw.parse().map_err(|err: engine::EngineError| err.to_string())
}

fn login(
    engine: &Engine,
    username: Option<String>,
) -> Result<AuthContext, Box<dyn Error + Send + Sync>> {
    let username = match username {
        Some(username) => username,
        None => prompt::line("Username: ")?,
    };
    let password = match std::env::var("SIKAS_PASSWORD") {
        Ok(password) => password,
        Err(_) => prompt::password("Password: ")?,
    };

    Ok(engine.login(&username, &password)?)
}

fn print_notices<T>(view: &View<T>) {
    if let Some(line) = render::notices(view.warning.as_deref(), view.skipped_rows) {
        eprintln!("{line}");
    }
}

fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "sikas_cli={level},engine={level}",
            level = cli.log_level
        ))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = config::load(cli.config.as_deref(), cli.data)?;
    let currency = config.currency;
    let engine = Engine::builder()
        .store(&config.data)
        .verifier(config.credentials)
        .currency(currency)
        .build();

    let auth = login(&engine, cli.username)?;

    match cli.command {
        Command::Add(args) => {
            let mut cmd = NewTransaction::new(args.date, args.category, args.amount)
                .description(args.description);
            if let Some(method) = args.method {
                cmd = cmd.payment_method(method);
            }
            let entry = engine.add_transaction(&auth, cmd)?;
            println!(
                "tersimpan: {} {} {}",
                entry.date,
                entry.category,
                currency.format(entry.amount)
            );
        }
        Command::Report(args) => {
            let view = engine.report(
                &auth,
                ReportRequest {
                    from: args.from,
                    to: args.to,
                    category: args.category,
                    payment_method: args.method,
                },
            );
            print_notices(&view);
            print!("{}", render::report(currency, &view.data));
        }
        Command::Predict(args) => {
            let view = engine.predict(&auth, args.months)?;
            print_notices(&view);
            print!("{}", render::projection(currency, &view.data));
        }
        Command::Summary(args) => {
            let view = engine.yearly_summary(&auth, args.year);
            print_notices(&view);
            print!("{}", render::yearly(currency, &view.data));
        }
        Command::Migrate => match engine.migrate(&auth)? {
            SchemaVersion::Full => println!("file sudah memakai format terbaru"),
            from => println!("file dimigrasi dari format {from:?}"),
        },
    }

    Ok(())
}
