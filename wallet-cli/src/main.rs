use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};

use wallet_cli::logging::init_logging;
use wallet_cli::settings::{load_settings, Settings};
use wallet_cli::VERSION;
use wallet_client::{months_for_window, reports_to_transactions, IncomesExpensesReport, WalletClient};
use wallet_core::period::parse_date_span;
use wallet_core::time::today_in;
use wallet_core::{aggregate, write_report_csv_file, Period, PeriodKind, Window};

#[derive(Parser, Debug)]
#[command(
    name = "pywallet",
    version = VERSION,
    about = "Get reports from the BudgetBakers Wallet web app (web.budgetbakers.com)"
)]
struct Cli {
    /// Apply the named custom filter on the report page
    #[arg(long)]
    filter: Option<String>,

    /// Run the browser headless (overrides BROWSER_HEADLESS)
    #[arg(long, overrides_with = "no_headless")]
    headless: bool,

    /// Show the browser window
    #[arg(long, overrides_with = "headless")]
    no_headless: bool,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Settings file (default: ./pywallet.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Incomes & expenses CSV: one column per period, one row per category.
    /// Defaults to the last complete month.
    #[command(name = "incomes-expenses-by-periods", visible_alias = "ie")]
    IncomesExpensesByPeriods(ByPeriodsArgs),
}

#[derive(Debug, Clone, Copy)]
struct DateSpan(NaiveDate, NaiveDate);

fn parse_span(value: &str) -> Result<DateSpan, String> {
    parse_date_span(value)
        .map(|(start, end)| DateSpan(start, end))
        .map_err(|_| format!("expected START:END as YYYY-MM-DD:YYYY-MM-DD, got '{value}'"))
}

#[derive(Args, Debug)]
struct ByPeriodsArgs {
    /// CSV output file
    output: PathBuf,

    /// Period kind of each column: day, week, month, quarter or year
    #[arg(short, long, default_value_t = PeriodKind::Month)]
    by: PeriodKind,

    /// Report the last N complete periods
    #[arg(short = 'n', long, conflicts_with_all = ["since", "period"])]
    last: Option<u32>,

    /// Report complete periods since DATE (YYYY-MM-DD) until today
    #[arg(short, long, conflicts_with = "period")]
    since: Option<NaiveDate>,

    /// Report complete periods between START:END
    #[arg(short, long, value_parser = parse_span)]
    period: Option<DateSpan>,
}

impl Cli {
    fn headless(&self) -> Option<bool> {
        match (self.headless, self.no_headless) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

impl ByPeriodsArgs {
    fn window(&self) -> Window {
        match (self.since, self.period) {
            (Some(since), _) => Window::Since(since),
            (_, Some(DateSpan(start, end))) => Window::Between(start, end),
            _ => Window::Last(self.last.unwrap_or(1)),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, false);

    let mut settings = load_settings(cli.config.as_deref()).context("load settings")?;
    if let Some(headless) = cli.headless() {
        settings.client.headless = headless;
    }

    match cli.command {
        Command::IncomesExpensesByPeriods(args) => {
            incomes_expenses_by_periods(settings, &args, cli.filter.as_deref()).await?;
        }
    }

    Ok(())
}

async fn incomes_expenses_by_periods(
    settings: Settings,
    args: &ByPeriodsArgs,
    filter: Option<&str>,
) -> Result<()> {
    settings.client.credentials()?;

    let today = today_in(&settings.timezone)?;
    let periods = args
        .window()
        .resolve(args.by, today)
        .context("resolve report window")?;
    let months = months_for_window(&periods)?;
    info!(
        by = %args.by,
        first = %periods[0].label(),
        periods = periods.len(),
        months = months.len(),
        "building incomes & expenses report"
    );

    let client = WalletClient::connect(settings.client)
        .await
        .context("start browser session")?;
    let fetched = fetch_reports(&client, &months, filter).await;
    if let Err(e) = client.close().await {
        warn!(error = %e, "closing browser session failed");
    }
    let reports = fetched?;

    let table = aggregate(&reports_to_transactions(&reports), &periods);
    write_report_csv_file(&table, Some(args.output.as_path()))
        .with_context(|| format!("write {}", args.output.display()))?;
    Ok(())
}

async fn fetch_reports(
    client: &WalletClient,
    months: &[Period],
    filter: Option<&str>,
) -> Result<Vec<IncomesExpensesReport>> {
    client.sign_in().await.context("log in")?;
    let reports = client
        .read_incomes_expenses_reports(months, filter)
        .await
        .context("read incomes & expenses reports")?;
    if let Err(e) = client.save_cookies().await {
        warn!(error = %e, "dumping cookies failed, next run will log in again");
    }
    Ok(reports)
}
