//! Tradescope CLI — directory lookups and headless report sessions.
//!
//! Commands:
//! - `accounts` / `stocks` — list the account and stock directories
//! - `points` — list the trade points recorded for one account
//! - `interval` — project one range reading against an account's points
//! - `session` — run the report view headless and print what it settles on

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::LevelFilter;

use tradescope_core::{
    AccountDirectory, AccountId, FeedBus, FixtureReferenceData, HttpReferenceData,
    IntervalProjector, PointCatalog, PricePointLookup, RangeReading, ReportConfig, ReportServices,
    StockDirectory, ACCOUNT_TOPIC,
};
use tradescope_view::{ReportSession, SelectionCoordinator};

#[derive(Parser)]
#[command(
    name = "tradescope",
    about = "Tradescope — trade report view, headless"
)]
struct Cli {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Serve directories and points from a JSON fixture instead of the services.
    #[arg(long, global = true)]
    fixture: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the account directory.
    Accounts,
    /// List the stock directory.
    Stocks,
    /// List trade points for an account.
    Points {
        account_id: u64,
    },
    /// Project a range reading against an account's trade points.
    Interval {
        account_id: u64,
        low: usize,
        high: usize,
    },
    /// Start a report session, wait for it to settle and print its state.
    Session {
        /// Switch to this account once the default selection has settled.
        #[arg(long)]
        select: Option<u64>,

        /// Low handle position.
        #[arg(long, requires = "high")]
        low: Option<usize>,

        /// High handle position.
        #[arg(long, requires = "low")]
        high: Option<usize>,

        /// How long to wait for lookups to complete, in milliseconds.
        #[arg(long, default_value_t = 10_000)]
        timeout_ms: u64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => ReportConfig::from_file(path)?,
        None => ReportConfig::default(),
    };
    let services = build_services(&config, cli.fixture.as_deref())?;

    match cli.command {
        Commands::Accounts => run_accounts(&services),
        Commands::Stocks => run_stocks(&services),
        Commands::Points { account_id } => run_points(&services, AccountId(account_id)),
        Commands::Interval {
            account_id,
            low,
            high,
        } => run_interval(&services, AccountId(account_id), RangeReading::new(low, high)),
        Commands::Session {
            select,
            low,
            high,
            timeout_ms,
        } => {
            let reading = low.zip(high).map(|(l, h)| RangeReading::new(l, h));
            run_session(
                services,
                &config,
                select.map(AccountId),
                reading,
                Duration::from_millis(timeout_ms),
            )
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };

    let mut builder = env_logger::Builder::new();
    builder
        .filter(None, LevelFilter::Warn)
        .filter(Some("tradescope"), level)
        .filter(Some("tradescope_core"), level)
        .filter(Some("tradescope_view"), level);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}

fn build_services(config: &ReportConfig, fixture: Option<&std::path::Path>) -> Result<ReportServices> {
    match fixture {
        Some(path) => {
            let data = FixtureReferenceData::from_file(path)
                .with_context(|| format!("failed to load fixture {}", path.display()))?;
            log::info!(
                "serving {} accounts and {} stocks from {}",
                data.accounts.len(),
                data.stocks.len(),
                path.display()
            );
            Ok(ReportServices::from_backend(data))
        }
        None => {
            let http = HttpReferenceData::new(&config.services)?;
            Ok(ReportServices::from_backend(http))
        }
    }
}

fn run_accounts(services: &ReportServices) -> Result<()> {
    let accounts = services.accounts.accounts()?;
    for account in &accounts {
        println!("{}\t{}", account.id, account.display_name);
    }
    Ok(())
}

fn run_stocks(services: &ReportServices) -> Result<()> {
    let stocks = services.stocks.stocks()?;
    for stock in &stocks {
        println!("{:<8}{}", stock.ticker, stock.company_name);
    }
    Ok(())
}

fn run_points(services: &ReportServices, account_id: AccountId) -> Result<()> {
    let points = services.prices.points_in_time(account_id)?;
    if points.is_empty() {
        println!("No trade points for account {account_id}");
    }
    for (i, point) in points.iter().enumerate() {
        println!("v{i}\t{point}");
    }
    Ok(())
}

fn run_interval(services: &ReportServices, account_id: AccountId, reading: RangeReading) -> Result<()> {
    let accounts = services.accounts.accounts()?;
    let account = accounts.iter().find(|a| a.id == account_id);
    if account.is_none() {
        log::warn!("account {account_id} is not in the directory; projecting without a selection");
    }

    let catalog = PointCatalog::new(services.prices.points_in_time(account_id)?);
    let interval = IntervalProjector::project(reading, &catalog, account);
    println!("{}", serde_json::to_string_pretty(&interval)?);
    Ok(())
}

fn run_session(
    services: ReportServices,
    config: &ReportConfig,
    select: Option<AccountId>,
    reading: Option<RangeReading>,
    timeout: Duration,
) -> Result<()> {
    let feed = Arc::new(FeedBus::new(config.feed.source.clone()));
    let announcements = feed.subscribe(ACCOUNT_TOPIC);

    let mut session = ReportSession::start(
        services,
        feed.clone(),
        config.selection.default_account_index,
    )?;

    if !session.wait_until_settled(timeout) {
        bail!("report session did not settle within {timeout:?}");
    }

    if let Some(account_id) = select {
        if !session.coordinator_mut().select_account_id(account_id) {
            bail!("account {account_id} is not in the directory");
        }
        if !session.wait_until_settled(timeout) {
            bail!("trade points for account {account_id} did not arrive within {timeout:?}");
        }
    }

    if let Some(reading) = reading {
        session.coordinator_mut().adjust_range(reading);
    }

    print_state(session.coordinator())?;

    println!();
    println!("Feed messages on {ACCOUNT_TOPIC}:");
    for message in announcements.try_iter() {
        println!("  {}", message.to_json()?);
    }

    session.shutdown()
}

fn print_state(coordinator: &SelectionCoordinator) -> Result<()> {
    println!(
        "Accounts: {} ({:?})    Stocks: {} ({:?})",
        coordinator.accounts().len(),
        coordinator.accounts_state(),
        coordinator.stocks().len(),
        coordinator.stocks_state()
    );

    match coordinator.selected() {
        Some(account) => println!("Selected: {account}"),
        None => println!("Selected: none"),
    }
    println!("Trade points: {}", coordinator.catalog().len());

    match coordinator.range_control() {
        Some(range) => println!("Range ticks: {}", range.tick_labels().join(" ")),
        None => println!("Range control hidden"),
    }

    if let Some(interval) = coordinator.interval() {
        println!("Interval: {}", serde_json::to_string_pretty(interval)?);
    }
    Ok(())
}
