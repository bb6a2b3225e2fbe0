//! MomScan CLI — momentum signals, forward returns, universe screening.
//!
//! Commands:
//! - `signals`: MACD/trend buy and sell markers for one identifier
//! - `returns`: fixed-holding-period forward returns and statistics
//! - `screen`: screen a universe against return/volatility thresholds
//! - `correlate`: identifiers highly correlated with a target
//! - `show`: print a saved JSON screening report
//!
//! Data comes from Yahoo Finance by default, `--csv-dir` for offline files,
//! or `--synthetic` for a deterministic random walk.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use momscan_core::analysis::analyze_returns;
use momscan_core::data::{
    CircuitBreaker, CsvSource, LookbackPeriod, PriceSource, StaticUniverse, Universe,
    UniverseSource, YahooSource,
};
use momscan_core::domain::{PriceSeries, SignalKind};
use momscan_core::signals::analyze_signals;
use momscan_runner::export::{
    export_chart_csv, export_observations_csv, load_report, save_report, write_text,
};
use momscan_runner::{
    fetch_with_timeout, init_logging, screen_universe, AppConfig, CorrelationMatrix, FetchLimiter,
    LogFormat, RankingMetric, RowStatus, ScreeningReport, ScreeningRow, SyntheticSource,
    DEFAULT_CORRELATION_THRESHOLD,
};

#[derive(Parser)]
#[command(
    name = "momscan",
    about = "MomScan CLI — MACD momentum signals and forward-return screening"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a TOML config file ([indicators], [analysis], [screen]).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Read prices from `<DIR>/<IDENTIFIER>.csv` instead of the network.
    #[arg(long, global = true)]
    csv_dir: Option<PathBuf>,

    /// Use deterministic synthetic prices instead of the network.
    #[arg(long, global = true, default_value_t = false)]
    synthetic: bool,

    /// Seed for --synthetic.
    #[arg(long, global = true, default_value_t = 42)]
    seed: u64,

    /// Log output format: pretty or json.
    #[arg(long, global = true, default_value = "pretty")]
    log_format: LogFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the buy/sell markers for one identifier.
    Signals {
        /// Identifier, e.g. AAPL or 0005.HK.
        identifier: String,

        /// History to analyze (5d, 2wk, 6mo, 5y, ytd, max).
        #[arg(long, default_value = "5y")]
        lookback: LookbackPeriod,

        /// Write per-session chart data (prices, indicators, markers) as CSV.
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Forward returns over a fixed holding period for one identifier.
    Returns {
        identifier: String,

        /// History to analyze. Defaults to the config's screen lookback.
        #[arg(long)]
        lookback: Option<LookbackPeriod>,

        /// Holding period in weeks.
        #[arg(long)]
        holding_weeks: Option<u32>,

        /// Risk-free rate per holding period.
        #[arg(long)]
        risk_free: Option<f64>,

        /// Write the per-buy-date return table as CSV.
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Screen a universe against return and volatility thresholds.
    Screen {
        /// Identifiers to screen. Combined with --universe / --list / --hk-code.
        identifiers: Vec<String>,

        /// Sector universe TOML file.
        #[arg(long)]
        universe: Option<PathBuf>,

        /// Restrict --universe to these sectors.
        #[arg(long)]
        sector: Vec<String>,

        /// Plain identifier list, one per line.
        #[arg(long)]
        list: Option<PathBuf>,

        /// HKEX stock codes, e.g. --hk-code 5,700,1299.
        #[arg(long, value_delimiter = ',')]
        hk_code: Vec<u32>,

        #[arg(long)]
        lookback: Option<LookbackPeriod>,

        #[arg(long)]
        holding_weeks: Option<u32>,

        /// Minimum mean return to pass.
        #[arg(long)]
        min_return: Option<f64>,

        /// Maximum return stddev to pass.
        #[arg(long)]
        max_volatility: Option<f64>,

        #[arg(long)]
        max_concurrency: Option<usize>,

        /// Per-identifier retrieval deadline in seconds.
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Order output by mean-return, volatility or sharpe (default: input order).
        #[arg(long)]
        sort_by: Option<RankingMetric>,

        /// Only print rows that passed.
        #[arg(long, default_value_t = false)]
        passing_only: bool,

        /// Save the report (.json or .csv).
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// List identifiers whose closes correlate strongly with a target.
    Correlate {
        /// Candidate identifiers.
        #[arg(required = true)]
        identifiers: Vec<String>,

        #[arg(long)]
        target: String,

        /// Report correlations strictly above this value.
        #[arg(long, default_value_t = DEFAULT_CORRELATION_THRESHOLD)]
        threshold: f64,

        #[arg(long, default_value = "5y")]
        lookback: LookbackPeriod,
    },
    /// Print a screening report saved with `screen --output report.json`.
    Show {
        report: PathBuf,

        #[arg(long)]
        sort_by: Option<RankingMetric>,

        #[arg(long, default_value_t = false)]
        passing_only: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_format);

    let mut config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    };
    if let Commands::Show {
        report,
        sort_by,
        passing_only,
    } = &cli.command
    {
        let report = load_report(report)?;
        print_report(&report, *sort_by, *passing_only);
        return Ok(());
    }
    let source = build_source(&cli)?;

    match cli.command {
        Commands::Signals {
            identifier,
            lookback,
            export,
        } => run_signals(&config, source, &identifier, lookback, export.as_deref()),
        Commands::Returns {
            identifier,
            lookback,
            holding_weeks,
            risk_free,
            export,
        } => {
            if let Some(weeks) = holding_weeks {
                config.analysis.holding_period_weeks = weeks;
            }
            if let Some(rate) = risk_free {
                config.analysis.risk_free_rate = rate;
            }
            if let Some(lookback) = lookback {
                config.screen.lookback = lookback;
            }
            config.validate()?;
            run_returns(&config, source, &identifier, export.as_deref())
        }
        Commands::Screen {
            identifiers,
            universe,
            sector,
            list,
            hk_code,
            lookback,
            holding_weeks,
            min_return,
            max_volatility,
            max_concurrency,
            timeout_secs,
            sort_by,
            passing_only,
            output,
        } => {
            if let Some(lookback) = lookback {
                config.screen.lookback = lookback;
            }
            if let Some(weeks) = holding_weeks {
                config.analysis.holding_period_weeks = weeks;
            }
            if let Some(threshold) = min_return {
                config.screen.return_threshold = threshold;
            }
            if let Some(threshold) = max_volatility {
                config.screen.volatility_threshold = threshold;
            }
            if let Some(n) = max_concurrency {
                config.screen.max_concurrency = n;
            }
            if let Some(secs) = timeout_secs {
                config.screen.fetch_timeout_secs = secs;
            }
            config.validate()?;

            let ids = collect_identifiers(
                identifiers,
                universe.as_deref(),
                &sector,
                list.as_deref(),
                &hk_code,
            )?;
            run_screen(&config, source, &ids, sort_by, passing_only, output.as_deref())
        }
        Commands::Correlate {
            identifiers,
            target,
            threshold,
            lookback,
        } => run_correlate(&config, source, identifiers, &target, threshold, lookback),
        Commands::Show { .. } => Ok(()),
    }
}

fn build_source(cli: &Cli) -> Result<Arc<dyn PriceSource>> {
    if cli.synthetic && cli.csv_dir.is_some() {
        bail!("--synthetic and --csv-dir are mutually exclusive");
    }
    let source: Arc<dyn PriceSource> = if cli.synthetic {
        tracing::warn!(seed = cli.seed, "using synthetic prices; results are not market data");
        Arc::new(SyntheticSource::ending_today(cli.seed))
    } else if let Some(dir) = &cli.csv_dir {
        if !dir.is_dir() {
            bail!("CSV directory does not exist: {}", dir.display());
        }
        Arc::new(CsvSource::new(dir))
    } else {
        let circuit_breaker = Arc::new(CircuitBreaker::default_provider());
        Arc::new(YahooSource::new(circuit_breaker)?)
    };
    Ok(source)
}

fn fetch(
    config: &AppConfig,
    source: &Arc<dyn PriceSource>,
    identifier: &str,
    lookback: LookbackPeriod,
    limiter: &FetchLimiter,
) -> Result<PriceSeries> {
    let timeout = Duration::from_secs(config.screen.fetch_timeout_secs);
    fetch_with_timeout(Arc::clone(source), identifier, lookback, timeout, limiter)
        .with_context(|| format!("failed to retrieve prices for {identifier}"))
}

fn run_signals(
    config: &AppConfig,
    source: Arc<dyn PriceSource>,
    identifier: &str,
    lookback: LookbackPeriod,
    export: Option<&Path>,
) -> Result<()> {
    let series = fetch(config, &source, identifier, lookback, &FetchLimiter::new(1))?;
    let analysis = analyze_signals(series, &config.indicators)?;

    println!("Signals for {identifier} ({lookback}, {} sessions)", analysis.series.len());
    println!("{:<12} {:<5} {:>12}", "date", "kind", "price");
    for marker in analysis.fired() {
        let kind = match marker.kind {
            Some(SignalKind::Buy) => "BUY",
            Some(SignalKind::Sell) => "SELL",
            None => continue,
        };
        println!("{:<12} {:<5} {:>12.4}", marker.date, kind, marker.price);
    }
    println!(
        "{} buys, {} sells",
        analysis.buys().count(),
        analysis.sells().count()
    );

    if let Some(path) = export {
        write_text(path, &export_chart_csv(&analysis)?)?;
        println!("Chart data saved to: {}", path.display());
    }
    Ok(())
}

fn run_returns(
    config: &AppConfig,
    source: Arc<dyn PriceSource>,
    identifier: &str,
    export: Option<&Path>,
) -> Result<()> {
    let series = fetch(
        config,
        &source,
        identifier,
        config.screen.lookback,
        &FetchLimiter::new(1),
    )?;
    let analysis = analyze_returns(&series, &config.analysis);
    let stats = analysis.statistics;

    println!(
        "{identifier}: {}-week forward returns over {} ({} observations)",
        config.analysis.holding_period_weeks,
        config.screen.lookback,
        analysis.observation_count()
    );
    if stats.is_unusable() {
        println!("  no buy date has a matching exit session; nothing to summarize");
    } else {
        println!("  mean return   {:>10.4}", stats.mean_return);
        println!("  return stddev {:>10.4}", stats.return_stddev);
        println!(
            "  sharpe ratio  {:>10.4}  (risk-free {})",
            stats.sharpe_ratio, config.analysis.risk_free_rate
        );
    }

    if let Some(path) = export {
        write_text(path, &export_observations_csv(&analysis)?)?;
        println!("Observations saved to: {}", path.display());
    }
    Ok(())
}

fn collect_identifiers(
    mut identifiers: Vec<String>,
    universe: Option<&Path>,
    sectors: &[String],
    list: Option<&Path>,
    hk_codes: &[u32],
) -> Result<Vec<String>> {
    if let Some(path) = universe {
        let mut universe = Universe::from_file(path)?;
        if !sectors.is_empty() {
            universe = universe.select(sectors)?;
        }
        tracing::info!(sectors = ?universe.sector_names(), "loaded universe");
        identifiers.extend(universe.identifiers()?);
    } else if !sectors.is_empty() {
        bail!("--sector requires --universe");
    }
    if let Some(path) = list {
        identifiers.extend(StaticUniverse::from_file(path)?.identifiers()?);
    }
    if !hk_codes.is_empty() {
        identifiers.extend(StaticUniverse::from_hk_codes(hk_codes).identifiers()?);
    }
    if identifiers.is_empty() {
        let watchlist = Universe::default_watchlist();
        tracing::info!(
            count = watchlist.ticker_count(),
            "no identifiers given; screening the default watch list"
        );
        identifiers = watchlist.identifiers()?;
    }

    let mut seen = std::collections::HashSet::new();
    identifiers.retain(|id| seen.insert(id.clone()));
    Ok(identifiers)
}

fn run_screen(
    config: &AppConfig,
    source: Arc<dyn PriceSource>,
    identifiers: &[String],
    sort_by: Option<RankingMetric>,
    passing_only: bool,
    output: Option<&Path>,
) -> Result<()> {
    let report = screen_universe(identifiers, source, config)?;
    print_report(&report, sort_by, passing_only);

    if let Some(path) = output {
        save_report(&report, path)?;
        println!("Report saved to: {}", path.display());
    }
    Ok(())
}

fn print_report(report: &ScreeningReport, sort_by: Option<RankingMetric>, passing_only: bool) {
    let rows: Vec<&ScreeningRow> = match sort_by {
        Some(metric) => {
            println!("Ranked by {}", metric.label());
            report.ranked(metric)
        }
        None => report.rows.iter().collect(),
    };

    println!(
        "{:<12} {:>10} {:>10} {:>8} {:>6}  {}",
        "identifier", "mean", "stddev", "sharpe", "obs", "result"
    );
    for row in rows.into_iter().filter(|r| !passing_only || r.passed) {
        let result = match &row.status {
            RowStatus::Ok if row.passed => "PASS".to_string(),
            RowStatus::Ok => "fail".to_string(),
            RowStatus::NoObservations => "no observations".to_string(),
            RowStatus::DataUnavailable { reason } => format!("unavailable: {reason}"),
        };
        println!(
            "{:<12} {:>10.4} {:>10.4} {:>8.3} {:>6}  {}",
            row.identifier,
            row.statistics.mean_return,
            row.statistics.return_stddev,
            row.statistics.sharpe_ratio,
            row.observation_count,
            result
        );
    }
    println!(
        "{} of {} passed (mean >= {}, stddev <= {}, {}-week hold, {} data)",
        report.pass_count(),
        report.rows.len(),
        report.return_threshold,
        report.volatility_threshold,
        report.holding_period_weeks,
        report.source
    );
}

fn run_correlate(
    config: &AppConfig,
    source: Arc<dyn PriceSource>,
    mut identifiers: Vec<String>,
    target: &str,
    threshold: f64,
    lookback: LookbackPeriod,
) -> Result<()> {
    if !identifiers.iter().any(|id| id == target) {
        identifiers.insert(0, target.to_string());
    }

    let limiter = FetchLimiter::new(config.screen.max_concurrency);
    let mut series = Vec::with_capacity(identifiers.len());
    for identifier in &identifiers {
        match fetch(config, &source, identifier, lookback, &limiter) {
            Ok(s) => series.push(s),
            Err(e) if identifier == target => return Err(e),
            Err(e) => tracing::warn!(identifier = identifier.as_str(), error = %e, "skipping"),
        }
    }

    let matrix = CorrelationMatrix::from_series(&series);
    let peers = matrix
        .correlated_with(target, threshold)
        .with_context(|| format!("{target} missing from correlation matrix"))?;

    if peers.is_empty() {
        println!("No identifier correlates with {target} above {threshold}");
        return Ok(());
    }
    println!("Correlated with {target} (> {threshold}, {lookback}):");
    for peer in peers {
        println!("  {:<12} {:>7.4}", peer.identifier, peer.correlation);
    }
    Ok(())
}
