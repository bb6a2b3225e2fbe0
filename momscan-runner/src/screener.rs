//! Universe screener: analyze many identifiers concurrently.
//!
//! Each identifier is an independent task: fetch (deadline-bounded) →
//! forward-return analysis → pass/fail row. Tasks run on a private rayon pool
//! of `max_concurrency` threads and calls into the source share a
//! `FetchLimiter` of the same size, so timed-out fetches that are still
//! running count against the bound. Results are collected in input order. A
//! task never fails: any retrieval problem becomes a sentinel row.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use rayon::prelude::*;
use thiserror::Error;

use momscan_core::analysis::{analyze_fetch, AnalysisOutcome, ReturnStatistics};
use momscan_core::data::PriceSource;

use crate::config::{AppConfig, ConfigError};
use crate::fetch::{fetch_with_timeout, FetchLimiter};
use crate::report::{RowStatus, ScreeningReport, ScreeningRow, SCHEMA_VERSION};

#[derive(Debug, Error)]
pub enum ScreenError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to build screening thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// `mean >= return_threshold && stddev <= volatility_threshold`.
///
/// The sentinel (-inf, +inf) never passes.
pub fn passes(statistics: &ReturnStatistics, return_threshold: f64, volatility_threshold: f64) -> bool {
    statistics.mean_return >= return_threshold && statistics.return_stddev <= volatility_threshold
}

/// Screen `identifiers` against `source` with the thresholds in `config`.
pub fn screen_universe(
    identifiers: &[String],
    source: Arc<dyn PriceSource>,
    config: &AppConfig,
) -> Result<ScreeningReport, ScreenError> {
    config.validate()?;
    let run_id = config.run_id()?;
    let settings = &config.screen;
    let timeout = Duration::from_secs(settings.fetch_timeout_secs);
    let limiter = FetchLimiter::new(settings.max_concurrency);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(settings.max_concurrency)
        .thread_name(|i| format!("momscan-screen-{i}"))
        .build()?;

    tracing::info!(
        identifiers = identifiers.len(),
        source = source.name(),
        kind = %source.kind(),
        max_concurrency = settings.max_concurrency,
        lookback = %settings.lookback,
        holding_period_weeks = config.analysis.holding_period_weeks,
        "screening universe"
    );
    let started = Instant::now();

    let rows: Vec<ScreeningRow> = pool.install(|| {
        identifiers
            .par_iter()
            .map(|identifier| {
                let fetched = fetch_with_timeout(
                    Arc::clone(&source),
                    identifier,
                    settings.lookback,
                    timeout,
                    &limiter,
                );
                screen_one(identifier, analyze_fetch(fetched, &config.analysis), config)
            })
            .collect()
    });

    let report = ScreeningReport {
        schema_version: SCHEMA_VERSION,
        run_id,
        source: source.kind(),
        generated_at: Utc::now(),
        holding_period_weeks: config.analysis.holding_period_weeks,
        lookback: settings.lookback,
        return_threshold: settings.return_threshold,
        volatility_threshold: settings.volatility_threshold,
        rows,
    };

    tracing::info!(
        screened = report.rows.len(),
        passed = report.pass_count(),
        unavailable = report.unavailable_count(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "screening complete"
    );
    Ok(report)
}

fn screen_one(identifier: &str, outcome: AnalysisOutcome, config: &AppConfig) -> ScreeningRow {
    let statistics = outcome.statistics();
    let observation_count = outcome.observation_count();
    let status = match outcome {
        AnalysisOutcome::DataUnavailable(e) => {
            tracing::warn!(identifier, error = %e, "no data; recording sentinel row");
            RowStatus::DataUnavailable {
                reason: e.to_string(),
            }
        }
        AnalysisOutcome::Analyzed(_) if observation_count == 0 => {
            tracing::debug!(identifier, "no forward-return observations");
            RowStatus::NoObservations
        }
        AnalysisOutcome::Analyzed(_) => RowStatus::Ok,
    };
    let passed = passes(
        &statistics,
        config.screen.return_threshold,
        config.screen.volatility_threshold,
    );
    tracing::debug!(
        identifier,
        mean_return = statistics.mean_return,
        return_stddev = statistics.return_stddev,
        passed,
        "screened"
    );

    ScreeningRow {
        identifier: identifier.to_string(),
        statistics,
        observation_count,
        passed,
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_never_passes() {
        assert!(!passes(&ReturnStatistics::UNUSABLE, f64::MIN, f64::MAX));
    }

    #[test]
    fn thresholds_are_inclusive() {
        let stats = ReturnStatistics {
            mean_return: 0.05,
            return_stddev: 0.03,
            sharpe_ratio: 1.0,
        };
        assert!(passes(&stats, 0.05, 0.03));
        assert!(!passes(&stats, 0.0500001, 0.03));
        assert!(!passes(&stats, 0.05, 0.0299999));
    }
}
