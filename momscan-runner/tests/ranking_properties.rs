//! Property tests for ranking and correlation.

use chrono::Utc;
use momscan_core::analysis::ReturnStatistics;
use momscan_core::data::{DataSource, LookbackPeriod};
use momscan_runner::correlation::pearson;
use momscan_runner::{RankingMetric, RowStatus, ScreeningReport, ScreeningRow, SCHEMA_VERSION};
use proptest::prelude::*;

fn arb_row() -> impl Strategy<Value = (bool, f64, f64, f64)> {
    (
        any::<bool>(),
        -0.5f64..0.5,
        0.0f64..0.2,
        -5.0f64..5.0,
    )
}

fn report_from(rows: &[(bool, f64, f64, f64)]) -> ScreeningReport {
    let rows = rows
        .iter()
        .enumerate()
        .map(|(i, &(usable, mean, std, sharpe))| {
            if usable {
                ScreeningRow {
                    identifier: format!("S{i}"),
                    statistics: ReturnStatistics {
                        mean_return: mean,
                        return_stddev: std,
                        sharpe_ratio: sharpe,
                    },
                    observation_count: 5,
                    passed: false,
                    status: RowStatus::Ok,
                }
            } else {
                ScreeningRow {
                    identifier: format!("S{i}"),
                    statistics: ReturnStatistics::UNUSABLE,
                    observation_count: 0,
                    passed: false,
                    status: RowStatus::DataUnavailable {
                        reason: "missing".into(),
                    },
                }
            }
        })
        .collect();

    ScreeningReport {
        schema_version: SCHEMA_VERSION,
        run_id: "prop".into(),
        source: DataSource::Synthetic,
        generated_at: Utc::now(),
        holding_period_weeks: 4,
        lookback: LookbackPeriod::Months(6),
        return_threshold: 0.05,
        volatility_threshold: 0.03,
        rows,
    }
}

proptest! {
    #[test]
    fn ranked_puts_sentinel_rows_last(rows in prop::collection::vec(arb_row(), 0..30)) {
        let report = report_from(&rows);
        for metric in [RankingMetric::MeanReturn, RankingMetric::Volatility, RankingMetric::Sharpe] {
            let ranked = report.ranked(metric);
            prop_assert_eq!(ranked.len(), report.rows.len());

            let first_unusable = ranked.iter().position(|r| r.statistics.is_unusable());
            if let Some(pos) = first_unusable {
                prop_assert!(ranked[pos..].iter().all(|r| r.statistics.is_unusable()));
            }
        }
    }

    #[test]
    fn ranked_by_mean_is_descending(rows in prop::collection::vec(arb_row(), 0..30)) {
        let report = report_from(&rows);
        let ranked = report.ranked(RankingMetric::MeanReturn);
        for pair in ranked.windows(2) {
            prop_assert!(pair[0].statistics.mean_return >= pair[1].statistics.mean_return);
        }
    }

    #[test]
    fn ranked_by_volatility_is_ascending(rows in prop::collection::vec(arb_row(), 0..30)) {
        let report = report_from(&rows);
        let ranked = report.ranked(RankingMetric::Volatility);
        for pair in ranked.windows(2) {
            prop_assert!(pair[0].statistics.return_stddev <= pair[1].statistics.return_stddev);
        }
    }

    #[test]
    fn pearson_is_symmetric_and_bounded(
        pairs in prop::collection::vec((-100.0f64..100.0, -100.0f64..100.0), 0..50)
    ) {
        let a: Vec<f64> = pairs.iter().map(|p| p.0).collect();
        let b: Vec<f64> = pairs.iter().map(|p| p.1).collect();
        let ab = pearson(&a, &b);
        let ba = pearson(&b, &a);

        if ab.is_nan() {
            prop_assert!(ba.is_nan());
        } else {
            prop_assert!((-1.0..=1.0).contains(&ab));
            prop_assert!((ab - ba).abs() < 1e-9);
        }
    }
}
