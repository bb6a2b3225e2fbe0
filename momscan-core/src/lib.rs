//! MomScan Core — momentum indicators, signal state machine, forward-return analysis.
//!
//! This crate contains the per-instrument pipeline:
//! - Domain types (price series, signal markers, position state)
//! - EMA / MACD / trend indicator computation
//! - Buy/sell signal state machine over the indicator set
//! - Forward-return observations and mean / stddev / Sharpe statistics
//! - Price sources (Yahoo chart API, CSV directory, in-memory) and universes

pub mod analysis;
pub mod data;
pub mod domain;
pub mod indicators;
pub mod signals;
