//! Signal markers and the position state they are derived from.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Which way a marker fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalKind {
    Buy,
    Sell,
}

/// Position state tracked across a whole series.
///
/// `Unset` is distinct from `Flat`: a sell-eligible bar seen while `Unset`
/// does not fire (see `signals::SignalStateMachine`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PositionState {
    #[default]
    Unset,
    Flat,
    Long,
}

/// Per-session marker. `kind == None` means no signal on that session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalMarker {
    pub date: NaiveDate,
    pub price: f64,
    pub kind: Option<SignalKind>,
}

impl SignalMarker {
    pub fn is_buy(&self) -> bool {
        self.kind == Some(SignalKind::Buy)
    }

    pub fn is_sell(&self) -> bool {
        self.kind == Some(SignalKind::Sell)
    }
}
