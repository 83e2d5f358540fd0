//! Range readings and the trade interval derived from them.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::account::AccountId;
use super::points::TradePoint;

/// Text rendered in an interval label for a side with no trade point.
pub const OPEN_LABEL: &str = "...";

/// Raw handle positions reported by the dual-handle range control.
///
/// Nothing here is validated: `low` may exceed `high`, and either may point past
/// the end of the catalog. `high` past the last point means "open-ended".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RangeReading {
    pub low: usize,
    pub high: usize,
}

impl RangeReading {
    pub fn new(low: usize, high: usize) -> Self {
        Self { low, high }
    }

    pub fn is_inverted(&self) -> bool {
        self.low > self.high
    }
}

/// Right-hand side of a trade interval.
///
/// Serializes as the point label, or `null` when open.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<TradePoint>", into = "Option<TradePoint>")]
pub enum IntervalEnd {
    /// Ends at a specific trade point.
    Bounded(TradePoint),
    /// Runs past the last known trade point ("All").
    Open,
}

impl IntervalEnd {
    pub fn point(&self) -> Option<&TradePoint> {
        match self {
            IntervalEnd::Bounded(p) => Some(p),
            IntervalEnd::Open => None,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, IntervalEnd::Open)
    }
}

impl From<Option<TradePoint>> for IntervalEnd {
    fn from(point: Option<TradePoint>) -> Self {
        point.map_or(IntervalEnd::Open, IntervalEnd::Bounded)
    }
}

impl From<IntervalEnd> for Option<TradePoint> {
    fn from(end: IntervalEnd) -> Self {
        match end {
            IntervalEnd::Bounded(p) => Some(p),
            IntervalEnd::Open => None,
        }
    }
}

impl fmt::Display for IntervalEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntervalEnd::Bounded(p) => write!(f, "{p}"),
            IntervalEnd::Open => f.write_str(OPEN_LABEL),
        }
    }
}

/// Display-ready interval derived from one range reading.
///
/// Built fresh on every range interaction; there is no identity across
/// recomputations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeInterval {
    pub start: Option<TradePoint>,
    pub end: IntervalEnd,
    pub account_id: AccountId,
    pub label: String,
}

impl TradeInterval {
    /// Render `"{start} - {end}"`, using [`OPEN_LABEL`] for a missing side.
    pub fn render_label(start: Option<&TradePoint>, end: &IntervalEnd) -> String {
        match start {
            Some(s) => format!("{s} - {end}"),
            None => format!("{OPEN_LABEL} - {end}"),
        }
    }
}

impl fmt::Display for TradeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.account_id, self.label)
    }
}
