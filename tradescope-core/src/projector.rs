//! Projection of raw range readings onto the point catalog.

use crate::domain::{Account, AccountId, IntervalEnd, PointCatalog, RangeReading, TradeInterval};

/// Account id reported on an interval when no account is selected.
///
/// A placeholder, not a real account.
pub const FALLBACK_ACCOUNT_ID: AccountId = AccountId(52355);

/// Maps a [`RangeReading`] to a [`TradeInterval`].
///
/// Never fails: out-of-range indices are clamped or treated as open-ended.
pub struct IntervalProjector;

impl IntervalProjector {
    /// Low handle position after clamping to `[0, len]`.
    pub fn clamp_low(reading: RangeReading, catalog: &PointCatalog) -> usize {
        reading.low.min(catalog.len())
    }

    pub fn project(
        reading: RangeReading,
        catalog: &PointCatalog,
        selected: Option<&Account>,
    ) -> TradeInterval {
        let low = Self::clamp_low(reading, catalog);
        let start = catalog.get(low).cloned();

        // `high` at or past the end has no point behind it.
        let end = match catalog.get(reading.high) {
            Some(point) => IntervalEnd::Bounded(point.clone()),
            None => IntervalEnd::Open,
        };

        let label = TradeInterval::render_label(start.as_ref(), &end);
        let account_id = selected.map_or(FALLBACK_ACCOUNT_ID, |a| a.id);

        TradeInterval {
            start,
            end,
            account_id,
            label,
        }
    }
}
