//! Dual-handle range control configuration.
//!
//! The control indexes into the point catalog: tick `i` sits on point `i`, and
//! one extra tick at `len` stands for "everything after the last point".

use serde::{Deserialize, Serialize};

use crate::domain::PointCatalog;

/// Label of the tick one past the last trade point.
pub const ALL_TICK_LABEL: &str = "All";

/// Bounds and tick settings for the range control.
///
/// `ceil` always equals the length of the catalog it was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeControlConfig {
    pub floor: usize,
    pub ceil: usize,
    pub step: usize,
    pub show_ticks: bool,
    pub show_ticks_values: bool,
}

impl RangeControlConfig {
    /// Configuration for a catalog of `len` points.
    pub fn for_len(len: usize) -> Self {
        Self {
            floor: 0,
            ceil: len,
            step: 1,
            show_ticks: true,
            show_ticks_values: true,
        }
    }

    pub fn for_catalog(catalog: &PointCatalog) -> Self {
        Self::for_len(catalog.len())
    }

    /// Positional tick label. Presentational only: it never reflects point content.
    pub fn tick_label(&self, index: usize) -> String {
        if index == self.ceil {
            ALL_TICK_LABEL.to_string()
        } else {
            format!("v{index}")
        }
    }

    /// Labels for every tick from `floor` through `ceil`, stepping by `step`.
    pub fn tick_labels(&self) -> Vec<String> {
        (self.floor..=self.ceil)
            .step_by(self.step.max(1))
            .map(|i| self.tick_label(i))
            .collect()
    }

    /// Whether there is anything to show. An empty catalog keeps the control hidden.
    pub fn has_points(&self) -> bool {
        self.ceil > self.floor
    }
}
