//! Trade points and the per-account point catalog.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque label for a moment at which trade data exists.
///
/// The content is never parsed; only its position in a catalog matters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TradePoint(pub String);

impl TradePoint {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TradePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TradePoint {
    fn from(label: &str) -> Self {
        Self(label.to_string())
    }
}

impl From<String> for TradePoint {
    fn from(label: String) -> Self {
        Self(label)
    }
}

/// Ordered trade points for one account, oldest first.
///
/// Indices into the catalog are the contract shared with the range control.
/// A catalog is replaced wholesale on refresh and never edited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointCatalog {
    points: Vec<TradePoint>,
}

impl PointCatalog {
    pub fn new(points: Vec<TradePoint>) -> Self {
        Self { points }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Point at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<&TradePoint> {
        self.points.get(index)
    }

    pub fn points(&self) -> &[TradePoint] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = &TradePoint> {
        self.points.iter()
    }
}

impl<S: Into<TradePoint>> FromIterator<S> for PointCatalog {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_preserves_insertion_order() {
        let catalog: PointCatalog = ["t0", "t1", "t2"].into_iter().collect();
        let labels: Vec<&str> = catalog.iter().map(|p| p.as_str()).collect();
        assert_eq!(labels, vec!["t0", "t1", "t2"]);
    }

    #[test]
    fn get_past_end_is_none() {
        let catalog: PointCatalog = ["t0"].into_iter().collect();
        assert_eq!(catalog.get(0), Some(&TradePoint::from("t0")));
        assert!(catalog.get(1).is_none());
    }

    #[test]
    fn catalog_deserializes_from_plain_string_array() {
        let catalog: PointCatalog =
            serde_json::from_str(r#"["2024-01-02T09:30", "2024-01-03T09:30"]"#).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(1).unwrap().as_str(), "2024-01-03T09:30");
    }
}
