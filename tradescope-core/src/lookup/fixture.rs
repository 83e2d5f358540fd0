//! In-memory reference data, loadable from a JSON fixture file.
//!
//! Backs offline CLI runs and tests. Fixture layout:
//!
//! ```json
//! {
//!   "accounts": [{"id": 22214, "displayName": "Test Account 20"}],
//!   "stocks": [{"ticker": "MSFT", "companyName": "Microsoft Corporation"}],
//!   "points": {"22214": ["2024-01-02T09:30", "2024-01-03T09:30"]}
//! }
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{AccountDirectory, LookupError, PricePointLookup, StockDirectory};
use crate::domain::{Account, AccountId, Stock, TradePoint};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixtureReferenceData {
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub stocks: Vec<Stock>,
    #[serde(default)]
    pub points: BTreeMap<AccountId, Vec<TradePoint>>,
    /// Accounts whose point lookup fails as if the price service were down.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub unreachable: BTreeSet<AccountId>,
}

impl FixtureReferenceData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a fixture from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, LookupError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| LookupError::Fixture(format!("read {}: {e}", path.display())))?;
        Self::from_json(&content)
    }

    /// Parse a fixture from a JSON string.
    pub fn from_json(content: &str) -> Result<Self, LookupError> {
        serde_json::from_str(content).map_err(|e| LookupError::Fixture(format!("parse fixture: {e}")))
    }

    pub fn with_account(mut self, account: Account) -> Self {
        self.accounts.push(account);
        self
    }

    pub fn with_stock(mut self, stock: Stock) -> Self {
        self.stocks.push(stock);
        self
    }

    pub fn with_points<I, P>(mut self, account_id: AccountId, points: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<TradePoint>,
    {
        self.points
            .insert(account_id, points.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_unreachable_account(mut self, account_id: AccountId) -> Self {
        self.unreachable.insert(account_id);
        self
    }

    /// Sample directory with eight accounts, a handful of stocks and hourly points.
    pub fn sample() -> Self {
        let names: [(u64, &str); 8] = [
            (22214, "Test Account 20"),
            (11413, "Private Clients Fund TTXX"),
            (42422, "Algo Execution Partners"),
            (52355, "Big Corporate Fund"),
            (62654, "Hedge Fund TXY1"),
            (10031, "Internal Trading Book"),
            (44044, "Trading Account 1"),
            (31231, "Retail Flow Desk"),
        ];
        let mut fixture = Self::new();
        for (i, (id, name)) in names.into_iter().enumerate() {
            fixture = fixture.with_account(Account::new(id, name));
            let points: Vec<String> = (0..(3 + i))
                .map(|h| format!("2024-03-{:02}T{:02}:00", 1 + i, 9 + h))
                .collect();
            fixture = fixture.with_points(AccountId(id), points);
        }
        for (ticker, company) in [
            ("AAPL", "Apple Inc."),
            ("MSFT", "Microsoft Corporation"),
            ("IBM", "International Business Machines Corporation"),
            ("NVDA", "NVIDIA Corporation"),
        ] {
            fixture = fixture.with_stock(Stock::new(ticker, company));
        }
        fixture
    }
}

impl AccountDirectory for FixtureReferenceData {
    fn accounts(&self) -> Result<Vec<Account>, LookupError> {
        Ok(self.accounts.clone())
    }
}

impl StockDirectory for FixtureReferenceData {
    fn stocks(&self) -> Result<Vec<Stock>, LookupError> {
        Ok(self.stocks.clone())
    }
}

impl PricePointLookup for FixtureReferenceData {
    fn points_in_time(&self, account_id: AccountId) -> Result<Vec<TradePoint>, LookupError> {
        if self.unreachable.contains(&account_id) {
            return Err(LookupError::Unreachable(format!(
                "price points for account {account_id}"
            )));
        }
        Ok(self.points.get(&account_id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_account_has_no_points() {
        let fixture = FixtureReferenceData::new();
        assert!(fixture.points_in_time(AccountId(1)).unwrap().is_empty());
    }

    #[test]
    fn unreachable_account_fails_lookup() {
        let fixture = FixtureReferenceData::new()
            .with_points(AccountId(1), ["t0"])
            .with_unreachable_account(AccountId(1));
        assert!(matches!(
            fixture.points_in_time(AccountId(1)),
            Err(LookupError::Unreachable(_))
        ));
    }

    #[test]
    fn json_fixture_parses_string_keyed_points() {
        let json = r#"{
            "accounts": [{"id": 22214, "displayName": "Test Account 20"}],
            "points": {"22214": ["t0", "t1"]}
        }"#;
        let fixture = FixtureReferenceData::from_json(json).unwrap();
        assert_eq!(fixture.accounts().unwrap().len(), 1);
        assert!(fixture.stocks().unwrap().is_empty());
        let points = fixture.points_in_time(AccountId(22214)).unwrap();
        assert_eq!(points, vec![TradePoint::from("t0"), TradePoint::from("t1")]);
    }

    #[test]
    fn malformed_fixture_is_a_fixture_error() {
        let err = FixtureReferenceData::from_json("{ nope").unwrap_err();
        assert!(matches!(err, LookupError::Fixture(_)));
    }

    #[test]
    fn fixture_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fixture.json");
        let sample = FixtureReferenceData::sample();
        std::fs::write(&path, serde_json::to_string_pretty(&sample).unwrap()).unwrap();

        let loaded = FixtureReferenceData::from_file(&path).unwrap();
        assert_eq!(loaded.accounts, sample.accounts);
        assert_eq!(loaded.points, sample.points);
    }

    #[test]
    fn sample_has_more_than_six_accounts() {
        let sample = FixtureReferenceData::sample();
        assert!(sample.accounts.len() > 5);
        let sixth = &sample.accounts[5];
        assert!(!sample.points_in_time(sixth.id).unwrap().is_empty());
    }
}
