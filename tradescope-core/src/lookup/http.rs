//! HTTP-backed lookups against the account, reference-data and price services.
//!
//! Each lookup is a single blocking GET decoded from JSON. No retries: a failure
//! is reported to the caller and the view stays in its empty state.

use std::time::Duration;

use serde::de::DeserializeOwned;

use super::{AccountDirectory, LookupError, PricePointLookup, StockDirectory};
use crate::config::ServicesConfig;
use crate::domain::{Account, AccountId, Stock, TradePoint};

pub struct HttpReferenceData {
    client: reqwest::blocking::Client,
    accounts_url: String,
    reference_data_url: String,
    prices_url: String,
}

impl HttpReferenceData {
    pub fn new(config: &ServicesConfig) -> Result<Self, LookupError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LookupError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            accounts_url: trim_base(&config.accounts_url),
            reference_data_url: trim_base(&config.reference_data_url),
            prices_url: trim_base(&config.prices_url),
        })
    }

    pub fn accounts_endpoint(&self) -> String {
        format!("{}/account/", self.accounts_url)
    }

    pub fn stocks_endpoint(&self) -> String {
        format!("{}/stocks", self.reference_data_url)
    }

    pub fn points_endpoint(&self, account_id: AccountId) -> String {
        format!("{}/points/{account_id}", self.prices_url)
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, LookupError> {
        log::debug!("GET {url}");
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| LookupError::Unreachable(format!("{url}: {e}")))?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LookupError::NotFound {
                resource: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(LookupError::Status {
                status: status.as_u16(),
                resource: url.to_string(),
            });
        }

        resp.json::<T>()
            .map_err(|e| LookupError::Decode(format!("failed to parse response from {url}: {e}")))
    }
}

fn trim_base(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

impl AccountDirectory for HttpReferenceData {
    fn accounts(&self) -> Result<Vec<Account>, LookupError> {
        self.get_json(&self.accounts_endpoint())
    }
}

impl StockDirectory for HttpReferenceData {
    fn stocks(&self) -> Result<Vec<Stock>, LookupError> {
        self.get_json(&self.stocks_endpoint())
    }
}

impl PricePointLookup for HttpReferenceData {
    fn points_in_time(&self, account_id: AccountId) -> Result<Vec<TradePoint>, LookupError> {
        self.get_json(&self.points_endpoint(account_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn services() -> ServicesConfig {
        ServicesConfig {
            accounts_url: "http://accounts.local:18088/".into(),
            reference_data_url: "http://refdata.local:18085".into(),
            prices_url: "http://prices.local:18090/api/".into(),
            timeout_secs: 5,
        }
    }

    #[test]
    fn endpoints_join_without_double_slashes() {
        let http = HttpReferenceData::new(&services()).unwrap();
        assert_eq!(http.accounts_endpoint(), "http://accounts.local:18088/account/");
        assert_eq!(http.stocks_endpoint(), "http://refdata.local:18085/stocks");
        assert_eq!(
            http.points_endpoint(AccountId(22214)),
            "http://prices.local:18090/api/points/22214"
        );
    }

    #[test]
    fn unreachable_service_reports_unreachable() {
        let mut config = services();
        // Port 9 (discard) on localhost is not expected to serve HTTP.
        config.accounts_url = "http://127.0.0.1:9".into();
        config.timeout_secs = 1;
        let http = HttpReferenceData::new(&config).unwrap();
        assert!(matches!(http.accounts(), Err(LookupError::Unreachable(_))));
    }
}
