//! Lookup traits for the services the report view reads from, and structured errors.
//!
//! The traits abstract over where directories and trade points come from (HTTP
//! services, a JSON fixture) so the view can be driven offline and mocked in tests.

pub mod fixture;
pub mod http;

use std::sync::Arc;

use thiserror::Error;

use crate::domain::{Account, AccountId, Stock, TradePoint};

pub use fixture::FixtureReferenceData;
pub use http::HttpReferenceData;

/// Structured error types for lookups.
///
/// Displayable in log lines and CLI output alike.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("service unreachable: {0}")]
    Unreachable(String),

    #[error("HTTP {status} from {resource}")]
    Status { status: u16, resource: String },

    #[error("response format changed: {0}")]
    Decode(String),

    #[error("not found: {resource}")]
    NotFound { resource: String },

    #[error("fixture error: {0}")]
    Fixture(String),

    #[error("lookup error: {0}")]
    Other(String),
}

/// Ordered listing of trading accounts.
pub trait AccountDirectory: Send + Sync {
    fn accounts(&self) -> Result<Vec<Account>, LookupError>;
}

/// Ordered listing of tradable stocks. Independent of account selection.
pub trait StockDirectory: Send + Sync {
    fn stocks(&self) -> Result<Vec<Stock>, LookupError>;
}

/// Trade points at which data exists for an account, oldest first.
pub trait PricePointLookup: Send + Sync {
    fn points_in_time(&self, account_id: AccountId) -> Result<Vec<TradePoint>, LookupError>;
}

/// The three lookup collaborators, shareable across worker threads.
#[derive(Clone)]
pub struct ReportServices {
    pub accounts: Arc<dyn AccountDirectory>,
    pub stocks: Arc<dyn StockDirectory>,
    pub prices: Arc<dyn PricePointLookup>,
}

impl ReportServices {
    /// Use one backend for all three lookups.
    pub fn from_backend<B>(backend: B) -> Self
    where
        B: AccountDirectory + StockDirectory + PricePointLookup + 'static,
    {
        let backend = Arc::new(backend);
        Self {
            accounts: backend.clone(),
            stocks: backend.clone(),
            prices: backend,
        }
    }
}

impl std::fmt::Debug for ReportServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportServices").finish_non_exhaustive()
    }
}
