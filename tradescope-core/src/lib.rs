//! Tradescope Core — domain types and pure derivations for the trade report view.
//!
//! This crate contains everything the report screen needs that does not own state:
//! - Domain types (accounts, stocks, trade points, readings, intervals)
//! - Range control configuration derived from a point catalog
//! - Interval projection from raw range readings
//! - Lookup traits for the account, stock and price-point services, plus adapters
//! - The trade feed channel used to announce account selection
//! - TOML configuration

pub mod config;
pub mod domain;
pub mod feed;
pub mod lookup;
pub mod projector;
pub mod range_control;

pub use config::{ConfigError, ReportConfig, ServicesConfig, DEFAULT_ACCOUNT_INDEX};
pub use domain::{
    Account, AccountId, IntervalEnd, PointCatalog, RangeReading, Stock, TradeInterval, TradePoint,
};
pub use feed::{publish_json, FeedBus, FeedError, FeedMessage, TradeFeed, ACCOUNT_TOPIC};
pub use lookup::{
    AccountDirectory, FixtureReferenceData, HttpReferenceData, LookupError, PricePointLookup,
    ReportServices, StockDirectory,
};
pub use projector::{IntervalProjector, FALLBACK_ACCOUNT_ID};
pub use range_control::{RangeControlConfig, ALL_TICK_LABEL};
