//! Domain types for the trade report view

pub mod account;
pub mod interval;
pub mod points;

pub use account::{Account, AccountId, Stock};
pub use interval::{IntervalEnd, RangeReading, TradeInterval};
pub use points::{PointCatalog, TradePoint};
