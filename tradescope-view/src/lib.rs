//! Tradescope View - state coordination for the trade report screen
//!
//! Owns the stateful side of the report:
//! - Account and stock directories, loaded independently at startup
//! - Default account selection and manual re-selection
//! - Point catalog refresh with stale-completion discard
//! - Range control visibility and interval projection
//! - Account announcements on the trade feed

pub mod coordinator;
pub mod selection;
pub mod session;
pub mod worker;

pub use coordinator::{
    Completion, Directory, DirectoryState, RangeHandles, SelectionCoordinator, ViewEvent,
};
pub use selection::{default_account, Generation, RefreshTicket};
pub use session::ReportSession;
pub use worker::{spawn_worker, WorkerCommand, WorkerResponse};
