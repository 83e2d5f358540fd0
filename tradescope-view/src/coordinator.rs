//! Selection coordinator: single-owner report view state.
//!
//! Owns the selected account, the point catalog and the range control. Lookups go
//! out to the worker over a channel; completions come back through
//! [`SelectionCoordinator::handle_response`]. Other views never touch this state:
//! they subscribe to [`ViewEvent`]s or listen on the trade feed.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use tradescope_core::feed::publish_json;
use tradescope_core::{
    Account, AccountId, IntervalProjector, PointCatalog, RangeControlConfig, RangeReading, Stock,
    TradeFeed, TradeInterval, TradePoint, ACCOUNT_TOPIC, DEFAULT_ACCOUNT_INDEX,
};

use crate::selection::{default_account, Generation, RefreshTicket};
use crate::worker::{WorkerCommand, WorkerResponse};

/// Which directory a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Directory {
    Accounts,
    Stocks,
}

impl Directory {
    pub fn label(self) -> &'static str {
        match self {
            Directory::Accounts => "accounts",
            Directory::Stocks => "stocks",
        }
    }
}

/// Load state of a directory lookup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DirectoryState {
    #[default]
    Pending,
    Loaded,
    Unavailable,
}

/// Range control handle positions. `low` is stored clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeHandles {
    pub low: usize,
    pub high: usize,
}

impl Default for RangeHandles {
    fn default() -> Self {
        Self { low: 0, high: 1 }
    }
}

/// Notifications for views that follow this one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    AccountsLoaded { count: usize },
    StocksLoaded { count: usize },
    DirectoryUnavailable { directory: Directory, reason: String },
    AccountSelected(Account),
    CatalogLoading { account_id: AccountId },
    CatalogReady {
        account_id: AccountId,
        points: usize,
        range_control: Option<RangeControlConfig>,
    },
    CatalogUnavailable { account_id: AccountId, reason: String },
    IntervalChanged(TradeInterval),
}

/// What happened to a worker response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// Superseded by a later selection; dropped without effect.
    Discarded,
    Failed,
}

pub struct SelectionCoordinator {
    accounts: Vec<Account>,
    accounts_state: DirectoryState,
    stocks: Vec<Stock>,
    stocks_state: DirectoryState,

    selected: Option<Account>,
    generation: Generation,
    pending: Option<RefreshTicket>,

    catalog: PointCatalog,
    range_control: Option<RangeControlConfig>,
    handles: RangeHandles,
    interval: Option<TradeInterval>,

    default_index: usize,
    worker_tx: Sender<WorkerCommand>,
    feed: Arc<dyn TradeFeed>,
    subscribers: Vec<Sender<ViewEvent>>,
}

impl SelectionCoordinator {
    pub fn new(worker_tx: Sender<WorkerCommand>, feed: Arc<dyn TradeFeed>) -> Self {
        Self {
            accounts: Vec::new(),
            accounts_state: DirectoryState::Pending,
            stocks: Vec::new(),
            stocks_state: DirectoryState::Pending,
            selected: None,
            generation: Generation::default(),
            pending: None,
            catalog: PointCatalog::empty(),
            range_control: None,
            handles: RangeHandles::default(),
            interval: None,
            default_index: DEFAULT_ACCOUNT_INDEX,
            worker_tx,
            feed,
            subscribers: Vec::new(),
        }
    }

    /// Directory position of the account auto-selected once accounts load.
    pub fn with_default_index(mut self, index: usize) -> Self {
        self.default_index = index;
        self
    }

    /// Request both directories. They load independently of each other.
    pub fn start(&mut self) {
        for cmd in [WorkerCommand::FetchAccounts, WorkerCommand::FetchStocks] {
            if self.worker_tx.send(cmd).is_err() {
                log::warn!("lookup worker unavailable; directories will stay empty");
                self.accounts_state = DirectoryState::Unavailable;
                self.stocks_state = DirectoryState::Unavailable;
                return;
            }
        }
    }

    /// Subscribe to view events. Dropping the receiver unsubscribes.
    pub fn subscribe(&mut self) -> Receiver<ViewEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Make `account` the selection. `None` leaves everything as it was.
    ///
    /// In order: the selection is replaced, the account id goes out on the trade
    /// feed, and a catalog refresh is requested. The previous catalog is dropped
    /// straight away so nothing from the old account stays visible.
    pub fn select_account(&mut self, account: Option<Account>) {
        let Some(account) = account else {
            return;
        };
        log::info!("account selected: {account}");

        self.selected = Some(account.clone());
        self.reset_catalog();
        self.notify(ViewEvent::AccountSelected(account.clone()));

        self.announce(account.id);
        self.request_points(account.id);
    }

    /// Fetch the current selection's points again. Any refresh still in flight
    /// is superseded. Returns false when nothing is selected.
    pub fn refresh_catalog(&mut self) -> bool {
        let Some(account_id) = self.selected.as_ref().map(|a| a.id) else {
            return false;
        };
        self.reset_catalog();
        self.request_points(account_id);
        true
    }

    /// Select by id from the loaded directory. Returns false for an unknown id.
    pub fn select_account_id(&mut self, account_id: AccountId) -> bool {
        let account = self.accounts.iter().find(|a| a.id == account_id).cloned();
        let found = account.is_some();
        self.select_account(account);
        found
    }

    /// Project a range control reading and keep the result.
    pub fn adjust_range(&mut self, reading: RangeReading) -> &TradeInterval {
        let interval = IntervalProjector::project(reading, &self.catalog, self.selected.as_ref());
        self.handles = RangeHandles {
            low: IntervalProjector::clamp_low(reading, &self.catalog),
            high: reading.high,
        };
        log::debug!("range {:?} -> {}", reading, interval);
        self.notify(ViewEvent::IntervalChanged(interval.clone()));
        self.interval.insert(interval)
    }

    /// Apply one worker completion.
    pub fn handle_response(&mut self, resp: WorkerResponse) -> Completion {
        match resp {
            WorkerResponse::Accounts(Ok(accounts)) => {
                log::info!("account directory loaded: {} accounts", accounts.len());
                self.accounts = accounts;
                self.accounts_state = DirectoryState::Loaded;
                self.notify(ViewEvent::AccountsLoaded {
                    count: self.accounts.len(),
                });

                let default = default_account(&self.accounts, self.default_index).cloned();
                if default.is_none() {
                    log::warn!("account directory is empty; nothing to select");
                }
                self.select_account(default);
                Completion::Applied
            }
            WorkerResponse::Accounts(Err(reason)) => {
                self.accounts_state = DirectoryState::Unavailable;
                self.directory_failed(Directory::Accounts, reason)
            }
            WorkerResponse::Stocks(Ok(stocks)) => {
                self.stocks = stocks;
                self.stocks_state = DirectoryState::Loaded;
                self.notify(ViewEvent::StocksLoaded {
                    count: self.stocks.len(),
                });
                Completion::Applied
            }
            WorkerResponse::Stocks(Err(reason)) => {
                self.stocks_state = DirectoryState::Unavailable;
                self.directory_failed(Directory::Stocks, reason)
            }
            WorkerResponse::Points { ticket, result } => self.apply_points(ticket, result),
        }
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn accounts_state(&self) -> DirectoryState {
        self.accounts_state
    }

    pub fn stocks(&self) -> &[Stock] {
        &self.stocks
    }

    pub fn stocks_state(&self) -> DirectoryState {
        self.stocks_state
    }

    pub fn selected(&self) -> Option<&Account> {
        self.selected.as_ref()
    }

    pub fn catalog(&self) -> &PointCatalog {
        &self.catalog
    }

    /// Range control settings, or `None` while the control is hidden.
    pub fn range_control(&self) -> Option<&RangeControlConfig> {
        self.range_control.as_ref()
    }

    pub fn is_range_visible(&self) -> bool {
        self.range_control.is_some()
    }

    pub fn handles(&self) -> RangeHandles {
        self.handles
    }

    pub fn interval(&self) -> Option<&TradeInterval> {
        self.interval.as_ref()
    }

    /// The refresh still awaited for the current selection, if any.
    pub fn pending_refresh(&self) -> Option<RefreshTicket> {
        self.pending
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    fn apply_points(
        &mut self,
        ticket: RefreshTicket,
        result: Result<Vec<TradePoint>, String>,
    ) -> Completion {
        if !ticket.is_current(self.generation, self.selected.as_ref()) {
            log::debug!(
                "discarding stale points for account {} (generation {} < {})",
                ticket.account_id,
                ticket.generation.0,
                self.generation.0
            );
            return Completion::Discarded;
        }
        self.pending = None;

        match result {
            Ok(points) => {
                self.catalog = PointCatalog::new(points);
                let config = RangeControlConfig::for_catalog(&self.catalog);
                self.range_control = config.has_points().then_some(config);
                log::info!(
                    "trade points for account {}: {}",
                    ticket.account_id,
                    self.catalog.len()
                );
                self.notify(ViewEvent::CatalogReady {
                    account_id: ticket.account_id,
                    points: self.catalog.len(),
                    range_control: self.range_control,
                });
                Completion::Applied
            }
            Err(reason) => {
                log::warn!(
                    "trade points for account {} unavailable: {reason}",
                    ticket.account_id
                );
                self.notify(ViewEvent::CatalogUnavailable {
                    account_id: ticket.account_id,
                    reason,
                });
                Completion::Failed
            }
        }
    }

    fn reset_catalog(&mut self) {
        self.generation = self.generation.next();
        self.catalog = PointCatalog::empty();
        self.range_control = None;
        self.handles = RangeHandles::default();
        self.interval = None;
    }

    fn directory_failed(&mut self, directory: Directory, reason: String) -> Completion {
        log::warn!("{} directory unavailable: {reason}", directory.label());
        self.notify(ViewEvent::DirectoryUnavailable { directory, reason });
        Completion::Failed
    }

    /// Fire-and-forget: a feed failure is logged and otherwise ignored.
    fn announce(&self, account_id: AccountId) {
        if let Err(e) = publish_json(self.feed.as_ref(), ACCOUNT_TOPIC, &account_id) {
            log::warn!("trade feed publish failed: {e}");
        }
    }

    fn request_points(&mut self, account_id: AccountId) {
        let ticket = RefreshTicket {
            account_id,
            generation: self.generation,
        };
        if self
            .worker_tx
            .send(WorkerCommand::FetchPoints { ticket })
            .is_err()
        {
            log::warn!("lookup worker unavailable; no trade points for account {account_id}");
            self.pending = None;
            self.notify(ViewEvent::CatalogUnavailable {
                account_id,
                reason: "lookup worker unavailable".into(),
            });
            return;
        }
        self.pending = Some(ticket);
        self.notify(ViewEvent::CatalogLoading { account_id });
    }

    fn notify(&mut self, event: ViewEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}
