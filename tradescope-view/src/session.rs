//! Report session: a coordinator wired to a running lookup worker.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use tradescope_core::{ReportServices, TradeFeed};

use crate::coordinator::{DirectoryState, SelectionCoordinator};
use crate::worker::{spawn_worker, WorkerCommand, WorkerResponse};

pub struct ReportSession {
    coordinator: SelectionCoordinator,
    worker_tx: Sender<WorkerCommand>,
    worker_rx: Receiver<WorkerResponse>,
    worker: Option<JoinHandle<()>>,
}

impl ReportSession {
    /// Spawn the worker and kick off both directory lookups.
    pub fn start(
        services: ReportServices,
        feed: Arc<dyn TradeFeed>,
        default_account_index: usize,
    ) -> Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();
        let worker =
            spawn_worker(cmd_rx, resp_tx, services).context("failed to spawn lookup worker")?;

        let mut coordinator = SelectionCoordinator::new(cmd_tx.clone(), feed)
            .with_default_index(default_account_index);
        coordinator.start();

        Ok(Self {
            coordinator,
            worker_tx: cmd_tx,
            worker_rx: resp_rx,
            worker: Some(worker),
        })
    }

    pub fn coordinator(&self) -> &SelectionCoordinator {
        &self.coordinator
    }

    pub fn coordinator_mut(&mut self) -> &mut SelectionCoordinator {
        &mut self.coordinator
    }

    /// Apply every completion that has already arrived. Returns how many.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(resp) = self.worker_rx.try_recv() {
            self.coordinator.handle_response(resp);
            applied += 1;
        }
        applied
    }

    /// Apply completions as they arrive until `done` holds or `timeout` runs out.
    pub fn pump_until(
        &mut self,
        timeout: Duration,
        mut done: impl FnMut(&SelectionCoordinator) -> bool,
    ) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if done(&self.coordinator) {
                return true;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            match self.worker_rx.recv_timeout(remaining) {
                Ok(resp) => {
                    self.coordinator.handle_response(resp);
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                    return done(&self.coordinator);
                }
            }
        }
    }

    /// Wait for the account directory and the current selection's catalog to settle.
    pub fn wait_until_settled(&mut self, timeout: Duration) -> bool {
        self.pump_until(timeout, |c| {
            c.accounts_state() != DirectoryState::Pending
                && c.stocks_state() != DirectoryState::Pending
                && c.pending_refresh().is_none()
        })
    }

    /// Stop the worker and wait for in-flight lookups to finish.
    pub fn shutdown(mut self) -> Result<()> {
        self.stop()
    }

    fn stop(&mut self) -> Result<()> {
        let Some(worker) = self.worker.take() else {
            return Ok(());
        };
        let _ = self.worker_tx.send(WorkerCommand::Shutdown);
        worker
            .join()
            .map_err(|_| anyhow::anyhow!("lookup worker panicked"))
    }
}

impl Drop for ReportSession {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            log::error!("{e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tradescope_core::{
        Account, AccountDirectory, AccountId, FeedBus, FixtureReferenceData, RangeReading,
    };

    const WAIT: Duration = Duration::from_secs(5);

    fn session(backend: FixtureReferenceData) -> ReportSession {
        ReportSession::start(
            ReportServices::from_backend(backend),
            Arc::new(FeedBus::new("report-view")),
            5,
        )
        .unwrap()
    }

    #[test]
    fn sample_session_settles_on_sixth_account() {
        let sample = FixtureReferenceData::sample();
        let sixth = sample.accounts().unwrap()[5].clone();
        let mut s = session(sample);

        assert!(s.wait_until_settled(WAIT));
        let c = s.coordinator();
        assert_eq!(c.selected(), Some(&sixth));
        assert!(!c.catalog().is_empty());
        assert!(c.is_range_visible());
        assert_eq!(c.range_control().unwrap().ceil, c.catalog().len());
        s.shutdown().unwrap();
    }

    #[test]
    fn manual_selection_replaces_catalog() {
        let backend = FixtureReferenceData::new()
            .with_account(Account::new(1, "one"))
            .with_account(Account::new(2, "two"))
            .with_points(AccountId(1), ["a0", "a1", "a2"])
            .with_points(AccountId(2), ["b0"]);
        let mut s = session(backend);
        assert!(s.wait_until_settled(WAIT));
        assert_eq!(s.coordinator().selected().map(|a| a.id), Some(AccountId(1)));

        assert!(s.coordinator_mut().select_account_id(AccountId(2)));
        assert!(s.wait_until_settled(WAIT));
        assert_eq!(s.coordinator().catalog().len(), 1);

        let interval = s.coordinator_mut().adjust_range(RangeReading::new(0, 1)).clone();
        assert_eq!(interval.label, "b0 - ...");
    }

    #[test]
    fn unreachable_price_service_leaves_control_hidden() {
        let backend = FixtureReferenceData::new()
            .with_account(Account::new(1, "one"))
            .with_unreachable_account(AccountId(1));
        let mut s = session(backend);
        assert!(s.wait_until_settled(WAIT));
        assert_eq!(s.coordinator().selected().map(|a| a.id), Some(AccountId(1)));
        assert!(s.coordinator().catalog().is_empty());
        assert!(!s.coordinator().is_range_visible());
    }

    #[test]
    fn drop_joins_worker() {
        let s = session(FixtureReferenceData::sample());
        drop(s);
    }
}
