//! Background lookup worker — all service calls run off the view thread.
//!
//! Communication with the view is via `mpsc` channels. Each lookup runs on its own
//! short-lived thread, so completions can come back in any order; the coordinator
//! sorts out which ones still matter.

use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use tradescope_core::{Account, LookupError, ReportServices, Stock, TradePoint};

use crate::selection::RefreshTicket;

/// Commands sent from the view to the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerCommand {
    FetchAccounts,
    FetchStocks,
    FetchPoints { ticket: RefreshTicket },
    Shutdown,
}

/// Responses sent from the worker back to the view.
///
/// Errors travel as strings so responses stay `Clone`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerResponse {
    Accounts(Result<Vec<Account>, String>),
    Stocks(Result<Vec<Stock>, String>),
    Points {
        ticket: RefreshTicket,
        result: Result<Vec<TradePoint>, String>,
    },
}

/// Spawn the background worker thread.
pub fn spawn_worker(
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
    services: ReportServices,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("tradescope-worker".into())
        .spawn(move || worker_loop(rx, tx, services))
}

fn worker_loop(rx: Receiver<WorkerCommand>, tx: Sender<WorkerResponse>, services: ReportServices) {
    let mut lookups = Vec::new();
    loop {
        match rx.recv() {
            Ok(WorkerCommand::Shutdown) | Err(_) => break,
            Ok(cmd) => {
                lookups.retain(|h: &JoinHandle<()>| !h.is_finished());
                if let Some(handle) = dispatch(cmd, &tx, &services) {
                    lookups.push(handle);
                }
            }
        }
    }
    for handle in lookups {
        let _ = handle.join();
    }
}

fn dispatch(
    cmd: WorkerCommand,
    tx: &Sender<WorkerResponse>,
    services: &ReportServices,
) -> Option<JoinHandle<()>> {
    let tx = tx.clone();
    let services = services.clone();
    let name = match &cmd {
        WorkerCommand::FetchAccounts => "tradescope-accounts".to_string(),
        WorkerCommand::FetchStocks => "tradescope-stocks".to_string(),
        WorkerCommand::FetchPoints { ticket } => format!("tradescope-points-{}", ticket.account_id),
        WorkerCommand::Shutdown => return None,
    };

    let spawned = thread::Builder::new().name(name).spawn({
        let cmd = cmd.clone();
        let tx = tx.clone();
        move || {
            let _ = tx.send(run_lookup(cmd, &services));
        }
    });

    match spawned {
        Ok(handle) => Some(handle),
        Err(e) => {
            log::warn!("could not spawn lookup thread for {cmd:?}: {e}");
            let _ = tx.send(failed(cmd, format!("lookup thread unavailable: {e}")));
            None
        }
    }
}

/// Run one lookup synchronously and package the outcome.
pub fn run_lookup(cmd: WorkerCommand, services: &ReportServices) -> WorkerResponse {
    match cmd {
        WorkerCommand::FetchAccounts => WorkerResponse::Accounts(stringify(services.accounts.accounts())),
        WorkerCommand::FetchStocks => WorkerResponse::Stocks(stringify(services.stocks.stocks())),
        WorkerCommand::FetchPoints { ticket } => WorkerResponse::Points {
            ticket,
            result: stringify(services.prices.points_in_time(ticket.account_id)),
        },
        WorkerCommand::Shutdown => failed(cmd, "shutdown is not a lookup".into()),
    }
}

fn failed(cmd: WorkerCommand, error: String) -> WorkerResponse {
    match cmd {
        WorkerCommand::FetchAccounts | WorkerCommand::Shutdown => WorkerResponse::Accounts(Err(error)),
        WorkerCommand::FetchStocks => WorkerResponse::Stocks(Err(error)),
        WorkerCommand::FetchPoints { ticket } => WorkerResponse::Points {
            ticket,
            result: Err(error),
        },
    }
}

fn stringify<T>(result: Result<T, LookupError>) -> Result<T, String> {
    result.map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    use tradescope_core::{AccountId, FixtureReferenceData};

    use crate::selection::Generation;

    fn services() -> ReportServices {
        ReportServices::from_backend(
            FixtureReferenceData::new()
                .with_account(Account::new(1, "one"))
                .with_points(AccountId(1), ["t0", "t1"])
                .with_unreachable_account(AccountId(2)),
        )
    }

    #[test]
    fn worker_shutdown() {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, _resp_rx) = mpsc::channel();

        let handle = spawn_worker(cmd_rx, resp_tx, services()).unwrap();
        cmd_tx.send(WorkerCommand::Shutdown).unwrap();
        handle.join().expect("worker should join cleanly");
    }

    #[test]
    fn worker_exits_when_view_drops_sender() {
        let (cmd_tx, cmd_rx) = mpsc::channel::<WorkerCommand>();
        let (resp_tx, _resp_rx) = mpsc::channel();

        let handle = spawn_worker(cmd_rx, resp_tx, services()).unwrap();
        drop(cmd_tx);
        handle.join().expect("worker should join cleanly");
    }

    #[test]
    fn points_response_carries_ticket() {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();
        let handle = spawn_worker(cmd_rx, resp_tx, services()).unwrap();

        let ticket = RefreshTicket {
            account_id: AccountId(1),
            generation: Generation(7),
        };
        cmd_tx.send(WorkerCommand::FetchPoints { ticket }).unwrap();

        let resp = resp_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(
            resp,
            WorkerResponse::Points {
                ticket,
                result: Ok(vec![TradePoint::from("t0"), TradePoint::from("t1")]),
            }
        );

        cmd_tx.send(WorkerCommand::Shutdown).unwrap();
        handle.join().unwrap();
    }

    #[test]
    fn lookup_failure_is_reported_not_panicked() {
        let ticket = RefreshTicket {
            account_id: AccountId(2),
            generation: Generation(1),
        };
        match run_lookup(WorkerCommand::FetchPoints { ticket }, &services()) {
            WorkerResponse::Points { result: Err(msg), .. } => {
                assert!(msg.contains("unreachable"));
            }
            other => panic!("Expected failed points lookup, got {:?}", other),
        }
    }

    #[test]
    fn directories_are_fetched_independently() {
        let svc = services();
        assert!(matches!(
            run_lookup(WorkerCommand::FetchAccounts, &svc),
            WorkerResponse::Accounts(Ok(ref a)) if a.len() == 1
        ));
        assert!(matches!(
            run_lookup(WorkerCommand::FetchStocks, &svc),
            WorkerResponse::Stocks(Ok(ref s)) if s.is_empty()
        ));
    }
}
