//! Position desk: a task that owns the tracker
//!
//! The polling loop and the bot handler never share the tracker. They send
//! requests over a channel and the desk applies them one at a time, so the
//! single-position rule holds without a lock.

use crate::position::tracker::{ClosedPosition, Position, PositionError, PositionTracker};
use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

const DESK_QUEUE: usize = 32;

#[derive(Debug, Error)]
pub enum DeskError {
    #[error(transparent)]
    Position(#[from] PositionError),
    #[error("position desk is not running")]
    Unavailable,
}

#[derive(Debug)]
enum DeskRequest {
    Open {
        price: f64,
        at: DateTime<Utc>,
        reply: oneshot::Sender<Result<Position, PositionError>>,
    },
    Close {
        price: f64,
        at: DateTime<Utc>,
        reply: oneshot::Sender<Result<ClosedPosition, PositionError>>,
    },
    Snapshot {
        reply: oneshot::Sender<Option<Position>>,
    },
}

/// Cloneable handle to the desk task
#[derive(Debug, Clone)]
pub struct PositionDesk {
    tx: mpsc::Sender<DeskRequest>,
}

impl PositionDesk {
    /// Spawn the desk task. It stops once every handle is dropped.
    pub fn spawn(tracker: PositionTracker) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(DESK_QUEUE);
        let handle = tokio::spawn(run_desk(tracker, rx));
        (Self { tx }, handle)
    }

    pub async fn open(&self, price: f64, at: DateTime<Utc>) -> Result<Position, DeskError> {
        let (reply, rx) = oneshot::channel();
        self.send(DeskRequest::Open { price, at, reply }).await?;
        Ok(rx.await.map_err(|_| DeskError::Unavailable)??)
    }

    pub async fn close(&self, price: f64, at: DateTime<Utc>) -> Result<ClosedPosition, DeskError> {
        let (reply, rx) = oneshot::channel();
        self.send(DeskRequest::Close { price, at, reply }).await?;
        Ok(rx.await.map_err(|_| DeskError::Unavailable)??)
    }

    pub async fn snapshot(&self) -> Result<Option<Position>, DeskError> {
        let (reply, rx) = oneshot::channel();
        self.send(DeskRequest::Snapshot { reply }).await?;
        rx.await.map_err(|_| DeskError::Unavailable)
    }

    async fn send(&self, request: DeskRequest) -> Result<(), DeskError> {
        self.tx.send(request).await.map_err(|_| DeskError::Unavailable)
    }
}

async fn run_desk(mut tracker: PositionTracker, mut rx: mpsc::Receiver<DeskRequest>) {
    debug!("PositionDesk: started");

    while let Some(request) = rx.recv().await {
        match request {
            DeskRequest::Open { price, at, reply } => {
                let result = tracker.open(price, at);
                match &result {
                    Ok(position) => info!(
                        entry_price = position.entry_price,
                        entry_time = %position.entry_time,
                        "PositionDesk: position opened at {:.2}",
                        position.entry_price
                    ),
                    Err(e) => warn!(price = price, error = %e, "PositionDesk: open rejected"),
                }
                let _ = reply.send(result);
            }
            DeskRequest::Close { price, at, reply } => {
                let result = tracker.close(price, at);
                match &result {
                    Ok(closed) => info!(
                        exit_price = closed.exit_price,
                        profit_percent = closed.profit_percent,
                        holding_minutes = closed.holding_minutes,
                        "PositionDesk: position closed at {:.2} ({:+.2}%)",
                        closed.exit_price,
                        closed.profit_percent
                    ),
                    Err(e) => warn!(price = price, error = %e, "PositionDesk: close rejected"),
                }
                let _ = reply.send(result);
            }
            DeskRequest::Snapshot { reply } => {
                let _ = reply.send(tracker.position());
            }
        }
    }

    debug!("PositionDesk: all handles dropped, stopping");
}
