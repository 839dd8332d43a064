/**
 * Live Connections
 *
 * A `ConnectionHandle` is the registry's non-owning reference to one live
 * client. It carries the sending half of a bounded channel; whoever owns the
 * transport drains the receiving half. Once the receiver is gone every send
 * fails and the registry drops the handle.
 */

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::SendTimeoutError;
use uuid::Uuid;

use crate::shared::event::BoardEvent;

/// Identifier of one live connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0.simple())
    }
}

/// Why an event did not reach a connection
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SendFailure {
    #[error("connection closed")]
    Closed,
    #[error("send timed out")]
    TimedOut,
}

/// Sending side of a live connection
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    user_id: Uuid,
    tx: mpsc::Sender<Arc<BoardEvent>>,
}

impl ConnectionHandle {
    /// Create a handle for `user_id` and the receiver its transport drains.
    /// `capacity` bounds how many events may queue before sends start waiting.
    pub fn channel(user_id: Uuid, capacity: usize) -> (Self, mpsc::Receiver<Arc<BoardEvent>>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let handle = Self {
            id: ConnectionId::new(),
            user_id,
            tx,
        };
        (handle, rx)
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Authenticated user behind the connection
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Queue `event`, waiting at most `timeout` for buffer space.
    pub async fn send(&self, event: Arc<BoardEvent>, timeout: Duration) -> Result<(), SendFailure> {
        self.tx.send_timeout(event, timeout).await.map_err(|e| match e {
            SendTimeoutError::Closed(_) => SendFailure::Closed,
            SendTimeoutError::Timeout(_) => SendFailure::TimedOut,
        })
    }
}
