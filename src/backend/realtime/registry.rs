/**
 * Broadcast Registry
 *
 * Maps board ids (groups) and user ids (subjects) to the live connections
 * observing them. The two namespaces are independent: a connection is in at
 * most one board group and at most one subject at a time.
 *
 * # Locking
 *
 * Each namespace sits behind its own `std::sync::RwLock`, held only for map
 * updates and snapshots and never across an `.await`. Delivery happens on a
 * snapshot taken at call time, outside any lock, so a slow connection on one
 * board never holds up joins or broadcasts on another.
 *
 * # Failure handling
 *
 * Sends run concurrently with a bounded per-send timeout. A connection whose
 * send fails or times out is removed from both namespaces; the rest of the
 * snapshot still receives the event.
 */

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use futures_util::future::join_all;
use uuid::Uuid;

use crate::backend::realtime::connection::{ConnectionHandle, ConnectionId};
use crate::shared::event::BoardEvent;

type Members = HashMap<ConnectionId, ConnectionHandle>;

/// Keys a connection is currently registered under
#[derive(Debug, Default, Clone, Copy)]
struct Tags {
    board: Option<Uuid>,
    subject: Option<Uuid>,
}

impl Tags {
    fn is_empty(&self) -> bool {
        self.board.is_none() && self.subject.is_none()
    }
}

#[derive(Clone, Copy)]
enum Namespace {
    Board,
    Subject,
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Remove `conn_id` from `key`'s set and drop the set once it is empty.
fn remove_member(map: &mut HashMap<Uuid, Members>, key: Uuid, conn_id: ConnectionId) -> bool {
    let Some(members) = map.get_mut(&key) else {
        return false;
    };
    let removed = members.remove(&conn_id).is_some();
    if members.is_empty() {
        map.remove(&key);
    }
    removed
}

/// Registry of live connections by board and by user
pub struct BroadcastRegistry {
    groups: RwLock<HashMap<Uuid, Members>>,
    subjects: RwLock<HashMap<Uuid, Members>>,
    // Lock order: tags, then groups, then subjects.
    tags: Mutex<HashMap<ConnectionId, Tags>>,
    send_timeout: Duration,
}

impl BroadcastRegistry {
    pub fn new(send_timeout: Duration) -> Self {
        Self {
            groups: RwLock::new(HashMap::new()),
            subjects: RwLock::new(HashMap::new()),
            tags: Mutex::new(HashMap::new()),
            send_timeout,
        }
    }

    fn namespace(&self, ns: Namespace) -> &RwLock<HashMap<Uuid, Members>> {
        match ns {
            Namespace::Board => &self.groups,
            Namespace::Subject => &self.subjects,
        }
    }

    fn attach(&self, ns: Namespace, key: Uuid, conn: ConnectionHandle) -> bool {
        let conn_id = conn.id();
        let mut tags = lock(&self.tags);
        let entry = tags.entry(conn_id).or_default();
        let slot = match ns {
            Namespace::Board => &mut entry.board,
            Namespace::Subject => &mut entry.subject,
        };
        let previous = slot.replace(key);

        let mut map = write(self.namespace(ns));
        if let Some(previous) = previous.filter(|p| *p != key) {
            remove_member(&mut map, previous, conn_id);
        }
        map.entry(key).or_default().insert(conn_id, conn).is_none()
    }

    fn detach(&self, ns: Namespace, key: Uuid, conn_id: ConnectionId) -> bool {
        let mut tags = lock(&self.tags);
        let Some(entry) = tags.get_mut(&conn_id) else {
            return false;
        };
        let slot = match ns {
            Namespace::Board => &mut entry.board,
            Namespace::Subject => &mut entry.subject,
        };
        if *slot != Some(key) {
            return false;
        }
        *slot = None;
        if entry.is_empty() {
            tags.remove(&conn_id);
        }
        remove_member(&mut write(self.namespace(ns)), key, conn_id)
    }

    fn snapshot(&self, ns: Namespace, key: Uuid) -> Vec<ConnectionHandle> {
        read(self.namespace(ns))
            .get(&key)
            .map(|members| members.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Add `conn` to the group of `board_id`. A connection already in another
    /// board's group is moved. Returns false when it was already a member.
    pub fn join(&self, board_id: Uuid, conn: ConnectionHandle) -> bool {
        let conn_id = conn.id();
        let added = self.attach(Namespace::Board, board_id, conn);
        if added {
            tracing::info!("[Realtime] {} joined board {}", conn_id, board_id);
        }
        added
    }

    /// Remove `conn_id` from the group of `board_id`. No-op for non-members.
    pub fn leave(&self, board_id: Uuid, conn_id: ConnectionId) -> bool {
        let removed = self.detach(Namespace::Board, board_id, conn_id);
        if removed {
            tracing::info!("[Realtime] {} left board {}", conn_id, board_id);
        }
        removed
    }

    /// Register `conn` for personal notifications to `user_id`.
    pub fn join_subject(&self, user_id: Uuid, conn: ConnectionHandle) -> bool {
        let conn_id = conn.id();
        let added = self.attach(Namespace::Subject, user_id, conn);
        if added {
            tracing::info!("[Realtime] {} subscribed to user {}", conn_id, user_id);
        }
        added
    }

    pub fn leave_subject(&self, user_id: Uuid, conn_id: ConnectionId) -> bool {
        self.detach(Namespace::Subject, user_id, conn_id)
    }

    /// Drop `conn_id` from every group and subject it belongs to.
    pub fn disconnect(&self, conn_id: ConnectionId) {
        let mut tags = lock(&self.tags);
        let Some(entry) = tags.remove(&conn_id) else {
            return;
        };
        if let Some(board_id) = entry.board {
            remove_member(&mut write(&self.groups), board_id, conn_id);
        }
        if let Some(user_id) = entry.subject {
            remove_member(&mut write(&self.subjects), user_id, conn_id);
        }
        tracing::info!("[Realtime] {} disconnected", conn_id);
    }

    /// Deliver `event` to every connection in the group of `board_id` at call
    /// time. Returns how many connections received it.
    pub async fn broadcast(&self, board_id: Uuid, event: BoardEvent) -> usize {
        let members = self.snapshot(Namespace::Board, board_id);
        let tag = event.event_type.as_str();
        let delivered = self.deliver(members, event).await;
        tracing::debug!("[Realtime] {} broadcast to {} connections on board {}", tag, delivered, board_id);
        delivered
    }

    /// Deliver `event` to the personal connections of `user_id` only.
    pub async fn notify(&self, user_id: Uuid, event: BoardEvent) -> usize {
        let members = self.snapshot(Namespace::Subject, user_id);
        let tag = event.event_type.as_str();
        let delivered = self.deliver(members, event).await;
        tracing::debug!("[Realtime] {} sent to {} connections of user {}", tag, delivered, user_id);
        delivered
    }

    async fn deliver(&self, members: Vec<ConnectionHandle>, event: BoardEvent) -> usize {
        if members.is_empty() {
            return 0;
        }
        let event = Arc::new(event);
        let timeout = self.send_timeout;
        let results = join_all(members.iter().map(|conn| {
            let event = Arc::clone(&event);
            async move { (conn.id(), conn.send(event, timeout).await) }
        }))
        .await;

        let mut delivered = 0;
        for (conn_id, result) in results {
            match result {
                Ok(()) => delivered += 1,
                Err(failure) => {
                    tracing::warn!("[Realtime] Pruning {}: {}", conn_id, failure);
                    self.disconnect(conn_id);
                }
            }
        }
        delivered
    }

    /// Connections currently in the group of `board_id`
    pub fn group_size(&self, board_id: Uuid) -> usize {
        read(&self.groups).get(&board_id).map_or(0, HashMap::len)
    }

    /// Connections currently subscribed for `user_id`
    pub fn subject_size(&self, user_id: Uuid) -> usize {
        read(&self.subjects).get(&user_id).map_or(0, HashMap::len)
    }

    /// Number of non-empty board groups
    pub fn group_count(&self) -> usize {
        read(&self.groups).len()
    }

    /// Number of non-empty subjects
    pub fn subject_count(&self) -> usize {
        read(&self.subjects).len()
    }
}

impl Default for BroadcastRegistry {
    fn default() -> Self {
        Self::new(Duration::from_secs(2))
    }
}
