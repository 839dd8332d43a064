//! kanflow - Collaborative Kanban Backend
//!
//! kanflow keeps boards of ordered lists and cards consistent while several
//! people edit them, and streams every committed change to the clients that
//! are watching.
//!
//! # Overview
//!
//! - **Position ledger**: siblings (lists on a board, cards in a list) always
//!   occupy the dense positions `0..n`; inserts, deletes and moves shift
//!   neighbours inside the same unit of work as the write
//! - **Broadcast registry**: board groups and per-user notification subjects
//!   with snapshot delivery and pruning of dead connections
//! - **Board service**: every mutation checks access, writes, commits and
//!   only then emits its events
//!
//! # Module Structure
//!
//! - **`shared`** - Domain types, patches, events, errors and configuration
//! - **`backend`** - Ledger, storage, registry, service and the Axum server
//!
//! # Feature Flags
//!
//! - **`ssr`** (default) - Axum server, REST API, WebSocket endpoints and the
//!   `kanflow-server` binary. Without it the crate is a library of the
//!   service and its storage.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use kanflow::backend::{BoardService, BroadcastRegistry, MemoryStore};
//! use kanflow::shared::{patch::NewBoard, User};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = MemoryStore::new();
//! let owner = User::new("ada@example.com", "ada");
//! store.insert_user(owner.clone()).await?;
//!
//! let service = BoardService::new(Arc::new(store), Arc::new(BroadcastRegistry::default()));
//! let board = service.create_board(owner.id, NewBoard { title: "Roadmap".into() }).await?;
//! # let _ = board;
//! # Ok(())
//! # }
//! ```

/// Shared types and data structures
pub mod shared;

/// Backend services and server
pub mod backend;
