//! Backend Module
//!
//! Server-side board management: the position ledger, storage, the broadcast
//! registry and the board service that ties them together. The HTTP layer
//! (server, routes, middleware) is only compiled with the `ssr` feature.
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── ledger/         - Dense position arithmetic for ordered siblings
//! ├── storage/        - BoardStore / UnitOfWork traits, in-memory store
//! ├── realtime/       - Connection registry and WebSocket endpoints
//! ├── service/        - Board, list, card and membership operations
//! ├── error/          - Backend error types
//! ├── server/         - Server initialization and state (ssr)
//! ├── routes/         - REST API and route configuration (ssr)
//! └── middleware/     - Caller identity (ssr)
//! ```
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use kanflow::backend::realtime::BroadcastRegistry;
//! use kanflow::backend::service::BoardService;
//! use kanflow::backend::storage::MemoryStore;
//!
//! let service = BoardService::new(
//!     Arc::new(MemoryStore::new()),
//!     Arc::new(BroadcastRegistry::default()),
//! );
//! assert_eq!(service.registry().group_count(), 0);
//! ```

/// Sibling position arithmetic
pub mod ledger;

/// Transactional persistence
pub mod storage;

/// Live event delivery
pub mod realtime;

/// Board operations
pub mod service;

/// Backend error types
pub mod error;

/// Server setup and configuration
#[cfg(feature = "ssr")]
pub mod server;

/// Route configuration
#[cfg(feature = "ssr")]
pub mod routes;

/// Middleware for request processing
#[cfg(feature = "ssr")]
pub mod middleware;

/// Re-export commonly used types
pub use error::{BackendError, Resource};
pub use realtime::BroadcastRegistry;
pub use service::BoardService;
pub use storage::MemoryStore;
#[cfg(feature = "ssr")]
pub use server::create_app;
