//! Real-time Update Module
//!
//! Live delivery of board events to connected clients.
//!
//! # Module Structure
//!
//! ```text
//! realtime/
//! ├── mod.rs          - Module exports and documentation
//! ├── connection.rs   - ConnectionHandle / ConnectionId
//! ├── registry.rs     - BroadcastRegistry (board groups, user subjects)
//! └── socket.rs       - WebSocket endpoints (ssr only)
//! ```
//!
//! # Delivery model
//!
//! A board group holds every connection currently viewing a board; a user
//! subject holds the connections that receive one user's personal
//! notifications. `broadcast` targets a group, `notify` a subject. Both
//! deliver to a snapshot taken at call time and prune connections whose send
//! fails.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use kanflow::backend::realtime::{BroadcastRegistry, ConnectionHandle};
//! use uuid::Uuid;
//!
//! let registry = BroadcastRegistry::new(Duration::from_secs(2));
//! let (conn, _rx) = ConnectionHandle::channel(Uuid::new_v4(), 16);
//! let board_id = Uuid::new_v4();
//! registry.join(board_id, conn);
//! assert_eq!(registry.group_size(board_id), 1);
//! ```

/// Live connection handles
pub mod connection;

/// Connection registry and fan-out
pub mod registry;

/// WebSocket endpoints
#[cfg(feature = "ssr")]
pub mod socket;

// Re-export commonly used types
pub use connection::{ConnectionHandle, ConnectionId, SendFailure};
pub use registry::BroadcastRegistry;
#[cfg(feature = "ssr")]
pub use socket::{handle_board_socket, handle_user_socket};
