//! Routes Module
//!
//! HTTP route configuration: the board REST API over
//! [`BoardService`](crate::backend::service::BoardService) and the live event
//! streams.
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs         - Module exports
//! ├── router.rs      - Main router assembly
//! ├── api_routes.rs  - REST route table
//! └── handlers.rs    - REST handlers
//! ```

/// Main router assembly
pub mod router;

/// REST route table
pub mod api_routes;

/// REST handlers
pub mod handlers;

pub use api_routes::configure_api_routes;
pub use router::create_router;
