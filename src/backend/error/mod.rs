//! Backend Error Module
//!
//! Typed failures returned by every board operation, and their conversion to
//! HTTP responses.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - BackendError and Resource
//! └── conversion.rs - IntoResponse (ssr only)
//! ```

/// Error type definitions
pub mod types;

/// Error conversion implementations
#[cfg(feature = "ssr")]
pub mod conversion;

// Re-export commonly used types
pub use types::{BackendError, Resource};
