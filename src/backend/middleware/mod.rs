//! Middleware Module
//!
//! Request processing that runs before handlers.
//!
//! - **`identity`** - Caller identity taken from the gateway's header

pub mod identity;

pub use identity::{user_from_headers, AuthenticatedUser, IdentityError};
