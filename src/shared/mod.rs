//! Shared Module
//!
//! Transport-neutral types shared by the backend core and any transport in
//! front of it: board entities, creation inputs and patches, live events,
//! configuration and validation errors. Everything here serializes with serde.

/// Board, list, card, user and membership entities
pub mod board;

/// Creation inputs and partial updates
pub mod patch;

/// Live board events
pub mod event;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use board::{
    Board, BoardDetails, BoardList, BoardMembership, Card, InvitationStatus, ListWithCards,
    MemberSummary, User,
};
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
pub use error::SharedError;
pub use event::{BoardEvent, EventType};
pub use patch::{
    BoardPatch, CardPatch, InvitationAnswer, InviteMember, ListPatch, MoveCard, NewBoard, NewCard,
    NewList, ReorderList,
};
