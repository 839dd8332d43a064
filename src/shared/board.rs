//! Board Data Structures
//!
//! Boards own ordered lists, lists own ordered cards. Positions are zero-based
//! and dense within their sibling group after every committed mutation.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::SharedError;

/// A board owned by a single user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Board {
    pub id: Uuid,
    pub title: String,
    pub owner_id: Uuid,
}

impl Board {
    pub fn new(title: impl Into<String>, owner_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            owner_id,
        }
    }
}

/// A column of cards on a board.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoardList {
    pub id: Uuid,
    pub title: String,
    /// Zero-based index among the lists of `board_id`
    pub position: i32,
    pub board_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BoardList {
    pub fn new(board_id: Uuid, title: impl Into<String>, position: i32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            position,
            board_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A card inside a list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Card {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    /// Zero-based index among the cards of `list_id`
    pub position: i32,
    pub list_id: Uuid,
    pub author_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Card {
    pub fn new(list_id: Uuid, title: impl Into<String>, position: i32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: None,
            position,
            list_id,
            author_id: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A registered user. Registration itself happens outside this crate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
}

impl User {
    pub fn new(email: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            username: username.into(),
        }
    }
}

/// Status of a board invitation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum InvitationStatus {
    /// Invited, not answered yet
    #[default]
    Pending,
    /// Invitee joined the board
    Accepted,
    /// Invitee declined
    Rejected,
}

impl InvitationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvitationStatus::Pending => "pending",
            InvitationStatus::Accepted => "accepted",
            InvitationStatus::Rejected => "rejected",
        }
    }

    /// Whether this is an answer an invitee may give.
    pub fn is_response(&self) -> bool {
        matches!(self, InvitationStatus::Accepted | InvitationStatus::Rejected)
    }
}

impl fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvitationStatus {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(InvitationStatus::Pending),
            "accepted" => Ok(InvitationStatus::Accepted),
            "rejected" => Ok(InvitationStatus::Rejected),
            other => Err(SharedError::validation(
                "status",
                format!("unknown invitation status '{other}'"),
            )),
        }
    }
}

/// Association between a board and an invited user.
///
/// At most one row exists per `(board_id, user_id)`; re-inviting rewrites it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoardMembership {
    pub id: Uuid,
    pub board_id: Uuid,
    pub user_id: Uuid,
    pub invited_by: Uuid,
    #[serde(default)]
    pub status: InvitationStatus,
}

impl BoardMembership {
    pub fn pending(board_id: Uuid, user_id: Uuid, invited_by: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            board_id,
            user_id,
            invited_by,
            status: InvitationStatus::Pending,
        }
    }
}

/// Accepted member of a board, joined with the user's profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MemberSummary {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub status: InvitationStatus,
    pub invited_by: Uuid,
}

/// A list together with its cards, ordered by position.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListWithCards {
    #[serde(flatten)]
    pub list: BoardList,
    pub cards: Vec<Card>,
}

/// Full board snapshot a client loads before following live events.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoardDetails {
    #[serde(flatten)]
    pub board: Board,
    pub lists: Vec<ListWithCards>,
}
