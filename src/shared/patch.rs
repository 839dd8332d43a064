//! Creation inputs and partial updates
//!
//! Every patch field is optional; `apply_to` assigns only the fields that are
//! present and reports whether anything changed.

use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::shared::board::{Board, BoardList, Card, InvitationStatus};
use crate::shared::error::SharedError;

pub const BOARD_TITLE_MAX: usize = 255;
pub const LIST_TITLE_MAX: usize = 100;
pub const CARD_TITLE_MAX: usize = 150;

fn validate_title(title: &str, max: usize) -> Result<(), SharedError> {
    if title.trim().is_empty() {
        return Err(SharedError::validation("title", "title cannot be empty"));
    }
    if title.chars().count() > max {
        return Err(SharedError::validation(
            "title",
            format!("title exceeds {max} characters"),
        ));
    }
    Ok(())
}

fn validate_position(position: Option<i32>) -> Result<(), SharedError> {
    match position {
        Some(p) if p < 0 => Err(SharedError::validation("position", "position cannot be negative")),
        _ => Ok(()),
    }
}

/// Distinguishes an absent field from an explicit `null`.
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewBoard {
    pub title: String,
}

impl NewBoard {
    pub fn validate(&self) -> Result<(), SharedError> {
        validate_title(&self.title, BOARD_TITLE_MAX)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoardPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl BoardPatch {
    pub fn validate(&self) -> Result<(), SharedError> {
        match &self.title {
            Some(title) => validate_title(title, BOARD_TITLE_MAX),
            None => Ok(()),
        }
    }

    pub fn apply_to(&self, board: &mut Board) -> bool {
        let mut changed = false;
        if let Some(title) = &self.title {
            board.title = title.clone();
            changed = true;
        }
        changed
    }
}

/// Input for a new list. Without a position the list is appended.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewList {
    pub title: String,
    #[serde(default)]
    pub position: Option<i32>,
}

impl NewList {
    pub fn validate(&self) -> Result<(), SharedError> {
        validate_title(&self.title, LIST_TITLE_MAX)?;
        validate_position(self.position)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl ListPatch {
    pub fn validate(&self) -> Result<(), SharedError> {
        match &self.title {
            Some(title) => validate_title(title, LIST_TITLE_MAX),
            None => Ok(()),
        }
    }

    pub fn apply_to(&self, list: &mut BoardList) -> bool {
        let mut changed = false;
        if let Some(title) = &self.title {
            list.title = title.clone();
            changed = true;
        }
        if changed {
            list.updated_at = Utc::now();
        }
        changed
    }
}

/// Input for a new card. Without a position the card is appended.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewCard {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub position: Option<i32>,
}

impl NewCard {
    pub fn validate(&self) -> Result<(), SharedError> {
        validate_title(&self.title, CARD_TITLE_MAX)?;
        validate_position(self.position)
    }
}

/// Partial card update. `description: Some(None)` clears the description.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
}

impl CardPatch {
    pub fn validate(&self) -> Result<(), SharedError> {
        match &self.title {
            Some(title) => validate_title(title, CARD_TITLE_MAX),
            None => Ok(()),
        }
    }

    pub fn apply_to(&self, card: &mut Card) -> bool {
        let mut changed = false;
        if let Some(title) = &self.title {
            card.title = title.clone();
            changed = true;
        }
        if let Some(description) = &self.description {
            card.description = description.clone();
            changed = true;
        }
        if changed {
            card.updated_at = Utc::now();
        }
        changed
    }
}

/// Body of a list reorder request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReorderList {
    pub new_position: i32,
}

/// Body of a card move request. The target list may be the card's own.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MoveCard {
    pub new_list_id: Uuid,
    pub new_position: i32,
}

/// Body of a board invitation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InviteMember {
    pub email: String,
}

/// Body of an invitee's answer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct InvitationAnswer {
    pub status: InvitationStatus,
}
