/**
 * Board Event System
 *
 * Events pushed to live connections after a board mutation commits. Every
 * event is `{type, payload, timestamp}` where `type` is one of the fixed tags
 * below and `payload` is either a full entity snapshot or just its id.
 */
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::shared::board::{BoardList, BoardMembership, Card};

/// Tag of a board event, serialized as `LIST_CREATED`, `CARD_MOVED`, ...
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    ListCreated,
    ListUpdated,
    ListDeleted,
    ListReordered,
    CardCreated,
    CardUpdated,
    CardDeleted,
    CardMoved,
    /// Personal notification, never broadcast to a board group
    InvitationReceived,
    UserJoined,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::ListCreated => "LIST_CREATED",
            EventType::ListUpdated => "LIST_UPDATED",
            EventType::ListDeleted => "LIST_DELETED",
            EventType::ListReordered => "LIST_REORDERED",
            EventType::CardCreated => "CARD_CREATED",
            EventType::CardUpdated => "CARD_UPDATED",
            EventType::CardDeleted => "CARD_DELETED",
            EventType::CardMoved => "CARD_MOVED",
            EventType::InvitationReceived => "INVITATION_RECEIVED",
            EventType::UserJoined => "USER_JOINED",
        }
    }
}

/// Event delivered to live connections
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoardEvent {
    /// Type tag
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// Entity snapshot or identifier
    pub payload: serde_json::Value,
    /// RFC3339 time the event was built
    pub timestamp: String,
}

impl BoardEvent {
    pub fn new(event_type: EventType, payload: serde_json::Value) -> Self {
        Self {
            event_type,
            payload,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    fn snapshot<T: Serialize>(event_type: EventType, entity: &T) -> Self {
        let payload = serde_json::to_value(entity).unwrap_or_else(|e| {
            tracing::error!("[Events] Failed to serialize {} payload: {}", event_type.as_str(), e);
            serde_json::Value::Null
        });
        Self::new(event_type, payload)
    }

    pub fn list_created(list: &BoardList) -> Self {
        Self::snapshot(EventType::ListCreated, list)
    }

    pub fn list_updated(list: &BoardList) -> Self {
        Self::snapshot(EventType::ListUpdated, list)
    }

    pub fn list_reordered(list: &BoardList) -> Self {
        Self::snapshot(EventType::ListReordered, list)
    }

    pub fn list_deleted(list_id: Uuid) -> Self {
        Self::new(EventType::ListDeleted, json!({ "id": list_id }))
    }

    pub fn card_created(card: &Card) -> Self {
        Self::snapshot(EventType::CardCreated, card)
    }

    pub fn card_updated(card: &Card) -> Self {
        Self::snapshot(EventType::CardUpdated, card)
    }

    pub fn card_moved(card: &Card) -> Self {
        Self::snapshot(EventType::CardMoved, card)
    }

    pub fn card_deleted(card_id: Uuid) -> Self {
        Self::new(EventType::CardDeleted, json!({ "id": card_id }))
    }

    /// Personal notification for the invitee.
    pub fn invitation_received(membership: &BoardMembership, board_title: &str) -> Self {
        Self::new(
            EventType::InvitationReceived,
            json!({
                "id": membership.id,
                "board_id": membership.board_id,
                "board_title": board_title,
                "user_id": membership.user_id,
                "invited_by": membership.invited_by,
                "status": membership.status,
            }),
        )
    }

    pub fn user_joined(board_id: Uuid, user_id: Uuid) -> Self {
        Self::new(
            EventType::UserJoined,
            json!({ "board_id": board_id, "user_id": user_id }),
        )
    }
}
