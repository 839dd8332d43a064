//! Invitations, membership and live connections
//!
//! Invitations are addressed by email and go only to the invitee's personal
//! connections. Accepting one is announced on the board; rejecting one is not.

use uuid::Uuid;

use crate::backend::error::{BackendError, Resource};
use crate::backend::realtime::{ConnectionHandle, ConnectionId};
use crate::backend::service::{accessible_board, owned_board, visible_board, BoardService, Outbox};
use crate::shared::board::{BoardMembership, InvitationStatus, MemberSummary};
use crate::shared::event::BoardEvent;

impl BoardService {
    /// Invite the user registered under `email`. Owner only. Re-inviting
    /// resets an existing invitation to pending.
    pub async fn invite_member(
        &self,
        inviter_id: Uuid,
        board_id: Uuid,
        email: &str,
    ) -> Result<BoardMembership, BackendError> {
        let mut uow = self.begin().await?;
        let mut outbox = Outbox::default();
        let result = async {
            let uow = uow.as_mut();
            let board = owned_board(uow, board_id, inviter_id, "invite users").await?;
            let invitee = uow
                .user_by_email(email)
                .await?
                .ok_or(BackendError::not_found(Resource::User))?;
            if invitee.id == inviter_id {
                return Err(BackendError::permission_denied("Cannot invite yourself to the board"));
            }

            let membership = match uow.membership(board_id, invitee.id).await? {
                Some(mut existing) => {
                    existing.status = InvitationStatus::Pending;
                    existing.invited_by = inviter_id;
                    existing
                }
                None => BoardMembership::pending(board_id, invitee.id, inviter_id),
            };
            uow.upsert_membership(&membership).await?;
            outbox.notify(invitee.id, BoardEvent::invitation_received(&membership, &board.title));
            Ok::<_, BackendError>(membership)
        }
        .await;
        let membership = self.finish("invite_member", uow, outbox, result).await?;
        tracing::info!("[Service] User {} invited to board {}", membership.user_id, board_id);
        Ok(membership)
    }

    /// Answer a pending invitation as the invitee.
    pub async fn respond_to_invitation(
        &self,
        user_id: Uuid,
        board_id: Uuid,
        status: InvitationStatus,
    ) -> Result<BoardMembership, BackendError> {
        if !status.is_response() {
            return Err(BackendError::invalid_input(
                "status",
                "Status must be 'accepted' or 'rejected'",
            ));
        }
        let mut uow = self.begin().await?;
        let mut outbox = Outbox::default();
        let result = async {
            let uow = uow.as_mut();
            let mut membership = uow
                .membership(board_id, user_id)
                .await?
                .ok_or(BackendError::not_found(Resource::Membership))?;
            if membership.status != InvitationStatus::Pending {
                return Err(BackendError::invalid_input(
                    "status",
                    format!("Invitation was already {}", membership.status),
                ));
            }

            membership.status = status;
            uow.upsert_membership(&membership).await?;
            if status == InvitationStatus::Accepted {
                outbox.broadcast(board_id, BoardEvent::user_joined(board_id, user_id));
            }
            Ok::<_, BackendError>(membership)
        }
        .await;
        let membership = self.finish("respond_to_invitation", uow, outbox, result).await?;
        tracing::info!("[Service] User {} {} board {}", user_id, membership.status, board_id);
        Ok(membership)
    }

    /// Accepted members of a board with their profiles.
    pub async fn board_members(&self, user_id: Uuid, board_id: Uuid) -> Result<Vec<MemberSummary>, BackendError> {
        let mut uow = self.begin().await?;
        let result = async {
            let uow = uow.as_mut();
            visible_board(uow, board_id, user_id).await?;
            let mut members = Vec::new();
            for membership in uow.memberships_by_status(board_id, InvitationStatus::Accepted).await? {
                let Some(user) = uow.user(membership.user_id).await? else {
                    continue;
                };
                members.push(MemberSummary {
                    id: membership.id,
                    user_id: user.id,
                    username: user.username,
                    email: user.email,
                    status: membership.status,
                    invited_by: membership.invited_by,
                });
            }
            Ok::<_, BackendError>(members)
        }
        .await;
        self.finish("board_members", uow, Outbox::default(), result).await
    }

    /// Invitations still waiting for `user_id` to answer.
    pub async fn pending_invitations(&self, user_id: Uuid) -> Result<Vec<BoardMembership>, BackendError> {
        let mut uow = self.begin().await?;
        let result = uow.pending_invitations(user_id).await.map_err(BackendError::from);
        self.finish("pending_invitations", uow, Outbox::default(), result).await
    }

    /// Whether `user_id` owns the board or has accepted an invitation to it.
    pub async fn has_board_access(&self, user_id: Uuid, board_id: Uuid) -> Result<bool, BackendError> {
        let mut uow = self.begin().await?;
        let result = accessible_board(uow.as_mut(), board_id, user_id)
            .await
            .map(|board| board.is_some());
        self.finish("has_board_access", uow, Outbox::default(), result).await
    }

    /// Attach a live connection to a board's group after checking access.
    pub async fn connect_board(&self, board_id: Uuid, conn: ConnectionHandle) -> Result<(), BackendError> {
        let user_id = conn.user_id();
        if !self.has_board_access(user_id, board_id).await? {
            tracing::warn!("[Service] {} refused board {} for user {}", conn.id(), board_id, user_id);
            return Err(BackendError::not_found(Resource::Board));
        }
        self.registry.join(board_id, conn);
        Ok(())
    }

    /// Attach a live connection to its user's personal notifications.
    pub fn connect_user(&self, conn: ConnectionHandle) {
        self.registry.join_subject(conn.user_id(), conn);
    }

    /// Forget a connection everywhere it is registered.
    pub fn disconnect(&self, conn_id: ConnectionId) {
        self.registry.disconnect(conn_id);
    }
}
