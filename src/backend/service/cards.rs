//! Card operations
//!
//! Cards are addressed by id; their board is found through their list. A card
//! only ever moves between lists of the same board.

use chrono::Utc;
use uuid::Uuid;

use crate::backend::error::{BackendError, Resource};
use crate::backend::ledger::{apply_plan, plan_across, plan_insert, plan_remove};
use crate::backend::service::{visible_card, visible_list, BoardService, Outbox};
use crate::backend::storage::SiblingScope;
use crate::shared::board::Card;
use crate::shared::event::BoardEvent;
use crate::shared::patch::{CardPatch, NewCard};

impl BoardService {
    /// Create a card authored by `user_id` at the requested index, or append it.
    pub async fn create_card(&self, user_id: Uuid, list_id: Uuid, input: NewCard) -> Result<Card, BackendError> {
        input.validate()?;
        let mut uow = self.begin().await?;
        let mut outbox = Outbox::default();
        let result = async {
            let uow = uow.as_mut();
            let list = visible_list(uow, list_id, user_id).await?;
            let count = uow.cards_ordered(list_id).await?.len();
            let plan = plan_insert(SiblingScope::Cards(list_id), count, input.position)?;
            apply_plan(uow, &plan).await?;

            let mut card = Card::new(list_id, input.title, plan.target);
            card.description = input.description;
            card.author_id = Some(user_id);
            uow.insert_card(&card).await?;
            outbox.broadcast(list.board_id, BoardEvent::card_created(&card));
            Ok::<_, BackendError>(card)
        }
        .await;
        let card = self.finish("create_card", uow, outbox, result).await?;
        tracing::info!("[Service] Card {} created in list {} at {}", card.id, list_id, card.position);
        Ok(card)
    }

    /// Cards of a list ordered by position.
    pub async fn list_cards(&self, user_id: Uuid, list_id: Uuid) -> Result<Vec<Card>, BackendError> {
        let mut uow = self.begin().await?;
        let result = async {
            let uow = uow.as_mut();
            visible_list(uow, list_id, user_id).await?;
            Ok::<_, BackendError>(uow.cards_ordered(list_id).await?)
        }
        .await;
        self.finish("list_cards", uow, Outbox::default(), result).await
    }

    /// Apply the fields present in `patch`. Moving goes through [`Self::move_card`].
    pub async fn update_card(&self, user_id: Uuid, card_id: Uuid, patch: CardPatch) -> Result<Card, BackendError> {
        patch.validate()?;
        let mut uow = self.begin().await?;
        let mut outbox = Outbox::default();
        let result = async {
            let uow = uow.as_mut();
            let (mut card, list) = visible_card(uow, card_id, user_id).await?;
            if patch.apply_to(&mut card) {
                uow.update_card(&card).await?;
                outbox.broadcast(list.board_id, BoardEvent::card_updated(&card));
            }
            Ok::<_, BackendError>(card)
        }
        .await;
        self.finish("update_card", uow, outbox, result).await
    }

    /// Delete a card, closing the gap it leaves in its list.
    pub async fn delete_card(&self, user_id: Uuid, card_id: Uuid) -> Result<(), BackendError> {
        let mut uow = self.begin().await?;
        let mut outbox = Outbox::default();
        let result = async {
            let uow = uow.as_mut();
            let (card, list) = visible_card(uow, card_id, user_id).await?;
            uow.delete_card(card.id).await?;
            apply_plan(uow, &plan_remove(SiblingScope::Cards(list.id), card.position)?).await?;
            outbox.broadcast(list.board_id, BoardEvent::card_deleted(card.id));
            Ok::<_, BackendError>(())
        }
        .await;
        self.finish("delete_card", uow, outbox, result).await?;
        tracing::info!("[Service] Card {} deleted", card_id);
        Ok(())
    }

    /// Move a card to `new_position` in `target_list_id`, which may be its
    /// current list. Indexes past the end of the target append.
    pub async fn move_card(
        &self,
        user_id: Uuid,
        card_id: Uuid,
        target_list_id: Uuid,
        new_position: i32,
    ) -> Result<Card, BackendError> {
        let mut uow = self.begin().await?;
        let mut outbox = Outbox::default();
        let result = async {
            let uow = uow.as_mut();
            let (mut card, source) = visible_card(uow, card_id, user_id).await?;
            let target = uow
                .list(target_list_id)
                .await?
                .filter(|list| list.board_id == source.board_id)
                .ok_or(BackendError::not_found(Resource::List))?;

            let source_count = uow.cards_ordered(source.id).await?.len();
            let target_count = if target.id == source.id {
                source_count
            } else {
                uow.cards_ordered(target.id).await?.len()
            };
            let plan = plan_across(
                SiblingScope::Cards(source.id),
                source_count,
                card.position,
                SiblingScope::Cards(target.id),
                target_count,
                new_position,
            )?;
            if plan.is_noop() {
                return Ok::<_, BackendError>(card);
            }

            apply_plan(uow, &plan).await?;
            card.list_id = target.id;
            card.position = plan.target;
            card.updated_at = Utc::now();
            uow.update_card(&card).await?;
            outbox.broadcast(source.board_id, BoardEvent::card_moved(&card));
            Ok::<_, BackendError>(card)
        }
        .await;
        let card = self.finish("move_card", uow, outbox, result).await?;
        tracing::info!("[Service] Card {} now at {} in list {}", card.id, card.position, card.list_id);
        Ok(card)
    }
}
