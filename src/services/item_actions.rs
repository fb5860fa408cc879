use crate::{
    entities::{item, item_action},
    errors::ServiceError,
    repositories::{ItemActionStore, ItemStore, NewItemAction},
};
use chrono::{Local, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

/// Action fields accepted on create and replace. Absent values count as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({ "price": "100", "quantity": -5 }))]
pub struct ItemActionPayload {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub price: Option<Decimal>,
    /// Positive for an insertion, negative for a sale
    #[serde(default)]
    pub quantity: Option<i64>,
}

impl ItemActionPayload {
    fn price(&self) -> Decimal {
        self.price.unwrap_or(Decimal::ZERO)
    }

    fn quantity(&self) -> i64 {
        self.quantity.unwrap_or(0)
    }
}

/// An action together with the item it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemActionDetails {
    pub action: item_action::Model,
    pub item: item::Model,
}

/// Wire shape of an action: timestamps stay internal, the item is nested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = ItemAction)]
pub struct ItemActionView {
    pub id: i64,
    #[schema(value_type = String)]
    pub price: Decimal,
    pub quantity: i64,
    pub item: item::Model,
}

impl From<ItemActionDetails> for ItemActionView {
    fn from(details: ItemActionDetails) -> Self {
        Self {
            id: details.action.id,
            price: details.action.price,
            quantity: details.action.quantity,
            item: details.item,
        }
    }
}

fn now_local() -> NaiveDateTime {
    Local::now().naive_local()
}

/// CRUD over the actions of one item
#[derive(Clone)]
pub struct ItemActionService {
    items: Arc<dyn ItemStore>,
    actions: Arc<dyn ItemActionStore>,
}

impl ItemActionService {
    pub fn new(items: Arc<dyn ItemStore>, actions: Arc<dyn ItemActionStore>) -> Self {
        Self { items, actions }
    }

    async fn require_item(&self, item_id: i64) -> Result<item::Model, ServiceError> {
        self.items.find_by_id(item_id).await?.ok_or_else(|| {
            warn!(item_id, "Item not found");
            ServiceError::item_not_found(item_id)
        })
    }

    #[instrument(skip(self))]
    pub async fn list_actions(&self, item_id: i64) -> Result<Vec<ItemActionDetails>, ServiceError> {
        let item = self.require_item(item_id).await?;
        let actions = self.actions.find_by_item(item_id).await?;

        Ok(actions
            .into_iter()
            .map(|action| ItemActionDetails {
                action,
                item: item.clone(),
            })
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn get_action(
        &self,
        item_id: i64,
        action_id: i64,
    ) -> Result<ItemActionDetails, ServiceError> {
        let action = self
            .actions
            .find_by_id_and_item(action_id, item_id)
            .await?
            .ok_or_else(|| {
                warn!(item_id, action_id, "Item action not found");
                ServiceError::item_action_not_found(item_id, action_id)
            })?;
        let item = self.require_item(item_id).await?;

        Ok(ItemActionDetails { action, item })
    }

    #[instrument(skip(self))]
    pub async fn create_action(
        &self,
        item_id: i64,
        input: ItemActionPayload,
    ) -> Result<ItemActionDetails, ServiceError> {
        let item = self.require_item(item_id).await?;
        let now = now_local();

        let action = self
            .actions
            .insert(NewItemAction {
                id: None,
                item_id,
                price: input.price(),
                quantity: input.quantity(),
                created_date: now,
                last_modified_date: now,
            })
            .await?;

        info!(item_id, action_id = action.id, quantity = action.quantity, "Created item action");
        Ok(ItemActionDetails { action, item })
    }

    /// Overwrites price and quantity of the action, creating it under
    /// `action_id` when no action has that id yet.
    #[instrument(skip(self))]
    pub async fn replace_action(
        &self,
        item_id: i64,
        action_id: i64,
        input: ItemActionPayload,
    ) -> Result<ItemActionDetails, ServiceError> {
        let item = self.require_item(item_id).await?;
        let now = now_local();

        let action = match self.actions.find_by_id_and_item(action_id, item_id).await? {
            Some(mut existing) => {
                existing.price = input.price();
                existing.quantity = input.quantity();
                existing.last_modified_date = now;
                self.actions.update(existing).await?
            }
            None => {
                if self.actions.find_by_id(action_id).await?.is_some() {
                    warn!(item_id, action_id, "Item action id belongs to another item");
                    return Err(ServiceError::ConstraintViolation(format!(
                        "Item action {} belongs to another item",
                        action_id
                    )));
                }
                self.actions
                    .insert(NewItemAction {
                        id: Some(action_id),
                        item_id,
                        price: input.price(),
                        quantity: input.quantity(),
                        created_date: now,
                        last_modified_date: now,
                    })
                    .await?
            }
        };

        info!(item_id, action_id, "Replaced item action");
        Ok(ItemActionDetails { action, item })
    }

    /// Removes the action when the item owns it. Missing actions are not an error.
    #[instrument(skip(self))]
    pub async fn delete_action(&self, item_id: i64, action_id: i64) -> Result<(), ServiceError> {
        self.require_item(item_id).await?;

        if self
            .actions
            .find_by_id_and_item(action_id, item_id)
            .await?
            .is_some()
        {
            self.actions.delete(action_id).await?;
            info!(item_id, action_id, "Deleted item action");
        }
        Ok(())
    }
}
