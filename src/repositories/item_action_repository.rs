use async_trait::async_trait;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityName, EntityTrait, NotSet,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use std::sync::Arc;
use tracing::debug;

use crate::entities::item;
use crate::entities::item_action::{
    self, ActiveModel as ItemActionActiveModel, Column, Entity as ItemAction,
};
use crate::errors::ServiceError;
use crate::repositories::{check_explicit_id, sync_id_sequence, Repository};

use super::BaseRepository;

/// Item action fields as handed to the store for insertion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewItemAction {
    pub id: Option<i64>,
    pub item_id: i64,
    pub price: Decimal,
    pub quantity: i64,
    pub created_date: NaiveDateTime,
    pub last_modified_date: NaiveDateTime,
}

/// Persistence seam for item actions
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemActionStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<item_action::Model>, ServiceError>;

    /// Matches only when the action belongs to `item_id`.
    async fn find_by_id_and_item(
        &self,
        id: i64,
        item_id: i64,
    ) -> Result<Option<item_action::Model>, ServiceError>;

    async fn find_by_item(&self, item_id: i64) -> Result<Vec<item_action::Model>, ServiceError>;

    /// Actions with `start <= created_date < end`, each joined with its item.
    async fn find_created_between(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<(item_action::Model, Option<item::Model>)>, ServiceError>;

    async fn insert(&self, action: NewItemAction) -> Result<item_action::Model, ServiceError>;

    async fn update(&self, action: item_action::Model)
        -> Result<item_action::Model, ServiceError>;

    async fn delete(&self, id: i64) -> Result<bool, ServiceError>;
}

/// Repository for item action operations
#[derive(Debug, Clone)]
pub struct ItemActionRepository {
    base: BaseRepository,
}

impl ItemActionRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

#[async_trait]
impl ItemActionStore for ItemActionRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<item_action::Model>, ServiceError> {
        Ok(ItemAction::find_by_id(id).one(self.base.get_db()).await?)
    }

    async fn find_by_id_and_item(
        &self,
        id: i64,
        item_id: i64,
    ) -> Result<Option<item_action::Model>, ServiceError> {
        Ok(ItemAction::find()
            .filter(Column::Id.eq(id))
            .filter(Column::ItemId.eq(item_id))
            .one(self.base.get_db())
            .await?)
    }

    async fn find_by_item(&self, item_id: i64) -> Result<Vec<item_action::Model>, ServiceError> {
        Ok(ItemAction::find()
            .filter(Column::ItemId.eq(item_id))
            .order_by_asc(Column::Id)
            .all(self.base.get_db())
            .await?)
    }

    async fn find_created_between(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<(item_action::Model, Option<item::Model>)>, ServiceError> {
        debug!(%start, %end, "Loading item actions in window");
        Ok(ItemAction::find()
            .filter(Column::CreatedDate.gte(start))
            .filter(Column::CreatedDate.lt(end))
            .order_by_asc(Column::Id)
            .find_also_related(item::Entity)
            .all(self.base.get_db())
            .await?)
    }

    async fn insert(&self, action: NewItemAction) -> Result<item_action::Model, ServiceError> {
        check_explicit_id(action.id, "item action")?;

        let active = ItemActionActiveModel {
            id: action.id.map_or(NotSet, Set),
            price: Set(action.price),
            quantity: Set(action.quantity),
            created_date: Set(action.created_date),
            last_modified_date: Set(action.last_modified_date),
            item_id: Set(action.item_id),
        };

        if action.id.is_none() {
            return Ok(active.insert(self.base.get_db()).await?);
        }

        let txn = self.base.get_db().begin().await?;
        let saved = active.insert(&txn).await?;
        sync_id_sequence(&txn, ItemAction.table_name()).await?;
        txn.commit().await?;
        Ok(saved)
    }

    async fn update(
        &self,
        action: item_action::Model,
    ) -> Result<item_action::Model, ServiceError> {
        let active = ItemActionActiveModel::from(action).reset_all();
        Ok(active.update(self.base.get_db()).await?)
    }

    async fn delete(&self, id: i64) -> Result<bool, ServiceError> {
        let result = ItemAction::delete_by_id(id)
            .exec(self.base.get_db())
            .await?;
        Ok(result.rows_affected > 0)
    }
}
