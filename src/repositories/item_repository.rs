use async_trait::async_trait;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityName, EntityTrait, NotSet,
    QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::entities::item::{
    self, default_item_code, ActiveModel as ItemActiveModel, Column, Entity as Item,
};
use crate::errors::ServiceError;
use crate::repositories::{check_explicit_id, sync_id_sequence, Repository};

use super::BaseRepository;

/// Item fields as handed to the store for insertion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewItem {
    /// Explicit identifier, or `None` for a database-assigned one
    pub id: Option<i64>,
    /// `None` stores the `IMS-{id}` placeholder once the id is known
    pub code: Option<String>,
    pub name: String,
    pub cost: Decimal,
    pub price: Decimal,
    pub quantity: i64,
}

/// Persistence seam for items
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn find_all(&self) -> Result<Vec<item::Model>, ServiceError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<item::Model>, ServiceError>;

    async fn find_by_code(&self, code: &str) -> Result<Option<item::Model>, ServiceError>;

    /// Persists a new item. Rejects a non-positive explicit id with `InvalidArgument`.
    async fn insert(&self, item: NewItem) -> Result<item::Model, ServiceError>;

    /// Overwrites every column of an existing item.
    async fn update(&self, item: item::Model) -> Result<item::Model, ServiceError>;

    /// Returns whether a row was removed.
    async fn delete(&self, id: i64) -> Result<bool, ServiceError>;
}

/// Repository for item operations
#[derive(Debug, Clone)]
pub struct ItemRepository {
    base: BaseRepository,
}

impl ItemRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn active_model(item: &NewItem, id: Option<i64>, code: String) -> ItemActiveModel {
        ItemActiveModel {
            id: id.map_or(NotSet, Set),
            code: Set(code),
            name: Set(item.name.clone()),
            cost: Set(item.cost),
            price: Set(item.price),
            quantity: Set(item.quantity),
        }
    }

    /// Inserts under a unique temporary code, then swaps in `IMS-{id}` in the same transaction.
    /// A client may already own `IMS-{id}` as an explicit code; that is a duplicate create.
    async fn insert_with_generated_code(&self, item: NewItem) -> Result<item::Model, ServiceError> {
        let txn = self.base.get_db().begin().await?;

        let pending_code = format!("IMS-pending-{}", Uuid::new_v4());
        let inserted = Self::active_model(&item, None, pending_code)
            .insert(&txn)
            .await?;

        let id = inserted.id;
        let mut active: ItemActiveModel = inserted.into();
        active.code = Set(default_item_code(id));
        let saved = active.update(&txn).await.map_err(|err| match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => ServiceError::duplicate_resource(),
            _ => ServiceError::from(err),
        })?;

        txn.commit().await?;
        Ok(saved)
    }

    /// Inserts under a caller-chosen id and keeps the id sequence ahead of it.
    async fn insert_with_explicit_id(
        &self,
        item: NewItem,
        id: i64,
        code: String,
    ) -> Result<item::Model, ServiceError> {
        let txn = self.base.get_db().begin().await?;

        let saved = Self::active_model(&item, Some(id), code)
            .insert(&txn)
            .await?;
        sync_id_sequence(&txn, Item.table_name()).await?;

        txn.commit().await?;
        Ok(saved)
    }
}

#[async_trait]
impl ItemStore for ItemRepository {
    async fn find_all(&self) -> Result<Vec<item::Model>, ServiceError> {
        Ok(Item::find()
            .order_by_asc(Column::Id)
            .all(self.base.get_db())
            .await?)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<item::Model>, ServiceError> {
        Ok(Item::find_by_id(id).one(self.base.get_db()).await?)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<item::Model>, ServiceError> {
        Ok(Item::find()
            .filter(Column::Code.eq(code))
            .one(self.base.get_db())
            .await?)
    }

    async fn insert(&self, item: NewItem) -> Result<item::Model, ServiceError> {
        check_explicit_id(item.id, "item")?;
        debug!(id = ?item.id, code = ?item.code, "Inserting item");

        match (item.id, item.code.clone()) {
            (Some(id), code) => {
                let code = code.unwrap_or_else(|| default_item_code(id));
                self.insert_with_explicit_id(item, id, code).await
            }
            (None, Some(code)) => Ok(Self::active_model(&item, None, code)
                .insert(self.base.get_db())
                .await?),
            (None, None) => self.insert_with_generated_code(item).await,
        }
    }

    async fn update(&self, item: item::Model) -> Result<item::Model, ServiceError> {
        let active = ItemActiveModel::from(item).reset_all();
        Ok(active.update(self.base.get_db()).await?)
    }

    async fn delete(&self, id: i64) -> Result<bool, ServiceError> {
        let result = Item::delete_by_id(id).exec(self.base.get_db()).await?;
        Ok(result.rows_affected > 0)
    }
}
