use crate::{
    entities::item::{self, DEFAULT_ITEM_NAME},
    errors::ServiceError,
    repositories::{ItemStore, NewItem},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

/// Item fields accepted on create and replace. Absent fields keep their
/// defaults on create and their stored values on replace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "code": "WID-001",
    "name": "Widget",
    "cost": "80",
    "price": "100",
    "quantity": 12
}))]
pub struct ItemPayload {
    /// Ignored; the path or the database decides the identifier
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub cost: Option<Decimal>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub quantity: Option<i64>,
}

impl ItemPayload {
    /// Copies every present field onto `item`.
    fn overlay(self, item: &mut item::Model) {
        if let Some(code) = self.code {
            item.code = code;
        }
        if let Some(name) = self.name {
            item.name = name;
        }
        if let Some(cost) = self.cost {
            item.cost = cost;
        }
        if let Some(price) = self.price {
            item.price = price;
        }
        if let Some(quantity) = self.quantity {
            item.quantity = quantity;
        }
    }
}

/// CRUD over items
#[derive(Clone)]
pub struct ItemService {
    store: Arc<dyn ItemStore>,
}

impl ItemService {
    pub fn new(store: Arc<dyn ItemStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self))]
    pub async fn list_items(&self) -> Result<Vec<item::Model>, ServiceError> {
        self.store.find_all().await
    }

    #[instrument(skip(self))]
    pub async fn get_item(&self, id: i64) -> Result<item::Model, ServiceError> {
        self.store.find_by_id(id).await?.ok_or_else(|| {
            warn!(item_id = id, "Item not found");
            ServiceError::item_not_found(id)
        })
    }

    /// Creates an item with a database-assigned id. A payload id is ignored.
    #[instrument(skip(self))]
    pub async fn create_item(&self, input: ItemPayload) -> Result<item::Model, ServiceError> {
        if let Some(ref code) = input.code {
            self.ensure_unique_code(code).await?;
        }

        let item = self
            .store
            .insert(NewItem {
                id: None,
                code: input.code,
                name: input.name.unwrap_or_else(|| DEFAULT_ITEM_NAME.to_string()),
                cost: input.cost.unwrap_or(Decimal::ZERO),
                price: input.price.unwrap_or(Decimal::ZERO),
                quantity: input.quantity.unwrap_or(0),
            })
            .await?;

        info!(item_id = item.id, code = %item.code, "Created item");
        Ok(item)
    }

    /// Overwrites the present fields of item `id`, creating it under that id
    /// when it does not exist yet.
    #[instrument(skip(self))]
    pub async fn replace_item(
        &self,
        id: i64,
        input: Option<ItemPayload>,
    ) -> Result<item::Model, ServiceError> {
        let input =
            input.ok_or_else(|| ServiceError::NullInput("Item payload is required".to_string()))?;

        match self.store.find_by_id(id).await? {
            Some(mut existing) => {
                input.overlay(&mut existing);
                let item = self.store.update(existing).await?;
                info!(item_id = id, "Replaced item");
                Ok(item)
            }
            None => {
                let mut fresh = item::Model::with_defaults(id);
                input.overlay(&mut fresh);
                let item = self
                    .store
                    .insert(NewItem {
                        id: Some(id),
                        code: Some(fresh.code),
                        name: fresh.name,
                        cost: fresh.cost,
                        price: fresh.price,
                        quantity: fresh.quantity,
                    })
                    .await?;
                info!(item_id = id, "Created item through replace");
                Ok(item)
            }
        }
    }

    /// Removes item `id`. Missing items are not an error.
    #[instrument(skip(self))]
    pub async fn delete_item(&self, id: i64) -> Result<(), ServiceError> {
        if self.store.delete(id).await? {
            info!(item_id = id, "Deleted item");
        } else {
            warn!(item_id = id, "Delete requested for missing item");
        }
        Ok(())
    }

    async fn ensure_unique_code(&self, code: &str) -> Result<(), ServiceError> {
        if self.store.find_by_code(code).await?.is_some() {
            warn!(code, "Rejected duplicate item code");
            return Err(ServiceError::duplicate_resource());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::item_repository::MockItemStore;
    use assert_matches::assert_matches;
    use mockall::predicate::eq;
    use rust_decimal_macros::dec;

    fn widget(id: i64) -> item::Model {
        item::Model {
            id,
            code: "WID-001".to_string(),
            name: "Widget".to_string(),
            cost: dec!(80),
            price: dec!(100),
            quantity: 10,
        }
    }

    fn service(store: MockItemStore) -> ItemService {
        ItemService::new(Arc::new(store))
    }

    fn saved(item: NewItem, id: i64) -> item::Model {
        item::Model {
            id: item.id.unwrap_or(id),
            code: item.code.unwrap_or_else(|| item::default_item_code(id)),
            name: item.name,
            cost: item.cost,
            price: item.price,
            quantity: item.quantity,
        }
    }

    #[tokio::test]
    async fn list_items_returns_store_contents() {
        let mut store = MockItemStore::new();
        store
            .expect_find_all()
            .times(1)
            .returning(|| Ok(vec![widget(1), widget(2)]));

        let items = service(store).list_items().await.unwrap();
        assert_eq!(items.len(), 2);
    }

    #[tokio::test]
    async fn get_item_missing_is_not_found() {
        let mut store = MockItemStore::new();
        store
            .expect_find_by_id()
            .with(eq(42))
            .returning(|_| Ok(None));

        let err = service(store).get_item(42).await.unwrap_err();
        assert_matches!(err, ServiceError::NotFound(msg) if msg == "Item 42 not found");
    }

    #[tokio::test]
    async fn create_item_with_duplicate_code_saves_nothing() {
        let mut store = MockItemStore::new();
        store
            .expect_find_by_code()
            .withf(|code| code.to_string() == "WID-001")
            .returning(|_| Ok(Some(widget(1))));
        store.expect_insert().never();

        let input = ItemPayload {
            code: Some("WID-001".into()),
            ..Default::default()
        };
        let err = service(store).create_item(input).await.unwrap_err();
        assert_matches!(err, ServiceError::UniqueViolation(msg) if msg == "Duplicate Resource");
    }

    #[tokio::test]
    async fn create_item_ignores_payload_id_and_fills_defaults() {
        let mut store = MockItemStore::new();
        store.expect_find_by_code().never();
        store
            .expect_insert()
            .withf(|item| {
                item.id.is_none()
                    && item.code.is_none()
                    && item.name == DEFAULT_ITEM_NAME
                    && item.cost == Decimal::ZERO
                    && item.quantity == 0
            })
            .times(1)
            .returning(|item| Ok(saved(item, 7)));

        let input = ItemPayload {
            id: Some(99),
            ..Default::default()
        };
        let item = service(store).create_item(input).await.unwrap();
        assert_eq!(item.id, 7);
        assert_eq!(item.code, "IMS-7");
        assert_eq!(item.name, "IMS-Item");
    }

    #[tokio::test]
    async fn replace_item_without_payload_is_null_input() {
        let mut store = MockItemStore::new();
        store.expect_find_by_id().never();
        store.expect_update().never();
        store.expect_insert().never();

        let err = service(store).replace_item(1, None).await.unwrap_err();
        assert_matches!(err, ServiceError::NullInput(_));
    }

    #[tokio::test]
    async fn replace_existing_item_overwrites_present_fields_only() {
        let mut store = MockItemStore::new();
        store
            .expect_find_by_id()
            .with(eq(1))
            .returning(|id| Ok(Some(widget(id))));
        store
            .expect_update()
            .withf(|item| {
                item.id == 1
                    && item.name == "Gadget"
                    && item.code == "WID-001"
                    && item.price == dec!(120)
                    && item.cost == dec!(80)
            })
            .times(1)
            .returning(Ok);

        let input = ItemPayload {
            name: Some("Gadget".into()),
            price: Some(dec!(120)),
            ..Default::default()
        };
        let item = service(store).replace_item(1, Some(input)).await.unwrap();
        assert_eq!(item.name, "Gadget");
        assert_eq!(item.quantity, 10);
    }

    #[tokio::test]
    async fn replace_missing_item_inserts_with_path_id() {
        let mut store = MockItemStore::new();
        store.expect_find_by_id().returning(|_| Ok(None));
        store
            .expect_insert()
            .withf(|item| {
                item.id == Some(5)
                    && item.code.as_deref() == Some("IMS-5")
                    && item.name == "Gadget"
                    && item.price == Decimal::ZERO
            })
            .times(1)
            .returning(|item| Ok(saved(item, 5)));

        let input = ItemPayload {
            name: Some("Gadget".into()),
            ..Default::default()
        };
        let item = service(store).replace_item(5, Some(input)).await.unwrap();
        assert_eq!(item.id, 5);
        assert_eq!(item.code, "IMS-5");
    }

    #[tokio::test]
    async fn replace_propagates_store_rejection() {
        let mut store = MockItemStore::new();
        store.expect_find_by_id().returning(|_| Ok(None));
        store
            .expect_insert()
            .returning(|_| Err(ServiceError::InvalidArgument("Invalid item ID: 0".into())));

        let err = service(store)
            .replace_item(0, Some(ItemPayload::default()))
            .await
            .unwrap_err();
        assert_matches!(err, ServiceError::InvalidArgument(_));
    }

    #[tokio::test]
    async fn delete_item_is_idempotent() {
        let mut store = MockItemStore::new();
        store.expect_delete().with(eq(3)).returning(|_| Ok(false));

        assert!(service(store).delete_item(3).await.is_ok());
    }

    #[tokio::test]
    async fn delete_item_surfaces_constraint_violation() {
        let mut store = MockItemStore::new();
        store
            .expect_delete()
            .returning(|_| Err(ServiceError::ConstraintViolation("FOREIGN KEY".into())));

        let err = service(store).delete_item(3).await.unwrap_err();
        assert_matches!(err, ServiceError::ConstraintViolation(_));
    }
}
