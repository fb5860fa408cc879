use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Code and name given to items that were persisted without them.
pub const DEFAULT_ITEM_NAME: &str = "IMS-Item";

pub fn default_item_code(id: i64) -> String {
    format!("IMS-{}", id)
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "items")]
#[serde(rename_all = "camelCase")]
#[schema(as = Item, example = json!({
    "id": 1,
    "code": "IMS-1",
    "name": "Widget",
    "cost": "80",
    "price": "100",
    "quantity": 12
}))]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub code: String,
    pub name: String,
    #[schema(value_type = String)]
    pub cost: Decimal,
    #[schema(value_type = String)]
    pub price: Decimal,
    pub quantity: i64,
}

impl Model {
    /// An item carrying only the defaults for `id`.
    pub fn with_defaults(id: i64) -> Self {
        Self {
            id,
            code: default_item_code(id),
            name: DEFAULT_ITEM_NAME.to_string(),
            cost: Decimal::ZERO,
            price: Decimal::ZERO,
            quantity: 0,
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::item_action::Entity")]
    ItemActions,
}

impl Related<super::item_action::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ItemActions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
