//! Hypermedia envelopes for API responses.
//!
//! Single resources are rendered as their own fields plus `_links`; collections
//! as `_embedded.<relName>` plus `_links`. Services never see these types.

use crate::entities::item;
use crate::services::{ItemActionView, ItemSummary};
use serde::Serialize;
use std::collections::BTreeMap;

pub const REL_SELF: &str = "self";
pub const REL_ITEMS: &str = "items";
pub const REL_ITEM: &str = "item";
pub const REL_ITEM_ACTIONS: &str = "itemActions";

const ITEM_LIST: &str = "itemList";
const ITEM_ACTION_LIST: &str = "itemActionList";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub href: String,
}

pub type Links = BTreeMap<&'static str, Link>;

/// A resource with its links
#[derive(Debug, Clone, Serialize)]
pub struct EntityModel<T> {
    #[serde(flatten)]
    pub content: T,
    #[serde(rename = "_links")]
    pub links: Links,
}

impl<T> EntityModel<T> {
    pub fn self_href(&self) -> Option<&str> {
        self.links.get(REL_SELF).map(|link| link.href.as_str())
    }
}

/// A list of resources with links for the list itself
#[derive(Debug, Clone, Serialize)]
pub struct CollectionModel<T> {
    #[serde(rename = "_embedded")]
    pub embedded: BTreeMap<&'static str, Vec<EntityModel<T>>>,
    #[serde(rename = "_links")]
    pub links: Links,
}

/// Builds hrefs under the API root, e.g. `https://ims.example.com/api`.
#[derive(Debug, Clone)]
pub struct LinkBuilder {
    base: String,
}

impl LinkBuilder {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    pub fn items(&self) -> String {
        format!("{}/items", self.base)
    }

    pub fn item(&self, item_id: i64) -> String {
        format!("{}/items/{}", self.base, item_id)
    }

    pub fn item_actions(&self, item_id: i64) -> String {
        format!("{}/items/{}/itemActions", self.base, item_id)
    }

    pub fn item_action(&self, item_id: i64, action_id: i64) -> String {
        format!("{}/items/{}/itemActions/{}", self.base, item_id, action_id)
    }

    pub fn summary(&self) -> String {
        format!("{}/items/summary", self.base)
    }

    fn links<const N: usize>(pairs: [(&'static str, String); N]) -> Links {
        pairs
            .into_iter()
            .map(|(rel, href)| (rel, Link { href }))
            .collect()
    }

    pub fn item_model(&self, item: item::Model) -> EntityModel<item::Model> {
        let links = Self::links([
            (REL_SELF, self.item(item.id)),
            (REL_ITEMS, self.items()),
            (REL_ITEM_ACTIONS, self.item_actions(item.id)),
        ]);
        EntityModel {
            content: item,
            links,
        }
    }

    pub fn item_collection(&self, items: Vec<item::Model>) -> CollectionModel<item::Model> {
        let models = items.into_iter().map(|i| self.item_model(i)).collect();
        CollectionModel {
            embedded: BTreeMap::from([(ITEM_LIST, models)]),
            links: Self::links([(REL_SELF, self.items())]),
        }
    }

    pub fn item_action_model(&self, action: ItemActionView) -> EntityModel<ItemActionView> {
        let item_id = action.item.id;
        let links = Self::links([
            (REL_SELF, self.item_action(item_id, action.id)),
            (REL_ITEMS, self.items()),
            (REL_ITEM_ACTIONS, self.item_actions(item_id)),
        ]);
        EntityModel {
            content: action,
            links,
        }
    }

    pub fn item_action_collection(
        &self,
        item_id: i64,
        actions: Vec<ItemActionView>,
    ) -> CollectionModel<ItemActionView> {
        let models = actions
            .into_iter()
            .map(|a| self.item_action_model(a))
            .collect();
        CollectionModel {
            embedded: BTreeMap::from([(ITEM_ACTION_LIST, models)]),
            links: Self::links([
                (REL_SELF, self.item_actions(item_id)),
                (REL_ITEM, self.item(item_id)),
            ]),
        }
    }

    pub fn summary_model(&self, summary: ItemSummary) -> EntityModel<ItemSummary> {
        EntityModel {
            content: summary,
            links: Self::links([(REL_SELF, self.summary()), (REL_ITEMS, self.items())]),
        }
    }
}
