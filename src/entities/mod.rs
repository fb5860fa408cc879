pub mod item;
pub mod item_action;
