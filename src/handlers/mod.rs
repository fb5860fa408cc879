pub mod common;
pub mod item_actions;
pub mod item_summary;
pub mod items;
