// Item catalogue
pub mod items;

// Stock movements scoped to an item
pub mod item_actions;

// Read-only daily aggregation
pub mod item_summary;

pub use item_actions::{ItemActionDetails, ItemActionPayload, ItemActionService, ItemActionView};
pub use item_summary::{ItemSummary, ItemSummaryService};
pub use items::{ItemPayload, ItemService};
