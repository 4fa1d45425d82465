pub mod engine;
pub mod feed;

pub use engine::ReconcileEngine;
pub use feed::{FeedSettings, SortDirection, SortField, TypeFilter};
