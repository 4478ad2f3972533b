pub mod aggregation;
pub mod estimator;
pub mod export;
pub mod ingest;
pub mod registry;
pub mod report;

pub use crate::domain::model::{BomItem, ItemId, ServiceCategory, SuggestedItem};
pub use crate::domain::ports::{ConfigProvider, Storage, SuggestionSource};
pub use crate::utils::error::Result;
