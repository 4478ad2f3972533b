pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command, EstimateArgs};

pub use adapters::{GeminiClient, LocalStorage};
pub use config::EstimatorConfig;
pub use core::{estimator::BomSummary, estimator::Estimator, registry::BomRegistry};
pub use domain::model::{BomItem, ItemId, ServiceCategory};
pub use utils::error::{EstimatorError, Result};
