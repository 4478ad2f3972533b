use crate::config::toml_config::EstimatorConfig;
use crate::core::registry::coerce_quantity;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Parser)]
#[command(name = "bom-estimator")]
#[command(about = "Estimate monthly cloud costs from a bill of materials")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List catalog services and regions
    Catalog,
    /// Build a BOM, print the estimate and optionally export it
    Estimate(EstimateArgs),
}

#[derive(Debug, Clone, Args)]
pub struct EstimateArgs {
    /// Catalog item to add; repeatable
    #[arg(long = "add", value_name = "ID[=QTY][@REGION]")]
    pub add: Vec<ItemSpec>,

    /// Project description sent to the suggestion service
    #[arg(long)]
    pub prompt: Option<String>,

    /// Write the CSV export
    #[arg(long)]
    pub export: bool,

    /// Override the export directory
    #[arg(long)]
    pub output_path: Option<String>,

    /// Number of services in the top-by-cost view
    #[arg(long)]
    pub top: Option<usize>,

    /// Print the BOM and summary as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

impl EstimateArgs {
    pub fn apply_to(&self, config: &mut EstimatorConfig) {
        if let Some(output_path) = &self.output_path {
            config.export.output_path = output_path.clone();
        }
        if let Some(top) = self.top {
            config.charts.top_n = top;
        }
    }
}

/// `ID[=QTY][@REGION]`, e.g. `vm-linux-d2s=3@West Europe`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSpec {
    pub service_id: String,
    pub quantity: u32,
    pub region: Option<String>,
}

impl FromStr for ItemSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (head, region) = match s.split_once('@') {
            Some((head, region)) => (head, Some(region.trim())),
            None => (s, None),
        };
        let (service_id, quantity) = match head.split_once('=') {
            Some((id, qty)) => (id.trim(), coerce_quantity(qty)),
            None => (head.trim(), 1),
        };

        if service_id.is_empty() {
            return Err(format!("missing service id in '{}'", s));
        }
        if region.is_some_and(str::is_empty) {
            return Err(format!("empty region in '{}'", s));
        }

        Ok(Self {
            service_id: service_id.to_string(),
            quantity,
            region: region.map(str::to_string),
        })
    }
}
