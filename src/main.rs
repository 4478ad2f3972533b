use bom_estimator::core::report;
use bom_estimator::domain::catalog;
use bom_estimator::domain::ports::ConfigProvider;
use bom_estimator::utils::error::ErrorSeverity;
use bom_estimator::utils::{logger, validation::Validate};
use bom_estimator::{
    CliConfig, Command, EstimateArgs, Estimator, EstimatorConfig, EstimatorError, GeminiClient,
    LocalStorage,
};
use clap::Parser;
use serde_json::json;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting bom-estimator");
    if cli.verbose {
        tracing::debug!("CLI args: {:?}", cli);
    }

    let result = match &cli.command {
        Command::Catalog => {
            print_catalog();
            Ok(())
        }
        Command::Estimate(args) => match load_config(&cli, args) {
            Ok(config) => run_estimate(&config, args).await,
            Err(e) => Err(e),
        },
    };

    if let Err(e) = result {
        tracing::error!(
            "❌ bom-estimator failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

fn load_config(cli: &CliConfig, args: &EstimateArgs) -> Result<EstimatorConfig, EstimatorError> {
    let mut config = EstimatorConfig::load(cli.config.as_deref())?;
    args.apply_to(&mut config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        return Err(e);
    }
    Ok(config)
}

fn print_catalog() {
    println!("{:<22} {:<40} {:<24} {:>10}  Unit", "ID", "Service", "Category", "Price");
    for service in catalog::services() {
        println!(
            "{:<22} {:<40} {:<24} {:>10}  {}",
            service.id,
            service.name,
            service.category.to_string(),
            report::format_money(service.base_price),
            service.unit
        );
    }
    println!();
    println!("Regions: {}", catalog::regions().join(", "));
}

async fn run_estimate(config: &EstimatorConfig, args: &EstimateArgs) -> Result<(), EstimatorError> {
    let mut estimator = Estimator::new(GeminiClient::from_config(config));

    for spec in &args.add {
        let region = spec.region.as_deref().unwrap_or(config.default_region());
        estimator.add_from_catalog(&spec.service_id, region, spec.quantity)?;
    }

    if let Some(prompt) = &args.prompt {
        tracing::info!("🤖 Generating BOM suggestions");
        // A failed generation leaves the BOM untouched; report it and keep going.
        match estimator.generate_from_prompt(prompt).await {
            Ok(added) => tracing::info!("✅ Added {} suggested items", added),
            Err(e) => {
                tracing::warn!("AI generation failed: {}", e);
                eprintln!("❌ {}", e.user_friendly_message());
                eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            }
        }
    }

    let summary = estimator.summary(config.top_n(), config.label_max_len());
    if args.json {
        let document = json!({
            "items": estimator.registry().items(),
            "summary": summary,
        });
        println!("{}", serde_json::to_string_pretty(&document)?);
    } else {
        print!("{}", report::render(estimator.registry().items(), &summary));
    }

    if args.export {
        let storage = LocalStorage::new(config.output_path());
        estimator
            .save_export(&storage, config.export_filename())
            .await?;
        let output_path = storage.full_path(config.export_filename());
        tracing::info!("📁 Export saved to: {}", output_path.display());
        println!("📁 Export saved to: {}", output_path.display());
    }

    Ok(())
}
