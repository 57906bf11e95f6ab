use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use stack_catalog::utils::{logger, validation::Validate};
use stack_catalog::{
    CatalogApi, CatalogContext, CliConfig, Command, HttpCatalogApi, InMemoryCatalog,
    OnboardingStep,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    // 初始化日誌
    logger::init_from_config(&config.logging, cli.verbose);
    tracing::info!("Starting stack-catalog");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let api: Arc<dyn CatalogApi> = match &cli.fixture {
        Some(path) => {
            tracing::info!("📁 Using fixture data from {}", path);
            Arc::new(
                InMemoryCatalog::from_file(path)
                    .with_context(|| format!("failed to load fixture '{}'", path))?,
            )
        }
        None => {
            tracing::info!("🌐 Using catalog API at {}", config.api.base_url);
            Arc::new(HttpCatalogApi::new(&config)?)
        }
    };
    let context = CatalogContext::new(api, config);

    match &cli.command {
        Command::Stacks => print_stacks(&context).await?,
        Command::Apps { query } => print_apps(&context, query).await?,
        Command::Link { app, product } => check_link(&context, app, product).await?,
    }

    Ok(())
}

async fn print_stacks(context: &CatalogContext) -> anyhow::Result<()> {
    let summaries = context.stack_summaries().await?;
    println!(
        "{:<24} {:>8} {:>6} {:>9} {:>6}  TC",
        "STACK", "PRODUCTS", "APPS", "CRITICAL", "RISKS"
    );
    for s in summaries {
        println!(
            "{:<24} {:>8} {:>6} {:>9} {:>6}  {}",
            s.stack, s.product_count, s.app_count, s.critical_apps, s.open_risks, s.tc
        );
    }
    Ok(())
}

async fn print_apps(context: &CatalogContext, query: &str) -> anyhow::Result<()> {
    let view = context.app_list_view(query).await?;
    let visible = view.visible();

    println!("Showing {} of {} applications", visible.len(), view.total());
    for app in visible {
        println!(
            "{:<12} {:<32} {:<8} {}",
            app.cmdb_id,
            app.name,
            app.tier.as_deref().unwrap_or("-"),
            app.stack.as_deref().unwrap_or("-")
        );
    }

    let options = view.options();
    let labels = |opts: &[stack_catalog::core::filter::FilterOption]| {
        opts.iter().map(|o| o.label.as_str()).collect::<Vec<_>>().join(", ")
    };
    println!();
    println!("stacks:   {}", labels(options.stacks.as_slice()));
    println!("products: {}", labels(options.products.as_slice()));
    println!("tcs:      {}", labels(options.tcs.as_slice()));
    println!("tiers:    {}", labels(options.tiers.as_slice()));
    Ok(())
}

/// Runs the onboarding wizard as far as the available data allows.
async fn check_link(context: &CatalogContext, app_id: &str, product_id: &str) -> anyhow::Result<()> {
    let app = context.api().get_application(app_id).await?;
    let product = context
        .api()
        .list_products()
        .await?
        .into_iter()
        .find(|p| p.id == product_id)
        .with_context(|| format!("product '{}' not found", product_id))?;

    let mut wizard = context.onboarding_wizard();
    wizard.choose_product(Some(product));
    context.load_for(&mut wizard, Some(app)).await;
    if let Some(message) = wizard.loader().error() {
        println!("⚠️  {}", message);
    }
    wizard.repos_mut().select_all(true);
    wizard.jira_mut().select_all(true);

    for step in OnboardingStep::ORDER {
        let status = if wizard.can_proceed(step) { "ok" } else { "blocked" };
        println!("{:<20} {}", step.title(), status);
    }

    let missing = wizard.docs().missing();
    if !missing.is_empty() {
        let names: Vec<String> = missing.iter().map(|t| t.to_string()).collect();
        println!("missing documentation: {}", names.join(", "));
    }
    Ok(())
}
