pub mod toml_config;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use toml_config::CatalogConfig;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "stack-catalog")]
#[command(about = "Product and application catalog administration")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override api.base_url from the config file
    #[arg(long)]
    pub api_url: Option<String>,

    /// Serve data from a JSON fixture instead of the HTTP API
    #[arg(long)]
    pub fixture: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Per-stack product/application roll-up
    Stacks,
    /// Application list with URL-style filters, e.g. "tier=gold&stack=Payments"
    Apps {
        #[arg(short, long, default_value = "")]
        query: String,
    },
    /// Walk the onboarding wizard for an application and report which step blocks
    Link {
        #[arg(long)]
        app: String,
        #[arg(long)]
        product: String,
    },
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Loads the config file (or defaults) and applies command-line overrides.
    pub fn resolve(&self) -> Result<CatalogConfig> {
        let mut config = match &self.config {
            Some(path) => CatalogConfig::from_file(path)?,
            None => CatalogConfig::default(),
        };
        if let Some(url) = &self.api_url {
            config.api.base_url = url.clone();
        }
        Ok(config)
    }
}
