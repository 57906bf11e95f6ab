pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use adapters::{CatalogFixture, HttpCatalogApi, InMemoryCatalog};
pub use app::context::CatalogContext;
pub use app::wizard::{DeploymentWizard, OnboardingStep, OnboardingWizard};
pub use config::toml_config::CatalogConfig;
pub use domain::ports::CatalogApi;
pub use utils::error::{CatalogError, Result};
