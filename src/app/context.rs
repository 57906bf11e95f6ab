use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app::wizard::{DeploymentWizard, OnboardingWizard};
use crate::config::toml_config::CatalogConfig;
use crate::core::aggregation::stack_summaries;
use crate::core::filter::AppListView;
use crate::domain::model::{Application, StackSummary};
use crate::domain::ports::{CatalogApi, ConfigProvider};
use crate::utils::error::Result;

/// Composition root handed to every screen: the API handle and the config.
///
/// Nothing here is global; `main` (or a test) builds one and passes it down.
#[derive(Clone)]
pub struct CatalogContext {
    api: Arc<dyn CatalogApi>,
    config: CatalogConfig,
}

impl CatalogContext {
    pub fn new(api: Arc<dyn CatalogApi>, config: CatalogConfig) -> Self {
        Self { api, config }
    }

    pub fn api(&self) -> &dyn CatalogApi {
        self.api.as_ref()
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub fn banner_delay(&self) -> Duration {
        Duration::from_secs(self.config.banner_dismiss_seconds())
    }

    pub async fn stack_summaries(&self) -> Result<Vec<StackSummary>> {
        let (products, apps, associations) = tokio::try_join!(
            self.api.list_products(),
            self.api.list_applications(),
            self.api.list_associations(),
        )?;
        tracing::debug!(
            "Summarising {} products, {} applications, {} associations",
            products.len(),
            apps.len(),
            associations.len()
        );
        Ok(stack_summaries(&products, &apps, &associations))
    }

    pub async fn app_list_view(&self, query: &str) -> Result<AppListView> {
        let apps = self.api.list_applications().await?;
        Ok(AppListView::new(apps, query))
    }

    pub fn onboarding_wizard(&self) -> OnboardingWizard {
        OnboardingWizard::from_config(&self.config.wizard)
    }

    /// Points the wizard at `application` and waits for its dependent data.
    pub async fn load_for(&self, wizard: &mut OnboardingWizard, application: Option<Application>) -> bool {
        match wizard.select_application(application) {
            Some(request) => {
                let outcome = request.run(self.api.as_ref()).await;
                wizard.apply_load(outcome, Instant::now())
            }
            None => true,
        }
    }

    /// Deployment wizard whose backlogs are the application's Jira projects.
    pub async fn deployment_wizard(&self, app_id: &str) -> Result<DeploymentWizard> {
        let (backlogs, environments) = tokio::try_join!(
            self.api.available_jira_projects(app_id),
            self.api.deployment_environments(),
        )?;
        tracing::debug!(
            "Deployment wizard for {}: {} backlogs, {} environments",
            app_id,
            backlogs.len(),
            environments.len()
        );
        Ok(DeploymentWizard::new(app_id, backlogs, environments))
    }
}
