use std::collections::BTreeMap;

use crate::core::selection::toggle_id;
use crate::domain::model::{
    Attestation, Deployment, DeploymentEnvironment, DeploymentRequest, FixVersion, JiraProjectRef,
};
use crate::domain::ports::CatalogApi;
use crate::utils::error::{CatalogError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DeploymentStep {
    Backlog = 1,
    Version = 2,
    Navigator = 3,
    Environments = 4,
}

impl DeploymentStep {
    pub fn number(&self) -> u8 {
        *self as u8
    }

    fn next(&self) -> Option<Self> {
        match self {
            DeploymentStep::Backlog => Some(DeploymentStep::Version),
            DeploymentStep::Version => Some(DeploymentStep::Navigator),
            DeploymentStep::Navigator => Some(DeploymentStep::Environments),
            DeploymentStep::Environments => None,
        }
    }

    fn previous(&self) -> Option<Self> {
        match self {
            DeploymentStep::Backlog => None,
            DeploymentStep::Version => Some(DeploymentStep::Backlog),
            DeploymentStep::Navigator => Some(DeploymentStep::Version),
            DeploymentStep::Environments => Some(DeploymentStep::Navigator),
        }
    }
}

/// Create-release wizard for one application.
#[derive(Debug, Clone)]
pub struct DeploymentWizard {
    app_id: String,
    backlogs: Vec<JiraProjectRef>,
    available_environments: Vec<DeploymentEnvironment>,
    show: bool,
    step: DeploymentStep,
    backlog: Option<String>,
    versions: Vec<FixVersion>,
    version: Option<String>,
    navigator_id: String,
    environments: Vec<String>,
    attestations: BTreeMap<Attestation, bool>,
    submitting: bool,
    error: Option<String>,
    created: Option<Deployment>,
}

fn blank_attestations() -> BTreeMap<Attestation, bool> {
    Attestation::ALL.iter().map(|a| (*a, false)).collect()
}

impl DeploymentWizard {
    /// `backlogs` are the Jira projects linked to the application and
    /// `environments` the deployment targets the catalog offers.
    pub fn new(
        app_id: impl Into<String>,
        backlogs: Vec<JiraProjectRef>,
        environments: Vec<DeploymentEnvironment>,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            backlogs,
            available_environments: environments,
            show: false,
            step: DeploymentStep::Backlog,
            backlog: None,
            versions: Vec::new(),
            version: None,
            navigator_id: String::new(),
            environments: Vec::new(),
            attestations: blank_attestations(),
            submitting: false,
            error: None,
            created: None,
        }
    }

    /// Shows the wizard, always starting from step 1 with blank data.
    pub fn open(&mut self) {
        self.set_show(true);
    }

    pub fn close(&mut self) {
        self.set_show(false);
    }

    pub fn set_show(&mut self, show: bool) {
        if show && !self.show {
            self.clear_inputs();
        }
        self.show = show;
    }

    fn clear_inputs(&mut self) {
        self.step = DeploymentStep::Backlog;
        self.backlog = None;
        self.versions.clear();
        self.version = None;
        self.navigator_id.clear();
        self.environments.clear();
        self.attestations = blank_attestations();
        self.submitting = false;
        self.error = None;
        self.created = None;
    }

    pub fn is_open(&self) -> bool {
        self.show
    }

    pub fn step(&self) -> DeploymentStep {
        self.step
    }

    pub fn backlogs(&self) -> &[JiraProjectRef] {
        &self.backlogs
    }

    pub fn selected_backlog(&self) -> Option<&str> {
        self.backlog.as_deref()
    }

    pub fn versions(&self) -> &[FixVersion] {
        &self.versions
    }

    pub fn available_environments(&self) -> &[DeploymentEnvironment] {
        &self.available_environments
    }

    pub fn selected_version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn navigator_id(&self) -> &str {
        &self.navigator_id
    }

    pub fn environments(&self) -> &[String] {
        &self.environments
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn created(&self) -> Option<&Deployment> {
        self.created.as_ref()
    }

    /// Picks the backlog and loads its fix versions. Any chosen version is
    /// cleared since it belonged to the previous backlog.
    pub async fn select_backlog<A: CatalogApi + ?Sized>(&mut self, api: &A, project_key: &str) -> Result<()> {
        if !self.backlogs.iter().any(|b| b.project_key == project_key) {
            return Err(CatalogError::not_found("Backlog", project_key));
        }

        self.backlog = Some(project_key.to_string());
        self.version = None;
        self.versions.clear();
        self.error = None;

        let result = api.fix_versions(project_key).await;

        match result {
            Ok(versions) => {
                tracing::debug!("Loaded {} fix versions for {}", versions.len(), project_key);
                self.versions = versions;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("⚠️ Failed to load fix versions for {}: {}", project_key, e);
                self.error = Some(format!("Failed to load fix versions for {}", project_key));
                Err(e)
            }
        }
    }

    pub fn select_version(&mut self, version_id: &str) -> Result<()> {
        if !self.versions.iter().any(|v| v.id == version_id) {
            return Err(CatalogError::not_found("Fix version", version_id));
        }
        self.version = Some(version_id.to_string());
        Ok(())
    }

    pub fn set_navigator_id(&mut self, navigator_id: impl Into<String>) {
        self.navigator_id = navigator_id.into();
    }

    /// Flips a target environment. Returns whether it is now selected.
    pub fn toggle_environment(&mut self, environment_id: &str) -> Result<bool> {
        if !self.available_environments.iter().any(|e| e.id == environment_id) {
            return Err(CatalogError::not_found("Deployment environment", environment_id));
        }
        Ok(toggle_id(&mut self.environments, environment_id))
    }

    pub fn toggle_attestation(&mut self, item: Attestation) -> bool {
        let checked = self.attestations.entry(item).or_insert(false);
        *checked = !*checked;
        *checked
    }

    pub fn is_attested(&self, item: Attestation) -> bool {
        self.attestations.get(&item).copied().unwrap_or(false)
    }

    pub fn all_attestations_checked(&self) -> bool {
        Attestation::ALL.iter().all(|a| self.is_attested(*a))
    }

    pub fn can_proceed(&self, step: DeploymentStep) -> bool {
        match step {
            DeploymentStep::Backlog => self.backlog.is_some(),
            DeploymentStep::Version => self.version.is_some(),
            DeploymentStep::Navigator => !self.navigator_id.trim().is_empty(),
            DeploymentStep::Environments => !self.environments.is_empty(),
        }
    }

    pub fn next(&mut self) -> bool {
        if !self.can_proceed(self.step) {
            return false;
        }
        match self.step.next() {
            Some(next) => {
                self.step = next;
                true
            }
            None => false,
        }
    }

    pub fn back(&mut self) -> bool {
        match self.step.previous() {
            Some(previous) => {
                self.step = previous;
                true
            }
            None => false,
        }
    }

    pub fn can_submit(&self) -> bool {
        self.step == DeploymentStep::Environments
            && !self.submitting
            && self.can_proceed(DeploymentStep::Backlog)
            && self.can_proceed(DeploymentStep::Version)
            && self.can_proceed(DeploymentStep::Navigator)
            && self.can_proceed(DeploymentStep::Environments)
            && self.all_attestations_checked()
    }

    pub fn request(&self) -> Option<DeploymentRequest> {
        Some(DeploymentRequest {
            app_id: self.app_id.clone(),
            backlog_key: self.backlog.clone()?,
            fix_version_id: self.version.clone()?,
            navigator_id: self.navigator_id.trim().to_string(),
            environment_ids: self.environments.clone(),
            attestations: Attestation::ALL.to_vec(),
        })
    }

    /// Creates the release record, one change request per environment.
    /// Returns `false` without calling the API when submission is gated.
    pub async fn submit<A: CatalogApi + ?Sized>(&mut self, api: &A) -> bool {
        if !self.can_submit() {
            return false;
        }
        let Some(request) = self.request() else {
            return false;
        };

        self.submitting = true;
        self.error = None;
        let result = api.create_deployment(&request).await;
        self.submitting = false;

        match result {
            Ok(deployment) => {
                tracing::info!(
                    "🚀 Release {} created with {} change request(s)",
                    deployment.id,
                    deployment.change_requests.len()
                );
                self.created = Some(deployment);
                true
            }
            Err(e) => {
                tracing::error!("❌ Failed to create release: {}", e);
                self.error = Some(e.user_friendly_message());
                false
            }
        }
    }
}
