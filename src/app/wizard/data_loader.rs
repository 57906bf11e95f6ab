use crate::domain::model::{Application, JiraProjectRef, RepoRef, RepoSource, ServiceInstance};
use crate::domain::ports::CatalogApi;
use crate::utils::error::Result;

/// Dependent data for the application picked in the onboarding wizard.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WizardData {
    pub instances: Vec<ServiceInstance>,
    pub repos: Vec<RepoRef>,
    pub jira_projects: Vec<JiraProjectRef>,
}

/// One batch of lookups, stamped with the generation that issued it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    generation: u64,
    app_id: String,
}

impl LoadRequest {
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Runs the four lookups concurrently. A failed lookup contributes an
    /// empty list and a name in `failures`; it never aborts the others.
    pub async fn run<A: CatalogApi + ?Sized>(self, api: &A) -> LoadOutcome {
        tracing::debug!("Loading wizard data for {} (generation {})", self.app_id, self.generation);

        let (instances, gitlab, bitbucket, jira) = tokio::join!(
            api.service_instances(&self.app_id),
            api.available_repos(&self.app_id, RepoSource::Gitlab),
            api.available_repos(&self.app_id, RepoSource::Bitbucket),
            api.available_jira_projects(&self.app_id),
        );

        let mut failures = Vec::new();
        let instances = settle(instances, "service instances", &mut failures);
        let mut repos = settle(gitlab, "GitLab repositories", &mut failures);
        repos.extend(settle(bitbucket, "Bitbucket repositories", &mut failures));
        let jira_projects = settle(jira, "Jira projects", &mut failures);

        LoadOutcome {
            generation: self.generation,
            app_id: self.app_id,
            data: WizardData {
                instances,
                repos,
                jira_projects,
            },
            failures,
        }
    }
}

fn settle<T>(result: Result<Vec<T>>, what: &'static str, failures: &mut Vec<&'static str>) -> Vec<T> {
    match result {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!("⚠️ Failed to load {}: {}", what, e);
            failures.push(what);
            Vec::new()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutcome {
    generation: u64,
    app_id: String,
    pub data: WizardData,
    pub failures: Vec<&'static str>,
}

impl LoadOutcome {
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Single aggregate message covering every failed lookup.
    pub fn error_message(&self) -> Option<String> {
        if self.failures.is_empty() {
            None
        } else {
            Some(format!("Failed to load {}", self.failures.join(", ")))
        }
    }
}

/// Owns the per-application data slots of the onboarding wizard.
///
/// Only the most recently issued [`LoadRequest`] may commit; outcomes from
/// superseded requests are dropped in [`WizardDataLoader::apply`].
#[derive(Debug, Clone, Default)]
pub struct WizardDataLoader {
    generation: u64,
    application: Option<Application>,
    data: WizardData,
    loading: bool,
    error: Option<String>,
}

impl WizardDataLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Changes the target application. Returns the request to run, or `None`
    /// when the target was cleared (slots are reset immediately).
    pub fn select_application(&mut self, application: Option<Application>) -> Option<LoadRequest> {
        self.generation += 1;
        self.data = WizardData::default();
        self.error = None;

        match application {
            Some(app) => {
                let request = LoadRequest {
                    generation: self.generation,
                    app_id: app.id.clone(),
                };
                self.application = Some(app);
                self.loading = true;
                Some(request)
            }
            None => {
                self.application = None;
                self.loading = false;
                None
            }
        }
    }

    /// Commits an outcome if it belongs to the current request. Returns
    /// whether it was applied.
    pub fn apply(&mut self, outcome: LoadOutcome) -> bool {
        if outcome.generation != self.generation {
            tracing::debug!(
                "Discarding stale wizard data for {} (generation {} < {})",
                outcome.app_id,
                outcome.generation,
                self.generation
            );
            return false;
        }

        self.error = outcome.error_message();
        self.data = outcome.data;
        self.loading = false;
        true
    }

    pub fn application(&self) -> Option<&Application> {
        self.application.as_ref()
    }

    pub fn data(&self) -> &WizardData {
        &self.data
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
