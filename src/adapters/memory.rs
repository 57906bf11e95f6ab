use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::domain::model::{
    Application, Association, AssociationReceipt, AssociationRequest, ChangeRequest, Deployment,
    DeploymentEnvironment, DeploymentRequest, FixVersion, JiraProjectRef, Product,
    ProductMembership, RepoRef, RepoSource, ServiceInstance,
};
use crate::domain::ports::CatalogApi;
use crate::utils::error::{CatalogError, Result};

/// Serialised form of an in-memory catalog, used for fixtures and the CLI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogFixture {
    pub products: Vec<Product>,
    pub applications: Vec<Application>,
    pub associations: Vec<Association>,
    pub service_instances: HashMap<String, Vec<ServiceInstance>>,
    pub available_repos: HashMap<String, Vec<RepoRef>>,
    pub available_jira: HashMap<String, Vec<JiraProjectRef>>,
    pub fix_versions: HashMap<String, Vec<FixVersion>>,
    pub environments: Vec<DeploymentEnvironment>,
    pub deployments: Vec<Deployment>,
}

#[derive(Debug, Default)]
struct State {
    data: CatalogFixture,
    failing: HashMap<String, HashSet<String>>,
    reject_associations: Option<String>,
    next_id: u64,
}

impl State {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }

    fn check_lookup(&self, app_id: &str, kind: &str) -> Result<()> {
        if self.failing.get(app_id).is_some_and(|kinds| kinds.contains(kind)) {
            return Err(CatalogError::LookupError {
                message: format!("{} lookup unavailable for {}", kind, app_id),
            });
        }
        Ok(())
    }
}

/// `CatalogApi` backed by process memory.
///
/// Stands in for the REST API in tests and `--fixture` runs. Lookups can be
/// made to fail per application with [`InMemoryCatalog::fail_lookups_for`].
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    state: RwLock<State>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fixture(data: CatalogFixture) -> Self {
        Self {
            state: RwLock::new(State {
                data,
                ..State::default()
            }),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::from_fixture(serde_json::from_str(json)?))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    fn read(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn insert_product(&self, product: Product) {
        self.write().data.products.push(product);
    }

    pub fn insert_application(&self, application: Application) {
        self.write().data.applications.push(application);
    }

    pub fn insert_service_instance(&self, app_id: &str, instance: ServiceInstance) {
        self.write()
            .data
            .service_instances
            .entry(app_id.to_string())
            .or_default()
            .push(instance);
    }

    pub fn insert_available_repo(&self, app_id: &str, repo: RepoRef) {
        self.write()
            .data
            .available_repos
            .entry(app_id.to_string())
            .or_default()
            .push(repo);
    }

    pub fn insert_jira_project(&self, app_id: &str, project: JiraProjectRef) {
        self.write()
            .data
            .available_jira
            .entry(app_id.to_string())
            .or_default()
            .push(project);
    }

    pub fn insert_fix_version(&self, backlog_key: &str, version: FixVersion) {
        self.write()
            .data
            .fix_versions
            .entry(backlog_key.to_string())
            .or_default()
            .push(version);
    }

    pub fn insert_environment(&self, environment: DeploymentEnvironment) {
        self.write().data.environments.push(environment);
    }

    /// Makes the named lookups fail for `app_id`. Kinds: `instances`,
    /// `gitlab`, `bitbucket`, `jira`.
    pub fn fail_lookups_for(&self, app_id: &str, kinds: &[&str]) {
        let mut state = self.write();
        let entry = state.failing.entry(app_id.to_string()).or_default();
        entry.extend(kinds.iter().map(|k| k.to_string()));
    }

    /// Rejects every association request with `message` until cleared.
    pub fn reject_associations(&self, message: Option<&str>) {
        self.write().reject_associations = message.map(str::to_string);
    }

    fn memberships(data: &CatalogFixture, app_id: &str) -> Vec<ProductMembership> {
        data.associations
            .iter()
            .filter(|a| a.app_id == app_id)
            .filter_map(|a| data.products.iter().find(|p| p.id == a.product_id))
            .map(|p| ProductMembership {
                id: p.id.clone(),
                name: p.name.clone(),
                tc: p.tc.clone(),
            })
            .collect()
    }

    fn with_memberships(data: &CatalogFixture, app: &Application) -> Application {
        let mut app = app.clone();
        app.products = Self::memberships(data, &app.id);
        app
    }
}

#[async_trait]
impl CatalogApi for InMemoryCatalog {
    async fn list_products(&self) -> Result<Vec<Product>> {
        Ok(self.read().data.products.clone())
    }

    async fn list_applications(&self) -> Result<Vec<Application>> {
        let state = self.read();
        Ok(state
            .data
            .applications
            .iter()
            .map(|app| Self::with_memberships(&state.data, app))
            .collect())
    }

    async fn get_application(&self, app_id: &str) -> Result<Application> {
        let state = self.read();
        state
            .data
            .applications
            .iter()
            .find(|app| app.id == app_id)
            .map(|app| Self::with_memberships(&state.data, app))
            .ok_or_else(|| CatalogError::not_found("Application", app_id))
    }

    async fn list_associations(&self) -> Result<Vec<Association>> {
        Ok(self.read().data.associations.clone())
    }

    async fn create_association(&self, request: &AssociationRequest) -> Result<AssociationReceipt> {
        let mut state = self.write();

        if let Some(message) = &state.reject_associations {
            return Err(CatalogError::SubmissionError {
                message: message.clone(),
            });
        }
        if !state.data.applications.iter().any(|a| a.id == request.app_id) {
            return Err(CatalogError::not_found("Application", &request.app_id));
        }
        if !state.data.products.iter().any(|p| p.id == request.product_id) {
            return Err(CatalogError::not_found("Product", &request.product_id));
        }
        if state
            .data
            .associations
            .iter()
            .any(|a| a.app_id == request.app_id && a.product_id == request.product_id)
        {
            return Err(CatalogError::SubmissionError {
                message: format!(
                    "{} is already part of {}",
                    request.cmdb_id, request.product_name
                ),
            });
        }

        let warnings = request
            .repos
            .iter()
            .filter(|r| r.source == RepoSource::Manual && r.url.is_none())
            .map(|r| format!("Repository '{}' has no URL and was skipped", r.name))
            .collect();

        let association = Association {
            product_id: request.product_id.clone(),
            app_id: request.app_id.clone(),
            added_at: Utc::now(),
        };
        state.data.associations.push(association.clone());

        Ok(AssociationReceipt {
            association,
            warnings,
        })
    }

    async fn delete_association(&self, product_id: &str, app_id: &str) -> Result<()> {
        let mut state = self.write();
        let before = state.data.associations.len();
        state
            .data
            .associations
            .retain(|a| !(a.product_id == product_id && a.app_id == app_id));
        if state.data.associations.len() == before {
            return Err(CatalogError::not_found(
                "Association",
                &format!("{}/{}", product_id, app_id),
            ));
        }
        Ok(())
    }

    async fn service_instances(&self, app_id: &str) -> Result<Vec<ServiceInstance>> {
        let state = self.read();
        state.check_lookup(app_id, "instances")?;
        Ok(state
            .data
            .service_instances
            .get(app_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn available_repos(&self, app_id: &str, source: RepoSource) -> Result<Vec<RepoRef>> {
        let state = self.read();
        state.check_lookup(app_id, source.as_str())?;
        Ok(state
            .data
            .available_repos
            .get(app_id)
            .map(|repos| repos.iter().filter(|r| r.source == source).cloned().collect())
            .unwrap_or_default())
    }

    async fn available_jira_projects(&self, app_id: &str) -> Result<Vec<JiraProjectRef>> {
        let state = self.read();
        state.check_lookup(app_id, "jira")?;
        Ok(state.data.available_jira.get(app_id).cloned().unwrap_or_default())
    }

    async fn fix_versions(&self, backlog_key: &str) -> Result<Vec<FixVersion>> {
        Ok(self
            .read()
            .data
            .fix_versions
            .get(backlog_key)
            .cloned()
            .unwrap_or_default())
    }

    async fn deployment_environments(&self) -> Result<Vec<DeploymentEnvironment>> {
        Ok(self.read().data.environments.clone())
    }

    async fn list_deployments(&self, app_id: &str) -> Result<Vec<Deployment>> {
        Ok(self
            .read()
            .data
            .deployments
            .iter()
            .filter(|d| d.app_id == app_id)
            .cloned()
            .collect())
    }

    async fn create_deployment(&self, request: &DeploymentRequest) -> Result<Deployment> {
        let mut state = self.write();

        if request.environment_ids.is_empty() {
            return Err(CatalogError::validation("At least one environment is required"));
        }
        for env_id in &request.environment_ids {
            if !state.data.environments.iter().any(|e| &e.id == env_id) {
                return Err(CatalogError::not_found("Deployment environment", env_id));
            }
        }

        let deployment_id = state.next_id("REL");
        let change_requests = request
            .environment_ids
            .iter()
            .map(|env_id| ChangeRequest {
                id: state.next_id("CR"),
                environment_id: env_id.clone(),
            })
            .collect();

        let deployment = Deployment {
            id: deployment_id,
            app_id: request.app_id.clone(),
            backlog_key: request.backlog_key.clone(),
            fix_version_id: request.fix_version_id.clone(),
            navigator_id: request.navigator_id.clone(),
            change_requests,
            created_at: Utc::now(),
        };
        state.data.deployments.push(deployment.clone());
        Ok(deployment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "products": [{"id": "p1", "name": "Cards", "stack": "Payments", "tc": "TC1"}],
        "applications": [{"id": "a1", "cmdbId": "CI001", "name": "Card Ledger", "resCat": "Critical", "openRisks": 2}],
        "associations": [{"productId": "p1", "appId": "a1", "addedAt": "2026-03-01T09:00:00Z"}]
    }"#;

    #[tokio::test]
    async fn test_fixture_derives_memberships() {
        let catalog = InMemoryCatalog::from_json(FIXTURE).unwrap();

        let app = catalog.get_application("a1").await.unwrap();
        assert_eq!(app.products.len(), 1);
        assert_eq!(app.products[0].name, "Cards");
        assert_eq!(app.products[0].tc.as_deref(), Some("TC1"));
        assert!(catalog.get_application("zz").await.is_err());
    }

    #[tokio::test]
    async fn test_duplicate_association_is_rejected() {
        let catalog = InMemoryCatalog::from_json(FIXTURE).unwrap();
        let request = AssociationRequest {
            app_id: "a1".to_string(),
            cmdb_id: "CI001".to_string(),
            product_id: "p1".to_string(),
            product_name: "Cards".to_string(),
            repos: vec![],
            jira_projects: vec![],
            docs: vec![],
        };

        let err = catalog.create_association(&request).await.unwrap_err();
        assert!(matches!(err, CatalogError::SubmissionError { .. }));

        catalog.delete_association("p1", "a1").await.unwrap();
        assert!(catalog.create_association(&request).await.is_ok());
        assert!(catalog.delete_association("p9", "a1").await.is_err());
    }

    #[tokio::test]
    async fn test_failing_lookup_only_affects_named_kind() {
        let catalog = InMemoryCatalog::from_json(FIXTURE).unwrap();
        catalog.fail_lookups_for("a1", &["gitlab"]);

        assert!(catalog.available_repos("a1", RepoSource::Gitlab).await.is_err());
        assert!(catalog.available_repos("a1", RepoSource::Bitbucket).await.is_ok());
        assert!(catalog.service_instances("a1").await.is_ok());
    }
}
