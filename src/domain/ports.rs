use crate::domain::model::{
    Application, Association, AssociationReceipt, AssociationRequest, Deployment,
    DeploymentEnvironment, DeploymentRequest, FixVersion, JiraProjectRef, Product, RepoRef,
    RepoSource, ServiceInstance,
};
use crate::utils::error::Result;
use async_trait::async_trait;

/// The catalog REST API as seen by the wizards and list views.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn list_products(&self) -> Result<Vec<Product>>;
    async fn list_applications(&self) -> Result<Vec<Application>>;
    async fn get_application(&self, app_id: &str) -> Result<Application>;
    async fn list_associations(&self) -> Result<Vec<Association>>;
    async fn create_association(&self, request: &AssociationRequest)
        -> Result<AssociationReceipt>;
    async fn delete_association(&self, product_id: &str, app_id: &str) -> Result<()>;

    async fn service_instances(&self, app_id: &str) -> Result<Vec<ServiceInstance>>;
    async fn available_repos(&self, app_id: &str, source: RepoSource) -> Result<Vec<RepoRef>>;
    async fn available_jira_projects(&self, app_id: &str) -> Result<Vec<JiraProjectRef>>;

    async fn fix_versions(&self, backlog_key: &str) -> Result<Vec<FixVersion>>;
    async fn deployment_environments(&self) -> Result<Vec<DeploymentEnvironment>>;
    async fn list_deployments(&self, app_id: &str) -> Result<Vec<Deployment>>;
    async fn create_deployment(&self, request: &DeploymentRequest) -> Result<Deployment>;
}

pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn request_timeout_seconds(&self) -> u64;
    fn banner_dismiss_seconds(&self) -> u64;
}
