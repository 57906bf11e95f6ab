use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::domain::model::{
    Application, Association, AssociationReceipt, AssociationRequest, Deployment,
    DeploymentEnvironment, DeploymentRequest, FixVersion, JiraProjectRef, Product, RepoRef,
    RepoSource, ServiceInstance,
};
use crate::domain::ports::{CatalogApi, ConfigProvider};
use crate::utils::error::{CatalogError, Result};

/// `CatalogApi` over the catalog's JSON REST endpoints.
#[derive(Debug, Clone)]
pub struct HttpCatalogApi {
    client: Client,
    base_url: Url,
}

impl HttpCatalogApi {
    pub fn new<C: ConfigProvider>(config: &C) -> Result<Self> {
        let base_url = Url::parse(config.api_base_url()).map_err(|e| {
            CatalogError::InvalidConfigValueError {
                field: "api.base_url".to_string(),
                value: config.api_base_url().to_string(),
                reason: e.to_string(),
            }
        })?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds()))
            .build()?;
        Ok(Self { client, base_url })
    }

    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| CatalogError::ConfigError {
                message: format!("Base URL cannot have a path: {}", self.base_url),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send<B, T>(&self, method: Method, url: Url, body: Option<&B>) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let response = self.execute(method, url, body).await?;
        Ok(response.json().await?)
    }

    /// Issues the request and fails on any non-2xx status.
    async fn execute<B>(&self, method: Method, url: Url, body: Option<&B>) -> Result<Response>
    where
        B: Serialize + ?Sized + Sync,
    {
        tracing::debug!("{} {}", method, url);
        let mut request = self.client.request(method, url.clone());
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            return Err(CatalogError::ApiStatusError {
                endpoint: url.path().to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        self.send::<(), T>(Method::GET, url, None).await
    }
}

#[async_trait]
impl CatalogApi for HttpCatalogApi {
    async fn list_products(&self) -> Result<Vec<Product>> {
        self.get(self.url(&["products"])?).await
    }

    async fn list_applications(&self) -> Result<Vec<Application>> {
        self.get(self.url(&["applications"])?).await
    }

    async fn get_application(&self, app_id: &str) -> Result<Application> {
        match self.get(self.url(&["applications", app_id])?).await {
            Err(CatalogError::ApiStatusError { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Err(CatalogError::not_found("Application", app_id))
            }
            other => other,
        }
    }

    async fn list_associations(&self) -> Result<Vec<Association>> {
        self.get(self.url(&["product-applications"])?).await
    }

    async fn create_association(&self, request: &AssociationRequest) -> Result<AssociationReceipt> {
        let url = self.url(&["product-applications"])?;
        self.send(Method::POST, url, Some(request))
            .await
            .map_err(|e| match e {
                CatalogError::ApiStatusError { endpoint, status } => CatalogError::SubmissionError {
                    message: format!("{} rejected the association ({})", endpoint, status),
                },
                other => other,
            })
    }

    async fn delete_association(&self, product_id: &str, app_id: &str) -> Result<()> {
        let url = self.url(&["product-applications", product_id, app_id])?;
        self.execute::<()>(Method::DELETE, url, None).await?;
        Ok(())
    }

    async fn service_instances(&self, app_id: &str) -> Result<Vec<ServiceInstance>> {
        self.get(self.url(&["applications", app_id, "service-instances"])?)
            .await
    }

    async fn available_repos(&self, app_id: &str, source: RepoSource) -> Result<Vec<RepoRef>> {
        let mut url = self.url(&["applications", app_id, "available-repos"])?;
        url.query_pairs_mut().append_pair("source", source.as_str());
        self.get(url).await
    }

    async fn available_jira_projects(&self, app_id: &str) -> Result<Vec<JiraProjectRef>> {
        self.get(self.url(&["applications", app_id, "available-jira"])?)
            .await
    }

    async fn fix_versions(&self, backlog_key: &str) -> Result<Vec<FixVersion>> {
        self.get(self.url(&["backlogs", backlog_key, "fix-versions"])?)
            .await
    }

    async fn deployment_environments(&self) -> Result<Vec<DeploymentEnvironment>> {
        self.get(self.url(&["deployment-environments"])?).await
    }

    async fn list_deployments(&self, app_id: &str) -> Result<Vec<Deployment>> {
        let mut url = self.url(&["deployments"])?;
        url.query_pairs_mut().append_pair("appId", app_id);
        self.get(url).await
    }

    async fn create_deployment(&self, request: &DeploymentRequest) -> Result<Deployment> {
        let url = self.url(&["deployments"])?;
        self.send(Method::POST, url, Some(request)).await
    }
}
