use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Items that carry a unique string key inside a selection list.
pub trait Keyed {
    fn key(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductMembership {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: String,
    pub cmdb_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tier: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub res_cat: Option<String>,
    #[serde(default)]
    pub stack: Option<String>,
    #[serde(default)]
    pub product_owner: Option<String>,
    #[serde(default)]
    pub system_architect: Option<String>,
    #[serde(default)]
    pub open_risks: u32,
    #[serde(default)]
    pub products: Vec<ProductMembership>,
}

impl Application {
    pub fn is_critical(&self) -> bool {
        self.res_cat.as_deref() == Some(CRITICAL_RES_CAT)
    }
}

pub const CRITICAL_RES_CAT: &str = "Critical";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub stack: Option<String>,
    #[serde(default)]
    pub tc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Association {
    pub product_id: String,
    pub app_id: String,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepoSource {
    Gitlab,
    Bitbucket,
    Manual,
}

impl RepoSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepoSource::Gitlab => "gitlab",
            RepoSource::Bitbucket => "bitbucket",
            RepoSource::Manual => "manual",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoRef {
    pub repo_id: String,
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    pub source: RepoSource,
}

impl Keyed for RepoRef {
    fn key(&self) -> &str {
        &self.repo_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraProjectRef {
    pub project_key: String,
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}

impl Keyed for JiraProjectRef {
    fn key(&self) -> &str {
        &self.project_key
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocCategory {
    Product,
    Technical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocType {
    ProductOverview,
    Roadmap,
    UserGuide,
    ReleaseNotes,
    Architecture,
    ApiReference,
    Runbook,
    Onboarding,
}

impl DocType {
    pub const PRODUCT: [DocType; 4] = [
        DocType::ProductOverview,
        DocType::Roadmap,
        DocType::UserGuide,
        DocType::ReleaseNotes,
    ];

    pub const TECHNICAL: [DocType; 4] = [
        DocType::Architecture,
        DocType::ApiReference,
        DocType::Runbook,
        DocType::Onboarding,
    ];

    pub fn category(&self) -> DocCategory {
        if Self::PRODUCT.contains(self) {
            DocCategory::Product
        } else {
            DocCategory::Technical
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocType::ProductOverview => "product_overview",
            DocType::Roadmap => "roadmap",
            DocType::UserGuide => "user_guide",
            DocType::ReleaseNotes => "release_notes",
            DocType::Architecture => "architecture",
            DocType::ApiReference => "api_reference",
            DocType::Runbook => "runbook",
            DocType::Onboarding => "onboarding",
        }
    }
}

impl fmt::Display for DocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocEntry {
    #[serde(rename = "type")]
    pub doc_type: DocType,
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInstance {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub environment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixVersion {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub released: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentEnvironment {
    pub id: String,
    pub name: String,
}

/// Payload for the terminal onboarding action.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssociationRequest {
    pub app_id: String,
    pub cmdb_id: String,
    pub product_id: String,
    pub product_name: String,
    pub repos: Vec<RepoRef>,
    pub jira_projects: Vec<JiraProjectRef>,
    pub docs: Vec<DocEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssociationReceipt {
    pub association: Association,
    /// non-fatal notes from the server, e.g. skipped repos
    #[serde(default)]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attestation {
    CodeReview,
    TestsPass,
    SecurityScan,
    DocsUpdated,
    RollbackPlan,
}

impl Attestation {
    pub const ALL: [Attestation; 5] = [
        Attestation::CodeReview,
        Attestation::TestsPass,
        Attestation::SecurityScan,
        Attestation::DocsUpdated,
        Attestation::RollbackPlan,
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRequest {
    pub app_id: String,
    pub backlog_key: String,
    pub fix_version_id: String,
    pub navigator_id: String,
    pub environment_ids: Vec<String>,
    pub attestations: Vec<Attestation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRequest {
    pub id: String,
    pub environment_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub id: String,
    pub app_id: String,
    pub backlog_key: String,
    pub fix_version_id: String,
    pub navigator_id: String,
    pub change_requests: Vec<ChangeRequest>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StackSummary {
    pub stack: String,
    pub product_count: usize,
    pub app_count: usize,
    pub critical_apps: usize,
    pub open_risks: u64,
    pub tc: String,
}
