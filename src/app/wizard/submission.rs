use crate::domain::model::{Association, AssociationRequest};
use crate::domain::ports::CatalogApi;

/// Result of the terminal onboarding action as the wizard presents it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmissionState {
    pub submitting: bool,
    pub association: Option<Association>,
    pub warnings: Vec<String>,
    pub error: Option<String>,
}

impl SubmissionState {
    pub fn succeeded(&self) -> bool {
        self.association.is_some()
    }

    /// Success that came back with server-side notes.
    pub fn is_partial(&self) -> bool {
        self.succeeded() && !self.warnings.is_empty()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Sends the association request and records the outcome. Any previous
    /// outcome is cleared first; a failure never touches the caller's inputs.
    pub async fn submit<A: CatalogApi + ?Sized>(&mut self, api: &A, request: &AssociationRequest) -> bool {
        self.submitting = true;
        self.association = None;
        self.error = None;
        self.warnings.clear();

        tracing::info!(
            "🔗 Linking {} to product {} ({} repos, {} Jira projects, {} docs)",
            request.cmdb_id,
            request.product_name,
            request.repos.len(),
            request.jira_projects.len(),
            request.docs.len()
        );

        let result = api.create_association(request).await;
        self.submitting = false;

        match result {
            Ok(receipt) => {
                for warning in &receipt.warnings {
                    tracing::warn!("⚠️ {}", warning);
                }
                self.warnings = receipt.warnings;
                self.association = Some(receipt.association);
                true
            }
            Err(e) => {
                tracing::error!("❌ Failed to link {}: {}", request.cmdb_id, e);
                self.error = Some(e.user_friendly_message());
                false
            }
        }
    }
}
