use std::time::{Duration, Instant};

use crate::app::wizard::banner::Banner;
use crate::app::wizard::data_loader::{LoadOutcome, LoadRequest, WizardDataLoader};
use crate::app::wizard::docs::DocSelection;
use crate::app::wizard::picklist::PickList;
use crate::app::wizard::submission::SubmissionState;
use crate::config::toml_config::WizardConfig;
use crate::domain::model::{
    Application, AssociationRequest, DocType, JiraProjectRef, Product, RepoRef,
};
use crate::domain::ports::CatalogApi;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OnboardingStep {
    Product,
    Instances,
    Repos,
    Jira,
    Docs,
}

impl OnboardingStep {
    pub const ORDER: [OnboardingStep; 5] = [
        OnboardingStep::Product,
        OnboardingStep::Instances,
        OnboardingStep::Repos,
        OnboardingStep::Jira,
        OnboardingStep::Docs,
    ];

    fn index(&self) -> usize {
        Self::ORDER.iter().position(|s| s == self).unwrap_or(0)
    }

    pub fn next(&self) -> Option<Self> {
        Self::ORDER.get(self.index() + 1).copied()
    }

    pub fn previous(&self) -> Option<Self> {
        self.index().checked_sub(1).map(|i| Self::ORDER[i])
    }

    pub fn title(&self) -> &'static str {
        match self {
            OnboardingStep::Product => "Choose product",
            OnboardingStep::Instances => "Service instances",
            OnboardingStep::Repos => "Repositories",
            OnboardingStep::Jira => "Jira projects",
            OnboardingStep::Docs => "Documentation",
        }
    }
}

/// Add-application-to-product wizard.
///
/// Every sub-state lives here and is dropped together on [`reset`]. The
/// owning controller drives the async parts explicitly: it runs the
/// [`LoadRequest`] returned by [`select_application`] and hands the outcome
/// back through [`apply_load`].
///
/// [`reset`]: OnboardingWizard::reset
/// [`select_application`]: OnboardingWizard::select_application
/// [`apply_load`]: OnboardingWizard::apply_load
#[derive(Debug, Clone)]
pub struct OnboardingWizard {
    step: OnboardingStep,
    product: Option<Product>,
    loader: WizardDataLoader,
    repos: PickList<RepoRef>,
    jira: PickList<JiraProjectRef>,
    docs: DocSelection,
    submission: SubmissionState,
    banner: Banner,
}

impl OnboardingWizard {
    pub fn new(required_docs: Vec<DocType>, banner_delay: Duration) -> Self {
        Self {
            step: OnboardingStep::Product,
            product: None,
            loader: WizardDataLoader::new(),
            repos: PickList::new(),
            jira: PickList::new(),
            docs: DocSelection::new(required_docs),
            submission: SubmissionState::default(),
            banner: Banner::new(banner_delay),
        }
    }

    pub fn from_config(config: &WizardConfig) -> Self {
        Self::new(
            config.required_doc_types.clone(),
            Duration::from_secs(config.banner_dismiss_seconds),
        )
    }

    pub fn step(&self) -> OnboardingStep {
        self.step
    }

    pub fn product(&self) -> Option<&Product> {
        self.product.as_ref()
    }

    pub fn application(&self) -> Option<&Application> {
        self.loader.application()
    }

    pub fn loader(&self) -> &WizardDataLoader {
        &self.loader
    }

    pub fn repos(&self) -> &PickList<RepoRef> {
        &self.repos
    }

    pub fn repos_mut(&mut self) -> &mut PickList<RepoRef> {
        &mut self.repos
    }

    pub fn jira(&self) -> &PickList<JiraProjectRef> {
        &self.jira
    }

    pub fn jira_mut(&mut self) -> &mut PickList<JiraProjectRef> {
        &mut self.jira
    }

    pub fn docs(&self) -> &DocSelection {
        &self.docs
    }

    pub fn docs_mut(&mut self) -> &mut DocSelection {
        &mut self.docs
    }

    pub fn submission(&self) -> &SubmissionState {
        &self.submission
    }

    pub fn banner(&self) -> &Banner {
        &self.banner
    }

    pub fn banner_mut(&mut self) -> &mut Banner {
        &mut self.banner
    }

    pub fn choose_product(&mut self, product: Option<Product>) {
        self.product = product;
    }

    /// Switches the target application. Repo and Jira selections and any
    /// submission outcome belong to the previous target and are cleared.
    pub fn select_application(&mut self, application: Option<Application>) -> Option<LoadRequest> {
        self.submission.clear();
        self.repos.clear();
        self.jira.clear();
        self.banner.dismiss();
        self.loader.select_application(application)
    }

    /// Commits a finished lookup batch. Stale batches are ignored.
    pub fn apply_load(&mut self, outcome: LoadOutcome, now: Instant) -> bool {
        if !self.loader.apply(outcome) {
            return false;
        }
        let data = self.loader.data().clone();
        self.repos.set_available(data.repos);
        self.jira.set_available(data.jira_projects);
        if let Some(message) = self.loader.error() {
            self.banner.raise(message, now);
        }
        true
    }

    pub fn can_proceed(&self, step: OnboardingStep) -> bool {
        match step {
            OnboardingStep::Product => self.product.is_some(),
            OnboardingStep::Instances => !self.loader.data().instances.is_empty(),
            OnboardingStep::Repos => self.repos.total_selected() > 0,
            OnboardingStep::Jira => self.jira.total_selected() > 0,
            OnboardingStep::Docs => self.docs.is_complete(),
        }
    }

    /// Advances one step when the current step's condition holds.
    pub fn next(&mut self) -> bool {
        if !self.can_proceed(self.step) {
            return false;
        }
        match self.step.next() {
            Some(next) => {
                tracing::debug!("Onboarding wizard: {:?} -> {:?}", self.step, next);
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

    /// Jumps to `step` if every step before it can be passed.
    pub fn go_to(&mut self, step: OnboardingStep) -> bool {
        let reachable = OnboardingStep::ORDER
            .iter()
            .take_while(|s| **s != step)
            .all(|s| self.can_proceed(*s));
        if reachable {
            self.step = step;
        }
        reachable
    }

    pub fn can_finish(&self) -> bool {
        self.application().is_some()
            && !self.submission.submitting
            && !self.submission.succeeded()
            && OnboardingStep::ORDER.iter().all(|s| self.can_proceed(*s))
    }

    /// The payload `finish` would send, if the wizard is complete.
    pub fn association_request(&self) -> Option<AssociationRequest> {
        let app = self.application()?;
        let product = self.product.as_ref()?;
        Some(AssociationRequest {
            app_id: app.id.clone(),
            cmdb_id: app.cmdb_id.clone(),
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            repos: self.repos.all_selected(),
            jira_projects: self.jira.all_selected(),
            docs: self.docs.entries().to_vec(),
        })
    }

    /// Terminal action. Returns `true` on success; on failure the error is
    /// kept in [`SubmissionState`] and every selection stays in place.
    pub async fn finish<A: CatalogApi + ?Sized>(&mut self, api: &A) -> bool {
        if !self.can_finish() {
            tracing::debug!("Onboarding wizard: finish unavailable at {:?}", self.step);
            return false;
        }
        let Some(request) = self.association_request() else {
            return false;
        };
        self.submission.submit(api, &request).await
    }

    /// Drops every selection and the submission outcome.
    pub fn reset(&mut self) {
        self.step = OnboardingStep::Product;
        self.product = None;
        self.loader.select_application(None);
        self.repos.clear();
        self.jira.clear();
        self.docs.clear();
        self.submission.clear();
        self.banner.dismiss();
    }
}
