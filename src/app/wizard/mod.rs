pub mod banner;
pub mod data_loader;
pub mod deployment;
pub mod docs;
pub mod onboarding;
pub mod picklist;
pub mod submission;

pub use data_loader::{LoadOutcome, LoadRequest, WizardData, WizardDataLoader};
pub use deployment::{DeploymentStep, DeploymentWizard};
pub use onboarding::{OnboardingStep, OnboardingWizard};
pub use picklist::PickList;
