use std::io::Write;
use std::sync::Arc;

use stack_catalog::core::filter::FilterField;
use stack_catalog::domain::model::Attestation;
use stack_catalog::{CatalogApi, CatalogConfig, CatalogContext, InMemoryCatalog};
use tempfile::NamedTempFile;

const FIXTURE: &str = r#"{
    "products": [
        {"id": "p1", "name": "Cards", "stack": "Payments", "tc": "TC-Q1"},
        {"id": "p2", "name": "Wallet", "stack": "Payments"},
        {"id": "p3", "name": "Mortgages", "stack": "Lending", "tc": "TC-Q2"},
        {"id": "p4", "name": "Sandbox"}
    ],
    "applications": [
        {"id": "a1", "cmdbId": "CI001", "name": "Card Ledger", "tier": "gold", "resCat": "Critical", "stack": "Payments", "openRisks": 3},
        {"id": "a2", "cmdbId": "CI002", "name": "Wallet API", "tier": "silver", "resCat": "High", "stack": "Payments", "openRisks": 1, "description": "Mobile wallet backend"},
        {"id": "a3", "cmdbId": "CI003", "name": "Loan Origination", "tier": "gold", "resCat": "Critical", "stack": "Lending"}
    ],
    "associations": [
        {"productId": "p1", "appId": "a1", "addedAt": "2026-02-01T08:00:00Z"},
        {"productId": "p2", "appId": "a1", "addedAt": "2026-02-02T08:00:00Z"},
        {"productId": "p2", "appId": "a2", "addedAt": "2026-02-03T08:00:00Z"},
        {"productId": "p3", "appId": "a3", "addedAt": "2026-02-04T08:00:00Z"}
    ],
    "availableJira": {
        "a1": [{"projectKey": "LEDG", "name": "Ledger"}, {"projectKey": "CARD", "name": "Cards"}]
    },
    "fixVersions": {
        "LEDG": [{"id": "v1", "name": "2026.1"}, {"id": "v2", "name": "2026.2"}],
        "CARD": [{"id": "v9", "name": "Cards R9"}]
    },
    "environments": [
        {"id": "uat", "name": "UAT"},
        {"id": "prod", "name": "Production"}
    ]
}"#;

fn context() -> (CatalogContext, Arc<InMemoryCatalog>) {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(FIXTURE.as_bytes()).unwrap();
    let catalog = Arc::new(InMemoryCatalog::from_file(file.path()).unwrap());
    (
        CatalogContext::new(catalog.clone(), CatalogConfig::default()),
        catalog,
    )
}

#[tokio::test]
async fn test_stack_summaries_from_fixture() {
    let (context, _) = context();
    let summaries = context.stack_summaries().await.unwrap();

    let stacks: Vec<&str> = summaries.iter().map(|s| s.stack.as_str()).collect();
    assert_eq!(stacks, vec!["Lending", "Payments", "Unassigned"]);

    let payments = &summaries[1];
    assert_eq!(payments.product_count, 2);
    assert_eq!(payments.app_count, 2);
    assert_eq!(payments.critical_apps, 1);
    assert_eq!(payments.open_risks, 4);
    assert_eq!(payments.tc, "TC-Q1");

    let unassigned = &summaries[2];
    assert_eq!(unassigned.app_count, 0);
    assert_eq!(unassigned.tc, "N/A");
}

#[tokio::test]
async fn test_app_list_filters_and_options() {
    let (context, _) = context();
    let mut view = context.app_list_view("?tier=gold").await.unwrap();

    let names: Vec<&str> = view.visible().iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["Card Ledger", "Loan Origination"]);

    let query = view.set(FilterField::Stack, "Payments");
    assert_eq!(query, "stack=Payments&tier=gold");
    assert_eq!(view.visible().len(), 1);

    view.set(FilterField::Tier, "");
    let query = view.set(FilterField::Search, "wallet backend");
    assert_eq!(query, "search=wallet+backend&stack=Payments");
    let names: Vec<&str> = view.visible().iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["Wallet API"]);

    let products: Vec<&str> = view.options().products.iter().map(|o| o.label.as_str()).collect();
    assert_eq!(products, vec!["Cards", "Mortgages", "Wallet"]);
    let tcs: Vec<&str> = view.options().tcs.iter().map(|o| o.label.as_str()).collect();
    assert_eq!(tcs, vec!["TC-Q1", "TC-Q2"]);
}

#[tokio::test]
async fn test_deployment_release_flow() {
    let (context, catalog) = context();
    let mut wizard = context.deployment_wizard("a1").await.unwrap();
    assert_eq!(wizard.backlogs().len(), 2);
    let environments: Vec<&str> = wizard
        .available_environments()
        .iter()
        .map(|e| e.id.as_str())
        .collect();
    assert_eq!(environments, vec!["uat", "prod"]);

    wizard.open();
    wizard.select_backlog(catalog.as_ref(), "LEDG").await.unwrap();
    wizard.select_version("v2").unwrap();
    wizard.select_backlog(catalog.as_ref(), "CARD").await.unwrap();
    assert!(wizard.selected_version().is_none());
    wizard.select_version("v9").unwrap();
    assert!(wizard.next());
    assert!(wizard.next());
    wizard.set_navigator_id("NAV-2026-17");
    assert!(wizard.next());
    assert!(wizard.toggle_environment("staging").is_err());
    wizard.toggle_environment("uat").unwrap();
    wizard.toggle_environment("prod").unwrap();

    for item in Attestation::ALL {
        wizard.toggle_attestation(item);
    }
    assert!(wizard.can_submit());
    assert!(wizard.submit(catalog.as_ref()).await);

    let deployments = catalog.list_deployments("a1").await.unwrap();
    assert_eq!(deployments.len(), 1);
    assert_eq!(deployments[0].fix_version_id, "v9");
    assert_eq!(deployments[0].change_requests.len(), 2);

    // reopening starts over
    wizard.close();
    wizard.open();
    assert!(wizard.created().is_none());
    assert!(!wizard.all_attestations_checked());
}
