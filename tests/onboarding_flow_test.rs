use std::sync::Arc;
use std::time::{Duration, Instant};

use stack_catalog::domain::model::{
    Application, DocEntry, DocType, JiraProjectRef, Product, RepoRef, RepoSource, ServiceInstance,
};
use stack_catalog::{CatalogApi, CatalogConfig, CatalogContext, InMemoryCatalog, OnboardingStep};

fn application(id: &str, cmdb_id: &str) -> Application {
    Application {
        id: id.to_string(),
        cmdb_id: cmdb_id.to_string(),
        name: format!("{} service", id),
        description: None,
        tier: Some("gold".to_string()),
        status: Some("active".to_string()),
        res_cat: Some("Critical".to_string()),
        stack: Some("Payments".to_string()),
        product_owner: Some("Jordan".to_string()),
        system_architect: None,
        open_risks: 1,
        products: Vec::new(),
    }
}

fn seeded_catalog() -> InMemoryCatalog {
    let catalog = InMemoryCatalog::new();
    catalog.insert_product(Product {
        id: "p1".to_string(),
        name: "Cards".to_string(),
        stack: Some("Payments".to_string()),
        tc: Some("TC1".to_string()),
    });

    for (id, cmdb) in [("ledger", "CI100"), ("gateway", "CI200")] {
        catalog.insert_application(application(id, cmdb));
        catalog.insert_service_instance(
            id,
            ServiceInstance {
                id: format!("{}-prod", id),
                name: format!("{} prod", id),
                environment: Some("prod".to_string()),
            },
        );
        catalog.insert_available_repo(
            id,
            RepoRef {
                repo_id: format!("{}-api", id),
                name: format!("{}-api", id),
                url: Some(format!("https://gitlab.example.com/{}-api", id)),
                source: RepoSource::Gitlab,
            },
        );
        catalog.insert_available_repo(
            id,
            RepoRef {
                repo_id: format!("{}-deploy", id),
                name: format!("{}-deploy", id),
                url: Some(format!("https://bitbucket.example.com/{}-deploy", id)),
                source: RepoSource::Bitbucket,
            },
        );
        catalog.insert_jira_project(
            id,
            JiraProjectRef {
                project_key: id.to_uppercase(),
                name: format!("{} board", id),
                url: None,
            },
        );
    }
    catalog
}

fn context_with(catalog: InMemoryCatalog) -> (CatalogContext, Arc<InMemoryCatalog>) {
    let catalog = Arc::new(catalog);
    let context = CatalogContext::new(catalog.clone(), CatalogConfig::default());
    (context, catalog)
}

fn add_all_docs(wizard: &mut stack_catalog::OnboardingWizard) {
    for doc_type in DocType::TECHNICAL {
        wizard
            .docs_mut()
            .add(DocEntry {
                doc_type,
                title: format!("{} doc", doc_type),
                url: format!("https://wiki.example.com/{}", doc_type),
            })
            .unwrap();
    }
}

#[tokio::test]
async fn test_full_onboarding_flow() {
    let (context, catalog) = context_with(seeded_catalog());
    let products = catalog.list_products().await.unwrap();
    let app = catalog.get_application("ledger").await.unwrap();

    let mut wizard = context.onboarding_wizard();
    wizard.choose_product(products.into_iter().next());
    assert!(context.load_for(&mut wizard, Some(app)).await);

    assert!(wizard.next());
    assert_eq!(wizard.step(), OnboardingStep::Instances);
    assert!(wizard.next());

    assert!(!wizard.next(), "no repos selected yet");
    assert!(wizard.repos_mut().toggle("ledger-deploy"));
    wizard.repos_mut().add_manual(RepoRef {
        repo_id: "legacy".to_string(),
        name: "legacy-batch".to_string(),
        url: None,
        source: RepoSource::Manual,
    });
    assert_eq!(wizard.repos().total_selected(), 2);
    assert!(wizard.next());

    wizard.jira_mut().select_all(true);
    assert!(wizard.next());
    assert_eq!(wizard.step(), OnboardingStep::Docs);

    assert!(!wizard.finish(catalog.as_ref()).await, "docs incomplete");
    add_all_docs(&mut wizard);

    let request = wizard.association_request().unwrap();
    let repo_ids: Vec<&str> = request.repos.iter().map(|r| r.repo_id.as_str()).collect();
    assert_eq!(repo_ids, vec!["ledger-deploy", "legacy"]);
    assert_eq!(request.jira_projects[0].project_key, "LEDGER");

    assert!(wizard.finish(catalog.as_ref()).await);
    let submission = wizard.submission();
    assert!(submission.succeeded());
    assert!(submission.is_partial());
    assert_eq!(submission.warnings.len(), 1);
    assert!(submission.warnings[0].contains("legacy-batch"));

    let associations = catalog.list_associations().await.unwrap();
    assert_eq!(associations.len(), 1);
    assert_eq!(associations[0].app_id, "ledger");

    wizard.reset();
    assert_eq!(wizard.step(), OnboardingStep::Product);
    assert!(wizard.association_request().is_none());
}

#[tokio::test]
async fn test_failed_submission_keeps_state_for_retry() {
    let (context, catalog) = context_with(seeded_catalog());
    let app = catalog.get_application("gateway").await.unwrap();
    let product = catalog.list_products().await.unwrap().remove(0);

    let mut wizard = context.onboarding_wizard();
    wizard.choose_product(Some(product));
    context.load_for(&mut wizard, Some(app)).await;
    wizard.repos_mut().select_all(true);
    wizard.jira_mut().select_all(true);
    add_all_docs(&mut wizard);
    assert!(wizard.go_to(OnboardingStep::Docs));

    catalog.reject_associations(Some("catalog is read-only"));
    assert!(!wizard.finish(catalog.as_ref()).await);
    assert_eq!(
        wizard.submission().error.as_deref(),
        Some("Submission failed: catalog is read-only")
    );
    assert_eq!(wizard.repos().total_selected(), 2);
    assert_eq!(wizard.docs().len(), 4);

    catalog.reject_associations(None);
    assert!(wizard.finish(catalog.as_ref()).await);
    assert!(wizard.submission().error.is_none());
    assert!(!wizard.submission().is_partial());
}

#[tokio::test]
async fn test_finish_runs_once_after_success() {
    let (context, catalog) = context_with(seeded_catalog());
    let app = catalog.get_application("ledger").await.unwrap();
    let product = catalog.list_products().await.unwrap().remove(0);

    let mut wizard = context.onboarding_wizard();
    wizard.choose_product(Some(product));
    context.load_for(&mut wizard, Some(app)).await;
    wizard.repos_mut().select_all(true);
    wizard.jira_mut().select_all(true);
    add_all_docs(&mut wizard);

    assert!(wizard.finish(catalog.as_ref()).await);
    assert!(!wizard.can_finish());

    assert!(!wizard.finish(catalog.as_ref()).await);
    let submission = wizard.submission();
    assert!(submission.succeeded());
    assert!(submission.error.is_none());
    assert_eq!(catalog.list_associations().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_manual_repo_added_during_load_stays_selected() {
    let (context, catalog) = context_with(seeded_catalog());
    let app = catalog.get_application("ledger").await.unwrap();

    let mut wizard = context.onboarding_wizard();
    let request = wizard.select_application(Some(app)).unwrap();
    wizard.repos_mut().add_manual(RepoRef {
        repo_id: "legacy".to_string(),
        name: "legacy-batch".to_string(),
        url: Some("https://git.example.com/legacy-batch".to_string()),
        source: RepoSource::Manual,
    });

    assert!(wizard.apply_load(request.run(catalog.as_ref()).await, Instant::now()));

    assert!(wizard.repos().is_selected("legacy"));
    assert_eq!(wizard.repos().manual().len(), 1);
    assert_eq!(wizard.repos().total_selected(), 1);
    assert_eq!(wizard.repos().all_selected().len(), 1);
}

#[tokio::test]
async fn test_lookup_failure_raises_dismissible_banner() {
    let catalog = seeded_catalog();
    catalog.fail_lookups_for("ledger", &["bitbucket"]);
    let (context, catalog) = context_with(catalog);
    let app = catalog.get_application("ledger").await.unwrap();

    let mut wizard = context.onboarding_wizard();
    let request = wizard.select_application(Some(app)).unwrap();
    let raised_at = Instant::now();
    assert!(wizard.apply_load(request.run(catalog.as_ref()).await, raised_at));

    assert_eq!(
        wizard.banner().visible(raised_at),
        Some("Failed to load Bitbucket repositories")
    );
    assert_eq!(wizard.repos().available().len(), 1);
    assert!(wizard.can_proceed(OnboardingStep::Instances));

    let later = raised_at + context.banner_delay() + Duration::from_millis(1);
    assert!(wizard.banner_mut().tick(later));
    assert!(wizard.banner().visible(later).is_none());
}

#[tokio::test]
async fn test_switching_application_mid_load_keeps_latest() {
    let (context, catalog) = context_with(seeded_catalog());
    let ledger = catalog.get_application("ledger").await.unwrap();
    let gateway = catalog.get_application("gateway").await.unwrap();

    let mut wizard = context.onboarding_wizard();
    let first = wizard.select_application(Some(ledger)).unwrap();
    let second = wizard.select_application(Some(gateway)).unwrap();

    let (first_outcome, second_outcome) =
        tokio::join!(first.run(catalog.as_ref()), second.run(catalog.as_ref()));
    let now = Instant::now();
    assert!(wizard.apply_load(second_outcome, now));
    assert!(!wizard.apply_load(first_outcome, now));

    assert_eq!(wizard.application().unwrap().id, "gateway");
    let available: Vec<&str> = wizard
        .repos()
        .available()
        .iter()
        .map(|r| r.repo_id.as_str())
        .collect();
    assert_eq!(available, vec!["gateway-api", "gateway-deploy"]);
}
