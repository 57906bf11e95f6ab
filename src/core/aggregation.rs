use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::hash::Hash;

use crate::domain::model::{Application, Association, Product, StackSummary};

pub const UNASSIGNED_STACK: &str = "Unassigned";
pub const TC_PLACEHOLDER: &str = "N/A";

/// Builds an id-keyed lookup over a flat entity list. Later duplicates win.
pub fn build_lookup<'a, T, K, F>(items: &'a [T], key: F) -> HashMap<K, &'a T>
where
    K: Eq + Hash,
    F: Fn(&'a T) -> K,
{
    items.iter().map(|item| (key(item), item)).collect()
}

fn stack_name(product: &Product) -> &str {
    match product.stack.as_deref().map(str::trim) {
        Some(stack) if !stack.is_empty() => stack,
        _ => UNASSIGNED_STACK,
    }
}

/// Rolls products, applications and their associations up into one summary
/// per stack, ordered by stack name.
///
/// Applications linked to several products of the same stack are counted
/// once. Associations pointing at unknown applications still count towards
/// `app_count` but contribute nothing to the critical/risk figures.
pub fn stack_summaries(
    products: &[Product],
    applications: &[Application],
    associations: &[Association],
) -> Vec<StackSummary> {
    let apps_by_id = build_lookup(applications, |app| app.id.as_str());

    let mut apps_by_product: HashMap<&str, Vec<&str>> = HashMap::new();
    for assoc in associations {
        apps_by_product
            .entry(assoc.product_id.as_str())
            .or_default()
            .push(assoc.app_id.as_str());
    }

    let mut groups: BTreeMap<&str, Vec<&Product>> = BTreeMap::new();
    for product in products {
        groups.entry(stack_name(product)).or_default().push(product);
    }

    groups
        .into_iter()
        .map(|(stack, members)| {
            let app_ids: BTreeSet<&str> = members
                .iter()
                .filter_map(|p| apps_by_product.get(p.id.as_str()))
                .flatten()
                .copied()
                .collect();

            let linked: Vec<&Application> = app_ids
                .iter()
                .filter_map(|id| apps_by_id.get(id).copied())
                .collect();

            let tc = members
                .iter()
                .find_map(|p| p.tc.as_deref().filter(|tc| !tc.trim().is_empty()))
                .unwrap_or(TC_PLACEHOLDER)
                .to_string();

            StackSummary {
                stack: stack.to_string(),
                product_count: members.len(),
                app_count: app_ids.len(),
                critical_apps: linked.iter().filter(|app| app.is_critical()).count(),
                open_risks: linked.iter().map(|app| u64::from(app.open_risks)).sum(),
                tc,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(id: &str, stack: Option<&str>, tc: Option<&str>) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            stack: stack.map(str::to_string),
            tc: tc.map(str::to_string),
        }
    }

    fn app(id: &str, res_cat: &str, open_risks: u32) -> Application {
        Application {
            id: id.to_string(),
            cmdb_id: format!("CI{}", id),
            name: format!("App {}", id),
            description: None,
            tier: None,
            status: None,
            res_cat: Some(res_cat.to_string()),
            stack: None,
            product_owner: None,
            system_architect: None,
            open_risks,
            products: Vec::new(),
        }
    }

    fn link(product_id: &str, app_id: &str) -> Association {
        Association {
            product_id: product_id.to_string(),
            app_id: app_id.to_string(),
            added_at: Utc::now(),
        }
    }

    #[test]
    fn test_shared_application_counted_once_per_stack() {
        let products = vec![product("p1", Some("Payments"), None), product("p2", Some("Payments"), None)];
        let apps = vec![app("shared", "Critical", 2), app("a", "High", 1), app("b", "Critical", 0)];
        let links = vec![
            link("p1", "shared"),
            link("p1", "a"),
            link("p2", "shared"),
            link("p2", "b"),
        ];

        let summaries = stack_summaries(&products, &apps, &links);

        assert_eq!(summaries.len(), 1);
        let payments = &summaries[0];
        assert_eq!(payments.stack, "Payments");
        assert_eq!(payments.product_count, 2);
        assert_eq!(payments.app_count, 3);
        assert_eq!(payments.critical_apps, 2);
        assert_eq!(payments.open_risks, 3);
    }

    #[test]
    fn test_missing_stack_goes_to_unassigned_bucket() {
        let products = vec![product("p1", None, None), product("p2", Some("  "), None), product("p3", Some("Cards"), None)];
        let summaries = stack_summaries(&products, &[], &[]);

        let names: Vec<&str> = summaries.iter().map(|s| s.stack.as_str()).collect();
        assert_eq!(names, vec!["Cards", UNASSIGNED_STACK]);
        assert_eq!(summaries[1].product_count, 2);
        assert_eq!(summaries[1].app_count, 0);
    }

    #[test]
    fn test_tc_taken_from_first_product_declaring_one() {
        let products = vec![
            product("p1", Some("Cards"), None),
            product("p2", Some("Cards"), Some("TC-7")),
            product("p3", Some("Cards"), Some("TC-9")),
            product("p4", Some("Loans"), None),
        ];
        let summaries = stack_summaries(&products, &[], &[]);

        assert_eq!(summaries[0].tc, "TC-7");
        assert_eq!(summaries[1].tc, TC_PLACEHOLDER);
    }

    #[test]
    fn test_unknown_app_ids_count_without_risk_data() {
        let products = vec![product("p1", Some("Cards"), None)];
        let apps = vec![app("known", "Critical", 4)];
        let links = vec![link("p1", "known"), link("p1", "ghost")];

        let summary = &stack_summaries(&products, &apps, &links)[0];
        assert_eq!(summary.app_count, 2);
        assert_eq!(summary.critical_apps, 1);
        assert_eq!(summary.open_risks, 4);
    }

    #[test]
    fn test_open_risks_total_exceeds_u32() {
        let products = vec![product("p1", Some("Cards"), None)];
        let apps = vec![app("a", "High", u32::MAX), app("b", "High", u32::MAX)];
        let links = vec![link("p1", "a"), link("p1", "b")];

        let summary = &stack_summaries(&products, &apps, &links)[0];
        assert_eq!(summary.open_risks, 2 * u64::from(u32::MAX));
    }

    #[test]
    fn test_build_lookup() {
        let apps = vec![app("a", "Low", 0), app("b", "Low", 0)];
        let lookup = build_lookup(&apps, |a| a.id.as_str());
        assert_eq!(lookup.len(), 2);
        assert_eq!(lookup["b"].name, "App b");
    }
}
