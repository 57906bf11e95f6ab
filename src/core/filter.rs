use std::collections::BTreeMap;

use url::form_urlencoded;

use crate::domain::model::Application;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    Search,
    ResCat,
    Stack,
    Product,
    Tc,
    Tier,
}

impl FilterField {
    pub const ALL: [FilterField; 6] = [
        FilterField::Search,
        FilterField::ResCat,
        FilterField::Stack,
        FilterField::Product,
        FilterField::Tc,
        FilterField::Tier,
    ];

    /// Query parameter name used in list URLs.
    pub fn param(&self) -> &'static str {
        match self {
            FilterField::Search => "search",
            FilterField::ResCat => "resCat",
            FilterField::Stack => "stack",
            FilterField::Product => "product",
            FilterField::Tc => "tc",
            FilterField::Tier => "tier",
        }
    }

    fn from_param(param: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.param() == param)
    }
}

/// Active filters of the application list. An empty string means "any".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppFilter {
    pub search: String,
    pub res_cat: String,
    pub stack: String,
    pub product: String,
    pub tc: String,
    pub tier: String,
}

impl AppFilter {
    /// Seeds filters from a URL query string (with or without leading `?`).
    /// Unknown parameters are ignored.
    pub fn from_query(query: &str) -> Self {
        let mut filter = Self::default();
        let query = query.strip_prefix('?').unwrap_or(query);
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            if let Some(field) = FilterField::from_param(&key) {
                filter.set(field, value.into_owned());
            }
        }
        filter
    }

    /// Serialises the non-empty filters in a fixed parameter order.
    pub fn to_query(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for field in FilterField::ALL {
            let value = self.get(field);
            if !value.is_empty() {
                serializer.append_pair(field.param(), value);
            }
        }
        serializer.finish()
    }

    pub fn get(&self, field: FilterField) -> &str {
        match field {
            FilterField::Search => &self.search,
            FilterField::ResCat => &self.res_cat,
            FilterField::Stack => &self.stack,
            FilterField::Product => &self.product,
            FilterField::Tc => &self.tc,
            FilterField::Tier => &self.tier,
        }
    }

    pub fn set(&mut self, field: FilterField, value: impl Into<String>) {
        let value = value.into();
        let slot = match field {
            FilterField::Search => &mut self.search,
            FilterField::ResCat => &mut self.res_cat,
            FilterField::Stack => &mut self.stack,
            FilterField::Product => &mut self.product,
            FilterField::Tc => &mut self.tc,
            FilterField::Tier => &mut self.tier,
        };
        *slot = value;
    }

    pub fn is_empty(&self) -> bool {
        FilterField::ALL.iter().all(|f| self.get(*f).is_empty())
    }

    pub fn matches(&self, app: &Application) -> bool {
        self.matches_search(app)
            && matches_exact(&self.res_cat, app.res_cat.as_deref())
            && matches_exact(&self.stack, app.stack.as_deref())
            && matches_exact(&self.tier, app.tier.as_deref())
            && (self.product.is_empty() || app.products.iter().any(|p| p.id == self.product))
            && (self.tc.is_empty()
                || app
                    .products
                    .iter()
                    .any(|p| p.tc.as_deref() == Some(self.tc.as_str())))
    }

    fn matches_search(&self, app: &Application) -> bool {
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        std::iter::once(app.name.as_str())
            .chain(std::iter::once(app.cmdb_id.as_str()))
            .chain(app.description.as_deref())
            .any(|field| field.to_lowercase().contains(&needle))
    }

    pub fn apply<'a>(&self, apps: &'a [Application]) -> Vec<&'a Application> {
        apps.iter().filter(|app| self.matches(app)).collect()
    }
}

fn matches_exact(wanted: &str, actual: Option<&str>) -> bool {
    wanted.is_empty() || actual == Some(wanted)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
}

/// Option lists for the categorical filters, derived from the unfiltered list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub stacks: Vec<FilterOption>,
    pub products: Vec<FilterOption>,
    pub tcs: Vec<FilterOption>,
    pub tiers: Vec<FilterOption>,
}

impl FilterOptions {
    pub fn derive(apps: &[Application]) -> Self {
        let mut stacks = BTreeMap::new();
        let mut products = BTreeMap::new();
        let mut tcs = BTreeMap::new();
        let mut tiers = BTreeMap::new();

        for app in apps {
            if let Some(stack) = non_blank(app.stack.as_deref()) {
                stacks.insert(stack.to_string(), stack.to_string());
            }
            if let Some(tier) = non_blank(app.tier.as_deref()) {
                tiers.insert(tier.to_string(), tier.to_string());
            }
            for membership in &app.products {
                products
                    .entry(membership.id.clone())
                    .or_insert_with(|| membership.name.clone());
                if let Some(tc) = non_blank(membership.tc.as_deref()) {
                    tcs.insert(tc.to_string(), tc.to_string());
                }
            }
        }

        Self {
            stacks: sorted_options(stacks),
            products: sorted_options(products),
            tcs: sorted_options(tcs),
            tiers: sorted_options(tiers),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn sorted_options(distinct: BTreeMap<String, String>) -> Vec<FilterOption> {
    let mut options: Vec<FilterOption> = distinct
        .into_iter()
        .map(|(value, label)| FilterOption { value, label })
        .collect();
    options.sort_by(|a, b| {
        a.label
            .to_lowercase()
            .cmp(&b.label.to_lowercase())
            .then_with(|| a.value.cmp(&b.value))
    });
    options
}

/// Keeps the list filter and the page URL in sync.
///
/// The view owns the unfiltered list; every filter change returns the query
/// string the caller should write back to the address bar.
#[derive(Debug, Clone, Default)]
pub struct AppListView {
    apps: Vec<Application>,
    filter: AppFilter,
    options: FilterOptions,
}

impl AppListView {
    pub fn new(apps: Vec<Application>, query: &str) -> Self {
        let options = FilterOptions::derive(&apps);
        Self {
            apps,
            filter: AppFilter::from_query(query),
            options,
        }
    }

    pub fn replace_apps(&mut self, apps: Vec<Application>) {
        self.options = FilterOptions::derive(&apps);
        self.apps = apps;
    }

    /// Re-seeds the filter after browser navigation changed the URL.
    pub fn sync_from_query(&mut self, query: &str) {
        self.filter = AppFilter::from_query(query);
    }

    pub fn set(&mut self, field: FilterField, value: impl Into<String>) -> String {
        self.filter.set(field, value);
        tracing::debug!("Filter {} changed, query now '{}'", field.param(), self.filter.to_query());
        self.filter.to_query()
    }

    pub fn clear(&mut self) -> String {
        self.filter = AppFilter::default();
        String::new()
    }

    pub fn filter(&self) -> &AppFilter {
        &self.filter
    }

    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    pub fn visible(&self) -> Vec<&Application> {
        self.filter.apply(&self.apps)
    }

    pub fn total(&self) -> usize {
        self.apps.len()
    }
}
