use crate::domain::model::{DocCategory, DocEntry, DocType};
use crate::utils::error::{CatalogError, Result};
use crate::utils::validation::{validate_link, validate_non_empty_string};

/// Documentation links collected for one document-type set, one per type.
#[derive(Debug, Clone)]
pub struct DocSelection {
    required: Vec<DocType>,
    entries: Vec<DocEntry>,
}

impl DocSelection {
    pub fn new(required: Vec<DocType>) -> Self {
        Self {
            required,
            entries: Vec::new(),
        }
    }

    pub fn for_category(category: DocCategory) -> Self {
        match category {
            DocCategory::Product => Self::new(DocType::PRODUCT.to_vec()),
            DocCategory::Technical => Self::new(DocType::TECHNICAL.to_vec()),
        }
    }

    pub fn required(&self) -> &[DocType] {
        &self.required
    }

    pub fn entries(&self) -> &[DocEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, doc_type: DocType) -> Option<&DocEntry> {
        self.entries.iter().find(|e| e.doc_type == doc_type)
    }

    /// Adds an entry. Rejects types outside the set, a second entry for the
    /// same type, blank titles and non-http(s) links.
    pub fn add(&mut self, entry: DocEntry) -> Result<()> {
        self.check(&entry)?;
        if self.get(entry.doc_type).is_some() {
            return Err(CatalogError::validation(format!(
                "A '{}' document is already linked",
                entry.doc_type
            )));
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Replaces the entry for `entry.doc_type`, adding it when absent.
    pub fn upsert(&mut self, entry: DocEntry) -> Result<()> {
        self.check(&entry)?;
        match self.entries.iter_mut().find(|e| e.doc_type == entry.doc_type) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
        Ok(())
    }

    pub fn remove(&mut self, doc_type: DocType) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.doc_type != doc_type);
        before != self.entries.len()
    }

    /// Required types that still have no entry, in declaration order.
    pub fn missing(&self) -> Vec<DocType> {
        self.required
            .iter()
            .copied()
            .filter(|t| self.get(*t).is_none())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.entries.len() == self.required.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn check(&self, entry: &DocEntry) -> Result<()> {
        if !self.required.contains(&entry.doc_type) {
            return Err(CatalogError::validation(format!(
                "'{}' is not part of this documentation set",
                entry.doc_type
            )));
        }
        validate_non_empty_string("doc.title", &entry.title)
            .map_err(|_| CatalogError::validation("Document title cannot be empty"))?;
        validate_link("doc.url", &entry.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(doc_type: DocType) -> DocEntry {
        DocEntry {
            doc_type,
            title: format!("{} page", doc_type),
            url: format!("https://wiki.example.com/{}", doc_type),
        }
    }

    #[test]
    fn test_completion_requires_every_type() {
        let mut docs = DocSelection::for_category(DocCategory::Technical);
        assert!(!docs.is_complete());
        assert_eq!(docs.missing().len(), 4);

        for doc_type in DocType::TECHNICAL {
            docs.add(entry(doc_type)).unwrap();
        }
        assert!(docs.is_complete());
        assert!(docs.missing().is_empty());
    }

    #[test]
    fn test_one_entry_per_type() {
        let mut docs = DocSelection::for_category(DocCategory::Technical);
        docs.add(entry(DocType::Runbook)).unwrap();

        let err = docs.add(entry(DocType::Runbook)).unwrap_err();
        assert!(matches!(err, CatalogError::ValidationError { .. }));
        assert_eq!(docs.len(), 1);

        let mut replacement = entry(DocType::Runbook);
        replacement.title = "On-call runbook".to_string();
        docs.upsert(replacement).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs.get(DocType::Runbook).unwrap().title, "On-call runbook");
    }

    #[test]
    fn test_rejects_types_from_other_set_and_bad_links() {
        let mut docs = DocSelection::for_category(DocCategory::Technical);
        assert!(docs.add(entry(DocType::Roadmap)).is_err());

        let mut bad = entry(DocType::Architecture);
        bad.url = "wiki/architecture".to_string();
        assert!(docs.add(bad).is_err());

        let mut untitled = entry(DocType::Architecture);
        untitled.title = "  ".to_string();
        assert!(docs.add(untitled).is_err());
        assert!(docs.is_empty());
    }

    #[test]
    fn test_remove() {
        let mut docs = DocSelection::for_category(DocCategory::Product);
        docs.add(entry(DocType::Roadmap)).unwrap();
        assert!(docs.remove(DocType::Roadmap));
        assert!(!docs.remove(DocType::Roadmap));
        assert_eq!(docs.missing()[0], DocType::ProductOverview);
    }
}
