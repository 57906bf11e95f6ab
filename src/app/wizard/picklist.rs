use crate::core::selection::{add_unique_by, remove_by_id, selected_from_available, toggle_id};
use crate::domain::model::Keyed;

/// Checkbox list plus manually entered items, used for repos and Jira projects.
///
/// A key lives in at most one of the two places: items that are available
/// are only ever tracked through `selected`, and `manual` holds items the
/// server did not offer.
#[derive(Debug, Clone)]
pub struct PickList<T> {
    available: Vec<T>,
    selected: Vec<String>,
    manual: Vec<T>,
}

impl<T> Default for PickList<T> {
    fn default() -> Self {
        Self {
            available: Vec::new(),
            selected: Vec::new(),
            manual: Vec::new(),
        }
    }
}

impl<T: Keyed + Clone> PickList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn available(&self) -> &[T] {
        &self.available
    }

    pub fn selected_keys(&self) -> &[String] {
        &self.selected
    }

    pub fn manual(&self) -> &[T] {
        &self.manual
    }

    pub fn is_available(&self, key: &str) -> bool {
        self.available.iter().any(|item| item.key() == key)
    }

    pub fn is_selected(&self, key: &str) -> bool {
        self.selected.iter().any(|k| k == key)
    }

    /// Replaces the server-provided list.
    ///
    /// Selected keys that are neither offered nor manual are dropped, and
    /// manual items whose key is now offered move over to the checkbox
    /// selection.
    pub fn set_available(&mut self, items: Vec<T>) {
        self.available = items;

        let (promoted, still_manual): (Vec<T>, Vec<T>) = std::mem::take(&mut self.manual)
            .into_iter()
            .partition(|item| self.available.iter().any(|a| a.key() == item.key()));
        self.manual = still_manual;

        let available = &self.available;
        let manual = &self.manual;
        self.selected.retain(|key| {
            available.iter().any(|item| item.key() == key.as_str())
                || manual.iter().any(|item| item.key() == key.as_str())
        });
        for item in promoted {
            if !self.is_selected(item.key()) {
                self.selected.push(item.key().to_string());
            }
        }
    }

    /// Flips a checkbox. Keys not in the available list are ignored.
    pub fn toggle(&mut self, key: &str) -> bool {
        if !self.is_available(key) {
            return false;
        }
        toggle_id(&mut self.selected, key)
    }

    pub fn select_all(&mut self, checked: bool) {
        self.selected = if checked {
            self.available.iter().map(|item| item.key().to_string()).collect()
        } else {
            Vec::new()
        };
    }

    /// Adds a user-entered item and marks its key selected. Returns `false`
    /// if nothing changed.
    pub fn add_manual(&mut self, item: T) -> bool {
        let key = item.key().to_string();
        if self.is_available(&key) {
            if self.is_selected(&key) {
                return false;
            }
            self.selected.push(key);
            return true;
        }

        let inserted = add_unique_by(&mut self.manual, item, |i| i.key());
        if !self.is_selected(&key) {
            self.selected.push(key);
        }
        inserted
    }

    /// Removes a manual entry. Checkbox selection is left alone.
    pub fn remove_manual(&mut self, key: &str) -> bool {
        let removed = remove_by_id(&mut self.manual, key, |i| i.key()) > 0;
        if removed {
            self.selected.retain(|k| k != key);
        }
        removed
    }

    /// Resolved checkbox items (selection order) followed by manual items.
    pub fn all_selected(&self) -> Vec<T> {
        let mut chosen = selected_from_available(&self.selected, &self.available, |i| i.key());
        chosen.extend(self.manual.iter().cloned());
        chosen
    }

    pub fn total_selected(&self) -> usize {
        self.selected
            .iter()
            .filter(|key| self.is_available(key))
            .count()
            + self.manual.len()
    }

    pub fn clear(&mut self) {
        self.available.clear();
        self.selected.clear();
        self.manual.clear();
    }
}
