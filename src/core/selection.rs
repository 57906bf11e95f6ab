//! Helpers over id-keyed lists used by every checkbox/manual-add selection.
//!
//! All functions mutate in place and report whether anything changed, so a
//! caller can skip downstream recomputation when the answer is `false`.

/// Removes `id` when present, otherwise appends it. Returns `true` when `id`
/// is in the list afterwards.
pub fn toggle_id(list: &mut Vec<String>, id: &str) -> bool {
    if let Some(pos) = list.iter().position(|existing| existing == id) {
        list.remove(pos);
        false
    } else {
        list.push(id.to_string());
        true
    }
}

/// Appends `item` unless an entry with the same key already exists.
pub fn add_unique_by<T, F>(list: &mut Vec<T>, item: T, get_key: F) -> bool
where
    F: Fn(&T) -> &str,
{
    let key = get_key(&item);
    if list.iter().any(|existing| get_key(existing) == key) {
        return false;
    }
    list.push(item);
    true
}

/// Drops every entry whose key equals `id`, returning how many were removed.
pub fn remove_by_id<T, F>(list: &mut Vec<T>, id: &str, get_key: F) -> usize
where
    F: Fn(&T) -> &str,
{
    let before = list.len();
    list.retain(|item| get_key(item) != id);
    before - list.len()
}

/// Resolves `selected_ids` against `available`, keeping the order of
/// `selected_ids`. Ids with no match are skipped.
pub fn selected_from_available<T, F>(selected_ids: &[String], available: &[T], get_id: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> &str,
{
    selected_ids
        .iter()
        .filter_map(|id| available.iter().find(|item| get_id(*item) == id.as_str()))
        .cloned()
        .collect()
}
