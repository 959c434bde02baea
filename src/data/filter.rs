use std::collections::{BTreeMap, BTreeSet};

use super::model::{Attribute, CustomerTable};

// ---------------------------------------------------------------------------
// Filter selection: which values are allowed per attribute
// ---------------------------------------------------------------------------

/// Per-attribute selection state: attribute → set of allowed values.
///
/// An attribute with no entry behaves like an empty set, so every attribute
/// has to be selected explicitly for a record to pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSelection {
    allowed: BTreeMap<Attribute, BTreeSet<String>>,
}

impl FilterSelection {
    /// Every distinct non-null value selected for every attribute.
    ///
    /// Nulls are never part of the default, so records with a null
    /// categorical value are hidden until something selects them.
    pub fn all(table: &CustomerTable) -> Self {
        let allowed = Attribute::ALL
            .into_iter()
            .map(|attr| {
                let values = table.distinct_values(attr).iter().cloned().collect();
                (attr, values)
            })
            .collect();
        Self { allowed }
    }

    /// Whether `value` is currently selected for `attr`.
    pub fn is_selected(&self, attr: Attribute, value: &str) -> bool {
        self.allowed
            .get(&attr)
            .is_some_and(|set| set.contains(value))
    }

    /// Number of selected values for `attr`.
    pub fn selected_count(&self, attr: Attribute) -> usize {
        self.allowed.get(&attr).map_or(0, BTreeSet::len)
    }

    /// Replace the allowed set for `attr`.
    pub fn set(&mut self, attr: Attribute, values: impl IntoIterator<Item = String>) {
        self.allowed.insert(attr, values.into_iter().collect());
    }

    /// Toggle a single value in an attribute's selection.
    pub fn toggle(&mut self, attr: Attribute, value: &str) {
        let selected = self.allowed.entry(attr).or_default();
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
    }

    /// Select every observed value of `attr`.
    pub fn select_all(&mut self, table: &CustomerTable, attr: Attribute) {
        self.set(attr, table.distinct_values(attr).iter().cloned());
    }

    /// Deselect everything for `attr`.
    pub fn select_none(&mut self, attr: Attribute) {
        self.allowed.insert(attr, BTreeSet::new());
    }

    /// Whether a record's value passes the filter for `attr`.
    fn admits(&self, attr: Attribute, value: Option<&str>) -> bool {
        match value {
            Some(v) => self.is_selected(attr, v),
            None => false,
        }
    }
}

/// Return indices of customers that pass all three attribute filters.
///
/// A customer passes when, for every attribute, its value is non-null and
/// contained in the selection. Indices are in source order.
pub fn filtered_indices(table: &CustomerTable, selection: &FilterSelection) -> Vec<usize> {
    table
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| {
            Attribute::ALL
                .into_iter()
                .all(|attr| selection.admits(attr, rec.category(attr)))
        })
        .map(|(i, _)| i)
        .collect()
}
