use std::collections::HashMap;

use super::filter::{FilterSelection, filtered_indices};
use super::model::{Attribute, CustomerTable};

// ---------------------------------------------------------------------------
// Summary metrics
// ---------------------------------------------------------------------------

/// Headline numbers over the filtered customers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryMetrics {
    pub customers: usize,
    pub total_spent: f64,
    /// `None` when no customer passes the filters.
    pub average_spent: Option<f64>,
}

impl SummaryMetrics {
    pub fn compute(table: &CustomerTable, indices: &[usize]) -> Self {
        let total_spent: f64 = indices
            .iter()
            .filter_map(|&i| table.records.get(i))
            .map(|rec| rec.total_spent)
            .sum();
        let customers = indices.len();
        let average_spent = (customers > 0).then(|| total_spent / customers as f64);

        Self {
            customers,
            total_spent,
            average_spent,
        }
    }
}

// ---------------------------------------------------------------------------
// Group counts
// ---------------------------------------------------------------------------

/// Frequency table of one attribute within the filtered customers.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupCounts {
    pub attribute: Attribute,
    /// (value, count), most frequent first.
    pub entries: Vec<(String, usize)>,
}

impl GroupCounts {
    /// Count each distinct value of `attribute` among `indices`.
    ///
    /// Ties keep the order in which values first appear in the table.
    pub fn compute(table: &CustomerTable, indices: &[usize], attribute: Attribute) -> Self {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for rec in indices.iter().filter_map(|&i| table.records.get(i)) {
            if let Some(v) = rec.category(attribute) {
                *counts.entry(v).or_default() += 1;
            }
        }

        let mut entries: Vec<(String, usize)> = table
            .distinct_values(attribute)
            .iter()
            .filter_map(|v| counts.get(v.as_str()).map(|&n| (v.clone(), n)))
            .collect();
        // Stable sort, so ties stay in first-appearance order.
        entries.sort_by(|a, b| b.1.cmp(&a.1));

        Self { attribute, entries }
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, n)| n).sum()
    }

    pub fn get(&self, value: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|(v, _)| v == value)
            .map(|&(_, n)| n)
    }
}

// ---------------------------------------------------------------------------
// Dashboard view – everything one refresh produces
// ---------------------------------------------------------------------------

/// The engine output for one filter selection.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    /// Indices of the filtered customers, in source order.
    pub indices: Vec<usize>,
    pub metrics: SummaryMetrics,
    /// One entry per [`Attribute::ALL`], same order.
    pub group_counts: Vec<GroupCounts>,
}

impl DashboardView {
    pub fn compute(table: &CustomerTable, selection: &FilterSelection) -> Self {
        let indices = filtered_indices(table, selection);
        let metrics = SummaryMetrics::compute(table, &indices);
        let group_counts = Attribute::ALL
            .into_iter()
            .map(|attr| GroupCounts::compute(table, &indices, attr))
            .collect();

        Self {
            indices,
            metrics,
            group_counts,
        }
    }

    /// Group counts for one attribute.
    pub fn counts(&self, attr: Attribute) -> Option<&GroupCounts> {
        self.group_counts.iter().find(|g| g.attribute == attr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CustomerRecord;

    fn example_table() -> CustomerTable {
        CustomerTable::from_records(
            vec![
                CustomerRecord::new(Some("18-25"), Some("F"), Some("Low"), 10.0),
                CustomerRecord::new(Some("18-25"), Some("M"), Some("High"), 20.0),
                CustomerRecord::new(Some("26-35"), Some("F"), Some("Low"), 30.0),
            ],
            Vec::new(),
        )
    }

    #[test]
    fn worked_example_single_age_group() {
        let table = example_table();
        let mut selection = FilterSelection::all(&table);
        selection.set(Attribute::AgeGroup, ["18-25".to_string()]);

        let view = DashboardView::compute(&table, &selection);

        assert_eq!(view.indices, vec![0, 1]);
        assert_eq!(view.metrics.customers, 2);
        assert_eq!(view.metrics.total_spent, 30.0);
        assert_eq!(view.metrics.average_spent, Some(15.0));

        let age = view.counts(Attribute::AgeGroup).unwrap();
        assert_eq!(age.entries, vec![("18-25".to_string(), 2)]);
    }

    #[test]
    fn empty_view_has_undefined_average() {
        let table = example_table();
        let mut selection = FilterSelection::all(&table);
        selection.select_none(Attribute::IncomeBracket);

        let view = DashboardView::compute(&table, &selection);
        assert_eq!(view.metrics.customers, 0);
        assert_eq!(view.metrics.total_spent, 0.0);
        assert_eq!(view.metrics.average_spent, None);
        assert!(view.group_counts.iter().all(|g| g.entries.is_empty()));
    }

    #[test]
    fn group_counts_sum_to_view_size() {
        let table = CustomerTable::from_records(
            vec![
                CustomerRecord::new(Some("26-35"), Some("F"), Some("Low"), 5.0),
                CustomerRecord::new(Some("18-25"), Some("M"), Some("High"), 15.0),
                CustomerRecord::new(Some("26-35"), Some("M"), Some("Low"), 25.0),
                CustomerRecord::new(Some("26-35"), None, Some("Low"), 35.0),
                CustomerRecord::new(Some("46-55"), Some("F"), Some("Medium"), 45.0),
            ],
            Vec::new(),
        );
        let view = DashboardView::compute(&table, &FilterSelection::all(&table));

        assert_eq!(view.metrics.customers, view.indices.len());
        for counts in &view.group_counts {
            assert_eq!(counts.total(), view.indices.len());
        }
        let expected_total: f64 = view
            .indices
            .iter()
            .map(|&i| table.records[i].total_spent)
            .sum();
        assert_eq!(view.metrics.total_spent, expected_total);
        assert_eq!(
            view.metrics.average_spent,
            Some(expected_total / view.indices.len() as f64)
        );
    }

    #[test]
    fn most_frequent_first_with_ties_in_appearance_order() {
        let table = CustomerTable::from_records(
            vec![
                CustomerRecord::new(Some("a"), Some("F"), Some("Low"), 1.0),
                CustomerRecord::new(Some("b"), Some("F"), Some("Low"), 1.0),
                CustomerRecord::new(Some("c"), Some("F"), Some("Low"), 1.0),
                CustomerRecord::new(Some("c"), Some("F"), Some("Low"), 1.0),
                CustomerRecord::new(Some("b"), Some("F"), Some("Low"), 1.0),
                CustomerRecord::new(Some("c"), Some("F"), Some("Low"), 1.0),
            ],
            Vec::new(),
        );
        let indices: Vec<usize> = (0..table.len()).collect();
        let counts = GroupCounts::compute(&table, &indices, Attribute::AgeGroup);

        let order: Vec<&str> = counts.entries.iter().map(|(v, _)| v.as_str()).collect();
        assert_eq!(order, ["c", "b", "a"]);
        assert_eq!(counts.get("b"), Some(2));
        assert_eq!(counts.get("z"), None);
    }

    #[test]
    fn unselected_values_are_absent_from_counts() {
        let table = example_table();
        let mut selection = FilterSelection::all(&table);
        selection.toggle(Attribute::Gender, "M");

        let view = DashboardView::compute(&table, &selection);
        let gender = view.counts(Attribute::Gender).unwrap();
        assert_eq!(gender.entries, vec![("F".to_string(), 2)]);
        let income = view.counts(Attribute::IncomeBracket).unwrap();
        assert_eq!(income.get("High"), None);
    }
}
