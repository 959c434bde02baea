use std::path::Path;

use crate::color::CategoryColors;
use crate::data::aggregate::DashboardView;
use crate::data::filter::FilterSelection;
use crate::data::model::{Attribute, CustomerTable};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded customer table (None until a file is loaded).
    pub table: Option<CustomerTable>,

    /// Per-attribute filter selections.
    pub selection: FilterSelection,

    /// Engine output for the current selection.
    pub view: Option<DashboardView>,

    /// Stable category colours for the charts.
    pub colors: CategoryColors,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Ingest a newly loaded table, reset filters to the default selection.
    pub fn set_table(&mut self, table: CustomerTable) {
        self.selection = FilterSelection::all(&table);
        self.colors = CategoryColors::for_table(&table);
        self.view = Some(DashboardView::compute(&table, &self.selection));

        self.table = Some(table);
        self.status_message = None;
    }

    /// Load `path` and install it, or record the error for the status line.
    pub fn load_path(&mut self, path: &Path) {
        match crate::data::loader::load_file(path) {
            Ok(table) => {
                log::info!(
                    "Loaded {} customers from {} with columns {:?}",
                    table.len(),
                    path.display(),
                    table.column_names
                );
                self.set_table(table);
            }
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", path.display());
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Recompute the dashboard view after a selection change.
    pub fn refresh(&mut self) {
        if let Some(table) = &self.table {
            let view = DashboardView::compute(table, &self.selection);
            log::debug!(
                "Refreshed view: {} of {} customers",
                view.indices.len(),
                table.len()
            );
            self.view = Some(view);
        }
    }

    /// Toggle a single value in an attribute's selection.
    pub fn toggle_filter_value(&mut self, attr: Attribute, value: &str) {
        self.selection.toggle(attr, value);
        self.refresh();
    }

    /// Select all values of an attribute.
    pub fn select_all(&mut self, attr: Attribute) {
        if let Some(table) = &self.table {
            self.selection.select_all(table, attr);
            self.refresh();
        }
    }

    /// Deselect all values of an attribute.
    pub fn select_none(&mut self, attr: Attribute) {
        self.selection.select_none(attr);
        self.refresh();
    }

    /// Write the current filtered rows to `path`.
    pub fn export_filtered(&mut self, path: &Path) {
        let (Some(table), Some(view)) = (&self.table, &self.view) else {
            return;
        };
        match crate::data::export::export_csv(path, table, &view.indices) {
            Ok(()) => {
                log::info!("Exported {} customers to {}", view.indices.len(), path.display());
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Export failed: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CustomerRecord;

    fn state_with_table() -> AppState {
        let mut state = AppState::default();
        state.set_table(CustomerTable::from_records(
            vec![
                CustomerRecord::new(Some("18-25"), Some("F"), Some("Low"), 10.0),
                CustomerRecord::new(Some("18-25"), Some("M"), Some("High"), 20.0),
                CustomerRecord::new(Some("26-35"), Some("F"), Some("Low"), 30.0),
                CustomerRecord::new(Some("26-35"), None, Some("Low"), 40.0),
            ],
            Vec::new(),
        ));
        state
    }

    #[test]
    fn loading_a_table_applies_default_selection() {
        let state = state_with_table();
        let view = state.view.as_ref().unwrap();
        assert_eq!(view.indices, vec![0, 1, 2]);
        assert_eq!(view.metrics.total_spent, 60.0);
    }

    #[test]
    fn every_selection_change_recomputes_the_view() {
        let mut state = state_with_table();

        state.toggle_filter_value(Attribute::AgeGroup, "26-35");
        assert_eq!(state.view.as_ref().unwrap().indices, vec![0, 1]);

        state.select_none(Attribute::Gender);
        let view = state.view.as_ref().unwrap();
        assert!(view.indices.is_empty());
        assert_eq!(view.metrics.average_spent, None);

        state.select_all(Attribute::Gender);
        state.select_all(Attribute::AgeGroup);
        assert_eq!(state.view.as_ref().unwrap().indices, vec![0, 1, 2]);
    }

    #[test]
    fn failed_load_sets_status_and_keeps_previous_table() {
        let mut state = state_with_table();
        state.load_path(Path::new("does/not/exist.csv"));

        assert!(state.status_message.is_some());
        assert_eq!(state.table.as_ref().map(CustomerTable::len), Some(4));
    }

    #[test]
    fn load_completes_synchronously_and_clears_the_error() {
        let mut state = AppState::default();
        state.load_path(Path::new("missing.json"));
        assert!(state.status_message.is_some());
        assert!(state.table.is_none());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("customers.csv");
        std::fs::write(
            &path,
            "age_group,gender,income_bracket,total_spent\n18-25,F,Low,12\n",
        )
        .unwrap();
        state.load_path(&path);

        assert!(state.status_message.is_none());
        assert_eq!(state.view.as_ref().map(|v| v.indices.len()), Some(1));
    }

    #[test]
    fn export_writes_only_filtered_rows() {
        let mut state = state_with_table();
        state.toggle_filter_value(Attribute::Gender, "M");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        state.export_filtered(&path);

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(state.status_message.is_none());
    }
}
