use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::Attribute;
use crate::state::AppState;

/// A change requested by a filter widget, applied after the frame's widgets
/// are drawn.
enum FilterAction {
    Toggle(Attribute, String),
    SelectAll(Attribute),
    SelectNone(Attribute),
}

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(table) = &state.table else {
        ui.label("No customer table loaded.");
        return;
    };

    let mut actions = Vec::new();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for attr in Attribute::ALL {
                let options = table.distinct_values(attr);

                // Show count of selected / total in the header
                let header_text = format!(
                    "Select {}  ({}/{})",
                    attr.label(),
                    state.selection.selected_count(attr),
                    options.len()
                );

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(attr)
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                actions.push(FilterAction::SelectAll(attr));
                            }
                            if ui.small_button("None").clicked() {
                                actions.push(FilterAction::SelectNone(attr));
                            }
                        });

                        for value in options {
                            let mut checked = state.selection.is_selected(attr, value);
                            let text = RichText::new(value)
                                .color(state.colors.color_for(attr, value));
                            if ui.checkbox(&mut checked, text).changed() {
                                actions.push(FilterAction::Toggle(attr, value.clone()));
                            }
                        }
                    });
            }
        });

    for action in actions {
        match action {
            FilterAction::Toggle(attr, value) => state.toggle_filter_value(attr, &value),
            FilterAction::SelectAll(attr) => state.select_all(attr),
            FilterAction::SelectNone(attr) => state.select_none(attr),
        }
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_export = state.view.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export filtered CSV…"))
                .clicked()
            {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(table), Some(view)) = (&state.table, &state.view) {
            ui.label(format!(
                "{} customers loaded, {} shown",
                table.len(),
                view.indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open customer data")
        .add_filter("Supported files", &["parquet", "pq", "json", "csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export filtered customers")
        .set_file_name("customers_filtered.csv")
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        state.export_filtered(&path);
    }
}
