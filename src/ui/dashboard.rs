use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::aggregate::SummaryMetrics;
use crate::data::model::{Attribute, CustomerTable};
use crate::format::{format_count, format_currency};
use crate::state::AppState;
use crate::ui::charts;

/// Inner radius of the gender donut relative to its outer radius.
const DONUT_HOLE: f32 = 0.4;

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render metrics, charts and the filtered table.
pub fn central_panel(ui: &mut Ui, state: &AppState) {
    let (Some(table), Some(view)) = (&state.table, &state.view) else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a customer table to begin  (File → Open…)");
        });
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Customer Segmentation Dashboard");
            ui.add_space(8.0);

            ui.heading("Key Metrics");
            key_metrics(ui, &view.metrics);
            ui.add_space(12.0);

            ui.heading("Customer Segmentation Visuals");
            for attr in Attribute::ALL {
                let Some(counts) = view.counts(attr) else {
                    continue;
                };
                let title = format!("{} Distribution", attr.label());
                match attr {
                    Attribute::Gender => {
                        charts::donut_chart(ui, counts, &state.colors, &title, DONUT_HOLE)
                    }
                    _ => charts::bar_chart(ui, counts, &state.colors, &title),
                }
                ui.add_space(12.0);
            }

            ui.heading("View Data (Filtered)");
            data_table(ui, table, &view.indices);
        });
}

// ---------------------------------------------------------------------------
// Metric cards
// ---------------------------------------------------------------------------

fn key_metrics(ui: &mut Ui, metrics: &SummaryMetrics) {
    ui.columns(3, |cols| {
        metric_card(&mut cols[0], "Customers", &format_count(metrics.customers));
        metric_card(
            &mut cols[1],
            "Total Spending",
            &format_currency(Some(metrics.total_spent)),
        );
        metric_card(
            &mut cols[2],
            "Avg Order",
            &format_currency(metrics.average_spent),
        );
    });
}

fn metric_card(ui: &mut Ui, label: &str, value: &str) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_width(ui.available_width());
        ui.label(label);
        ui.label(RichText::new(value).size(24.0).strong());
    });
}

// ---------------------------------------------------------------------------
// Data table
// ---------------------------------------------------------------------------

fn data_table(ui: &mut Ui, table: &CustomerTable, indices: &[usize]) {
    let columns = &table.column_names;

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .max_scroll_height(400.0)
        .columns(Column::auto().at_least(80.0), columns.len())
        .header(20.0, |mut header| {
            for col in columns {
                header.col(|ui: &mut Ui| {
                    ui.strong(col);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, indices.len(), |mut row| {
                let idx = indices[row.index()];
                for col in columns {
                    row.col(|ui: &mut Ui| {
                        ui.label(table.cell_text(idx, col));
                    });
                }
            });
        });
}
