use std::f32::consts::{FRAC_PI_2, TAU};

use eframe::egui::{self, Color32, Pos2, RichText, Sense, Shape, Stroke, Ui};
use egui_plot::{Bar, BarChart, Plot};

use crate::color::CategoryColors;
use crate::data::aggregate::GroupCounts;
use crate::format::format_count;

const CHART_HEIGHT: f32 = 260.0;

// ---------------------------------------------------------------------------
// Bar chart: one coloured bar per category
// ---------------------------------------------------------------------------

/// Render a distribution as a bar chart, most frequent category first.
pub fn bar_chart(ui: &mut Ui, counts: &GroupCounts, colors: &CategoryColors, title: &str) {
    ui.strong(title);

    let attr = counts.attribute;
    let bars: Vec<Bar> = counts
        .entries
        .iter()
        .enumerate()
        .map(|(i, (value, n))| {
            Bar::new(i as f64, *n as f64)
                .name(value)
                .fill(colors.color_for(attr, value))
                .width(0.7)
        })
        .collect();

    let labels: Vec<String> = counts.entries.iter().map(|(v, _)| v.clone()).collect();

    Plot::new(("bar_chart", attr))
        .height(CHART_HEIGHT)
        .x_axis_label(attr.label())
        .y_axis_label("Customer Count")
        .x_axis_formatter(move |mark, _range| category_tick(&labels, mark.value))
        .allow_boxed_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

/// Axis label for a bar position; blank between bars.
fn category_tick(labels: &[String], position: f64) -> String {
    let rounded = position.round();
    if (position - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    labels.get(rounded as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Donut chart
// ---------------------------------------------------------------------------

/// One wedge of the donut, angles in radians (screen coordinates).
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub label: String,
    pub count: usize,
    pub fraction: f32,
    pub start: f32,
    pub sweep: f32,
}

/// Split a full turn into wedges proportional to the counts, starting at
/// 12 o'clock and running clockwise.
pub fn donut_slices(counts: &GroupCounts) -> Vec<Slice> {
    let total = counts.total();
    if total == 0 {
        return Vec::new();
    }

    let mut start = -FRAC_PI_2;
    counts
        .entries
        .iter()
        .map(|(label, n)| {
            let fraction = *n as f32 / total as f32;
            let sweep = fraction * TAU;
            let slice = Slice {
                label: label.clone(),
                count: *n,
                fraction,
                start,
                sweep,
            };
            start += sweep;
            slice
        })
        .collect()
}

fn polar(center: Pos2, radius: f32, angle: f32) -> Pos2 {
    center + radius * egui::vec2(angle.cos(), angle.sin())
}

/// Render a distribution as a donut chart with a legend.
/// `hole` is the inner radius as a fraction of the outer one.
pub fn donut_chart(
    ui: &mut Ui,
    counts: &GroupCounts,
    colors: &CategoryColors,
    title: &str,
    hole: f32,
) {
    ui.strong(title);

    let slices = donut_slices(counts);
    if slices.is_empty() {
        ui.label("No customers match the current filters.");
        return;
    }

    let attr = counts.attribute;
    ui.horizontal(|ui: &mut Ui| {
        let (response, painter) =
            ui.allocate_painter(egui::vec2(CHART_HEIGHT, CHART_HEIGHT), Sense::hover());
        let rect = response.rect;
        let center = rect.center();
        let outer = rect.width().min(rect.height()) * 0.45;
        let inner = outer * hole.clamp(0.0, 0.95);

        for slice in &slices {
            let color = colors.color_for(attr, &slice.label);
            // Convex quads approximating the ring segment.
            let steps = ((slice.sweep / TAU) * 128.0).ceil().max(1.0) as usize;
            for s in 0..steps {
                let a0 = slice.start + slice.sweep * s as f32 / steps as f32;
                let a1 = slice.start + slice.sweep * (s + 1) as f32 / steps as f32;
                let points = vec![
                    polar(center, outer, a0),
                    polar(center, outer, a1),
                    polar(center, inner, a1),
                    polar(center, inner, a0),
                ];
                painter.add(Shape::convex_polygon(points, color, Stroke::NONE));
            }
        }

        ui.vertical(|ui: &mut Ui| {
            ui.strong(attr.label());
            for slice in &slices {
                let color: Color32 = colors.color_for(attr, &slice.label);
                ui.label(
                    RichText::new(format!(
                        "■ {}: {:.1}% ({})",
                        slice.label,
                        slice.fraction * 100.0,
                        format_count(slice.count)
                    ))
                    .color(color),
                );
            }
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Attribute;

    fn counts(entries: &[(&str, usize)]) -> GroupCounts {
        GroupCounts {
            attribute: Attribute::Gender,
            entries: entries
                .iter()
                .map(|(v, n)| (v.to_string(), *n))
                .collect(),
        }
    }

    #[test]
    fn slices_cover_a_full_turn_in_order() {
        let slices = donut_slices(&counts(&[("F", 3), ("M", 1)]));

        assert_eq!(slices.len(), 2);
        assert!((slices[0].fraction - 0.75).abs() < 1e-6);
        assert!((slices[0].start + FRAC_PI_2).abs() < 1e-6);
        assert!((slices[1].start - (slices[0].start + slices[0].sweep)).abs() < 1e-6);

        let swept: f32 = slices.iter().map(|s| s.sweep).sum();
        assert!((swept - TAU).abs() < 1e-4);
    }

    #[test]
    fn empty_counts_have_no_slices() {
        assert!(donut_slices(&counts(&[])).is_empty());
    }

    #[test]
    fn ticks_only_on_bar_positions() {
        let labels = vec!["18-25".to_string(), "26-35".to_string()];
        assert_eq!(category_tick(&labels, 0.0), "18-25");
        assert_eq!(category_tick(&labels, 1.0), "26-35");
        assert_eq!(category_tick(&labels, 0.5), "");
        assert_eq!(category_tick(&labels, 2.0), "");
        assert_eq!(category_tick(&labels, -1.0), "");
    }
}
