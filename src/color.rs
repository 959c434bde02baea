use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::{Attribute, CustomerTable};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.65, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: category value → Color32
// ---------------------------------------------------------------------------

/// Maps the observed values of one attribute to distinct colours.
///
/// Built once per loaded table so a category keeps its colour while the
/// filters change.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    pub fn new(values: &[String]) -> Self {
        let mapping = values
            .iter()
            .cloned()
            .zip(generate_palette(values.len()))
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a category value.
    pub fn color_for(&self, value: &str) -> Color32 {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }
}

/// One [`ColorMap`] per attribute.
#[derive(Debug, Clone, Default)]
pub struct CategoryColors {
    maps: BTreeMap<Attribute, ColorMap>,
}

impl CategoryColors {
    pub fn for_table(table: &CustomerTable) -> Self {
        let maps = Attribute::ALL
            .into_iter()
            .map(|attr| (attr, ColorMap::new(table.distinct_values(attr))))
            .collect();
        Self { maps }
    }

    pub fn color_for(&self, attr: Attribute, value: &str) -> Color32 {
        self.maps
            .get(&attr)
            .map_or(Color32::GRAY, |m| m.color_for(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CustomerRecord;

    #[test]
    fn palette_colours_are_distinct() {
        let colours = generate_palette(6);
        assert_eq!(colours.len(), 6);
        for (i, a) in colours.iter().enumerate() {
            assert!(colours[i + 1..].iter().all(|b| a != b));
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn unknown_values_fall_back_to_grey() {
        let table = CustomerTable::from_records(
            vec![
                CustomerRecord::new(Some("18-25"), Some("F"), Some("Low"), 1.0),
                CustomerRecord::new(Some("26-35"), Some("M"), Some("High"), 1.0),
            ],
            Vec::new(),
        );
        let colors = CategoryColors::for_table(&table);

        let a = colors.color_for(Attribute::AgeGroup, "18-25");
        let b = colors.color_for(Attribute::AgeGroup, "26-35");
        assert_ne!(a, b);
        assert_ne!(a, Color32::GRAY);
        assert_eq!(colors.color_for(Attribute::AgeGroup, "99+"), Color32::GRAY);
        assert_eq!(CategoryColors::default().color_for(Attribute::Gender, "F"), Color32::GRAY);
    }
}
