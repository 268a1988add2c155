use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::PerformanceLabel;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours with hues spread over `span`
/// degrees starting at `start`.
pub fn generate_palette(n: usize, start: f32, span: f32) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    let step = if n > 1 { span / (n - 1) as f32 } else { 0.0 };
    (0..n)
        .map(|i| {
            let hue = start + i as f32 * step;
            let hsl = Hsl::new(hue, 0.70, 0.50);
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
// Label colours
// ---------------------------------------------------------------------------

/// One colour per performance band, green for the best down to red.
#[derive(Debug, Clone)]
pub struct LabelColors {
    colors: Vec<Color32>,
}

impl Default for LabelColors {
    fn default() -> Self {
        // 140° (green) → 0° (red)
        Self {
            colors: generate_palette(PerformanceLabel::ALL.len(), 140.0, -140.0),
        }
    }
}

impl LabelColors {
    pub fn color_for(&self, label: PerformanceLabel) -> Color32 {
        self.colors
            .get(label.index())
            .copied()
            .unwrap_or(Color32::GRAY)
    }

    /// Legend entries (label text → colour) for the UI.
    pub fn legend_entries(&self) -> Vec<(String, Color32)> {
        PerformanceLabel::ALL
            .iter()
            .map(|label| (label.to_string(), self.color_for(*label)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_label_gets_a_distinct_colour() {
        let colors = LabelColors::default();
        let entries = colors.legend_entries();
        assert_eq!(entries.len(), 5);
        for (i, (_, a)) in entries.iter().enumerate() {
            for (_, b) in &entries[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn palette_edge_cases() {
        assert!(generate_palette(0, 0.0, 360.0).is_empty());
        assert_eq!(generate_palette(1, 0.0, 360.0).len(), 1);
    }
}
