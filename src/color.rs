use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Mix, Srgb};

// ---------------------------------------------------------------------------
// Fold-change colour scales
// ---------------------------------------------------------------------------

/// Bars in the up-regulated chart.
pub const UP_COLOR: Color32 = Color32::from_rgb(46, 160, 67);
/// Bars in the down-regulated chart.
pub const DOWN_COLOR: Color32 = Color32::from_rgb(214, 39, 40);

fn to_color32(hsl: Hsl) -> Color32 {
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

/// Continuous purple → teal → yellow scale, similar to viridis.
#[derive(Debug, Clone, Copy)]
pub struct FoldChangeScale {
    min: f64,
    max: f64,
}

impl FoldChangeScale {
    /// Scale spanning the given fold changes.
    pub fn spanning<I: IntoIterator<Item = f64>>(values: I) -> Self {
        let (min, max) = values
            .into_iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        if min.is_finite() && max.is_finite() {
            FoldChangeScale { min, max }
        } else {
            FoldChangeScale { min: 0.0, max: 0.0 }
        }
    }

    /// Position of `value` on the scale, in `[0, 1]`.
    pub fn position(&self, value: f64) -> f32 {
        let range = self.max - self.min;
        if range.abs() < f64::EPSILON {
            return 0.5;
        }
        ((value - self.min) / range).clamp(0.0, 1.0) as f32
    }

    pub fn color_for(&self, value: f64) -> Color32 {
        let t = self.position(value);
        let low = Hsl::new(275.0, 0.60, 0.30);
        let mid = Hsl::new(175.0, 0.55, 0.40);
        let high = Hsl::new(55.0, 0.90, 0.55);
        let hsl = if t < 0.5 {
            low.mix(mid, t * 2.0)
        } else {
            mid.mix(high, (t - 0.5) * 2.0)
        };
        to_color32(hsl)
    }
}
