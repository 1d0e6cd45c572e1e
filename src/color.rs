use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Fixed chart colours
// ---------------------------------------------------------------------------

pub const HOT_PINK: Color32 = Color32::from_rgb(255, 105, 180);
pub const DEEP_PINK: Color32 = Color32::from_rgb(199, 21, 133);
pub const LIGHT_BLUE: Color32 = Color32::from_rgb(173, 216, 230);
pub const LIGHT_CORAL: Color32 = Color32::from_rgb(240, 128, 128);
pub const LIGHT_GREEN: Color32 = Color32::from_rgb(144, 238, 144);
pub const LAVENDER: Color32 = Color32::from_rgb(230, 230, 250);

fn hsl_color(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let hsl = Hsl::new(hue.rem_euclid(360.0), saturation, lightness);
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

// ---------------------------------------------------------------------------
// Continuous colour scales
// ---------------------------------------------------------------------------

/// Continuous colour scales used for value-coloured charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorScale {
    /// Diverging blue → pale grey → red.
    CoolWarm,
    /// Sequential dark purple → orange → pale yellow.
    Magma,
}

impl ColorScale {
    /// Colour at position `t` in `0.0..=1.0` (clamped).
    pub fn color_at(self, t: f64) -> Color32 {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) as f32 } else { 0.5 };
        match self {
            ColorScale::CoolWarm => {
                if t <= 0.5 {
                    let u = t / 0.5;
                    hsl_color(222.0, lerp(0.65, 0.08, u), lerp(0.55, 0.87, u))
                } else {
                    let u = (t - 0.5) / 0.5;
                    hsl_color(8.0, lerp(0.08, 0.75, u), lerp(0.87, 0.50, u))
                }
            }
            ColorScale::Magma => hsl_color(
                lerp(275.0, 395.0, t),
                lerp(0.70, 0.95, t),
                lerp(0.12, 0.72, t),
            ),
        }
    }

    /// Colour for `value` placed linearly within `min..=max`.
    /// A degenerate range maps everything to the middle of the scale.
    pub fn color_for(self, value: f64, min: f64, max: f64) -> Color32 {
        self.color_at(normalize(value, min, max))
    }
}

/// Position of `value` within `min..=max` as a fraction.
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    let range = max - min;
    if !range.is_finite() || range.abs() < f64::EPSILON {
        0.5
    } else {
        (value - min) / range
    }
}
