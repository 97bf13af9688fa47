use palette::{LinSrgb, Mix, Srgb};
use plotters::style::RGBColor;

// ---------------------------------------------------------------------------
// Colour map: power value → RGBColor
// ---------------------------------------------------------------------------

/// Anchor colours of the viridis map, evenly spaced from low to high.
const VIRIDIS: [(u8, u8, u8); 9] = [
    (0x44, 0x01, 0x54),
    (0x48, 0x28, 0x78),
    (0x3e, 0x49, 0x89),
    (0x31, 0x68, 0x8e),
    (0x26, 0x82, 0x8e),
    (0x1f, 0x9e, 0x89),
    (0x35, 0xb7, 0x79),
    (0x6e, 0xce, 0x58),
    (0xfd, 0xe7, 0x25),
];

/// Continuous colour map interpolated in linear RGB between evenly spaced
/// anchor colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    stops: Vec<LinSrgb>,
}

impl Default for ColorMap {
    fn default() -> Self {
        ColorMap::viridis()
    }
}

impl ColorMap {
    pub fn viridis() -> Self {
        ColorMap::from_anchors(&VIRIDIS)
    }

    /// Build a map from sRGB anchors; at least one anchor is required.
    pub fn from_anchors(anchors: &[(u8, u8, u8)]) -> Self {
        let stops = anchors
            .iter()
            .map(|&(r, g, b)| Srgb::new(r, g, b).into_format::<f32>().into_linear())
            .collect();
        ColorMap { stops }
    }

    /// Colour at position `t` in `[0, 1]` (clamped).
    pub fn sample(&self, t: f64) -> RGBColor {
        let Some(last) = self.stops.len().checked_sub(1) else {
            return RGBColor(0, 0, 0);
        };
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let scaled = t as f32 * last as f32;
        let lower = (scaled.floor() as usize).min(last);
        let upper = (lower + 1).min(last);
        let mixed = self.stops[lower].mix(self.stops[upper], scaled - lower as f32);

        let rgb: Srgb<u8> = Srgb::<f32>::from_linear(mixed).into_format();
        RGBColor(rgb.red, rgb.green, rgb.blue)
    }

    /// Colour for `value` with `range` mapped onto the full map. Values
    /// outside the range saturate at the ends.
    pub fn color_for(&self, value: f64, range: (f64, f64)) -> RGBColor {
        let (min, max) = range;
        let span = max - min;
        if span <= 0.0 || !span.is_finite() {
            return self.sample(0.0);
        }
        self.sample((value - min) / span)
    }
}
