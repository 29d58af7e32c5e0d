//! Maps an arbitrary seed color onto the nearest material palette entry.

use crate::color::Argb;

/// A primary color and the darker secondary shade paired with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterialPalette {
    pub primary: Argb,
    pub secondary: Argb,
}

// ── Material 500 / 700 pairs ────────────────────────────────────────
const PRIMARY_COLORS: [u32; 14] = [
    0xFFDB4437, 0xFFE91E63, 0xFF9C27B0, 0xFF673AB7, 0xFF3F51B5, 0xFF4285F4, 0xFF039BE5,
    0xFF0097A7, 0xFF009688, 0xFF0F9D58, 0xFF689F38, 0xFFEF6C00, 0xFFFF5722, 0xFF757575,
];

const SECONDARY_COLORS: [u32; 14] = [
    0xFFC53929, 0xFFC2185B, 0xFF7B1FA2, 0xFF512DA8, 0xFF303F9F, 0xFF3367D6, 0xFF0277BD,
    0xFF006064, 0xFF00796B, 0xFF0B8043, 0xFF33691E, 0xFFE65100, 0xFFE64A19, 0xFF424242,
];

#[derive(Debug, Clone)]
pub struct MaterialColorMap {
    entries: Vec<MaterialPalette>,
}

impl Default for MaterialColorMap {
    fn default() -> Self {
        let entries = PRIMARY_COLORS
            .iter()
            .zip(SECONDARY_COLORS.iter())
            .map(|(&p, &s)| MaterialPalette {
                primary: Argb(p),
                secondary: Argb(s),
            })
            .collect();
        Self { entries }
    }
}

impl MaterialColorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick the table entry whose hue is closest to `color`'s hue.
    /// Ties go to the earlier entry.
    pub fn calculate_primary_and_secondary(&self, color: Argb) -> MaterialPalette {
        let target = hue(color);
        let mut best = 0;
        let mut minimum = f32::MAX;
        for (i, entry) in self.entries.iter().enumerate() {
            let distance = (hue(entry.primary) - target).abs();
            if distance < minimum {
                minimum = distance;
                best = i;
            }
        }
        self.entries[best]
    }
}

/// HSV hue in `[0, 1)`. Greys (including the zero color) have hue 0.
pub fn hue(color: Argb) -> f32 {
    let (r, g, b) = (color.red() as f32, color.green() as f32, color.blue() as f32);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    if max == min {
        return 0.0;
    }
    let span = max - min;
    let cr = (max - r) / span;
    let cg = (max - g) / span;
    let cb = (max - b) / span;
    let mut h = if r == max {
        cb - cg
    } else if g == max {
        2.0 + cr - cb
    } else {
        4.0 + cg - cr
    };
    h /= 6.0;
    if h < 0.0 {
        h += 1.0;
    }
    h
}
