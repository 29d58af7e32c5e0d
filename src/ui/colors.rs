//! Terminal colors for the preview.

use ratatui::style::Color;

use callhue::color::Argb;

// ── Chrome ──────────────────────────────────────────────────────────
pub const BACKDROP: Argb = Argb(0xFF00_0000);
pub const LABEL: Color = Color::Rgb(200, 200, 200);
pub const MUTED: Color = Color::Rgb(120, 120, 120);
pub const FLAG_ON: Color = Color::Rgb(80, 220, 120);
pub const FLAG_OFF: Color = Color::Rgb(100, 100, 100);

/// Composite a translucent color over `backdrop`; terminals have no alpha.
pub fn over(color: Argb, backdrop: Argb) -> Color {
    let a = u32::from(color.alpha());
    let mix = |fg: u8, bg: u8| ((u32::from(fg) * a + u32::from(bg) * (255 - a) + 127) / 255) as u8;
    Color::Rgb(
        mix(color.red(), backdrop.red()),
        mix(color.green(), backdrop.green()),
        mix(color.blue(), backdrop.blue()),
    )
}

/// `color` as drawn on the preview's black backdrop.
pub fn terminal(color: Argb) -> Color {
    over(color, BACKDROP)
}
