//! Number and color formatting shared by the normalizer and generators.

use figrule_source::Color;

/// Fallback shadow color when an effect carries none (10% black).
pub const DEFAULT_SHADOW_COLOR: &str = "rgba(0, 0, 0, 0.10)";

/// Format a number, removing `.0` for integers.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// `16.0` → `"16px"`.
pub fn px(n: f64) -> String {
    format!("{}px", format_number(n))
}

/// Parse `"16px"` back to `16.0`. Other units yield `None`.
pub fn parse_px(value: &str) -> Option<f64> {
    let digits = value.strip_suffix("px")?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    digits.parse().ok()
}

fn channel(value: f64) -> u8 {
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Serialize a color. Fully opaque colors become uppercase 6-digit hex;
/// anything translucent becomes `rgba()` with alpha at two decimals.
pub fn color_to_css(color: &Color, opacity: f64) -> String {
    let (r, g, b) = (channel(color.r), channel(color.g), channel(color.b));
    if opacity >= 1.0 && color.a >= 1.0 {
        format!("#{r:02X}{g:02X}{b:02X}")
    } else {
        format!("rgba({r}, {g}, {b}, {:.2})", color.a * opacity)
    }
}
