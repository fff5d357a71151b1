use std::str::FromStr;

use csscolorparser::Color as CssColor;

/// Normalizes a color to the form the target platform stores.
///
/// Hex colors become `rgb(r, g, b)` (or `rgba(r, g, b, a)` when the hex
/// carries alpha); `rgb(...)`/`rgba(...)` strings and named colors pass
/// through untouched. Empty input and malformed hex yield `None`.
pub fn normalize_color(input: &str) -> Option<String> {
    let color = input.trim();
    if color.is_empty() {
        return None;
    }
    if color.starts_with("rgb") {
        return Some(color.to_string());
    }
    if color.starts_with('#') {
        return hex_to_rgb(color);
    }
    Some(color.to_string())
}

/// Converts `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa` into functional notation.
pub fn hex_to_rgb(hex: &str) -> Option<String> {
    let digits = hex.trim().trim_start_matches('#');
    if !matches!(digits.len(), 3 | 4 | 6 | 8) || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let parsed = CssColor::from_str(&format!("#{digits}")).ok()?;
    let r = (parsed.r * 255.0).round().clamp(0.0, 255.0) as u8;
    let g = (parsed.g * 255.0).round().clamp(0.0, 255.0) as u8;
    let b = (parsed.b * 255.0).round().clamp(0.0, 255.0) as u8;
    if matches!(digits.len(), 4 | 8) {
        Some(format!("rgba({r}, {g}, {b}, {:.2})", parsed.a))
    } else {
        Some(format!("rgb({r}, {g}, {b})"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_shorthand_matches_functional_form() {
        assert_eq!(normalize_color("#fff").as_deref(), Some("rgb(255, 255, 255)"));
        assert_eq!(
            normalize_color("#fff"),
            normalize_color("rgb(255, 255, 255)")
        );
        assert_eq!(normalize_color("#112233").as_deref(), Some("rgb(17, 34, 51)"));
    }

    #[test]
    fn alpha_hex_becomes_rgba() {
        assert_eq!(
            normalize_color("#00000080").as_deref(),
            Some("rgba(0, 0, 0, 0.50)")
        );
        assert_eq!(
            normalize_color("#000f").as_deref(),
            Some("rgba(0, 0, 0, 1.00)")
        );
    }

    #[test]
    fn normalization_is_idempotent() {
        for input in ["#3b82f6", "#fff", "rgba(0, 0, 0, 0.1)", "red", "#11223344"] {
            let once = normalize_color(input);
            let twice = once.as_deref().and_then(normalize_color);
            assert_eq!(once, twice, "input {input}");
        }
    }

    #[test]
    fn invalid_input_yields_none() {
        assert_eq!(normalize_color(""), None);
        assert_eq!(normalize_color("  "), None);
        assert_eq!(normalize_color("#zzzzzz"), None);
        assert_eq!(normalize_color("#12345"), None);
        assert_eq!(normalize_color("tomato").as_deref(), Some("tomato"));
    }
}
