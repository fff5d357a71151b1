use crate::value::{Dimension, Unit, parse_leading_number};

const DEFAULT_LINE_HEIGHT: f64 = 140.0;
const DEFAULT_ALIGN: &str = "center";

/// Maps weight keywords (`bold`, `semibold`, ...) to their numeric form;
/// anything else is returned as written.
pub fn normalize_font_weight(weight: &str) -> String {
    let numeric = match weight.trim() {
        "thin" => "100",
        "extralight" => "200",
        "light" => "300",
        "normal" => "400",
        "medium" => "500",
        "semibold" => "600",
        "bold" => "700",
        "extrabold" => "800",
        "black" => "900",
        other => other,
    };
    numeric.to_string()
}

/// Line height as a percentage: `%` values pass through, multipliers below 5
/// scale by 100, keywords map to fixed percentages.
pub fn parse_line_height(value: &str) -> Option<Dimension> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    let percent = |number: f64| Some(Dimension::new(number, Unit::Percent));
    let leading = parse_leading_number(value);
    if value.ends_with('%') {
        return leading.and_then(percent);
    }
    if let Some(number) = leading.filter(|n| *n > 0.0 && *n < 5.0) {
        return percent((number * 100.0).round());
    }
    let named = match value {
        "none" => Some(100.0),
        "tight" => Some(110.0),
        "snug" => Some(120.0),
        "normal" => Some(140.0),
        "relaxed" => Some(160.0),
        "loose" => Some(180.0),
        _ => None,
    };
    percent(
        named
            .or(leading.filter(|n| *n != 0.0))
            .unwrap_or(DEFAULT_LINE_HEIGHT),
    )
}

pub fn parse_text_align(value: Option<&str>) -> &'static str {
    match value.map(str::trim) {
        Some("left") => "left",
        Some("right") => "right",
        _ => DEFAULT_ALIGN,
    }
}

pub fn parse_flex_direction(value: Option<&str>) -> &'static str {
    match value.map(str::trim) {
        Some("column") => "column",
        Some("row-reverse") => "row-reverse",
        Some("column-reverse") => "column-reverse",
        _ => "row",
    }
}

pub fn parse_justify_content(value: Option<&str>) -> &'static str {
    match value.map(str::trim) {
        Some("flex-start") => "flex-start",
        Some("flex-end") => "flex-end",
        Some("space-between") => "space-between",
        Some("space-around") => "space-around",
        Some("space-evenly") => "space-evenly",
        _ => DEFAULT_ALIGN,
    }
}

pub fn parse_align_items(value: Option<&str>) -> &'static str {
    match value.map(str::trim) {
        Some("flex-start") => "flex-start",
        Some("flex-end") => "flex-end",
        Some("stretch") => "stretch",
        Some("baseline") => "baseline",
        _ => DEFAULT_ALIGN,
    }
}

/// Rewrites a font family into the quoted `"Name", fallback` form the
/// platform stores. Values already in that form are kept as they are.
pub fn normalize_font_family(family: &str) -> Option<String> {
    let font = family.trim();
    if font.is_empty() {
        return None;
    }
    if font.starts_with('"') && font.contains(',') {
        return Some(font.to_string());
    }
    let unquote = |s: &str| s.trim().trim_matches(|c| c == '"' || c == '\'').to_string();
    match font.split_once(',') {
        Some((primary, rest)) => {
            let fallback = rest
                .split(',')
                .map(unquote)
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(", ");
            let fallback = if fallback.is_empty() {
                "sans-serif".to_string()
            } else {
                fallback
            };
            Some(format!("\"{}\", {fallback}", unquote(primary)))
        }
        None => Some(format!("\"{}\", sans-serif", unquote(font))),
    }
}
