use crate::data::Styled;
use crate::value::{normalize_color, number, parse_leading_number};

use super::{split_commas, split_tokens};

const DEFAULT_SHADOW_COLOR: &str = "rgba(0, 0, 0, 0.1)";

/// A single parsed box shadow, lengths in px.
#[derive(Debug, Clone, PartialEq)]
pub struct Shadow {
    pub x: f64,
    pub y: f64,
    pub blur: f64,
    pub spread: f64,
    pub color: String,
    pub inset: bool,
}

impl Shadow {
    fn preset(y: f64, blur: f64, alpha: &str) -> Self {
        Self {
            x: 0.0,
            y,
            blur,
            spread: 0.0,
            color: format!("rgba(0, 0, 0, {alpha})"),
            inset: false,
        }
    }
}

fn named_preset(value: &str) -> Option<Shadow> {
    let shadow = match value {
        "sm" | "0 1px 2px rgba(0,0,0,0.05)" => Shadow::preset(1.0, 2.0, "0.05"),
        "base" | "0 1px 3px rgba(0,0,0,0.1)" => Shadow::preset(1.0, 3.0, "0.1"),
        "md" | "0 4px 6px rgba(0,0,0,0.1)" => Shadow::preset(4.0, 6.0, "0.1"),
        "lg" | "0 10px 15px rgba(0,0,0,0.1)" => Shadow::preset(10.0, 15.0, "0.1"),
        "xl" | "0 20px 25px rgba(0,0,0,0.1)" => Shadow::preset(20.0, 25.0, "0.1"),
        "2xl" | "0 25px 50px rgba(0,0,0,0.25)" => Shadow::preset(25.0, 50.0, "0.25"),
        _ => return None,
    };
    Some(shadow)
}

/// Parses a `box-shadow` value or preset name. `none`, empty input and
/// anything without at least three lengths yield `None`. Only the first
/// shadow of a comma-separated list is kept.
pub fn parse_shadow(input: &str) -> Option<Shadow> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        return None;
    }
    let normalized = split_tokens(trimmed).join(" ");
    if let Some(preset) = named_preset(&normalized) {
        return Some(preset);
    }

    let first = split_commas(trimmed).into_iter().next()?;
    let mut inset = false;
    let mut lengths = Vec::new();
    let mut color = None;
    for token in split_tokens(first) {
        if token.eq_ignore_ascii_case("inset") {
            inset = true;
        } else if let Some(length) = parse_shadow_length(token) {
            lengths.push(length);
        } else if color.is_none() && (token.starts_with("rgb") || token.starts_with('#')) {
            color = normalize_color(token);
        }
    }
    if lengths.len() < 3 {
        return None;
    }
    Some(Shadow {
        x: lengths[0],
        y: lengths[1],
        blur: lengths[2],
        spread: lengths.get(3).copied().unwrap_or(0.0),
        color: color.unwrap_or_else(|| DEFAULT_SHADOW_COLOR.to_string()),
        inset,
    })
}

fn parse_shadow_length(token: &str) -> Option<f64> {
    let number_part = token.strip_suffix("px").unwrap_or(token);
    let value = parse_leading_number(number_part)?;
    let is_plain_number = number_part
        .trim_start_matches('-')
        .chars()
        .all(|c| c.is_ascii_digit() || c == '.');
    is_plain_number.then_some(value)
}

/// Writes the `--style-box-shadow-*` params.
pub fn apply_shadow(target: &mut impl Styled, shadow: &Shadow) {
    let params = target.params_mut();
    params
        .set("--style-box-shadow-distance-x", number(shadow.x))
        .set("--style-box-shadow-distance-y", number(shadow.y))
        .set("--style-box-shadow-blur", number(shadow.blur))
        .set("--style-box-shadow-spread", number(shadow.spread))
        .set("--style-box-shadow-color", shadow.color.clone())
        .set("--style-box-shadow-distance-x--unit", "px")
        .set("--style-box-shadow-distance-y--unit", "px")
        .set("--style-box-shadow-blur--unit", "px")
        .set("--style-box-shadow-spread--unit", "px");
    if shadow.inset {
        params.set("--style-box-shadow-style-type", "inset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::PageNode;
    use serde_json::json;

    #[test]
    fn recognises_presets_by_name_and_value() {
        let by_name = parse_shadow("md").expect("preset");
        let by_value = parse_shadow("0  4px 6px rgba(0,0,0,0.1)").expect("preset");
        assert_eq!(by_name, by_value);
        assert_eq!(by_name.color, "rgba(0, 0, 0, 0.1)");
        assert_eq!(parse_shadow("none"), None);
        assert_eq!(parse_shadow(""), None);
    }

    #[test]
    fn parses_custom_shadow_with_inset() {
        let shadow = parse_shadow("inset 2px -3px 8px 1px #000").expect("shadow");
        assert!(shadow.inset);
        assert_eq!((shadow.x, shadow.y, shadow.blur, shadow.spread), (2.0, -3.0, 8.0, 1.0));
        assert_eq!(shadow.color, "rgb(0, 0, 0)");
    }

    #[test]
    fn defaults_missing_spread_and_color() {
        let shadow = parse_shadow("0 2px 4px").expect("shadow");
        assert_eq!(shadow.spread, 0.0);
        assert_eq!(shadow.color, DEFAULT_SHADOW_COLOR);
        assert!(!shadow.inset);
        assert_eq!(parse_shadow("2px 4px"), None);
        assert_eq!(parse_shadow("huge"), None);
    }

    #[test]
    fn writes_shadow_params() {
        let mut node = PageNode::inline("Image/V2");
        apply_shadow(&mut node, &parse_shadow("inset 0 1px 2px red").expect("shadow"));
        assert_eq!(node.param("--style-box-shadow-distance-y"), Some(&json!(1)));
        assert_eq!(node.param("--style-box-shadow-blur--unit"), Some(&json!("px")));
        assert_eq!(node.param("--style-box-shadow-style-type"), Some(&json!("inset")));
        assert_eq!(
            node.param("--style-box-shadow-color"),
            Some(&json!(DEFAULT_SHADOW_COLOR))
        );
    }
}
