use crate::data::Styled;
use crate::source::InlineStyle;
use crate::value::{Dimension, normalize_color, parse_px};

use super::split_tokens;

const BORDER_STYLES: [&str; 4] = ["solid", "dashed", "dotted", "none"];
const CORNERS: [&str; 4] = [
    "border-top-left-radius",
    "border-top-right-radius",
    "border-bottom-left-radius",
    "border-bottom-right-radius",
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Border {
    pub width: Option<Dimension>,
    pub style: Option<String>,
    pub color: Option<String>,
}

impl Border {
    pub fn is_empty(&self) -> bool {
        self.width.is_none() && self.style.is_none() && self.color.is_none()
    }
}

/// Reads the `border` shorthand, then lets `border-width`, `border-style` and
/// `border-color` override its parts.
pub fn parse_border(style: &InlineStyle) -> Border {
    let mut border = Border::default();
    if let Some(shorthand) = style.get("border") {
        for part in split_tokens(shorthand) {
            if part.starts_with(|c: char| c.is_ascii_digit()) {
                border.width = parse_px(part);
            } else if BORDER_STYLES.contains(&part) {
                border.style = Some(part.to_string());
            } else {
                border.color = normalize_color(part);
            }
        }
    }
    if let Some(width) = style.get("border-width") {
        border.width = parse_px(width);
    }
    if let Some(kind) = style.get("border-style") {
        border.style = Some(kind.to_string());
    }
    if let Some(color) = style.get("border-color") {
        border.color = normalize_color(color);
    }
    border
}

/// Writes `--style-border-*` params for whichever parts are present.
pub fn apply_border(target: &mut impl Styled, border: &Border) {
    if let Some(width) = border.width {
        target.set_param_length("--style-border-width", width);
    }
    if let Some(kind) = &border.style {
        target.set_param("--style-border-style", kind.as_str());
    }
    if let Some(color) = &border.color {
        target.set_param("--style-border-color", color.as_str());
    }
}

pub fn parse_border_radius(style: &InlineStyle) -> Option<Dimension> {
    style.get("border-radius").and_then(parse_px)
}

/// Applies `border-radius`, and with `separate` also each corner radius and
/// the `separate-corners` flag.
pub fn apply_corners(
    target: &mut impl Styled,
    style: &InlineStyle,
    separate: bool,
    radius: Option<Dimension>,
) {
    if separate {
        target.set_param("separate-corners", true);
        for corner in CORNERS {
            if let Some(value) = style.get(corner).and_then(parse_px) {
                target.set_style_length(corner, value);
            }
        }
    }
    if let Some(radius) = radius {
        target.set_style_length("border-radius", radius);
    }
}

/// Vertical padding, horizontal padding and top margin.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Spacing {
    pub padding_top: Option<Dimension>,
    pub padding_bottom: Option<Dimension>,
    pub padding_horizontal: Option<Dimension>,
    pub margin_top: Option<Dimension>,
}

impl Spacing {
    /// Fills every missing side with `0px`.
    pub fn with_defaults(self) -> Self {
        let zero = Some(Dimension::px(0.0));
        Self {
            padding_top: self.padding_top.or(zero),
            padding_bottom: self.padding_bottom.or(zero),
            padding_horizontal: self.padding_horizontal.or(zero),
            margin_top: self.margin_top.or(zero),
        }
    }
}

pub fn parse_spacing(style: &InlineStyle) -> Spacing {
    Spacing {
        padding_top: style.get("padding-top").and_then(parse_px),
        padding_bottom: style.get("padding-bottom").and_then(parse_px),
        padding_horizontal: style
            .get("padding-left")
            .or_else(|| style.get("padding-right"))
            .and_then(parse_px),
        margin_top: style.get("margin-top").and_then(parse_px),
    }
}

pub fn apply_spacing(target: &mut impl Styled, spacing: &Spacing) {
    if let Some(top) = spacing.padding_top {
        target.set_style_length("padding-top", top);
    }
    if let Some(bottom) = spacing.padding_bottom {
        target.set_style_length("padding-bottom", bottom);
    }
    if let Some(horizontal) = spacing.padding_horizontal {
        target.set_param_length("--style-padding-horizontal", horizontal);
    }
    if let Some(margin) = spacing.margin_top {
        target.set_style_length("margin-top", margin);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Background {
    pub color: Option<String>,
    pub image_url: Option<String>,
    pub gradient: Option<String>,
}

impl Background {
    pub fn is_set(&self) -> bool {
        self.color.is_some() || self.image_url.is_some() || self.gradient.is_some()
    }
}

pub fn parse_background(style: &InlineStyle) -> Background {
    let mut background = Background::default();
    if let Some(color) = style.get("background-color") {
        background.color = normalize_color(color);
    }
    if let Some(shorthand) = style.get("background") {
        if shorthand.contains("gradient") {
            background.gradient = Some(shorthand.to_string());
        } else if let Some(url) = extract_url(shorthand) {
            background.image_url = Some(url);
        } else {
            background.color = normalize_color(shorthand);
        }
    }
    if let Some(url) = style.get("background-image").and_then(extract_url) {
        background.image_url = Some(url);
    }
    background
}

fn extract_url(value: &str) -> Option<String> {
    let start = value.find("url(")? + "url(".len();
    let rest = &value[start..];
    let end = rest.find(')')?;
    let url = rest[..end]
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim();
    (!url.is_empty()).then(|| url.to_string())
}

/// Writes background params. A gradient wins over a flat color, and the
/// image url key is always present (empty when there is no image).
pub fn apply_background(target: &mut impl Styled, background: &Background) {
    if let Some(fill) = background.gradient.as_ref().or(background.color.as_ref()) {
        target.set_param("--style-background-color", fill.as_str());
    }
    target.set_param(
        "--style-background-image-url",
        background.image_url.clone().unwrap_or_default(),
    );
}

/// Value for the platform's `data-skip-*-settings` attributes: `"false"`
/// when the setting is present.
pub fn skip_flag(present: bool) -> &'static str {
    if present { "false" } else { "true" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::PageNode;
    use crate::value::Unit;
    use serde_json::json;

    #[test]
    fn longhands_override_border_shorthand() {
        let style = InlineStyle::parse(
            "border: 2px dashed rgb(1, 2, 3); border-color: #fff; border-width: 3px",
        );
        let border = parse_border(&style);
        assert_eq!(border.width, Some(Dimension::px(3.0)));
        assert_eq!(border.style.as_deref(), Some("dashed"));
        assert_eq!(border.color.as_deref(), Some("rgb(255, 255, 255)"));

        let mut node = PageNode::inline("SectionContainer/V1");
        apply_border(&mut node, &border);
        assert_eq!(node.param("--style-border-width"), Some(&json!(3)));
        assert_eq!(node.param("--style-border-width--unit"), Some(&json!("px")));
        assert_eq!(node.param("--style-border-style"), Some(&json!("dashed")));
    }

    #[test]
    fn border_shorthand_keeps_functional_colors_whole() {
        let border = parse_border(&InlineStyle::parse("border: 1px solid rgba(0, 0, 0, 0.2)"));
        assert_eq!(border.color.as_deref(), Some("rgba(0, 0, 0, 0.2)"));
        assert!(parse_border(&InlineStyle::default()).is_empty());
    }

    #[test]
    fn spacing_defaults_to_zero() {
        let style = InlineStyle::parse("padding-top: 1em; padding-right: 12px");
        let spacing = parse_spacing(&style).with_defaults();
        let mut node = PageNode::inline("RowContainer/V1");
        apply_spacing(&mut node, &spacing);
        assert_eq!(node.style_value("padding-top"), Some(&json!(1)));
        assert_eq!(node.param("padding-top--unit"), Some(&json!("em")));
        assert_eq!(node.style_value("padding-bottom"), Some(&json!(0)));
        assert_eq!(node.param("--style-padding-horizontal"), Some(&json!(12)));
        assert_eq!(node.style_value("margin-top"), Some(&json!(0)));
        assert_eq!(node.param("margin-top--unit"), Some(&json!(Unit::Px.as_str())));
    }

    #[test]
    fn gradients_win_and_image_url_is_always_written() {
        let style = InlineStyle::parse(
            "background-color: #000; background: linear-gradient(180deg, #6366f1 0%, #a855f7 100%)",
        );
        let background = parse_background(&style);
        let mut node = PageNode::inline("SectionContainer/V1");
        apply_background(&mut node, &background);
        assert_eq!(
            node.param_str("--style-background-color"),
            Some("linear-gradient(180deg, #6366f1 0%, #a855f7 100%)")
        );
        assert_eq!(node.param_str("--style-background-image-url"), Some(""));
    }

    #[test]
    fn extracts_background_image_urls() {
        let style = InlineStyle::parse("background-image: url('https://cdn.test/hero.jpg')");
        let background = parse_background(&style);
        assert_eq!(background.image_url.as_deref(), Some("https://cdn.test/hero.jpg"));
        assert!(background.is_set());
        assert_eq!(skip_flag(background.is_set()), "false");
    }

    #[test]
    fn separate_corners_write_each_radius() {
        let style = InlineStyle::parse("border-radius: 8px; border-top-left-radius: 2px");
        let mut node = PageNode::inline("RowContainer/V1");
        apply_corners(&mut node, &style, true, parse_border_radius(&style));
        assert_eq!(node.param("separate-corners"), Some(&json!(true)));
        assert_eq!(node.style_value("border-top-left-radius"), Some(&json!(2)));
        assert_eq!(node.style_value("border-radius"), Some(&json!(8)));
        assert!(node.style_value("border-bottom-right-radius").is_none());
    }
}
