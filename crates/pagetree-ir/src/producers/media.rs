use serde_json::json;

use crate::data::{Attrs, PageNode, StyleBlock, Styled};
use crate::kinds::ElementKind;
use crate::source::{InlineStyle, SourceElement};
use crate::style::{
    apply_animation, apply_border, apply_shadow, apply_spacing, parse_background, parse_border,
    parse_border_radius, parse_shadow, parse_spacing, parse_text_align, skip_flag, split_tokens,
};
use crate::traverse::ParseContext;
use crate::value::{
    Dimension, PropertyRule, Unit, normalize_color, number, parse_leading_number, parse_px,
    parse_value_with_unit, resolve,
};

use super::new_node;

const FULL_WIDTH: Dimension = Dimension::new(100.0, Unit::Percent);
const DIVIDER_STYLES: [&str; 3] = ["solid", "dashed", "dotted"];
const DIVIDER_COLOR: &str = "#e2e8f0";

const ICON_SIZE: PropertyRule<'static> = PropertyRule::new()
    .overrides(&["data-size"])
    .inline("font-size")
    .fallback("48px");
const ICON_COLOR: PropertyRule<'static> = PropertyRule::new()
    .overrides(&["data-color"])
    .inline("color")
    .fallback("#3b82f6");
const ICON_OPACITY: PropertyRule<'static> = PropertyRule::new()
    .overrides(&["data-opacity"])
    .inline("opacity");

/// Default vertical and horizontal padding units shared by the media kinds.
fn padding_units(node: &mut PageNode) {
    node.params_mut()
        .set("padding-top--unit", "px")
        .set("padding-bottom--unit", "px")
        .set("--style-padding-horizontal--unit", "px")
        .set("--style-padding-horizontal", 0);
}

pub(super) fn image<E: SourceElement>(
    element: &E,
    cx: &mut ParseContext,
    parent_id: &str,
    index: usize,
) -> PageNode {
    let wrapper_style = element.inline_style();
    let img = element.find_tag(&["img"]);
    let img_style = img.as_ref().map(E::inline_style).unwrap_or_default();
    let src = img
        .as_ref()
        .and_then(|img| img.attribute("src"))
        .unwrap_or_default();
    let alt = img
        .as_ref()
        .and_then(|img| img.attribute("alt"))
        .unwrap_or_default();

    let width = img_style
        .get("width")
        .and_then(|width| parse_value_with_unit(width, Unit::Percent))
        .unwrap_or(FULL_WIDTH);
    let height = img_style.get("height").and_then(parse_px);
    let radius = parse_border_radius(&img_style);
    let border = parse_border(&img_style);
    let shadow = img_style.get("box-shadow").and_then(parse_shadow);

    let mut node = new_node(cx, ElementKind::Image, parent_id, index);
    let attrs = node.attrs.insert(Attrs::styled());
    attrs.set("alt", alt);
    attrs
        .style_mut()
        .set("text-align", parse_text_align(wrapper_style.get("text-align")));
    apply_animation(&mut node, element);
    node.set_param("imageUrl", json!([{ "type": "text", "innerText": src }]));
    padding_units(&mut node);
    apply_spacing(&mut node, &parse_spacing(&wrapper_style));

    let mut block = StyleBlock::styled();
    block.set_style("width", width.value_json());
    block.set_style("object-fit", img_style.get("object-fit").unwrap_or("cover"));
    block.set_attr("data-image-quality", 100);
    block.set_attr("data-skip-corners-settings", skip_flag(radius.is_some()));
    block.set_attr("data-skip-shadow-settings", skip_flag(shadow.is_some()));
    block.set_param("width--unit", width.unit.as_str());
    if let Some(height) = height {
        block.set_style_length("height", height);
    }
    if let Some(radius) = radius {
        block.set_style_length("border-radius", radius);
    }
    if !border.is_empty() {
        apply_border(&mut block, &border);
    }
    if let Some(shadow) = &shadow {
        apply_shadow(&mut block, shadow);
    }
    node.insert_selector(".elImage", block);
    node
}

pub(super) fn icon<E: SourceElement>(
    element: &E,
    cx: &mut ParseContext,
    parent_id: &str,
    index: usize,
) -> PageNode {
    let wrapper_style = element.inline_style();
    let glyph = element.find_tag(&["i"]);
    let class_name = element
        .non_empty_attribute("data-icon")
        .or_else(|| glyph.as_ref().and_then(|glyph| glyph.attribute("class")))
        .unwrap_or("fas fa-star")
        .to_string();
    let carrier = glyph.as_ref();
    let inherited = cx.inherited();

    let size = resolve(&ICON_SIZE, element, carrier, inherited, parse_px)
        .unwrap_or(Dimension::px(48.0));
    let color = resolve(&ICON_COLOR, element, carrier, inherited, normalize_color);
    let opacity = resolve(&ICON_OPACITY, element, carrier, inherited, parse_leading_number);

    let mut node = new_node(cx, ElementKind::Icon, parent_id, index);
    node.attrs = Some(Attrs::styled());
    node.params_mut();
    apply_animation(&mut node, element);

    let glyph_block = node.selector_mut(".fa_icon");
    glyph_block.set_attr("className", class_name);
    glyph_block.set_style_length("font-size", size);
    if let Some(color) = color {
        glyph_block.set_style("color", color);
    }
    if let Some(opacity) = opacity {
        glyph_block.set_style("opacity", number(opacity));
    }
    node.selector_mut(".iconElement").attrs_mut().style_mut().set(
        "text-align",
        parse_text_align(wrapper_style.get("text-align")),
    );

    apply_spacing(&mut node, &parse_spacing(&wrapper_style));
    node
}

pub(super) fn video<E: SourceElement>(
    element: &E,
    cx: &mut ParseContext,
    parent_id: &str,
    index: usize,
) -> PageNode {
    let wrapper_style = element.inline_style();
    let frame_style = element
        .find_tag(&["div"])
        .map(|frame| frame.inline_style())
        .unwrap_or_default();
    let radius = parse_border_radius(&frame_style);
    let shadow = frame_style.get("box-shadow").and_then(parse_shadow);
    let border = parse_border(&frame_style);
    let background = parse_background(&frame_style);

    let mut node = new_node(cx, ElementKind::Video, parent_id, index);
    let attrs = node.attrs.insert(Attrs::styled());
    attrs
        .set(
            "data-video-type",
            element.non_empty_attribute("data-video-type").unwrap_or("youtube"),
        )
        .set("data-skip-background-settings", skip_flag(background.color.is_some()))
        .set("data-skip-shadow-settings", skip_flag(shadow.is_some()))
        .set("data-skip-corners-settings", skip_flag(radius.is_some()));
    node.set_param(
        "video_url",
        element.attribute("data-video-url").unwrap_or_default(),
    );
    padding_units(&mut node);
    node.selectors = Some(Default::default());
    apply_spacing(&mut node, &parse_spacing(&wrapper_style));

    if let Some(radius) = radius {
        node.set_style_length("border-radius", radius);
    }
    if let Some(shadow) = &shadow {
        apply_shadow(&mut node, shadow);
    }
    if !border.is_empty() {
        apply_border(&mut node, &border);
    }
    if let Some(color) = &background.color {
        node.set_param("--style-background-color", color.as_str());
    }
    node
}

/// `border-top: <n>px <style> <color>` of a divider line.
#[derive(Debug, Clone, PartialEq)]
struct DividerLine {
    width: f64,
    style: String,
    color: String,
}

impl Default for DividerLine {
    fn default() -> Self {
        Self {
            width: 1.0,
            style: "solid".to_string(),
            color: DIVIDER_COLOR.to_string(),
        }
    }
}

fn parse_divider_line(style: &InlineStyle) -> DividerLine {
    style
        .get("border-top")
        .and_then(parse_border_top)
        .unwrap_or_default()
}

fn parse_border_top(value: &str) -> Option<DividerLine> {
    let tokens = split_tokens(value);
    let [width, kind, color @ ..] = tokens.as_slice() else {
        return None;
    };
    if color.is_empty() || !width.to_ascii_lowercase().ends_with("px") {
        return None;
    }
    let width = parse_leading_number(width)?;
    let kind = kind.to_ascii_lowercase();
    if !DIVIDER_STYLES.contains(&kind.as_str()) {
        return None;
    }
    Some(DividerLine {
        width,
        style: kind,
        color: normalize_color(&color.join(" ")).unwrap_or_else(|| DIVIDER_COLOR.to_string()),
    })
}

pub(super) fn divider<E: SourceElement>(
    element: &E,
    cx: &mut ParseContext,
    parent_id: &str,
    index: usize,
) -> PageNode {
    let wrapper_style = element.inline_style();
    let line_style = element
        .find_tag(&["div"])
        .map(|line| line.inline_style())
        .unwrap_or_default();
    let line = parse_divider_line(&line_style);
    let width = line_style
        .get("width")
        .and_then(|width| parse_value_with_unit(width, Unit::Percent))
        .unwrap_or(FULL_WIDTH);
    let shadow = line_style.get("box-shadow").and_then(parse_shadow);
    let skip_shadow = element.attribute("data-skip-shadow-settings") != Some("false");

    let mut node = new_node(cx, ElementKind::Divider, parent_id, index);
    node.attrs = Some(Attrs::styled());
    padding_units(&mut node);
    node.set_param("margin-top--unit", "px");
    apply_spacing(&mut node, &parse_spacing(&wrapper_style));

    let mut block = StyleBlock::styled();
    block.set_style("width", width.value_json());
    block.set_style("margin", line_style.get("margin").unwrap_or("0 auto"));
    block.set_attr("data-skip-shadow-settings", skip_flag(!skip_shadow));
    block
        .params_mut()
        .set("width--unit", width.unit.as_str())
        .set("--style-border-top-width", number(line.width))
        .set("--style-border-top-width--unit", "px")
        .set("--style-border-style", line.style)
        .set("--style-border-color", line.color);
    if let Some(shadow) = &shadow {
        apply_shadow(&mut block, shadow);
    }
    node.insert_selector(".elDivider", block);
    node
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn border_top_requires_px_width_and_known_style() {
        let line = parse_border_top("3px dashed rgb(181, 69, 69)").expect("line");
        assert_eq!(line.width, 3.0);
        assert_eq!(line.style, "dashed");
        assert_eq!(line.color, "rgb(181, 69, 69)");

        assert_eq!(
            parse_border_top("2PX Dotted #ffffff").map(|l| l.style),
            Some("dotted".to_string())
        );
        assert!(parse_border_top("1em solid red").is_none());
        assert!(parse_border_top("1px groove red").is_none());
        assert!(parse_border_top("1px solid").is_none());
    }

    #[test]
    fn divider_line_defaults_when_unparsable() {
        let line = parse_divider_line(&InlineStyle::parse("border-top: thin"));
        assert_eq!(line, DividerLine::default());
        assert_eq!(line.color, DIVIDER_COLOR);
    }
}
