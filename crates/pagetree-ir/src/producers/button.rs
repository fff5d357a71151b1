use crate::data::{PageNode, StyleBlock, Styled};
use crate::kinds::ElementKind;
use crate::order::key_for;
use crate::source::SourceElement;
use crate::style::{
    apply_animation, apply_spacing, normalize_font_weight, parse_border_radius, parse_spacing,
    parse_text_align,
};
use crate::styleguide::{ButtonColors, ButtonStyle};
use crate::traverse::ParseContext;
use crate::value::{Dimension, PropertyRule, normalize_color, parse_px, resolve};

use super::new_node;

const DEFAULT_SUBTEXT_COLOR: &str = "rgba(255, 255, 255, 0.8)";

const BACKGROUND: PropertyRule<'static> = PropertyRule::new()
    .overrides(&["data-bg"])
    .inline("background-color")
    .fallback("#3b82f6");
const TEXT_COLOR: PropertyRule<'static> = PropertyRule::new()
    .overrides(&["data-color"])
    .inline("color")
    .fallback("#ffffff");
const FONT_SIZE: PropertyRule<'static> = PropertyRule::new()
    .overrides(&["data-size"])
    .inline("font-size")
    .fallback("20px");
const FONT_WEIGHT: PropertyRule<'static> = PropertyRule::new()
    .inline("font-weight")
    .fallback("700");
const PADDING_X: PropertyRule<'static> = PropertyRule::new()
    .overrides(&["data-px"])
    .inline("padding-right")
    .fallback("32px");
const PADDING_Y: PropertyRule<'static> = PropertyRule::new()
    .overrides(&["data-py"])
    .inline("padding-top")
    .fallback("16px");
const BORDER_COLOR: PropertyRule<'static> = PropertyRule::new()
    .overrides(&["data-border-color"])
    .inline("border-color")
    .fallback("transparent");
const BORDER_WIDTH: PropertyRule<'static> = PropertyRule::new()
    .overrides(&["data-border-width"])
    .inline("border-width")
    .fallback("0");

/// Resolved look of the clickable `.elButton` box.
struct ButtonLook {
    background: String,
    text_color: String,
    hover: Option<ButtonColors>,
    radius: Option<Dimension>,
    border_color: String,
    border_width: Dimension,
}

pub(super) fn button<E: SourceElement>(
    element: &E,
    cx: &mut ParseContext,
    parent_id: &str,
    index: usize,
) -> PageNode {
    let wrapper_style = element.inline_style();
    let guide_ref = element.non_empty_attribute("data-style-guide-button");
    let guide_button = guide_ref.and_then(|id| cx.styleguide().and_then(|guide| guide.button(id)));
    let anchor = element.find_tag(&["a"]);
    let text_span = anchor.as_ref().and_then(|a| a.find_tag(&["span"]));

    let look = resolve_look(element, anchor.as_ref(), text_span.as_ref(), guide_button, cx);
    let inherited = cx.inherited();
    let span_or_self = text_span.as_ref().or(anchor.as_ref()).unwrap_or(element);
    let anchor_or_self = anchor.as_ref().unwrap_or(element);
    let font_size = resolve(&FONT_SIZE, element, Some(span_or_self), inherited, parse_px)
        .unwrap_or(Dimension::px(20.0));
    let font_weight = element
        .non_empty_attribute("data-weight")
        .map(str::to_string)
        .or_else(|| {
            resolve(&FONT_WEIGHT, element, Some(span_or_self), inherited, |w| {
                Some(normalize_font_weight(w))
            })
        })
        .unwrap_or_else(|| "700".to_string());
    let padding_x = resolve(&PADDING_X, element, Some(anchor_or_self), inherited, parse_px)
        .unwrap_or(Dimension::px(32.0));
    let padding_y = resolve(&PADDING_Y, element, Some(anchor_or_self), inherited, parse_px)
        .unwrap_or(Dimension::px(16.0));

    let text_align = element
        .non_empty_attribute("data-align")
        .map(str::to_string)
        .unwrap_or_else(|| parse_text_align(wrapper_style.get("text-align")).to_string());
    let main_text = text_span
        .as_ref()
        .map(|span| span.text_content().trim().to_string())
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| "Button".to_string());
    let sub_text = element
        .non_empty_attribute("data-subtext")
        .map(str::to_string)
        .or_else(|| anchor.as_ref().and_then(trailing_span_text))
        .filter(|text| !text.is_empty());

    let mut node = new_node(cx, ElementKind::Button, parent_id, index);
    node.set_style("text-align", text_align);
    apply_animation(&mut node, element);
    node.params_mut()
        .set("buttonState", "default")
        .set("href", element.non_empty_attribute("data-href").unwrap_or("#"))
        .set("target", element.non_empty_attribute("data-target").unwrap_or("_self"));
    apply_spacing(&mut node, &parse_spacing(&wrapper_style));
    if let Some(show) = element.non_empty_attribute("data-show-ids") {
        node.set_param("showIds", show);
    }
    if let Some(hide) = element.non_empty_attribute("data-hide-ids") {
        node.set_param("hideIds", hide);
    }
    if let Some(kind) = element.non_empty_attribute("data-elbuttontype") {
        node.set_attr("data-elbuttontype", kind);
    }

    let mut button_block = StyleBlock::styled();
    button_block.set_param_length("--style-padding-horizontal", padding_x);
    button_block.set_param_length("--style-padding-vertical", padding_y);
    button_block.set_param("style-guide-override-button", true);
    button_block.set_param("--style-background-color", look.background.as_str());
    button_block.set_param("--style-border-color", look.border_color.as_str());
    button_block.set_param_length("--style-border-width", look.border_width);
    if let Some(guide_ref) = guide_ref {
        button_block.set_attr("data-style-guide-button", guide_ref);
    }
    if let Some(radius) = look.radius {
        button_block.set_style_length("border-radius", radius);
    }
    if element.attribute("data-full-width") == Some("true") {
        button_block.set_style("width", "100%");
    }
    node.insert_selector(".elButton", button_block);

    let mut text_block = StyleBlock::styled();
    text_block.set_style("color", look.text_color.as_str());
    text_block.set_style("font-weight", font_weight);
    text_block.set_style_length("font-size", font_size);
    text_block.set_param("line-height--unit", "%");
    node.insert_selector(".elButton .elButtonText", text_block);

    let mut sub_block = StyleBlock::styled();
    sub_block.set_param("font-size--unit", "px");
    if sub_text.is_some() {
        let color = element
            .non_empty_attribute("data-subtext-color")
            .and_then(normalize_color)
            .unwrap_or_else(|| DEFAULT_SUBTEXT_COLOR.to_string());
        sub_block.set_style("color", color);
    }
    node.insert_selector(".elButton .elButtonSub", sub_block);

    node.insert_selector(".fa_prepended", icon_margin_block(0, 10));
    node.insert_selector(".fa_apended", icon_margin_block(10, 0));
    apply_icons(&mut node, element, anchor.as_ref());

    if let Some(hover) = &look.hover {
        if let Some(bg) = hover.bg.as_deref().and_then(normalize_color) {
            let mut block = StyleBlock::styled();
            block.set_param("--style-background-color", bg);
            node.insert_selector(".elButton:hover", block);
        }
        if let Some(color) = hover.color.as_deref().and_then(normalize_color) {
            let mut block = StyleBlock::new();
            block.set_style("color", color);
            node.insert_selector(".elButton:hover .elButtonText", block);
        }
    }

    let id = node.id().to_string();
    let main = PageNode::structural("text", cx.next_id(), id.as_str(), key_for(0))
        .with_text(main_text)
        .with_slot("button-main");
    node.push_child(main);
    if let Some(sub_text) = sub_text {
        let sub = PageNode::structural("text", cx.next_id(), id.as_str(), key_for(1))
            .with_text(sub_text)
            .with_slot("button-sub");
        node.push_child(sub);
    }
    node
}

/// Styleguide button first, then the `data-*` override, then the anchor's
/// inline style, then the default.
fn resolve_look<E: SourceElement>(
    element: &E,
    anchor: Option<&E>,
    text_span: Option<&E>,
    guide: Option<&ButtonStyle>,
    cx: &ParseContext,
) -> ButtonLook {
    let inherited = cx.inherited();
    let regular = guide.and_then(|button| button.regular.as_ref());
    let anchor_or_self = anchor.unwrap_or(element);
    let span_or_self = text_span.or(anchor).unwrap_or(element);

    let background = regular
        .and_then(|colors| colors.bg.as_deref())
        .and_then(normalize_color)
        .or_else(|| resolve(&BACKGROUND, element, Some(anchor_or_self), inherited, normalize_color))
        .unwrap_or_default();
    let text_color = regular
        .and_then(|colors| colors.color.as_deref())
        .and_then(normalize_color)
        .or_else(|| resolve(&TEXT_COLOR, element, Some(span_or_self), inherited, normalize_color))
        .unwrap_or_default();
    let radius = guide
        .and_then(|button| button.border_radius)
        .map(Dimension::px)
        .or_else(|| element.non_empty_attribute("data-rounded").and_then(parse_px))
        .or_else(|| parse_border_radius(&anchor_or_self.inline_style()));
    let border_color = guide
        .and_then(|button| button.border_color.as_deref())
        .and_then(normalize_color)
        .or_else(|| {
            resolve(&BORDER_COLOR, element, Some(anchor_or_self), inherited, normalize_color)
        })
        .unwrap_or_default();
    let border_width = guide
        .and_then(|button| button.border_width)
        .map(Dimension::px)
        .or_else(|| resolve(&BORDER_WIDTH, element, Some(anchor_or_self), inherited, parse_px))
        .unwrap_or(Dimension::px(0.0));

    ButtonLook {
        background,
        text_color,
        hover: guide.and_then(|button| button.hover.clone()),
        radius,
        border_color,
        border_width,
    }
}

/// Text of the first `span` in the anchor that closes a run of siblings
/// (last child, not the only one).
fn trailing_span_text<E: SourceElement>(anchor: &E) -> Option<String> {
    trailing_span(anchor).map(|span| span.text_content().trim().to_string())
}

fn trailing_span<E: SourceElement>(parent: &E) -> Option<E> {
    let children = parent.children();
    let last = children.len().saturating_sub(1);
    for (position, child) in children.iter().enumerate() {
        if child.tag_name() == "span" && position > 0 && position == last {
            return Some(child.clone());
        }
        if let Some(found) = trailing_span(child) {
            return Some(found);
        }
    }
    None
}

fn icon_margin_block(left: i64, right: i64) -> StyleBlock {
    let mut block = StyleBlock::styled();
    block.set_style_length("margin-left", Dimension::px(left as f64));
    block.set_style_length("margin-right", Dimension::px(right as f64));
    block
}

/// `data-icon` wins; otherwise icons are read from `<i>` tags at either end
/// of a span inside the anchor.
fn apply_icons<E: SourceElement>(node: &mut PageNode, element: &E, anchor: Option<&E>) {
    if let Some(icon) = element.non_empty_attribute("data-icon") {
        let color = element
            .non_empty_attribute("data-icon-color")
            .and_then(normalize_color);
        let (param, selector) = match element.non_empty_attribute("data-icon-position") {
            None | Some("left") => ("iconBefore", ".fa_prepended"),
            Some(_) => ("iconAfter", ".fa_apended"),
        };
        node.set_param(param, icon);
        if let Some(color) = color {
            node.selector_mut(selector).set_style("color", color);
        }
        return;
    }
    let Some(anchor) = anchor else {
        return;
    };
    let spans = anchor.find_descendants(&|el: &E| el.tag_name() == "span");
    let first_icon = spans.iter().find_map(|span| {
        span.children()
            .into_iter()
            .next()
            .filter(|child| child.tag_name() == "i")
    });
    let last_icon = spans.iter().find_map(|span| {
        span.children()
            .into_iter()
            .last()
            .filter(|child| child.tag_name() == "i")
    });
    for (icon, param, selector) in [
        (first_icon, "iconBefore", ".fa_prepended"),
        (last_icon, "iconAfter", ".fa_apended"),
    ] {
        let Some(icon) = icon else {
            continue;
        };
        node.set_param(param, icon.attribute("class").unwrap_or_default());
        if let Some(color) = icon.inline_style().get("color").and_then(normalize_color) {
            node.selector_mut(selector).set_style("color", color);
        }
    }
}
