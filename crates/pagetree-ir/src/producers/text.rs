use crate::data::{Attrs, PageNode, StyleBlock, Styled};
use crate::kinds::ElementKind;
use crate::order::key_for;
use crate::source::SourceElement;
use crate::style::{
    apply_animation, apply_spacing, normalize_font_family, normalize_font_weight,
    parse_line_height, parse_spacing, parse_text_align,
};
use crate::traverse::{INHERITED_COLOR, ParseContext};
use crate::value::{
    Dimension, PropertyRule, Unit, normalize_color, parse_px, parse_value_with_unit, resolve,
};

use super::{copy_element_anchor, new_node};
use super::rich_text::rich_text;

const TEXT_TAGS: [&str; 8] = ["h1", "h2", "h3", "h4", "h5", "h6", "p", "span"];

const FONT_SIZE: PropertyRule<'static> = PropertyRule::new()
    .overrides(&["data-size-resolved", "data-size"])
    .inline("font-size")
    .fallback("48px");
const FONT_WEIGHT: PropertyRule<'static> = PropertyRule::new()
    .overrides(&["data-weight"])
    .inline("font-weight")
    .fallback("normal");
const FONT_FAMILY: PropertyRule<'static> = PropertyRule::new()
    .overrides(&["data-font"])
    .inline("font-family");
const COLOR: PropertyRule<'static> = PropertyRule::new()
    .overrides(&["data-color"])
    .inline("color")
    .inherited(INHERITED_COLOR)
    .fallback("#000000");
const ALIGN: PropertyRule<'static> = PropertyRule::new().overrides(&["data-align"]);
const LINE_HEIGHT: PropertyRule<'static> = PropertyRule::new()
    .overrides(&["data-leading"])
    .inline("line-height");
const LETTER_SPACING: PropertyRule<'static> = PropertyRule::new()
    .overrides(&["data-tracking"])
    .inline("letter-spacing");
const TRANSFORM: PropertyRule<'static> = PropertyRule::new()
    .overrides(&["data-transform"])
    .inline("text-transform");

/// Selector the platform styles each text kind under.
fn typography_selector(kind: ElementKind) -> &'static str {
    match kind {
        ElementKind::SubHeadline => ".elSubheadline",
        ElementKind::Paragraph => ".elParagraph",
        _ => ".elHeadline",
    }
}

/// Headline, sub-headline and paragraph. Typography lands in the kind's
/// selector block; the copy becomes a `ContentEditableNode` of inline nodes.
pub(super) fn text_block<E: SourceElement>(
    kind: ElementKind,
    element: &E,
    cx: &mut ParseContext,
    parent_id: &str,
    index: usize,
) -> PageNode {
    let selector = typography_selector(kind);
    let text_el = element.find_tag(&TEXT_TAGS);
    let source = text_el.as_ref().unwrap_or(element);
    let carrier = text_el.as_ref().unwrap_or(element);
    let inherited = cx.inherited();
    let owned = |value: &str| Some(value.to_string());

    let font_size = resolve(&FONT_SIZE, element, Some(carrier), inherited, parse_px)
        .unwrap_or(Dimension::px(48.0));
    let font_weight = resolve(&FONT_WEIGHT, element, Some(carrier), inherited, owned)
        .map(|weight| normalize_font_weight(&weight))
        .unwrap_or_else(|| normalize_font_weight("normal"));
    let font_family = resolve(&FONT_FAMILY, element, Some(carrier), inherited, normalize_font_family);
    let color = resolve(&COLOR, element, Some(carrier), inherited, normalize_color)
        .unwrap_or_else(|| "#000000".to_string());
    let text_align = resolve(&ALIGN, element, None, inherited, owned)
        .unwrap_or_else(|| {
            let style = carrier.inline_style();
            let own = element.inline_style();
            parse_text_align(style.get("text-align").or_else(|| own.get("text-align"))).to_string()
        });
    let line_height = resolve(&LINE_HEIGHT, element, Some(carrier), inherited, parse_line_height);
    let letter_spacing = resolve(&LETTER_SPACING, element, Some(carrier), inherited, |value| {
        parse_value_with_unit(value, Unit::Rem)
    });
    let text_transform = resolve(&TRANSFORM, element, Some(carrier), inherited, owned);
    let link_color = element
        .non_empty_attribute("data-link-color")
        .and_then(normalize_color)
        .or_else(|| {
            source
                .find_tag(&["a"])
                .and_then(|anchor| anchor.inline_style().get("color").and_then(normalize_color))
        });

    let mut node = new_node(cx, kind, parent_id, index);
    node.attrs = Some(Attrs::styled());
    copy_element_anchor(&mut node, element);
    apply_animation(&mut node, element);
    node.params_mut()
        .set("padding-top--unit", "px")
        .set("padding-bottom--unit", "px")
        .set("--style-padding-horizontal--unit", "px")
        .set("--style-padding-horizontal", 0);
    apply_spacing(&mut node, &parse_spacing(&element.inline_style()).with_defaults());
    if let Some(icon) = element.non_empty_attribute("data-icon") {
        node.set_param("icon", icon);
    }
    if let Some(align) = element.non_empty_attribute("data-icon-align") {
        node.set_param("icon-align", align);
    }

    let mut block = StyleBlock::styled();
    block.set_style_length("font-size", font_size);
    block.set_style("font-weight", font_weight);
    block.set_style("color", color);
    block.set_style("text-align", text_align);
    block.set_style(
        "line-height",
        line_height.map_or(serde_json::json!(140), |lh| lh.value_json()),
    );
    block.set_style(
        "letter-spacing",
        letter_spacing.map_or(serde_json::json!(0), |ls| ls.value_json()),
    );
    block.set_param("line-height--unit", Unit::Percent.as_str());
    block.set_param("letter-spacing--unit", Unit::Rem.as_str());
    if let Some(family) = font_family {
        block.set_style("font-family", family);
    }
    if let Some(transform) = text_transform {
        block.set_style("text-transform", transform);
    }
    node.insert_selector(selector, block);

    if let Some(link_color) = &link_color {
        let mut link = StyleBlock::new();
        link.attrs_mut().style_mut().set("color", link_color.as_str());
        node.insert_selector(format!("{selector} .elTypographyLink"), link);
    }

    let mut children = rich_text(source, cx, link_color.as_deref());
    if children.is_empty() {
        children.push(PageNode::text(source.text_content()));
    }
    let mut editable = PageNode::structural("ContentEditableNode", cx.next_id(), node.id(), key_for(0));
    let mut attrs = Attrs::new();
    attrs.set("data-align-selector", selector);
    editable.attrs = Some(attrs);
    node.push_child(editable.with_children(children));
    node
}
