use crate::data::{Attrs, PageNode, StyleBlock, Styled};
use crate::kinds::ElementKind;
use crate::order::key_for;
use crate::source::SourceElement;
use crate::style::{apply_animation, apply_spacing, parse_spacing};
use crate::traverse::{INHERITED_COLOR, ParseContext};
use crate::value::{Dimension, PropertyRule, normalize_color, parse_px, resolve};

use super::{copy_element_anchor, new_node};
use super::rich_text::rich_text;

const ITEM_SELECTOR: &str = ".elBulletList li";
const ICON_GLYPH_SELECTOR: &str = ".elBulletList .fa,\n.elBulletList .fas,\n.elBulletList .fa-fw";

const TEXT_SIZE: PropertyRule<'static> = PropertyRule::new()
    .overrides(&["data-size-resolved", "data-text-size"])
    .inline("font-size");
const TEXT_COLOR: PropertyRule<'static> = PropertyRule::new()
    .overrides(&["data-text-color"])
    .inline("color")
    .inherited(INHERITED_COLOR)
    .fallback("#334155");
const ICON_SIZE: PropertyRule<'static> = PropertyRule::new()
    .overrides(&["data-icon-size"])
    .inline("font-size");
const ICON_COLOR: PropertyRule<'static> = PropertyRule::new()
    .overrides(&["data-icon-color"])
    .inline("color")
    .fallback("#10b981");
const ICON_GAP: PropertyRule<'static> = PropertyRule::new()
    .overrides(&["data-gap"])
    .inline("margin-right")
    .fallback("12px");

/// Ensures the platform's `fa_icon` marker class is present.
fn icon_class(raw: &str) -> String {
    if raw.split_whitespace().any(|class| class == "fa_icon") {
        raw.to_string()
    } else {
        format!("{raw} fa_icon")
    }
}

/// Bullet list. Styling is read from the first item; every `<li>` becomes an
/// `li` node holding an `IconNode` and a text wrapper.
pub(super) fn bullet_list<E: SourceElement>(
    element: &E,
    cx: &mut ParseContext,
    parent_id: &str,
    index: usize,
) -> PageNode {
    let style = element.inline_style();
    let list = element.find_tag(&["ul"]);
    let list_style = list.as_ref().map(E::inline_style).unwrap_or_default();
    let items = list
        .as_ref()
        .map(|list| list.find_descendants(&|el: &E| el.tag_name() == "li"))
        .unwrap_or_default();
    let first = items.first();
    let first_icon = first.and_then(|item| item.find_tag(&["i"]));
    let first_text = first.and_then(|item| item.find_tag(&["span"]));
    let inherited = cx.inherited();

    let class_name = icon_class(
        element
            .non_empty_attribute("data-icon")
            .or_else(|| first_icon.as_ref().and_then(|icon| icon.attribute("class")))
            .unwrap_or("fas fa-check"),
    );
    let text_color = resolve(&TEXT_COLOR, element, first_text.as_ref(), inherited, normalize_color);
    let text_size = resolve(&TEXT_SIZE, element, first_text.as_ref(), inherited, parse_px);
    let icon_color = resolve(&ICON_COLOR, element, first_icon.as_ref(), inherited, normalize_color);
    let icon_size = resolve(&ICON_SIZE, element, first_icon.as_ref(), inherited, parse_px);
    let icon_gap = resolve(&ICON_GAP, element, first_icon.as_ref(), inherited, parse_px)
        .unwrap_or(Dimension::px(12.0));
    let item_gap = parse_px(list_style.get("gap").unwrap_or("8px")).unwrap_or(Dimension::px(15.0));
    let justify = first
        .map(E::inline_style)
        .and_then(|item_style| item_style.get("justify-content").map(str::to_string))
        .unwrap_or_else(|| "flex-start".to_string());
    let link_color = element
        .non_empty_attribute("data-link-color")
        .and_then(normalize_color)
        .or_else(|| {
            list.as_ref()
                .and_then(|list| list.find_tag(&["a"]))
                .and_then(|anchor| anchor.inline_style().get("color").and_then(normalize_color))
        });

    let mut node = new_node(cx, ElementKind::BulletList, parent_id, index);
    node.attrs = Some(Attrs::styled());
    copy_element_anchor(&mut node, element);
    apply_animation(&mut node, element);
    node.params_mut()
        .set("--style-padding-horizontal--unit", "px")
        .set("--style-padding-horizontal", 0)
        .set("margin-top--unit", "px");
    apply_spacing(&mut node, &parse_spacing(&style));

    let mut text_block = StyleBlock::styled();
    text_block.set_attr("data-skip-text-shadow-settings", "true");
    if let Some(color) = text_color {
        text_block.set_style("color", color);
    }
    if let Some(size) = text_size {
        text_block.set_style_length("font-size", size);
    }
    node.insert_selector(".elBulletList", text_block);

    let mut spacing_block = StyleBlock::styled();
    spacing_block.set_style_length("margin-top", item_gap);
    node.insert_selector(".elBulletList li:not(:first-child)", spacing_block);

    let mut icon_block = StyleBlock::styled();
    icon_block.set_style_length("margin-right", Dimension::px(icon_gap.value));
    if let Some(size) = icon_size {
        icon_block.set_style_length("font-size", size);
    }
    node.insert_selector(".elBulletList .fa_icon", icon_block);

    let mut glyph_block = StyleBlock::new();
    if let Some(color) = icon_color {
        glyph_block.attrs_mut().style_mut().set("color", color);
    }
    node.insert_selector(ICON_GLYPH_SELECTOR, glyph_block);

    let mut item_block = StyleBlock::new();
    item_block
        .attrs_mut()
        .style_mut()
        .set("justify-content", justify);
    node.insert_selector(ITEM_SELECTOR, item_block);

    if let Some(color) = &link_color {
        let mut link = StyleBlock::new();
        link.attrs_mut().style_mut().set("color", color.as_str());
        node.insert_selector(".elBulletList .elTypographyLink", link);
    }

    let mut editable =
        PageNode::structural("ContentEditableNode", cx.next_id(), node.id(), key_for(0));
    let mut attrs = Attrs::new();
    attrs.set("data-align-selector", ITEM_SELECTOR);
    editable.attrs = Some(attrs);
    let editable_id = editable.id().to_string();
    let list_items = items
        .iter()
        .enumerate()
        .map(|(position, item)| {
            list_item(item, cx, &editable_id, position, &class_name, link_color.as_deref())
        })
        .collect();
    node.push_child(editable.with_children(list_items));
    node
}

fn list_item<E: SourceElement>(
    item: &E,
    cx: &mut ParseContext,
    parent_id: &str,
    position: usize,
    class_name: &str,
    link_color: Option<&str>,
) -> PageNode {
    let mut li = PageNode::structural("li", cx.next_id(), parent_id, key_for(position));
    let li_id = li.id().to_string();

    let mut icon = PageNode::structural("IconNode", cx.next_id(), li_id.as_str(), key_for(0));
    let mut icon_attrs = Attrs::new();
    icon_attrs
        .set("className", class_name)
        .set("contenteditable", "false");
    icon.attrs = Some(icon_attrs);

    let text = match item.find_tag(&["span"]) {
        Some(span) => rich_text(&span, cx, link_color),
        None => vec![PageNode::text(item.text_content().trim())],
    };
    let mut wrapper = PageNode::structural("span", cx.next_id(), li_id.as_str(), key_for(1));
    let mut wrapper_attrs = Attrs::new();
    wrapper_attrs.set("className", "elBulletListTextWrapper");
    wrapper.attrs = Some(wrapper_attrs);

    li.push_child(icon);
    li.push_child(wrapper.with_children(text));
    li
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icon_class_gets_marker_once() {
        assert_eq!(icon_class("fas fa-check"), "fas fa-check fa_icon");
        assert_eq!(icon_class("fa_icon fas fa-star"), "fa_icon fas fa-star");
    }
}
