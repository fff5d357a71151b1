use crate::data::{Attrs, PageNode, StyleBlock, Styled};
use crate::kinds::ElementKind;
use crate::source::SourceElement;
use crate::style::{
    Spacing, apply_animation, apply_background, apply_border, apply_corners, apply_shadow,
    apply_spacing, parse_align_items, parse_background, parse_border, parse_border_radius,
    parse_flex_direction, parse_justify_content, parse_shadow, parse_spacing, skip_flag,
};
use crate::traverse::{ParseContext, parse_children};
use crate::value::{
    Dimension, Unit, parse_leading_int, parse_leading_number, parse_px, parse_value_with_unit,
};

use super::{background_class, copy_anchor, new_node};

const DEFAULT_SECTION_WIDTH: &str = "1170px";

/// The document root. Its id is empty and its sections hang off `""`.
pub(crate) fn content_node<E: SourceElement>(element: &E, cx: &mut ParseContext) -> PageNode {
    let style = element.inline_style();
    let background = parse_background(&style);

    let mut node = PageNode {
        kind: ElementKind::ContentNode.output_kind().to_string(),
        id: Some(String::new()),
        version: Some(0),
        ..PageNode::default()
    };
    apply_background(&mut node, &background);
    node.set_param(
        "--style-foreground-color",
        element.attribute("data-overlay").unwrap_or_default(),
    );
    node.set_style("display", "block");
    node.set_style("background-position", "center !important");
    node.set_attr("data-skip-background-settings", skip_flag(background.is_set()));
    node.set_attr("className", background_class(element));

    let children = parse_children(cx, element, ElementKind::ContentNode, "");
    node.with_children(children)
}

pub(super) fn section<E: SourceElement>(
    element: &E,
    cx: &mut ParseContext,
    parent_id: &str,
    index: usize,
) -> PageNode {
    let style = element.inline_style();
    let background = parse_background(&style);
    let shadow = style.get("box-shadow").and_then(parse_shadow);
    let radius = parse_border_radius(&style);

    let mut node = new_node(cx, ElementKind::Section, parent_id, index);
    let mut class_name =
        container_class(style.get("max-width").unwrap_or(DEFAULT_SECTION_WIDTH)).to_string();
    if background.image_url.is_some() {
        class_name.push(' ');
        class_name.push_str(&background_class(element));
    }
    let attrs = node.attrs.insert(Attrs::styled());
    attrs
        .set("className", class_name)
        .set("data-skip-background-settings", skip_flag(background.is_set()))
        .set("data-skip-shadow-settings", skip_flag(shadow.is_some()))
        .set("data-skip-corners-settings", skip_flag(radius.is_some()));
    node.params_mut();
    copy_anchor(&mut node, element);

    apply_spacing(&mut node, &parse_spacing(&style).with_defaults());
    apply_background(&mut node, &background);
    if let Some(overlay) = element.non_empty_attribute("data-overlay") {
        node.set_param("--style-foreground-color", overlay);
    }
    apply_video_background(&mut node, element);

    let border = parse_border(&style);
    if !border.is_empty() {
        apply_border(&mut node, &border);
    }
    if let Some(shadow) = &shadow {
        apply_shadow(&mut node, shadow);
    }
    let separate = element.attribute("data-separate-corners") == Some("true");
    apply_corners(&mut node, &style, separate, radius);

    if let Some(show) = element.non_empty_attribute("data-show") {
        node.set_attr("data-show-only", show);
    }

    let id = node.id().to_string();
    let children = parse_children(cx, element, ElementKind::Section, &id);
    node.with_children(children)
}

fn container_class(max_width: &str) -> &'static str {
    if max_width.contains("550") || max_width.contains("small") {
        "smallContainer"
    } else if max_width.contains("720") || max_width.contains("mid") {
        "midContainer"
    } else if max_width.contains("960") || max_width.contains("midWide") {
        "midWideContainer"
    } else if max_width.contains("100%") || max_width.contains("full") {
        "fullContainer"
    } else {
        "wideContainer"
    }
}

/// YouTube background video on a section. Other providers are ignored.
fn apply_video_background<E: SourceElement>(node: &mut PageNode, element: &E) {
    let Some(url) = element.non_empty_attribute("data-video-bg-url") else {
        return;
    };
    if element.attribute("data-video-bg-type") != Some("youtube") {
        return;
    }
    node.set_attr("data-skip-background-settings", "false");
    node.set_attr("data-skip-background-video-settings", "false");
    node.params_mut()
        .set("video-bg-url", url)
        .set("video-bg-type", "youtube")
        .set("video-bg-thumbnail-background", false)
        .set("video-bg-use-background-as-overlay", true)
        .set(
            "video-bg-hide-on-mobile",
            element.attribute("data-video-bg-hide-mobile") == Some("true"),
        )
        .set("video-bg-style-type", "offset")
        .set("video-bg-offset-y", 50)
        .set("--style-background-image-url", "");
    if let Some(overlay) = element.non_empty_attribute("data-video-bg-overlay") {
        node.set_param("--style-background-color", overlay);
    }
}

pub(super) fn row<E: SourceElement>(
    element: &E,
    cx: &mut ParseContext,
    parent_id: &str,
    index: usize,
) -> PageNode {
    let style = element.inline_style();
    let background = parse_background(&style);
    let shadow = style.get("box-shadow").and_then(parse_shadow);
    let radius = parse_border_radius(&style);
    let width = parse_px(style.get("width").unwrap_or(DEFAULT_SECTION_WIDTH))
        .unwrap_or(Dimension::px(1170.0));

    let mut node = new_node(cx, ElementKind::Row, parent_id, index);
    node.set_attr("data-skip-background-settings", skip_flag(background.is_set()));
    node.set_attr("data-skip-shadow-settings", skip_flag(shadow.is_some()));
    node.set_attr("data-skip-corners-settings", skip_flag(radius.is_some()));
    apply_animation(&mut node, element);
    node.set_style_length("width", width);

    let mut col_inner = StyleBlock::new();
    col_inner.set_param("height--unit", Unit::Percent.as_str());
    col_inner.set_style("height", "auto");
    node.insert_selector(".col-inner", col_inner);

    if let Some(z_index) = style.get("z-index").and_then(parse_leading_int) {
        node.set_style("z-index", z_index);
    }
    copy_anchor(&mut node, element);
    if background.image_url.is_some() {
        node.set_attr("className", background_class(element));
    }

    apply_spacing(&mut node, &parse_spacing(&style).with_defaults());
    apply_background(&mut node, &background);
    if let Some(overlay) = element.non_empty_attribute("data-overlay") {
        node.set_param("--style-foreground-color", overlay);
    }
    let border = parse_border(&style);
    if !border.is_empty() {
        apply_border(&mut node, &border);
    }
    if let Some(shadow) = &shadow {
        apply_shadow(&mut node, shadow);
    }
    let separate = element.attribute("data-separate-corners") == Some("true");
    apply_corners(&mut node, &style, separate, radius);

    let id = node.id().to_string();
    let children = parse_children(cx, element, ElementKind::Row, &id);
    node.with_children(children)
}

pub(super) fn column<E: SourceElement>(
    element: &E,
    cx: &mut ParseContext,
    parent_id: &str,
    index: usize,
) -> PageNode {
    let style = element.inline_style();
    let width_percent = parse_leading_number(style.get("width").unwrap_or("100%")).unwrap_or(0.0);
    let md_num = match (width_percent / 100.0 * 12.0).round() {
        span if span >= 1.0 => span as i64,
        _ => 12,
    };

    let mut node = new_node(cx, ElementKind::Col, parent_id, index);
    node.attrs = Some(Attrs::new());
    node.params_mut()
        .set("mdNum", md_num)
        .set(
            "colDirection",
            element.non_empty_attribute("data-col-direction").unwrap_or("left"),
        );
    copy_anchor(&mut node, element);
    node.insert_selector(".col-inner", StyleBlock::new());

    let id = node.id().to_string();
    let col_inner = element.children().into_iter().find(|child| child.has_class("col-inner"));
    let children = match col_inner {
        Some(inner) => {
            node.insert_selector("& > .col-inner", col_inner_block(&inner));
            parse_children(cx, &inner, ElementKind::Col, &id)
        }
        None => {
            node.insert_selector("& > .col-inner", StyleBlock::styled());
            parse_children(cx, element, ElementKind::Col, &id)
        }
    };
    node.with_children(children)
}

/// Styling of the `.col-inner` wrapper, which carries the column's visible box.
fn col_inner_block<E: SourceElement>(inner: &E) -> StyleBlock {
    let style = inner.inline_style();
    let background = parse_background(&style);
    let shadow = style.get("box-shadow").and_then(parse_shadow);
    let radius = parse_border_radius(&style);
    let overlay = inner.non_empty_attribute("data-overlay");

    let mut block = StyleBlock::styled();
    let spacing = parse_spacing(&style);
    apply_spacing(
        &mut block,
        &Spacing {
            margin_top: None,
            ..spacing
        },
    );
    if let Some(margin) = style
        .get("margin-left")
        .or_else(|| style.get("margin-right"))
        .and_then(parse_px)
    {
        block.set_param_length("--style-margin-horizontal", margin);
    }

    apply_background(&mut block, &background);
    if background.image_url.is_some() {
        block.set_attr("className", background_class(inner));
    }
    if let Some(overlay) = overlay {
        block.set_param("--style-foreground-color", overlay);
    }

    let border = parse_border(&style);
    if !border.is_empty() {
        apply_border(&mut block, &border);
    }
    match &shadow {
        Some(shadow) => {
            apply_shadow(&mut block, shadow);
            block.set_attr("data-skip-shadow-settings", "false");
        }
        None => block.set_attr("data-skip-shadow-settings", "true"),
    }

    let separate = inner.attribute("data-separate-corners") == Some("true");
    apply_corners(&mut block, &style, separate, radius);
    block.set_attr(
        "data-skip-corners-settings",
        skip_flag(radius.is_some() || separate),
    );
    block.set_attr(
        "data-skip-background-settings",
        skip_flag(background.is_set() || overlay.is_some()),
    );
    block
}

pub(super) fn flex<E: SourceElement>(
    element: &E,
    cx: &mut ParseContext,
    parent_id: &str,
    index: usize,
) -> PageNode {
    let style = element.inline_style();
    let background = parse_background(&style);
    let shadow = style.get("box-shadow").and_then(parse_shadow);
    let radius = parse_border_radius(&style);
    let width = parse_value_with_unit(style.get("width").unwrap_or("100%"), Unit::Percent)
        .unwrap_or(Dimension::new(100.0, Unit::Percent));
    let gap = parse_value_with_unit(style.get("gap").unwrap_or("1.5em"), Unit::Em)
        .unwrap_or(Dimension::new(0.0, Unit::Em));

    let mut class_name = if style.get("flex-wrap") == Some("wrap") {
        "elFlexWrap elFlexNoWrapMobile".to_string()
    } else {
        "elFlexNoWrapMobile".to_string()
    };
    if background.image_url.is_some() {
        class_name.push(' ');
        class_name.push_str(&background_class(element));
    }

    let mut node = new_node(cx, ElementKind::Flex, parent_id, index);
    node.set_attr("className", class_name);
    node.set_attr("data-skip-background-settings", skip_flag(background.is_set()));
    node.set_attr("data-skip-shadow-settings", skip_flag(shadow.is_some()));
    node.set_attr("data-skip-corners-settings", skip_flag(radius.is_some()));
    node.set_style("flex-direction", parse_flex_direction(style.get("flex-direction")));
    node.set_style("justify-content", parse_justify_content(style.get("justify-content")));
    node.set_style("align-items", parse_align_items(style.get("align-items")));
    node.set_style_length("gap", gap);
    copy_anchor(&mut node, element);
    node.set_style_length("width", width);
    if let Some(height) = style.get("height").and_then(parse_px) {
        node.set_style_length("height", height);
    }

    apply_spacing(&mut node, &parse_spacing(&style).with_defaults());
    if background.is_set() {
        apply_background(&mut node, &background);
    }
    if let Some(overlay) = element.non_empty_attribute("data-overlay") {
        node.set_param("--style-foreground-color", overlay);
    }
    let border = parse_border(&style);
    if !border.is_empty() {
        apply_border(&mut node, &border);
    }
    if let Some(shadow) = &shadow {
        apply_shadow(&mut node, shadow);
    }
    if let Some(radius) = radius {
        node.set_style_length("border-radius", radius);
    }

    let id = node.id().to_string();
    let mut children = parse_children(cx, element, ElementKind::Flex, &id);
    let flex_kind = ElementKind::Flex.output_kind();
    for child in &mut children {
        child.params_mut();
        if child.kind != flex_kind && child.style_value("width").is_none() {
            child.set_style("width", "auto");
        } else {
            child.attrs_mut().style_mut();
        }
    }
    node.with_children(children)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_width_classes() {
        assert_eq!(container_class("550px"), "smallContainer");
        assert_eq!(container_class("720px"), "midContainer");
        assert_eq!(container_class("960px"), "midWideContainer");
        assert_eq!(container_class("100%"), "fullContainer");
        assert_eq!(container_class("1170px"), "wideContainer");
    }
}
