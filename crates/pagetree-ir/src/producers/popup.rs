use crate::data::{PageNode, StyleBlock, Styled};
use crate::kinds::ElementKind;
use crate::source::SourceElement;
use crate::style::{apply_shadow, parse_shadow, skip_flag};
use crate::traverse::{ParseContext, parse_children};
use crate::value::{Dimension, parse_px};

const MODAL_SELECTOR: &str = ".containerModal";

/// The page popup. It hangs off no parent and carries no order key; its
/// sections come from the inner container (or the modal box itself).
pub(crate) fn modal_container<E: SourceElement>(element: &E, cx: &mut ParseContext) -> PageNode {
    let modal = element
        .find_descendant(&|el: &E| el.has_class("cf-popup-modal") || el.has_class("containerModal"));
    let modal_style = modal.as_ref().map(E::inline_style).unwrap_or_default();
    let inner = element.find_class("elModalInnerContainer");

    let width = parse_px(element.non_empty_attribute("data-popup-width").unwrap_or("750px"))
        .unwrap_or(Dimension::px(750.0));
    let rounded = parse_px(element.non_empty_attribute("data-popup-rounded").unwrap_or("16px"));
    let margin_top = parse_px(modal_style.get("margin-top").unwrap_or("45px"))
        .unwrap_or(Dimension::px(45.0));
    let margin_bottom = parse_px(modal_style.get("margin-bottom").unwrap_or("10px"))
        .unwrap_or(Dimension::px(10.0));
    let wants_shadow = element.non_empty_attribute("data-popup-shadow").is_some();

    let mut node = PageNode {
        kind: ElementKind::Modal.output_kind().to_string(),
        id: Some(cx.next_id()),
        version: Some(0),
        ..PageNode::default()
    };

    let mut container = StyleBlock::styled();
    container.set_attr("data-skip-corners-settings", skip_flag(rounded.is_some()));
    container.set_attr("data-skip-shadow-settings", skip_flag(wants_shadow));
    container.set_style_length("margin-bottom", margin_bottom);
    container.set_style_length("margin-top", margin_top);
    if let Some(rounded) = rounded {
        container.set_style_length("border-radius", rounded);
    }
    if let Some(border) = element
        .non_empty_attribute("data-popup-border")
        .and_then(parse_px)
    {
        container.set_param("--style-border-style", "solid");
        container.set_param_length("--style-border-width", border);
        container.set_param(
            "--style-border-color",
            element
                .non_empty_attribute("data-popup-border-color")
                .unwrap_or("#000000"),
        );
    }
    if wants_shadow {
        if let Some(shadow) = modal_style.get("box-shadow").and_then(parse_shadow) {
            apply_shadow(&mut container, &shadow);
        }
    }
    node.insert_selector(MODAL_SELECTOR, container);

    let mut backdrop = StyleBlock::new();
    backdrop
        .params_mut()
        .set(
            "--style-background-color",
            element
                .non_empty_attribute("data-popup-overlay")
                .unwrap_or("rgba(0,0,0,0.5)"),
        )
        .set("--style-padding-horizontal--unit", "px")
        .set("--style-padding-horizontal", 0);
    node.insert_selector(".modal-wrapper", backdrop);

    let mut inner_block = StyleBlock::new();
    inner_block.set_param("width--unit", width.unit.as_str());
    inner_block.attrs_mut().style_mut().set("width", width.value_json());
    node.insert_selector(".elModalInnerContainer", inner_block);

    let id = node.id().to_string();
    let children = match inner.or(modal) {
        Some(sections) => parse_children(cx, &sections, ElementKind::Modal, &id),
        None => Vec::new(),
    };
    node.with_children(children)
}

/// Stand-in popup for pages without one: empty id, default modal block.
pub(crate) fn empty_modal() -> PageNode {
    let mut container = StyleBlock::new();
    container
        .attrs_mut()
        .set("data-skip-corners-settings", "false")
        .set("data-style-guide-corner", "style1");
    container.set_style("margin-bottom", 0);

    let mut node = PageNode {
        kind: ElementKind::Modal.output_kind().to_string(),
        id: Some(String::new()),
        version: Some(0),
        ..PageNode::default()
    };
    node.insert_selector(MODAL_SELECTOR, container);
    node
}
