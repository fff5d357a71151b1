//! Commerce placeholders. The builder renders them as plain boxes; the
//! platform expects its own checkout, order summary and receipt elements.

use crate::data::{Attrs, PageNode, PropertyBag, StyleBlock, Styled};
use crate::kinds::ElementKind;
use crate::order::key_for;
use crate::source::SourceElement;
use crate::style::{apply_spacing, parse_spacing};
use crate::traverse::ParseContext;

use super::new_node;

const TOS_TEXT: &str = "By completing this purchase, you agree to our terms of service.";
const CTA_HEADER: &str = "Complete Your Order Today!";

/// A slotted paragraph holding one text run.
fn slot_paragraph(
    cx: &mut ParseContext,
    parent_id: &str,
    position: usize,
    slot: &str,
    copy: &str,
) -> PageNode {
    let paragraph = PageNode::structural("p", cx.next_id(), parent_id, key_for(position)).with_slot(slot);
    let text = PageNode::structural("text", cx.next_id(), paragraph.id(), key_for(0)).with_text(copy);
    paragraph.with_children(vec![text])
}

/// Spacing written onto a scratch node, so placeholders only gain `attrs`
/// and `params` when the source actually declares spacing.
fn declared_spacing<E: SourceElement>(element: &E) -> (Option<PropertyBag>, Option<PropertyBag>) {
    let mut scratch = PageNode::default();
    apply_spacing(&mut scratch, &parse_spacing(&element.inline_style()));
    let style = scratch
        .attrs
        .and_then(|attrs| attrs.style)
        .filter(|style| !style.is_empty());
    (style, scratch.params.filter(|params| !params.is_empty()))
}

pub(super) fn checkout<E: SourceElement>(
    element: &E,
    cx: &mut ParseContext,
    parent_id: &str,
    index: usize,
) -> PageNode {
    let mut node = new_node(cx, ElementKind::CheckoutPlaceholder, parent_id, index);
    node.attrs_mut()
        .style_mut()
        .set("--container-font-family", "var(--style-guide-font-family-content)")
        .set(
            "--input-headline-font-family",
            "var(--style-guide-font-family-subheadline)",
        )
        .set("--multiple-payments-font-family", "sans-serif")
        .set("--input-background-color", "#FFFFFF");
    if let (Some(spacing), _) = declared_spacing(element) {
        node.attrs_mut().style_mut().extend(spacing);
    }

    let mut button = StyleBlock::styled();
    button
        .params_mut()
        .set("--style-border-style", "solid")
        .set("border-radius--unit", "px");
    button.set_style("border-style", "none");
    button.set_style("border-radius", 6);
    button.set_attr("data-skip-corners-settings", "false");
    node.insert_selector(".elButton", button);

    let id = node.id().to_string();
    let tos = slot_paragraph(cx, &id, 0, "tos-text", TOS_TEXT);
    let cta = slot_paragraph(cx, &id, 1, "cta-header", CTA_HEADER);
    node.with_children(vec![tos, cta])
}

pub(super) fn order_summary<E: SourceElement>(
    element: &E,
    cx: &mut ParseContext,
    parent_id: &str,
    index: usize,
) -> PageNode {
    let mut node = new_node(cx, ElementKind::OrderSummaryPlaceholder, parent_id, index);
    node.params_mut()
        .set("open", true)
        .set("state", "ok")
        .set("linkWithCheckout", true);
    let (style, params) = declared_spacing(element);
    if let Some(style) = style {
        node.attrs = Some(Attrs {
            style: Some(style),
            ..Attrs::default()
        });
    }
    if let Some(params) = params {
        node.params_mut().extend(params);
    }
    node
}

pub(super) fn confirmation<E: SourceElement>(
    element: &E,
    cx: &mut ParseContext,
    parent_id: &str,
    index: usize,
) -> PageNode {
    let mut node = new_node(cx, ElementKind::ConfirmationPlaceholder, parent_id, index);
    let mut receipt = StyleBlock::styled();
    receipt.set_attr("data-skip-corners-settings", "false");
    receipt.set_style("border-radius", "8px");
    receipt
        .params_mut()
        .set("--style-border-width", "1px")
        .set("--style-border-style", "solid")
        .set("--style-border-color", "#ECF0F5");
    node.insert_selector(".elOrderConfirmationV1", receipt);

    let (style, params) = declared_spacing(element);
    if let Some(style) = style {
        node.attrs = Some(Attrs {
            style: Some(style),
            ..Attrs::default()
        });
    }
    node.params = params;
    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceNode;

    #[derive(Clone)]
    struct Boxed(String);

    impl SourceElement for Boxed {
        fn tag_name(&self) -> &str {
            "div"
        }
        fn attribute(&self, name: &str) -> Option<&str> {
            (name == "style").then_some(self.0.as_str())
        }
        fn children(&self) -> Vec<Self> {
            Vec::new()
        }
        fn child_nodes(&self) -> Vec<SourceNode<Self>> {
            Vec::new()
        }
        fn text_content(&self) -> String {
            String::new()
        }
    }

    #[test]
    fn spacing_is_only_emitted_when_declared() {
        assert_eq!(declared_spacing(&Boxed(String::new())), (None, None));

        let (style, params) = declared_spacing(&Boxed("padding-top: 20px".to_string()));
        let style = style.expect("style");
        assert_eq!(style.get("padding-top"), Some(&serde_json::json!(20)));
        let params = params.expect("params");
        assert_eq!(params.get("padding-top--unit"), Some(&serde_json::json!("px")));
    }
}
