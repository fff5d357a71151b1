//! Per-kind node producers.
//!
//! Each producer reads one source element and returns the node for it.
//! Container producers recurse through [`crate::traverse::parse_children`];
//! leaf producers read whatever nested markup they need themselves.

mod button;
mod form;
mod interactive;
mod layout;
mod list;
mod media;
mod placeholders;
mod popup;
mod rich_text;
mod text;

use tracing::trace;

use crate::data::{PageNode, Styled};
use crate::kinds::ElementKind;
use crate::order::key_for;
use crate::source::SourceElement;
use crate::traverse::{ParseContext, diagnostics_enabled};

pub(crate) use layout::content_node;
pub(crate) use popup::{empty_modal, modal_container};

/// Dispatches `element` to the producer registered for `kind`.
pub(crate) fn produce<E: SourceElement>(
    kind: ElementKind,
    element: &E,
    cx: &mut ParseContext,
    parent_id: &str,
    index: usize,
) -> Option<PageNode> {
    if diagnostics_enabled("producers") {
        trace!(kind = kind.tag(), parent_id, index, "producing node");
    }
    let node = match kind {
        ElementKind::ContentNode => layout::content_node(element, cx),
        ElementKind::Section => layout::section(element, cx, parent_id, index),
        ElementKind::Row => layout::row(element, cx, parent_id, index),
        ElementKind::Col => layout::column(element, cx, parent_id, index),
        ElementKind::Flex => layout::flex(element, cx, parent_id, index),
        ElementKind::ColInner => return None,
        ElementKind::Headline | ElementKind::SubHeadline | ElementKind::Paragraph => {
            text::text_block(kind, element, cx, parent_id, index)
        }
        ElementKind::Button => button::button(element, cx, parent_id, index),
        ElementKind::Image => media::image(element, cx, parent_id, index),
        ElementKind::Icon => media::icon(element, cx, parent_id, index),
        ElementKind::Video => media::video(element, cx, parent_id, index),
        ElementKind::Divider => media::divider(element, cx, parent_id, index),
        ElementKind::Input => form::input(element, cx, parent_id, index),
        ElementKind::TextArea => form::text_area(element, cx, parent_id, index),
        ElementKind::SelectBox => form::select_box(element, cx, parent_id, index),
        ElementKind::Checkbox => form::checkbox(element, cx, parent_id, index),
        ElementKind::BulletList => list::bullet_list(element, cx, parent_id, index),
        ElementKind::ProgressBar => interactive::progress_bar(element, cx, parent_id, index),
        ElementKind::VideoPopup => interactive::video_popup(element, cx, parent_id, index),
        ElementKind::Countdown => interactive::countdown(element, cx, parent_id, index),
        ElementKind::CheckoutPlaceholder => placeholders::checkout(element, cx, parent_id, index),
        ElementKind::OrderSummaryPlaceholder => {
            placeholders::order_summary(element, cx, parent_id, index)
        }
        ElementKind::ConfirmationPlaceholder => {
            placeholders::confirmation(element, cx, parent_id, index)
        }
        ElementKind::Modal => popup::modal_container(element, cx),
    };
    Some(node)
}

/// A fresh versioned node of `kind` at `index` under `parent_id`.
fn new_node(cx: &mut ParseContext, kind: ElementKind, parent_id: &str, index: usize) -> PageNode {
    PageNode::structural(kind.output_kind(), cx.next_id(), parent_id, key_for(index))
}

/// Copies the author anchor (`id="..."`) onto `attrs.id`.
fn copy_anchor<E: SourceElement>(node: &mut PageNode, element: &E) {
    if let Some(anchor) = element.non_empty_attribute("id") {
        node.set_attr("id", anchor);
    }
}

/// Copies the anchor from `id`, falling back to `data-element-id`.
fn copy_element_anchor<E: SourceElement>(node: &mut PageNode, element: &E) {
    if let Some(anchor) = element
        .non_empty_attribute("id")
        .or_else(|| element.non_empty_attribute("data-element-id"))
    {
        node.set_attr("id", anchor);
    }
}

/// `className` for a background image: `data-bg-style` or the cover default.
fn background_class<E: SourceElement>(element: &E) -> String {
    element
        .non_empty_attribute("data-bg-style")
        .unwrap_or("bgCoverCenter")
        .to_string()
}
