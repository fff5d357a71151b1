//! Inline markup inside text-bearing elements, converted to inline nodes.

use crate::data::{Attrs, PageNode};
use crate::source::{SourceElement, SourceNode};
use crate::traverse::ParseContext;
use crate::value::normalize_color;

/// Converts the child markup of `container` into inline nodes. Formatting
/// tags map onto the platform's inline kinds, links get a generated id, and
/// any other element is flattened into its children.
pub(super) fn rich_text<E: SourceElement>(
    container: &E,
    cx: &mut ParseContext,
    link_color: Option<&str>,
) -> Vec<PageNode> {
    let mut out = Vec::new();
    for child in container.child_nodes() {
        convert(child, cx, link_color, &mut out);
    }
    out
}

fn convert<E: SourceElement>(
    node: SourceNode<E>,
    cx: &mut ParseContext,
    link_color: Option<&str>,
    out: &mut Vec<PageNode>,
) {
    let element = match node {
        SourceNode::Text(text) => {
            if !text.is_empty() {
                out.push(PageNode::text(text));
            }
            return;
        }
        SourceNode::Element(element) => element,
    };

    let kind = match element.tag_name() {
        "b" | "strong" => "b",
        "i" | "em" => "i",
        "u" => "u",
        "s" | "strike" => "strike",
        "span" => "span",
        "li" => "li",
        "br" => {
            out.push(PageNode::inline("br"));
            return;
        }
        "a" => {
            let link = anchor(&element, cx, link_color);
            out.push(link);
            return;
        }
        _ => {
            for child in element.child_nodes() {
                convert(child, cx, link_color, out);
            }
            return;
        }
    };
    let children = rich_text(&element, cx, link_color);
    out.push(PageNode::inline(kind).with_children(children));
}

fn anchor<E: SourceElement>(
    element: &E,
    cx: &mut ParseContext,
    link_color: Option<&str>,
) -> PageNode {
    let color = link_color.map(str::to_string).or_else(|| {
        element
            .inline_style()
            .get("color")
            .and_then(normalize_color)
    });

    let mut attrs = Attrs::new();
    attrs
        .set("href", element.non_empty_attribute("href").unwrap_or("#"))
        .set("id", cx.next_link_id())
        .set("target", element.non_empty_attribute("target").unwrap_or("_self"))
        .set("className", "elTypographyLink")
        .set("rel", element.non_empty_attribute("rel").unwrap_or("noopener"));
    if let Some(color) = color {
        attrs.style_mut().set("color", color);
    }

    let mut node = PageNode::inline("a").with_children(rich_text(element, cx, link_color));
    node.attrs = Some(attrs);
    node
}
