//! Source traversal: dispatch, wrapper elision and sibling numbering.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::data::PageNode;
use crate::ids::IdGenerator;
use crate::kinds::ElementKind;
use crate::producers;
use crate::refs::ReferenceIndex;
use crate::source::{OVERLAY_CLASS, SourceElement};
use crate::styleguide::Styleguide;
use crate::value::InheritedDefaults;

/// Inherited-defaults key for the document text color.
pub const INHERITED_COLOR: &str = "color";

/// Mutable state threaded through one parse.
pub struct ParseContext {
    ids: Box<dyn IdGenerator>,
    references: ReferenceIndex,
    inherited: InheritedDefaults,
    styleguide: Option<Styleguide>,
}

impl ParseContext {
    pub fn new(ids: Box<dyn IdGenerator>, styleguide: Option<Styleguide>) -> Self {
        Self {
            ids,
            references: ReferenceIndex::new(),
            inherited: InheritedDefaults::new(),
            styleguide,
        }
    }

    pub fn next_id(&mut self) -> String {
        self.ids.next_id()
    }

    pub fn next_link_id(&mut self) -> String {
        self.ids.next_link_id()
    }

    pub fn references(&self) -> &ReferenceIndex {
        &self.references
    }

    pub fn inherited(&self) -> &InheritedDefaults {
        &self.inherited
    }

    pub fn styleguide(&self) -> Option<&Styleguide> {
        self.styleguide.as_ref()
    }
}

/// Produces the node for `element`, or `None` when it has no kind, an
/// unknown kind, or a transparent kind. Container producers recurse through
/// [`parse_children`].
pub fn parse_element<E: SourceElement>(
    cx: &mut ParseContext,
    element: &E,
    parent_id: &str,
    index: usize,
) -> Option<PageNode> {
    let tag = element.kind()?;
    let Some(kind) = ElementKind::from_tag(tag) else {
        warn!(kind = tag, "no producer registered; dropping element");
        return None;
    };
    if kind.is_transparent() {
        return None;
    }

    let scoped = kind.is_container() && push_defaults(cx, kind, element);
    let node = producers::produce(kind, element, cx, parent_id, index);
    if scoped {
        cx.inherited.pop_scope();
    }

    if let Some(node) = &node {
        if let Some(anchor) = node.anchor().filter(|_| !node.id().is_empty()) {
            cx.references.register(anchor, node.id());
        }
    }
    node
}

/// Parses the children of `container` that a `kind` container accepts.
/// Overlay layers are skipped; kindless and transparent wrappers are dived
/// through so their descendants become direct children, numbered without gaps.
pub fn parse_children<E: SourceElement>(
    cx: &mut ParseContext,
    container: &E,
    kind: ElementKind,
    parent_id: &str,
) -> Vec<PageNode> {
    let mut children = Vec::new();
    collect_children(cx, container, kind, parent_id, &mut children);
    children
}

fn collect_children<E: SourceElement>(
    cx: &mut ParseContext,
    container: &E,
    kind: ElementKind,
    parent_id: &str,
    out: &mut Vec<PageNode>,
) {
    for child in container.children() {
        if child.has_class(OVERLAY_CLASS) {
            continue;
        }
        let child_kind = child.kind().map(|tag| (tag, ElementKind::from_tag(tag)));
        match child_kind {
            None | Some((_, Some(ElementKind::ColInner))) => {
                if diagnostics_enabled("elide") {
                    debug!(tag = child.tag_name(), "diving through wrapper");
                }
                collect_children(cx, &child, kind, parent_id, out);
            }
            Some((_, Some(child_kind))) if !kind.accepts_child(child_kind) => {
                debug!(
                    parent = kind.tag(),
                    child = child_kind.tag(),
                    "child kind not accepted here; skipping"
                );
            }
            Some(_) => {
                if let Some(node) = parse_element(cx, &child, parent_id, out.len()) {
                    out.push(node);
                }
            }
        }
    }
}

fn push_defaults<E: SourceElement>(cx: &mut ParseContext, kind: ElementKind, element: &E) -> bool {
    let color = match kind {
        ElementKind::ContentNode => element
            .non_empty_attribute("data-color")
            .or_else(|| element.non_empty_attribute("data-text-color")),
        _ => element.non_empty_attribute("data-text-color"),
    };
    let Some(color) = color else {
        return false;
    };
    cx.inherited.push_scope(BTreeMap::from([(
        INHERITED_COLOR.to_string(),
        color.to_string(),
    )]));
    true
}

/// Pushes the root's document defaults for the duration of `f`.
pub(crate) fn with_root_defaults<E: SourceElement, T>(
    cx: &mut ParseContext,
    kind: ElementKind,
    element: &E,
    f: impl FnOnce(&mut ParseContext) -> T,
) -> T {
    let scoped = push_defaults(cx, kind, element);
    let result = f(cx);
    if scoped {
        cx.inherited.pop_scope();
    }
    result
}

fn parse_diagnostics_env() -> &'static std::collections::HashSet<String> {
    use std::sync::OnceLock;
    static SET: OnceLock<std::collections::HashSet<String>> = OnceLock::new();
    SET.get_or_init(|| {
        let raw = std::env::var("PAGETREE_DIAGNOSTICS").unwrap_or_default();
        raw.split(',')
            .map(|s| s.trim().to_ascii_lowercase())
            .filter(|s| !s.is_empty())
            .collect()
    })
}

/// `PAGETREE_DIAGNOSTICS=elide,producers` (or `all`) turns on chatty traces.
pub(crate) fn diagnostics_enabled(category: &str) -> bool {
    let set = parse_diagnostics_env();
    set.contains("all") || set.contains(&category.to_ascii_lowercase())
}
