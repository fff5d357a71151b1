//! Anchor bookkeeping and the second pass that rewrites button references.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::data::PageNode;
use crate::kinds::ElementKind;

const SCROLL_PREFIX: &str = "#scroll-";
const RESOLVED_PREFIX: &str = "id-";

/// Author anchor name -> internal node id, for one parse.
#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex {
    anchors: HashMap<String, String>,
    internal_ids: HashSet<String>,
}

impl ReferenceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `anchor -> id`. A repeated anchor is re-pointed at the newer
    /// node and the previous id is returned.
    pub fn register(&mut self, anchor: &str, id: &str) -> Option<String> {
        self.internal_ids.insert(id.to_string());
        let previous = self.anchors.insert(anchor.to_string(), id.to_string());
        if let Some(previous) = &previous {
            debug!(anchor, previous = %previous, id, "anchor registered twice; keeping the later node");
        }
        previous
    }

    pub fn get(&self, anchor: &str) -> Option<&str> {
        self.anchors.get(anchor).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    fn is_resolved(&self, reference: &str) -> bool {
        reference
            .strip_prefix(RESOLVED_PREFIX)
            .is_some_and(|id| self.internal_ids.contains(id))
    }

    fn resolve_token(&self, token: &str) -> String {
        if self.is_resolved(token) {
            return token.to_string();
        }
        match self.get(token) {
            Some(id) => format!("{RESOLVED_PREFIX}{id}"),
            None => {
                debug!(anchor = token, "unresolved reference left as written");
                token.to_string()
            }
        }
    }

    fn resolve_list(&self, list: &str) -> String {
        list.split(',')
            .map(|token| self.resolve_token(token.trim()))
            .collect::<Vec<_>>()
            .join(",")
    }

    fn resolve_scroll(&self, href: &str) -> Option<String> {
        let anchor = href.strip_prefix(SCROLL_PREFIX)?;
        if self.is_resolved(anchor) {
            return None;
        }
        let id = self.get(anchor)?;
        Some(format!("{SCROLL_PREFIX}{RESOLVED_PREFIX}{id}"))
    }
}

/// Rewrites scroll targets and show/hide lists of every button under `root`
/// into internal ids. Unknown anchors stay verbatim and running the pass a
/// second time changes nothing.
pub fn resolve_references(root: &mut PageNode, index: &ReferenceIndex) {
    let button = ElementKind::Button.output_kind();
    root.walk_mut(&mut |node| {
        if node.kind != button {
            return;
        }
        let Some(params) = node.params.as_mut() else {
            return;
        };
        if let Some(href) = params.get_str("href").and_then(|href| index.resolve_scroll(href)) {
            params.set("href", href);
        }
        for key in ["showIds", "hideIds"] {
            if let Some(list) = params.get_str(key).map(|list| index.resolve_list(list)) {
                params.set(key, list);
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Styled;

    fn button(show: &str, href: &str) -> PageNode {
        let mut node = PageNode::structural("Button/V1", "6Z-btn-0", "", "a0");
        node.set_param("showIds", show);
        node.set_param("hideIds", "gone");
        node.set_param("href", href);
        node
    }

    #[test]
    fn known_anchors_resolve_and_unknown_stay() {
        let mut index = ReferenceIndex::new();
        index.register("anchor-A", "X1");
        let mut root = PageNode::structural("ContentNode", "", "", "a0");
        root.push_child(button("anchor-A, anchor-B", "#scroll-anchor-A"));

        resolve_references(&mut root, &index);
        let resolved = &root.children()[0];
        assert_eq!(resolved.param_str("showIds"), Some("id-X1,anchor-B"));
        assert_eq!(resolved.param_str("hideIds"), Some("gone"));
        assert_eq!(resolved.param_str("href"), Some("#scroll-id-X1"));
    }

    #[test]
    fn resolution_is_idempotent() {
        let mut index = ReferenceIndex::new();
        index.register("hero", "6Z-hero-0");
        let mut root = button("hero,missing", "#scroll-hero");
        resolve_references(&mut root, &index);
        let once = root.clone();
        resolve_references(&mut root, &index);
        assert_eq!(root, once);
        assert_eq!(root.param_str("href"), Some("#scroll-id-6Z-hero-0"));
    }

    #[test]
    fn later_anchor_wins() {
        let mut index = ReferenceIndex::new();
        assert_eq!(index.register("dup", "first"), None);
        assert_eq!(index.register("dup", "second").as_deref(), Some("first"));
        assert_eq!(index.get("dup"), Some("second"));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn non_button_nodes_are_untouched() {
        let mut index = ReferenceIndex::new();
        index.register("a", "X");
        let mut node = PageNode::structural("Headline/V1", "h", "", "a0");
        node.set_param("showIds", "a");
        resolve_references(&mut node, &index);
        assert_eq!(node.param_str("showIds"), Some("a"));
    }
}
