use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::value::Dimension;

/// Envelope version expected by the importing platform.
pub const FORMAT_VERSION: u32 = 157;

/// Ordered string-keyed bag of JSON values used for `attrs`, `params` and
/// `style` objects. Unknown keys pass through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyBag(BTreeMap<String, Value>);

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn extend(&mut self, other: PropertyBag) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for PropertyBag {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

/// Attribute bag with the nested `style` object split out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attrs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<PropertyBag>,
    #[serde(flatten)]
    pub fields: PropertyBag,
}

impl Attrs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attribute bag that always serializes a (possibly empty) `style`.
    pub fn styled() -> Self {
        Self {
            style: Some(PropertyBag::new()),
            fields: PropertyBag::new(),
        }
    }

    pub fn style_mut(&mut self) -> &mut PropertyBag {
        self.style.get_or_insert_with(PropertyBag::new)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.fields.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get_str(key)
    }

    pub fn style_value(&self, key: &str) -> Option<&Value> {
        self.style.as_ref().and_then(|style| style.get(key))
    }
}

/// Per-selector override block: `{ attrs, params }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<Attrs>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<PropertyBag>,
}

impl StyleBlock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block with an empty `attrs.style` and empty `params`.
    pub fn styled() -> Self {
        Self {
            attrs: Some(Attrs::styled()),
            params: Some(PropertyBag::new()),
        }
    }

    pub fn param(&self, key: &str) -> Option<&Value> {
        self.params.as_ref().and_then(|params| params.get(key))
    }

    pub fn style_value(&self, key: &str) -> Option<&Value> {
        self.attrs.as_ref().and_then(|attrs| attrs.style_value(key))
    }
}

/// Mutable access shared by nodes and selector blocks, so style helpers can
/// write into either.
pub trait Styled {
    fn attrs_mut(&mut self) -> &mut Attrs;
    fn params_mut(&mut self) -> &mut PropertyBag;

    fn set_attr(&mut self, key: &str, value: impl Into<Value>) {
        self.attrs_mut().set(key, value);
    }

    fn set_style(&mut self, key: &str, value: impl Into<Value>) {
        self.attrs_mut().style_mut().set(key, value);
    }

    fn set_param(&mut self, key: &str, value: impl Into<Value>) {
        self.params_mut().set(key, value);
    }

    /// `attrs.style[key] = value` plus `params[key--unit] = unit`.
    fn set_style_length(&mut self, key: &str, dimension: Dimension) {
        self.set_style(key, dimension.value_json());
        self.set_param(&format!("{key}--unit"), dimension.unit.as_str());
    }

    /// `params[key] = value` plus `params[key--unit] = unit`.
    fn set_param_length(&mut self, key: &str, dimension: Dimension) {
        self.set_param(key, dimension.value_json());
        self.set_param(&format!("{key}--unit"), dimension.unit.as_str());
    }
}

impl Styled for StyleBlock {
    fn attrs_mut(&mut self) -> &mut Attrs {
        self.attrs.get_or_insert_with(Attrs::styled)
    }

    fn params_mut(&mut self) -> &mut PropertyBag {
        self.params.get_or_insert_with(PropertyBag::new)
    }
}

/// One node of the output page tree.
///
/// Structural nodes carry `id`, `version`, `parentId` and `fractionalIndex`;
/// inline rich-text nodes carry only `type`, optional `attrs` and content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageNode {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(
        rename = "fractionalIndex",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub order_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<Attrs>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<PropertyBag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selectors: Option<BTreeMap<String, StyleBlock>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<PageNode>>,
}

impl PageNode {
    /// A versioned node placed under `parent_id` at `order_key`.
    pub fn structural(
        kind: impl Into<String>,
        id: impl Into<String>,
        parent_id: impl Into<String>,
        order_key: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            id: Some(id.into()),
            version: Some(0),
            parent_id: Some(parent_id.into()),
            order_key: Some(order_key.into()),
            ..Self::default()
        }
    }

    /// An unversioned inline node (`b`, `i`, `a`, `br`, ...).
    pub fn inline(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    /// An inline `text` run.
    pub fn text(inner_text: impl Into<String>) -> Self {
        Self {
            kind: "text".to_string(),
            inner_text: Some(inner_text.into()),
            ..Self::default()
        }
    }

    pub fn with_slot(mut self, slot: impl Into<String>) -> Self {
        self.slot_name = Some(slot.into());
        self
    }

    pub fn with_text(mut self, inner_text: impl Into<String>) -> Self {
        self.inner_text = Some(inner_text.into());
        self
    }

    pub fn with_children(mut self, children: Vec<PageNode>) -> Self {
        self.children = Some(children);
        self
    }

    pub fn id(&self) -> &str {
        self.id.as_deref().unwrap_or("")
    }

    /// The externally-assigned element anchor (`attrs.id`), if any.
    pub fn anchor(&self) -> Option<&str> {
        self.attrs
            .as_ref()
            .and_then(|attrs| attrs.get_str("id"))
            .filter(|anchor| !anchor.is_empty())
    }

    pub fn param(&self, key: &str) -> Option<&Value> {
        self.params.as_ref().and_then(|params| params.get(key))
    }

    pub fn param_str(&self, key: &str) -> Option<&str> {
        self.param(key).and_then(Value::as_str)
    }

    pub fn attr(&self, key: &str) -> Option<&Value> {
        self.attrs.as_ref().and_then(|attrs| attrs.get(key))
    }

    pub fn style_value(&self, key: &str) -> Option<&Value> {
        self.attrs.as_ref().and_then(|attrs| attrs.style_value(key))
    }

    pub fn selector(&self, key: &str) -> Option<&StyleBlock> {
        self.selectors.as_ref().and_then(|selectors| selectors.get(key))
    }

    /// Selector block for `key`, created empty when missing.
    pub fn selector_mut(&mut self, key: &str) -> &mut StyleBlock {
        self.selectors
            .get_or_insert_with(BTreeMap::new)
            .entry(key.to_string())
            .or_default()
    }

    pub fn insert_selector(&mut self, key: impl Into<String>, block: StyleBlock) {
        self.selectors
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), block);
    }

    pub fn children(&self) -> &[PageNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    pub fn children_mut(&mut self) -> &mut Vec<PageNode> {
        self.children.get_or_insert_with(Vec::new)
    }

    pub fn push_child(&mut self, child: PageNode) {
        self.children_mut().push(child);
    }

    /// Depth-first pre-order visit of this node and every descendant.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a PageNode)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }

    /// Depth-first pre-order mutable visit.
    pub fn walk_mut(&mut self, visit: &mut impl FnMut(&mut PageNode)) {
        visit(self);
        if let Some(children) = self.children.as_mut() {
            for child in children {
                child.walk_mut(visit);
            }
        }
    }
}

impl Styled for PageNode {
    fn attrs_mut(&mut self) -> &mut Attrs {
        self.attrs.get_or_insert_with(Attrs::styled)
    }

    fn params_mut(&mut self) -> &mut PropertyBag {
        self.params.get_or_insert_with(PropertyBag::new)
    }
}

/// The complete document handed to the importing platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageTree {
    #[serde(rename = "version")]
    pub format_version: u32,
    pub content: PageNode,
    pub settings: PageNode,
    #[serde(rename = "popup")]
    pub overlay: PageNode,
}

impl PageTree {
    /// Every node of the document (content, settings, overlay) in pre-order.
    pub fn nodes(&self) -> Vec<&PageNode> {
        let mut nodes = Vec::new();
        for root in [&self.content, &self.settings, &self.overlay] {
            root.walk(&mut |node| nodes.push(node));
        }
        nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Unit;
    use serde_json::json;

    #[test]
    fn serializes_with_platform_key_names() {
        let mut node = PageNode::structural("Headline/V1", "6Z-a-0", "6Z-p-0", "a0");
        node.set_style_length("padding-top", Dimension::px(12.0));
        node.set_attr("id", "hero");
        let value = serde_json::to_value(&node).expect("node should serialize");
        assert_eq!(value["type"], json!("Headline/V1"));
        assert_eq!(value["parentId"], json!("6Z-p-0"));
        assert_eq!(value["fractionalIndex"], json!("a0"));
        assert_eq!(value["version"], json!(0));
        assert_eq!(value["attrs"]["id"], json!("hero"));
        assert_eq!(value["attrs"]["style"]["padding-top"], json!(12));
        assert_eq!(value["params"]["padding-top--unit"], json!("px"));
        assert!(value.get("children").is_none());
        assert!(value.get("innerText").is_none());
    }

    #[test]
    fn selector_blocks_are_created_on_demand() {
        let mut node = PageNode::inline("Icon/V1");
        node.selector_mut(".fa_icon")
            .set_style_length("font-size", Dimension::new(2.0, Unit::Em));
        let block = node.selector(".fa_icon").expect("block should exist");
        assert_eq!(block.style_value("font-size"), Some(&json!(2)));
        assert_eq!(block.param("font-size--unit"), Some(&json!("em")));
    }

    #[test]
    fn round_trips_through_json() {
        let mut node = PageNode::structural("Button/V1", "x", "", "a0");
        node.set_param("showIds", "a,b");
        node.push_child(PageNode::text("Buy").with_slot("button-main"));
        let text = serde_json::to_string(&node).expect("serialize");
        let back: PageNode = serde_json::from_str(&text).expect("deserialize");
        assert_eq!(back, node);
    }
}
