//! Read-only cursor over the annotated source tree.
//!
//! The transducer never touches a concrete DOM; it reads elements through
//! [`SourceElement`]. [`crate::html::HtmlElement`] adapts `scraper`, tests may
//! supply their own implementation.

/// Attribute carrying the element kind tag.
pub const KIND_ATTRIBUTE: &str = "data-type";
/// Class marking decorative overlay layers that never become nodes.
pub const OVERLAY_CLASS: &str = "cf-overlay";

/// Parsed `style="..."` declarations, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineStyle {
    declarations: Vec<(String, String)>,
}

impl InlineStyle {
    /// Splits `prop: value; prop: value`. Declarations missing a property or a
    /// value are dropped; a repeated property keeps its last value.
    pub fn parse(source: &str) -> Self {
        let mut declarations: Vec<(String, String)> = Vec::new();
        for part in source.split(';') {
            let Some((prop, value)) = part.split_once(':') else {
                continue;
            };
            let prop = prop.trim();
            let value = value.trim();
            if prop.is_empty() || value.is_empty() {
                continue;
            }
            if let Some(existing) = declarations.iter_mut().find(|(name, _)| name == prop) {
                existing.1 = value.to_string();
            } else {
                declarations.push((prop.to_string(), value.to_string()));
            }
        }
        Self { declarations }
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, property: &str) -> bool {
        self.get(property).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.declarations
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

/// A child of a source element: either another element or a text run.
#[derive(Debug, Clone)]
pub enum SourceNode<E> {
    Element(E),
    Text(String),
}

/// Read access to one element of the annotated source tree.
pub trait SourceElement: Clone + Sized {
    /// Lower-case tag name (`div`, `span`, ...).
    fn tag_name(&self) -> &str;

    fn attribute(&self, name: &str) -> Option<&str>;

    /// Element children in document order.
    fn children(&self) -> Vec<Self>;

    /// Element and text children in document order.
    fn child_nodes(&self) -> Vec<SourceNode<Self>>;

    /// Concatenated text of the whole subtree.
    fn text_content(&self) -> String;

    /// The declared kind tag, if any. An empty tag counts as absent.
    fn kind(&self) -> Option<&str> {
        self.attribute(KIND_ATTRIBUTE).filter(|kind| !kind.is_empty())
    }

    /// Attribute value treating the empty string as absent.
    fn non_empty_attribute(&self, name: &str) -> Option<&str> {
        self.attribute(name).filter(|value| !value.is_empty())
    }

    fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    fn inline_style(&self) -> InlineStyle {
        self.attribute("style")
            .map(InlineStyle::parse)
            .unwrap_or_default()
    }

    fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    /// First descendant (excluding `self`) in document order matching `predicate`.
    fn find_descendant(&self, predicate: &dyn Fn(&Self) -> bool) -> Option<Self> {
        for child in self.children() {
            if predicate(&child) {
                return Some(child);
            }
            if let Some(found) = child.find_descendant(predicate) {
                return Some(found);
            }
        }
        None
    }

    /// All descendants (excluding `self`) in document order matching `predicate`.
    fn find_descendants(&self, predicate: &dyn Fn(&Self) -> bool) -> Vec<Self> {
        let mut found = Vec::new();
        collect_descendants(self, predicate, &mut found);
        found
    }

    /// First descendant whose tag is one of `tags`.
    fn find_tag(&self, tags: &[&str]) -> Option<Self> {
        self.find_descendant(&|el: &Self| tags.iter().any(|tag| *tag == el.tag_name()))
    }

    /// First descendant carrying `class`.
    fn find_class(&self, class: &str) -> Option<Self> {
        self.find_descendant(&|el: &Self| el.has_class(class))
    }
}

fn collect_descendants<E: SourceElement>(
    element: &E,
    predicate: &dyn Fn(&E) -> bool,
    found: &mut Vec<E>,
) {
    for child in element.children() {
        if predicate(&child) {
            found.push(child.clone());
        }
        collect_descendants(&child, predicate, found);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_declarations_in_order() {
        let style = InlineStyle::parse("color: #112233; font-size:20px ;; bogus; :x; padding-top: ");
        assert_eq!(style.get("color"), Some("#112233"));
        assert_eq!(style.get("font-size"), Some("20px"));
        assert_eq!(style.get("padding-top"), None);
        assert_eq!(style.iter().count(), 2);
    }

    #[test]
    fn keeps_values_containing_colons() {
        let style = InlineStyle::parse("background-image: url(https://cdn.test/a.png); color: red; color: blue");
        assert_eq!(
            style.get("background-image"),
            Some("url(https://cdn.test/a.png)")
        );
        assert_eq!(style.get("color"), Some("blue"));
    }
}
