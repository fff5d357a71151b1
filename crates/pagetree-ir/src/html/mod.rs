//! HTML adapter: exposes a parsed `scraper` document through
//! [`SourceElement`], with styleguide decorations layered over the
//! element attributes.

mod decorate;

use scraper::{ElementRef, Html, Node, Selector};
use tracing::warn;

use crate::source::{SourceElement, SourceNode};
use crate::styleguide::Styleguide;

pub use decorate::{Decorations, decorate};

const STYLEGUIDE_SELECTOR: &str = "#cf-styleguide-data";
const CONTENT_ROOT_SELECTOR: &str = r#"[data-type="ContentNode"]"#;
const POPUP_ROOT_SELECTOR: &str = r#".cf-popup-wrapper[data-type="ModalContainer/V1"]"#;

/// A parsed builder export plus the decorations computed for it.
pub struct HtmlDocument {
    html: Html,
    decorations: Decorations,
}

impl HtmlDocument {
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
            decorations: Decorations::new(),
        }
    }

    /// The styleguide the builder embeds in `<script id="cf-styleguide-data">`.
    /// Malformed JSON is logged and ignored.
    pub fn embedded_styleguide(&self) -> Option<Styleguide> {
        let script = self.select_first(STYLEGUIDE_SELECTOR)?;
        let raw = script.text().collect::<String>();
        match Styleguide::from_json(raw.trim()) {
            Ok(styleguide) => Some(styleguide),
            Err(err) => {
                warn!(%err, "failed to parse embedded styleguide data");
                None
            }
        }
    }

    /// Replaces the decorations with those `styleguide` implies.
    pub fn apply_styleguide(&mut self, styleguide: &Styleguide) {
        self.decorations = decorate(&self.html, styleguide);
    }

    /// First `ContentNode` element in document order.
    pub fn content_root(&self) -> Option<HtmlElement<'_>> {
        self.select_first(CONTENT_ROOT_SELECTOR)
            .map(|element| self.element(element))
    }

    /// The rendered popup wrapper, if the page has one.
    pub fn popup_root(&self) -> Option<HtmlElement<'_>> {
        self.select_first(POPUP_ROOT_SELECTOR)
            .map(|element| self.element(element))
    }

    fn select_first(&self, selector: &str) -> Option<ElementRef<'_>> {
        let selector = Selector::parse(selector).ok()?;
        self.html.select(&selector).next()
    }

    fn element<'a>(&'a self, element: ElementRef<'a>) -> HtmlElement<'a> {
        HtmlElement {
            element,
            decorations: &self.decorations,
        }
    }
}

/// Cursor over one element of an [`HtmlDocument`].
#[derive(Clone, Copy)]
pub struct HtmlElement<'a> {
    element: ElementRef<'a>,
    decorations: &'a Decorations,
}

impl<'a> HtmlElement<'a> {
    fn wrap(&self, element: ElementRef<'a>) -> Self {
        Self {
            element,
            decorations: self.decorations,
        }
    }
}

impl std::fmt::Debug for HtmlElement<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HtmlElement")
            .field("tag", &self.element.value().name())
            .field("kind", &self.kind())
            .finish()
    }
}

impl SourceElement for HtmlElement<'_> {
    fn tag_name(&self) -> &str {
        self.element.value().name()
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.decorations
            .get(self.element.id(), name)
            .or_else(|| self.element.value().attr(name))
    }

    fn children(&self) -> Vec<Self> {
        self.element
            .children()
            .filter_map(ElementRef::wrap)
            .map(|child| self.wrap(child))
            .collect()
    }

    fn child_nodes(&self) -> Vec<SourceNode<Self>> {
        self.element
            .children()
            .filter_map(|child| match child.value() {
                Node::Text(text) => Some(SourceNode::Text(text.text.to_string())),
                Node::Element(_) => ElementRef::wrap(child).map(|el| SourceNode::Element(self.wrap(el))),
                _ => None,
            })
            .collect()
    }

    fn text_content(&self) -> String {
        self.element.text().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_roots_and_reads_attributes() {
        let document = HtmlDocument::parse(
            r##"<body>
                 <div data-type="ContentNode" data-text-color="#111">
                   <p>Hello <b>there</b></p>
                 </div>
                 <div class="cf-popup-wrapper" data-type="ModalContainer/V1"></div>
               </body>"##,
        );
        let root = document.content_root().expect("content root");
        assert_eq!(root.kind(), Some("ContentNode"));
        assert_eq!(root.attribute("data-text-color"), Some("#111"));

        let paragraph = root.find_tag(&["p"]).expect("paragraph");
        assert_eq!(paragraph.text_content(), "Hello there");
        let nodes = paragraph.child_nodes();
        assert_eq!(nodes.len(), 2);
        assert!(matches!(&nodes[0], SourceNode::Text(text) if text == "Hello "));
        assert!(matches!(&nodes[1], SourceNode::Element(el) if el.tag_name() == "b"));

        assert!(document.popup_root().is_some());
    }

    #[test]
    fn missing_content_root_is_none() {
        let document = HtmlDocument::parse("<div><p>no root</p></div>");
        assert!(document.content_root().is_none());
        assert!(document.popup_root().is_none());
    }

    #[test]
    fn malformed_embedded_styleguide_is_ignored() {
        let document = HtmlDocument::parse(
            r#"<script id="cf-styleguide-data" type="application/json">{ not json</script>"#,
        );
        assert!(document.embedded_styleguide().is_none());
    }

    #[test]
    fn decorations_shadow_source_attributes() -> anyhow::Result<()> {
        let mut document = HtmlDocument::parse(
            r#"<div data-type="ContentNode">
                 <div data-type="Headline/V1" data-size="m"></div>
               </div>"#,
        );
        let guide = Styleguide::from_json(r#"{ "typography": { "baseSize": 16, "scaleRatio": 1.25 } }"#)?;
        document.apply_styleguide(&guide);
        let root = document.content_root().expect("content root");
        let headline = root.find_tag(&["div"]).expect("headline");
        assert_eq!(headline.attribute("data-size-resolved"), Some("25px"));
        assert_eq!(headline.attribute("data-size"), Some("m"));
        Ok(())
    }
}
