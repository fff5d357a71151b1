//! Final document assembly: the page settings node and the envelope.

use std::borrow::Cow;

use tracing::warn;

use crate::data::{Attrs, FORMAT_VERSION, PageNode, PageTree, StyleBlock};
use crate::order::key_for;
use crate::producers::empty_modal;
use crate::source::SourceElement;
use crate::style::normalize_font_family;
use crate::value::normalize_color;

const DEFAULT_TEXT_COLOR: &str = "#334155";
const DEFAULT_LINK_COLOR: &str = "#3b82f6";

/// Page-wide settings declared on the content root.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageSettings {
    pub text_color: String,
    pub link_color: String,
    pub font_family: Option<String>,
    pub font_weight: Option<String>,
    pub header_code: String,
    pub footer_code: String,
    pub custom_css: String,
}

impl PageSettings {
    pub fn from_root<E: SourceElement>(root: &E) -> Self {
        let color = |name: &str, fallback: &str| {
            root.non_empty_attribute(name)
                .and_then(normalize_color)
                .or_else(|| normalize_color(fallback))
                .unwrap_or_else(|| fallback.to_string())
        };
        let decoded = |name: &str| {
            root.non_empty_attribute(name)
                .map(|raw| decode_component(name, raw).into_owned())
                .unwrap_or_default()
        };
        Self {
            text_color: color("data-text-color", DEFAULT_TEXT_COLOR),
            link_color: color("data-link-color", DEFAULT_LINK_COLOR),
            font_family: root
                .non_empty_attribute("data-font-family")
                .and_then(normalize_font_family),
            font_weight: root.non_empty_attribute("data-font-weight").map(str::to_string),
            header_code: decoded("data-header-code"),
            footer_code: decoded("data-footer-code"),
            custom_css: decoded("data-custom-css"),
        }
    }
}

/// Percent-decodes an attribute value; malformed input is kept verbatim.
fn decode_component<'a>(name: &str, raw: &'a str) -> Cow<'a, str> {
    match urlencoding::decode(raw) {
        Ok(decoded) => decoded,
        Err(err) => {
            warn!(attribute = name, %err, "attribute is not valid percent-encoding; keeping raw value");
            Cow::Borrowed(raw)
        }
    }
}

/// An unversioned settings child with a fixed id.
fn settings_child(id: &str, kind: &str, parent_id: &str, position: usize) -> PageNode {
    PageNode {
        kind: kind.to_string(),
        id: Some(id.to_string()),
        parent_id: Some(parent_id.to_string()),
        order_key: Some(key_for(position)),
        ..PageNode::default()
    }
}

/// The `settings` node: page style, header code, footer code and custom CSS.
pub fn settings_node(settings: &PageSettings, settings_id: String) -> PageNode {
    let mut page_style = settings_child("page_style", "css", &settings_id, 0);
    let mut attrs = Attrs::styled();
    let style = attrs.style_mut();
    style.set("color", settings.text_color.as_str());
    if let Some(family) = &settings.font_family {
        style.set("font-family", family.as_str());
    }
    if let Some(weight) = &settings.font_weight {
        style.set("font-weight", weight.as_str());
    }
    page_style.attrs = Some(attrs);
    page_style.params = Some(Default::default());
    let mut link = StyleBlock::styled();
    if let Some(link_attrs) = link.attrs.as_mut() {
        link_attrs.style_mut().set("color", settings.link_color.as_str());
    }
    page_style.insert_selector(".elTypographyLink", link);

    let header = settings_child("header-code", "raw", &settings_id, 1)
        .with_text(settings.header_code.as_str());
    let footer = settings_child("footer-code", "raw", &settings_id, 2)
        .with_text(settings.footer_code.as_str());
    let css_text = if settings.custom_css.is_empty() {
        String::new()
    } else {
        format!("\n\n{}", settings.custom_css)
    };
    let css = settings_child("css", "raw", &settings_id, 3).with_text(css_text);

    PageNode {
        kind: "settings".to_string(),
        id: Some(settings_id),
        version: Some(0),
        ..PageNode::default()
    }
    .with_children(vec![page_style, header, footer, css])
}

/// Wraps the parsed trees in the import envelope. A page without a popup
/// gets the platform's empty placeholder.
pub fn assemble(content: PageNode, overlay: Option<PageNode>, settings: PageNode) -> PageTree {
    PageTree {
        format_version: FORMAT_VERSION,
        content,
        settings,
        overlay: overlay.unwrap_or_else(empty_modal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn settings_children_are_ordered_and_unversioned() {
        let settings = PageSettings {
            text_color: "rgb(1, 2, 3)".to_string(),
            link_color: "rgb(4, 5, 6)".to_string(),
            font_family: Some("\"Inter\", sans-serif".to_string()),
            custom_css: ".x { color: red; }".to_string(),
            ..PageSettings::default()
        };
        let node = settings_node(&settings, "6Z-settings-0".to_string());
        let value = serde_json::to_value(&node).expect("serialize");
        assert_eq!(value["type"], json!("settings"));
        assert_eq!(value["version"], json!(0));

        let children = value["children"].as_array().expect("children");
        let ids: Vec<_> = children.iter().map(|c| c["id"].clone()).collect();
        assert_eq!(ids, vec![json!("page_style"), json!("header-code"), json!("footer-code"), json!("css")]);
        for (position, child) in children.iter().enumerate() {
            assert_eq!(child["parentId"], json!("6Z-settings-0"));
            assert_eq!(child["fractionalIndex"], json!(format!("a{position}")));
            assert!(child.get("version").is_none());
        }
        assert_eq!(children[0]["attrs"]["style"]["color"], json!("rgb(1, 2, 3)"));
        assert_eq!(children[0]["attrs"]["style"]["font-family"], json!("\"Inter\", sans-serif"));
        assert_eq!(
            children[0]["selectors"][".elTypographyLink"]["attrs"]["style"]["color"],
            json!("rgb(4, 5, 6)")
        );
        assert_eq!(children[0]["params"], json!({}));
        assert_eq!(children[1]["innerText"], json!(""));
        assert_eq!(children[3]["innerText"], json!("\n\n.x { color: red; }"));
    }

    #[test]
    fn malformed_percent_encoding_is_kept() {
        assert_eq!(decode_component("data-header-code", "%3Cscript%3E"), "<script>");
        assert_eq!(decode_component("data-header-code", "%E0%A4%A"), "%E0%A4%A");
    }

    #[test]
    fn missing_overlay_becomes_placeholder() {
        let tree = assemble(PageNode::default(), None, PageNode::default());
        assert_eq!(tree.format_version, 157);
        assert_eq!(tree.overlay.kind, "ModalContainer/V1");
        assert_eq!(tree.overlay.id(), "");
    }
}
