//! Styleguide decoration.
//!
//! The builder applies design-system fonts, paint-theme colors and size
//! presets at render time, so the exported markup does not carry them.
//! Decoration computes the attributes the builder would have written and
//! keeps them beside the parsed document; [`super::HtmlElement`] consults
//! them before the element's own attributes.

use std::collections::HashMap;

use ego_tree::NodeId;
use scraper::{ElementRef, Html};
use tracing::debug;

use crate::kinds::ElementKind;
use crate::source::KIND_ATTRIBUTE;
use crate::styleguide::{ScaleRole, Styleguide, ThemeColors, Typography};

const PAINT_ATTRIBUTE: &str = "data-paint-colors";

/// Attribute values layered over the parsed document, keyed by tree node.
#[derive(Debug, Default, Clone)]
pub struct Decorations {
    attributes: HashMap<NodeId, HashMap<String, String>>,
}

impl Decorations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, node: NodeId, name: &str) -> Option<&str> {
        self.attributes
            .get(&node)
            .and_then(|attributes| attributes.get(name))
            .map(String::as_str)
    }

    pub fn set(&mut self, node: NodeId, name: &str, value: impl Into<String>) {
        self.attributes
            .entry(node)
            .or_default()
            .insert(name.to_string(), value.into());
    }

    /// Number of decorated elements.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

/// Computes the decorations `styleguide` implies for `html`: fonts first,
/// then paint-theme colors, then resolved size presets.
pub fn decorate(html: &Html, styleguide: &Styleguide) -> Decorations {
    let elements = typed_elements(html);
    let mut decorations = Decorations::new();
    if let Some(typography) = &styleguide.typography {
        apply_fonts(&elements, typography, &mut decorations);
    }
    if !styleguide.paint_themes.is_empty() {
        apply_paint_themes(&elements, styleguide, &mut decorations);
    }
    if let Some(typography) = &styleguide.typography {
        resolve_size_presets(&elements, typography, &mut decorations);
    }
    debug!(elements = decorations.len(), "styleguide decoration applied");
    decorations
}

/// Every element with a known kind, in document order.
fn typed_elements(html: &Html) -> Vec<(ElementRef<'_>, ElementKind)> {
    html.tree
        .root()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter_map(|element| {
            let kind = ElementKind::from_tag(element.value().attr(KIND_ATTRIBUTE)?)?;
            Some((element, kind))
        })
        .collect()
}

fn apply_fonts(
    elements: &[(ElementRef<'_>, ElementKind)],
    typography: &Typography,
    decorations: &mut Decorations,
) {
    for (element, kind) in elements {
        if element.value().attr("data-font").is_some() {
            continue;
        }
        let font = match kind {
            ElementKind::Headline => typography.headline_font.as_deref(),
            ElementKind::SubHeadline => typography.subheadline_font.as_deref(),
            ElementKind::Paragraph => typography.content_font.as_deref(),
            _ => None,
        };
        if let Some(font) = font {
            decorations.set(element.id(), "data-font", font);
        }
    }
}

/// The nearest element carrying a paint theme, the element itself included.
fn closest_paint_container<'a>(element: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    std::iter::once(*element)
        .chain(element.ancestors().filter_map(ElementRef::wrap))
        .find(|candidate| candidate.value().attr(PAINT_ATTRIBUTE).is_some())
}

/// Colors an element only when its nearest paint container is a strict
/// ancestor whose theme is known. Later themes win over earlier ones with
/// the same id.
fn apply_paint_themes(
    elements: &[(ElementRef<'_>, ElementKind)],
    styleguide: &Styleguide,
    decorations: &mut Decorations,
) {
    for (element, kind) in elements {
        let Some(container) = closest_paint_container(element) else {
            continue;
        };
        if container.id() == element.id() {
            continue;
        }
        let Some(theme_id) = container.value().attr(PAINT_ATTRIBUTE) else {
            continue;
        };
        let Some(theme) = styleguide
            .paint_themes
            .iter()
            .rev()
            .find(|theme| theme.id.as_str() == theme_id)
        else {
            continue;
        };
        let colors = styleguide.theme_colors(theme);
        paint_element(element, *kind, &colors, decorations);
    }
}

fn paint_element(
    element: &ElementRef<'_>,
    kind: ElementKind,
    colors: &ThemeColors,
    decorations: &mut Decorations,
) {
    let has = |name: &str| element.value().attr(name).is_some();
    let node = element.id();
    let text_color = match kind {
        ElementKind::Headline => Some(&colors.headline),
        ElementKind::SubHeadline => Some(&colors.subheadline),
        ElementKind::Paragraph => Some(&colors.content),
        ElementKind::Icon => Some(&colors.icon),
        ElementKind::BulletList => {
            if !has("data-text-color-explicit") {
                decorations.set(node, "data-text-color", colors.content.as_str());
            }
            if !has("data-icon-color-explicit") {
                decorations.set(node, "data-icon-color", colors.icon.as_str());
            }
            None
        }
        _ => return,
    };
    if let Some(color) = text_color.filter(|_| !has("data-color-explicit")) {
        decorations.set(node, "data-color", color.as_str());
    }
    if kind != ElementKind::Icon {
        if let Some(link) = &colors.link {
            decorations.set(node, "data-link-color", link.as_str());
        }
    }
}

fn resolve_size_presets(
    elements: &[(ElementRef<'_>, ElementKind)],
    typography: &Typography,
    decorations: &mut Decorations,
) {
    for (element, kind) in elements {
        let role = match kind {
            ElementKind::Headline => ScaleRole::Headline,
            ElementKind::SubHeadline => ScaleRole::Subheadline,
            ElementKind::Paragraph | ElementKind::BulletList => ScaleRole::Paragraph,
            _ => continue,
        };
        let Some(preset) = element.value().attr("data-size") else {
            continue;
        };
        if let Some(size) = typography.preset_size(role, preset) {
            decorations.set(element.id(), "data-size-resolved", format!("{size}px"));
        }
    }
}
