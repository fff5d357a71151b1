//! Page tree transducer: converts attribute-annotated page-builder HTML
//! into the platform's pagetree JSON document.

pub mod assemble;
pub mod data;
pub mod error;
pub mod html;
pub mod ids;
pub mod kinds;
pub mod order;
mod producers;
pub mod refs;
pub mod schema;
pub mod source;
pub mod style;
pub mod styleguide;
pub mod traverse;
pub mod value;

use tracing::{error, info};

use crate::assemble::{PageSettings, assemble, settings_node};
use crate::html::HtmlDocument;
use crate::ids::{IdGenerator, RandomIds, SequentialIds};
use crate::kinds::ElementKind;
use crate::producers::{content_node, modal_container};
use crate::refs::resolve_references;
use crate::traverse::{ParseContext, with_root_defaults};

pub use data::{Attrs, FORMAT_VERSION, PageNode, PageTree, PropertyBag, StyleBlock};
pub use error::{PageTreeError, Result};
pub use source::{SourceElement, SourceNode};
pub use styleguide::Styleguide;

/// Options for one parse.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Styleguide to decorate with; when unset the document's embedded one
    /// is used.
    pub styleguide: Option<Styleguide>,
    /// Counter-based ids instead of random ones.
    pub stable_ids: bool,
}

impl ParseOptions {
    pub fn with_styleguide_json(mut self, source: &str) -> Result<Self> {
        self.styleguide = Some(Styleguide::from_json(source).map_err(PageTreeError::Styleguide)?);
        Ok(self)
    }

    fn id_generator(&self) -> Box<dyn IdGenerator> {
        if self.stable_ids {
            Box::new(SequentialIds::new())
        } else {
            Box::new(RandomIds)
        }
    }
}

/// Parses a builder export. Returns `None` (and logs) when the document has
/// no content root.
pub fn parse_html(html: &str, options: &ParseOptions) -> Option<PageTree> {
    match try_parse_html(html, options) {
        Ok(tree) => Some(tree),
        Err(err) => {
            error!(%err, "page tree parse failed");
            None
        }
    }
}

pub fn try_parse_html(html: &str, options: &ParseOptions) -> Result<PageTree> {
    let mut document = HtmlDocument::parse(html);
    let styleguide = options
        .styleguide
        .clone()
        .or_else(|| document.embedded_styleguide());
    if let Some(styleguide) = &styleguide {
        document.apply_styleguide(styleguide);
    }
    let root = document
        .content_root()
        .ok_or(PageTreeError::MissingContentRoot)?;
    let popup = document.popup_root();
    Ok(transduce(&root, popup.as_ref(), options.id_generator(), styleguide))
}

/// Parses an already-located content root and optional popup root from any
/// source tree.
pub fn parse_root<E: SourceElement>(root: &E, popup: Option<&E>, options: &ParseOptions) -> PageTree {
    transduce(root, popup, options.id_generator(), options.styleguide.clone())
}

fn transduce<E: SourceElement>(
    root: &E,
    popup: Option<&E>,
    ids: Box<dyn IdGenerator>,
    styleguide: Option<Styleguide>,
) -> PageTree {
    let mut cx = ParseContext::new(ids, styleguide);

    let mut content = with_root_defaults(&mut cx, ElementKind::ContentNode, root, |cx| {
        content_node(root, cx)
    });
    let mut overlay = popup.map(|popup| modal_container(popup, &mut cx));

    // Both trees share one index, complete before any reference is rewritten.
    resolve_references(&mut content, cx.references());
    if let Some(overlay) = overlay.as_mut() {
        resolve_references(overlay, cx.references());
    }

    let settings = settings_node(&PageSettings::from_root(root), cx.next_id());

    let mut nodes = 0usize;
    content.walk(&mut |_| nodes += 1);
    info!(
        nodes,
        anchors = cx.references().len(),
        popup = overlay.is_some(),
        "page tree assembled"
    );
    assemble(content, overlay, settings)
}

/// Serializes the document, indented when `pretty`.
pub fn serialize(tree: &PageTree, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(tree)?
    } else {
        serde_json::to_string(tree)?
    };
    Ok(json)
}
