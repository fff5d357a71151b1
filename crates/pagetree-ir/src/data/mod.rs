pub mod document;

pub use document::{Attrs, FORMAT_VERSION, PageNode, PageTree, PropertyBag, StyleBlock, Styled};
