use std::sync::OnceLock;

use anyhow::{Context, Result, anyhow};
use jsonschema::{Draft, JSONSchema};
use serde_json::Value;

use crate::data::PageTree;

static PAGE_TREE_SCHEMA: OnceLock<Result<JSONSchema, String>> = OnceLock::new();

fn compile_schema(source: &'static str) -> Result<JSONSchema, String> {
    let schema_value: Value = serde_json::from_str(source)
        .map_err(|err| format!("embedded schema is not JSON: {err}"))?;
    JSONSchema::options()
        .with_draft(Draft::Draft202012)
        .compile(&schema_value)
        .map_err(|err| format!("embedded schema does not compile: {err}"))
}

fn page_tree_schema() -> Result<&'static JSONSchema> {
    PAGE_TREE_SCHEMA
        .get_or_init(|| compile_schema(include_str!("../schema/pagetree.schema.json")))
        .as_ref()
        .map_err(|err| anyhow!("{err}"))
}

/// Validates a `serde_json::Value` against the page tree schema.
pub fn validate_page_tree_value(value: &Value) -> Result<()> {
    let schema = page_tree_schema()?;
    if let Err(errors) = schema.validate(value) {
        let messages: Vec<String> = errors
            .into_iter()
            .map(|err| format!("{} at {}", err, err.instance_path))
            .collect();
        let joined = messages.join("\n");
        return Err(anyhow!("page tree failed schema validation:\n{joined}"));
    }
    Ok(())
}

/// Validates an assembled [`PageTree`] against the page tree schema.
pub fn validate_page_tree(tree: &PageTree) -> Result<()> {
    let value = serde_json::to_value(tree).context("failed to convert page tree to JSON")?;
    validate_page_tree_value(&value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_minimal_document() -> Result<()> {
        let value = json!({
            "version": 157,
            "content": { "type": "ContentNode", "id": "", "version": 0, "children": [] },
            "settings": { "type": "settings", "id": "6Z-AAAAAAAAAA-0", "version": 0 },
            "popup": {
                "type": "ModalContainer/V1",
                "id": "",
                "version": 0,
                "selectors": { ".containerModal": { "attrs": { "style": { "margin-bottom": 0 } } } }
            }
        });
        validate_page_tree_value(&value)
    }

    #[test]
    fn rejects_node_without_type() {
        let value = json!({
            "version": 157,
            "content": { "id": "" },
            "settings": { "type": "settings" },
            "popup": { "type": "ModalContainer/V1" }
        });
        assert!(validate_page_tree_value(&value).is_err());
    }

    #[test]
    fn rejects_malformed_order_key() {
        let value = json!({
            "version": 157,
            "content": {
                "type": "ContentNode",
                "children": [{ "type": "SectionContainer/V1", "fractionalIndex": "0a" }]
            },
            "settings": { "type": "settings" },
            "popup": { "type": "ModalContainer/V1" }
        });
        assert!(validate_page_tree_value(&value).is_err());
    }
}
