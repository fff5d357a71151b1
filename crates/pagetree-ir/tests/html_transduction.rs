use anyhow::{Context, Result};
use pagetree_ir::{
    PageNode, PageTree, PageTreeError, ParseOptions, parse_html, schema::validate_page_tree,
    serialize, try_parse_html,
};
use serde_json::{Value, json};

fn stable() -> ParseOptions {
    ParseOptions {
        stable_ids: true,
        ..ParseOptions::default()
    }
}

fn nodes_of_kind<'a>(tree: &'a PageTree, kind: &str) -> Vec<&'a PageNode> {
    tree.nodes()
        .into_iter()
        .filter(|node| node.kind == kind)
        .collect()
}

fn only<'a>(tree: &'a PageTree, kind: &str) -> Result<&'a PageNode> {
    let nodes = nodes_of_kind(tree, kind);
    anyhow::ensure!(nodes.len() == 1, "expected one {kind}, found {}", nodes.len());
    Ok(nodes[0])
}

fn headline_style<'a>(node: &'a PageNode, key: &str) -> Option<&'a Value> {
    node.selector(".elHeadline")
        .and_then(|block| block.style_value(key))
}

fn in_column(body: &str) -> String {
    format!(
        r#"<div data-type="SectionContainer/V1">
             <div data-type="RowContainer/V1">
               <div data-type="ColContainer/V1" style="width: 100%">
                 <div class="col-inner">{body}</div>
               </div>
             </div>
           </div>"#
    )
}

#[test]
fn converts_nested_layout_with_inline_typography() -> Result<()> {
    let html = format!(
        r#"<html><body><div data-type="ContentNode">{}</div></body></html>"#,
        in_column(
            r#"<div data-type="Headline/V1"><h1 style="color: #ff0000; font-size: 32px">Hello</h1></div>"#
        )
    );
    let tree = try_parse_html(&html, &stable())?;
    assert_eq!(tree.format_version, 157);
    assert_eq!(tree.content.kind, "ContentNode");
    assert_eq!(tree.content.id(), "");

    let section = &tree.content.children()[0];
    assert_eq!(section.kind, "SectionContainer/V1");
    assert_eq!(section.parent_id.as_deref(), Some(""));
    assert_eq!(section.order_key.as_deref(), Some("a0"));

    let row = &section.children()[0];
    assert_eq!(row.kind, "RowContainer/V1");
    assert_eq!(row.parent_id.as_deref(), Some(section.id()));
    let column = &row.children()[0];
    assert_eq!(column.kind, "ColContainer/V1");
    let headline = &column.children()[0];
    assert_eq!(headline.kind, "Headline/V1");
    assert_eq!(headline.parent_id.as_deref(), Some(column.id()));
    assert_eq!(headline.version, Some(0));

    assert_eq!(headline_style(headline, "color"), Some(&json!("rgb(255, 0, 0)")));
    assert_eq!(headline_style(headline, "font-size"), Some(&json!(32)));
    let block = headline.selector(".elHeadline").context("typography block")?;
    assert_eq!(block.param("font-size--unit"), Some(&json!("px")));

    let editable = &headline.children()[0];
    assert_eq!(editable.kind, "ContentEditableNode");
    assert_eq!(editable.children()[0].inner_text.as_deref(), Some("Hello"));

    validate_page_tree(&tree)?;
    Ok(())
}

#[test]
fn rewrites_anchor_references_to_internal_ids() -> Result<()> {
    let button = r##"<div data-type="Button/V1"
                          data-show-ids="anchor-A,anchor-B"
                          data-href="#scroll-anchor-A">
                       <a href="#"><span>Go</span></a>
                     </div>"##;
    let html = format!(
        r#"<div data-type="ContentNode">
             <div data-type="SectionContainer/V1" id="anchor-A"></div>
             {}
           </div>"#,
        in_column(button)
    );
    let tree = try_parse_html(&html, &stable())?;
    let target = &tree.content.children()[0];
    assert_eq!(target.anchor(), Some("anchor-A"));

    let button = only(&tree, "Button/V1")?;
    assert_eq!(
        button.param_str("showIds"),
        Some(format!("id-{},anchor-B", target.id()).as_str())
    );
    assert_eq!(
        button.param_str("href"),
        Some(format!("#scroll-id-{}", target.id()).as_str())
    );
    Ok(())
}

#[test]
fn document_without_content_root_yields_nothing() {
    let html = "<html><body><div><p>Plain page</p></div></body></html>";
    assert!(parse_html(html, &ParseOptions::default()).is_none());
    assert!(matches!(
        try_parse_html(html, &ParseOptions::default()),
        Err(PageTreeError::MissingContentRoot)
    ));
}

#[test]
fn sibling_sections_get_consecutive_keys() -> Result<()> {
    let html = r#"<div data-type="ContentNode">
                    <div data-type="SectionContainer/V1"></div>
                    <div data-type="SectionContainer/V1"></div>
                  </div>"#;
    let tree = try_parse_html(html, &stable())?;
    let keys: Vec<_> = tree
        .content
        .children()
        .iter()
        .map(|child| child.order_key.as_deref())
        .collect();
    assert_eq!(keys, vec![Some("a0"), Some("a1")]);
    Ok(())
}

#[test]
fn elided_and_dropped_elements_leave_no_gaps() -> Result<()> {
    let html = format!(
        r#"<div data-type="ContentNode">
             <div class="wrapper">
               <div data-type="SectionContainer/V1"></div>
             </div>
             <div class="cf-overlay"><div data-type="SectionContainer/V1"></div></div>
             <div data-type="Mystery/V1"></div>
             {}
           </div>"#,
        in_column(
            r#"<div data-type="ColInner/V1">
                 <div data-type="Headline/V1"><h1>One</h1></div>
               </div>
               <div data-type="SectionContainer/V1"></div>
               <div data-type="Paragraph/V1"><p>Two</p></div>"#
        )
    );
    let tree = try_parse_html(&html, &stable())?;
    let sections = tree.content.children();
    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0].order_key.as_deref(), Some("a0"));
    assert_eq!(sections[1].order_key.as_deref(), Some("a1"));

    let column = &sections[1].children()[0].children()[0];
    let kinds: Vec<_> = column.children().iter().map(|c| c.kind.as_str()).collect();
    assert_eq!(kinds, vec!["Headline/V1", "Paragraph/V1"]);
    let keys: Vec<_> = column
        .children()
        .iter()
        .map(|c| c.order_key.as_deref())
        .collect();
    assert_eq!(keys, vec![Some("a0"), Some("a1")]);
    Ok(())
}

#[test]
fn stacking_context_wrapper_splices_its_children() -> Result<()> {
    let html = format!(
        r#"<div data-type="ContentNode">{}</div>"#,
        in_column(
            r#"<div style="z-index: 2">
                 <div data-type="Headline/V1"><h1>One</h1></div>
                 <div data-type="Paragraph/V1"><p>Two</p></div>
               </div>
               <div data-type="Headline/V1"><h1>Three</h1></div>"#
        )
    );
    let tree = try_parse_html(&html, &stable())?;
    let column = only(&tree, "ColContainer/V1")?;
    let children = column.children();
    let kinds: Vec<_> = children.iter().map(|c| c.kind.as_str()).collect();
    assert_eq!(kinds, vec!["Headline/V1", "Paragraph/V1", "Headline/V1"]);
    let keys: Vec<_> = children.iter().map(|c| c.order_key.as_deref()).collect();
    assert_eq!(keys, vec![Some("a0"), Some("a1"), Some("a2")]);
    assert!(
        children
            .iter()
            .all(|c| c.parent_id.as_deref() == Some(column.id()))
    );
    Ok(())
}

#[test]
fn kindless_wrapper_inside_flex_is_dived_through() -> Result<()> {
    let html = format!(
        r#"<div data-type="ContentNode">{}</div>"#,
        in_column(
            r#"<div data-type="FlexContainer/V1">
                 <div class="hidden-template">
                   <div data-type="Headline/V1"><h1>Inside</h1></div>
                 </div>
                 <div data-type="Paragraph/V1"><p>After</p></div>
               </div>"#
        )
    );
    let tree = try_parse_html(&html, &stable())?;
    let flex = only(&tree, "FlexContainer/V1")?;
    let kinds: Vec<_> = flex.children().iter().map(|c| c.kind.as_str()).collect();
    assert_eq!(kinds, vec!["Headline/V1", "Paragraph/V1"]);
    let keys: Vec<_> = flex
        .children()
        .iter()
        .map(|c| c.order_key.as_deref())
        .collect();
    assert_eq!(keys, vec![Some("a0"), Some("a1")]);
    Ok(())
}

#[test]
fn color_falls_through_override_inline_inherited_fallback() -> Result<()> {
    let body = r##"
        <div data-type="Headline/V1" data-color="#00ff00"><h1 style="color: #ff0000">A</h1></div>
        <div data-type="Headline/V1"><h1 style="color: #ff0000">B</h1></div>
        <div data-type="Headline/V1"><h1>C</h1></div>"##;
    let inherited = format!(
        r##"<div data-type="ContentNode" data-text-color="#0000ff">{}</div>"##,
        in_column(body)
    );
    let tree = try_parse_html(&inherited, &stable())?;
    let colors: Vec<_> = nodes_of_kind(&tree, "Headline/V1")
        .into_iter()
        .map(|node| headline_style(node, "color").cloned())
        .collect();
    assert_eq!(
        colors,
        vec![
            Some(json!("rgb(0, 255, 0)")),
            Some(json!("rgb(255, 0, 0)")),
            Some(json!("rgb(0, 0, 255)")),
        ]
    );

    let bare = format!(r#"<div data-type="ContentNode">{}</div>"#, in_column(body));
    let tree = try_parse_html(&bare, &stable())?;
    let last = nodes_of_kind(&tree, "Headline/V1")
        .into_iter()
        .last()
        .context("headline")?;
    assert_eq!(headline_style(last, "color"), Some(&json!("rgb(0, 0, 0)")));
    Ok(())
}

#[test]
fn wrapper_inline_style_backs_up_the_inner_text_element() -> Result<()> {
    let body = r##"
        <div data-type="Headline/V1" style="color: #112233; font-size: 20px"><h1 style="margin: 0">A</h1></div>
        <div data-type="Headline/V1" style="color: #112233; font-size: 20px"><h1 style="color: #ff0000">B</h1></div>"##;
    let html = format!(r#"<div data-type="ContentNode">{}</div>"#, in_column(body));
    let tree = try_parse_html(&html, &stable())?;
    let headlines = nodes_of_kind(&tree, "Headline/V1");
    assert_eq!(headlines.len(), 2);

    assert_eq!(headline_style(headlines[0], "color"), Some(&json!("rgb(17, 34, 51)")));
    assert_eq!(headline_style(headlines[0], "font-size"), Some(&json!(20)));
    assert_eq!(headline_style(headlines[1], "color"), Some(&json!("rgb(255, 0, 0)")));
    assert_eq!(headline_style(headlines[1], "font-size"), Some(&json!(20)));
    Ok(())
}

#[test]
fn settings_carry_page_defaults_and_decoded_code() -> Result<()> {
    let html = r##"<div data-type="ContentNode"
                       data-text-color="#112233"
                       data-link-color="#445566"
                       data-header-code="%3Cscript%3Ealert(1)%3C%2Fscript%3E"
                       data-custom-css=".hero%20%7B%20color%3A%20red%3B%20%7D"></div>"##;
    let tree = try_parse_html(html, &stable())?;
    assert_eq!(tree.settings.kind, "settings");
    let children = tree.settings.children();
    assert_eq!(children.len(), 4);

    let page_style = &children[0];
    assert_eq!(page_style.id(), "page_style");
    assert_eq!(page_style.style_value("color"), Some(&json!("rgb(17, 34, 51)")));
    let link = page_style
        .selector(".elTypographyLink")
        .context("link selector")?;
    assert_eq!(link.style_value("color"), Some(&json!("rgb(68, 85, 102)")));

    assert_eq!(children[1].inner_text.as_deref(), Some("<script>alert(1)</script>"));
    assert_eq!(children[2].inner_text.as_deref(), Some(""));
    assert_eq!(children[3].inner_text.as_deref(), Some("\n\n.hero { color: red; }"));
    Ok(())
}

#[test]
fn settings_use_defaults_when_root_declares_nothing() -> Result<()> {
    let tree = try_parse_html(r#"<div data-type="ContentNode"></div>"#, &stable())?;
    let page_style = &tree.settings.children()[0];
    assert_eq!(page_style.style_value("color"), Some(&json!("rgb(51, 65, 85)")));
    assert_eq!(page_style.style_value("font-family"), None);
    assert_eq!(tree.settings.children()[3].inner_text.as_deref(), Some(""));
    Ok(())
}

#[test]
fn popup_is_parsed_or_replaced_by_placeholder() -> Result<()> {
    let without = try_parse_html(r#"<div data-type="ContentNode"></div>"#, &stable())?;
    assert_eq!(without.overlay.kind, "ModalContainer/V1");
    assert_eq!(without.overlay.id(), "");
    assert!(without.overlay.selector(".containerModal").is_some());

    let with = try_parse_html(
        r##"<div data-type="ContentNode">
              <div data-type="SectionContainer/V1" id="offer"></div>
            </div>
            <div class="cf-popup-wrapper" data-type="ModalContainer/V1" data-popup-width="600px">
              <div class="containerModal">
                <div class="elModalInnerContainer">
                  <div data-type="SectionContainer/V1">
                    <div data-type="RowContainer/V1">
                      <div data-type="ColContainer/V1">
                        <div data-type="Button/V1" data-href="#scroll-offer"><a><span>See offer</span></a></div>
                      </div>
                    </div>
                  </div>
                </div>
              </div>
            </div>"##,
        &stable(),
    )?;
    let popup = &with.overlay;
    assert!(!popup.id().is_empty());
    assert!(popup.parent_id.is_none());
    let inner = popup
        .selector(".elModalInnerContainer")
        .context("inner container")?;
    assert_eq!(inner.style_value("width"), Some(&json!(600)));

    let section = &popup.children()[0];
    assert_eq!(section.parent_id.as_deref(), Some(popup.id()));
    assert_eq!(section.order_key.as_deref(), Some("a0"));

    let offer = &with.content.children()[0];
    let button = only(&with, "Button/V1")?;
    assert_eq!(
        button.param_str("href"),
        Some(format!("#scroll-id-{}", offer.id()).as_str())
    );
    validate_page_tree(&with)?;
    Ok(())
}

#[test]
fn content_buttons_resolve_anchors_declared_in_the_popup() -> Result<()> {
    let button = r##"<div data-type="Button/V1"
                          data-show-ids="promo,missing"
                          data-href="#scroll-promo">
                       <a><span>Open</span></a>
                     </div>"##;
    let html = format!(
        r#"<div data-type="ContentNode">{}</div>
           <div class="cf-popup-wrapper" data-type="ModalContainer/V1">
             <div class="containerModal">
               <div class="elModalInnerContainer">
                 <div data-type="SectionContainer/V1" id="promo"></div>
               </div>
             </div>
           </div>"#,
        in_column(button)
    );
    let tree = try_parse_html(&html, &stable())?;
    let promo = &tree.overlay.children()[0];
    assert_eq!(promo.anchor(), Some("promo"));

    let button = only(&tree, "Button/V1")?;
    assert_eq!(
        button.param_str("showIds"),
        Some(format!("id-{},missing", promo.id()).as_str())
    );
    assert_eq!(
        button.param_str("href"),
        Some(format!("#scroll-id-{}", promo.id()).as_str())
    );
    Ok(())
}

#[test]
fn embedded_styleguide_decorates_text() -> Result<()> {
    let html = format!(
        r##"<script id="cf-styleguide-data" type="application/json">
              {{
                "typography": {{ "baseSize": 16, "scaleRatio": 1.25, "headlineFont": "Poppins" }},
                "paintThemes": [{{ "id": "dark", "headlineColorId": 1 }}],
                "colors": [{{ "id": 1, "hex": "#ffffff" }}]
              }}
            </script>
            <div data-type="ContentNode">
              <div data-paint-colors="dark">{}</div>
            </div>"##,
        in_column(r#"<div data-type="Headline/V1" data-size="s"><h1>Dark</h1></div>"#)
    );
    let tree = try_parse_html(&html, &stable())?;
    let headline = only(&tree, "Headline/V1")?;
    assert_eq!(headline_style(headline, "color"), Some(&json!("rgb(255, 255, 255)")));
    assert_eq!(headline_style(headline, "font-size"), Some(&json!(20)));
    assert_eq!(headline_style(headline, "font-family"), Some(&json!("\"Poppins\", sans-serif")));
    Ok(())
}

#[test]
fn supplied_styleguide_takes_precedence_over_embedded() -> Result<()> {
    let html = format!(
        r##"<script id="cf-styleguide-data">{{ "typography": {{ "headlineFont": "Lora" }} }}</script>
            <div data-type="ContentNode">{}</div>"##,
        in_column(r#"<div data-type="Headline/V1"><h1>Font</h1></div>"#)
    );
    let options =
        stable().with_styleguide_json(r#"{ "typography": { "headlineFont": "Poppins" } }"#)?;
    let tree = try_parse_html(&html, &options)?;
    let headline = only(&tree, "Headline/V1")?;
    assert_eq!(headline_style(headline, "font-family"), Some(&json!("\"Poppins\", sans-serif")));
    Ok(())
}

#[test]
fn invalid_supplied_styleguide_is_an_error() {
    let result = ParseOptions::default().with_styleguide_json("{ nope");
    assert!(matches!(result, Err(PageTreeError::Styleguide(_))));
}

#[test]
fn animation_settings_are_copied_when_enabled() -> Result<()> {
    let html = format!(
        r#"<div data-type="ContentNode">{}</div>"#,
        in_column(
            r#"<div data-type="Headline/V1"
                    data-skip-animation-settings="false"
                    data-animation-type="fade-in"
                    data-animation-time="800ms"
                    data-animation-once="true"><h1>Moving</h1></div>
               <div data-type="Headline/V1" data-animation-type="fade-in"><h1>Still</h1></div>"#
        )
    );
    let tree = try_parse_html(&html, &stable())?;
    let headlines = nodes_of_kind(&tree, "Headline/V1");
    let animated = headlines[0];
    assert_eq!(animated.attr("data-animation-type"), Some(&json!("fade-in")));
    assert_eq!(animated.attr("data-animation-time"), Some(&json!(800)));
    assert_eq!(animated.param_str("data-animation-time--unit"), Some("ms"));
    assert_eq!(animated.attr("data-animation-once"), Some(&json!(true)));
    assert_eq!(headlines[1].attr("data-animation-type"), None);
    Ok(())
}

#[test]
fn stable_ids_make_output_reproducible() -> Result<()> {
    let html = format!(
        r#"<div data-type="ContentNode">{}</div>"#,
        in_column(r#"<div data-type="Paragraph/V1"><p>Same <a href="/x">link</a></p></div>"#)
    );
    let first = serialize(&try_parse_html(&html, &stable())?, false)?;
    let second = serialize(&try_parse_html(&html, &stable())?, false)?;
    assert_eq!(first, second);

    let random = try_parse_html(&html, &ParseOptions::default())?;
    for node in random.nodes() {
        if let Some(id) = node.id.as_deref().filter(|id| id.starts_with("6Z-")) {
            let token = &id[3..id.len() - 2];
            assert_eq!(token.len(), 10);
            assert!(id.ends_with("-0"));
        }
    }
    Ok(())
}

#[test]
fn serialized_output_uses_platform_envelope() -> Result<()> {
    let tree = try_parse_html(r#"<div data-type="ContentNode"></div>"#, &stable())?;
    let value: Value = serde_json::from_str(&serialize(&tree, true)?)?;
    let object = value.as_object().context("envelope object")?;
    let mut keys: Vec<_> = object.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["content", "popup", "settings", "version"]);
    assert_eq!(value["version"], json!(157));
    Ok(())
}
