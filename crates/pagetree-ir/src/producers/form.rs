//! Form fields: text inputs, text areas, select boxes and checkboxes.

use crate::data::{Attrs, PageNode, StyleBlock, Styled};
use crate::kinds::ElementKind;
use crate::order::key_for;
use crate::source::{InlineStyle, SourceElement};
use crate::style::{
    Border, Shadow, apply_border, apply_shadow, apply_spacing, parse_background, parse_border,
    parse_border_radius, parse_shadow, parse_spacing, skip_flag, split_tokens,
};
use crate::traverse::ParseContext;
use crate::value::{
    Dimension, Unit, normalize_color, number, parse_leading_int, parse_leading_number, parse_px,
    parse_value_with_unit,
};

use super::new_node;
use super::rich_text::rich_text;

const FIELD_BACKGROUND: &str = "#ffffff";
const FIELD_BORDER_COLOR: &str = "rgba(0, 0, 0, 0.2)";
const CHECKED_COLOR: &str = "rgb(59, 130, 246)";
const HOLDER: &str = ".inputHolder, .borderHolder";
const WRAPPER_CORNERS: &str = "&.elFormItemWrapper, .inputHolder, .borderHolder";

/// Styling read from the framed box around a field's control.
struct FieldFrame {
    background: String,
    border: Border,
    radius: Option<Dimension>,
    shadow: Option<Shadow>,
    padding_x: Dimension,
    padding_y: Dimension,
}

impl FieldFrame {
    fn read(style: &InlineStyle) -> Self {
        Self {
            background: parse_background(style)
                .color
                .unwrap_or_else(|| FIELD_BACKGROUND.to_string()),
            border: parse_border(style),
            radius: parse_border_radius(style),
            shadow: style.get("box-shadow").and_then(parse_shadow),
            padding_x: style
                .get("padding-left")
                .and_then(parse_px)
                .unwrap_or(Dimension::px(16.0)),
            padding_y: style
                .get("padding-top")
                .and_then(parse_px)
                .unwrap_or(Dimension::px(12.0)),
        }
    }

    /// Writes the frame border, or the platform's thin default when the
    /// source declares none.
    fn apply_border(&self, block: &mut StyleBlock, default_unit: bool) {
        if !self.border.is_empty() {
            apply_border(block, &self.border);
            return;
        }
        block
            .params_mut()
            .set("--style-border-width", 1)
            .set("--style-border-style", "solid")
            .set("--style-border-color", FIELD_BORDER_COLOR);
        if default_unit {
            block.set_param("--style-border-width--unit", "px");
        }
    }

    fn padding_block(&self, block: &mut StyleBlock) {
        block.set_style("padding-top", self.padding_y.value_json());
        block.set_style("padding-bottom", self.padding_y.value_json());
        block.set_param_length("--style-padding-horizontal", self.padding_x);
        block
            .params_mut()
            .set("padding-top--unit", self.padding_y.unit.as_str())
            .set("padding-bottom--unit", self.padding_y.unit.as_str());
    }
}

/// Settings every field wrapper reads from its own attributes.
struct FieldWrapper {
    width: f64,
    align: &'static str,
    label: String,
    margin_top: Dimension,
    required: bool,
}

impl FieldWrapper {
    fn read<E: SourceElement>(element: &E, style: &InlineStyle) -> Self {
        Self {
            width: element
                .non_empty_attribute("data-width")
                .and_then(parse_leading_number)
                .unwrap_or(100.0),
            align: match element.attribute("data-align") {
                Some("left") => "left",
                Some("right") => "right",
                _ => "center",
            },
            label: element
                .attribute("data-placeholder")
                .unwrap_or_default()
                .to_string(),
            margin_top: style
                .get("margin-top")
                .and_then(parse_px)
                .unwrap_or(Dimension::px(0.0)),
            required: element.attribute("data-required") == Some("true"),
        }
    }

    fn required_class(&self) -> &'static str {
        if self.required { "required1" } else { "required0" }
    }

    fn apply(&self, node: &mut PageNode) {
        node.set_style("width", number(self.width));
        node.set_style_length("margin-top", self.margin_top);
        node.params_mut()
            .set("label", self.label.as_str())
            .set("labelType", "on-border")
            .set("width--unit", "%")
            .set("--style-margin-align", self.align);
    }
}

/// Font size and text color of the native control, attribute first.
fn control_typography<E: SourceElement>(
    element: &E,
    control: Option<&E>,
    block: &mut StyleBlock,
) {
    let control_style = control.map(E::inline_style).unwrap_or_default();
    let size = element
        .non_empty_attribute("data-font-size")
        .map(parse_px)
        .unwrap_or_else(|| parse_px(control_style.get("font-size").unwrap_or("16px")));
    if let Some(size) = size {
        block.set_style_length("font-size", size);
    }
    let color = match element.non_empty_attribute("data-color") {
        Some(color) => normalize_color(color),
        None => control_style.get("color").and_then(normalize_color),
    };
    if let Some(color) = color {
        block.set_style("color", color);
    }
}

fn frame_of<E: SourceElement>(element: &E) -> (Option<E>, InlineStyle) {
    let frame = element.find_tag(&["div"]);
    let style = frame.as_ref().map(E::inline_style).unwrap_or_default();
    (frame, style)
}

/// Frame padding, border and corner blocks shared by inputs and text areas.
fn holder_selectors(node: &mut PageNode, frame: &FieldFrame) {
    let mut holder = StyleBlock::styled();
    frame.padding_block(&mut holder);
    frame.apply_border(&mut holder, true);
    node.insert_selector(HOLDER, holder);

    let mut corners = StyleBlock::new();
    corners.attrs_mut().set(
        "data-skip-corners-settings",
        skip_flag(frame.radius.is_some()),
    );
    if let Some(radius) = frame.radius {
        corners.set_style_length("border-radius", radius);
    }
    node.insert_selector(WRAPPER_CORNERS, corners);

    let mut border_holder = StyleBlock::new();
    border_holder.set_param("--style-background-color", frame.background.as_str());
    node.insert_selector(".borderHolder", border_holder);
}

pub(super) fn input<E: SourceElement>(
    element: &E,
    cx: &mut ParseContext,
    parent_id: &str,
    index: usize,
) -> PageNode {
    let style = element.inline_style();
    let wrapper = FieldWrapper::read(element, &style);
    let (frame_el, frame_style) = frame_of(element);
    let frame = FieldFrame::read(&frame_style);
    let input_type = element
        .non_empty_attribute("data-input-type")
        .unwrap_or("email");
    let name = element
        .non_empty_attribute("data-input-name")
        .unwrap_or(input_type);
    let html_type = match input_type {
        "phone_number" => "tel",
        "email" => "email",
        _ => "text",
    };

    let mut node = new_node(cx, ElementKind::Input, parent_id, index);
    let attrs = node.attrs.insert(Attrs::styled());
    attrs
        .set("data-skip-shadow-settings", skip_flag(frame.shadow.is_some()))
        .set("type", html_type);
    wrapper.apply(&mut node);
    node.params_mut()
        .set("type", input_type)
        .set("--style-background-color", frame.background.as_str());
    apply_spacing(&mut node, &parse_spacing(&style));
    if let Some(shadow) = &frame.shadow {
        apply_shadow(&mut node, shadow);
    }

    let mut control = StyleBlock::styled();
    control
        .attrs_mut()
        .set("name", name)
        .set("type", input_type)
        .set("className", wrapper.required_class());
    control.set_param("font-size--unit", "px");
    if input_type == "custom_type" {
        control.set_attr("data-custom-type", name);
    }
    let native = frame_el.as_ref().and_then(|frame| frame.find_tag(&["input"]));
    control_typography(element, native.as_ref(), &mut control);
    node.insert_selector(".elInput", control);
    holder_selectors(&mut node, &frame);
    node
}

pub(super) fn text_area<E: SourceElement>(
    element: &E,
    cx: &mut ParseContext,
    parent_id: &str,
    index: usize,
) -> PageNode {
    let style = element.inline_style();
    let wrapper = FieldWrapper::read(element, &style);
    let (frame_el, frame_style) = frame_of(element);
    let frame = FieldFrame::read(&frame_style);
    let name = element
        .non_empty_attribute("data-textarea-name")
        .unwrap_or("message");
    let height = element
        .non_empty_attribute("data-height")
        .and_then(parse_leading_number)
        .unwrap_or(120.0);

    let mut node = new_node(cx, ElementKind::TextArea, parent_id, index);
    let attrs = node.attrs.insert(Attrs::styled());
    attrs.set("data-skip-shadow-settings", skip_flag(frame.shadow.is_some()));
    wrapper.apply(&mut node);
    node.set_param("--style-background-color", frame.background.as_str());
    node.set_param_length("height", Dimension::px(height));
    apply_spacing(&mut node, &parse_spacing(&style));
    if let Some(shadow) = &frame.shadow {
        apply_shadow(&mut node, shadow);
    }

    let mut control = StyleBlock::styled();
    control
        .attrs_mut()
        .set("name", name)
        .set("type", "custom_type")
        .set("data-custom-type", name)
        .set("className", wrapper.required_class());
    control.set_style_length("height", Dimension::px(height));
    control.set_param("font-size--unit", "px");
    let native = frame_el
        .as_ref()
        .and_then(|frame| frame.find_tag(&["textarea"]));
    control_typography(element, native.as_ref(), &mut control);
    node.insert_selector(".elTextarea", control);
    holder_selectors(&mut node, &frame);
    node
}

pub(super) fn select_box<E: SourceElement>(
    element: &E,
    cx: &mut ParseContext,
    parent_id: &str,
    index: usize,
) -> PageNode {
    let style = element.inline_style();
    let wrapper = FieldWrapper::read(element, &style);
    let (frame_el, frame_style) = frame_of(element);
    let frame = FieldFrame::read(&frame_style);
    let name = element
        .non_empty_attribute("data-select-name")
        .unwrap_or("option");
    let select_type = element
        .non_empty_attribute("data-select-type")
        .unwrap_or("custom_type");

    let mut node = new_node(cx, ElementKind::SelectBox, parent_id, index);
    node.attrs = Some(Attrs::styled());
    wrapper.apply(&mut node);
    node.params_mut()
        .set("--style-padding-horizontal", 0)
        .set("--style-padding-horizontal--unit", "px")
        .set("padding-top--unit", "px")
        .set("padding-bottom--unit", "px");
    apply_spacing(&mut node, &parse_spacing(&style));

    let mut select_wrapper = StyleBlock::new();
    select_wrapper.attrs_mut().set("data-type", select_type);
    node.insert_selector(".elSelectWrapper", select_wrapper);

    let mut select = StyleBlock::styled();
    select
        .attrs_mut()
        .set("data-skip-corners-settings", skip_flag(frame.radius.is_some()))
        .set("data-skip-shadow-settings", skip_flag(frame.shadow.is_some()))
        .set("name", select_type)
        .set("data-custom-type", name)
        .set("className", wrapper.required_class());
    frame.padding_block(&mut select);
    select.set_param("--style-background-color", frame.background.as_str());
    frame.apply_border(&mut select, false);
    if let Some(radius) = frame.radius {
        select.set_style_length("border-radius", radius);
    }
    if let Some(shadow) = &frame.shadow {
        apply_shadow(&mut select, shadow);
    }
    node.insert_selector(".elSelect", select);

    let mut label = StyleBlock::styled();
    label.set_param("font-size--unit", "px");
    let native = frame_el
        .as_ref()
        .and_then(|frame| frame.find_tag(&["select"]));
    control_typography(element, native.as_ref(), &mut label);
    node.insert_selector(".elSelect, .elSelectLabel", label);

    let options = element
        .find_tag(&["select"])
        .map(|select| select.find_descendants(&|el: &E| el.tag_name() == "option"))
        .unwrap_or_default();
    let select_id = node.id().to_string();
    let children = options
        .iter()
        .enumerate()
        .map(|(position, option)| option_node(option, cx, &select_id, position))
        .collect();
    node.with_children(children)
}

fn option_node<E: SourceElement>(
    option: &E,
    cx: &mut ParseContext,
    select_id: &str,
    position: usize,
) -> PageNode {
    let mut node = PageNode::structural("option", cx.next_id(), select_id, key_for(position));
    let mut attrs = Attrs::new();
    attrs.set(
        "value",
        option
            .attribute("value")
            .map(str::to_string)
            .unwrap_or_else(|| option.text_content()),
    );
    node.attrs = Some(attrs);
    let text = PageNode::structural("text", cx.next_id(), node.id(), key_for(0))
        .with_text(option.text_content());
    node.with_children(vec![text])
}

/// `<n>px <style> <color>` of the checkbox square; width and color only.
fn parse_box_border(value: &str) -> Option<(i64, String)> {
    let tokens = split_tokens(value);
    let [width, _style, color @ ..] = tokens.as_slice() else {
        return None;
    };
    if color.is_empty() || !width.ends_with("px") {
        return None;
    }
    let width = parse_leading_int(width)?;
    Some((width, normalize_color(&color.join(" "))?))
}

/// First `span` that is the last element child of its parent.
fn last_child_span<E: SourceElement>(parent: &E) -> Option<E> {
    let children = parent.children();
    let last = children.len().saturating_sub(1);
    for (position, child) in children.iter().enumerate() {
        if child.tag_name() == "span" && position == last {
            return Some(child.clone());
        }
        if let Some(found) = last_child_span(child) {
            return Some(found);
        }
    }
    None
}

pub(super) fn checkbox<E: SourceElement>(
    element: &E,
    cx: &mut ParseContext,
    parent_id: &str,
    index: usize,
) -> PageNode {
    let style = element.inline_style();
    let label = element.find_tag(&["label"]);
    let text_span = label.as_ref().and_then(last_child_span);
    let square_style = label
        .as_ref()
        .and_then(|label| label.find_tag(&["span"]))
        .map(|square| square.inline_style())
        .unwrap_or_default();
    let text_style = text_span
        .as_ref()
        .map(E::inline_style)
        .unwrap_or_default();
    let label_style = label.as_ref().map(E::inline_style).unwrap_or_default();

    let box_size = parse_px(square_style.get("width").unwrap_or("20px")).unwrap_or(Dimension::px(20.0));
    let box_background = normalize_color(square_style.get("background-color").unwrap_or("#ffffff"));
    let (box_border_width, box_border_color) = square_style
        .get("border")
        .and_then(parse_box_border)
        .unwrap_or_else(|| (2, "rgb(229, 231, 235)".to_string()));
    let box_radius = parse_border_radius(&square_style).unwrap_or(Dimension::px(4.0));
    let label_color = normalize_color(text_style.get("color").unwrap_or("#334155"));
    let label_size = parse_px(text_style.get("font-size").unwrap_or("16px")).unwrap_or(Dimension::px(16.0));
    let gap = parse_value_with_unit(label_style.get("gap").unwrap_or("12px"), Unit::Em)
        .unwrap_or(Dimension::new(1.0, Unit::Em));

    let mut node = new_node(cx, ElementKind::Checkbox, parent_id, index);
    node.attrs = Some(Attrs::styled());
    node.params_mut()
        .set("isFormItem", true)
        .set("name", element.non_empty_attribute("data-name").unwrap_or("agree"))
        .set("checked", element.attribute("data-checked") == Some("true"))
        .set("useCheckboxIcon", true)
        .set("required", element.attribute("data-required") == Some("true"));
    apply_spacing(&mut node, &parse_spacing(&style));

    let mut gap_block = StyleBlock::styled();
    gap_block.set_style_length("gap", gap);
    node.insert_selector(".elCheckboxLabel", gap_block);

    let mut square = StyleBlock::styled();
    square.set_style_length("font-size", box_size);
    square.set_style_length("border-radius", box_radius);
    if let Some(background) = box_background {
        square.set_style("background-color", background);
    }
    square
        .params_mut()
        .set("--style-border-style", "solid")
        .set("--style-border-width", box_border_width)
        .set("--style-border-width--unit", "px")
        .set("--style-border-color", box_border_color);
    node.insert_selector(".elCheckboxLabel .elCheckboxInput ~ .elCheckbox", square);

    let mut checked = StyleBlock::styled();
    checked.set_style("background-color", CHECKED_COLOR);
    checked.set_param("--style-border-color", CHECKED_COLOR);
    node.insert_selector(".elCheckboxLabel .elCheckboxInput:checked ~ .elCheckbox", checked);

    for selector in [
        ".elCheckboxLabel .elCheckboxInput:checked ~ .elCheckboxText",
        ".elCheckboxLabel .elCheckboxInput ~ .elCheckboxText",
    ] {
        let mut text = StyleBlock::new();
        if let Some(color) = &label_color {
            text.attrs_mut().style_mut().set("color", color.as_str());
        }
        node.insert_selector(selector, text);
    }

    let mut text = StyleBlock::styled();
    text.set_style("font-weight", text_style.get("font-weight").unwrap_or("400"));
    text.set_style_length("font-size", label_size);
    node.insert_selector(".elCheckboxText", text);

    let inline = text_span
        .as_ref()
        .map(|span| rich_text(span, cx, None))
        .unwrap_or_default();
    let editable = PageNode::structural("ContentEditableNode", cx.next_id(), node.id(), key_for(0))
        .with_slot("label")
        .with_children(inline);
    node.push_child(editable);
    node
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_defaults_cover_missing_declarations() {
        let frame = FieldFrame::read(&InlineStyle::default());
        assert_eq!(frame.background, FIELD_BACKGROUND);
        assert_eq!(frame.padding_x, Dimension::px(16.0));
        assert_eq!(frame.padding_y, Dimension::px(12.0));
        assert!(frame.border.is_empty());

        let mut block = StyleBlock::styled();
        frame.apply_border(&mut block, true);
        assert_eq!(block.param("--style-border-color"), Some(&serde_json::json!(FIELD_BORDER_COLOR)));
        assert_eq!(block.param("--style-border-width--unit"), Some(&serde_json::json!("px")));
    }

    #[test]
    fn checkbox_border_reads_width_and_color() {
        assert_eq!(
            parse_box_border("3px solid #ffffff"),
            Some((3, "rgb(255, 255, 255)".to_string()))
        );
        assert_eq!(parse_box_border("thin solid red"), None);
    }
}
