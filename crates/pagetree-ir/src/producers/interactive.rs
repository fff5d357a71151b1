//! Progress bars, video popups and countdown timers.

use serde_json::json;
use url::Url;

use crate::data::{Attrs, PageNode, StyleBlock, Styled};
use crate::kinds::ElementKind;
use crate::source::{InlineStyle, SourceElement};
use crate::style::{
    Border, apply_border, apply_shadow, apply_spacing, parse_border, parse_border_radius,
    parse_shadow, parse_spacing, parse_text_align, skip_flag,
};
use crate::traverse::ParseContext;
use crate::value::{
    Dimension, Unit, normalize_color, number, parse_leading_int, parse_px, parse_value_with_unit,
};

use super::{copy_element_anchor, new_node};

const COUNTDOWN_UNITS: [(&str, &str); 7] = [
    ("years", "Years"),
    ("months", "Months"),
    ("weeks", "Weeks"),
    ("days", "Days"),
    ("hours", "Hours"),
    ("minutes", "Minutes"),
    ("seconds", "Seconds"),
];

fn percent_or_full(value: Option<&str>) -> Dimension {
    value
        .and_then(|value| parse_value_with_unit(value, Unit::Percent))
        .unwrap_or(Dimension::new(100.0, Unit::Percent))
}

fn color_or(value: Option<&str>, fallback: &str) -> String {
    value
        .and_then(normalize_color)
        .unwrap_or_else(|| fallback.to_string())
}

pub(super) fn progress_bar<E: SourceElement>(
    element: &E,
    cx: &mut ParseContext,
    parent_id: &str,
    index: usize,
) -> PageNode {
    let style = element.inline_style();
    let track_style = element
        .find_class("progress")
        .map(|track| track.inline_style())
        .unwrap_or_default();
    let fill_style = element
        .find_class("progress-bar")
        .map(|fill| fill.inline_style())
        .unwrap_or_default();
    let label_style = element
        .find_class("progress-label")
        .map(|label| label.inline_style())
        .unwrap_or_default();

    let progress = element
        .non_empty_attribute("data-progress")
        .and_then(parse_leading_int)
        .unwrap_or(50);
    let align = element
        .non_empty_attribute("data-align")
        .or_else(|| style.get("text-align"))
        .unwrap_or("center");
    let width = percent_or_full(
        element
            .non_empty_attribute("data-width")
            .or_else(|| style.get("width")),
    );
    let height = track_style
        .get("height")
        .or_else(|| element.non_empty_attribute("data-height"))
        .and_then(parse_px)
        .unwrap_or(Dimension::px(24.0));
    let radius = parse_border_radius(&track_style);
    let border = parse_border(&track_style);
    let shadow = track_style.get("box-shadow").and_then(parse_shadow);
    let track_color = color_or(
        track_style
            .get("background-color")
            .or_else(|| element.non_empty_attribute("data-bg")),
        "#e2e8f0",
    );
    let fill_color = color_or(
        fill_style
            .get("background-color")
            .or_else(|| element.non_empty_attribute("data-fill")),
        "#3b82f6",
    );
    let label_color = color_or(label_style.get("color"), "#ffffff");

    let mut node = new_node(cx, ElementKind::ProgressBar, parent_id, index);
    node.attrs = Some(Attrs::styled());
    copy_element_anchor(&mut node, element);
    node.params_mut()
        .set("progress", progress)
        .set(
            "progress-text",
            element.attribute("data-text").unwrap_or_default(),
        )
        .set(
            "show_text_outside",
            if element.attribute("data-text-outside") == Some("true") {
                "true"
            } else {
                "false"
            },
        );
    apply_spacing(&mut node, &parse_spacing(&style));

    let mut track = StyleBlock::styled();
    track.set_style_length("width", width);
    track.set_style_length("border-radius", radius.unwrap_or(Dimension::px(9999.0)));
    track.set_attr("data-skip-shadow-settings", skip_flag(shadow.is_some()));
    track.set_attr("data-skip-corners-settings", skip_flag(radius.is_some()));
    track.set_param("--style-background-color", track_color);
    if !border.is_empty() {
        apply_border(&mut track, &border);
    }
    if let Some(shadow) = &shadow {
        apply_shadow(&mut track, shadow);
    }
    node.insert_selector(".progress", track);

    let mut fill = StyleBlock::styled();
    fill.set_style_length("height", height);
    fill.set_param("--style-background-color", fill_color);
    node.insert_selector(".progress-bar", fill);

    let mut label = StyleBlock::styled();
    label.set_style_length("font-size", Dimension::px(16.0));
    label.set_style("text-align", align);
    node.insert_selector(".progress-label", label);

    let mut label_text = StyleBlock::new();
    label_text.attrs_mut().style_mut().set("color", label_color);
    node.insert_selector("& > .progress-label", label_text);
    node
}

/// Video id of a YouTube watch, short or embed url.
pub(crate) fn youtube_id(video_url: &str) -> Option<String> {
    let url = Url::parse(video_url).ok()?;
    let host = url.host_str()?.trim_start_matches("www.").trim_start_matches("m.");
    let id = match host {
        "youtu.be" => url.path_segments()?.next()?.to_string(),
        "youtube.com" => {
            let mut segments = url.path_segments()?;
            match segments.next()? {
                "watch" => url
                    .query_pairs()
                    .find(|(key, _)| key == "v")
                    .map(|(_, value)| value.into_owned())?,
                "embed" => segments.next()?.to_string(),
                _ => return None,
            }
        }
        _ => return None,
    };
    (!id.is_empty()).then_some(id)
}

pub(super) fn video_popup<E: SourceElement>(
    element: &E,
    cx: &mut ParseContext,
    parent_id: &str,
    index: usize,
) -> PageNode {
    let style = element.inline_style();
    let image = element.find_class("elImage");
    let image_style = image.as_ref().map(E::inline_style).unwrap_or_default();
    let alt = image
        .as_ref()
        .and_then(|image| image.attribute("alt"))
        .unwrap_or_default();
    let wrapper_style = element
        .find_class("elImageWrapper")
        .map(|wrapper| wrapper.inline_style())
        .unwrap_or_default();

    let video_url = element.attribute("data-video-url").unwrap_or_default();
    let thumbnail = element
        .non_empty_attribute("data-thumbnail")
        .map(str::to_string)
        .or_else(|| {
            youtube_id(video_url)
                .map(|id| format!("https://img.youtube.com/vi/{id}/maxresdefault.jpg"))
        })
        .unwrap_or_default();
    let width = percent_or_full(
        element
            .non_empty_attribute("data-width")
            .or_else(|| wrapper_style.get("width")),
    );
    let radius = parse_border_radius(&image_style);
    let border = parse_border(&image_style);
    let shadow = image_style.get("box-shadow").and_then(parse_shadow);

    let mut node = new_node(cx, ElementKind::VideoPopup, parent_id, index);
    let mut attrs = Attrs::new();
    attrs.set("alt", if alt.is_empty() { "Video thumbnail" } else { alt });
    node.attrs = Some(attrs);
    copy_element_anchor(&mut node, element);
    node.set_param("imageUrl", json!([{ "type": "text", "innerText": thumbnail }]));
    apply_spacing(&mut node, &parse_spacing(&style));

    let mut picture = StyleBlock::styled();
    picture.set_attr("alt", alt);
    picture.set_style_length("width", width);
    picture.set_style_length("border-radius", radius.unwrap_or(Dimension::px(16.0)));
    picture.set_attr("data-skip-corners-settings", skip_flag(radius.is_some()));
    picture.set_attr("data-skip-shadow-settings", skip_flag(shadow.is_some()));
    if !border.is_empty() {
        apply_border(&mut picture, &border);
    }
    if let Some(shadow) = &shadow {
        apply_shadow(&mut picture, shadow);
    }
    node.insert_selector(".elImage", picture);

    let mut wrapper = StyleBlock::new();
    wrapper
        .attrs_mut()
        .style_mut()
        .set("text-align", parse_text_align(style.get("text-align")));
    node.insert_selector(".elImageWrapper", wrapper);

    let mut player = StyleBlock::new();
    player
        .attrs_mut()
        .set(
            "data-video-type",
            element.non_empty_attribute("data-video-type").unwrap_or("youtube"),
        )
        .set("data-video-title", alt);
    player.set_param("video_url", video_url);
    node.insert_selector(".elVideoWrapper", player);

    let mut placeholder = StyleBlock::new();
    placeholder.attrs_mut().set("className", "bgCoverCenter");
    placeholder.set_param("--style-background-image-url", thumbnail.as_str());
    node.insert_selector(".elVideoWrapper .elVideoplaceholder_inner", placeholder);

    let mut modal = StyleBlock::new();
    modal.set_param(
        "--style-background-color",
        element
            .non_empty_attribute("data-overlay-bg")
            .unwrap_or("rgba(0,0,0,0.8)"),
    );
    node.insert_selector(".elModal", modal);
    node
}

/// Border of the countdown digit boxes: inline declarations, else the
/// `data-border` width shorthand in the number background color.
fn countdown_border<E: SourceElement>(
    element: &E,
    box_style: &InlineStyle,
    number_bg: &str,
) -> Border {
    let border = parse_border(box_style);
    if !border.is_empty() {
        return border;
    }
    let Some(width) = element.non_empty_attribute("data-border") else {
        return border;
    };
    let width = if width.contains("px") {
        width.to_string()
    } else {
        format!("{width}px")
    };
    Border {
        width: parse_px(&width),
        style: Some("solid".to_string()),
        color: Some(color_or(element.non_empty_attribute("data-border-color"), number_bg)),
    }
}

fn shown<E: SourceElement>(element: &E, name: &str) -> bool {
    element.attribute(name) != Some("false")
}

pub(super) fn countdown<E: SourceElement>(
    element: &E,
    cx: &mut ParseContext,
    parent_id: &str,
    index: usize,
) -> PageNode {
    let style = element.inline_style();
    let redirect = element.attribute("data-redirect").unwrap_or_default();
    let number_bg = color_or(element.non_empty_attribute("data-number-bg"), "#1C65E1");
    let number_color = color_or(element.non_empty_attribute("data-number-color"), "#ffffff");
    let label_color = color_or(element.non_empty_attribute("data-label-color"), "#164EAD");

    let row_style = element
        .find_class("elCountdownRow")
        .map(|row| row.inline_style())
        .unwrap_or_default();
    let gap = parse_value_with_unit(row_style.get("gap").unwrap_or("0.65em"), Unit::Em)
        .unwrap_or(Dimension::new(0.65, Unit::Em));
    let box_style = element
        .find_class("elCountdownAmountContainer")
        .map(|amount| amount.inline_style())
        .unwrap_or_default();
    let radius = parse_border_radius(&box_style);
    let shadow = box_style
        .get("box-shadow")
        .and_then(parse_shadow)
        .or_else(|| element.non_empty_attribute("data-shadow").and_then(parse_shadow));
    let border = countdown_border(element, &box_style, &number_bg);
    let number_size = element
        .find_class("elCountdownAmount")
        .and_then(|amount| amount.inline_style().get("font-size").and_then(parse_px))
        .map_or(28.0, |size| size.value);
    let label_size = element
        .find_class("elCountdownPeriod")
        .and_then(|period| period.inline_style().get("font-size").and_then(parse_px))
        .map_or(11.0, |size| size.value);

    let mut node = new_node(cx, ElementKind::Countdown, parent_id, index);
    node.attrs = Some(Attrs::styled());
    copy_element_anchor(&mut node, element);
    let countdown_id = node.id().to_string();
    let texts: serde_json::Map<String, serde_json::Value> = COUNTDOWN_UNITS
        .iter()
        .map(|(key, label)| (key.to_string(), json!(label)))
        .collect();
    node.params_mut()
        .set("type", "countdown")
        .set(
            "countdown_opts",
            json!({
                "show_years": false,
                "show_months": false,
                "show_weeks": false,
                "show_days": shown(element, "data-show-days"),
                "show_hours": shown(element, "data-show-hours"),
                "show_minutes": shown(element, "data-show-minutes"),
                "show_seconds": shown(element, "data-show-seconds"),
            }),
        )
        .set("show_colons", false)
        .set(
            "timezone",
            element.non_empty_attribute("data-timezone").unwrap_or("America/New_York"),
        )
        .set(
            "timer_action",
            if redirect.is_empty() { "none" } else { "redirect_to" },
        )
        .set("cookie_policy", "none")
        .set("expire_days", 0)
        .set("countdownTexts", texts)
        .set("end_date", element.attribute("data-end-date").unwrap_or_default())
        .set("countdown_id", countdown_id)
        .set(
            "end_time",
            element.non_empty_attribute("data-end-time").unwrap_or("00:00:00"),
        )
        .set("redirect_to", redirect);
    apply_spacing(&mut node, &parse_spacing(&style));

    let mut amount = StyleBlock::new();
    amount
        .attrs_mut()
        .style_mut()
        .set("color", number_color)
        .set("font-size", format!("{}px", number(number_size)))
        .set("font-weight", "700")
        .set("line-height", "100%");
    node.insert_selector(".elCountdownAmount", amount);

    let mut period = StyleBlock::new();
    period
        .attrs_mut()
        .style_mut()
        .set("text-transform", "uppercase")
        .set("color", label_color)
        .set("text-align", "center")
        .set("font-size", format!("{}px", number(label_size)))
        .set("font-weight", "600");
    node.insert_selector(".elCountdownPeriod", period);

    let mut row = StyleBlock::styled();
    row.set_style_length("gap", gap);
    row.set_style("flex-direction", "row");
    node.insert_selector(".elCountdownRow", row);

    let mut date_group = StyleBlock::styled();
    date_group.set_style_length("gap", Dimension::new(0.78, Unit::Em));
    node.insert_selector(".elCountdownGroupDate", date_group);

    let mut time_group = StyleBlock::styled();
    time_group.set_style("gap", "1.1em");
    time_group.set_param("gap--unit", "em");
    node.insert_selector(".elCountdownGroupTime", time_group);

    let mut column = StyleBlock::styled();
    column
        .attrs_mut()
        .style_mut()
        .set("gap", "0.5em")
        .set("flex-direction", "column")
        .set("border-style", "none")
        .set("padding-top", 0)
        .set("padding-bottom", 0);
    column.set_attr("data-skip-shadow-settings", "true");
    column
        .params_mut()
        .set("gap--unit", "em")
        .set("--style-padding-horizontal", 0);
    node.insert_selector(".elCountdownColumn", column);

    let mut digits = StyleBlock::styled();
    digits.set_style("line-height", "100%");
    digits.set_style_length("padding-top", Dimension::px(14.0));
    digits.set_style_length("padding-bottom", Dimension::px(14.0));
    digits.set_style_length("border-radius", radius.unwrap_or(Dimension::px(16.0)));
    digits.set_attr("data-skip-corners-settings", skip_flag(radius.is_some()));
    digits.set_attr("data-skip-shadow-settings", skip_flag(shadow.is_some()));
    digits.set_param("--style-background-color", number_bg);
    digits.set_param_length("--style-padding-horizontal", Dimension::px(14.0));
    if !border.is_empty() {
        apply_border(&mut digits, &border);
    }
    if let Some(shadow) = &shadow {
        apply_shadow(&mut digits, shadow);
    }
    node.insert_selector(".elCountdownAmountContainer", digits);
    node
}
