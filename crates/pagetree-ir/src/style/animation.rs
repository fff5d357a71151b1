use crate::data::Styled;
use crate::source::SourceElement;
use crate::value::parse_leading_int;

const PASSTHROUGH: [&str; 4] = [
    "data-animation-type",
    "data-animation-trigger",
    "data-animation-timing-function",
    "data-animation-direction",
];
const DURATIONS: [&str; 2] = ["data-animation-time", "data-animation-delay"];
const FLAGS: [&str; 2] = ["data-animation-once", "data-animation-loop"];

/// Copies entrance-animation settings onto `target`. Nothing is written unless
/// the element opts in with `data-skip-animation-settings="false"`.
pub fn apply_animation<E: SourceElement>(target: &mut impl Styled, element: &E) {
    if element.attribute("data-skip-animation-settings") != Some("false") {
        return;
    }
    target.set_attr("data-skip-animation-settings", "false");
    for name in PASSTHROUGH {
        if let Some(value) = element.non_empty_attribute(name) {
            target.set_attr(name, value);
        }
    }
    for name in DURATIONS {
        if let Some(ms) = element.non_empty_attribute(name).and_then(parse_leading_int) {
            target.set_attr(name, ms);
            target.set_param(&format!("{name}--unit"), "ms");
        }
    }
    for name in FLAGS {
        if let Some(value) = element.non_empty_attribute(name) {
            target.set_attr(name, value == "true");
        }
    }
}
