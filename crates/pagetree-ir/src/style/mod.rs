//! Style helpers shared by producers: each reads inline declarations (or
//! attribute values) and writes the platform's `attrs.style` / `params`
//! keys into any [`crate::data::Styled`] target.

mod animation;
mod box_model;
mod shadow;
mod typography;

pub use animation::apply_animation;
pub use box_model::{
    Background, Border, Spacing, apply_background, apply_border, apply_corners, apply_spacing,
    skip_flag, parse_background, parse_border, parse_border_radius, parse_spacing,
};
pub use shadow::{Shadow, apply_shadow, parse_shadow};
pub use typography::{
    normalize_font_family, normalize_font_weight, parse_align_items, parse_flex_direction,
    parse_justify_content, parse_line_height, parse_text_align,
};

/// Splits a CSS value on top-level whitespace, keeping parenthesised groups
/// such as `rgba(0, 0, 0, 0.1)` intact.
pub(crate) fn split_tokens(value: &str) -> Vec<&str> {
    split_top_level(value, |ch| ch.is_whitespace())
}

/// Splits on top-level commas (`a, b` in a multi-shadow list).
pub(crate) fn split_commas(value: &str) -> Vec<&str> {
    split_top_level(value, |ch| ch == ',')
        .into_iter()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect()
}

fn split_top_level(value: &str, is_separator: impl Fn(char) -> bool) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut depth = 0usize;
    let mut start: Option<usize> = None;
    for (idx, ch) in value.char_indices() {
        match ch {
            '(' => {
                depth += 1;
                start.get_or_insert(idx);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                start.get_or_insert(idx);
            }
            ch if depth == 0 && is_separator(ch) => {
                if let Some(begin) = start.take() {
                    tokens.push(&value[begin..idx]);
                }
            }
            _ => {
                start.get_or_insert(idx);
            }
        }
    }
    if let Some(begin) = start {
        tokens.push(&value[begin..]);
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_keep_function_arguments_together() {
        assert_eq!(
            split_tokens("1px solid rgb(1, 2, 3)"),
            vec!["1px", "solid", "rgb(1, 2, 3)"]
        );
        assert_eq!(split_tokens("  a   b "), vec!["a", "b"]);
        assert_eq!(
            split_commas("0 1px red, 0 2px rgba(0, 0, 0, 0.2)"),
            vec!["0 1px red", "0 2px rgba(0, 0, 0, 0.2)"]
        );
    }
}
