//! Scalar value parsing and the property precedence chain.
//!
//! Every styleable property a producer emits is resolved through
//! [`resolve`]: override attributes first, then the inline style of the
//! element (or a designated inner element), then the nearest inherited
//! document default, then a fixed fallback. The first candidate that parses
//! wins; anything unparsable falls through to the next level.

mod color;

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use crate::source::SourceElement;

pub use color::{hex_to_rgb, normalize_color};

/// Units the target platform understands in `X--unit` sibling keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Px,
    Percent,
    Rem,
    Em,
    Ms,
}

impl Unit {
    pub fn as_str(self) -> &'static str {
        match self {
            Unit::Px => "px",
            Unit::Percent => "%",
            Unit::Rem => "rem",
            Unit::Em => "em",
            Unit::Ms => "ms",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A number paired with its unit, e.g. `48px` or `1.5em`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimension {
    pub value: f64,
    pub unit: Unit,
}

impl Dimension {
    pub const fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }

    pub const fn px(value: f64) -> Self {
        Self::new(value, Unit::Px)
    }

    pub fn value_json(&self) -> Value {
        number(self.value)
    }
}

/// Converts a float into a JSON number, keeping integral values integral so
/// `20px` serializes as `20` rather than `20.0`.
pub fn number(value: f64) -> Value {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 9_007_199_254_740_992.0 {
        Value::from(value as i64)
    } else {
        Value::from(value)
    }
}

/// Parses the longest leading decimal number of `input`, ignoring leading
/// whitespace and any trailing garbage (`"12.5px"` -> `12.5`).
pub fn parse_leading_number(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > frac_start || digits > 0 {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }
    s[..end].parse::<f64>().ok()
}

/// Parses a leading integer the way a lenient integer reader would
/// (`"300ms"` -> `300`, `"4.7"` -> `4`).
pub fn parse_leading_int(input: &str) -> Option<i64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == start {
        return None;
    }
    s[..end].parse::<i64>().ok()
}

/// Parses a CSS length-ish value. Recognised suffixes are `%`, `rem`, `em`
/// and `px`; a bare number takes `default_unit`.
pub fn parse_value_with_unit(input: &str, default_unit: Unit) -> Option<Dimension> {
    let value = input.trim();
    if value.is_empty() {
        return None;
    }
    let unit = if value.ends_with('%') {
        Unit::Percent
    } else if value.ends_with("rem") {
        Unit::Rem
    } else if value.ends_with("em") {
        Unit::Em
    } else if value.ends_with("px") {
        Unit::Px
    } else {
        default_unit
    };
    parse_leading_number(value).map(|number| Dimension::new(number, unit))
}

/// Shorthand for [`parse_value_with_unit`] with a `px` default.
pub fn parse_px(input: &str) -> Option<Dimension> {
    parse_value_with_unit(input, Unit::Px)
}

/// Document-level defaults declared by container ancestors, nearest last.
#[derive(Debug, Clone, Default)]
pub struct InheritedDefaults {
    scopes: Vec<BTreeMap<String, String>>,
}

impl InheritedDefaults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_scope(&mut self, scope: BTreeMap<String, String>) {
        self.scopes.push(scope);
    }

    pub fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    /// Nearest declared value for `key`, if any ancestor declared one.
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(key).map(String::as_str))
    }
}

/// One property's precedence chain.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertyRule<'a> {
    /// Attribute names on the element, most specific first.
    pub overrides: &'a [&'a str],
    /// Inline style property read from the style carrier.
    pub inline: Option<&'a str>,
    /// Key looked up in the inherited document defaults.
    pub inherited: Option<&'a str>,
    /// Hard-coded last resort.
    pub fallback: Option<&'a str>,
}

impl<'a> PropertyRule<'a> {
    pub const fn new() -> Self {
        Self {
            overrides: &[],
            inline: None,
            inherited: None,
            fallback: None,
        }
    }

    pub const fn overrides(mut self, names: &'a [&'a str]) -> Self {
        self.overrides = names;
        self
    }

    pub const fn inline(mut self, property: &'a str) -> Self {
        self.inline = Some(property);
        self
    }

    pub const fn inherited(mut self, key: &'a str) -> Self {
        self.inherited = Some(key);
        self
    }

    pub const fn fallback(mut self, value: &'a str) -> Self {
        self.fallback = Some(value);
        self
    }
}

/// Walks `rule` from the most to the least specific source and returns the
/// first candidate accepted by `parse`. The inline level reads `carrier`, an
/// inner element holding the rendered style, and then `element` itself.
pub fn resolve<E, T>(
    rule: &PropertyRule<'_>,
    element: &E,
    carrier: Option<&E>,
    inherited: &InheritedDefaults,
    parse: impl Fn(&str) -> Option<T>,
) -> Option<T>
where
    E: SourceElement,
{
    if let Some(found) = rule
        .overrides
        .iter()
        .filter_map(|name| element.attribute(name))
        .find_map(&parse)
    {
        return Some(found);
    }
    if let Some(property) = rule.inline {
        let found = carrier
            .into_iter()
            .chain(std::iter::once(element))
            .find_map(|el| el.inline_style().get(property).and_then(&parse));
        if found.is_some() {
            return found;
        }
    }
    if let Some(found) = rule
        .inherited
        .and_then(|key| inherited.lookup(key))
        .and_then(&parse)
    {
        return Some(found);
    }
    rule.fallback.and_then(&parse)
}
