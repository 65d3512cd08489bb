//! Translator
//!
//! Pure key resolution shared by the server and client paths:
//! dotted lookup, plural selection and `{{name}}` interpolation.
//!
//! # Resolution
//!
//! 1. Look up `key` and `key + "_plural"` in the blob.
//! 2. With variables supplied and a string plural form, find a count:
//!    `count` if numeric, otherwise the first numeric variable named by a
//!    placeholder in the singular then plural string.
//! 3. A count other than exactly `1` selects the plural form.
//! 4. Interpolate known variables; unknown placeholders stay literal.
//! 5. Anything that is not a string at this point echoes the key.

use crate::constants::{COUNT_VARIABLE, PLURAL_SUFFIX};
use crate::i18n::ResourceBlob;
use ahash::AHashMap;
use hashlink::LinkedHashSet;
use std::fmt;

/// A value substituted into a placeholder
#[derive(Debug, Clone, PartialEq)]
pub enum VarValue {
    /// Numeric value, eligible as a plural count
    Number(f64),
    /// Text value
    Text(String),
}

impl VarValue {
    /// Numeric value, if any
    pub fn as_number(&self) -> Option<f64> {
        match self {
            VarValue::Number(n) => Some(*n),
            VarValue::Text(_) => None,
        }
    }
}

impl fmt::Display for VarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarValue::Text(text) => f.write_str(text),
            VarValue::Number(n) if n.is_nan() => f.write_str("NaN"),
            VarValue::Number(n) if n.is_infinite() => {
                f.write_str(if *n > 0.0 { "Infinity" } else { "-Infinity" })
            }
            // Covers -0 as well
            VarValue::Number(n) if *n == 0.0 => f.write_str("0"),
            VarValue::Number(n) => fmt_number(*n, f),
        }
    }
}

/// Finite, non-zero number in JavaScript `String(number)` form: plain
/// decimals for `1e-6 <= |n| < 1e21`, exponent form (`1e+21`, `1.5e-7`)
/// outside that range.
fn fmt_number(n: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let magnitude = n.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return write!(f, "{n}");
    }

    let formatted = format!("{n:e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            write!(f, "{mantissa}e+{exponent}")
        }
        _ => f.write_str(&formatted),
    }
}

macro_rules! impl_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for VarValue {
                fn from(value: $ty) -> Self {
                    VarValue::Number(value as f64)
                }
            }
        )*
    };
}

impl_from_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl From<&str> for VarValue {
    fn from(value: &str) -> Self {
        VarValue::Text(value.to_string())
    }
}

impl From<String> for VarValue {
    fn from(value: String) -> Self {
        VarValue::Text(value)
    }
}

/// Named values supplied at resolution time
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Variables(AHashMap<String, VarValue>);

impl Variables {
    /// Create an empty variable set
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<VarValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace a variable
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<VarValue>) {
        self.0.insert(name.into(), value.into());
    }

    /// Get a variable by name
    pub fn get(&self, name: &str) -> Option<&VarValue> {
        self.0.get(name)
    }

    /// Get a variable only if it is numeric
    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(VarValue::as_number)
    }

    /// Number of variables
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no variables are set
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<VarValue>> FromIterator<(K, V)> for Variables {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut vars = Self::new();
        for (name, value) in iter {
            vars.insert(name, value);
        }
        vars
    }
}

/// Build [`Variables`] inline
///
/// ```
/// use i18n_sync::vars;
///
/// let vars = vars! { "count" => 3, "name" => "Ada" };
/// assert_eq!(vars.number("count"), Some(3.0));
/// ```
#[macro_export]
macro_rules! vars {
    ($($key:expr => $value:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut vars = $crate::i18n::Variables::new();
        $(
            vars.insert($key, $value);
        )*
        vars
    }};
}

/// A `{{ name }}` occurrence inside a template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Placeholder<'a> {
    start: usize,
    end: usize,
    name: &'a str,
}

/// Scan `{{...}}` occurrences left to right, shortest body first.
/// A body never spans a line break.
fn scan(template: &str) -> Vec<Placeholder<'_>> {
    let mut found = Vec::new();
    let mut cursor = 0;

    while let Some(offset) = template[cursor..].find("{{") {
        let start = cursor + offset;
        let body_start = start + 2;
        let Some(close) = template[body_start..].find("}}") else {
            break;
        };
        let body = &template[body_start..body_start + close];
        if body.contains(['\n', '\r', '\u{2028}', '\u{2029}']) {
            // Retry from the next brace
            cursor = start + 1;
            continue;
        }
        let end = body_start + close + 2;
        found.push(Placeholder {
            start,
            end,
            name: body.trim(),
        });
        cursor = end;
    }

    found
}

/// Placeholder names referenced by a template, in order of appearance
pub fn placeholders(template: &str) -> Vec<&str> {
    scan(template).into_iter().map(|p| p.name).collect()
}

/// Replace every known placeholder; unknown ones are kept verbatim
pub fn interpolate(template: &str, variables: &Variables) -> String {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;

    for placeholder in scan(template) {
        out.push_str(&template[last..placeholder.start]);
        match variables.get(placeholder.name) {
            Some(value) => out.push_str(&value.to_string()),
            None => out.push_str(&template[placeholder.start..placeholder.end]),
        }
        last = placeholder.end;
    }

    out.push_str(&template[last..]);
    out
}

/// Find the count that decides plural selection
fn resolve_count(singular: Option<&str>, plural: &str, variables: &Variables) -> Option<f64> {
    if let Some(count) = variables.number(COUNT_VARIABLE) {
        return Some(count);
    }

    let mut names: LinkedHashSet<String> = LinkedHashSet::new();
    for name in singular.into_iter().flat_map(count_candidates) {
        names.insert(name);
    }
    for name in count_candidates(plural) {
        names.insert(name);
    }

    names.iter().find_map(|name| variables.number(name))
}

/// Placeholder names considered as count candidates. Stray `{{` inside a
/// body are dropped, so `{{ {{n}}` names `n`; interpolation still treats
/// that body literally.
fn count_candidates(template: &str) -> Vec<String> {
    scan(template)
        .into_iter()
        .map(|p| p.name.replace("{{", "").trim().to_string())
        .collect()
}

/// Resolve `key` against `blob`.
///
/// Never fails: a missing key, or a key naming a nested mapping, returns
/// the key itself.
pub fn resolve(blob: &ResourceBlob, key: &str, variables: Option<&Variables>) -> String {
    let singular = blob.lookup(key);
    let plural = blob.get_str(&format!("{key}{PLURAL_SUFFIX}"));

    let mut text = singular.and_then(|value| value.as_str());

    if let (Some(vars), Some(plural)) = (variables, plural) {
        let count = resolve_count(text, plural, vars);
        if count.is_some_and(|count| count != 1.0) {
            text = Some(plural);
        }
    }

    match (text, variables) {
        (Some(text), Some(vars)) => interpolate(text, vars),
        (Some(text), None) => text.to_string(),
        (None, _) => key.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn blob() -> ResourceBlob {
        ResourceBlob::from_value(json!({
            "greeting": "Hi {{name}}",
            "items": "{{count}} item",
            "items_plural": "{{count}} items",
            "files": "{{n}} file",
            "files_plural": "{{n}} files",
            "onlyPlural_plural": "many things",
            "nested": { "deep": { "leaf": "x" } },
            "padded": "Hello {{ name }}!",
            "number": 42
        }))
        .expect("object")
    }

    #[test]
    fn test_missing_key_echoes_key() {
        assert_eq!(resolve(&blob(), "nope", None), "nope");
        assert_eq!(resolve(&ResourceBlob::empty(), "a.b", None), "a.b");
    }

    #[test]
    fn test_plain_lookup_without_variables() {
        assert_eq!(resolve(&blob(), "greeting", None), "Hi {{name}}");
        assert_eq!(resolve(&blob(), "nested.deep.leaf", None), "x");
    }

    #[test]
    fn test_array_elements_resolve_by_index() {
        let b = ResourceBlob::from_value(json!({ "list": ["one", "two"] })).expect("object");
        assert_eq!(resolve(&b, "list.0", None), "one");
        assert_eq!(resolve(&b, "list", None), "list");
        assert_eq!(resolve(&b, "list.2", None), "list.2");
    }

    #[test]
    fn test_non_string_value_echoes_key() {
        assert_eq!(resolve(&blob(), "nested.deep", None), "nested.deep");
        assert_eq!(resolve(&blob(), "number", None), "number");
    }

    #[test]
    fn test_plural_by_count() {
        let b = blob();
        assert_eq!(resolve(&b, "items", Some(&vars! { "count" => 1 })), "1 item");
        assert_eq!(resolve(&b, "items", Some(&vars! { "count" => 3 })), "3 items");
        assert_eq!(resolve(&b, "items", Some(&vars! { "count" => 0 })), "0 items");
        assert_eq!(resolve(&b, "items", Some(&vars! { "count" => 1.5 })), "1.5 items");
    }

    #[test]
    fn test_count_inferred_from_placeholders() {
        let b = blob();
        assert_eq!(resolve(&b, "files", Some(&vars! { "n" => 3 })), "3 files");
        assert_eq!(resolve(&b, "files", Some(&vars! { "n" => 1 })), "1 file");
    }

    #[test]
    fn test_textual_count_is_not_a_count() {
        let b = blob();
        assert_eq!(
            resolve(&b, "items", Some(&vars! { "count" => "3" })),
            "3 item"
        );
    }

    #[test]
    fn test_no_numeric_variable_keeps_singular() {
        let b = blob();
        assert_eq!(
            resolve(&b, "files", Some(&vars! { "other" => 5 })),
            "{{n}} file"
        );
    }

    #[test]
    fn test_plural_without_singular() {
        let b = blob();
        assert_eq!(
            resolve(&b, "onlyPlural", Some(&vars! { "count" => 2 })),
            "many things"
        );
        assert_eq!(
            resolve(&b, "onlyPlural", Some(&vars! { "count" => 1 })),
            "onlyPlural"
        );
        assert_eq!(resolve(&b, "onlyPlural", None), "onlyPlural");
    }

    #[test]
    fn test_unknown_placeholder_passes_through() {
        let b = blob();
        assert_eq!(resolve(&b, "greeting", Some(&Variables::new())), "Hi {{name}}");
        assert_eq!(
            resolve(&b, "greeting", Some(&vars! { "name" => "Ada" })),
            "Hi Ada"
        );
    }

    #[test]
    fn test_placeholder_names_are_trimmed() {
        assert_eq!(
            resolve(&blob(), "padded", Some(&vars! { "name" => "Bob" })),
            "Hello Bob!"
        );
    }

    #[test]
    fn test_scan_edge_cases() {
        assert_eq!(placeholders("{{a}} and {{ b }}"), vec!["a", "b"]);
        assert_eq!(placeholders("{{unclosed"), Vec::<&str>::new());
        assert_eq!(placeholders("{{}}"), vec![""]);
        assert_eq!(placeholders("{{{a}}"), vec!["{a"]);
        assert_eq!(placeholders("{{a\nb}} {{c}}"), vec!["c"]);
    }

    #[test]
    fn test_interpolate_repeats_and_numbers() {
        let vars = vars! { "x" => 2, "y" => -0.0, "z" => f64::INFINITY };
        assert_eq!(interpolate("{{x}}+{{x}}", &vars), "2+2");
        assert_eq!(interpolate("{{y}} {{z}}", &vars), "0 Infinity");
        assert_eq!(interpolate("no placeholders", &vars), "no placeholders");
    }

    #[test]
    fn test_numbers_format_like_javascript() {
        assert_eq!(VarValue::from(1e21).to_string(), "1e+21");
        assert_eq!(VarValue::from(-2.5e22).to_string(), "-2.5e+22");
        assert_eq!(VarValue::from(1e-7).to_string(), "1e-7");
        assert_eq!(VarValue::from(1.5e-7).to_string(), "1.5e-7");
        assert_eq!(VarValue::from(1e-6).to_string(), "0.000001");
        assert_eq!(VarValue::from(123456.789).to_string(), "123456.789");
        assert_eq!(VarValue::from(1e20).to_string(), "100000000000000000000");
        assert_eq!(VarValue::from(3.0).to_string(), "3");
        assert_eq!(VarValue::from(f64::NAN).to_string(), "NaN");
        assert_eq!(VarValue::from(f64::NEG_INFINITY).to_string(), "-Infinity");
    }

    #[test]
    fn test_large_number_interpolates_in_exponent_form() {
        let vars = vars! { "x" => 1e21 };
        assert_eq!(interpolate("{{x}} units", &vars), "1e+21 units");
    }

    #[test]
    fn test_stray_braces_still_name_the_count() {
        let b = ResourceBlob::from_value(json!({
            "odd": "{{ {{n}} file",
            "odd_plural": "{{ {{n}} files",
        }))
        .expect("object");

        // The count is found, but the body " {{n" is not a known variable
        assert_eq!(
            resolve(&b, "odd", Some(&vars! { "n" => 3 })),
            "{{ {{n}} files"
        );
        assert_eq!(
            resolve(&b, "odd", Some(&vars! { "n" => 1 })),
            "{{ {{n}} file"
        );
    }

    #[test]
    fn test_resolve_is_repeatable() {
        let b = blob();
        let vars = vars! { "count" => 7 };
        assert_eq!(
            resolve(&b, "items", Some(&vars)),
            resolve(&b, "items", Some(&vars))
        );
    }
}
