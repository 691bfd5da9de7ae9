//! `data-*` attribute access for declarative configuration.

use dom::{Document, NodeKey};
use std::str::FromStr;

/// The `data-*` attributes of one element under their camelCase keys, in
/// attribute order: `data-tig-rules-digits-int` becomes `tigRulesDigitsInt`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dataset {
    entries: Vec<(String, String)>,
}

impl Dataset {
    pub fn from_element(doc: &Document, key: NodeKey) -> Self {
        let entries = doc
            .attributes(key)
            .filter_map(|(name, value)| {
                let key = camel_key(name.strip_prefix("data-")?)?;
                Some((key, value.unwrap_or_default().to_string()))
            })
            .collect();
        Self { entries }
    }

    /// Build from `(camelKey, value)` pairs.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// `tig-rules-digits-int` -> `tigRulesDigitsInt`. A dash followed by an ASCII
/// lowercase letter folds into its uppercase form; other dashes stay.
fn camel_key(rest: &str) -> Option<String> {
    if rest.is_empty() {
        return None;
    }
    let mut out = String::with_capacity(rest.len());
    let mut chars = rest.chars().peekable();
    while let Some(c) = chars.next() {
        match (c, chars.peek().copied()) {
            ('-', Some(next)) if next.is_ascii_lowercase() => {
                out.push(next.to_ascii_uppercase());
                chars.next();
            }
            _ => out.push(c),
        }
    }
    Some(out)
}

/// `""`, `true`, `1`, `yes`, `on` are true; `false`, `0`, `no`, `off` are
/// false (trimmed, case-insensitive). Anything else is unset.
pub fn parse_bool(v: Option<&str>) -> Option<bool> {
    let s = v?.trim().to_ascii_lowercase();
    match s.as_str() {
        "" | "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// A finite number, or unset.
pub fn parse_number(v: Option<&str>) -> Option<f64> {
    let s = v?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// An enum value matched exactly by its `FromStr` impl, or unset.
pub fn parse_enum<T: FromStr>(v: Option<&str>) -> Option<T> {
    let s = v?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse().ok()
}

/// Comma-separated enum values; blanks and unknown entries are dropped.
/// Unset when the attribute is missing or blank.
pub fn parse_enum_list<T: FromStr>(v: Option<&str>) -> Option<Vec<T>> {
    let s = v?.trim();
    if s.is_empty() {
        return None;
    }
    Some(
        s.split(',')
            .map(str::trim)
            .filter(|x| !x.is_empty())
            .filter_map(|x| x.parse().ok())
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Color {
        Red,
        Blue,
    }

    impl FromStr for Color {
        type Err = ();

        fn from_str(s: &str) -> Result<Self, ()> {
            match s {
                "red" => Ok(Color::Red),
                "blue" => Ok(Color::Blue),
                _ => Err(()),
            }
        }
    }

    #[test]
    fn camel_case_keys() {
        let mut doc = Document::new();
        let body = doc.body();
        let input = doc
            .create_child(
                body,
                "input",
                &[
                    ("data-tig-rules-digits-int", "3"),
                    ("data-foo", "bar"),
                    ("id", "x"),
                    ("data-a-1", "y"),
                ],
            )
            .unwrap();
        doc.set_attribute_opt(input, "data-tig-rules-numeric", None).unwrap();

        let ds = Dataset::from_element(&doc, input);
        assert_eq!(
            ds.keys().collect::<Vec<_>>(),
            vec!["tigRulesDigitsInt", "foo", "a-1", "tigRulesNumeric"]
        );
        assert_eq!(ds.get("tigRulesDigitsInt"), Some("3"));
        assert_eq!(ds.get("tigRulesNumeric"), Some(""));
        assert_eq!(ds.get("id"), None);
    }

    #[test]
    fn bools() {
        for s in ["", " TRUE ", "1", "yes", "on"] {
            assert_eq!(parse_bool(Some(s)), Some(true), "{s:?}");
        }
        for s in ["false", "0", "No", "off"] {
            assert_eq!(parse_bool(Some(s)), Some(false), "{s:?}");
        }
        assert_eq!(parse_bool(Some("maybe")), None);
        assert_eq!(parse_bool(None), None);
    }

    #[test]
    fn numbers() {
        assert_eq!(parse_number(Some(" 12 ")), Some(12.0));
        assert_eq!(parse_number(Some("1.5")), Some(1.5));
        assert_eq!(parse_number(Some("")), None);
        assert_eq!(parse_number(Some("abc")), None);
        assert_eq!(parse_number(Some("inf")), None);
    }

    #[test]
    fn enums() {
        assert_eq!(parse_enum::<Color>(Some("red")), Some(Color::Red));
        assert_eq!(parse_enum::<Color>(Some("Red")), None);
        assert_eq!(parse_enum::<Color>(Some("  ")), None);
        assert_eq!(
            parse_enum_list::<Color>(Some("red, ,blue,green")),
            Some(vec![Color::Red, Color::Blue])
        );
        assert_eq!(parse_enum_list::<Color>(Some("x,y")), Some(vec![]));
        assert_eq!(parse_enum_list::<Color>(Some(" ")), None);
    }
}
