//! Decorations shown around the value (`¥1,000`, `12円`). The decoration
//! lives only in the display; copies the user typed are stripped again.

use crate::trim::is_blank;
use input_guard::{Dataset, ElementKind, Rule, RuleFactory, RuleFactoryError};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AffixOptions {
    pub text: String,
    /// Show the decoration alone when the value is empty.
    pub show_when_empty: bool,
}

impl AffixOptions {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            show_when_empty: false,
        }
    }

    pub fn show_when_empty(mut self, show: bool) -> Self {
        self.show_when_empty = show;
        self
    }
}

#[derive(Clone, Copy)]
enum Side {
    Prefix,
    Suffix,
}

pub fn prefix(options: AffixOptions) -> Rule {
    affix("prefix", Side::Prefix, options)
}

pub fn suffix(options: AffixOptions) -> Rule {
    affix("suffix", Side::Suffix, options)
}

fn affix(name: &str, side: Side, options: AffixOptions) -> Rule {
    let strip_opts = options.clone();
    Rule::new(name)
        .normalize_structure(move |v, _| strip(v, side, &strip_opts.text))
        .format(move |v, _| decorate(v, side, &options))
}

/// Removes every copy of the decoration from its side, together with the
/// whitespace around each copy. Whitespace with no decoration behind it is
/// left for the trim rule.
fn strip(value: &str, side: Side, text: &str) -> String {
    if text.is_empty() {
        return value.to_string();
    }
    let mut s = value;
    loop {
        let next = match side {
            Side::Prefix => edge(s, side).strip_prefix(text),
            Side::Suffix => edge(s, side).strip_suffix(text),
        };
        match next {
            Some(rest) => s = edge(rest, side),
            None => return s.to_string(),
        }
    }
}

fn edge(s: &str, side: Side) -> &str {
    match side {
        Side::Prefix => s.trim_start_matches(is_blank),
        Side::Suffix => s.trim_end_matches(is_blank),
    }
}

fn decorate(value: &str, side: Side, opt: &AffixOptions) -> String {
    if opt.text.is_empty() {
        return value.to_string();
    }
    if value.is_empty() {
        return if opt.show_when_empty {
            opt.text.clone()
        } else {
            String::new()
        };
    }
    match side {
        Side::Prefix => format!("{}{value}", opt.text),
        Side::Suffix => format!("{value}{}", opt.text),
    }
}

/// Reads `<base>`, `<base>Text` and `<base>ShowWhenEmpty`; only the exact
/// string `true` turns the last one on.
fn from_dataset(dataset: &Dataset, base: &str) -> Option<AffixOptions> {
    if !dataset.contains(base) {
        return None;
    }
    let text = dataset.get(&format!("{base}Text")).unwrap_or_default();
    let show = dataset.get(&format!("{base}ShowWhenEmpty")) == Some("true");
    Some(AffixOptions::new(text).show_when_empty(show))
}

/// `data-tig-rules-prefix` with `-text` and `-show-when-empty`.
pub struct PrefixFactory;

impl RuleFactory for PrefixFactory {
    fn name(&self) -> &str {
        "prefix"
    }

    fn from_dataset(
        &self,
        dataset: &Dataset,
        _kind: ElementKind,
    ) -> Result<Option<Rule>, RuleFactoryError> {
        Ok(from_dataset(dataset, "tigRulesPrefix").map(prefix))
    }
}

/// `data-tig-rules-suffix` with `-text` and `-show-when-empty`.
pub struct SuffixFactory;

impl RuleFactory for SuffixFactory {
    fn name(&self) -> &str {
        "suffix"
    }

    fn from_dataset(
        &self,
        dataset: &Dataset,
        _kind: ElementKind,
    ) -> Result<Option<Rule>, RuleFactoryError> {
        Ok(from_dataset(dataset, "tigRulesSuffix").map(suffix))
    }
}
