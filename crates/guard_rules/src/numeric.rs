//! Numeric input: character filtering, sign/point structure and a tolerant
//! commit-time cleanup.

use crate::width::full_width_digit;
use crate::{is_incomplete_number, split_point, split_sign};
use input_guard::{Dataset, ElementKind, Rule, RuleFactory, RuleFactoryError, parse_bool};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NumericOptions {
    /// Accept full-width digits and the non-ASCII point/minus look-alikes.
    pub allow_full_width: bool,
    pub allow_minus: bool,
    pub allow_decimal: bool,
}

impl Default for NumericOptions {
    fn default() -> Self {
        Self {
            allow_full_width: true,
            allow_minus: false,
            allow_decimal: false,
        }
    }
}

const DOT_LIKE: &[char] = &['．', '。', '｡'];
const MINUS_LIKE: &[char] = &[
    '－', '−', '‐', '‑', '‒', '–', '—', '―', 'ー', 'ｰ',
];

pub fn numeric(options: NumericOptions) -> Rule {
    Rule::new("numeric")
        .normalize_char(move |v, _| normalize_char(v, &options))
        .normalize_structure(move |v, _| normalize_structure(v, &options))
        .fix(|v, _| fix(v))
}

fn normalize_char(value: &str, opt: &NumericOptions) -> String {
    value
        .chars()
        .filter_map(|c| match c {
            '0'..='9' => Some(c),
            '.' if opt.allow_decimal => Some('.'),
            '-' if opt.allow_minus => Some('-'),
            _ if !opt.allow_full_width => None,
            _ if DOT_LIKE.contains(&c) && opt.allow_decimal => Some('.'),
            _ if MINUS_LIKE.contains(&c) && opt.allow_minus => Some('-'),
            _ => full_width_digit(c),
        })
        .collect()
}

/// `-` only at the very start, at most one `.`.
fn normalize_structure(value: &str, opt: &NumericOptions) -> String {
    let mut out = String::with_capacity(value.len());
    let mut seen_dot = false;
    for (i, c) in value.chars().enumerate() {
        match c {
            '-' if !(opt.allow_minus && i == 0) => {}
            '.' if !opt.allow_decimal || seen_dot => {}
            '.' => {
                seen_dot = true;
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

fn fix(value: &str) -> String {
    if is_incomplete_number(value) {
        return String::new();
    }
    let (negative, body) = split_sign(value);
    let (int, frac) = split_point(body);
    let frac = frac.filter(|f| !f.is_empty());
    let int = match int.trim_start_matches('0') {
        "" => "0",
        trimmed => trimmed,
    };

    let is_zero = int == "0" && frac.is_none_or(|f| f.bytes().all(|b| b == b'0'));
    let sign = if negative && !is_zero { "-" } else { "" };
    match frac {
        Some(f) => format!("{sign}{int}.{f}"),
        None => format!("{sign}{int}"),
    }
}

/// `data-tig-rules-numeric` with `-allow-full-width`, `-allow-minus` and
/// `-allow-decimal` switches.
pub struct NumericFactory;

impl RuleFactory for NumericFactory {
    fn name(&self) -> &str {
        "numeric"
    }

    fn from_dataset(
        &self,
        dataset: &Dataset,
        _kind: ElementKind,
    ) -> Result<Option<Rule>, RuleFactoryError> {
        if !dataset.contains("tigRulesNumeric") {
            return Ok(None);
        }
        let defaults = NumericOptions::default();
        let flag = |key: &str, default: bool| parse_bool(dataset.get(key)).unwrap_or(default);
        Ok(Some(numeric(NumericOptions {
            allow_full_width: flag("tigRulesNumericAllowFullWidth", defaults.allow_full_width),
            allow_minus: flag("tigRulesNumericAllowMinus", defaults.allow_minus),
            allow_decimal: flag("tigRulesNumericAllowDecimal", defaults.allow_decimal),
        })))
    }
}
