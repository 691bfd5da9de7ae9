use crate::{is_incomplete_number, split_point, split_sign};
use input_guard::{Dataset, ElementKind, Rule, RuleFactory, RuleFactoryError};

/// Thousands separators in the integer part, applied on commit only.
pub fn comma() -> Rule {
    Rule::new("comma").format(|v, _| group_thousands(v))
}

/// `-1234567.891` becomes `-1,234,567.891`. Values still being typed
/// (`""`, `-`, `.`, `-.`) come back unchanged.
///
/// ```
/// assert_eq!(guard_rules::group_thousands("1234567.89"), "1,234,567.89");
/// assert_eq!(guard_rules::group_thousands(".1"), ".1");
/// ```
pub fn group_thousands(value: &str) -> String {
    if is_incomplete_number(value) {
        return value.to_string();
    }
    let (negative, body) = split_sign(value);
    let (int, frac) = split_point(body);

    let mut out = String::with_capacity(value.len() + int.len() / 3);
    if negative {
        out.push('-');
    }
    push_grouped(&mut out, int);
    if let Some(frac) = frac {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Commas go between digits only, counted from the end of each digit run.
fn push_grouped(out: &mut String, int: &str) {
    let chars: Vec<char> = int.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        out.push(c);
        let rest = &chars[i + 1..];
        let run = rest.iter().take_while(|c| c.is_ascii_digit()).count();
        if c.is_ascii_digit() && run > 0 && run % 3 == 0 && run == rest.len() {
            out.push(',');
        }
    }
}

/// `data-tig-rules-comma`; any value enables it.
pub struct CommaFactory;

impl RuleFactory for CommaFactory {
    fn name(&self) -> &str {
        "comma"
    }

    fn from_dataset(
        &self,
        dataset: &Dataset,
        _kind: ElementKind,
    ) -> Result<Option<Rule>, RuleFactoryError> {
        Ok(dataset.contains("tigRulesComma").then(comma))
    }
}
