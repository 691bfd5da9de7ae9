//! Digit-count limits for the integer and fraction parts.

use std::str::FromStr;

use crate::{is_incomplete_number, split_point, split_sign};
use input_guard::{
    Dataset, ElementKind, GuardContext, Rule, RuleFactory, RuleFactoryError, parse_bool,
    parse_enum, parse_number,
};
use log::trace;
use serde_json::json;

/// How the integer part is brought back under its limit on commit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FixInt {
    #[default]
    None,
    /// Keep the rightmost digits.
    TruncateLeft,
    /// Keep the leftmost digits.
    TruncateRight,
    /// Replace with the largest value that fits (`999`).
    Clamp,
}

/// How the fraction is brought back under its limit on commit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FixFrac {
    None,
    #[default]
    Truncate,
    /// Half-up, carrying into the integer part.
    Round,
}

/// What typing past a limit does.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Overflow {
    /// Accept and report an error.
    #[default]
    None,
    /// Reject the edit.
    Block,
}

impl FromStr for FixInt {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(FixInt::None),
            "truncateLeft" => Ok(FixInt::TruncateLeft),
            "truncateRight" => Ok(FixInt::TruncateRight),
            "clamp" => Ok(FixInt::Clamp),
            _ => Err(()),
        }
    }
}

impl FromStr for FixFrac {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(FixFrac::None),
            "truncate" => Ok(FixFrac::Truncate),
            "round" => Ok(FixFrac::Round),
            _ => Err(()),
        }
    }
}

impl FromStr for Overflow {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Overflow::None),
            "block" => Ok(Overflow::Block),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DigitsOptions {
    pub int: Option<usize>,
    pub frac: Option<usize>,
    /// When false, `007` counts as one integer digit.
    pub count_leading_zeros: bool,
    pub fix_int_on_blur: FixInt,
    pub fix_frac_on_blur: FixFrac,
    pub overflow_input_int: Overflow,
    pub overflow_input_frac: Overflow,
    /// Pad the fraction with zeros up to `frac` on commit.
    pub force_frac_on_blur: bool,
}

impl Default for DigitsOptions {
    fn default() -> Self {
        Self {
            int: None,
            frac: None,
            count_leading_zeros: true,
            fix_int_on_blur: FixInt::None,
            fix_frac_on_blur: FixFrac::Truncate,
            overflow_input_int: Overflow::None,
            overflow_input_frac: Overflow::None,
            force_frac_on_blur: false,
        }
    }
}

pub fn digits(options: DigitsOptions) -> Rule {
    Rule::new("digits")
        .validate(move |v, ctx| validate(v, &options, ctx))
        .fix(move |v, _| fix(v, &options))
}

fn int_digit_count(int: &str, count_leading_zeros: bool) -> usize {
    if count_leading_zeros {
        return int.len();
    }
    match int.trim_start_matches('0') {
        "" if !int.is_empty() => 1,
        trimmed => trimmed.len(),
    }
}

fn validate(value: &str, opt: &DigitsOptions, ctx: &mut GuardContext) {
    if is_incomplete_number(value) {
        return;
    }
    let (_, body) = split_sign(value);
    let (int, frac) = split_point(body);

    if let Some(limit) = opt.int {
        let actual = int_digit_count(int, opt.count_leading_zeros);
        if actual > limit
            && overflow(ctx, "digits.int_overflow", opt.overflow_input_int, limit, actual)
        {
            return;
        }
    }
    if let (Some(limit), Some(frac)) = (opt.frac, frac) {
        let actual = frac.len();
        if actual > limit {
            overflow(ctx, "digits.frac_overflow", opt.overflow_input_frac, limit, actual);
        }
    }
}

/// Reports one overflow; true when it asked for a revert.
fn overflow(
    ctx: &mut GuardContext,
    code: &str,
    mode: Overflow,
    limit: usize,
    actual: usize,
) -> bool {
    let detail = json!({ "limit": limit, "actual": actual });
    match mode {
        Overflow::Block => {
            ctx.revert(code, Some(detail));
            true
        }
        Overflow::None => {
            ctx.error(code, Some(detail));
            false
        }
    }
}

fn fix(value: &str, opt: &DigitsOptions) -> String {
    if is_incomplete_number(value) {
        return value.to_string();
    }
    let (negative, body) = split_sign(value);
    let (int, frac) = split_point(body);
    let mut int = int.to_string();

    let mut frac = frac.map(|frac| {
        let limit = opt.frac.unwrap_or(0);
        let len = frac.chars().count();
        if len <= limit {
            return frac.to_string();
        }
        match opt.fix_frac_on_blur {
            FixFrac::None => frac.to_string(),
            FixFrac::Truncate => take_chars(frac, limit),
            FixFrac::Round => {
                let round_up = frac.chars().nth(limit).is_some_and(|c| c >= '5');
                let mut kept = take_chars(frac, limit);
                if round_up && increment(&mut kept) && increment(&mut int) {
                    int.insert(0, '1');
                }
                kept
            }
        }
    });
    if let (true, Some(limit)) = (opt.force_frac_on_blur, opt.frac) {
        let padded = frac.get_or_insert_with(String::new);
        let len = padded.chars().count();
        padded.extend(std::iter::repeat_n('0', limit.saturating_sub(len)));
    }

    if let Some(limit) = opt.int {
        if int_digit_count(&int, opt.count_leading_zeros) > limit {
            let len = int.chars().count();
            int = match opt.fix_int_on_blur {
                FixInt::None => int,
                FixInt::TruncateLeft => int.chars().skip(len.saturating_sub(limit)).collect(),
                FixInt::TruncateRight => take_chars(&int, limit),
                FixInt::Clamp => "9".repeat(limit),
            };
        }
    }

    let sign = if negative { "-" } else { "" };
    let fixed = match frac {
        Some(frac) if !frac.is_empty() => format!("{sign}{int}.{frac}"),
        _ => format!("{sign}{int}"),
    };
    if fixed != value {
        trace!(target: "guard_rules.digits", "fix {value:?} -> {fixed:?}");
    }
    fixed
}

fn take_chars(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}

/// Adds one to a run of decimal digits in place. Returns the carry out of
/// the leftmost digit; an empty run always carries.
fn increment(digits: &mut String) -> bool {
    let mut chars: Vec<char> = digits.chars().collect();
    let mut carry = true;
    for c in chars.iter_mut().rev() {
        match c.to_digit(10) {
            Some(9) => *c = '0',
            Some(d) => {
                *c = char::from_digit(d + 1, 10).unwrap_or(*c);
                carry = false;
                break;
            }
            None => {
                carry = false;
                break;
            }
        }
    }
    *digits = chars.into_iter().collect();
    carry
}

/// `data-tig-rules-digits` with `-int`, `-frac`, `-count-leading-zeros`,
/// `-fix-int-on-blur`, `-fix-frac-on-blur`, `-overflow-input-int`,
/// `-overflow-input-frac` and `-force-frac-on-blur`.
pub struct DigitsFactory;

impl DigitsFactory {
    /// Unparsable or absent limits fall back to unset; negative and
    /// fractional ones are configuration errors.
    fn limit(dataset: &Dataset, key: &str) -> Result<Option<usize>, RuleFactoryError> {
        let raw = dataset.get(key);
        match parse_number(raw) {
            None => Ok(None),
            Some(n) if n >= 0.0 && n.fract() == 0.0 => Ok(Some(n as usize)),
            Some(_) => Err(RuleFactoryError::invalid(
                "digits",
                key,
                raw.unwrap_or_default(),
            )),
        }
    }
}

impl RuleFactory for DigitsFactory {
    fn name(&self) -> &str {
        "digits"
    }

    fn from_dataset(
        &self,
        dataset: &Dataset,
        _kind: ElementKind,
    ) -> Result<Option<Rule>, RuleFactoryError> {
        if !dataset.contains("tigRulesDigits") {
            return Ok(None);
        }
        let d = DigitsOptions::default();
        let key = |k: &str| dataset.get(k);
        Ok(Some(digits(DigitsOptions {
            int: Self::limit(dataset, "tigRulesDigitsInt")?,
            frac: Self::limit(dataset, "tigRulesDigitsFrac")?,
            count_leading_zeros: parse_bool(key("tigRulesDigitsCountLeadingZeros"))
                .unwrap_or(d.count_leading_zeros),
            fix_int_on_blur: parse_enum(key("tigRulesDigitsFixIntOnBlur"))
                .unwrap_or(d.fix_int_on_blur),
            fix_frac_on_blur: parse_enum(key("tigRulesDigitsFixFracOnBlur"))
                .unwrap_or(d.fix_frac_on_blur),
            overflow_input_int: parse_enum(key("tigRulesDigitsOverflowInputInt"))
                .unwrap_or(d.overflow_input_int),
            overflow_input_frac: parse_enum(key("tigRulesDigitsOverflowInputFrac"))
                .unwrap_or(d.overflow_input_frac),
            force_frac_on_blur: parse_bool(key("tigRulesDigitsForceFracOnBlur"))
                .unwrap_or(d.force_frac_on_blur),
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use input_guard::Phase;
    use serde_json::json;

    fn ctx() -> GuardContext {
        GuardContext::new(ElementKind::Input)
    }

    fn run_validate(opt: DigitsOptions, value: &str) -> GuardContext {
        let rule = digits(opt);
        let mut ctx = ctx();
        rule.run_validate(value, &mut ctx);
        ctx
    }

    fn run_fix(opt: DigitsOptions, value: &str) -> String {
        digits(opt)
            .apply(Phase::Fix, value, &ctx())
            .unwrap_or_default()
    }

    fn int(limit: usize) -> DigitsOptions {
        DigitsOptions {
            int: Some(limit),
            ..DigitsOptions::default()
        }
    }

    fn frac(limit: usize, mode: FixFrac) -> DigitsOptions {
        DigitsOptions {
            frac: Some(limit),
            fix_frac_on_blur: mode,
            ..DigitsOptions::default()
        }
    }

    #[test]
    fn int_overflow_is_reported() {
        let ctx = run_validate(int(2), "001");
        assert!(!ctx.has_revert());
        assert_eq!(ctx.errors().len(), 1);
        assert_eq!(ctx.errors()[0].code, "digits.int_overflow");
        assert_eq!(ctx.errors()[0].detail, Some(json!({ "limit": 2, "actual": 3 })));
    }

    #[test]
    fn leading_zeros_can_be_ignored() {
        let opt = DigitsOptions {
            count_leading_zeros: false,
            ..int(2)
        };
        assert!(run_validate(opt, "001").errors().is_empty());
        let opt = DigitsOptions {
            count_leading_zeros: false,
            ..int(1)
        };
        assert!(run_validate(opt, "000").errors().is_empty());
    }

    #[test]
    fn block_reverts_without_errors() {
        let opt = DigitsOptions {
            overflow_input_int: Overflow::Block,
            ..int(2)
        };
        let ctx = run_validate(opt, "123");
        let revert = ctx.revert_request().unwrap();
        assert_eq!(revert.reason, "digits.int_overflow");
        assert_eq!(revert.detail, Some(json!({ "limit": 2, "actual": 3 })));
        assert!(ctx.errors().is_empty());

        let opt = DigitsOptions {
            overflow_input_frac: Overflow::Block,
            ..frac(2, FixFrac::Truncate)
        };
        let ctx = run_validate(opt, "1.234");
        assert_eq!(ctx.revert_request().unwrap().reason, "digits.frac_overflow");
    }

    #[test]
    fn both_overflows_report_twice_unless_blocked() {
        let both = DigitsOptions {
            int: Some(2),
            frac: Some(2),
            ..DigitsOptions::default()
        };
        let ctx = run_validate(both, "123.456");
        let codes: Vec<&str> = ctx.errors().iter().map(|e| e.code.as_str()).collect();
        assert_eq!(codes, ["digits.int_overflow", "digits.frac_overflow"]);

        let blocked = DigitsOptions {
            overflow_input_int: Overflow::Block,
            overflow_input_frac: Overflow::Block,
            ..both
        };
        let ctx = run_validate(blocked, "123.456");
        assert_eq!(ctx.revert_request().unwrap().reason, "digits.int_overflow");
        assert!(ctx.errors().is_empty());
    }

    #[test]
    fn incomplete_values_are_skipped() {
        let opt = DigitsOptions {
            int: Some(2),
            frac: Some(2),
            ..DigitsOptions::default()
        };
        for v in ["", "-", ".", "-."] {
            let ctx = run_validate(opt, v);
            assert!(ctx.errors().is_empty() && !ctx.has_revert(), "{v:?}");
            assert_eq!(run_fix(opt, v), v);
        }
    }

    #[test]
    fn int_fix_modes() {
        let with = |mode| DigitsOptions {
            fix_int_on_blur: mode,
            ..int(3)
        };
        assert_eq!(run_fix(with(FixInt::TruncateLeft), "12345"), "345");
        assert_eq!(run_fix(with(FixInt::TruncateRight), "12345"), "123");
        assert_eq!(run_fix(with(FixInt::Clamp), "12345"), "999");
        assert_eq!(run_fix(with(FixInt::Clamp), "-12345"), "-999");
        assert_eq!(run_fix(with(FixInt::None), "12345"), "12345");
    }

    #[test]
    fn frac_fix_modes() {
        assert_eq!(run_fix(frac(2, FixFrac::Truncate), "1.234"), "1.23");
        assert_eq!(run_fix(frac(2, FixFrac::None), "1.234"), "1.234");
        assert_eq!(run_fix(frac(2, FixFrac::Truncate), "123"), "123");
        assert_eq!(run_fix(frac(2, FixFrac::Round), "1.234"), "1.23");
        assert_eq!(run_fix(frac(2, FixFrac::Round), "1.235"), "1.24");
        assert_eq!(run_fix(frac(2, FixFrac::Round), "9.999"), "10.00");
        assert_eq!(run_fix(frac(2, FixFrac::Round), "1.995"), "2.00");
        assert_eq!(run_fix(frac(2, FixFrac::Round), "-1.995"), "-2.00");
        assert_eq!(run_fix(frac(0, FixFrac::Round), "1.5"), "2");
        assert_eq!(run_fix(frac(0, FixFrac::Round), ".5"), "1");
    }

    #[test]
    fn fraction_without_limit_is_dropped() {
        assert_eq!(run_fix(int(10), "12.34"), "12");
        assert_eq!(run_fix(int(10), "12."), "12");
    }

    #[test]
    fn force_pads_fraction() {
        let opt = DigitsOptions {
            force_frac_on_blur: true,
            ..frac(2, FixFrac::Truncate)
        };
        assert_eq!(run_fix(opt, "12"), "12.00");
        assert_eq!(run_fix(opt, "12."), "12.00");
        assert_eq!(run_fix(opt, "12.3"), "12.30");
        assert_eq!(run_fix(opt, "12.345"), "12.34");
    }

    #[test]
    fn increment_carries() {
        let mut s = String::from("199");
        assert!(!increment(&mut s));
        assert_eq!(s, "200");
        let mut s = String::from("99");
        assert!(increment(&mut s));
        assert_eq!(s, "00");
        let mut s = String::new();
        assert!(increment(&mut s));
    }

    #[test]
    fn factory_reads_dataset() {
        let ds = Dataset::from_pairs([
            ("tigRulesDigits", "1"),
            ("tigRulesDigitsInt", "3"),
            ("tigRulesDigitsFrac", "2"),
            ("tigRulesDigitsCountLeadingZeros", "true"),
            ("tigRulesDigitsFixIntOnBlur", "truncateLeft"),
            ("tigRulesDigitsFixFracOnBlur", "truncate"),
            ("tigRulesDigitsOverflowInputInt", "block"),
            ("tigRulesDigitsOverflowInputFrac", "none"),
        ]);
        let rule = DigitsFactory
            .from_dataset(&ds, ElementKind::Input)
            .unwrap()
            .unwrap();

        let mut ctx = ctx();
        rule.run_validate("1234", &mut ctx);
        assert_eq!(ctx.revert_request().unwrap().reason, "digits.int_overflow");
        assert_eq!(rule.apply(Phase::Fix, "12345.678", &ctx).unwrap(), "345.67");
    }

    #[test]
    fn factory_limits() {
        let parse = |v: &str| {
            DigitsFactory.from_dataset(
                &Dataset::from_pairs([("tigRulesDigits", ""), ("tigRulesDigitsInt", v)]),
                ElementKind::Input,
            )
        };
        assert!(parse("abc").unwrap().is_some());
        assert!(matches!(
            parse("-1"),
            Err(RuleFactoryError::InvalidValue { ref key, .. }) if key == "tigRulesDigitsInt"
        ));
        assert!(parse("1.5").is_err());
        assert!(
            DigitsFactory
                .from_dataset(&Dataset::default(), ElementKind::Input)
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn unknown_modes_fall_back() {
        assert_eq!("bogus".parse::<FixInt>(), Err(()));
        assert_eq!(parse_enum::<FixFrac>(Some("round")), Some(FixFrac::Round));
        assert_eq!(parse_enum::<Overflow>(Some("BLOCK")), None);
    }
}
