//! Built-in rules for `input_guard`.
//!
//! Each rule comes as a constructor taking an options struct (with
//! `Default`) and as a [`RuleFactory`] reading `data-tig-rules-*`
//! attributes for auto-attach.
//!
//! ```
//! use guard_rules::{DigitsOptions, NumericOptions, comma, digits, numeric};
//! use input_guard::{ElementKind, GuardContext, Pipeline, PipelineMode};
//!
//! let rules = [
//!     numeric(NumericOptions { allow_decimal: true, ..Default::default() }),
//!     digits(DigitsOptions { frac: Some(2), ..Default::default() }),
//!     comma(),
//! ];
//! let pipeline = Pipeline::new(&rules, ElementKind::Input, false);
//! let mut ctx = GuardContext::new(ElementKind::Input);
//! let out = pipeline.run("１２３４５.６７８", PipelineMode::Commit, &mut ctx);
//! assert_eq!(out.value, "12345.67");
//! assert_eq!(out.display, "12,345.67");
//! assert_eq!(out.errors[0].code, "digits.frac_overflow");
//! ```

mod affix;
mod ascii;
mod comma;
mod digits;
mod kana;
mod numeric;
mod trim;
pub mod width;

pub use affix::{AffixOptions, PrefixFactory, SuffixFactory, prefix, suffix};
pub use ascii::{AsciiFactory, ascii};
pub use comma::{CommaFactory, comma, group_thousands};
pub use digits::{DigitsFactory, DigitsOptions, FixFrac, FixInt, Overflow, digits};
pub use kana::{KanaFactory, KanaOptions, KanaTarget, kana};
pub use numeric::{NumericFactory, NumericOptions, numeric};
pub use trim::{TrimFactory, trim};

use input_guard::RuleFactory;

/// Every built-in factory, in the order auto-attach appends their rules.
pub fn default_factories() -> Vec<Box<dyn RuleFactory>> {
    vec![
        Box::new(KanaFactory),
        Box::new(AsciiFactory),
        Box::new(TrimFactory),
        Box::new(NumericFactory),
        Box::new(DigitsFactory),
        Box::new(CommaFactory),
        Box::new(PrefixFactory),
        Box::new(SuffixFactory),
    ]
}

/// `""`, `-`, `.` and `-.` are numbers still being typed.
pub(crate) fn is_incomplete_number(v: &str) -> bool {
    matches!(v, "" | "-" | "." | "-.")
}

pub(crate) fn split_sign(v: &str) -> (bool, &str) {
    match v.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, v),
    }
}

/// Integer and optional fraction of an unsigned numeric string.
pub(crate) fn split_point(v: &str) -> (&str, Option<&str>) {
    match memchr::memchr(b'.', v.as_bytes()) {
        Some(dot) => (&v[..dot], Some(&v[dot + 1..])),
        None => (v, None),
    }
}
