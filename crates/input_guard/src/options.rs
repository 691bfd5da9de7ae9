use crate::rule::Rule;
use std::convert::Infallible;
use std::str::FromStr;

pub const DEFAULT_INVALID_CLASS: &str = "is-invalid";

/// When a guard splits its node into raw and display nodes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SeparateMode {
    /// Swap iff some configured rule has a format phase.
    #[default]
    Auto,
    /// Always swap (single-line inputs only).
    Swap,
    Off,
}

impl FromStr for SeparateMode {
    type Err = Infallible;

    /// Unknown values fall back to [`SeparateMode::Auto`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(if s.eq_ignore_ascii_case("swap") {
            SeparateMode::Swap
        } else if s.eq_ignore_ascii_case("off") {
            SeparateMode::Off
        } else {
            SeparateMode::Auto
        })
    }
}

/// Configuration for [`attach`](crate::attach).
///
/// ```
/// use input_guard::{AttachOptions, Rule, SeparateMode};
///
/// let options = AttachOptions::default()
///     .rule(Rule::new("trim").normalize_structure(|v, _| v.trim().to_string()))
///     .invalid_class("bad")
///     .separate(SeparateMode::Off);
/// assert_eq!(options.rules.len(), 1);
/// assert!(options.warn);
/// ```
#[derive(Clone, Debug)]
pub struct AttachOptions {
    pub rules: Vec<Rule>,
    /// Log recoverable configuration problems with `log::warn!`.
    pub warn: bool,
    /// Class toggled on the display node while the last pass had errors.
    pub invalid_class: String,
    pub separate: SeparateMode,
}

impl Default for AttachOptions {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            warn: true,
            invalid_class: DEFAULT_INVALID_CLASS.to_string(),
            separate: SeparateMode::Auto,
        }
    }
}

impl AttachOptions {
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(mut self, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.rules.extend(rules);
        self
    }

    pub fn warn(mut self, warn: bool) -> Self {
        self.warn = warn;
        self
    }

    pub fn invalid_class(mut self, class: impl Into<String>) -> Self {
        self.invalid_class = class.into();
        self
    }

    pub fn separate(mut self, mode: SeparateMode) -> Self {
        self.separate = mode;
        self
    }
}
