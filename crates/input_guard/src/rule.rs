use crate::context::GuardContext;
use dom::ControlType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Widget kinds a rule can target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Input,
    Textarea,
}

impl ElementKind {
    pub fn from_control(control: ControlType) -> Option<Self> {
        match control {
            ControlType::Text => Some(ElementKind::Input),
            ControlType::Textarea => Some(ElementKind::Textarea),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ElementKind::Input => "input",
            ElementKind::Textarea => "textarea",
        }
    }
}

/// Pipeline phases in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Phase {
    #[serde(rename = "normalize.char")]
    NormalizeChar,
    #[serde(rename = "normalize.structure")]
    NormalizeStructure,
    #[serde(rename = "validate")]
    Validate,
    #[serde(rename = "fix")]
    Fix,
    #[serde(rename = "format")]
    Format,
}

impl Phase {
    pub const ALL: [Phase; 5] = [
        Phase::NormalizeChar,
        Phase::NormalizeStructure,
        Phase::Validate,
        Phase::Fix,
        Phase::Format,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::NormalizeChar => "normalize.char",
            Phase::NormalizeStructure => "normalize.structure",
            Phase::Validate => "validate",
            Phase::Fix => "fix",
            Phase::Format => "format",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type TransformFn = Arc<dyn Fn(&str, &GuardContext) -> String + Send + Sync>;
pub type ValidateFn = Arc<dyn Fn(&str, &mut GuardContext) + Send + Sync>;

/// A named bundle of optional phase functions.
///
/// Rules are immutable once built and can be shared by any number of guards.
/// `Rule::new` targets single-line inputs; use [`Rule::targets`] to change
/// that.
///
/// ```
/// use input_guard::{ElementKind, Rule};
///
/// let upper = Rule::new("upper")
///     .targets(&[ElementKind::Input, ElementKind::Textarea])
///     .normalize_char(|v, _| v.to_uppercase());
/// assert!(upper.supports(ElementKind::Textarea));
/// ```
#[derive(Clone)]
pub struct Rule {
    name: String,
    targets: Vec<ElementKind>,
    normalize_char: Option<TransformFn>,
    normalize_structure: Option<TransformFn>,
    validate: Option<ValidateFn>,
    fix: Option<TransformFn>,
    format: Option<TransformFn>,
}

impl Rule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            targets: vec![ElementKind::Input],
            normalize_char: None,
            normalize_structure: None,
            validate: None,
            fix: None,
            format: None,
        }
    }

    pub fn targets(mut self, targets: &[ElementKind]) -> Self {
        self.targets = targets.to_vec();
        self
    }

    pub fn normalize_char<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &GuardContext) -> String + Send + Sync + 'static,
    {
        self.normalize_char = Some(Arc::new(f));
        self
    }

    pub fn normalize_structure<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &GuardContext) -> String + Send + Sync + 'static,
    {
        self.normalize_structure = Some(Arc::new(f));
        self
    }

    pub fn validate<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &mut GuardContext) + Send + Sync + 'static,
    {
        self.validate = Some(Arc::new(f));
        self
    }

    pub fn fix<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &GuardContext) -> String + Send + Sync + 'static,
    {
        self.fix = Some(Arc::new(f));
        self
    }

    pub fn format<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &GuardContext) -> String + Send + Sync + 'static,
    {
        self.format = Some(Arc::new(f));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target_kinds(&self) -> &[ElementKind] {
        &self.targets
    }

    pub fn supports(&self, kind: ElementKind) -> bool {
        self.targets.contains(&kind)
    }

    pub fn has_phase(&self, phase: Phase) -> bool {
        match phase {
            Phase::NormalizeChar => self.normalize_char.is_some(),
            Phase::NormalizeStructure => self.normalize_structure.is_some(),
            Phase::Validate => self.validate.is_some(),
            Phase::Fix => self.fix.is_some(),
            Phase::Format => self.format.is_some(),
        }
    }

    /// Run a transforming phase. Returns `None` when the rule has no such
    /// function or `phase` is [`Phase::Validate`].
    pub fn apply(&self, phase: Phase, value: &str, ctx: &GuardContext) -> Option<String> {
        let f = match phase {
            Phase::NormalizeChar => self.normalize_char.as_ref(),
            Phase::NormalizeStructure => self.normalize_structure.as_ref(),
            Phase::Fix => self.fix.as_ref(),
            Phase::Format => self.format.as_ref(),
            Phase::Validate => None,
        }?;
        Some(f(value, ctx))
    }

    /// Run the validate function, if any. Returns whether one ran.
    pub fn run_validate(&self, value: &str, ctx: &mut GuardContext) -> bool {
        match &self.validate {
            Some(f) => {
                f(value, ctx);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phases: Vec<&str> = Phase::ALL
            .iter()
            .filter(|p| self.has_phase(**p))
            .map(|p| p.as_str())
            .collect();
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("targets", &self.targets)
            .field("phases", &phases)
            .finish()
    }
}
