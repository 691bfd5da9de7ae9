use input_guard::{Dataset, ElementKind, Rule, RuleFactory, RuleFactoryError};

/// Whitespace as the trim rule sees it: Unicode white space and the BOM.
pub(crate) fn is_blank(c: char) -> bool {
    c.is_whitespace() || c == '\u{FEFF}'
}

/// Strips leading and trailing whitespace, including U+3000 and the BOM.
pub fn trim() -> Rule {
    Rule::new("trim")
        .targets(&[ElementKind::Input, ElementKind::Textarea])
        .normalize_structure(|v, _| v.trim_matches(is_blank).to_string())
}

/// `data-tig-rules-trim`; present means on, whatever its value.
pub struct TrimFactory;

impl RuleFactory for TrimFactory {
    fn name(&self) -> &str {
        "trim"
    }

    fn from_dataset(
        &self,
        dataset: &Dataset,
        _kind: ElementKind,
    ) -> Result<Option<Rule>, RuleFactoryError> {
        Ok(dataset.contains("tigRulesTrim").then(trim))
    }
}
