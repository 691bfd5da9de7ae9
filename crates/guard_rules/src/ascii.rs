use crate::width::to_half_width_ascii;
use input_guard::{Dataset, ElementKind, Rule, RuleFactory, RuleFactoryError};

/// Full-width letters, digits, symbols and spaces to ASCII.
pub fn ascii() -> Rule {
    Rule::new("ascii")
        .targets(&[ElementKind::Input, ElementKind::Textarea])
        .normalize_char(|v, _| to_half_width_ascii(v))
}

/// `data-tig-rules-ascii`.
pub struct AsciiFactory;

impl RuleFactory for AsciiFactory {
    fn name(&self) -> &str {
        "ascii"
    }

    fn from_dataset(
        &self,
        dataset: &Dataset,
        _kind: ElementKind,
    ) -> Result<Option<Rule>, RuleFactoryError> {
        Ok(dataset.contains("tigRulesAscii").then(ascii))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use input_guard::{GuardContext, Phase};

    fn run(v: &str) -> String {
        ascii()
            .apply(Phase::NormalizeChar, v, &GuardContext::new(ElementKind::Input))
            .unwrap()
    }

    #[test]
    fn folds_full_width() {
        assert_eq!(run("ＡＢＣ１２３"), "ABC123");
        assert_eq!(run("ａｂｃ０９"), "abc09");
        assert_eq!(run("a　b"), "a b");
        assert_eq!(run("！＃％＆（）＝＋"), "!#%&()=+");
        assert_eq!(run("＠［］｛｝：；"), "@[]{}:;");
        assert_eq!(run("かなｶﾅ"), "かなｶﾅ");
    }

    #[test]
    fn targets_both_kinds() {
        let rule = ascii();
        assert_eq!(rule.name(), "ascii");
        assert!(rule.supports(ElementKind::Input));
        assert!(rule.supports(ElementKind::Textarea));
    }
}
