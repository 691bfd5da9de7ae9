//! Kana script unification.

use std::str::FromStr;

use crate::width::{
    fold_compat, full_to_half_kana, half_to_full_kana, hiragana_to_katakana,
    katakana_to_hiragana,
};
use input_guard::{
    Dataset, ElementKind, Rule, RuleFactory, RuleFactoryError, parse_bool, parse_enum,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KanaTarget {
    #[default]
    KatakanaFull,
    KatakanaHalf,
    Hiragana,
}

impl FromStr for KanaTarget {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "katakana-full" => Ok(KanaTarget::KatakanaFull),
            "katakana-half" => Ok(KanaTarget::KatakanaHalf),
            "hiragana" => Ok(KanaTarget::Hiragana),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KanaOptions {
    pub target: KanaTarget,
    /// Fold full-width ASCII and half-width kana before converting.
    ///
    /// This is a narrow compatibility fold, not full Unicode NFKC: other
    /// compatibility characters such as `①` or `㍻` pass through unchanged.
    /// The name follows the `data-tig-rules-kana-nfkc` attribute.
    pub nfkc: bool,
}

impl Default for KanaOptions {
    fn default() -> Self {
        Self {
            target: KanaTarget::KatakanaFull,
            nfkc: true,
        }
    }
}

pub fn kana(options: KanaOptions) -> Rule {
    Rule::new("kana")
        .targets(&[ElementKind::Input, ElementKind::Textarea])
        .normalize_char(move |v, _| convert(v, options))
}

fn convert(value: &str, opt: KanaOptions) -> String {
    let folded = if opt.nfkc {
        fold_compat(value)
    } else {
        half_to_full_kana(value)
    };
    match opt.target {
        KanaTarget::KatakanaFull => hiragana_to_katakana(&folded),
        KanaTarget::KatakanaHalf => full_to_half_kana(&hiragana_to_katakana(&folded)),
        KanaTarget::Hiragana => katakana_to_hiragana(&folded),
    }
}

/// `data-tig-rules-kana` with `-target` and `-nfkc`. Unknown targets fall
/// back to `katakana-full`.
pub struct KanaFactory;

impl RuleFactory for KanaFactory {
    fn name(&self) -> &str {
        "kana"
    }

    fn from_dataset(
        &self,
        dataset: &Dataset,
        _kind: ElementKind,
    ) -> Result<Option<Rule>, RuleFactoryError> {
        if !dataset.contains("tigRulesKana") {
            return Ok(None);
        }
        let d = KanaOptions::default();
        Ok(Some(kana(KanaOptions {
            target: parse_enum(dataset.get("tigRulesKanaTarget")).unwrap_or(d.target),
            nfkc: parse_bool(dataset.get("tigRulesKanaNfkc")).unwrap_or(d.nfkc),
        })))
    }
}
