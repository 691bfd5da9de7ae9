//! Declarative attachment from `data-tig-*` attributes.
//!
//! Factories are passed in explicitly; nothing here is global. The guard
//! core never sees this module, only the [`AttachOptions`] it builds.

use crate::dataset::{Dataset, parse_bool};
use crate::error::RuleFactoryError;
use crate::group::GuardGroup;
use crate::guard::Guard;
use crate::options::{AttachOptions, SeparateMode};
use crate::rule::{ElementKind, Rule};
use dom::{Document, NodeKey};
use log::{debug, warn};

pub const ATTACHED_ATTR: &str = "data-tig-attached";

/// Builds one rule from an element's dataset.
pub trait RuleFactory {
    fn name(&self) -> &str;

    /// `Ok(None)` when the dataset does not ask for this rule.
    fn from_dataset(
        &self,
        dataset: &Dataset,
        kind: ElementKind,
    ) -> Result<Option<Rule>, RuleFactoryError>;
}

#[derive(Default)]
pub struct AutoAttach {
    factories: Vec<Box<dyn RuleFactory>>,
}

impl AutoAttach {
    pub fn new(factories: Vec<Box<dyn RuleFactory>>) -> Self {
        Self { factories }
    }

    pub fn register(&mut self, factory: Box<dyn RuleFactory>) {
        self.factories.push(factory);
    }

    pub fn factory_names(&self) -> impl Iterator<Item = &str> {
        self.factories.iter().map(|f| f.name())
    }

    /// Attach every configured text control under `root` (inclusive).
    ///
    /// Controls already marked attached, controls without any `data-tig-*`
    /// configuration and controls for which no factory produced a rule are
    /// left alone.
    pub fn auto_attach(&self, doc: &mut Document, root: NodeKey) -> GuardGroup {
        let mut guards = Vec::new();
        for node in doc.form_controls(root) {
            let Some(kind) = ElementKind::from_control(doc.control_type(node)) else {
                continue;
            };
            let dataset = Dataset::from_element(doc, node);
            if dataset.get("tigAttached") == Some("true") || !has_config(&dataset) {
                continue;
            }

            let options = self.options_for(&dataset, kind);
            if options.rules.is_empty() {
                debug!(target: "input_guard.guard", "node {} has no rules; skipped", node.0);
                continue;
            }

            match Guard::attach(doc, node, &options) {
                Ok(guard) => {
                    if let Err(err) = doc.set_attribute(node, ATTACHED_ATTR, "true") {
                        debug!(target: "input_guard.guard", "attached marker skipped: {err}");
                    }
                    guards.push(guard);
                }
                Err(err) => {
                    if options.warn {
                        warn!(target: "input_guard.guard", "[text-input-guard] autoAttach: {err}");
                    }
                }
            }
        }
        GuardGroup::new(guards)
    }

    fn options_for(&self, dataset: &Dataset, kind: ElementKind) -> AttachOptions {
        let mut options = AttachOptions::default();
        if let Some(warn) = parse_bool(dataset.get("tigWarn")) {
            options.warn = warn;
        }
        if let Some(class) = dataset.get("tigInvalidClass").filter(|c| !c.trim().is_empty()) {
            options.invalid_class = class.to_string();
        }
        options.separate = dataset
            .get("tigSeparate")
            .and_then(|s| s.parse().ok())
            .unwrap_or(SeparateMode::Auto);

        for factory in &self.factories {
            match factory.from_dataset(dataset, kind) {
                Ok(Some(rule)) => options.rules.push(rule),
                Ok(None) => {}
                Err(err) => {
                    if options.warn {
                        warn!(
                            target: "input_guard.guard",
                            "[text-input-guard] autoAttach: rule \"{}\" could not be built: {err}",
                            factory.name()
                        );
                    }
                }
            }
        }
        options
    }
}

fn has_config(dataset: &Dataset) -> bool {
    ["tigSeparate", "tigWarn", "tigInvalidClass"]
        .iter()
        .any(|k| dataset.contains(k))
        || dataset.keys().any(|k| k.starts_with("tigRules"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::Phase;

    struct Upper;

    impl RuleFactory for Upper {
        fn name(&self) -> &str {
            "upper"
        }

        fn from_dataset(
            &self,
            dataset: &Dataset,
            _kind: ElementKind,
        ) -> Result<Option<Rule>, RuleFactoryError> {
            if !dataset.contains("tigRulesUpper") {
                return Ok(None);
            }
            Ok(Some(Rule::new("upper").normalize_char(|v, _| v.to_uppercase())))
        }
    }

    struct Broken;

    impl RuleFactory for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn from_dataset(
            &self,
            dataset: &Dataset,
            _kind: ElementKind,
        ) -> Result<Option<Rule>, RuleFactoryError> {
            match dataset.get("tigRulesBroken") {
                Some(v) => Err(RuleFactoryError::invalid("broken", "tigRulesBroken", v)),
                None => Ok(None),
            }
        }
    }

    struct Decorate;

    impl RuleFactory for Decorate {
        fn name(&self) -> &str {
            "decorate"
        }

        fn from_dataset(
            &self,
            dataset: &Dataset,
            _kind: ElementKind,
        ) -> Result<Option<Rule>, RuleFactoryError> {
            Ok(dataset
                .contains("tigRulesDecorate")
                .then(|| Rule::new("decorate").format(|v, _| format!("[{v}]"))))
        }
    }

    fn registry() -> AutoAttach {
        let mut auto = AutoAttach::new(vec![Box::new(Broken), Box::new(Upper)]);
        auto.register(Box::new(Decorate));
        auto
    }

    #[test]
    fn attaches_configured_controls_only() {
        let mut doc = Document::new();
        let body = doc.body();
        let a = doc
            .create_child(body, "input", &[("data-tig-rules-upper", "")])
            .unwrap();
        let _plain = doc.create_child(body, "input", &[]).unwrap();
        let _no_rules = doc
            .create_child(body, "input", &[("data-tig-warn", "false")])
            .unwrap();
        let _hidden = doc
            .create_child(body, "input", &[("type", "hidden"), ("data-tig-rules-upper", "")])
            .unwrap();

        let group = registry().auto_attach(&mut doc, body);
        assert_eq!(group.len(), 1);
        assert_eq!(group.guards()[0].raw_node(), a);
        assert_eq!(doc.attribute(a, ATTACHED_ATTR), Some("true"));
    }

    #[test]
    fn second_scan_skips_attached_nodes() {
        let mut doc = Document::new();
        let body = doc.body();
        doc.create_child(body, "input", &[("data-tig-rules-decorate", "")])
            .unwrap();

        let auto = registry();
        let first = auto.auto_attach(&mut doc, body);
        assert_eq!(first.len(), 1);
        assert!(first.guards()[0].is_swapped());
        let second = auto.auto_attach(&mut doc, body);
        assert!(second.is_empty());
    }

    #[test]
    fn factory_errors_drop_only_that_rule() {
        let mut doc = Document::new();
        let body = doc.body();
        let input = doc
            .create_child(
                body,
                "input",
                &[
                    ("data-tig-rules-broken", "???"),
                    ("data-tig-rules-upper", ""),
                    ("data-tig-warn", "off"),
                ],
            )
            .unwrap();

        let group = registry().auto_attach(&mut doc, body);
        let rules = group.guards()[0].pipeline().rules();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].name(), "upper");
        assert!(!rules[0].has_phase(Phase::Format));
        assert_eq!(doc.attribute(input, ATTACHED_ATTR), Some("true"));
    }

    #[test]
    fn separate_and_invalid_class_come_from_dataset() {
        let mut doc = Document::new();
        let body = doc.body();
        doc.create_child(
            body,
            "input",
            &[
                ("data-tig-rules-decorate", ""),
                ("data-tig-separate", "off"),
                ("data-tig-invalid-class", "bad"),
            ],
        )
        .unwrap();

        let ds = Dataset::from_element(&doc, doc.form_controls(body)[0]);
        let options = registry().options_for(&ds, ElementKind::Input);
        assert_eq!(options.separate, SeparateMode::Off);
        assert_eq!(options.invalid_class, "bad");

        let group = registry().auto_attach(&mut doc, body);
        assert!(!group.guards()[0].is_swapped());
    }

    #[test]
    fn root_itself_is_scanned() {
        let mut doc = Document::new();
        let body = doc.body();
        let input = doc
            .create_child(body, "input", &[("data-tig-rules-upper", "")])
            .unwrap();
        let group = registry().auto_attach(&mut doc, input);
        assert_eq!(group.len(), 1);
    }
}
