//! Fixed-order phase runner.
//!
//! Input mode runs normalize.char, normalize.structure and validate. Commit
//! mode adds fix and format. Within a phase rules run in registration order,
//! each receiving the previous rule's output.

use crate::context::GuardContext;
use crate::error::{RevertRequest, TigError};
use crate::rule::{ElementKind, Phase, Rule};
use log::{trace, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineMode {
    Input,
    Commit,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PipelineOutcome {
    /// Normalized value; after fix in commit mode. Never formatted.
    pub value: String,
    /// What the display should show: `value` formatted in commit mode.
    pub display: String,
    /// Empty whenever `revert` is set.
    pub errors: Vec<TigError>,
    pub revert: Option<RevertRequest>,
}

impl PipelineOutcome {
    pub fn is_reverted(&self) -> bool {
        self.revert.is_some()
    }
}

#[derive(Clone, Debug)]
pub struct Pipeline {
    kind: ElementKind,
    rules: Vec<Rule>,
}

impl Pipeline {
    /// Keep the rules that support `kind`. Dropped rules are warned about
    /// when `warn_unsupported` is set.
    pub fn new(rules: &[Rule], kind: ElementKind, warn_unsupported: bool) -> Self {
        let rules = rules
            .iter()
            .filter(|rule| {
                let ok = rule.supports(kind);
                if !ok && warn_unsupported {
                    warn!(
                        target: "input_guard.pipeline",
                        "[text-input-guard] rule \"{}\" does not support {}; skipped",
                        rule.name(),
                        kind.as_str()
                    );
                }
                ok
            })
            .cloned()
            .collect();
        Self { kind, rules }
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn has_phase(&self, phase: Phase) -> bool {
        self.rules.iter().any(|r| r.has_phase(phase))
    }

    pub fn has_format(&self) -> bool {
        self.has_phase(Phase::Format)
    }

    /// normalize.char followed by normalize.structure.
    pub fn normalize(&self, value: &str, ctx: &mut GuardContext) -> String {
        let value = self.transform(Phase::NormalizeChar, value.to_string(), ctx);
        self.transform(Phase::NormalizeStructure, value, ctx)
    }

    /// Format only. Used to re-render an already fixed value.
    pub fn format(&self, value: &str, ctx: &mut GuardContext) -> String {
        self.transform(Phase::Format, value.to_string(), ctx)
    }

    pub fn run(&self, value: &str, mode: PipelineMode, ctx: &mut GuardContext) -> PipelineOutcome {
        let value = self.normalize(value, ctx);
        self.validate(&value, ctx);

        let (errors, revert) = ctx.take_outcome();
        if let Some(revert) = revert {
            trace!(
                target: "input_guard.pipeline",
                "revert requested: {}",
                revert.reason
            );
            return PipelineOutcome {
                display: value.clone(),
                value,
                errors: Vec::new(),
                revert: Some(revert),
            };
        }

        let (value, display) = match mode {
            PipelineMode::Input => (value.clone(), value),
            PipelineMode::Commit => {
                let fixed = self.transform(Phase::Fix, value, ctx);
                let display = self.transform(Phase::Format, fixed.clone(), ctx);
                (fixed, display)
            }
        };
        PipelineOutcome {
            value,
            display,
            errors,
            revert: None,
        }
    }

    fn validate(&self, value: &str, ctx: &mut GuardContext) {
        for rule in &self.rules {
            ctx.enter(rule.name(), Phase::Validate);
            let ran = rule.run_validate(value, ctx);
            ctx.leave();
            if ran {
                trace!(
                    target: "input_guard.pipeline",
                    "{} {}: {} error(s)",
                    rule.name(),
                    Phase::Validate,
                    ctx.errors().len()
                );
            }
            if ctx.has_revert() {
                ctx.clear_errors();
                break;
            }
        }
    }

    fn transform(&self, phase: Phase, mut value: String, ctx: &mut GuardContext) -> String {
        for rule in &self.rules {
            ctx.enter(rule.name(), phase);
            let next = rule.apply(phase, &value, ctx);
            ctx.leave();
            if let Some(next) = next {
                trace!(
                    target: "input_guard.pipeline",
                    "{} {}: {:?} -> {:?}",
                    rule.name(),
                    phase,
                    value,
                    next
                );
                value = next;
            }
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    fn ctx() -> GuardContext {
        GuardContext::new(ElementKind::Input)
    }

    fn recorder(log: &Arc<Mutex<Vec<String>>>, name: &'static str) -> Rule {
        let l = |tag: &'static str| {
            let log = Arc::clone(log);
            move |v: &str, _: &GuardContext| {
                log.lock().unwrap().push(format!("{name}.{tag}"));
                v.to_string()
            }
        };
        let vlog = Arc::clone(log);
        Rule::new(name)
            .normalize_char(l("char"))
            .normalize_structure(l("structure"))
            .validate(move |_, _| vlog.lock().unwrap().push(format!("{name}.validate")))
            .fix(l("fix"))
            .format(l("format"))
    }

    #[test]
    fn commit_runs_phases_in_global_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let rules = [recorder(&log, "a"), recorder(&log, "b")];
        let pipeline = Pipeline::new(&rules, ElementKind::Input, false);
        pipeline.run("x", PipelineMode::Commit, &mut ctx());

        assert_eq!(
            *log.lock().unwrap(),
            vec![
                "a.char", "b.char", "a.structure", "b.structure", "a.validate", "b.validate",
                "a.fix", "b.fix", "a.format", "b.format",
            ]
        );
    }

    #[test]
    fn input_mode_skips_fix_and_format() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let rules = [recorder(&log, "a")];
        let pipeline = Pipeline::new(&rules, ElementKind::Input, false);
        pipeline.run("x", PipelineMode::Input, &mut ctx());
        assert_eq!(*log.lock().unwrap(), vec!["a.char", "a.structure", "a.validate"]);
    }

    #[test]
    fn value_threads_through_rules() {
        let rules = [
            Rule::new("strip").normalize_char(|v, _| v.replace(',', "")),
            Rule::new("upper").normalize_char(|v, _| v.to_uppercase()),
            Rule::new("wrap").fix(|v, _| format!("[{v}]")).format(|v, _| format!("<{v}>")),
        ];
        let pipeline = Pipeline::new(&rules, ElementKind::Input, false);
        let out = pipeline.run("a,b", PipelineMode::Commit, &mut ctx());
        assert_eq!(out.value, "[AB]");
        assert_eq!(out.display, "<[AB]>");
    }

    #[test]
    fn revert_short_circuits_and_drops_errors() {
        let later = Arc::new(Mutex::new(false));
        let flag = Arc::clone(&later);
        let rules = [
            Rule::new("warns").validate(|_, c| c.error("warns.any", None)),
            Rule::new("blocks").validate(|_, c| {
                c.revert("blocks.too_long", Some(json!({"limit": 1})));
            }),
            Rule::new("after").validate(move |_, c| {
                *flag.lock().unwrap() = true;
                c.revert("after.ignored", None);
            }),
            Rule::new("fmt").format(|v, _| format!("{v}!")),
        ];
        let pipeline = Pipeline::new(&rules, ElementKind::Input, false);
        let out = pipeline.run("12", PipelineMode::Commit, &mut ctx());

        assert!(out.errors.is_empty());
        assert_eq!(out.revert.unwrap().reason, "blocks.too_long");
        assert!(!*later.lock().unwrap());
        assert_eq!(out.display, "12");
    }

    #[test]
    fn first_revert_in_one_rule_wins() {
        let rules = [Rule::new("r").validate(|_, c| {
            c.revert("first", None);
            c.revert("second", None);
        })];
        let pipeline = Pipeline::new(&rules, ElementKind::Input, false);
        let out = pipeline.run("", PipelineMode::Input, &mut ctx());
        assert_eq!(out.revert.map(|r| r.reason), Some("first".to_string()));
    }

    #[test]
    fn errors_keep_rule_order_and_attribution() {
        let rules = [
            Rule::new("a").validate(|_, c| {
                c.error("a.one", None);
                c.error("a.two", None);
            }),
            Rule::new("b").validate(|_, c| c.error("b.one", None)),
        ];
        let pipeline = Pipeline::new(&rules, ElementKind::Input, false);
        let out = pipeline.run("", PipelineMode::Input, &mut ctx());
        let codes: Vec<_> = out.errors.iter().map(|e| e.code.as_str()).collect();
        assert_eq!(codes, vec!["a.one", "a.two", "b.one"]);
        assert_eq!(out.errors[2].rule, "b");
        assert_eq!(out.errors[2].phase, Phase::Validate);
    }

    #[test]
    fn unsupported_rules_are_skipped() {
        let rules = [
            Rule::new("input-only").normalize_char(|v, _| format!("{v}!")),
            Rule::new("both")
                .targets(&[ElementKind::Input, ElementKind::Textarea])
                .normalize_char(|v, _| format!("{v}?")),
        ];
        let pipeline = Pipeline::new(&rules, ElementKind::Textarea, true);
        assert_eq!(pipeline.rules().len(), 1);
        let out = pipeline.run("x", PipelineMode::Input, &mut GuardContext::new(ElementKind::Textarea));
        assert_eq!(out.value, "x?");
    }

    #[test]
    fn composition_flag_is_visible_to_rules() {
        let rules = [Rule::new("quiet").validate(|_, c| {
            if !c.is_composing() {
                c.error("quiet.judged", None);
            }
        })];
        let pipeline = Pipeline::new(&rules, ElementKind::Input, false);
        let mut composing = GuardContext::new(ElementKind::Input).composing(true);
        assert!(pipeline.run("x", PipelineMode::Input, &mut composing).errors.is_empty());
        assert_eq!(pipeline.run("x", PipelineMode::Input, &mut ctx()).errors.len(), 1);
    }
}
