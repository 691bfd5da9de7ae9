use crate::error::{RevertRequest, TigError};
use crate::rule::{ElementKind, Phase};
use dom::NodeKey;
use serde_json::Value;

/// Per-run state handed to every phase function.
///
/// Collects errors in call order and keeps at most one revert request; the
/// first request wins. Composition state is informational: the engine does
/// not act on it.
#[derive(Debug)]
pub struct GuardContext {
    kind: ElementKind,
    composing: bool,
    invalid_class: String,
    warn: bool,
    raw: NodeKey,
    display: NodeKey,
    errors: Vec<TigError>,
    revert: Option<RevertRequest>,
    current: Option<(String, Phase)>,
}

impl GuardContext {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            composing: false,
            invalid_class: String::new(),
            warn: false,
            raw: NodeKey::INVALID,
            display: NodeKey::INVALID,
            errors: Vec::new(),
            revert: None,
            current: None,
        }
    }

    pub fn composing(mut self, composing: bool) -> Self {
        self.composing = composing;
        self
    }

    pub fn invalid_class(mut self, class: &str) -> Self {
        self.invalid_class = class.to_string();
        self
    }

    pub fn warn(mut self, warn: bool) -> Self {
        self.warn = warn;
        self
    }

    pub fn nodes(mut self, raw: NodeKey, display: NodeKey) -> Self {
        self.raw = raw;
        self.display = display;
        self
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn is_composing(&self) -> bool {
        self.composing
    }

    pub fn invalid_class_name(&self) -> &str {
        &self.invalid_class
    }

    pub fn warn_enabled(&self) -> bool {
        self.warn
    }

    /// Node holding the submission value (the original node).
    pub fn raw_node(&self) -> NodeKey {
        self.raw
    }

    /// Node the user edits; equal to [`Self::raw_node`] without swap.
    pub fn display_node(&self) -> NodeKey {
        self.display
    }

    /// Rule and phase currently executing, if called from inside a run.
    pub fn current(&self) -> Option<(&str, Phase)> {
        self.current.as_ref().map(|(r, p)| (r.as_str(), *p))
    }

    pub fn push_error(&mut self, error: TigError) {
        self.errors.push(error);
    }

    /// Record a revert. Returns `false` if an earlier request already won.
    pub fn request_revert(&mut self, request: RevertRequest) -> bool {
        if self.revert.is_some() {
            return false;
        }
        self.revert = Some(request);
        true
    }

    /// Push an error attributed to the running rule and phase.
    pub fn error(&mut self, code: &str, detail: Option<Value>) {
        let (rule, phase) = self
            .current
            .clone()
            .unwrap_or_else(|| (String::new(), Phase::Validate));
        self.push_error(TigError {
            code: code.to_string(),
            rule,
            phase,
            detail,
        });
    }

    pub fn revert(&mut self, reason: &str, detail: Option<Value>) -> bool {
        self.request_revert(RevertRequest {
            reason: reason.to_string(),
            detail,
        })
    }

    pub fn errors(&self) -> &[TigError] {
        &self.errors
    }

    pub fn revert_request(&self) -> Option<&RevertRequest> {
        self.revert.as_ref()
    }

    pub fn has_revert(&self) -> bool {
        self.revert.is_some()
    }

    pub(crate) fn enter(&mut self, rule: &str, phase: Phase) {
        self.current = Some((rule.to_string(), phase));
    }

    pub(crate) fn leave(&mut self) {
        self.current = None;
    }

    pub(crate) fn clear_errors(&mut self) {
        self.errors.clear();
    }

    pub(crate) fn take_outcome(&mut self) -> (Vec<TigError>, Option<RevertRequest>) {
        (std::mem::take(&mut self.errors), self.revert.take())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_revert_wins() {
        let mut ctx = GuardContext::new(ElementKind::Input);
        assert!(ctx.revert("a", None));
        assert!(!ctx.revert("b", None));
        assert_eq!(ctx.revert_request().map(|r| r.reason.as_str()), Some("a"));
    }

    #[test]
    fn error_is_attributed_to_running_rule() {
        let mut ctx = GuardContext::new(ElementKind::Input);
        ctx.enter("digits", Phase::Validate);
        ctx.error("digits.frac_overflow", None);
        ctx.leave();
        assert_eq!(ctx.errors()[0].rule, "digits");
        assert_eq!(ctx.errors()[0].phase, Phase::Validate);
    }
}
