//! Per-node control surface.
//!
//! A [`Guard`] owns one text control (and, when swapped, the display node it
//! synthesized). It reacts to queued [`UiEvent`]s after the user-agent action
//! that produced them has completed, so its own value writes never feed back
//! into the event stream.

use crate::context::GuardContext;
use crate::error::{AttachError, TigError};
use crate::options::{AttachOptions, SeparateMode};
use crate::pipeline::{Pipeline, PipelineMode, PipelineOutcome};
use crate::rule::ElementKind;
use crate::selection::SelectionState;
use crate::swap::{ROLE_ATTR, SwapState};
use dom::{Document, DomError, EventKind, ListenerId, NodeKey, UiEvent};
use log::{debug, warn};

const LISTENED: [EventKind; 5] = [
    EventKind::Input,
    EventKind::CompositionStart,
    EventKind::CompositionEnd,
    EventKind::Focus,
    EventKind::Blur,
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum GuardState {
    Idle,
    Composing,
}

/// Pipeline mode for [`Guard::set_value`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SetValueMode {
    /// Write through without running any rule.
    None,
    Input,
    #[default]
    Commit,
}

/// Text accepted by [`Guard::set_value`].
///
/// Numbers render as decimal text and `None` as the empty string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SetValueInput(String);

impl SetValueInput {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<&str> for SetValueInput {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for SetValueInput {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&String> for SetValueInput {
    fn from(s: &String) -> Self {
        Self(s.clone())
    }
}

macro_rules! set_value_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for SetValueInput {
                fn from(n: $ty) -> Self {
                    Self(n.to_string())
                }
            }
        )*
    };
}

set_value_from_number!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

macro_rules! set_value_from_float {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for SetValueInput {
                fn from(n: $ty) -> Self {
                    // -0.0 renders as "0".
                    if n == 0.0 {
                        Self("0".to_string())
                    } else {
                        Self(n.to_string())
                    }
                }
            }
        )*
    };
}

set_value_from_float!(f32, f64);

impl<T: Into<SetValueInput>> From<Option<T>> for SetValueInput {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or_default()
    }
}

/// Last value the guard let through, with the selection it had and the
/// submitted value it kept on the raw node.
#[derive(Clone, Debug, Default)]
struct Accepted {
    value: String,
    raw: String,
    selection: SelectionState,
}

pub struct Guard {
    kind: ElementKind,
    pipeline: Pipeline,
    warn: bool,
    invalid_class: String,
    invalid_applied: bool,
    raw: NodeKey,
    display: NodeKey,
    swap: Option<SwapState>,
    listeners: Vec<ListenerId>,
    state: GuardState,
    accepted: Accepted,
    /// Post-fix value of the last commit while the display still shows its
    /// formatted form. Cleared by any edit.
    committed: Option<String>,
    errors: Vec<TigError>,
    applying: bool,
    attached: bool,
}

impl Guard {
    pub(crate) fn attach(
        doc: &mut Document,
        node: NodeKey,
        options: &AttachOptions,
    ) -> Result<Self, AttachError> {
        if !doc.contains(node) {
            return Err(AttachError::MissingNode(node));
        }
        if doc.has_attribute(node, ROLE_ATTR) {
            return Err(AttachError::AlreadyGuarded(node));
        }
        let kind = ElementKind::from_control(doc.control_type(node))
            .ok_or(AttachError::NotTextControl(node))?;

        let pipeline = Pipeline::new(&options.rules, kind, options.warn);
        let wants_swap = match options.separate {
            SeparateMode::Off => false,
            SeparateMode::Swap => true,
            SeparateMode::Auto => pipeline.has_format(),
        };
        let swap = if wants_swap && kind == ElementKind::Textarea {
            if options.warn {
                warn!(
                    target: "input_guard.guard",
                    "[text-input-guard] value separation is not supported for textarea; kept as a single node"
                );
            }
            None
        } else if wants_swap {
            Self::split(doc, node)
        } else {
            None
        };
        let display = swap.as_ref().and_then(SwapState::display).unwrap_or(node);

        let listeners = LISTENED
            .iter()
            .map(|ev| doc.add_event_listener(display, *ev))
            .collect();

        let accepted = Accepted {
            value: doc.value(display).to_string(),
            raw: doc.value(node).to_string(),
            selection: SelectionState::capture(doc, display),
        };
        debug!(
            target: "input_guard.guard",
            "attached to {} ({} rule(s), swapped: {})",
            node.0,
            pipeline.rules().len(),
            swap.is_some()
        );

        Ok(Self {
            kind,
            pipeline,
            warn: options.warn,
            invalid_class: options.invalid_class.clone(),
            invalid_applied: false,
            raw: node,
            display,
            swap,
            listeners,
            state: GuardState::Idle,
            accepted,
            committed: None,
            errors: Vec::new(),
            applying: false,
            attached: true,
        })
    }

    fn split(doc: &mut Document, node: NodeKey) -> Option<SwapState> {
        let mut swap = SwapState::snapshot(doc, node);
        swap.apply_to_raw(doc);
        if swap.create_display(doc).is_some() {
            return Some(swap);
        }
        swap.restore_raw(doc);
        None
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Node holding the submission value.
    pub fn raw_node(&self) -> NodeKey {
        self.raw
    }

    /// Node the user edits; the raw node itself when not swapped.
    pub fn display_node(&self) -> NodeKey {
        self.display
    }

    pub fn raw_value<'d>(&self, doc: &'d Document) -> &'d str {
        doc.value(self.raw)
    }

    pub fn display_value<'d>(&self, doc: &'d Document) -> &'d str {
        doc.value(self.display)
    }

    pub fn errors(&self) -> &[TigError] {
        &self.errors
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn is_swapped(&self) -> bool {
        self.swap.is_some()
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn is_composing(&self) -> bool {
        self.state == GuardState::Composing
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    // ---------------------------------------------------------------------
    // Events
    // ---------------------------------------------------------------------

    /// Handle one event. Returns `false` if it was not meant for this guard
    /// (unregistered listener, detached guard, or a pass in progress).
    pub fn handle_event(&mut self, doc: &mut Document, event: &UiEvent) -> bool {
        if !self.attached || self.applying {
            return false;
        }
        if !self
            .listeners
            .iter()
            .any(|id| doc.listener_matches(*id, event))
        {
            return false;
        }

        match event.kind {
            EventKind::CompositionStart => self.state = GuardState::Composing,
            EventKind::CompositionEnd => {
                self.state = GuardState::Idle;
                self.committed = None;
                self.input_pass(doc);
            }
            EventKind::Input => {
                self.committed = None;
                if self.state == GuardState::Idle && !event.is_composing {
                    self.input_pass(doc);
                }
            }
            EventKind::Focus => self.uncommit(doc),
            EventKind::Blur => {
                self.state = GuardState::Idle;
                self.commit_pass(doc);
            }
        }
        true
    }

    /// Drain the document's queue and handle every event in order. Events
    /// for other nodes are discarded; use [`GuardGroup::pump`](crate::GuardGroup::pump)
    /// when several guards share a document.
    pub fn pump(&mut self, doc: &mut Document) {
        for event in doc.take_events() {
            self.handle_event(doc, &event);
        }
    }

    // ---------------------------------------------------------------------
    // Programmatic control
    // ---------------------------------------------------------------------

    /// Run an input pass now. After a commit, the committed value is judged
    /// again and only the error list changes.
    pub fn evaluate(&mut self, doc: &mut Document) {
        if !self.attached {
            return;
        }
        match self.committed.clone() {
            Some(committed) => {
                let mut ctx = self.context();
                let outcome = self.pipeline.run(&committed, PipelineMode::Input, &mut ctx);
                self.errors = outcome.errors;
                self.sync_invalid_class(doc);
            }
            None => self.input_pass(doc),
        }
    }

    /// Run a commit pass now, as a blur would.
    pub fn commit(&mut self, doc: &mut Document) {
        if self.attached {
            self.commit_pass(doc);
        }
    }

    pub fn set_value(
        &mut self,
        doc: &mut Document,
        value: impl Into<SetValueInput>,
        mode: SetValueMode,
    ) {
        if !self.attached {
            return;
        }
        let text = value.into().into_string();
        self.committed = None;
        self.applying = true;
        write(doc, self.display, &text);
        if self.is_swapped() {
            let synced = doc.value(self.display).to_string();
            write(doc, self.raw, &synced);
        }
        self.applying = false;

        match mode {
            SetValueMode::None => {
                self.accepted = self.snapshot_accepted(doc);
            }
            SetValueMode::Input => self.input_pass(doc),
            SetValueMode::Commit => self.commit_pass(doc),
        }
    }

    /// Remove listeners and the display node, restore the original node and
    /// make the guard inert. Idempotent.
    pub fn detach(&mut self, doc: &mut Document) {
        if !self.attached {
            return;
        }
        for id in self.listeners.drain(..) {
            doc.remove_event_listener(id);
        }
        match self.swap.take() {
            Some(mut swap) => {
                swap.remove_display(doc);
                swap.restore_raw(doc);
            }
            None if self.invalid_applied => {
                soft(doc.remove_class(self.raw, &self.invalid_class), "invalid class");
            }
            None => {}
        }
        self.invalid_applied = false;
        self.display = self.raw;
        self.state = GuardState::Idle;
        self.committed = None;
        self.attached = false;
        debug!(target: "input_guard.guard", "detached from {}", self.raw.0);
    }

    // ---------------------------------------------------------------------
    // Passes
    // ---------------------------------------------------------------------

    fn context(&self) -> GuardContext {
        GuardContext::new(self.kind)
            .composing(self.is_composing())
            .invalid_class(&self.invalid_class)
            .warn(self.warn)
            .nodes(self.raw, self.display)
    }

    fn input_pass(&mut self, doc: &mut Document) {
        let current = doc.value(self.display).to_string();
        let selection = SelectionState::capture(doc, self.display);
        let mut ctx = self.context();
        let outcome = self.pipeline.run(&current, PipelineMode::Input, &mut ctx);

        self.applying = true;
        if outcome.is_reverted() {
            self.apply_revert(doc, &outcome);
        } else {
            if outcome.display != current {
                write(doc, self.display, &outcome.display);
                restore_selection(doc, self.display, &selection);
            }
            if self.is_swapped() {
                write(doc, self.raw, &outcome.value);
            }
            self.errors = outcome.errors;
            self.accepted = self.snapshot_accepted(doc);
            self.sync_invalid_class(doc);
        }
        self.applying = false;
    }

    fn commit_pass(&mut self, doc: &mut Document) {
        let previous = self.committed.take();
        let source = previous
            .clone()
            .unwrap_or_else(|| doc.value(self.display).to_string());
        let selection = SelectionState::capture(doc, self.display);
        let mut ctx = self.context();
        let outcome = self.pipeline.run(&source, PipelineMode::Commit, &mut ctx);

        self.applying = true;
        if outcome.is_reverted() {
            self.committed = previous;
            self.apply_revert(doc, &outcome);
        } else {
            if self.is_swapped() {
                write(doc, self.raw, &outcome.value);
            }
            if doc.value(self.display) != outcome.display {
                write(doc, self.display, &outcome.display);
                restore_selection(doc, self.display, &selection);
            }
            self.errors = outcome.errors;
            self.committed = Some(outcome.value);
            self.accepted = self.snapshot_accepted(doc);
            self.sync_invalid_class(doc);
        }
        self.applying = false;
    }

    /// Show the editable (normalized, unformatted) form again on focus.
    fn uncommit(&mut self, doc: &mut Document) {
        if !self.is_swapped() {
            return;
        }
        let source = self
            .committed
            .take()
            .unwrap_or_else(|| doc.value(self.display).to_string());
        let mut ctx = self.context();
        let editable = self.pipeline.normalize(&source, &mut ctx);

        self.applying = true;
        if doc.value(self.display) != editable {
            write(doc, self.display, &editable);
        }
        write(doc, self.raw, &editable);
        self.accepted = self.snapshot_accepted(doc);
        self.applying = false;
    }

    fn apply_revert(&mut self, doc: &mut Document, outcome: &PipelineOutcome) {
        if let Some(revert) = &outcome.revert {
            debug!(
                target: "input_guard.guard",
                "revert {} on {}: restoring {:?}",
                revert.reason,
                self.display.0,
                self.accepted.value
            );
        }
        let Accepted {
            value,
            raw,
            selection,
        } = self.accepted.clone();
        write(doc, self.display, &value);
        restore_selection(doc, self.display, &selection);
        if self.is_swapped() && doc.value(self.raw) != raw {
            write(doc, self.raw, &raw);
        }
        self.errors.clear();
        self.sync_invalid_class(doc);
    }

    fn snapshot_accepted(&self, doc: &Document) -> Accepted {
        Accepted {
            value: doc.value(self.display).to_string(),
            raw: doc.value(self.raw).to_string(),
            selection: SelectionState::capture(doc, self.display),
        }
    }

    fn sync_invalid_class(&mut self, doc: &mut Document) {
        if self.invalid_class.is_empty() {
            return;
        }
        let invalid = !self.errors.is_empty();
        let result = if invalid {
            doc.add_class(self.display, &self.invalid_class)
        } else {
            doc.remove_class(self.display, &self.invalid_class)
        };
        match result {
            Ok(()) => self.invalid_applied = invalid,
            Err(err) => debug!(target: "input_guard.guard", "invalid class skipped: {err}"),
        }
    }
}

fn restore_selection(doc: &mut Document, key: NodeKey, selection: &SelectionState) {
    let len = doc.value(key).len();
    selection.restore(doc, key, len);
}

fn write(doc: &mut Document, key: NodeKey, value: &str) {
    soft(doc.set_value(key, value), "value");
}

fn soft(result: Result<(), DomError>, what: &str) {
    if let Err(err) = result {
        debug!(target: "input_guard.guard", "{what} write skipped: {err}");
    }
}
