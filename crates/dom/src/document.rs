use crate::arena::{DomArena, NodeKind};
use crate::controls::{self, ControlType};
use crate::error::DomError;
use crate::events::{EventKind, ListenerId, ListenerRegistry, UiEvent};
use crate::types::NodeKey;
use input_core::{
    InputId, InputValueStore, SelectionDirection, SelectionRange, filter_single_line,
    normalize_newlines,
};
use log::trace;
use std::collections::VecDeque;
use std::sync::Arc;

/// Active IME session: the preedit occupies `start..start + len` of the value.
#[derive(Clone, Copy, Debug)]
struct Composition {
    target: NodeKey,
    start: usize,
    len: usize,
}

/// An element tree plus the user-agent state attached to it.
pub struct Document {
    arena: DomArena,
    root: NodeKey,
    body: NodeKey,
    next_key: u32,
    values: InputValueStore,
    listeners: ListenerRegistry,
    pending: VecDeque<UiEvent>,
    focused: Option<NodeKey>,
    composition: Option<Composition>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let mut doc = Self {
            arena: DomArena::new(),
            root: NodeKey::INVALID,
            body: NodeKey::INVALID,
            next_key: 1,
            values: InputValueStore::new(),
            listeners: ListenerRegistry::default(),
            pending: VecDeque::new(),
            focused: None,
            composition: None,
        };
        doc.root = doc.alloc(NodeKind::Document);
        doc.body = doc.alloc(NodeKind::Element {
            name: Arc::from("body"),
            attributes: Vec::new(),
        });
        // Fresh keys under a fresh root cannot fail to link.
        let _ = doc.arena.append_child(doc.root, doc.body);
        doc
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeKey {
        let key = NodeKey(self.next_key);
        self.next_key += 1;
        self.arena.insert_node(key, kind);
        key
    }

    pub fn root(&self) -> NodeKey {
        self.root
    }

    pub fn body(&self) -> NodeKey {
        self.body
    }

    // ---------------------------------------------------------------------
    // Structure
    // ---------------------------------------------------------------------

    /// Create a detached element. The tag name is stored ASCII-lowercased.
    pub fn create_element(&mut self, name: &str) -> NodeKey {
        let name = name.to_ascii_lowercase();
        self.alloc(NodeKind::Element {
            name: Arc::from(name.as_str()),
            attributes: Vec::new(),
        })
    }

    /// Create an element and append it to `parent`, setting `attrs` in order.
    pub fn create_child(
        &mut self,
        parent: NodeKey,
        name: &str,
        attrs: &[(&str, &str)],
    ) -> Result<NodeKey, DomError> {
        let key = self.create_element(name);
        for (attr, value) in attrs {
            self.set_attribute(key, attr, value)?;
        }
        self.append_child(parent, key)?;
        Ok(key)
    }

    pub fn append_child(&mut self, parent: NodeKey, child: NodeKey) -> Result<(), DomError> {
        self.arena.append_child(parent, child)
    }

    /// Append a text node. Text under a `<textarea>` becomes its default value.
    pub fn append_text(&mut self, parent: NodeKey, text: &str) -> Result<NodeKey, DomError> {
        let key = self.alloc(NodeKind::Text {
            text: text.to_string(),
        });
        self.arena.append_child(parent, key)?;
        if self.control_type(parent) == ControlType::Textarea {
            let default = self.text_content(parent);
            self.values
                .set_default(InputId::from(parent), normalize_newlines(&default).into_owned());
        }
        Ok(key)
    }

    pub fn insert_after(&mut self, reference: NodeKey, child: NodeKey) -> Result<(), DomError> {
        self.arena.insert_after(reference, child)
    }

    /// Remove `key` and its subtree together with their values and listeners.
    pub fn remove_node(&mut self, key: NodeKey) -> Result<(), DomError> {
        if key == self.root {
            return Err(DomError::InvalidParent(key));
        }
        let removed = self.arena.remove_subtree(key)?;
        for k in &removed {
            self.values.remove(InputId::from(*k));
        }
        self.listeners.drop_targets(&removed);
        if self.focused.is_some_and(|f| removed.contains(&f)) {
            self.focused = None;
        }
        if self.composition.is_some_and(|c| removed.contains(&c.target)) {
            self.composition = None;
        }
        trace!(target: "dom", "removed {} node(s) under {}", removed.len(), key.0);
        Ok(())
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.arena.contains(key)
    }

    /// Whether `key` is live and reachable from the document root.
    pub fn is_connected(&self, key: NodeKey) -> bool {
        let mut current = Some(key);
        while let Some(k) = current {
            if k == self.root {
                return true;
            }
            current = self.arena.get(k).and_then(|r| r.parent);
        }
        false
    }

    pub fn parent(&self, key: NodeKey) -> Option<NodeKey> {
        self.arena.get(key)?.parent
    }

    pub fn children(&self, key: NodeKey) -> &[NodeKey] {
        self.arena.get(key).map_or(&[], |r| r.children.as_slice())
    }

    pub fn next_sibling(&self, key: NodeKey) -> Option<NodeKey> {
        let siblings = self.children(self.parent(key)?);
        let pos = siblings.iter().position(|k| *k == key)?;
        siblings.get(pos + 1).copied()
    }

    pub fn element_name(&self, key: NodeKey) -> Option<&str> {
        match &self.arena.get(key)?.kind {
            NodeKind::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn text(&self, key: NodeKey) -> Option<&str> {
        match &self.arena.get(key)?.kind {
            NodeKind::Text { text } => Some(text),
            _ => None,
        }
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, key: NodeKey) -> String {
        let mut out = String::new();
        for k in self.arena.descendants(key) {
            if let Some(text) = self.text(k) {
                out.push_str(text);
            }
        }
        out
    }

    // ---------------------------------------------------------------------
    // Attributes
    // ---------------------------------------------------------------------

    pub fn attribute(&self, key: NodeKey, name: &str) -> Option<&str> {
        controls::attr(self.arena.attributes(key)?, name)
    }

    pub fn has_attribute(&self, key: NodeKey, name: &str) -> bool {
        self.arena
            .attributes(key)
            .is_some_and(|attrs| attrs.iter().any(|(k, _)| k.eq_ignore_ascii_case(name)))
    }

    /// Attributes in insertion order. Empty for non-elements.
    pub fn attributes(&self, key: NodeKey) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.arena
            .attributes(key)
            .into_iter()
            .flatten()
            .map(|(k, v)| (k.as_ref(), v.as_deref()))
    }

    pub fn set_attribute(&mut self, key: NodeKey, name: &str, value: &str) -> Result<(), DomError> {
        self.set_attribute_opt(key, name, Some(value))
    }

    /// Set an attribute that may carry no value (`<input required>`).
    ///
    /// Names are validated and stored ASCII-lowercased. Setting `value` on a
    /// text control updates its default value.
    pub fn set_attribute_opt(
        &mut self,
        key: NodeKey,
        name: &str,
        value: Option<&str>,
    ) -> Result<(), DomError> {
        if !is_valid_attribute_name(name) {
            return Err(DomError::InvalidAttributeName(name.to_string()));
        }
        let name = name.to_ascii_lowercase();
        let attrs = self.arena.attributes_mut(key)?;
        let value = value.map(str::to_string);
        match attrs.iter_mut().find(|(k, _)| k.as_ref() == name) {
            Some(slot) => slot.1 = value.clone(),
            None => attrs.push((Arc::from(name.as_str()), value.clone())),
        }

        if name == "value" && self.control_type(key) != ControlType::Textarea {
            let default = value.unwrap_or_default();
            let default = self.sanitize(key, &default);
            self.values.set_default(InputId::from(key), default);
        }
        Ok(())
    }

    /// Returns whether an attribute was removed.
    pub fn remove_attribute(&mut self, key: NodeKey, name: &str) -> Result<bool, DomError> {
        let attrs = self.arena.attributes_mut(key)?;
        let before = attrs.len();
        attrs.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        Ok(attrs.len() != before)
    }

    pub fn has_class(&self, key: NodeKey, token: &str) -> bool {
        self.attribute(key, "class")
            .is_some_and(|c| c.split_ascii_whitespace().any(|t| t == token))
    }

    pub fn add_class(&mut self, key: NodeKey, token: &str) -> Result<(), DomError> {
        if self.has_class(key, token) {
            return Ok(());
        }
        let mut class = self.attribute(key, "class").unwrap_or_default().trim().to_string();
        if !class.is_empty() {
            class.push(' ');
        }
        class.push_str(token);
        self.set_attribute(key, "class", &class)
    }

    pub fn remove_class(&mut self, key: NodeKey, token: &str) -> Result<(), DomError> {
        if !self.has_class(key, token) {
            return Ok(());
        }
        let class = self
            .attribute(key, "class")
            .unwrap_or_default()
            .split_ascii_whitespace()
            .filter(|t| *t != token)
            .collect::<Vec<_>>()
            .join(" ");
        self.set_attribute(key, "class", &class)
    }

    // ---------------------------------------------------------------------
    // Lookup
    // ---------------------------------------------------------------------

    /// First element in tree order whose `id` attribute equals `id`.
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeKey> {
        self.arena
            .descendants(self.root)
            .into_iter()
            .find(|k| self.attribute(*k, "id") == Some(id))
    }

    /// `<input>` and `<textarea>` elements under `root` (inclusive), in tree order.
    pub fn form_controls(&self, root: NodeKey) -> Vec<NodeKey> {
        self.arena
            .descendants(root)
            .into_iter()
            .filter(|k| matches!(self.element_name(*k), Some("input" | "textarea")))
            .collect()
    }

    pub fn control_type(&self, key: NodeKey) -> ControlType {
        match self.arena.get(key).map(|r| &r.kind) {
            Some(NodeKind::Element { name, attributes }) => {
                controls::control_type(name, attributes)
            }
            _ => ControlType::Other,
        }
    }

    pub fn supports_selection(&self, key: NodeKey) -> bool {
        self.control_type(key).supports_selection()
    }

    // ---------------------------------------------------------------------
    // Value and selection (programmatic; never queue events)
    // ---------------------------------------------------------------------

    /// Current value; empty for nodes without one.
    pub fn value(&self, key: NodeKey) -> &str {
        self.values.get(InputId::from(key)).unwrap_or_default()
    }

    /// Assign the value property, as script does. The caret moves to the end.
    pub fn set_value(&mut self, key: NodeKey, value: &str) -> Result<(), DomError> {
        self.expect_element(key)?;
        let value = self.sanitize(key, value);
        self.values.set(InputId::from(key), value);
        Ok(())
    }

    /// Whether the value was set by script or edited since the last default.
    pub fn is_value_dirty(&self, key: NodeKey) -> bool {
        self.values.is_dirty(InputId::from(key))
    }

    /// Selection offsets and direction, or `None` when unsupported.
    pub fn selection(&self, key: NodeKey) -> Option<(SelectionRange, SelectionDirection)> {
        if !self.supports_selection(key) {
            return None;
        }
        Some(
            self.values
                .selection(InputId::from(key))
                .unwrap_or((SelectionRange::collapsed(0), SelectionDirection::None)),
        )
    }

    /// `setSelectionRange`; returns `false` when the control has no selection.
    pub fn set_selection_range(
        &mut self,
        key: NodeKey,
        start: usize,
        end: usize,
        direction: SelectionDirection,
    ) -> bool {
        if !self.supports_selection(key) {
            return false;
        }
        self.values
            .set_selection_range(InputId::from(key), start, end, direction);
        true
    }

    fn sanitize(&self, key: NodeKey, value: &str) -> String {
        match self.control_type(key) {
            ControlType::Text => filter_single_line(value).into_owned(),
            ControlType::Textarea => normalize_newlines(value).into_owned(),
            _ => value.to_string(),
        }
    }

    fn expect_element(&self, key: NodeKey) -> Result<(), DomError> {
        match self.arena.get(key) {
            None => Err(DomError::MissingNode(key)),
            Some(r) if matches!(r.kind, NodeKind::Element { .. }) => Ok(()),
            Some(_) => Err(DomError::NotAnElement(key)),
        }
    }

    // ---------------------------------------------------------------------
    // User-agent actions (queue events)
    // ---------------------------------------------------------------------

    pub fn focused(&self) -> Option<NodeKey> {
        self.focused
    }

    /// Move focus to `key`, blurring the previously focused element first.
    pub fn focus(&mut self, key: NodeKey) {
        if self.focused == Some(key) || !self.arena.contains(key) {
            return;
        }
        self.blur();
        self.focused = Some(key);
        self.push_event(UiEvent::new(key, EventKind::Focus));
    }

    /// Drop focus. A composition in progress on the focused element is
    /// finished with its current preedit first.
    pub fn blur(&mut self) {
        let Some(key) = self.focused.take() else {
            return;
        };
        if self.composition.is_some_and(|c| c.target == key) {
            self.composition = None;
            self.push_event(UiEvent::new(key, EventKind::CompositionEnd));
        }
        self.push_event(UiEvent::new(key, EventKind::Blur));
    }

    /// Insert text at the caret as if typed, replacing the selection.
    pub fn type_text(&mut self, key: NodeKey, text: &str) {
        let kind = self.control_type(key);
        if !kind.is_text_control() {
            return;
        }
        let id = InputId::from(key);
        if kind.is_multiline() {
            self.values.insert_text_multiline(id, text);
        } else {
            self.values.insert_text(id, text);
        }
        self.push_input(key);
    }

    pub fn backspace(&mut self, key: NodeKey) {
        self.edit(key, InputValueStore::backspace);
    }

    pub fn delete_forward(&mut self, key: NodeKey) {
        self.edit(key, InputValueStore::delete);
    }

    fn edit(&mut self, key: NodeKey, op: fn(&mut InputValueStore, InputId)) {
        if !self.control_type(key).is_text_control() {
            return;
        }
        let id = InputId::from(key);
        let before = self.values.value_revision(id);
        let before_value = self.value(key).to_string();
        op(&mut self.values, id);
        if self.values.value_revision(id) != before || self.value(key) != before_value {
            self.push_input(key);
        }
    }

    /// User selection change. Not an edit, so nothing is queued.
    pub fn select(&mut self, key: NodeKey, start: usize, end: usize, direction: SelectionDirection) {
        self.set_selection_range(key, start, end, direction);
    }

    pub fn is_composing(&self, key: NodeKey) -> bool {
        self.composition.is_some_and(|c| c.target == key)
    }

    /// Open an IME session at the caret; a selection is replaced by the preedit.
    pub fn composition_start(&mut self, key: NodeKey) {
        if !self.control_type(key).is_text_control() || self.is_composing(key) {
            return;
        }
        let id = InputId::from(key);
        // An empty insert only deletes the selection.
        self.values.insert_text(id, "");
        let start = self.values.caret(id).unwrap_or(0);
        self.composition = Some(Composition {
            target: key,
            start,
            len: 0,
        });
        self.push_event(UiEvent::new(key, EventKind::CompositionStart));
    }

    /// Replace the preedit with `text`.
    pub fn composition_update(&mut self, key: NodeKey, text: &str) {
        if self.replace_preedit(key, text) {
            self.push_event(UiEvent::new(key, EventKind::Input).composing(true));
        }
    }

    /// Commit `text` in place of the preedit and close the session.
    pub fn composition_end(&mut self, key: NodeKey, text: &str) {
        if !self.replace_preedit(key, text) {
            return;
        }
        self.composition = None;
        self.push_event(UiEvent::new(key, EventKind::Input).composing(true));
        self.push_event(UiEvent::new(key, EventKind::CompositionEnd));
    }

    fn replace_preedit(&mut self, key: NodeKey, text: &str) -> bool {
        let Some(session) = self.composition.filter(|c| c.target == key) else {
            return false;
        };
        let id = InputId::from(key);
        self.values.set_selection_range(
            id,
            session.start,
            session.start + session.len,
            SelectionDirection::None,
        );
        let (range, _) = self
            .values
            .selection(id)
            .unwrap_or((SelectionRange::collapsed(0), SelectionDirection::None));
        if self.control_type(key).is_multiline() {
            self.values.insert_text_multiline(id, text);
        } else {
            self.values.insert_text(id, text);
        }
        let caret = self.values.caret(id).unwrap_or(range.start);
        self.composition = Some(Composition {
            target: key,
            start: range.start,
            len: caret.saturating_sub(range.start),
        });
        true
    }

    fn push_input(&mut self, key: NodeKey) {
        let composing = self.is_composing(key);
        self.push_event(UiEvent::new(key, EventKind::Input).composing(composing));
    }

    fn push_event(&mut self, event: UiEvent) {
        trace!(target: "dom", "queue {:?} on {}", event.kind, event.target.0);
        self.pending.push_back(event);
    }

    // ---------------------------------------------------------------------
    // Events and listeners
    // ---------------------------------------------------------------------

    /// Drain queued events in the order they were produced.
    pub fn take_events(&mut self) -> Vec<UiEvent> {
        self.pending.drain(..).collect()
    }

    pub fn pending_events(&self) -> usize {
        self.pending.len()
    }

    pub fn add_event_listener(&mut self, target: NodeKey, kind: EventKind) -> ListenerId {
        self.listeners.add(target, kind)
    }

    pub fn remove_event_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    pub fn has_listener(&self, id: ListenerId) -> bool {
        self.listeners.contains(id)
    }

    /// Whether `id` is registered for exactly this event's target and kind.
    pub fn listener_matches(&self, id: ListenerId, event: &UiEvent) -> bool {
        self.listeners.matches(id, event.target, event.kind)
    }

    pub fn listener_count(&self, target: NodeKey) -> usize {
        self.listeners.count_for(target)
    }
}

fn is_valid_attribute_name(name: &str) -> bool {
    !name.is_empty()
        && name.chars().all(|c| {
            !c.is_whitespace() && !c.is_control() && !matches!(c, '/' | '>' | '=' | '"' | '\'')
        })
}

#[cfg(test)]
mod tests;
