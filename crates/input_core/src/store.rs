//! Central store for text-control values, carets and selections.
//!
//! The store does no layout. Integration layers translate their own handles
//! into [`InputId`] and drive edits through these methods.

use crate::id::InputId;
use crate::selection::{SelectionDirection, SelectionRange};
use crate::state::InputState;
use crate::text::{
    clamp_to_char_boundary, filter_single_line, next_cursor_boundary, normalize_newlines,
    prev_cursor_boundary,
};
use std::collections::HashMap;

/// Value/caret/selection state for every text control of a document.
///
/// # Example
///
/// ```
/// use input_core::{InputId, InputValueStore, SelectionDirection};
///
/// let mut store = InputValueStore::new();
/// let id = InputId::from_raw(1);
///
/// store.set_default(id, "12".to_string());
/// store.insert_text(id, "3");
/// assert_eq!(store.get(id), Some("123"));
///
/// store.set_selection_range(id, 0, 2, SelectionDirection::Backward);
/// let (range, dir) = store.selection(id).unwrap();
/// assert_eq!((range.start, range.end, dir), (0, 2, SelectionDirection::Backward));
/// ```
#[derive(Clone, Debug, Default)]
pub struct InputValueStore {
    values: HashMap<InputId, InputState>,
}

impl InputValueStore {
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    pub fn has(&self, id: InputId) -> bool {
        self.values.contains_key(&id)
    }

    pub fn get(&self, id: InputId) -> Option<&str> {
        self.values.get(&id).map(|s| s.value.as_str())
    }

    /// Caret byte offset, if the control has an entry.
    pub fn caret(&self, id: InputId) -> Option<usize> {
        self.values.get(&id).map(|s| s.caret)
    }

    /// Current selection (collapsed at the caret when nothing is selected).
    pub fn selection(&self, id: InputId) -> Option<(SelectionRange, SelectionDirection)> {
        self.values.get(&id).map(|s| {
            let range = match s.selection_anchor {
                Some(anchor) => SelectionRange::new(anchor, s.caret),
                None => SelectionRange::collapsed(s.caret),
            };
            (range, s.direction)
        })
    }

    /// Monotonic revision counter for the value; 0 for unknown controls.
    pub fn value_revision(&self, id: InputId) -> u64 {
        self.values.get(&id).map_or(0, |s| s.value_rev)
    }

    pub fn is_dirty(&self, id: InputId) -> bool {
        self.values.get(&id).is_some_and(|s| s.dirty)
    }

    /// Update the default value (the `value` attribute).
    ///
    /// Only reaches the current value while the control is not dirty.
    pub fn set_default(&mut self, id: InputId, value: String) {
        let st = self.values.entry(id).or_default();
        if st.dirty {
            return;
        }
        replace_value(st, value);
    }

    /// Programmatic assignment (`el.value = …`).
    ///
    /// Marks the control dirty, moves the caret to the end and clears the
    /// selection, as the DOM does. Never counts as a user edit.
    pub fn set(&mut self, id: InputId, value: String) {
        let st = self.values.entry(id).or_default();
        st.dirty = true;
        replace_value(st, value);
    }

    /// Insert text at the caret (single-line mode), replacing any selection.
    pub fn insert_text(&mut self, id: InputId, s: &str) {
        let s = filter_single_line(s);
        self.insert_normalized(id, &s);
    }

    /// Insert text at the caret (multi-line mode), replacing any selection.
    pub fn insert_text_multiline(&mut self, id: InputId, s: &str) {
        let s = normalize_newlines(s);
        self.insert_normalized(id, &s);
    }

    fn insert_normalized(&mut self, id: InputId, s: &str) {
        let st = self.values.entry(id).or_default();
        clamp_state(st);
        let replaced = delete_selection_if_any(st);
        if s.is_empty() {
            if replaced {
                st.dirty = true;
            }
            return;
        }

        st.value.insert_str(st.caret, s);
        st.caret += s.len();
        st.dirty = true;
        mark_text_dirty(st);
    }

    /// Delete the char before the caret, or the selection if there is one.
    pub fn backspace(&mut self, id: InputId) {
        let Some(st) = self.values.get_mut(&id) else {
            return;
        };
        clamp_state(st);
        if delete_selection_if_any(st) {
            st.dirty = true;
            return;
        }
        if st.caret == 0 {
            return;
        }

        let prev = prev_cursor_boundary(&st.value, st.caret);
        st.value.drain(prev..st.caret);
        st.caret = prev;
        st.dirty = true;
        mark_text_dirty(st);
    }

    /// Delete the char after the caret, or the selection if there is one.
    pub fn delete(&mut self, id: InputId) {
        let Some(st) = self.values.get_mut(&id) else {
            return;
        };
        clamp_state(st);
        if delete_selection_if_any(st) {
            st.dirty = true;
            return;
        }
        if st.caret >= st.value.len() {
            return;
        }

        let next = next_cursor_boundary(&st.value, st.caret);
        st.value.drain(st.caret..next);
        st.dirty = true;
        mark_text_dirty(st);
    }

    /// `setSelectionRange(start, end, direction)`.
    ///
    /// Offsets are clamped to the value and snapped to char boundaries; a
    /// reversed range collapses onto `end` like the DOM does.
    pub fn set_selection_range(
        &mut self,
        id: InputId,
        start: usize,
        end: usize,
        direction: SelectionDirection,
    ) {
        let st = self.values.entry(id).or_default();
        let end = clamp_to_char_boundary(&st.value, end);
        let start = clamp_to_char_boundary(&st.value, start).min(end);

        st.direction = direction;
        if start == end {
            st.caret = end;
            st.selection_anchor = None;
            return;
        }
        match direction {
            SelectionDirection::Backward => {
                st.selection_anchor = Some(end);
                st.caret = start;
            }
            SelectionDirection::Forward | SelectionDirection::None => {
                st.selection_anchor = Some(start);
                st.caret = end;
            }
        }
    }

    /// Drop the entry for a control that left the document.
    pub fn remove(&mut self, id: InputId) {
        self.values.remove(&id);
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

// --- Internal helper functions ---

fn replace_value(st: &mut InputState, value: String) {
    if st.value != value {
        st.value = value;
        mark_text_dirty(st);
    }
    st.caret = st.value.len();
    st.selection_anchor = None;
    st.direction = SelectionDirection::None;
}

fn delete_selection_if_any(st: &mut InputState) -> bool {
    let Some(anchor) = st.selection_anchor.take() else {
        return false;
    };
    let sel = SelectionRange::new(anchor, st.caret);
    if sel.is_empty() {
        return false;
    }

    st.value.drain(sel.start..sel.end);
    st.caret = sel.start;
    st.direction = SelectionDirection::None;
    mark_text_dirty(st);
    true
}

fn clamp_state(st: &mut InputState) {
    st.caret = clamp_to_char_boundary(&st.value, st.caret);
    if let Some(a) = st.selection_anchor {
        st.selection_anchor = Some(clamp_to_char_boundary(&st.value, a));
    }
}

fn mark_text_dirty(st: &mut InputState) {
    st.value_rev = st.value_rev.wrapping_add(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id() -> InputId {
        InputId::from_raw(1)
    }

    #[test]
    fn default_value_only_applies_until_dirty() {
        let mut store = InputValueStore::new();
        store.set_default(id(), "a".to_string());
        assert_eq!(store.get(id()), Some("a"));
        assert!(!store.is_dirty(id()));

        store.insert_text(id(), "b");
        assert!(store.is_dirty(id()));

        store.set_default(id(), "zzz".to_string());
        assert_eq!(store.get(id()), Some("ab"));
    }

    #[test]
    fn programmatic_set_moves_caret_to_end_and_clears_selection() {
        let mut store = InputValueStore::new();
        store.set(id(), "hello".to_string());
        store.set_selection_range(id(), 1, 3, SelectionDirection::Forward);

        store.set(id(), "hi".to_string());
        let (range, dir) = store.selection(id()).unwrap();
        assert_eq!(range, SelectionRange::collapsed(2));
        assert_eq!(dir, SelectionDirection::None);
    }

    #[test]
    fn insert_text_keeps_caret_on_char_boundary() {
        let mut store = InputValueStore::new();
        store.set(id(), String::new());

        store.insert_text(id(), "€");
        let v = store.get(id()).unwrap();
        let caret = store.caret(id()).unwrap();
        assert_eq!(caret, v.len());
        assert!(v.is_char_boundary(caret));
    }

    #[test]
    fn typing_replaces_selection() {
        let mut store = InputValueStore::new();
        store.set(id(), "hello".to_string());
        store.set_selection_range(id(), 1, 4, SelectionDirection::Forward);

        store.insert_text(id(), "X");
        assert_eq!(store.get(id()), Some("hXo"));
        assert_eq!(store.caret(id()), Some(2));
    }

    #[test]
    fn backspace_removes_a_full_unicode_scalar_value() {
        let mut store = InputValueStore::new();
        store.set(id(), "a€".to_string());

        store.backspace(id());
        assert_eq!(store.get(id()), Some("a"));
        assert_eq!(store.caret(id()), Some(1));
    }

    #[test]
    fn delete_removes_next_char() {
        let mut store = InputValueStore::new();
        store.set(id(), "abc".to_string());
        store.set_selection_range(id(), 1, 1, SelectionDirection::None);

        store.delete(id());
        assert_eq!(store.get(id()), Some("ac"));
        assert_eq!(store.caret(id()), Some(1));
    }

    #[test]
    fn backward_selection_keeps_caret_at_start() {
        let mut store = InputValueStore::new();
        store.set(id(), "abcdef".to_string());
        store.set_selection_range(id(), 2, 5, SelectionDirection::Backward);

        assert_eq!(store.caret(id()), Some(2));
        let (range, dir) = store.selection(id()).unwrap();
        assert_eq!(range, SelectionRange { start: 2, end: 5 });
        assert_eq!(dir, SelectionDirection::Backward);
    }

    #[test]
    fn selection_range_is_clamped_to_value() {
        let mut store = InputValueStore::new();
        store.set(id(), "a€".to_string());
        store.set_selection_range(id(), 2, 99, SelectionDirection::Forward);

        let (range, _) = store.selection(id()).unwrap();
        assert_eq!(range, SelectionRange { start: 1, end: 4 });
    }

    #[test]
    fn revision_only_moves_on_real_changes() {
        let mut store = InputValueStore::new();
        store.set(id(), "x".to_string());
        let rev = store.value_revision(id());
        store.set(id(), "x".to_string());
        assert_eq!(store.value_revision(id()), rev);
        store.insert_text(id(), "y");
        assert_eq!(store.value_revision(id()), rev + 1);
    }
}
