use dom::{Document, NodeKey, SelectionDirection};
use input_core::clamp_offset;

/// Caret and selection of one node, captured around a value rewrite.
///
/// All fields are `None` when the node does not support selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub start: Option<usize>,
    pub end: Option<usize>,
    pub direction: Option<SelectionDirection>,
}

impl SelectionState {
    pub fn capture(doc: &Document, node: NodeKey) -> Self {
        match doc.selection(node) {
            Some((range, direction)) => Self {
                start: Some(range.start),
                end: Some(range.end),
                direction: Some(direction),
            },
            None => Self::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Reapply against the node's current value, clamping both offsets to
    /// `new_len`. Does nothing if the state is empty or the node has no
    /// selection.
    pub fn restore(&self, doc: &mut Document, node: NodeKey, new_len: usize) {
        let (Some(start), Some(end)) = (self.start, self.end) else {
            return;
        };
        let value = doc.value(node);
        let start = clamp_offset(value, start, new_len);
        let end = clamp_offset(value, end, new_len);
        let direction = self.direction.unwrap_or_default();
        doc.set_selection_range(node, start, end, direction);
    }
}
