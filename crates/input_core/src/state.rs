//! Per-control state stored in the [`InputValueStore`](crate::InputValueStore).

use crate::selection::SelectionDirection;

#[derive(Clone, Debug, Default)]
pub(crate) struct InputState {
    /// Current value (the `value` property, not the attribute).
    pub value: String,

    /// Monotonic revision counter, incremented on any text change.
    pub value_rev: u64,

    /// Set once the value diverges from the default value (edited by the user
    /// or assigned programmatically). While clear, the `value` attribute keeps
    /// seeding the value.
    pub dirty: bool,

    /// Caret byte offset (always on a UTF-8 char boundary).
    pub caret: usize,

    /// Selection anchor; the selection is `min(anchor, caret)..max(anchor, caret)`.
    pub selection_anchor: Option<usize>,

    pub direction: SelectionDirection,
}
