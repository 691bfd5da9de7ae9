use input_core::InputId;

/// Stable handle for a node within one [`Document`](crate::Document).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(pub u32);

impl NodeKey {
    /// Reserved sentinel; never handed out by a document.
    pub const INVALID: NodeKey = NodeKey(0);
}

impl From<NodeKey> for InputId {
    fn from(key: NodeKey) -> Self {
        InputId::from(key.0)
    }
}
