use crate::types::NodeKey;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DomError {
    MissingNode(NodeKey),
    NotAnElement(NodeKey),
    InvalidAttributeName(String),
    InvalidParent(NodeKey),
    CycleDetected { parent: NodeKey, child: NodeKey },
    /// The reference node has no parent to insert next to.
    Detached(NodeKey),
}

impl fmt::Display for DomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomError::MissingNode(key) => write!(f, "no live node for key {}", key.0),
            DomError::NotAnElement(key) => write!(f, "node {} is not an element", key.0),
            DomError::InvalidAttributeName(name) => write!(f, "invalid attribute name: {name:?}"),
            DomError::InvalidParent(key) => write!(f, "node {} cannot take this child", key.0),
            DomError::CycleDetected { parent, child } => {
                write!(f, "inserting {} under {} would create a cycle", child.0, parent.0)
            }
            DomError::Detached(key) => write!(f, "node {} has no parent", key.0),
        }
    }
}

impl std::error::Error for DomError {}
