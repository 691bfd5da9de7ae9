//! Node storage. Structural checks live here; the document layers value
//! state and events on top.

use crate::error::DomError;
use crate::types::NodeKey;
use std::collections::HashMap;
use std::sync::Arc;

pub(crate) type Attributes = Vec<(Arc<str>, Option<String>)>;

pub(crate) struct DomArena {
    nodes: HashMap<NodeKey, NodeRecord>,
}

pub(crate) struct NodeRecord {
    pub kind: NodeKind,
    pub parent: Option<NodeKey>,
    pub children: Vec<NodeKey>,
}

impl NodeRecord {
    fn allows_children(&self) -> bool {
        matches!(self.kind, NodeKind::Document | NodeKind::Element { .. })
    }
}

pub(crate) enum NodeKind {
    Document,
    Element { name: Arc<str>, attributes: Attributes },
    Text { text: String },
}

impl DomArena {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
        }
    }

    pub fn insert_node(&mut self, key: NodeKey, kind: NodeKind) {
        debug_assert!(key != NodeKey::INVALID, "node key must be non-zero");
        debug_assert!(!self.nodes.contains_key(&key), "duplicate node key");
        self.nodes.insert(
            key,
            NodeRecord {
                kind,
                parent: None,
                children: Vec::new(),
            },
        );
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(&key)
    }

    pub fn get(&self, key: NodeKey) -> Option<&NodeRecord> {
        self.nodes.get(&key)
    }

    fn get_mut(&mut self, key: NodeKey) -> Option<&mut NodeRecord> {
        self.nodes.get_mut(&key)
    }

    pub fn attributes(&self, key: NodeKey) -> Option<&Attributes> {
        match &self.get(key)?.kind {
            NodeKind::Element { attributes, .. } => Some(attributes),
            _ => None,
        }
    }

    pub fn attributes_mut(&mut self, key: NodeKey) -> Result<&mut Attributes, DomError> {
        let record = self.get_mut(key).ok_or(DomError::MissingNode(key))?;
        match &mut record.kind {
            NodeKind::Element { attributes, .. } => Ok(attributes),
            _ => Err(DomError::NotAnElement(key)),
        }
    }

    pub fn append_child(&mut self, parent: NodeKey, child: NodeKey) -> Result<(), DomError> {
        self.check_insertable(parent, child)?;
        if let Some(record) = self.get_mut(parent) {
            record.children.push(child);
        }
        if let Some(record) = self.get_mut(child) {
            record.parent = Some(parent);
        }
        Ok(())
    }

    /// Insert `child` right after `reference` under the reference's parent.
    pub fn insert_after(&mut self, reference: NodeKey, child: NodeKey) -> Result<(), DomError> {
        let parent = self
            .get(reference)
            .ok_or(DomError::MissingNode(reference))?
            .parent
            .ok_or(DomError::Detached(reference))?;
        self.check_insertable(parent, child)?;

        let Some(record) = self.get_mut(parent) else {
            return Err(DomError::MissingNode(parent));
        };
        let pos = record
            .children
            .iter()
            .position(|k| *k == reference)
            .ok_or(DomError::Detached(reference))?;
        record.children.insert(pos + 1, child);
        if let Some(record) = self.get_mut(child) {
            record.parent = Some(parent);
        }
        Ok(())
    }

    /// Unlink `key` from its parent and drop it with its subtree.
    ///
    /// Returns every removed key so the owner can drop side tables.
    pub fn remove_subtree(&mut self, key: NodeKey) -> Result<Vec<NodeKey>, DomError> {
        let parent = self
            .get_mut(key)
            .ok_or(DomError::MissingNode(key))?
            .parent
            .take();
        if let Some(parent) = parent
            && let Some(record) = self.get_mut(parent)
        {
            record.children.retain(|k| *k != key);
        }

        let mut removed = Vec::new();
        let mut stack = vec![key];
        while let Some(current) = stack.pop() {
            if let Some(record) = self.nodes.remove(&current) {
                stack.extend(record.children);
                removed.push(current);
            }
        }
        Ok(removed)
    }

    fn check_insertable(&self, parent: NodeKey, child: NodeKey) -> Result<(), DomError> {
        let parent_record = self.get(parent).ok_or(DomError::MissingNode(parent))?;
        let child_record = self.get(child).ok_or(DomError::MissingNode(child))?;
        if parent == child || self.is_descendant(child, parent) {
            return Err(DomError::CycleDetected { parent, child });
        }
        if !parent_record.allows_children() {
            return Err(DomError::InvalidParent(parent));
        }
        if child_record.parent.is_some() {
            return Err(DomError::InvalidParent(child));
        }
        Ok(())
    }

    fn is_descendant(&self, ancestor: NodeKey, maybe_descendant: NodeKey) -> bool {
        let Some(record) = self.get(ancestor) else {
            return false;
        };
        let mut stack: Vec<NodeKey> = record.children.clone();
        while let Some(current) = stack.pop() {
            if current == maybe_descendant {
                return true;
            }
            if let Some(record) = self.get(current) {
                stack.extend(record.children.iter().copied());
            }
        }
        false
    }

    /// Pre-order walk starting at (and including) `root`.
    pub fn descendants(&self, root: NodeKey) -> Vec<NodeKey> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(current) = stack.pop() {
            let Some(record) = self.get(current) else {
                continue;
            };
            out.push(current);
            stack.extend(record.children.iter().rev().copied());
        }
        out
    }
}
