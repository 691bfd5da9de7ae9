use crate::types::NodeKey;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Input,
    CompositionStart,
    CompositionEnd,
    Focus,
    Blur,
}

/// A user-agent notification, queued after the action that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UiEvent {
    pub target: NodeKey,
    pub kind: EventKind,
    /// Set on `Input` events fired while an IME composition is active.
    pub is_composing: bool,
}

impl UiEvent {
    pub fn new(target: NodeKey, kind: EventKind) -> Self {
        Self {
            target,
            kind,
            is_composing: false,
        }
    }

    pub fn composing(mut self, is_composing: bool) -> Self {
        self.is_composing = is_composing;
        self
    }
}

/// Registration handle returned by [`Document::add_event_listener`](crate::Document::add_event_listener).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u32);

#[derive(Clone, Copy, Debug)]
struct Registration {
    id: ListenerId,
    target: NodeKey,
    kind: EventKind,
}

/// Listener bookkeeping. Dispatch is pull-based, so a registration only
/// records interest; consumers ask whether theirs is still present.
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    next_id: u32,
    entries: Vec<Registration>,
}

impl ListenerRegistry {
    pub fn add(&mut self, target: NodeKey, kind: EventKind) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.entries.push(Registration { id, target, kind });
        id
    }

    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|r| r.id != id);
        self.entries.len() != before
    }

    pub fn contains(&self, id: ListenerId) -> bool {
        self.entries.iter().any(|r| r.id == id)
    }

    pub fn matches(&self, id: ListenerId, target: NodeKey, kind: EventKind) -> bool {
        self.entries
            .iter()
            .any(|r| r.id == id && r.target == target && r.kind == kind)
    }

    pub fn count_for(&self, target: NodeKey) -> usize {
        self.entries.iter().filter(|r| r.target == target).count()
    }

    pub fn drop_targets(&mut self, removed: &[NodeKey]) {
        self.entries.retain(|r| !removed.contains(&r.target));
    }
}
