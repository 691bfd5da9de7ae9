use crate::error::TigError;
use crate::guard::Guard;
use dom::{Document, UiEvent};

/// Fan-out over independent guards. Holds no state of its own.
#[derive(Default)]
pub struct GuardGroup {
    guards: Vec<Guard>,
}

impl GuardGroup {
    pub fn new(guards: Vec<Guard>) -> Self {
        Self { guards }
    }

    pub fn guards(&self) -> &[Guard] {
        &self.guards
    }

    pub fn guards_mut(&mut self) -> &mut [Guard] {
        &mut self.guards
    }

    pub fn into_guards(self) -> Vec<Guard> {
        self.guards
    }

    pub fn len(&self) -> usize {
        self.guards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }

    pub fn detach(&mut self, doc: &mut Document) {
        for guard in &mut self.guards {
            guard.detach(doc);
        }
    }

    pub fn is_valid(&self) -> bool {
        self.guards.iter().all(Guard::is_valid)
    }

    /// Errors of every guard, in guard order.
    pub fn errors(&self) -> Vec<TigError> {
        self.guards
            .iter()
            .flat_map(|g| g.errors().iter().cloned())
            .collect()
    }

    pub fn evaluate(&mut self, doc: &mut Document) {
        for guard in &mut self.guards {
            guard.evaluate(doc);
        }
    }

    pub fn commit(&mut self, doc: &mut Document) {
        for guard in &mut self.guards {
            guard.commit(doc);
        }
    }

    /// Offer `event` to each guard; returns whether any handled it.
    pub fn handle_event(&mut self, doc: &mut Document, event: &UiEvent) -> bool {
        let mut handled = false;
        for guard in &mut self.guards {
            handled |= guard.handle_event(doc, event);
        }
        handled
    }

    pub fn pump(&mut self, doc: &mut Document) {
        for event in doc.take_events() {
            self.handle_event(doc, &event);
        }
    }
}

impl FromIterator<Guard> for GuardGroup {
    fn from_iter<I: IntoIterator<Item = Guard>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
