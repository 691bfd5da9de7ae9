//! Arena DOM used by the input guard.
//!
//! Nodes are addressed by [`NodeKey`] handles. Element attributes keep their
//! insertion order and canonical ASCII-lowercase names. Text-control values,
//! carets and selections live in an [`input_core::InputValueStore`] owned by
//! the [`Document`], keyed by the node's [`input_core::InputId`].
//!
//! The document also plays the user agent: methods such as
//! [`Document::type_text`] or [`Document::focus`] mutate state and queue a
//! [`UiEvent`]; consumers drain the queue with [`Document::take_events`] once
//! the action has finished. Programmatic writes ([`Document::set_value`])
//! never queue events.

mod arena;
mod controls;
mod document;
mod error;
mod events;
#[cfg(any(test, feature = "dom-snapshot"))]
pub mod snapshot;
mod types;

pub use controls::ControlType;
pub use document::Document;
pub use error::DomError;
pub use events::{EventKind, ListenerId, UiEvent};
pub use types::NodeKey;

pub use input_core::{SelectionDirection, SelectionRange};
