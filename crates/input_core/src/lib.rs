//! # input_core
//!
//! UI-agnostic value/selection layer for text controls.
//!
//! This crate provides the state a text control carries outside the DOM tree:
//! - [`InputId`]: opaque identifier for a control
//! - [`InputValueStore`]: value, dirty flag, caret and selection per control
//! - [`SelectionRange`] / [`SelectionDirection`]: a byte range plus the
//!   direction the user extended it in
//!
//! ## Offsets
//!
//! Every offset handed out or accepted by this crate is a UTF-8 byte offset.
//! Offsets are clamped to `0..=value.len()` and then snapped back onto a char
//! boundary, so callers can pass stale positions after the value shrank.
//!
//! ## Integration
//!
//! The dom crate converts its node handles with a `From` impl:
//! ```ignore
//! impl From<NodeKey> for InputId {
//!     fn from(key: NodeKey) -> Self {
//!         InputId::from_raw(key.0 as u64)
//!     }
//! }
//! ```

mod id;
mod selection;
mod state;
mod store;
mod text;

pub use id::InputId;
pub use selection::{SelectionDirection, SelectionRange};
pub use store::InputValueStore;

pub use text::{
    clamp_offset, clamp_to_char_boundary, filter_single_line, next_cursor_boundary,
    normalize_newlines, prev_cursor_boundary,
};
