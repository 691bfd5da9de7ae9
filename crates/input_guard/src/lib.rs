//! Text-input guarding: a fixed-order rule pipeline bound to text controls.
//!
//! A [`Guard`] watches one `<input>` or `<textarea>` in a [`dom::Document`]
//! and runs its [`Rule`]s on every edit (input mode: normalize and validate)
//! and on blur (commit mode: additionally fix and format). When any rule
//! formats, the node is split into a hidden raw node carrying the submission
//! value and a visible display node carrying the formatted text.
//!
//! ```
//! use dom::Document;
//! use input_guard::{AttachOptions, Rule, attach};
//!
//! let mut doc = Document::new();
//! let body = doc.body();
//! let input = doc.create_child(body, "input", &[("id", "qty")]).unwrap();
//!
//! let digits_only = Rule::new("digits-only")
//!     .normalize_char(|v, _| v.chars().filter(char::is_ascii_digit).collect());
//! let mut guard = attach(&mut doc, input, &AttachOptions::default().rule(digits_only)).unwrap();
//!
//! doc.focus(input);
//! doc.type_text(input, "1a2");
//! guard.pump(&mut doc);
//! assert_eq!(guard.display_value(&doc), "12");
//! ```

mod auto_attach;
mod context;
mod dataset;
mod error;
mod group;
mod guard;
mod options;
mod pipeline;
mod rule;
mod selection;
mod swap;

pub use auto_attach::{ATTACHED_ATTR, AutoAttach, RuleFactory};
pub use context::GuardContext;
pub use dataset::{Dataset, parse_bool, parse_enum, parse_enum_list, parse_number};
pub use error::{AttachError, RevertRequest, RuleFactoryError, TigError};
pub use group::GuardGroup;
pub use guard::{Guard, SetValueInput, SetValueMode};
pub use options::{AttachOptions, DEFAULT_INVALID_CLASS, SeparateMode};
pub use pipeline::{Pipeline, PipelineMode, PipelineOutcome};
pub use rule::{ElementKind, Phase, Rule, TransformFn, ValidateFn};
pub use selection::SelectionState;
pub use swap::{ORIGINAL_ID_ATTR, ORIGINAL_NAME_ATTR, RESERVED_PREFIX, ROLE_ATTR, SwapState};

use dom::{Document, NodeKey};
use log::warn;

/// Guard one text control.
///
/// Fails only if `node` is missing, is not a text-like input or textarea,
/// or already belongs to a guard.
pub fn attach(
    doc: &mut Document,
    node: NodeKey,
    options: &AttachOptions,
) -> Result<Guard, AttachError> {
    Guard::attach(doc, node, options)
}

/// Guard each node independently with the same options. Nodes that cannot
/// be guarded are skipped.
pub fn attach_all(
    doc: &mut Document,
    nodes: impl IntoIterator<Item = NodeKey>,
    options: &AttachOptions,
) -> GuardGroup {
    let mut guards = Vec::new();
    for node in nodes {
        match Guard::attach(doc, node, options) {
            Ok(guard) => guards.push(guard),
            Err(err) => {
                if options.warn {
                    warn!(target: "input_guard.guard", "[text-input-guard] attach_all: {err}");
                }
            }
        }
    }
    GuardGroup::new(guards)
}
