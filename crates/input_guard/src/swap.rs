//! Raw/display separation.
//!
//! The original node keeps the submission value as a hidden input (the
//! "raw" node) and a synthesized text input right after it (the "display"
//! node) takes over its id, classes and presentation attributes. Every
//! operation degrades per attribute: a DOM failure is logged and skipped.

use dom::{Document, DomError, NodeKey};
use log::debug;

pub const ROLE_ATTR: &str = "data-tig-role";
pub const ORIGINAL_ID_ATTR: &str = "data-tig-original-id";
pub const ORIGINAL_NAME_ATTR: &str = "data-tig-original-name";
pub const RESERVED_PREFIX: &str = "data-tig-";

const ROLE_RAW: &str = "raw";
const ROLE_DISPLAY: &str = "display";

/// Presentation and accessibility attributes mirrored onto the display node.
const UI_ATTRS: &[&str] = &[
    "placeholder",
    "inputmode",
    "enterkeyhint",
    "autocomplete",
    "required",
    "readonly",
    "disabled",
    "minlength",
    "maxlength",
    "pattern",
    "title",
    "tabindex",
    "size",
    "spellcheck",
    "autocapitalize",
    "dir",
    "lang",
    "style",
];

fn is_mirrored(name: &str) -> bool {
    if name.starts_with(RESERVED_PREFIX) {
        return false;
    }
    UI_ATTRS.contains(&name) || name.starts_with("aria-") || name.starts_with("data-")
}

#[derive(Clone, Debug)]
pub struct SwapState {
    raw: NodeKey,
    display: Option<NodeKey>,
    original_type: Option<String>,
    original_id: Option<String>,
    original_name: Option<String>,
    original_class: Option<String>,
    ui_attrs: Vec<(String, Option<String>)>,
}

impl SwapState {
    /// Record what `raw` looks like before it is converted.
    pub fn snapshot(doc: &Document, raw: NodeKey) -> Self {
        let owned = |name: &str| doc.attribute(raw, name).map(str::to_string);
        let ui_attrs = doc
            .attributes(raw)
            .filter(|(name, _)| is_mirrored(name))
            .map(|(name, value)| (name.to_string(), value.map(str::to_string)))
            .collect();
        Self {
            raw,
            display: None,
            original_type: owned("type"),
            original_id: owned("id"),
            original_name: owned("name"),
            original_class: owned("class"),
            ui_attrs,
        }
    }

    pub fn raw(&self) -> NodeKey {
        self.raw
    }

    pub fn display(&self) -> Option<NodeKey> {
        self.display
    }

    pub fn original_id(&self) -> Option<&str> {
        self.original_id.as_deref()
    }

    pub fn original_name(&self) -> Option<&str> {
        self.original_name.as_deref()
    }

    pub fn ui_attrs(&self) -> &[(String, Option<String>)] {
        &self.ui_attrs
    }

    /// Turn the original node into hidden storage and free its id.
    pub fn apply_to_raw(&self, doc: &mut Document) {
        let raw = self.raw;
        soft(doc.set_attribute(raw, "type", "hidden"), "raw type");
        soft(doc.remove_attribute(raw, "id"), "raw id");
        soft(doc.remove_attribute(raw, "class"), "raw class");
        soft(doc.set_attribute(raw, ROLE_ATTR, ROLE_RAW), "raw role");
        if let Some(id) = &self.original_id {
            soft(doc.set_attribute(raw, ORIGINAL_ID_ATTR, id), "raw original id");
        }
        if let Some(name) = &self.original_name {
            soft(doc.set_attribute(raw, ORIGINAL_NAME_ATTR, name), "raw original name");
        }
        debug!(target: "input_guard.swap", "node {} converted to raw", raw.0);
    }

    /// Build the display node, insert it right after the raw node and
    /// return it. `None` if the raw node cannot take a sibling.
    pub fn create_display(&mut self, doc: &mut Document) -> Option<NodeKey> {
        if let Some(display) = self.display {
            return Some(display);
        }
        let display = doc.create_element("input");
        soft(doc.set_attribute(display, "type", "text"), "display type");
        soft(doc.set_attribute(display, ROLE_ATTR, ROLE_DISPLAY), "display role");
        if let Some(id) = &self.original_id {
            soft(doc.set_attribute(display, "id", id), "display id");
        }
        if let Some(class) = &self.original_class {
            soft(doc.set_attribute(display, "class", class), "display class");
        }
        for (name, value) in &self.ui_attrs {
            soft(
                doc.set_attribute_opt(display, name, value.as_deref()),
                "display ui attribute",
            );
        }

        if let Err(err) = doc.insert_after(self.raw, display) {
            debug!(target: "input_guard.swap", "display not inserted: {err}");
            soft(doc.remove_node(display), "orphan display");
            return None;
        }
        let value = doc.value(self.raw).to_string();
        soft(doc.set_value(display, &value), "display value");

        debug!(
            target: "input_guard.swap",
            "display {} inserted after raw {}",
            display.0,
            self.raw.0
        );
        self.display = Some(display);
        Some(display)
    }

    /// Detach the display node if present. Safe to call repeatedly.
    pub fn remove_display(&mut self, doc: &mut Document) {
        if let Some(display) = self.display.take()
            && doc.contains(display)
        {
            soft(doc.remove_node(display), "remove display");
            debug!(target: "input_guard.swap", "display {} removed", display.0);
        }
    }

    /// Undo [`Self::apply_to_raw`] exactly.
    pub fn restore_raw(&self, doc: &mut Document) {
        let raw = self.raw;
        restore(doc, raw, "type", self.original_type.as_deref());
        restore(doc, raw, "id", self.original_id.as_deref());
        restore(doc, raw, "name", self.original_name.as_deref());
        restore(doc, raw, "class", self.original_class.as_deref());
        for attr in [ROLE_ATTR, ORIGINAL_ID_ATTR, ORIGINAL_NAME_ATTR] {
            soft(doc.remove_attribute(raw, attr), "strip marker");
        }
        debug!(target: "input_guard.swap", "raw {} restored", raw.0);
    }
}

fn restore(doc: &mut Document, key: NodeKey, name: &str, value: Option<&str>) {
    match value {
        Some(v) => soft(doc.set_attribute(key, name, v), name),
        None => soft(doc.remove_attribute(key, name), name),
    }
}

fn soft<T>(result: Result<T, DomError>, what: &str) {
    if let Err(err) = result {
        debug!(target: "input_guard.swap", "{what} skipped: {err}");
    }
}
