//! Deterministic text rendering of a subtree for test assertions.
//!
//! Not a stable format. One line per node, two spaces of indent per level.
//! Text controls append their current value: `<input id="a"> value="12"`.

use crate::{Document, NodeKey};
use std::fmt::{self, Write};

#[derive(Debug)]
pub struct DomSnapshot {
    lines: Vec<String>,
}

impl DomSnapshot {
    pub fn new(doc: &Document, root: NodeKey) -> Self {
        let mut lines = Vec::new();
        walk(doc, root, 0, &mut lines);
        Self { lines }
    }

    pub fn as_lines(&self) -> &[String] {
        &self.lines
    }

    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}

impl fmt::Display for DomSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn walk(doc: &Document, key: NodeKey, depth: usize, out: &mut Vec<String>) {
    let mut line = "  ".repeat(depth);
    if let Some(name) = doc.element_name(key) {
        line.push('<');
        line.push_str(name);
        for (attr, value) in doc.attributes(key) {
            let _ = match value {
                Some(v) => write!(line, " {attr}=\"{}\"", escape(v)),
                None => write!(line, " {attr}"),
            };
        }
        line.push('>');
        if matches!(name, "input" | "textarea") {
            let _ = write!(line, " value=\"{}\"", escape(doc.value(key)));
        }
    } else if let Some(text) = doc.text(key) {
        let _ = write!(line, "\"{}\"", escape(text));
    } else {
        line.push_str("#document");
    }
    out.push(line);

    for child in doc.children(key) {
        walk(doc, *child, depth + 1, out);
    }
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}
