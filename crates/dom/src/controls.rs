use crate::arena::Attributes;

/// Form-control classification used to decide value and selection handling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlType {
    /// Single-line text-like input: text, search, tel, url, email, password,
    /// or an input with no usable `type`.
    Text,
    Textarea,
    Hidden,
    Checkbox,
    Radio,
    /// Any other input type, or a non-control element.
    Other,
}

impl ControlType {
    /// Whether the control carries a user-editable string value.
    pub fn is_text_control(self) -> bool {
        matches!(self, ControlType::Text | ControlType::Textarea)
    }

    /// Whether `selectionStart`/`selectionEnd` are meaningful for the control.
    pub fn supports_selection(self) -> bool {
        self.is_text_control()
    }

    pub fn is_multiline(self) -> bool {
        self == ControlType::Textarea
    }
}

pub(crate) fn control_type(name: &str, attributes: &Attributes) -> ControlType {
    if name.eq_ignore_ascii_case("textarea") {
        return ControlType::Textarea;
    }
    if !name.eq_ignore_ascii_case("input") {
        return ControlType::Other;
    }

    let ty = attr(attributes, "type")
        .map(str::trim)
        .filter(|s| !s.is_empty());

    match ty {
        None => ControlType::Text,
        Some(t)
            if ["text", "search", "tel", "url", "email", "password"]
                .iter()
                .any(|k| t.eq_ignore_ascii_case(k)) =>
        {
            ControlType::Text
        }
        Some(t) if t.eq_ignore_ascii_case("hidden") => ControlType::Hidden,
        Some(t) if t.eq_ignore_ascii_case("checkbox") => ControlType::Checkbox,
        Some(t) if t.eq_ignore_ascii_case("radio") => ControlType::Radio,
        _ => ControlType::Other,
    }
}

pub(crate) fn attr<'a>(attributes: &'a Attributes, name: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .and_then(|(_, v)| v.as_deref())
}
