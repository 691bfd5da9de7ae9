use crate::rule::Phase;
use dom::NodeKey;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A validation finding. Codes are stable identifiers such as
/// `digits.int_overflow`; no human-readable message is attached.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TigError {
    pub code: String,
    pub rule: String,
    pub phase: Phase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
}

impl TigError {
    pub fn new(code: impl Into<String>, rule: impl Into<String>, phase: Phase) -> Self {
        Self {
            code: code.into(),
            rule: rule.into(),
            phase,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: Value) -> Self {
        self.detail = Some(detail);
        self
    }
}

/// Request to discard the current edit and restore the last accepted value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RevertRequest {
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
}

impl RevertRequest {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: Value) -> Self {
        self.detail = Some(detail);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttachError {
    MissingNode(NodeKey),
    /// Only text-like `<input>` elements and `<textarea>` can be guarded.
    NotTextControl(NodeKey),
    /// The node already plays a raw or display role for another guard.
    AlreadyGuarded(NodeKey),
}

impl fmt::Display for AttachError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttachError::MissingNode(key) => write!(f, "no live node for key {}", key.0),
            AttachError::NotTextControl(key) => {
                write!(f, "node {} is not a text input or textarea", key.0)
            }
            AttachError::AlreadyGuarded(key) => write!(f, "node {} is already guarded", key.0),
        }
    }
}

impl std::error::Error for AttachError {}

/// A rule factory could not build its rule from declarative attributes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RuleFactoryError {
    InvalidValue {
        rule: String,
        key: String,
        value: String,
    },
    Message {
        rule: String,
        message: String,
    },
}

impl RuleFactoryError {
    pub fn invalid(rule: &str, key: &str, value: &str) -> Self {
        RuleFactoryError::InvalidValue {
            rule: rule.to_string(),
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

impl fmt::Display for RuleFactoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleFactoryError::InvalidValue { rule, key, value } => {
                write!(f, "[{rule}] invalid value for {key}: {value:?}")
            }
            RuleFactoryError::Message { rule, message } => write!(f, "[{rule}] {message}"),
        }
    }
}

impl std::error::Error for RuleFactoryError {}
