use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const PREVIEW_ERROR_TYPE: &str = "preview-error";

/// Payload the sandbox posts to its parent when bundling, transpiling or
/// rendering fails.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PreviewMessage {
    #[serde(rename = "type")]
    pub kind: String,
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl PreviewMessage {
    pub fn error(error: impl Into<String>, stack: Option<String>) -> Self {
        Self {
            kind: PREVIEW_ERROR_TYPE.to_string(),
            error: error.into(),
            stack,
        }
    }

    /// Accepts only `preview-error` messages; any other shape yields `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        if object.get("type")?.as_str()? != PREVIEW_ERROR_TYPE {
            return None;
        }
        let error = object.get("error")?.as_str()?.to_string();
        let stack = object
            .get("stack")
            .and_then(Value::as_str)
            .map(str::to_string);
        Some(Self::error(error, stack))
    }

    pub fn from_json(text: &str) -> Option<Self> {
        let value: Value = serde_json::from_str(text).ok()?;
        Self::from_value(&value)
    }

    /// Error text handed to the fix prompt: message plus stack when present.
    pub fn describe(&self) -> String {
        match &self.stack {
            Some(stack) if !stack.trim().is_empty() && stack.trim() != self.error.trim() => {
                format!("{}\n{}", self.error, stack)
            }
            _ => self.error.clone(),
        }
    }
}
