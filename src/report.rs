//! Uniform rendering of operation outcomes
//!
//! Every operation returns `Result<T>`. For machine-readable output the CLI
//! converts that into an `OperationReport`, which always has the same shape.

use serde::Serialize;
use serde_json::{json, Value};

use crate::error::{AgentError, Result};

/// Tagged outcome of a single operation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationReport {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl OperationReport {
    pub fn ok(message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            error: None,
            data,
        }
    }

    /// Failure report; merge conflicts keep their path list as data
    pub fn failed(err: &AgentError) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(err.to_string()),
            data: err.conflicts().map(|paths| json!({ "conflicts": paths })),
        }
    }

    /// Render a result, serializing the success value as data
    ///
    /// Unit values produce no data.
    pub fn from_result<T: Serialize>(result: &Result<T>, message: impl Into<String>) -> Self {
        match result {
            Ok(value) => match serde_json::to_value(value) {
                Ok(Value::Null) => Self::ok(message, None),
                Ok(data) => Self::ok(message, Some(data)),
                Err(e) => Self::failed(&AgentError::Json(e)),
            },
            Err(e) => Self::failed(e),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
