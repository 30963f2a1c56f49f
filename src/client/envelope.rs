//! The `{ success, data, message }` envelope every endpoint answers with

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub success: bool,

    pub data: Option<T>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Turn `success: false` into a business error
    pub fn into_result(self) -> Result<Self> {
        if self.success {
            Ok(self)
        } else {
            Err(Error::Business(
                self.message.unwrap_or_else(|| "Request failed".to_string()),
            ))
        }
    }

    /// Payload of a successful response
    pub fn into_data(self) -> Result<T> {
        self.into_result()?
            .data
            .ok_or_else(|| Error::InvalidResponse("response carried no data".to_string()))
    }
}

/// Best-effort `message` out of an error body
pub(crate) fn error_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()?
        .get("message")?
        .as_str()
        .map(str::to_string)
}
