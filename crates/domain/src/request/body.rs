//! HTTP Request body types

use serde::{Deserialize, Serialize};

/// HTTP request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RequestBody {
    /// Structured JSON body
    Json {
        /// The JSON document to send
        value: serde_json::Value,
    },
    /// Raw text body with an explicit content type
    Raw {
        /// The content type (e.g., "text/plain")
        content_type: String,
        /// The body content
        content: String,
    },
}

impl RequestBody {
    /// Creates a JSON body.
    #[must_use]
    pub const fn json(value: serde_json::Value) -> Self {
        Self::Json { value }
    }

    /// Creates a plain text body.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::Raw {
            content_type: "text/plain".to_string(),
            content: content.into(),
        }
    }

    /// Returns the content type the body should be sent with.
    #[must_use]
    pub fn content_type(&self) -> &str {
        match self {
            Self::Json { .. } => "application/json",
            Self::Raw { content_type, .. } => content_type,
        }
    }

    /// Returns the JSON document if this is a JSON body.
    #[must_use]
    pub const fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json { value } => Some(value),
            Self::Raw { .. } => None,
        }
    }

    /// Encodes the body for the wire.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::Json { value } => value.to_string().into_bytes(),
            Self::Raw { content, .. } => content.clone().into_bytes(),
        }
    }
}
