//! Request and response shapes of the client-secrets endpoint.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Kind tag of the session the ephemeral key is issued for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Realtime,
}

/// Inner `session` object of the request body.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SessionSpec {
    #[serde(rename = "type")]
    pub kind: SessionKind,
    pub model: String,
}

/// Request body: `{"session": {"type": "realtime", "model": "..."}}`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SessionRequest {
    pub session: SessionSpec,
}

impl SessionRequest {
    pub fn new(kind: SessionKind, model: impl Into<String>) -> Self {
        Self {
            session: SessionSpec {
                kind,
                model: model.into(),
            },
        }
    }
}

/// Response body, kept as the opaque mapping the service returned.
///
/// Only `value` and `expires_at` are ever looked at; everything else is
/// carried through to the key file untouched and in the original order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct SessionResponse {
    fields: Map<String, Value>,
}

impl SessionResponse {
    pub const VALUE_FIELD: &'static str = "value";
    pub const EXPIRES_AT_FIELD: &'static str = "expires_at";

    /// Parse a response body. Fails unless the body is a JSON object.
    pub fn from_body(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }

    /// The ephemeral key, if the service sent one as a string.
    pub fn value(&self) -> Option<&str> {
        self.fields.get(Self::VALUE_FIELD).and_then(Value::as_str)
    }

    /// Expiry as sent: a unix timestamp number or a string.
    pub fn expires_at(&self) -> Option<&Value> {
        self.fields.get(Self::EXPIRES_AT_FIELD)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Pretty-printed body with 2-space indentation.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.fields)
    }
}

impl From<Map<String, Value>> for SessionResponse {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}
