//! Values produced by handlers and middleware.

use serde::Serialize;
use serde_json::Value;

/// The value a handler or middleware hands back to the dispatch engine.
///
/// `Empty` means "returned nothing": from a middleware it leaves the pipeline
/// result untouched, from a handler it becomes the result. `Json(Value::Null)`
/// is an explicit null. Both render as an empty body.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Reply {
    #[default]
    Empty,
    Json(Value),
    Bytes(Vec<u8>),
}

impl Reply {
    /// Serialize any value into a JSON reply.
    pub fn json<T: Serialize>(value: &T) -> anyhow::Result<Self> {
        Ok(Reply::Json(serde_json::to_value(value)?))
    }

    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Reply::Json(Value::String(value.into()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Reply::Empty)
    }

    /// `Empty` or JSON null.
    #[must_use]
    pub fn is_nullish(&self) -> bool {
        matches!(self, Reply::Empty | Reply::Json(Value::Null))
    }

    /// String coercion: strings verbatim, other JSON values in their JSON
    /// form, bytes untouched.
    #[must_use]
    pub fn to_text_bytes(&self) -> Vec<u8> {
        match self {
            Reply::Empty => Vec::new(),
            Reply::Json(Value::String(s)) => s.as_bytes().to_vec(),
            Reply::Json(other) => other.to_string().into_bytes(),
            Reply::Bytes(bytes) => bytes.clone(),
        }
    }

    /// JSON serialization. Bytes are passed through as-is.
    pub fn to_json_bytes(&self) -> anyhow::Result<Vec<u8>> {
        match self {
            Reply::Empty => Ok(Vec::new()),
            Reply::Json(value) => Ok(serde_json::to_vec(value)?),
            Reply::Bytes(bytes) => Ok(bytes.clone()),
        }
    }
}

impl From<Value> for Reply {
    fn from(value: Value) -> Self {
        Reply::Json(value)
    }
}

impl From<String> for Reply {
    fn from(value: String) -> Self {
        Reply::Json(Value::String(value))
    }
}

impl From<&str> for Reply {
    fn from(value: &str) -> Self {
        Reply::Json(Value::String(value.to_string()))
    }
}

impl From<Vec<u8>> for Reply {
    fn from(value: Vec<u8>) -> Self {
        Reply::Bytes(value)
    }
}

impl From<()> for Reply {
    fn from(_: ()) -> Self {
        Reply::Empty
    }
}
