use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use shortlink_core::{AllocateError, Allocation};
use tracing::warn;

/// The invocation event.
///
/// Missing fields default and mistyped fields are coerced, so that any
/// event still yields a well-formed [`ShortLinkResponse`]. Numbers and
/// booleans become their string form; `null`, arrays and objects count
/// as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShortLinkRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub url_long: String,
    #[serde(default, deserialize_with = "lenient_optional_string")]
    pub url_short: Option<String>,
    #[serde(default, deserialize_with = "lenient_optional_string")]
    pub cdn_prefix: Option<String>,
}

impl ShortLinkRequest {
    /// Decodes a raw invocation payload.
    ///
    /// A payload that is not a JSON object decodes to the empty request,
    /// which the allocator rejects as an invalid URL.
    pub fn from_event(payload: Value) -> Self {
        serde_json::from_value(payload).unwrap_or_else(|err| {
            warn!(error = %err, "undecodable invocation payload");
            Self::default()
        })
    }
}

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(scalar_to_string(Value::deserialize(deserializer)?).unwrap_or_default())
}

fn lenient_optional_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(scalar_to_string(Value::deserialize(deserializer)?))
}

/// The invocation result. Exactly one of `url_short` and `error` is
/// non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortLinkResponse {
    pub url_long: String,
    pub url_short: String,
    pub error: String,
}

impl ShortLinkResponse {
    pub fn from_outcome(url_long: String, outcome: Result<Allocation, AllocateError>) -> Self {
        match outcome {
            Ok(allocation) => Self {
                url_long,
                url_short: allocation.short_url,
                error: String::new(),
            },
            Err(err) => Self {
                url_long,
                url_short: String::new(),
                error: err.to_string(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_empty()
    }
}
