use serde::Deserialize;

use super::TransportError;

/// Failure payload the gateway attaches to 4xx responses.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default, alias = "reason")]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Vec<String>,
}

pub fn decode_error_body(json: &[u8]) -> Result<ErrorBody, TransportError> {
    Ok(serde_json::from_slice(json)?)
}
