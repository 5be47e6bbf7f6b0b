//! Source value type

use serde::Serialize;
use serde_json::Value;

use wopr_core::{FetchError, Payload};

/// Parsed output of a source command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonPayload {
    /// The document as printed
    pub data: Value,
    /// Temperature picked out of the document for the trend history
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl JsonPayload {
    /// Parse command output, optionally extracting a numeric temperature
    /// field from the top-level object
    pub fn parse(bytes: &[u8], temperature_field: Option<&str>) -> Result<Self, FetchError> {
        let data: Value =
            serde_json::from_slice(bytes).map_err(|e| FetchError::Parse(e.to_string()))?;

        let temperature = temperature_field
            .and_then(|field| data.get(field))
            .and_then(Value::as_f64)
            .map(|t| t as f32);

        Ok(Self { data, temperature })
    }
}

impl Payload for JsonPayload {
    fn temperature(&self) -> Option<f32> {
        self.temperature
    }
}
