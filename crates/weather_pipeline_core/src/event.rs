use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Delivery delay applied to every outbound queue send, in seconds.
pub const DELIVERY_DELAY_SECONDS: i32 = 3;

/// One weather observation. Serialized field order is the wire contract:
/// `locationName, temperature, timestamp, longitude, latitude`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct WeatherEvent {
    pub location_name: String,
    pub temperature: f64,
    pub timestamp: i64,
    pub longitude: f64,
    pub latitude: f64,
}

/// Bucket and key of one uploaded object named by a storage notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectLocation {
    pub bucket: String,
    pub key: String,
}

/// Decodes one uploaded object's content as a JSON array of weather events.
/// A non-array top level, a malformed document, or any malformed element
/// fails the decode as a whole.
pub fn decode_event_array(bytes: &[u8]) -> Result<Vec<WeatherEvent>, PipelineError> {
    serde_json::from_slice(bytes)
        .map_err(|error| PipelineError::decode(format!("invalid weather event array: {error}")))
}

/// Decodes one queue message body as a single weather event.
pub fn decode_event(body: &str) -> Result<WeatherEvent, PipelineError> {
    serde_json::from_str(body)
        .map_err(|error| PipelineError::decode(format!("invalid weather event body: {error}")))
}

/// Canonical JSON text of one weather event.
pub fn encode_event(event: &WeatherEvent) -> Result<String, PipelineError> {
    serde_json::to_string(event)
        .map_err(|error| PipelineError::decode(format!("failed to encode weather event: {error}")))
}
