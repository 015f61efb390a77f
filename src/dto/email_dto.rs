use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Fields stay untyped so a wrong type surfaces as a field validation message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SendEmailRequest {
    pub status: Option<JsonValue>,
    pub name: Option<JsonValue>,
    pub email: Option<JsonValue>,
    pub position: Option<JsonValue>,
}

/// String content of an optional JSON field; other types count as missing.
pub fn text(value: &Option<JsonValue>) -> Option<&str> {
    value.as_ref().and_then(JsonValue::as_str)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailResponse {
    pub ok: bool,
    pub message_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub time: String,
}
