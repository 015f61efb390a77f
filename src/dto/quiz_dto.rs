use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::models::quiz_session::ReviewItem;
use crate::services::quiz_service::StartParams;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguagesResponse {
    pub languages: Vec<String>,
}

/// Loosely typed on purpose: browsers send numbers, numeric strings or nothing at all.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartQuizRequest {
    pub languages: Option<JsonValue>,
    pub per_language: Option<JsonValue>,
    pub time_per_question: Option<JsonValue>,
    pub threshold: Option<JsonValue>,
}

impl StartQuizRequest {
    pub fn into_params(self) -> StartParams {
        let defaults = StartParams::default();
        let languages = match self.languages {
            Some(JsonValue::Array(items)) => items
                .into_iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        };
        StartParams {
            languages,
            per_language: positive_or(self.per_language.as_ref(), defaults.per_language),
            time_per_question: positive_or(
                self.time_per_question.as_ref(),
                defaults.time_per_question,
            ),
            threshold: positive_or(self.threshold.as_ref(), defaults.threshold),
        }
    }
}

fn positive_or(value: Option<&JsonValue>, default: u32) -> u32 {
    let parsed = match value {
        Some(JsonValue::Number(n)) => n.as_f64().map(|f| f.trunc() as i64),
        Some(JsonValue::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed
        .filter(|n| *n > 0)
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartQuizResponse {
    pub ok: bool,
    pub total: usize,
    pub languages: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRequest {
    pub question_id: Option<JsonValue>,
    pub answer_index: Option<JsonValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OkResponse {
    pub ok: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NavigateRequest {
    pub direction: Option<JsonValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigateResponse {
    pub current_index: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewResponse {
    pub review: Vec<ReviewItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub ok: bool,
    pub filename: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectResponse {
    pub detected: Vec<String>,
    pub text_snippet: String,
}
