use serde::Deserialize;
use serde::de::DeserializeOwned;

use data::{AjaxContext, GraphArtwork};

use crate::FetchError;

/// A freshly rendered graph. `error` is a soft failure: the artwork is still
/// valid and shown, with the message on top.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AjaxGraph {
    #[serde(default)]
    pub html: String,
    pub graph: GraphArtwork,
    pub context: AjaxContext,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HoverData {
    pub rendered_hover_time: String,
    #[serde(default)]
    pub curve_values: Vec<CurveValue>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CurveValue {
    pub color: String,
    pub title: String,
    pub rendered_value: (Option<f64>, String),
}

/// Decodes a response body.
///
/// Bodies wrapped in a `{"result_code": .., "result": ..}` envelope are
/// unwrapped first; a non-zero code becomes [`FetchError::Application`].
/// Anything else is decoded as `T` directly.
pub fn decode<T: DeserializeOwned>(body: &str) -> Result<T, FetchError> {
    let value: serde_json::Value = serde_json::from_str(body)?;

    let Some(code) = value.get("result_code") else {
        return Ok(serde_json::from_value(value)?);
    };

    let code = code
        .as_i64()
        .ok_or_else(|| FetchError::Parse(format!("Invalid result_code: {code}")))?;
    let result = value
        .get("result")
        .cloned()
        .unwrap_or(serde_json::Value::Null);

    if code != 0 {
        let message = match result {
            serde_json::Value::String(message) => message,
            serde_json::Value::Null => value
                .get("error")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("Unknown error")
                .to_string(),
            other => other.to_string(),
        };
        return Err(FetchError::Application { code, message });
    }

    Ok(serde_json::from_value(result)?)
}
