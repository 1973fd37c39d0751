//! JSON request/response boundary
//!
//! A transport-neutral version of the formatting API: a caller hands over a
//! JSON body `{"sql": "...", "add_aliases": true}` and gets back either
//! `{"formatted_sql": "..."}` or `{"error": "..."}` together with a status
//! class it can map onto its own protocol.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{format_with_options, Error, Options};

const NO_DATA: &str = "No data provided";

/// Incoming formatting request
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FormatRequest {
    #[serde(default)]
    pub sql: Option<String>,
    #[serde(default)]
    pub add_aliases: bool,
}

/// Outgoing response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FormatResponse {
    Formatted { formatted_sql: String },
    Failed { error: String },
}

/// Outcome class of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    /// Missing body or missing SQL
    ClientError,
    /// Formatting failed
    ServerError,
}

impl FormatResponse {
    fn failed(message: impl Into<String>) -> Self {
        FormatResponse::Failed {
            error: message.into(),
        }
    }
}

/// Handle a decoded request
pub fn handle(request: &FormatRequest) -> (Status, FormatResponse) {
    let sql = request.sql.as_deref().unwrap_or_default();
    let options = Options {
        add_aliases: request.add_aliases,
    };

    match format_with_options(sql, &options) {
        Ok(formatted_sql) => (Status::Ok, FormatResponse::Formatted { formatted_sql }),
        Err(e) if e.is_input_error() => (Status::ClientError, FormatResponse::failed(e.to_string())),
        Err(e) => {
            tracing::warn!(error = %e, "formatting request failed");
            (Status::ServerError, FormatResponse::failed(error_message(&e)))
        }
    }
}

/// Handle a raw JSON body and return the serialized response.
///
/// A body that is not JSON, or is an empty value (`null`, `{}`, `[]`, `""`,
/// `0`, `false`), counts as no data.
pub fn handle_json(body: &str) -> (Status, String) {
    let request = serde_json::from_str::<Value>(body)
        .ok()
        .filter(|value| !is_empty_value(value))
        .and_then(|value| serde_json::from_value::<FormatRequest>(value).ok());

    let (status, response) = match request {
        Some(request) => handle(&request),
        None => (Status::ClientError, FormatResponse::failed(NO_DATA)),
    };
    (status, to_json(&response))
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}

/// Serialize a response body
pub fn to_json(response: &FormatResponse) -> String {
    serde_json::to_string(response)
        .unwrap_or_else(|_| String::from(r#"{"error":"failed to serialize response"}"#))
}

/// The underlying message, without the variant's prefix
fn error_message(error: &Error) -> String {
    match error {
        Error::FormatError { message } | Error::ParseError { message, .. } => message.clone(),
        other => other.to_string(),
    }
}
