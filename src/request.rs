//! Helpers for pulling required values out of request bodies.

use axum::{Json, extract::rejection::JsonRejection};
use serde::{Deserialize, Deserializer, de::DeserializeOwned};

use crate::Error;

/// A request body that only identifies a record by its `_id`.
#[derive(Debug, Default, Deserialize)]
pub struct IdRequest {
    /// The record ID, sent as either a JSON number or a numeric string.
    #[serde(rename = "_id", default, deserialize_with = "deserialize_optional_id")]
    pub id: Option<i64>,
}

/// Unwrap a JSON body, turning a rejected body into a client error.
pub fn json_body<T: DeserializeOwned>(
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, Error> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        tracing::debug!("Rejected JSON body: {}", rejection.body_text());
        Error::InvalidField {
            field: "body",
            reason: rejection.body_text(),
        }
    })
}

/// Require a value that is present and not just whitespace.
///
/// The value is returned as sent, without trimming.
pub fn required_field(value: Option<String>, field: &'static str) -> Result<String, Error> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::MissingField(field)),
    }
}

/// Parse a record ID sent as a form field.
pub fn parse_id(value: Option<&str>, field: &'static str) -> Result<i64, Error> {
    let value = value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(Error::MissingField(field))?;

    value.parse().map_err(|_| Error::InvalidField {
        field,
        reason: format!("\"{value}\" is not a valid ID"),
    })
}

fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i64),
        Text(String),
    }

    match Option::<RawId>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawId::Number(id)) => Ok(Some(id)),
        Some(RawId::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(RawId::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("\"{text}\" is not a valid ID"))),
    }
}
