//! Checking a user's email and password.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    Error,
    request::{json_body, required_field},
    user::{get_user_by_email, state::UserState},
};

/// The log-in request body.
#[derive(Debug, Default, Deserialize)]
pub struct LogInData {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Check the email and password in a JSON body and return the matching user.
///
/// An unknown email and a wrong password produce the same response.
pub async fn log_in_endpoint(
    State(state): State<UserState>,
    payload: Result<Json<LogInData>, JsonRejection>,
) -> Result<Response, Error> {
    let data = json_body(payload)?;
    let email = required_field(data.email, "email")?;
    let password = required_field(data.password, "password")?;

    let user = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_user_by_email(email.trim(), &connection).map_err(|error| match error {
            Error::NotFound => Error::InvalidCredentials,
            error => error,
        })?
    };

    let is_password_valid = user.password_hash.verify(&password).map_err(|error| {
        tracing::error!("Error verifying password for user {}: {error}", user.id);
        Error::HashingError(error.to_string())
    })?;

    if !is_password_valid {
        tracing::debug!("Wrong password for user {}", user.id);
        return Err(Error::InvalidCredentials);
    }

    tracing::info!("User {} logged in", user.id);

    Ok(Json(json!({
        "result": true,
        "message": "User logged in successfully",
        "user": user,
    }))
    .into_response())
}
