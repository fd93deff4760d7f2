use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{
    Error,
    request::{IdRequest, json_body},
    user::{UserID, get_user_by_id, state::UserState},
};

/// Return the public profile of the user whose `_id` is in the JSON body.
pub async fn user_profile_endpoint(
    State(state): State<UserState>,
    payload: Result<Json<IdRequest>, JsonRejection>,
) -> Result<Response, Error> {
    let user_id = json_body(payload)?
        .id
        .map(UserID::new)
        .ok_or(Error::MissingField("_id"))?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let user = get_user_by_id(user_id, &connection).map_err(|error| match error {
        Error::NotFound => Error::UserNotFound,
        error => error,
    })?;

    Ok(Json(json!({ "result": true, "user": user })).into_response())
}
