//! Category listing endpoint.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{
    Error,
    category::{get_all_categories, state::CategoryState},
};

/// Return every category.
pub async fn get_categories_endpoint(
    State(state): State<CategoryState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let categories = get_all_categories(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?;

    Ok(Json(json!({
        "result": true,
        "message": "Categories retrieved successfully",
        "categories": categories,
    }))
    .into_response())
}
