//! Category deletion endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{
    Error,
    category::{lifecycle::delete_category_and_image, state::CategoryState},
    request::{IdRequest, json_body},
};

/// Handle a JSON body with the `_id` of the category to delete.
pub async fn delete_category_endpoint(
    State(state): State<CategoryState>,
    payload: Result<Json<IdRequest>, JsonRejection>,
) -> Result<Response, Error> {
    let category_id = json_body(payload)?.id.ok_or(Error::MissingField("_id"))?;

    let category =
        delete_category_and_image(category_id, &state.assets, &state.db_connection).await?;

    tracing::info!("Deleted category {} \"{}\"", category.id, category.name);

    Ok(Json(json!({
        "result": true,
        "message": "Category deleted successfully",
    }))
    .into_response())
}
