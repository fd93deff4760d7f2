//! Category update endpoint.

use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{
    Error,
    category::{
        CategoryName,
        lifecycle::{CategoryUpdate, apply_category_update},
        state::CategoryState,
    },
    request::parse_id,
    upload::read_upload_form,
};

/// Handle a multipart form with an `_id`, and optionally a new `name` and image file.
pub async fn update_category_endpoint(
    State(state): State<CategoryState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, Error> {
    let multipart = multipart.map_err(|rejection| Error::MultipartError(rejection.body_text()))?;
    let mut form = read_upload_form(multipart, &state.upload_config).await?;

    let category_id = parse_id(form.text("_id"), "_id")?;
    let name = form.text("name").map(CategoryName::new).transpose()?;
    let update = CategoryUpdate {
        name,
        image: form.image.take(),
    };

    let category =
        apply_category_update(category_id, update, &state.assets, &state.db_connection).await?;

    tracing::info!("Updated category {} \"{}\"", category.id, category.name);

    Ok(Json(json!({
        "result": true,
        "message": "Category updated successfully",
        "category": category,
    }))
    .into_response())
}
