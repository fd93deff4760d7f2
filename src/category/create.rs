//! Category creation endpoint.

use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{
    Error,
    category::{lifecycle::create_category_with_image, state::CategoryState},
    upload::read_upload_form,
};

/// Handle a multipart form with a `name` and an image file.
pub async fn create_category_endpoint(
    State(state): State<CategoryState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, Error> {
    let multipart = multipart.map_err(|rejection| Error::MultipartError(rejection.body_text()))?;
    let mut form = read_upload_form(multipart, &state.upload_config).await?;
    let name = form.text("name").map(str::to_owned);

    let category = create_category_with_image(
        name.as_deref(),
        form.image.take(),
        &state.assets,
        &state.db_connection,
    )
    .await?;

    tracing::info!("Created category {} \"{}\"", category.id, category.name);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "result": true,
            "message": "Category added successfully",
            "category": category,
        })),
    )
        .into_response())
}

#[cfg(test)]
mod create_category_endpoint_tests {
    use axum::{Router, http::StatusCode, routing::post};
    use axum_test::{TestServer, multipart::MultipartForm};
    use serde_json::Value;
    use tempfile::TempDir;

    use crate::{
        AppState,
        category::{create_category_endpoint, get_all_categories},
        endpoints,
        test_utils::{count_files, get_test_app_state, image_part},
    };

    fn get_test_server() -> (TestServer, AppState, TempDir) {
        let (state, dir) = get_test_app_state();
        let app = Router::new()
            .route(endpoints::CATEGORY_CREATE, post(create_category_endpoint))
            .with_state(state.clone());

        let server = TestServer::new(app).expect("Could not create test server.");

        (server, state, dir)
    }

    #[tokio::test]
    async fn can_create_category() {
        let (server, state, dir) = get_test_server();
        let form = MultipartForm::new()
            .add_text("name", "Shoes")
            .add_part("image", image_part("shoes.png", "image/png"));

        let response = server.post(endpoints::CATEGORY_CREATE).multipart(form).await;

        response.assert_status(StatusCode::CREATED);
        let body = response.json::<Value>();
        assert_eq!(body["result"], true);
        assert_eq!(body["category"]["name"], "Shoes");
        assert!(body["category"]["_id"].as_i64().unwrap() > 0);
        let image = body["category"]["image"].as_str().unwrap();
        assert!(state.assets.contains(image));
        assert_eq!(count_files(dir.path()), 1);
    }

    #[tokio::test]
    async fn duplicate_name_is_a_conflict_and_writes_no_file() {
        let (server, state, dir) = get_test_server();
        let form = MultipartForm::new()
            .add_text("name", "Shoes")
            .add_part("image", image_part("shoes.png", "image/png"));
        server
            .post(endpoints::CATEGORY_CREATE)
            .multipart(form)
            .await
            .assert_status(StatusCode::CREATED);

        let form = MultipartForm::new()
            .add_text("name", "Shoes")
            .add_part("image", image_part("shoes.png", "image/png"));
        let response = server.post(endpoints::CATEGORY_CREATE).multipart(form).await;

        response.assert_status(StatusCode::CONFLICT);
        assert_eq!(response.json::<Value>()["message"], "Category already exists");
        assert_eq!(count_files(dir.path()), 1);
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_all_categories(&connection).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_name_is_a_bad_request() {
        let (server, state, dir) = get_test_server();
        let form = MultipartForm::new().add_part("image", image_part("shoes.png", "image/png"));

        let response = server.post(endpoints::CATEGORY_CREATE).multipart(form).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["result"], false);
        assert_eq!(count_files(dir.path()), 0);
        let connection = state.db_connection.lock().unwrap();
        assert!(get_all_categories(&connection).unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_image_is_a_bad_request() {
        let (server, state, _dir) = get_test_server();
        let form = MultipartForm::new().add_text("name", "Shoes");

        let response = server.post(endpoints::CATEGORY_CREATE).multipart(form).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["message"], "image is required");
        let connection = state.db_connection.lock().unwrap();
        assert!(get_all_categories(&connection).unwrap().is_empty());
    }

    #[tokio::test]
    async fn text_file_is_unsupported() {
        let (server, _state, dir) = get_test_server();
        let form = MultipartForm::new()
            .add_text("name", "Notes")
            .add_part("image", image_part("notes.txt", "image/png"));

        let response = server.post(endpoints::CATEGORY_CREATE).multipart(form).await;

        response.assert_status(StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(count_files(dir.path()), 0);
    }

    #[tokio::test]
    async fn non_multipart_body_is_a_bad_request() {
        let (server, _state, _dir) = get_test_server();

        let response = server
            .post(endpoints::CATEGORY_CREATE)
            .json(&serde_json::json!({ "name": "Shoes" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["result"], false);
    }
}
