//! Application router configuration.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};

use crate::{
    AppState, Error,
    category::{
        create_category_endpoint, delete_category_endpoint, get_categories_endpoint,
        update_category_endpoint,
    },
    endpoints,
    user::{log_in_endpoint, sign_up_endpoint, user_profile_endpoint},
};

/// Return a router with all the app's routes.
///
/// Uploaded images are served as static files from [endpoints::UPLOADS].
/// Cross-origin requests are allowed from any origin.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.upload_config.request_body_limit();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let user_routes = Router::new()
        .route(endpoints::SIGN_UP, post(sign_up_endpoint))
        .route(endpoints::LOG_IN, post(log_in_endpoint))
        .route(endpoints::USER_PROFILE, post(user_profile_endpoint));

    let category_routes = Router::new()
        .route(endpoints::CATEGORY_CREATE, post(create_category_endpoint))
        .route(endpoints::CATEGORY_GET, get(get_categories_endpoint))
        .route(endpoints::CATEGORY_UPDATE, post(update_category_endpoint))
        .route(endpoints::CATEGORY_DELETE, delete(delete_category_endpoint));

    user_routes
        .merge(category_routes)
        .nest_service(endpoints::UPLOADS, ServeDir::new(state.assets.root()))
        .fallback(get_404_not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .with_state(state)
}

async fn get_404_not_found() -> Response {
    Error::NotFound.into_response()
}
