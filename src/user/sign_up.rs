//! Registering new users.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    Error, PasswordHash,
    request::{json_body, required_field},
    user::{NewUser, create_user, state::UserState},
};

/// The sign up request body.
#[derive(Debug, Default, Deserialize)]
pub struct SignUpData {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Register a new user from a JSON body with `username`, `email` and `password`.
pub async fn sign_up_endpoint(
    State(state): State<UserState>,
    payload: Result<Json<SignUpData>, JsonRejection>,
) -> Result<Response, Error> {
    let data = json_body(payload)?;
    let username = required_field(data.username, "username")?.trim().to_owned();
    let email = required_field(data.email, "email")?.trim().to_owned();
    let password = required_field(data.password, "password")?;

    let password_hash = PasswordHash::new(&password, state.password_cost)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let user = create_user(
        NewUser {
            username,
            email,
            password_hash,
        },
        &connection,
    )
    .inspect_err(|error| {
        if *error == Error::DuplicateEmail {
            tracing::info!("Rejected sign up with an email that is already registered");
        }
    })?;

    tracing::info!("New user {} signed up", user.id);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "result": true,
            "message": "User created successfully",
        })),
    )
        .into_response())
}

#[cfg(test)]
mod sign_up_endpoint_tests {
    use axum::{Router, http::StatusCode, routing::post};
    use axum_test::TestServer;
    use serde_json::{Value, json};

    use crate::{AppState, endpoints, test_utils::get_test_app_state, user::get_user_by_email};

    use super::sign_up_endpoint;

    fn get_test_server(state: AppState) -> TestServer {
        let app = Router::new()
            .route(endpoints::SIGN_UP, post(sign_up_endpoint))
            .with_state(state);

        TestServer::new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn sign_up_succeeds() {
        let (state, _dir) = get_test_app_state();
        let server = get_test_server(state.clone());

        let response = server
            .post(endpoints::SIGN_UP)
            .json(&json!({
                "username": "alice",
                "email": " alice@example.com ",
                "password": "correct horse battery staple",
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        assert_eq!(response.json::<Value>()["result"], true);
        let connection = state.db_connection.lock().unwrap();
        let user = get_user_by_email("alice@example.com", &connection).unwrap();
        assert_eq!(user.username, "alice");
        assert!(
            user.password_hash
                .verify("correct horse battery staple")
                .unwrap()
        );
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let (state, _dir) = get_test_app_state();
        let server = get_test_server(state);
        let body = json!({
            "username": "alice",
            "email": "alice@example.com",
            "password": "hunter2",
        });
        server
            .post(endpoints::SIGN_UP)
            .json(&body)
            .await
            .assert_status(StatusCode::CREATED);

        let response = server.post(endpoints::SIGN_UP).json(&body).await;

        response.assert_status(StatusCode::CONFLICT);
        let body = response.json::<Value>();
        assert_eq!(body["result"], false);
        assert_eq!(body["message"], "User email already exists");
    }

    #[tokio::test]
    async fn missing_fields_are_a_bad_request() {
        let (state, _dir) = get_test_app_state();
        let server = get_test_server(state);

        for body in [
            json!({ "email": "a@b.c", "password": "x" }),
            json!({ "username": "a", "password": "x" }),
            json!({ "username": "a", "email": "a@b.c" }),
            json!({ "username": "a", "email": "a@b.c", "password": "" }),
        ] {
            let response = server.post(endpoints::SIGN_UP).json(&body).await;

            response.assert_status(StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn malformed_json_is_a_bad_request() {
        let (state, _dir) = get_test_app_state();
        let server = get_test_server(state);

        let response = server
            .post(endpoints::SIGN_UP)
            .content_type("application/json")
            .text("{not json")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["result"], false);
    }
}
