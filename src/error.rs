//! Defines the app level error type and its conversion into JSON responses.
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A required request field was not provided or was blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// A request field was provided but could not be parsed.
    #[error("invalid value for {field}: {reason}")]
    InvalidField {
        /// The name of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// An empty string was used to create a category name.
    #[error("Category name cannot be empty")]
    EmptyCategoryName,

    /// The request body could not be parsed as a multipart form.
    #[error("Could not parse multipart form: {0}")]
    MultipartError(String),

    /// The multipart form contained a file under a field other than the upload field.
    #[error("Unexpected file field \"{0}\"")]
    UnexpectedFileField(String),

    /// The multipart form contained more than one file under the upload field.
    #[error("Only one file may be uploaded per request")]
    TooManyFiles,

    /// The uploaded file is not one of the allowed image types.
    ///
    /// Both the file extension and the declared content type must be allowed.
    #[error("Images only! Allowed types are {0}")]
    UnsupportedMediaType(String),

    /// The uploaded file or request body exceeded the configured size limit in bytes.
    #[error("File too large, the limit is {0} bytes")]
    PayloadTooLarge(usize),

    /// A category with the same name already exists.
    #[error("Category already exists")]
    DuplicateCategoryName,

    /// A user with the same email address already exists.
    #[error("User email already exists")]
    DuplicateEmail,

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// There is no category with the requested ID.
    #[error("Category not found")]
    CategoryNotFound,

    /// There is no user with the requested ID.
    #[error("User not found")]
    UserNotFound,

    /// The email/password combination did not match a registered user.
    ///
    /// Unknown emails and wrong passwords are reported the same way.
    #[error("User not found")]
    InvalidCredentials,

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// Reading or writing the asset directory failed.
    #[error("asset storage failed: {0}")]
    StorageError(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("category.name") =>
            {
                Error::DuplicateCategoryName
            }
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    /// The HTTP status code reported to the client for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::MissingField(_)
            | Error::InvalidField { .. }
            | Error::EmptyCategoryName
            | Error::MultipartError(_)
            | Error::UnexpectedFileField(_)
            | Error::TooManyFiles => StatusCode::BAD_REQUEST,
            Error::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Error::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Error::DuplicateCategoryName | Error::DuplicateEmail => StatusCode::CONFLICT,
            Error::NotFound
            | Error::CategoryNotFound
            | Error::UserNotFound
            | Error::InvalidCredentials => StatusCode::NOT_FOUND,
            Error::HashingError(_)
            | Error::StorageError(_)
            | Error::SqlError(_)
            | Error::DatabaseLockError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        let message = if status_code.is_server_error() {
            // Server side details are not intended to be shown to the client.
            tracing::error!("An unexpected error occurred: {}", self);
            "Server error".to_owned()
        } else {
            self.to_string()
        };

        (status_code, Json(json!({ "result": false, "message": message }))).into_response()
    }
}
