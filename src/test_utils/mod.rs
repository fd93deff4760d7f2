#![allow(missing_docs)]

use std::path::Path;

use axum::{body::Body, response::Response};
use axum_test::multipart::Part;
use rusqlite::Connection;
use serde_json::Value;
use tempfile::TempDir;

use crate::{
    AppState,
    upload::{AssetDirectory, ImageUpload, UploadConfig},
};

/// The smallest valid PNG, a single transparent pixel.
pub(crate) const PNG_BYTES: &[u8] = &[
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1f,
    0x15, 0xc4, 0x89, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9c, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0d, 0x0a, 0x2d, 0xb4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
];

/// An app state backed by an in-memory database, storing uploads in a fresh temporary directory.
///
/// Keep the returned [TempDir] alive for as long as the state is used.
pub(crate) fn get_test_app_state() -> (AppState, TempDir) {
    let dir = TempDir::new().expect("Could not create temporary asset directory");
    let connection =
        Connection::open_in_memory().expect("Could not create in-memory SQLite database");
    let state = AppState::new(
        connection,
        AssetDirectory::new(dir.path()),
        UploadConfig::default(),
    )
    .expect("Could not create app state")
    .with_password_cost(4);

    (state, dir)
}

pub(crate) async fn parse_json_body(response: Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Could not read response body");

    serde_json::from_slice(&body).expect("Response body is not valid JSON")
}

/// A multipart file part holding [PNG_BYTES].
pub(crate) fn image_part(file_name: &str, mime_type: &str) -> Part {
    Part::bytes(PNG_BYTES.to_vec())
        .file_name(file_name.to_owned())
        .mime_type(mime_type.to_owned())
}

/// An accepted PNG upload, as produced by reading a multipart form.
pub(crate) fn png_upload() -> ImageUpload {
    ImageUpload {
        field_name: "image".to_owned(),
        extension: "png".to_owned(),
        bytes: PNG_BYTES.to_vec(),
    }
}

#[track_caller]
pub(crate) fn count_files(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .expect("Could not read directory")
        .filter(|entry| entry.as_ref().is_ok_and(|entry| entry.path().is_file()))
        .count()
}
