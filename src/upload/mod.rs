//! Accepting image uploads and storing them in the asset directory.

mod accept;
mod assets;
mod config;

pub use accept::{ImageUpload, read_upload_form};
pub use assets::AssetDirectory;
pub use config::{DEFAULT_ALLOWED_TYPES, DEFAULT_FIELD_NAME, DEFAULT_MAX_FILE_SIZE, UploadConfig};
