use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::{
    AppState,
    upload::{AssetDirectory, UploadConfig},
};

/// The state needed by the category endpoints.
#[derive(Debug, Clone)]
pub struct CategoryState {
    /// The connection shared by all requests.
    pub db_connection: Arc<Mutex<Connection>>,
    /// Where category images are stored.
    pub assets: AssetDirectory,
    /// The limits applied to uploaded category images.
    pub upload_config: UploadConfig,
}

impl FromRef<AppState> for CategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            assets: state.assets.clone(),
            upload_config: state.upload_config.clone(),
        }
    }
}
