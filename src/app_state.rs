//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    Error, PasswordHash,
    db::initialize,
    upload::{AssetDirectory, UploadConfig},
};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,

    /// The directory uploaded images are stored in and served from.
    pub assets: AssetDirectory,

    /// The limits that decide which uploads are accepted.
    pub upload_config: UploadConfig,

    /// The bcrypt cost used when hashing new passwords.
    pub password_cost: u32,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the user and category tables.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        assets: AssetDirectory,
        upload_config: UploadConfig,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            db_connection: Arc::new(Mutex::new(db_connection)),
            assets,
            upload_config,
            password_cost: PasswordHash::DEFAULT_COST,
        })
    }

    /// Use `password_cost` instead of the default bcrypt cost.
    ///
    /// Low costs are only suitable for tests.
    pub fn with_password_cost(mut self, password_cost: u32) -> Self {
        self.password_cost = password_cost;
        self
    }
}
