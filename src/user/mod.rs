//! User registration, log-in and profile lookup.

mod db;
mod domain;
mod log_in;
mod profile;
mod sign_up;
mod state;

pub use db::{create_user, create_user_table, get_user_by_email, get_user_by_id};
pub use domain::{NewUser, User, UserID};
pub use log_in::log_in_endpoint;
pub use profile::user_profile_endpoint;
pub use sign_up::sign_up_endpoint;
pub use state::UserState;
