//! The API endpoint URIs.

/// The route for registering a new user.
pub const SIGN_UP: &str = "/api/users/signup";
/// The route for checking a user's email and password.
pub const LOG_IN: &str = "/api/users/login";
/// The route for fetching a user's profile.
pub const USER_PROFILE: &str = "/api/users/userprofile";
/// The route for creating a category with its image.
pub const CATEGORY_CREATE: &str = "/api/users/categorycreate";
/// The route for listing all categories.
pub const CATEGORY_GET: &str = "/api/users/categoryget";
/// The route for renaming a category and/or replacing its image.
pub const CATEGORY_UPDATE: &str = "/api/users/categoryupdate";
/// The route for deleting a category and its image.
pub const CATEGORY_DELETE: &str = "/api/users/categorydelete";
/// The route uploaded images are served from.
pub const UPLOADS: &str = "/uploads";

