//! Category management, keeping each category's image file in step with its record.

mod create;
mod db;
mod delete;
mod domain;
mod lifecycle;
mod list;
mod state;
mod update;

pub use create::create_category_endpoint;
pub use db::{
    create_category, create_category_table, delete_category, find_category_by_name,
    get_all_categories, get_category, update_category,
};
pub use delete::delete_category_endpoint;
pub use domain::{Category, CategoryId, CategoryName};
pub use lifecycle::{
    CategoryUpdate, apply_category_update, create_category_with_image, delete_category_and_image,
};
pub use list::get_categories_endpoint;
pub use state::CategoryState;
pub use update::update_category_endpoint;
