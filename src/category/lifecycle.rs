//! Creating, updating and deleting categories together with their image files.
//!
//! Every function here orders its steps so that a category never points at an
//! image that is not on disk:
//! - files are written before the record that references them,
//! - a file written for a record that then fails to save is deleted again,
//! - files are deleted only after no record references them.
//!
//! The database lock is only held for the queries themselves and is released
//! while files are written or deleted. Anything that changes between the two
//! locks is caught by the `UNIQUE` constraint or by reading the record again.

use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;

use crate::{
    Error,
    category::{
        Category, CategoryId, CategoryName,
        db::{self, find_category_by_name, get_category},
    },
    upload::{AssetDirectory, ImageUpload},
};

/// The changes requested for an existing category. Absent fields keep their
/// current value.
#[derive(Debug, Default)]
pub struct CategoryUpdate {
    /// The new name.
    pub name: Option<CategoryName>,
    /// A new image to replace the current one.
    pub image: Option<ImageUpload>,
}

/// Create a category called `name` with `image` as its picture.
///
/// The duplicate-name check runs before the image is written, so a rejected
/// request leaves nothing behind on disk.
///
/// # Errors
///
/// Returns:
/// - [Error::MissingField] if `name` or `image` is missing,
/// - [Error::EmptyCategoryName] if `name` is only whitespace,
/// - [Error::DuplicateCategoryName] if the name is taken,
/// - [Error::StorageError] or [Error::SqlError] if the file or record could not be saved.
pub async fn create_category_with_image(
    name: Option<&str>,
    image: Option<ImageUpload>,
    assets: &AssetDirectory,
    db_connection: &Mutex<Connection>,
) -> Result<Category, Error> {
    let name = CategoryName::new(name.ok_or(Error::MissingField("name"))?)?;

    {
        let connection = lock_connection(db_connection)?;

        if find_category_by_name(&name, &connection)?.is_some() {
            return Err(Error::DuplicateCategoryName);
        }
    }

    let image = image.ok_or(Error::MissingField("image"))?;
    let file_name = assets.store(&image).await?;

    let created = lock_connection(db_connection).and_then(|connection| {
        db::create_category(name, Some(file_name.clone()), &connection)
    });

    if let Err(error) = &created {
        tracing::debug!("Removing {file_name} after failing to create category: {error}");
        assets.remove_best_effort(&file_name).await;
    }

    created
}

/// Apply `update` to the category `category_id`.
///
/// Renaming a category to its current name is allowed. When a new image is
/// given, the file it replaces is deleted once the record points at the new one.
///
/// # Errors
///
/// Returns:
/// - [Error::CategoryNotFound] if there is no category with `category_id`,
/// - [Error::DuplicateCategoryName] if another category already uses the new name,
/// - [Error::StorageError] or [Error::SqlError] if the file or record could not be saved.
pub async fn apply_category_update(
    category_id: CategoryId,
    update: CategoryUpdate,
    assets: &AssetDirectory,
    db_connection: &Mutex<Connection>,
) -> Result<Category, Error> {
    let current = {
        let connection = lock_connection(db_connection)?;
        let current = get_category(category_id, &connection).map_err(not_found_as_category)?;

        if let Some(name) = &update.name {
            match find_category_by_name(name, &connection)? {
                Some(existing) if existing.id != category_id => {
                    return Err(Error::DuplicateCategoryName);
                }
                _ => {}
            }
        }

        current
    };

    let name = update.name.unwrap_or(current.name);

    let new_image = match &update.image {
        Some(upload) => Some(assets.store(upload).await?),
        None => None,
    };

    // The record is read again under the second lock so that the image kept or
    // replaced is the one stored now, not the one seen before the upload.
    let saved = lock_connection(db_connection).and_then(|connection| {
        let previous = get_category(category_id, &connection).map_err(not_found_as_category)?;
        let image = new_image.clone().or_else(|| previous.image.clone());

        db::update_category(category_id, &name, image.as_deref(), &connection)?;

        Ok((image, previous.image))
    });

    let (image, previous_image) = match saved {
        Ok(saved) => saved,
        Err(error) => {
            if let Some(file_name) = &new_image {
                tracing::debug!("Removing {file_name} after failing to update category: {error}");
                assets.remove_best_effort(file_name).await;
            }

            return Err(error);
        }
    };

    if let (Some(_), Some(replaced)) = (&new_image, &previous_image) {
        assets.remove_best_effort(replaced).await;
    }

    Ok(Category {
        id: category_id,
        name,
        image,
    })
}

/// Delete the category `category_id` and then its image file.
///
/// Only the record deletion decides the outcome; a file that cannot be
/// deleted is logged and otherwise ignored.
///
/// # Errors
///
/// Returns [Error::CategoryNotFound] if there is no category with `category_id`.
pub async fn delete_category_and_image(
    category_id: CategoryId,
    assets: &AssetDirectory,
    db_connection: &Mutex<Connection>,
) -> Result<Category, Error> {
    let category = {
        let connection = lock_connection(db_connection)?;
        let category = get_category(category_id, &connection).map_err(not_found_as_category)?;

        db::delete_category(category_id, &connection)?;

        category
    };

    if let Some(file_name) = category.image.as_deref().filter(|name| !name.is_empty()) {
        assets.remove_best_effort(file_name).await;
    }

    Ok(category)
}

fn lock_connection(db_connection: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>, Error> {
    db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)
}

fn not_found_as_category(error: Error) -> Error {
    match error {
        Error::NotFound => Error::CategoryNotFound,
        error => error,
    }
}
