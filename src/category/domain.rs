//! Core category domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// A validated, non-empty category name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name.
    ///
    /// Leading and trailing whitespace is removed.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyCategoryName] if `name` is empty or only
    /// whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyCategoryName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for CategoryName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryName::new(s)
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Database identifier for a category.
pub type CategoryId = i64;

/// A named classification with an optional image (e.g., 'Shoes', 'Hats').
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Category {
    /// The ID of the category, serialized as `_id`.
    #[serde(rename = "_id")]
    pub id: CategoryId,
    /// The unique, trimmed name of the category.
    pub name: CategoryName,
    /// The file name of the category's image in the asset directory.
    pub image: Option<String>,
}


#[cfg(test)]
mod category_serialization_tests {
    use serde_json::json;

    use crate::category::{Category, CategoryName};

    #[test]
    fn serializes_id_as_underscore_id() {
        let category = Category {
            id: 3,
            name: CategoryName::new_unchecked("Shoes"),
            image: Some("image-1-2.png".to_owned()),
        };

        let got = serde_json::to_value(&category).unwrap();

        assert_eq!(
            got,
            json!({ "_id": 3, "name": "Shoes", "image": "image-1-2.png" })
        );
    }
}
