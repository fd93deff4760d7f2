//! Reading multipart forms and accepting the single image they may carry.

use std::{collections::HashMap, ffi::OsStr, path::Path};

use axum::{
    extract::{
        Multipart,
        multipart::{Field, MultipartError},
    },
    http::StatusCode,
};

use crate::{Error, upload::UploadConfig};

/// An image that passed validation and is held in memory until it is stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    /// The multipart field the image was sent under.
    pub field_name: String,
    /// The lowercase file extension, without the leading dot.
    pub extension: String,
    /// The file contents.
    pub bytes: Vec<u8>,
}

/// The text fields and the optional image of a multipart form.
#[derive(Debug, Default)]
pub struct UploadForm {
    /// Text fields by name. Later values overwrite earlier ones.
    pub fields: HashMap<String, String>,
    /// The accepted image, if the form contained one.
    pub image: Option<ImageUpload>,
}

impl UploadForm {
    /// Get the text field `name`, treating blank values as absent.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }
}

/// Read every field of `multipart`, accepting at most one image under
/// [UploadConfig::field_name].
///
/// Nothing is written to disk; the image stays in memory so that callers can
/// finish their own validation before storing it.
///
/// # Errors
///
/// Returns:
/// - [Error::UnsupportedMediaType] if the image extension or content type is not allowed,
/// - [Error::PayloadTooLarge] if the image is larger than [UploadConfig::max_file_size],
/// - [Error::TooManyFiles] if more than one image was sent,
/// - [Error::UnexpectedFileField] if a file was sent under any other field,
/// - [Error::MultipartError] if the form could not be parsed.
pub async fn read_upload_form(
    mut multipart: Multipart,
    config: &UploadConfig,
) -> Result<UploadForm, Error> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| map_multipart_error(error, config))?
    {
        let Some(name) = field.name().map(str::to_owned) else {
            tracing::debug!("Skipping unnamed multipart field");
            continue;
        };

        if name == config.field_name {
            // Browsers send an empty part when the file input was left blank,
            // and a plain text value under this name is not a file either.
            if field.file_name().is_none_or(str::is_empty) {
                tracing::debug!("Skipping {name} field without a file name");
                continue;
            }

            if form.image.is_some() {
                return Err(Error::TooManyFiles);
            }

            form.image = Some(accept_image(field, config).await?);
        } else if field.file_name().is_some() {
            return Err(Error::UnexpectedFileField(name));
        } else {
            let value = field
                .text()
                .await
                .map_err(|error| map_multipart_error(error, config))?;
            form.fields.insert(name, value);
        }
    }

    Ok(form)
}

/// Check the client file name and declared content type of an upload.
///
/// Returns the lowercase extension if both the extension and the content
/// subtype are allowed by `config`.
///
/// # Errors
///
/// Returns [Error::UnsupportedMediaType] if either check fails or either value is missing.
pub fn validate_image_type(
    file_name: Option<&str>,
    content_type: Option<&str>,
    config: &UploadConfig,
) -> Result<String, Error> {
    let extension = file_name
        .and_then(|file_name| Path::new(file_name).extension())
        .and_then(OsStr::to_str)
        .map(str::to_ascii_lowercase);

    let subtype = content_type
        .and_then(|content_type| content_type.split(';').next())
        .and_then(|mime| mime.trim().split_once('/'))
        .map(|(_, subtype)| subtype);

    match (extension, subtype) {
        (Some(extension), Some(subtype))
            if config.is_allowed_type(&extension) && config.is_allowed_type(subtype) =>
        {
            Ok(extension)
        }
        _ => Err(Error::UnsupportedMediaType(config.allowed_types_display())),
    }
}

async fn accept_image(mut field: Field<'_>, config: &UploadConfig) -> Result<ImageUpload, Error> {
    let extension = validate_image_type(field.file_name(), field.content_type(), config)
        .inspect_err(|_| {
            tracing::debug!(
                "Rejected upload {:?} with content type {:?}",
                field.file_name(),
                field.content_type()
            )
        })?;

    let mut bytes = Vec::new();

    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|error| map_multipart_error(error, config))?
    {
        if bytes.len() + chunk.len() > config.max_file_size {
            tracing::debug!(
                "Rejected upload larger than {} bytes",
                config.max_file_size
            );
            return Err(Error::PayloadTooLarge(config.max_file_size));
        }

        bytes.extend_from_slice(&chunk);
    }

    Ok(ImageUpload {
        field_name: config.field_name.clone(),
        extension,
        bytes,
    })
}

fn map_multipart_error(error: MultipartError, config: &UploadConfig) -> Error {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        Error::PayloadTooLarge(config.max_file_size)
    } else {
        tracing::debug!("Could not read multipart form: {error}");
        Error::MultipartError(error.body_text())
    }
}

#[cfg(test)]
mod validate_image_type_tests {
    use crate::{Error, upload::UploadConfig};

    use super::validate_image_type;

    #[test]
    fn accepts_matching_extension_and_content_type() {
        let config = UploadConfig::default();

        let got = validate_image_type(Some("shoes.png"), Some("image/png"), &config);

        assert_eq!(got, Ok("png".to_owned()));
    }

    #[test]
    fn lowercases_extension() {
        let config = UploadConfig::default();

        let got = validate_image_type(Some("HOLIDAY.JPG"), Some("image/jpeg"), &config);

        assert_eq!(got, Ok("jpg".to_owned()));
    }

    #[test]
    fn ignores_content_type_parameters() {
        let config = UploadConfig::default();

        let got = validate_image_type(Some("cat.gif"), Some("image/gif; foo=bar"), &config);

        assert_eq!(got, Ok("gif".to_owned()));
    }

    #[test]
    fn rejects_text_file_regardless_of_content_type() {
        let config = UploadConfig::default();

        for content_type in ["image/png", "text/plain", "image/jpeg"] {
            let got = validate_image_type(Some("notes.txt"), Some(content_type), &config);

            assert!(
                matches!(got, Err(Error::UnsupportedMediaType(_))),
                "accepted notes.txt as {content_type}"
            );
        }
    }

    #[test]
    fn rejects_image_extension_with_wrong_content_type() {
        let config = UploadConfig::default();

        let got = validate_image_type(Some("shoes.png"), Some("text/html"), &config);

        assert!(matches!(got, Err(Error::UnsupportedMediaType(_))));
    }

    #[test]
    fn rejects_missing_file_name_or_content_type() {
        let config = UploadConfig::default();

        assert!(validate_image_type(None, Some("image/png"), &config).is_err());
        assert!(validate_image_type(Some("shoes.png"), None, &config).is_err());
        assert!(validate_image_type(Some("png"), Some("image/png"), &config).is_err());
    }
}
