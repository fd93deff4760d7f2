//! Limits that control which uploaded files are accepted.

/// The multipart field that carries the uploaded image.
pub const DEFAULT_FIELD_NAME: &str = "image";

/// The largest accepted upload in bytes.
pub const DEFAULT_MAX_FILE_SIZE: usize = 1_000_000;

/// The image types accepted by default, matched against both the file
/// extension and the subtype of the declared content type.
pub const DEFAULT_ALLOWED_TYPES: [&str; 4] = ["jpeg", "jpg", "png", "gif"];

/// Room left in the request body limit for multipart boundaries, part headers
/// and the text fields sent alongside the file.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// The configuration for accepting image uploads.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadConfig {
    /// The multipart field name the image must be sent under.
    pub field_name: String,
    /// The maximum size of an uploaded file in bytes.
    pub max_file_size: usize,
    /// Lowercase file extensions/content subtypes that are accepted.
    pub allowed_types: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            field_name: DEFAULT_FIELD_NAME.to_owned(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            allowed_types: DEFAULT_ALLOWED_TYPES.map(str::to_owned).to_vec(),
        }
    }
}

impl UploadConfig {
    /// The default configuration with a different size limit.
    pub fn with_max_file_size(max_file_size: usize) -> Self {
        Self {
            max_file_size,
            ..Default::default()
        }
    }

    /// Whether `type_name` (an extension or content subtype) is accepted.
    ///
    /// The comparison ignores ASCII case.
    pub fn is_allowed_type(&self, type_name: &str) -> bool {
        self.allowed_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(type_name))
    }

    /// The request body limit for routes that accept an upload.
    pub fn request_body_limit(&self) -> usize {
        self.max_file_size.saturating_add(MULTIPART_OVERHEAD)
    }

    pub(crate) fn allowed_types_display(&self) -> String {
        self.allowed_types.join(", ")
    }
}
