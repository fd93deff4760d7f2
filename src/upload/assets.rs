//! The directory that accepted uploads are stored in and served from.

use std::{
    ffi::OsStr,
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};

use rand::Rng;
use time::OffsetDateTime;
use tokio::{
    fs::{self, OpenOptions},
    io::AsyncWriteExt,
};

use crate::{Error, upload::ImageUpload};

/// How many generated names to try before giving up on storing a file.
const MAX_NAME_ATTEMPTS: usize = 8;

/// A directory of uploaded assets addressed by bare file names.
#[derive(Debug, Clone)]
pub struct AssetDirectory {
    root: PathBuf,
}

impl AssetDirectory {
    /// Create a handle to the asset directory at `root`.
    ///
    /// The directory is not created until [AssetDirectory::create] or
    /// [AssetDirectory::store] is called.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The path of the directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the directory and any missing parents.
    ///
    /// # Errors
    ///
    /// Returns a [Error::StorageError] if the directory could not be created.
    pub async fn create(&self) -> Result<(), Error> {
        fs::create_dir_all(&self.root).await.map_err(|error| {
            Error::StorageError(format!(
                "could not create asset directory {}: {error}",
                self.root.display()
            ))
        })
    }

    /// Whether a file called `file_name` exists in the directory.
    pub fn contains(&self, file_name: &str) -> bool {
        is_bare_file_name(file_name) && self.root.join(file_name).is_file()
    }

    /// Write `upload` to a new file with a generated unique name and return that name.
    ///
    /// The name has the form `<field>-<unix millis>-<random number>.<extension>`.
    /// Files are opened with create-new semantics so an existing file is never
    /// overwritten; on a name clash another name is drawn.
    ///
    /// # Errors
    ///
    /// Returns a [Error::StorageError] if the file could not be written.
    pub async fn store(&self, upload: &ImageUpload) -> Result<String, Error> {
        self.create().await?;

        for _ in 0..MAX_NAME_ATTEMPTS {
            let file_name = generate_file_name(&upload.field_name, &upload.extension);
            let path = self.root.join(&file_name);

            let mut file = match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(error) if error.kind() == ErrorKind::AlreadyExists => {
                    tracing::debug!("Generated file name {file_name} is taken, retrying");
                    continue;
                }
                Err(error) => {
                    return Err(Error::StorageError(format!(
                        "could not create {}: {error}",
                        path.display()
                    )));
                }
            };

            let written = match file.write_all(&upload.bytes).await {
                Ok(()) => file.sync_all().await,
                Err(error) => Err(error),
            };

            if let Err(error) = written {
                drop(file);
                if let Err(remove_error) = fs::remove_file(&path).await {
                    tracing::error!(
                        "Could not remove partial file {}: {remove_error}",
                        path.display()
                    );
                }

                return Err(Error::StorageError(format!(
                    "could not write {}: {error}",
                    path.display()
                )));
            }

            tracing::debug!(
                "Stored upload {} ({} bytes)",
                path.display(),
                upload.bytes.len()
            );

            return Ok(file_name);
        }

        Err(Error::StorageError(format!(
            "could not find a free file name in {} after {MAX_NAME_ATTEMPTS} attempts",
            self.root.display()
        )))
    }

    /// Delete the file `file_name`.
    ///
    /// # Errors
    ///
    /// Returns an error with kind [ErrorKind::InvalidInput] if `file_name` is not a bare
    /// file name, or the error from the filesystem if the file could not be removed.
    pub async fn remove(&self, file_name: &str) -> io::Result<()> {
        if !is_bare_file_name(file_name) {
            return Err(io::Error::new(
                ErrorKind::InvalidInput,
                format!("\"{file_name}\" is not a file name"),
            ));
        }

        fs::remove_file(self.root.join(file_name)).await
    }

    /// Delete the file `file_name`, logging rather than returning any failure.
    ///
    /// A file that is already gone is only logged at the debug level.
    pub async fn remove_best_effort(&self, file_name: &str) {
        match self.remove(file_name).await {
            Ok(()) => tracing::debug!("Deleted asset {file_name}"),
            Err(error) if error.kind() == ErrorKind::NotFound => {
                tracing::debug!("Asset {file_name} was already deleted")
            }
            Err(error) => tracing::error!("Failed to delete asset {file_name}: {error}"),
        }
    }
}

fn generate_file_name(field_name: &str, extension: &str) -> String {
    let timestamp = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    let suffix = rand::rng().random_range(0..1_000_000_000u32);

    format!("{field_name}-{timestamp}-{suffix}.{extension}")
}

fn is_bare_file_name(file_name: &str) -> bool {
    Path::new(file_name).file_name() == Some(OsStr::new(file_name))
}

#[cfg(test)]
mod asset_directory_tests {
    use std::{collections::HashSet, fs, io::ErrorKind};

    use tempfile::TempDir;

    use crate::upload::ImageUpload;

    use super::{AssetDirectory, generate_file_name, is_bare_file_name};

    fn png_upload(bytes: &[u8]) -> ImageUpload {
        ImageUpload {
            field_name: "image".to_owned(),
            extension: "png".to_owned(),
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn generated_name_has_field_timestamp_suffix_and_extension() {
        let name = generate_file_name("image", "png");

        let stem = name.strip_suffix(".png").expect("missing extension");
        let parts: Vec<&str> = stem.split('-').collect();
        assert_eq!(parts.len(), 3, "unexpected name {name}");
        assert_eq!(parts[0], "image");
        assert!(parts[1].parse::<i128>().is_ok(), "bad timestamp in {name}");
        assert!(parts[2].parse::<u32>().unwrap() < 1_000_000_000);
    }

    #[tokio::test]
    async fn store_writes_file_under_generated_name() {
        let dir = TempDir::new().unwrap();
        let assets = AssetDirectory::new(dir.path().join("uploads"));

        let file_name = assets.store(&png_upload(b"not really a png")).await.unwrap();

        assert!(file_name.starts_with("image-"));
        assert!(file_name.ends_with(".png"));
        assert!(assets.contains(&file_name));
        assert_eq!(
            fs::read(assets.root().join(&file_name)).unwrap(),
            b"not really a png"
        );
    }

    #[tokio::test]
    async fn store_never_reuses_a_name() {
        let dir = TempDir::new().unwrap();
        let assets = AssetDirectory::new(dir.path());
        let upload = png_upload(b"x");

        let mut names = HashSet::new();
        for _ in 0..50 {
            names.insert(assets.store(&upload).await.unwrap());
        }

        assert_eq!(names.len(), 50);
    }

    #[tokio::test]
    async fn remove_deletes_file() {
        let dir = TempDir::new().unwrap();
        let assets = AssetDirectory::new(dir.path());
        let file_name = assets.store(&png_upload(b"x")).await.unwrap();

        assets.remove(&file_name).await.unwrap();

        assert!(!assets.contains(&file_name));
    }

    #[tokio::test]
    async fn remove_missing_file_reports_not_found() {
        let dir = TempDir::new().unwrap();
        let assets = AssetDirectory::new(dir.path());

        let error = assets.remove("image-1-2.png").await.unwrap_err();

        assert_eq!(error.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn remove_rejects_paths() {
        let dir = TempDir::new().unwrap();
        let assets = AssetDirectory::new(dir.path().join("uploads"));
        fs::write(dir.path().join("secret.png"), b"x").unwrap();

        let error = assets.remove("../secret.png").await.unwrap_err();

        assert_eq!(error.kind(), ErrorKind::InvalidInput);
        assert!(dir.path().join("secret.png").exists());
    }

    #[test]
    fn bare_file_names() {
        assert!(is_bare_file_name("image-1-2.png"));
        assert!(!is_bare_file_name(""));
        assert!(!is_bare_file_name(".."));
        assert!(!is_bare_file_name("a/b.png"));
        assert!(!is_bare_file_name("/etc/passwd"));
    }
}
