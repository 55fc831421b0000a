use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::{info, instrument};

use super::DatasetHandle;
use crate::error::{InsightError, Result};
use crate::logging::truncate_field;

const FALLBACK_UPLOAD_NAME: &str = "dataset.csv";
const MAX_LOGGED_NAME: usize = 128;
const MAX_NAME_ATTEMPTS: usize = 1000;

static UNSAFE_FILENAME_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9._-]").expect("filename pattern is valid"));

/// Outcome of a successful upload.
#[derive(Debug, Clone, Serialize)]
pub struct UploadReceipt {
    /// The handle that became active
    pub handle: DatasetHandle,
    /// File name as supplied by the client
    pub original_filename: String,
    /// File name written to disk
    pub stored_name: String,
    /// Number of bytes written
    pub bytes_written: usize,
    /// When the file was stored
    pub stored_at: DateTime<Utc>,
}

/// Process-wide holder of the active [`DatasetHandle`].
///
/// Reads take a snapshot under a shared lock; uploads and resets replace mode
/// and path together under the write lock, so a reader never observes a path
/// from one handle paired with the mode of another. Last write wins.
#[derive(Debug)]
pub struct DatasetStore {
    default_path: PathBuf,
    upload_dir: PathBuf,
    active: RwLock<DatasetHandle>,
}

impl DatasetStore {
    /// Creates a store in default mode.
    pub fn new(default_path: impl Into<PathBuf>, upload_dir: impl Into<PathBuf>) -> Self {
        let default_path = default_path.into();
        Self {
            active: RwLock::new(DatasetHandle::default_dataset(default_path.clone())),
            default_path,
            upload_dir: upload_dir.into(),
        }
    }

    /// Returns a copy of the active handle.
    pub fn snapshot(&self) -> DatasetHandle {
        self.active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Stores uploaded bytes and makes them the active dataset.
    ///
    /// The bytes land in a `.partial` file first and are renamed to their
    /// final timestamp-prefixed name before the handle flips, so the active
    /// path always refers to a complete file. Names already taken get a
    /// numeric suffix after the timestamp.
    #[instrument(skip(self, bytes), fields(size = bytes.len(), upload_dir = %self.upload_dir.display()))]
    pub fn store_upload(&self, bytes: &[u8], original_filename: &str) -> Result<UploadReceipt> {
        fs::create_dir_all(&self.upload_dir).map_err(|e| {
            InsightError::upload(format!(
                "creating upload directory {}: {e}",
                self.upload_dir.display()
            ))
        })?;

        let stored_at = Utc::now();
        let stamp = stored_at.format("%Y%m%d_%H%M%S_%3f").to_string();
        let (stored_name, final_path) =
            self.reserve_name(&stamp, &sanitize_filename(original_filename))?;
        write_reserved(&final_path, bytes)?;

        let handle = DatasetHandle::uploaded(final_path);
        *self.active.write().unwrap_or_else(PoisonError::into_inner) = handle.clone();

        info!(
            original = %truncate_field(original_filename, MAX_LOGGED_NAME),
            stored = %stored_name,
            "Activated uploaded dataset"
        );

        Ok(UploadReceipt {
            handle,
            original_filename: original_filename.to_string(),
            stored_name,
            bytes_written: bytes.len(),
            stored_at,
        })
    }

    /// Claims an unused file name in the upload directory by creating it empty.
    fn reserve_name(&self, stamp: &str, sanitized: &str) -> Result<(String, PathBuf)> {
        for attempt in 0..MAX_NAME_ATTEMPTS {
            let name = if attempt == 0 {
                format!("{stamp}_{sanitized}")
            } else {
                format!("{stamp}_{attempt}_{sanitized}")
            };
            let path = self.upload_dir.join(&name);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(_) => return Ok((name, path)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(InsightError::upload(format!(
                        "reserving {}: {e}",
                        path.display()
                    )))
                }
            }
        }
        Err(InsightError::upload(format!(
            "no free name for {sanitized} after {MAX_NAME_ATTEMPTS} attempts"
        )))
    }

    /// Points the store back at the bundled dataset.
    ///
    /// Previously uploaded files stay on disk.
    #[instrument(skip(self))]
    pub fn reset(&self) -> DatasetHandle {
        let handle = DatasetHandle::default_dataset(self.default_path.clone());
        *self.active.write().unwrap_or_else(PoisonError::into_inner) = handle.clone();
        info!(path = %self.default_path.display(), "Reset to default dataset");
        handle
    }
}

/// Fills a reserved upload path through a `.partial` sibling.
///
/// On failure neither the partial file nor the reservation is left behind.
fn write_reserved(final_path: &Path, bytes: &[u8]) -> Result<()> {
    let mut partial_name = final_path.as_os_str().to_os_string();
    partial_name.push(".partial");
    let partial_path = PathBuf::from(partial_name);

    let result = fs::write(&partial_path, bytes)
        .map_err(|e| InsightError::upload(format!("writing {}: {e}", partial_path.display())))
        .and_then(|()| {
            fs::rename(&partial_path, final_path).map_err(|e| {
                InsightError::upload(format!(
                    "moving upload into {}: {e}",
                    final_path.display()
                ))
            })
        });
    if result.is_err() {
        let _ = fs::remove_file(&partial_path);
        let _ = fs::remove_file(final_path);
    }
    result
}

/// Reduces a client-supplied file name to a safe single path component.
///
/// Directory parts are discarded, characters outside `[A-Za-z0-9._-]` become
/// `_` and leading dots are removed. An empty result falls back to
/// `dataset.csv`.
pub fn sanitize_filename(original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    let cleaned = UNSAFE_FILENAME_CHARS.replace_all(base, "_");
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '_') {
        FALLBACK_UPLOAD_NAME.to_string()
    } else {
        cleaned.to_string()
    }
}
