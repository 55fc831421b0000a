use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Which kind of file is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetMode {
    /// The bundled sample file.
    Default,
    /// The most recently uploaded file.
    Upload,
}

impl DatasetMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetMode::Default => "default",
            DatasetMode::Upload => "upload",
        }
    }
}

impl fmt::Display for DatasetMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mode and resolved path of the dataset a query reads.
///
/// A handle is an immutable value: queries receive a snapshot and keep it for
/// the duration of their scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetHandle {
    pub mode: DatasetMode,
    pub path: PathBuf,
}

impl DatasetHandle {
    /// Handle for the bundled dataset at `path`.
    pub fn default_dataset(path: impl Into<PathBuf>) -> Self {
        Self {
            mode: DatasetMode::Default,
            path: path.into(),
        }
    }

    /// Handle for an uploaded file at `path`.
    pub fn uploaded(path: impl Into<PathBuf>) -> Self {
        Self {
            mode: DatasetMode::Upload,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_default(&self) -> bool {
        self.mode == DatasetMode::Default
    }

    /// Final path component, used as the dataset's display name.
    pub fn dataset_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.to_string_lossy().into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_name_is_basename() {
        let handle = DatasetHandle::uploaded("uploads/20240101_000000_000_sales.csv");
        assert_eq!(handle.dataset_name(), "20240101_000000_000_sales.csv");
        assert!(!handle.is_default());
    }

    #[test]
    fn test_mode_serializes_lowercase() {
        let handle = DatasetHandle::default_dataset("sample.csv");
        let json = serde_json::to_value(&handle).unwrap();
        assert_eq!(json["mode"], "default");
        assert_eq!(DatasetMode::Upload.to_string(), "upload");
    }
}
