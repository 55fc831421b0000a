//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use tabular_insight::config::EngineConfig;
use tabular_insight::engine::DatasetEngine;
use tempfile::TempDir;

/// A temporary workspace holding a default dataset and an upload directory.
pub struct Workspace {
    pub dir: TempDir,
    pub default_path: PathBuf,
}

impl Workspace {
    /// Creates a workspace whose default dataset holds `contents`.
    pub fn with_default(contents: impl AsRef<[u8]>) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let default_path = dir.path().join("bundled.csv");
        std::fs::write(&default_path, contents).expect("write default dataset");
        Self { dir, default_path }
    }

    /// A workspace without any default dataset file.
    pub fn empty() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let default_path = dir.path().join("absent.csv");
        Self { dir, default_path }
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.dir.path().join("uploads")
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn config(&self) -> EngineConfig {
        EngineConfig::builder()
            .default_dataset(&self.default_path)
            .upload_dir(self.upload_dir())
            .build()
            .expect("valid config")
    }

    pub fn engine(&self) -> DatasetEngine {
        DatasetEngine::new(self.config()).expect("engine")
    }
}

/// CSV text with a header `id,price,category` and `rows` generated rows.
///
/// Row `i` has `id = i`, `price = "$i.50"` and a category cycling through
/// `alpha`, `beta` and `gamma`.
pub fn numbered_csv(rows: usize) -> String {
    let mut csv = String::from("id,price,category\n");
    let categories = ["alpha", "beta", "gamma"];
    for i in 0..rows {
        csv.push_str(&format!("{i},${i}.50,{}\n", categories[i % 3]));
    }
    csv
}
