//! Demo lookup
//!
//! Demos are plain C files in one directory, addressed by file name without the extension.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;

use crate::config::RunnerConfig;

/// Errors from resolving or listing demos
#[derive(Debug, Error)]
pub enum DemoError {
    #[error("Demo '{name}' not found (looked for {})", .path.display())]
    NotFound { name: String, path: PathBuf },

    #[error("Invalid demo name '{0}'")]
    InvalidName(String),

    #[error("Cannot read demo directory {}: {source}", .dir.display())]
    Directory {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// The set of demos under one directory.
#[derive(Debug, Clone)]
pub struct DemoCatalog {
    dir: PathBuf,
    extension: String,
}

impl DemoCatalog {
    pub fn new(dir: impl AsRef<Path>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            extension: extension.into(),
        }
    }

    pub fn from_config(config: &RunnerConfig) -> Self {
        Self::new(&config.demo_dir, config.source_extension.clone())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the demo called `name`. The file must exist.
    ///
    /// Names are bare identifiers: anything that would step outside the demo directory is rejected.
    pub fn resolve(&self, name: &str) -> Result<PathBuf, DemoError> {
        let mut components = Path::new(name).components();
        let is_bare = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !is_bare {
            return Err(DemoError::InvalidName(name.to_string()));
        }

        let path = self.dir.join(format!("{name}.{}", self.extension));
        if !path.is_file() {
            return Err(DemoError::NotFound {
                name: name.to_string(),
                path,
            });
        }
        Ok(path)
    }

    /// Names of every demo, sorted. The directory is read again on each call.
    pub fn names(&self) -> Result<Vec<String>, DemoError> {
        let entries = fs::read_dir(&self.dir).map_err(|source| DemoError::Directory {
            dir: self.dir.clone(),
            source,
        })?;

        let mut names: Vec<String> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| path.extension().is_some_and(|ext| ext == self.extension.as_str()))
            .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(str::to_string))
            .collect();
        names.sort();
        Ok(names)
    }
}
