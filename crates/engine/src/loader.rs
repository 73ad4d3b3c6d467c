//! Local definition files.

use std::fs;
use std::path::{Path, PathBuf};

use flowsync_types::WorkflowDefinition;
use thiserror::Error;
use tracing::{error, info, warn};

/// Extension of definition files.
pub const DEFINITION_EXTENSION: &str = "json";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("error reading {file}: {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {file}: {source}")]
    Json {
        file: String,
        #[source]
        source: serde_json::Error,
    },
}

/// List definition files in `dir`, sorted by file name.
///
/// A missing or unreadable directory is logged and yields no files.
pub fn discover_definition_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.is_dir() {
        error!(dir = %dir.display(), "workflows directory does not exist");
        return Vec::new();
    }

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(source) => {
            error!(dir = %dir.display(), error = %source, "could not read workflows directory");
            return Vec::new();
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == DEFINITION_EXTENSION))
        .collect();
    files.sort_by(|left, right| left.file_name().cmp(&right.file_name()));

    if files.is_empty() {
        warn!(dir = %dir.display(), "no JSON files found");
    } else {
        info!(count = files.len(), "found workflow file(s)");
    }
    files
}

/// Read and parse one definition file.
pub fn load_definition(path: &Path) -> Result<WorkflowDefinition, LoadError> {
    let file = display_file_name(path);
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        file: file.clone(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| LoadError::Json { file, source })
}

/// File name without its directory, for logs and outcome records.
pub fn display_file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
