//! Loads query fixtures from the filesystem.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{Query, QueryQueue};
use crate::error::{BatchError, Result};

/// File extensions picked up when a directory is given.
pub const QUERY_EXTENSIONS: &[&str] = &["rq", "sparql"];

/// Builds a queue from files and directories, in argument order.
///
/// Directories contribute their query files sorted by name. Files named
/// explicitly are taken regardless of extension. Each file is one query.
pub fn load_queue(paths: &[PathBuf]) -> Result<QueryQueue> {
    if paths.is_empty() {
        return Err(BatchError::config("No query files or directories given"));
    }

    let mut queries = Vec::new();
    for path in paths {
        if path.is_dir() {
            for file in query_files_in(path)? {
                queries.push(read_query(&file)?);
            }
        } else {
            queries.push(read_query(path)?);
        }
    }

    debug!("Loaded {} queries", queries.len());
    Ok(QueryQueue::new(queries))
}

fn query_files_in(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| {
        BatchError::io(format!("Failed to read directory {}: {e}", dir.display()))
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| {
            BatchError::io(format!("Failed to read directory {}: {e}", dir.display()))
        })?;
        let path = entry.path();
        if path.is_file() && has_query_extension(&path) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

fn has_query_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| QUERY_EXTENSIONS.contains(&ext))
}

fn read_query(path: &Path) -> Result<Query> {
    let text = fs::read_to_string(path)
        .map_err(|e| BatchError::io(format!("Failed to read {}: {e}", path.display())))?;

    let label = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(Query::new(text).with_label(label))
}
