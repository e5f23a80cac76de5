// src/core/paths.rs

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PathError {
    #[error("Could not determine the current working directory: {0}")]
    CurrentDir(#[source] std::io::Error),
    #[error("Could not make '{path}' absolute: {source}")]
    Absolute {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Resolves the directory that holds the definition files.
///
/// `None` and the empty string mean the current working directory. A leading `~` is expanded to
/// the home directory, and relative paths are resolved against the current
/// working directory. Symlinks are not followed and the directory does not
/// have to exist.
pub fn resolve_envdir(raw: Option<&str>) -> Result<PathBuf, PathError> {
    match raw {
        None | Some("") => std::env::current_dir().map_err(PathError::CurrentDir),
        Some(raw) => {
            let expanded = shellexpand::tilde(raw);
            absolutize(Path::new(expanded.as_ref()))
        }
    }
}

/// Makes `path` absolute and strips platform noise such as `\\?\` prefixes.
pub fn absolutize(path: &Path) -> Result<PathBuf, PathError> {
    let absolute = std::path::absolute(path).map_err(|e| PathError::Absolute {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(dunce::simplified(&absolute).to_path_buf())
}
