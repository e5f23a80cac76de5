// src/core/env_resolver.rs

use crate::{
    constants::{BASE_ENV_FILENAME, LOCAL_SUFFIX},
    core::{
        dotenv_parser,
        interpolator::{AmbientLookup, Interpolator},
        paths::{self, PathError},
    },
    models::{DefinitionFile, EnvMap, Entry, MergedEnv, Slot},
};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::fs;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Definition file '{path}' exists but could not be read: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Path(#[from] PathError),
}

/// Builds the candidate files for `mode`, lowest precedence first.
///
/// The mode slots are left out entirely when `mode` is empty.
pub fn cascade(envdir: &Path, mode: &str) -> Vec<DefinitionFile> {
    let base = BASE_ENV_FILENAME.to_string();
    let mut names = vec![
        (Slot::Base, base.clone()),
        (Slot::BaseLocal, format!("{base}{LOCAL_SUFFIX}")),
    ];
    if !mode.is_empty() {
        names.push((Slot::Mode, format!("{base}.{mode}")));
        names.push((Slot::ModeLocal, format!("{base}.{mode}{LOCAL_SUFFIX}")));
    }

    names
        .into_iter()
        .map(|(slot, name)| DefinitionFile {
            slot,
            path: envdir.join(name),
        })
        .collect()
}

/// Reads and parses one definition file.
///
/// Returns `Ok(None)` when the file does not exist. Any other I/O failure,
/// including the path being a directory, is an error.
pub fn load_file(file: &DefinitionFile) -> Result<Option<Vec<Entry>>, ResolveError> {
    let path = file.path.as_path();
    match fs::read_to_string(path) {
        Ok(content) => {
            let entries = dotenv_parser::parse(&content, path);
            log::debug!(
                t!("resolver.debug.loaded_file"),
                count = entries.len(),
                path = path.display(),
                slot = file.slot
            );
            Ok(Some(entries))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::debug!(
                t!("resolver.debug.skipped_file"),
                path = path.display(),
                slot = file.slot
            );
            Ok(None)
        }
        Err(e) => Err(ResolveError::Unreadable {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Merges parsed files given lowest precedence first; later values win.
pub fn merge(files: impl IntoIterator<Item = Vec<Entry>>) -> MergedEnv {
    let mut merged = MergedEnv::new();
    for entry in files.into_iter().flatten() {
        merged.insert(entry);
    }
    merged
}

/// Expands every value of `merged`, walking the merge order once.
///
/// A key the ambient source already defines keeps the ambient value, both in
/// the result and for every later reference, matching what [`compose`] hands
/// to the child.
pub fn expand(merged: &MergedEnv, ambient: &dyn AmbientLookup) -> EnvMap {
    let mut interpolator = Interpolator::new(ambient);
    for entry in merged.iter() {
        match ambient.lookup(&entry.key) {
            Some(value) => interpolator.define(&entry.key, value),
            None => {
                interpolator.resolve(&entry.key, &entry.value);
            }
        }
    }
    interpolator.into_resolved()
}

/// Loads the `.env` cascade of a directory for a mode.
#[derive(Debug)]
pub struct EnvResolver<'a> {
    ambient: &'a dyn AmbientLookup,
}

impl<'a> EnvResolver<'a> {
    /// Creates a resolver whose placeholders fall back to `ambient`.
    pub fn new(ambient: &'a dyn AmbientLookup) -> Self {
        Self { ambient }
    }

    /// Loads, merges and expands the cascade of `envdir` for `mode`.
    ///
    /// Missing files and unresolved placeholders are not errors. A file that
    /// exists but cannot be read aborts the whole resolution.
    pub fn resolve(&self, envdir: &Path, mode: &str) -> Result<EnvMap, ResolveError> {
        let envdir = paths::absolutize(envdir)?;

        let mut loaded = Vec::new();
        for file in cascade(&envdir, mode) {
            if let Some(entries) = load_file(&file)? {
                loaded.push(entries);
            }
        }

        let merged = merge(loaded);
        if merged.is_empty() {
            log::debug!(t!("resolver.debug.no_definitions"), envdir = envdir.display());
        } else {
            log::debug!(t!("resolver.debug.merged"), count = merged.len());
        }
        Ok(expand(&merged, self.ambient))
    }
}

/// Overlays `resolved` onto `ambient`. Variables the caller already set win.
pub fn compose(ambient: EnvMap, resolved: EnvMap) -> EnvMap {
    let mut env = ambient;
    for (key, value) in resolved {
        env.entry(key).or_insert(value);
    }
    env
}
