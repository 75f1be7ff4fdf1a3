// src/core/script_writer.rs

use crate::{
    core::paths::{self, PathError},
    models::ScriptDocument,
};
use log::debug;
use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;
use thiserror::Error;

const HASH_TRUNCATE_LENGTH: usize = 16; // 16 bytes = 32 hex characters

#[derive(Error, Debug)]
pub enum WriteError {
    #[error(transparent)]
    Path(#[from] PathError),
    #[error("Failed to write script '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The file was created or replaced.
    Written,
    /// The file already held exactly this content and was left untouched.
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReport {
    pub path: PathBuf,
    pub fingerprint: String,
    pub outcome: WriteOutcome,
}

/// Truncated blake3 hash of `content`, hex encoded.
pub fn fingerprint(content: &[u8]) -> String {
    let hash = blake3::hash(content);
    hex::encode(&hash.as_bytes()[..HASH_TRUNCATE_LENGTH])
}

/// Where a document goes for a user-supplied target.
///
/// `~` and environment variables are expanded. An existing directory, or a
/// target ending in a path separator, receives the document under its own file
/// name; anything else is taken as the file path itself.
pub fn resolve_target(doc: &ScriptDocument, target: &str) -> Result<PathBuf, PathError> {
    let expanded = paths::expand_user_path(target)?;
    let is_dir = expanded.is_dir() || target.ends_with('/') || target.ends_with('\\');
    Ok(if is_dir { expanded.join(&doc.file_name) } else { expanded })
}

/// Writes `doc` to `target`, replacing any previous file in one step.
///
/// The text goes to a temporary file next to the destination which is then
/// renamed over it, so readers never see a half-written script.
pub fn write_script(doc: &ScriptDocument, target: &str) -> Result<WriteReport, WriteError> {
    let path = resolve_target(doc, target)?;
    let text = doc.text();
    let new_fingerprint = fingerprint(text.as_bytes());

    if let Ok(existing) = fs::read(&path)
        && fingerprint(&existing) == new_fingerprint
    {
        debug!("'{}' is up to date ({}).", path.display(), new_fingerprint);
        return Ok(WriteReport { path, fingerprint: new_fingerprint, outcome: WriteOutcome::Unchanged });
    }

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent).map_err(|e| io_error(&parent, e))?;

    let mut temp = NamedTempFile::new_in(&parent).map_err(|e| io_error(&parent, e))?;
    temp.write_all(text.as_bytes()).map_err(|e| io_error(&path, e))?;
    temp.flush().map_err(|e| io_error(&path, e))?;
    temp.persist(&path).map_err(|e| io_error(&path, e.error))?;

    debug!("Wrote '{}' ({} lines, {}).", path.display(), doc.lines.len(), new_fingerprint);
    Ok(WriteReport { path, fingerprint: new_fingerprint, outcome: WriteOutcome::Written })
}

fn io_error(path: &Path, source: io::Error) -> WriteError {
    WriteError::Io { path: path.to_path_buf(), source }
}
