//! Owner-scoped storage for uploaded content files.
//!
//! Files live under `<root>/<owner_dir>/<ulid>_<original name>` and are referenced
//! from the store by the relative path `<owner_dir>/<filename>`.

use std::path::{Component, Path, PathBuf};

use color_eyre::Result;
use ulid::Ulid;

#[derive(Clone, Debug)]
pub struct FileStore {
    root: PathBuf,
}

/// Directory name for an owner identifier such as a faculty email.
pub fn owner_dir(owner: &str) -> String {
    owner
        .trim()
        .to_lowercase()
        .replace('@', "_at_")
        .replace(['.', '/', '\\'], "_")
}

/// Public download URL for a stored relative path, or `""` when there is none.
pub fn file_url(file_path: Option<&str>) -> String {
    match file_path.and_then(split_relative) {
        Some((dir, name)) => format!("/files/{dir}/{name}"),
        None => String::new(),
    }
}

/// Split `<owner_dir>/<filename>` into its two parts.
pub fn split_relative(file_path: &str) -> Option<(&str, &str)> {
    let (dir, name) = file_path.split_once('/')?;
    if dir.is_empty() || name.is_empty() {
        return None;
    }
    Some((dir, name))
}

/// Keep only the final component of an uploaded file name.
fn sanitize_file_name(original_name: &str) -> String {
    let base = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    match base {
        "" | "." | ".." => "upload".to_string(),
        name => name.to_string(),
    }
}

/// Reject anything but a plain relative path.
fn checked_relative(relative_path: &str) -> Option<&Path> {
    let path = Path::new(relative_path);
    let plain = !relative_path.is_empty()
        && path
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
    plain.then_some(path)
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Write `bytes` into the owner's directory and return the relative path.
    pub async fn store(&self, owner: &str, original_name: &str, bytes: &[u8]) -> Result<String> {
        let dir_name = owner_dir(owner);
        let dir = self.root.join(&dir_name);
        tokio::fs::create_dir_all(&dir).await?;

        let file_name = format!("{}_{}", Ulid::new(), sanitize_file_name(original_name));
        tokio::fs::write(dir.join(&file_name), bytes).await?;

        let relative = format!("{dir_name}/{file_name}");
        tracing::info!("stored upload {relative} ({} bytes)", bytes.len());
        Ok(relative)
    }

    /// Read a stored file. `None` when the path is malformed or nothing is there.
    pub async fn resolve(&self, relative_path: &str) -> Result<Option<Vec<u8>>> {
        let Some(path) = checked_relative(relative_path) else {
            tracing::warn!("rejected file path: {relative_path}");
            return Ok(None);
        };

        match tokio::fs::read(self.root.join(path)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
