// src/utils/upload.rs

use std::path::{Component, Path, PathBuf};

/// Public URL prefix under which uploaded files are served.
pub const UPLOADS_PREFIX: &str = "/uploads";

/// A random file name keeping the extension of `original`, e.g. `4f0c…9ab.png`.
pub fn random_file_name(original: &str) -> String {
    let stem = uuid::Uuid::new_v4().simple().to_string();
    let ext = Path::new(original)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()));

    match ext {
        Some(ext) => format!("{}.{}", stem, ext.to_ascii_lowercase()),
        None => stem,
    }
}

/// Maps a public path such as `/uploads/abc.png` to the file inside `upload_dir`.
///
/// Returns `None` for anything outside the uploads prefix or that tries to
/// climb out of the directory.
pub fn resolve_public_path(upload_dir: &Path, public_path: &str) -> Option<PathBuf> {
    let relative = public_path
        .trim_start_matches('/')
        .strip_prefix(UPLOADS_PREFIX.trim_start_matches('/'))?
        .strip_prefix('/')?;

    let relative = Path::new(relative);
    let plain = relative
        .components()
        .all(|c| matches!(c, Component::Normal(_)));
    if !plain || relative.as_os_str().is_empty() {
        return None;
    }

    Some(upload_dir.join(relative))
}
