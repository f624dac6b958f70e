// src/utils/path.rs

use crate::error::AppError;

/// Characters the hierarchical store refuses inside a key.
const FORBIDDEN: [char; 5] = ['.', '$', '#', '[', ']'];

/// Splits a store path into its keys.
///
/// Leading, trailing and repeated slashes are ignored, so `"/exams_open/ABC123/"`
/// and `"exams_open//ABC123"` address the same node. The empty path addresses the root.
pub fn segments(path: &str) -> Result<Vec<&str>, AppError> {
    let keys: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    if let Some(bad) = keys.iter().find(|k| k.contains(FORBIDDEN)) {
        return Err(AppError::BadRequest(format!("Invalid key in path: {}", bad)));
    }

    Ok(keys)
}

/// Canonical form of a store path (no leading or trailing slash).
pub fn normalize(path: &str) -> Result<String, AppError> {
    Ok(segments(path)?.join("/"))
}
