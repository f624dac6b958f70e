// src/models/upload.rs

use serde::Serialize;

/// One stored file, as reported back to the uploader.
#[derive(Debug, Serialize)]
pub struct UploadedFile {
    pub originalname: String,
    pub size: usize,
    /// Public path, e.g. `/uploads/<random>.png`.
    pub path: String,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub files: Vec<UploadedFile>,
}
