//! Input validation before the analysis core runs
//!
//! The core accepts any non-empty buffer. Rejecting empty files and anything that is
//! not an `image/*` content type is the caller's job, and happens here.

use std::path::Path;

use anyhow::{bail, Context, Result};
use image::ImageFormat;
use image_analyzer::ImageBuffer;
use tracing::debug;

/// A validated upload ready for analysis.
#[derive(Debug)]
pub struct Upload {
    pub filename: String,
    pub content_type: String,
    pub buffer: ImageBuffer,
}

/// Read a file from disk and apply the upload checks.
pub fn read_upload(
    path: &Path,
    filename: Option<&str>,
    content_type: Option<&str>,
) -> Result<Upload> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;

    let filename = match filename {
        Some(name) => name.to_string(),
        None => path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string()),
    };

    validate(filename, bytes, content_type, Some(path))
}

/// Apply the upload checks to bytes already in memory.
pub fn validate(
    filename: String,
    bytes: Vec<u8>,
    content_type: Option<&str>,
    path: Option<&Path>,
) -> Result<Upload> {
    if bytes.is_empty() {
        bail!("{} is empty", filename);
    }

    let content_type = resolve_content_type(content_type, path, &bytes);
    match content_type {
        Some(ref ct) if is_image_content_type(ct) => {
            debug!(
                filename = filename.as_str(),
                content_type = ct.as_str(),
                bytes = bytes.len(),
                "upload accepted"
            );
        }
        Some(ref ct) => bail!("File must be an image, got content type {}", ct),
        None => bail!(
            "File must be an image, could not determine the content type of {}",
            filename
        ),
    }

    Ok(Upload {
        filename,
        content_type: content_type.unwrap_or_default(),
        buffer: ImageBuffer::new(bytes),
    })
}

/// Explicit value first, then the file extension, then the leading bytes.
pub fn resolve_content_type(
    explicit: Option<&str>,
    path: Option<&Path>,
    bytes: &[u8],
) -> Option<String> {
    if let Some(content_type) = explicit {
        return Some(content_type.trim().to_string());
    }
    path.and_then(|p| ImageFormat::from_path(p).ok())
        .or_else(|| image::guess_format(bytes).ok())
        .map(|format| format.to_mime_type().to_string())
}

pub fn is_image_content_type(content_type: &str) -> bool {
    content_type.trim().to_ascii_lowercase().starts_with("image/")
}
