//! Attachment metadata read from a stored file

use image::ImageReader;
use sideload_core::AttachmentMetadata;
use std::path::{Path, PathBuf};

/// Pixel dimensions from the image header, without decoding the pixels.
pub fn read_dimensions(path: &Path) -> Option<(u32, u32)> {
    let reader = ImageReader::open(path).ok()?.with_guessed_format().ok()?;
    match reader.into_dimensions() {
        Ok(dims) => Some(dims),
        Err(e) => {
            tracing::debug!(error = %e, path = %path.display(), "Could not read image dimensions");
            None
        }
    }
}

/// Dimensions and byte size for `path`. Header parsing runs on the blocking
/// pool; unreadable dimensions are left empty.
pub async fn read_attachment_metadata(path: PathBuf, file_size: u64) -> AttachmentMetadata {
    let dims = match tokio::task::spawn_blocking(move || read_dimensions(&path)).await {
        Ok(dims) => dims,
        Err(e) => {
            tracing::warn!(error = %e, "Dimension read task failed");
            None
        }
    };

    AttachmentMetadata {
        width: dims.map(|(w, _)| w),
        height: dims.map(|(_, h)| h),
        file_size,
    }
}
