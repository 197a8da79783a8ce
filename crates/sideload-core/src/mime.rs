//! MIME tables and content sniffing.
//!
//! The importer never trusts a `Content-Type` header or a URL suffix; the type
//! of a downloaded file is whatever its leading bytes say it is.

use image::ImageFormat;

pub const IMAGE_JPEG: &str = "image/jpeg";
pub const IMAGE_GIF: &str = "image/gif";
pub const IMAGE_PNG: &str = "image/png";
pub const IMAGE_ICO: &str = "image/x-icon";
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Types accepted by the type gate unless configuration says otherwise.
pub const DEFAULT_ALLOWED_MIME_TYPES: [&str; 4] = [IMAGE_JPEG, IMAGE_GIF, IMAGE_PNG, IMAGE_ICO];

/// File extension, including the leading '.', for a MIME type.
///
/// Returns an empty string for types outside the table.
pub fn extension_for_mime_type(mime_type: &str) -> &'static str {
    match mime_type.trim().to_lowercase().as_str() {
        IMAGE_JPEG => ".jpg",
        IMAGE_GIF => ".gif",
        IMAGE_PNG => ".png",
        IMAGE_ICO => ".ico",
        _ => "",
    }
}

fn image_format_mime_type(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Jpeg => IMAGE_JPEG,
        ImageFormat::Png => IMAGE_PNG,
        ImageFormat::Gif => IMAGE_GIF,
        ImageFormat::Ico => IMAGE_ICO,
        ImageFormat::WebP => "image/webp",
        ImageFormat::Bmp => "image/bmp",
        ImageFormat::Tiff => "image/tiff",
        ImageFormat::Avif => "image/avif",
        _ => OCTET_STREAM,
    }
}

/// Determine a MIME type from the leading bytes of a file.
pub fn sniff(data: &[u8]) -> &'static str {
    if let Ok(format) = image::guess_format(data) {
        return image_format_mime_type(format);
    }

    if data.starts_with(b"%PDF") {
        "application/pdf"
    } else if data.starts_with(b"PK\x03\x04") {
        "application/zip"
    } else if data
        .iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|b| *b == b'<')
    {
        "text/html"
    } else {
        OCTET_STREAM
    }
}
