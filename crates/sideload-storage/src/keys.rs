//! Shared key generation for storage backends.
//!
//! Key format: `media/{YYYY}/{MM}/{filename}`.

use chrono::{DateTime, Datelike, Utc};

/// Generate a storage key for a filename uploaded at `now`.
pub fn generate_storage_key(now: DateTime<Utc>, filename: &str) -> String {
    format!("media/{:04}/{:02}/{}", now.year(), now.month(), filename)
}

/// The `attempt`-th alternative for a taken filename: `name-1.ext`, `name-2.ext`, ...
///
/// Attempt zero is the filename itself.
pub fn numbered_filename(filename: &str, attempt: u32) -> String {
    if attempt == 0 {
        return filename.to_string();
    }
    match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{}-{}.{}", stem, attempt, ext),
        _ => format!("{}-{}", filename, attempt),
    }
}
