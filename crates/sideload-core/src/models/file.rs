use std::path::Path;

use tempfile::TempPath;

/// A downloaded file waiting in transient storage.
///
/// The temporary file is deleted when this value is dropped.
#[derive(Debug)]
pub struct FetchedFile {
    path: TempPath,
    mime_type: String,
    size_bytes: u64,
}

impl FetchedFile {
    pub fn new(path: TempPath, mime_type: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            path,
            mime_type: mime_type.into(),
            size_bytes,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Type detected from the file's content signature.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }
}

/// A file accepted by permanent storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub storage_key: String,
    pub storage_url: String,
    pub mime_type: String,
}

impl StoredFile {
    /// Final path segment of the storage key.
    pub fn filename(&self) -> &str {
        self.storage_key
            .rsplit('/')
            .next()
            .unwrap_or(&self.storage_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_temp_file_removed_on_drop() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"bytes").unwrap();
        let fetched = FetchedFile::new(tmp.into_temp_path(), "image/png", 5);
        let path = fetched.path().to_path_buf();
        assert!(path.exists());
        drop(fetched);
        assert!(!path.exists());
    }

    #[test]
    fn test_stored_file_name() {
        let stored = StoredFile {
            storage_key: "media/2026/10/sunset.jpg".to_string(),
            storage_url: "http://localhost/media/2026/10/sunset.jpg".to_string(),
            mime_type: "image/jpeg".to_string(),
        };
        assert_eq!(stored.filename(), "sunset.jpg");
    }
}
