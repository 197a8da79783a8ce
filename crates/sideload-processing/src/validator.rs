use sideload_core::ImporterConfig;

/// Common validation errors for fetched files
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: u64, max: u64 },

    #[error("Invalid content type: {content_type} (allowed: {allowed:?})")]
    InvalidContentType {
        content_type: String,
        allowed: Vec<String>,
    },

    #[error("Empty file")]
    EmptyFile,
}

/// Media file validator
///
/// Gates fetched files on their detected content type and size. The type it
/// checks is always the one sniffed from the file's bytes.
#[derive(Debug, Clone)]
pub struct MediaValidator {
    max_file_size: u64,
    allowed_content_types: Vec<String>,
}

impl MediaValidator {
    pub fn new(max_file_size: u64, allowed_content_types: Vec<String>) -> Self {
        Self {
            max_file_size,
            allowed_content_types: allowed_content_types
                .into_iter()
                .map(|ct| ct.trim().to_lowercase())
                .collect(),
        }
    }

    pub fn from_config(config: &ImporterConfig) -> Self {
        Self::new(
            config.max_file_size_bytes as u64,
            config.allowed_mime_types.clone(),
        )
    }

    /// Validate file size
    pub fn validate_file_size(&self, size: u64) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }

        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    /// Validate content type
    pub fn validate_content_type(&self, content_type: &str) -> Result<(), ValidationError> {
        let normalized = content_type.trim().to_lowercase();

        if !self
            .allowed_content_types
            .iter()
            .any(|ct| ct == &normalized)
        {
            return Err(ValidationError::InvalidContentType {
                content_type: content_type.to_string(),
                allowed: self.allowed_content_types.clone(),
            });
        }

        Ok(())
    }

    /// Validate size first, then type
    pub fn validate_all(&self, content_type: &str, file_size: u64) -> Result<(), ValidationError> {
        self.validate_file_size(file_size)?;
        self.validate_content_type(content_type)?;
        Ok(())
    }

    pub fn allowed_content_types(&self) -> &[String] {
        &self.allowed_content_types
    }
}
