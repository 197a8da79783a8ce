//! File-level processing for imported media: the type gate, filename
//! selection and attachment metadata extraction.

pub mod filename;
pub mod metadata;
pub mod validator;

pub use filename::{
    filename_from_url, sanitize_filename, sanitize_title_with_dashes, select_filename,
};
pub use metadata::{read_attachment_metadata, read_dimensions};
pub use validator::{MediaValidator, ValidationError};
