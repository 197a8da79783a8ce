//! Validation modules

pub mod text;

pub use text::sanitize_text_field;
