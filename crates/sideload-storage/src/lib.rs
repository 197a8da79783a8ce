//! Sideload Storage Library
//!
//! This crate provides the permanent-storage collaborator used by the importer:
//! the [`Storage`] trait and a local filesystem implementation.
//!
//! # Storage key format
//!
//! Keys are grouped by upload month: `media/{YYYY}/{MM}/{filename}`. Keys must
//! not contain `..` or a leading `/`. Key generation lives in the `keys`
//! module so every backend stays consistent.

pub mod factory;
pub(crate) mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use sideload_core::StorageBackend;
pub use traits::{Storage, StorageError, StorageResult};
