//! Sideload Core Library
//!
//! This crate provides the domain models, error taxonomy, configuration, text
//! sanitizing and MIME tables shared by every sideload component.

pub mod config;
pub mod error;
pub mod mime;
pub mod models;
pub mod storage_types;
pub mod telemetry;
pub mod validation;

// Re-export commonly used types
pub use config::{Config, ImporterConfig, StorageConfig};
pub use error::{ErrorMetadata, ImportError, ImportResult, LogLevel, MetadataField};
pub use models::{
    Asset, AssetFieldsUpdate, AssetId, AssetStatus, AttachmentMetadata, FetchedFile,
    ImportReport, ImportRequest, NewAssetRecord, StoredFile,
};
pub use storage_types::StorageBackend;
