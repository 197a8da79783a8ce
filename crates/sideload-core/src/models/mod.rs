//! Data models for the importer
//!
//! Requests come in, files move through the pipeline, assets come out.

mod asset;
mod file;
mod report;
mod request;

pub use asset::*;
pub use file::*;
pub use report::*;
pub use request::*;
