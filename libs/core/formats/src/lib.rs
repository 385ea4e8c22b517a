// [libs/core/formats/src/lib.rs]
//! Format driver layer (C6, §4.6): discovery, read, write, packaging, and
//! input ZIP extraction.

pub mod discovery;
pub mod error;
pub mod extraction;
pub mod packaging;
pub mod read;
pub mod write;

pub use discovery::{list_supported_formats, FormatInfo};
pub use error::FormatError;
pub use extraction::{extract_if_zip, find_principal_file};
pub use packaging::package_if_needed;
pub use read::read_dataset;
pub use write::{write_dataset, WriteOptions};
