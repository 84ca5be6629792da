//! In-memory and on-disk build output.

pub mod manifest;
pub mod writer;

pub use manifest::{AssetManifest, ManifestEntry};
pub use writer::write_output;
