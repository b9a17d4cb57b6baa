//! Distribution artifacts.
//!
//! - [`archive`] - Zip assembly with per-extension line-ending normalization

pub mod archive;
