//! Image upload handling for the seafood storefront
//!
//! Uploaded images are validated, staged to a temporary directory and turned
//! into a fixed set of resized JPEG variants under the public upload
//! directory. Callers store the returned relative URLs.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod variant;

pub use config::UploadConfig;
pub use error::{MediaError, MediaResult};
pub use pipeline::{ImagePipeline, UploadedFile};
pub use variant::{ImageSet, Variant};
