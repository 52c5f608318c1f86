//! Upload validation and variant derivation

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::UploadConfig;
use crate::error::{MediaError, MediaResult};
use crate::variant::{ImageSet, Variant};

/// MIME types accepted for upload
pub const ALLOWED_MIME_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/webp", "image/gif"];

/// A file received from a multipart form
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Validates uploads and writes their resized variants to the upload directory
#[derive(Debug, Clone)]
pub struct ImagePipeline {
    config: Arc<UploadConfig>,
}

impl ImagePipeline {
    pub fn new(config: UploadConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Create the upload and staging directories if they are missing
    pub async fn ensure_dirs(&self) -> MediaResult<()> {
        tokio::fs::create_dir_all(&self.config.upload_dir).await?;
        tokio::fs::create_dir_all(&self.config.temp_dir).await?;
        Ok(())
    }

    /// Check type and size of an upload, returning its detected format
    pub fn validate(&self, upload: &UploadedFile) -> MediaResult<ImageFormat> {
        let declared = upload
            .content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if !ALLOWED_MIME_TYPES.contains(&declared.as_str()) {
            return Err(MediaError::UnsupportedType(upload.content_type.clone()));
        }

        if upload.bytes.is_empty() {
            return Err(MediaError::Empty);
        }

        if upload.bytes.len() > self.config.max_file_size {
            return Err(MediaError::TooLarge {
                size: upload.bytes.len(),
                max: self.config.max_file_size,
            });
        }

        match image::guess_format(&upload.bytes) {
            Ok(
                format @ (ImageFormat::Jpeg
                | ImageFormat::Png
                | ImageFormat::WebP
                | ImageFormat::Gif),
            ) => Ok(format),
            Ok(other) => Err(MediaError::UnsupportedType(format!("{:?}", other))),
            Err(_) => Err(MediaError::UnsupportedType(declared)),
        }
    }

    /// Validate an upload, stage it and derive every [`Variant`] into
    /// `upload_dir/<folder>`.
    ///
    /// The staging file is removed whatever the outcome. On failure no
    /// variant of this upload is left behind.
    pub async fn process(&self, upload: UploadedFile, folder: &str) -> MediaResult<ImageSet> {
        let format = self.validate(&upload)?;
        validate_folder(folder)?;

        let stem = Uuid::new_v4().simple().to_string();
        let extension = format.extensions_str().first().copied().unwrap_or("img");

        tokio::fs::create_dir_all(&self.config.temp_dir).await?;
        let staging_path = self.config.temp_dir.join(format!("{}.{}", stem, extension));
        tokio::fs::write(&staging_path, &upload.bytes).await?;

        info!(
            "Processing upload {} ({} bytes) into {}",
            upload.file_name.as_deref().unwrap_or(&stem),
            upload.bytes.len(),
            folder
        );

        let result = self.derive(&staging_path, folder, &stem).await;

        if let Err(e) = tokio::fs::remove_file(&staging_path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(
                    "Failed to remove staging file {}: {}",
                    staging_path.display(),
                    e
                );
            }
        }

        result?;

        let url = |variant: Variant| {
            format!(
                "{}/{}/{}",
                self.config.public_prefix.trim_end_matches('/'),
                folder,
                variant.file_name(&stem)
            )
        };

        Ok(ImageSet {
            thumbnail: url(Variant::Thumbnail),
            medium: url(Variant::Medium),
            large: url(Variant::Large),
        })
    }

    async fn derive(&self, staging_path: &Path, folder: &str, stem: &str) -> MediaResult<()> {
        let output_dir = self.config.upload_dir.join(folder);
        tokio::fs::create_dir_all(&output_dir).await?;

        let staging_path = staging_path.to_path_buf();
        let stem = stem.to_string();

        tokio::task::spawn_blocking(move || derive_variants(&staging_path, &output_dir, &stem))
            .await
            .map_err(|e| {
                error!("Image processing task failed: {}", e);
                MediaError::Processing("processing task aborted".to_string())
            })?
    }

    /// Delete the files behind an image set. Missing files are ignored.
    pub async fn remove(&self, set: &ImageSet) {
        for url in set.urls() {
            let Some(path) = self.path_for_url(url) else {
                continue;
            };

            match tokio::fs::remove_file(&path).await {
                Ok(()) => info!("Removed image {}", path.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!("Failed to remove image {}: {}", path.display(), e),
            }
        }
    }

    /// Map a public URL back to a file under the upload directory.
    ///
    /// Returns `None` for URLs outside the public prefix or containing
    /// anything but plain path segments.
    pub fn path_for_url(&self, url: &str) -> Option<PathBuf> {
        let prefix = self.config.public_prefix.trim_end_matches('/');
        let relative = url.strip_prefix(prefix)?.trim_start_matches('/');
        if relative.is_empty() {
            return None;
        }

        let relative = Path::new(relative);
        if !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            return None;
        }

        Some(self.config.upload_dir.join(relative))
    }
}

fn validate_folder(folder: &str) -> MediaResult<()> {
    let valid = !folder.is_empty()
        && folder.len() <= 64
        && folder
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');

    if valid {
        Ok(())
    } else {
        Err(MediaError::InvalidFolder(folder.to_string()))
    }
}

fn derive_variants(staging_path: &Path, output_dir: &Path, stem: &str) -> MediaResult<()> {
    let source = image::open(staging_path).map_err(|e| {
        error!("Failed to decode {}: {}", staging_path.display(), e);
        MediaError::Processing("could not decode image".to_string())
    })?;

    let mut written: Vec<PathBuf> = Vec::with_capacity(Variant::ALL.len());

    for variant in Variant::ALL {
        let path = output_dir.join(variant.file_name(stem));

        if let Err(e) = write_variant(&source, variant, &path) {
            written.push(path);
            for partial in &written {
                if let Err(remove_err) = std::fs::remove_file(partial) {
                    if remove_err.kind() != std::io::ErrorKind::NotFound {
                        warn!(
                            "Failed to remove partial output {}: {}",
                            partial.display(),
                            remove_err
                        );
                    }
                }
            }
            return Err(e);
        }

        written.push(path);
    }

    Ok(())
}

fn write_variant(source: &DynamicImage, variant: Variant, path: &Path) -> MediaResult<()> {
    let (width, height) = variant.bounds();

    let resized = if variant.cover_crop() {
        source.resize_to_fill(width, height, FilterType::Lanczos3)
    } else if source.width() > width || source.height() > height {
        source.resize(width, height, FilterType::Lanczos3)
    } else {
        source.clone()
    };

    // JPEG has no alpha channel
    let rgb = DynamicImage::ImageRgb8(resized.to_rgb8());

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let encoder = JpegEncoder::new_with_quality(&mut writer, variant.quality());
    rgb.write_with_encoder(encoder).map_err(|e| {
        error!("Failed to encode {} variant: {}", variant.name(), e);
        MediaError::Processing(format!("could not encode {} variant", variant.name()))
    })?;
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb, Rgba};
    use std::io::Cursor;
    use tempfile::TempDir;

    fn pipeline(root: &TempDir) -> ImagePipeline {
        ImagePipeline::new(UploadConfig {
            upload_dir: root.path().join("public"),
            temp_dir: root.path().join("staging"),
            public_prefix: "/uploads".to_string(),
            max_file_size: 1024 * 1024,
        })
    }

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = ImageBuffer::from_pixel(width, height, Rgba([12u8, 90, 160, 255]));
        let mut bytes = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut bytes, ImageFormat::Png)
            .unwrap();
        bytes.into_inner()
    }

    fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = ImageBuffer::from_pixel(width, height, Rgb([200u8, 120, 40]));
        let mut bytes = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut bytes, ImageFormat::Jpeg)
            .unwrap();
        bytes.into_inner()
    }

    fn upload(content_type: &str, bytes: Vec<u8>) -> UploadedFile {
        UploadedFile {
            file_name: Some("catch.png".to_string()),
            content_type: content_type.to_string(),
            bytes,
        }
    }

    fn staging_is_empty(root: &TempDir) -> bool {
        match std::fs::read_dir(root.path().join("staging")) {
            Ok(mut entries) => entries.next().is_none(),
            Err(_) => true,
        }
    }

    #[tokio::test]
    async fn derives_three_variants_within_bounds() {
        let root = TempDir::new().unwrap();
        let pipeline = pipeline(&root);

        let set = pipeline
            .process(upload("image/png", png_bytes(2000, 1000)), "products")
            .await
            .unwrap();

        assert!(set.thumbnail.starts_with("/uploads/products/"));
        assert!(set.large.ends_with("-large.jpg"));

        let dims = |url: &str| {
            let path = pipeline.path_for_url(url).unwrap();
            image::image_dimensions(path).unwrap()
        };
        assert_eq!(dims(&set.thumbnail), (300, 300));
        assert_eq!(dims(&set.medium), (800, 400));
        assert_eq!(dims(&set.large), (1600, 800));
        assert!(staging_is_empty(&root));
    }

    #[tokio::test]
    async fn small_images_are_not_upscaled() {
        let root = TempDir::new().unwrap();
        let pipeline = pipeline(&root);

        let set = pipeline
            .process(upload("image/jpeg", jpeg_bytes(120, 60)), "branches")
            .await
            .unwrap();

        let medium = pipeline.path_for_url(&set.medium).unwrap();
        assert_eq!(image::image_dimensions(medium).unwrap(), (120, 60));
        let thumbnail = pipeline.path_for_url(&set.thumbnail).unwrap();
        assert_eq!(image::image_dimensions(thumbnail).unwrap(), (300, 300));
    }

    #[tokio::test]
    async fn rejects_non_image_mime_types() {
        let root = TempDir::new().unwrap();
        let pipeline = pipeline(&root);

        let result = pipeline
            .process(upload("text/plain", b"hello".to_vec()), "products")
            .await;

        assert!(matches!(result, Err(MediaError::UnsupportedType(_))));
        assert!(staging_is_empty(&root));
    }

    #[tokio::test]
    async fn rejects_bytes_that_are_not_an_image() {
        let root = TempDir::new().unwrap();
        let pipeline = pipeline(&root);

        let result = pipeline
            .process(upload("image/png", b"definitely not a png".to_vec()), "products")
            .await;

        assert!(matches!(result, Err(MediaError::UnsupportedType(_))));
    }

    #[tokio::test]
    async fn rejects_oversized_and_empty_files() {
        let root = TempDir::new().unwrap();
        let pipeline = pipeline(&root);

        let too_big = vec![0u8; 1024 * 1024 + 1];
        assert!(matches!(
            pipeline.validate(&upload("image/png", too_big)),
            Err(MediaError::TooLarge { .. })
        ));
        assert!(matches!(
            pipeline.validate(&upload("image/png", Vec::new())),
            Err(MediaError::Empty)
        ));
    }

    #[tokio::test]
    async fn truncated_image_leaves_no_output_behind() {
        let root = TempDir::new().unwrap();
        let pipeline = pipeline(&root);

        let mut bytes = png_bytes(400, 400);
        bytes.truncate(40);

        let result = pipeline
            .process(upload("image/png", bytes), "products")
            .await;

        assert!(matches!(result, Err(MediaError::Processing(_))));
        assert!(staging_is_empty(&root));
        let outputs = std::fs::read_dir(root.path().join("public/products"))
            .map(|entries| entries.count())
            .unwrap_or(0);
        assert_eq!(outputs, 0);
    }

    #[tokio::test]
    async fn rejects_folder_traversal() {
        let root = TempDir::new().unwrap();
        let pipeline = pipeline(&root);

        let result = pipeline
            .process(upload("image/png", png_bytes(10, 10)), "../etc")
            .await;

        assert!(matches!(result, Err(MediaError::InvalidFolder(_))));
        assert!(staging_is_empty(&root));
    }

    #[tokio::test]
    async fn remove_deletes_every_variant() {
        let root = TempDir::new().unwrap();
        let pipeline = pipeline(&root);

        let set = pipeline
            .process(upload("image/png", png_bytes(50, 50)), "slides")
            .await
            .unwrap();
        pipeline.remove(&set).await;

        for url in set.urls() {
            assert!(!pipeline.path_for_url(url).unwrap().exists());
        }
    }

    #[test]
    fn urls_outside_the_prefix_do_not_map_to_files() {
        let root = TempDir::new().unwrap();
        let pipeline = pipeline(&root);

        assert!(pipeline.path_for_url("https://cdn.example.com/a.jpg").is_none());
        assert!(pipeline.path_for_url("/uploads/../secret").is_none());
        assert_eq!(
            pipeline.path_for_url("/uploads/products/a-large.jpg"),
            Some(root.path().join("public/products/a-large.jpg"))
        );
    }
}
