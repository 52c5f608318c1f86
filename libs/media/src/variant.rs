//! Derived image sizes and the URL set stored for each uploaded image

use serde::{Deserialize, Serialize};

/// A fixed output size derived from every upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Thumbnail,
    Medium,
    Large,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::Thumbnail, Variant::Medium, Variant::Large];

    pub fn name(self) -> &'static str {
        match self {
            Variant::Thumbnail => "thumbnail",
            Variant::Medium => "medium",
            Variant::Large => "large",
        }
    }

    /// Bounding box in pixels
    pub fn bounds(self) -> (u32, u32) {
        match self {
            Variant::Thumbnail => (300, 300),
            Variant::Medium => (800, 800),
            Variant::Large => (1600, 1600),
        }
    }

    /// JPEG quality (1-100)
    pub fn quality(self) -> u8 {
        match self {
            Variant::Thumbnail => 80,
            Variant::Medium => 85,
            Variant::Large => 90,
        }
    }

    /// Thumbnails fill their box and are centre-cropped; the others fit inside it.
    pub fn cover_crop(self) -> bool {
        matches!(self, Variant::Thumbnail)
    }

    /// Output file name for a given upload stem
    pub fn file_name(self, stem: &str) -> String {
        format!("{}-{}.jpg", stem, self.name())
    }
}

/// Relative URLs of the variants derived from one upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSet {
    pub thumbnail: String,
    pub medium: String,
    pub large: String,
}

impl ImageSet {
    /// An image set whose variants all point at the same URL.
    ///
    /// Used for records that predate variant derivation and store one URL.
    pub fn single(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            thumbnail: url.clone(),
            medium: url.clone(),
            large: url,
        }
    }

    pub fn url(&self, variant: Variant) -> &str {
        match variant {
            Variant::Thumbnail => &self.thumbnail,
            Variant::Medium => &self.medium,
            Variant::Large => &self.large,
        }
    }

    pub fn urls(&self) -> impl Iterator<Item = &str> {
        Variant::ALL.into_iter().map(move |v| self.url(v))
    }
}
