//! API models for request and response payloads

use common::MaybeEmpty;
use media::ImageSet;
use serde::{Deserialize, Serialize};

pub mod branch;
pub mod category;
pub mod offer;
pub mod product;
pub mod slide;
pub mod user;

pub use branch::{Branch, BranchInput};
pub use category::{Category, CategoryInput};
pub use offer::{OfferInput, OfferView, SpecialOffer};
pub use product::{Product, ProductInput, ProductQuery, ProductSort};
pub use slide::{Slide, SlideInput, SlideOrder};
pub use user::{AuthUser, NewUser, Role, UpdateUser, User, UserProfile};

/// Query parameters for paginated listings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pagination {
    /// Page number (1-based)
    pub page: Option<u32>,
    /// Number of items per page
    pub limit: Option<u32>,
}

impl Pagination {
    pub const MAX_LIMIT: u32 = 100;

    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self, default: u32) -> u32 {
        self.limit.unwrap_or(default).clamp(1, Self::MAX_LIMIT)
    }

    pub fn offset(&self, default_limit: u32) -> i64 {
        (self.page() as i64 - 1) * self.limit(default_limit) as i64
    }
}

/// One page of a listing
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub limit: u32,
    pub total: i64,
}

impl<T> Page<T> {
    /// Paginate an in-memory list
    pub fn slice(all: Vec<T>, page: u32, limit: u32) -> Self {
        let total = all.len() as i64;
        let offset = (page.max(1) as u64 - 1).saturating_mul(limit as u64);
        let items = all
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(limit as usize)
            .collect();

        Self {
            items,
            page,
            limit,
            total,
        }
    }
}

impl<T> MaybeEmpty for Page<T> {
    fn is_empty_result(&self) -> bool {
        self.items.is_empty()
    }
}

/// Image sets stored as a JSON-encoded array in a text column
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageList(pub Vec<ImageSet>);

impl ImageList {
    /// Decode the column value.
    ///
    /// Malformed values decode as an empty list. A bare URL string, or an
    /// array of URL strings, is read as single-URL image sets.
    pub fn decode(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return Self::default();
        }

        if let Ok(sets) = serde_json::from_str::<Vec<ImageSet>>(raw) {
            return Self(sets);
        }

        if let Ok(urls) = serde_json::from_str::<Vec<String>>(raw) {
            return Self(urls.into_iter().map(ImageSet::single).collect());
        }

        if raw.starts_with('/') || raw.starts_with("http") {
            return Self(vec![ImageSet::single(raw)]);
        }

        Self::default()
    }

    pub fn encode(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_else(|_| "[]".to_string())
    }
}

impl From<String> for ImageList {
    fn from(raw: String) -> Self {
        Self::decode(&raw)
    }
}

/// A single optional image set stored as JSON in a nullable text column
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoredImage(pub Option<ImageSet>);

impl StoredImage {
    pub fn decode(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
            return Self(None);
        };

        if let Ok(set) = serde_json::from_str::<ImageSet>(raw) {
            return Self(Some(set));
        }

        Self(ImageList::decode(raw).0.into_iter().next())
    }

    pub fn encode(&self) -> Option<String> {
        self.0.as_ref().and_then(|set| serde_json::to_string(set).ok())
    }
}

impl From<Option<String>> for StoredImage {
    fn from(raw: Option<String>) -> Self {
        Self::decode(raw.as_deref())
    }
}

impl From<ImageSet> for StoredImage {
    fn from(set: ImageSet) -> Self {
        Self(Some(set))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_clamps_page_and_limit() {
        let pagination = Pagination {
            page: Some(0),
            limit: Some(1000),
        };
        assert_eq!(pagination.page(), 1);
        assert_eq!(pagination.limit(12), 100);
        assert_eq!(pagination.offset(12), 0);

        let pagination = Pagination {
            page: Some(3),
            limit: None,
        };
        assert_eq!(pagination.offset(12), 24);
    }

    #[test]
    fn page_slice_reports_total_before_pagination() {
        let page = Page::slice((1..=25).collect::<Vec<_>>(), 3, 10);
        assert_eq!(page.items, vec![21, 22, 23, 24, 25]);
        assert_eq!(page.total, 25);
        assert!(!page.is_empty_result());

        let past_end = Page::slice(vec![1, 2], 5, 10);
        assert!(past_end.is_empty_result());
    }

    #[test]
    fn page_slice_handles_the_largest_page_number() {
        let page = Page::slice(vec![1, 2, 3], u32::MAX, 12);
        assert!(page.items.is_empty());
        assert_eq!(page.page, u32::MAX);
        assert_eq!(page.total, 3);
    }

    #[test]
    fn image_list_decodes_sets() {
        let raw = concat!(
            r#"[{"thumbnail":"/uploads/p/a-thumbnail.jpg","#,
            r#""medium":"/uploads/p/a-medium.jpg","large":"/uploads/p/a-large.jpg"}]"#
        );
        let list = ImageList::decode(raw);
        assert_eq!(list.0.len(), 1);
        assert_eq!(list.0[0].medium, "/uploads/p/a-medium.jpg");
        assert_eq!(ImageList::decode(&list.encode()), list);
    }

    #[test]
    fn image_list_tolerates_legacy_and_malformed_values() {
        assert_eq!(ImageList::decode("").0.len(), 0);
        assert_eq!(ImageList::decode("{not json").0.len(), 0);

        let urls = ImageList::decode(r#"["/images/a.jpg","/images/b.jpg"]"#);
        assert_eq!(urls.0[1], ImageSet::single("/images/b.jpg"));

        let bare = ImageList::decode("/images/crab.jpg");
        assert_eq!(bare.0, vec![ImageSet::single("/images/crab.jpg")]);
    }

    #[test]
    fn stored_image_round_trips_through_its_column() {
        assert_eq!(StoredImage::decode(None), StoredImage(None));
        assert_eq!(StoredImage::decode(Some("  ")), StoredImage(None));

        let image = StoredImage::from(ImageSet::single("/uploads/branches/x.jpg"));
        let column = image.encode();
        assert_eq!(StoredImage::decode(column.as_deref()), image);
        assert_eq!(
            StoredImage::decode(Some("/uploads/branches/old.jpg")).0,
            Some(ImageSet::single("/uploads/branches/old.jpg"))
        );
    }
}
