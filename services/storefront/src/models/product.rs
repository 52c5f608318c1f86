//! Product model, listing query and write payload

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{ImageList, Page, Pagination};

/// Default page size of product listings
pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Product entity, joined with its category slug
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: Decimal,
    pub compare_at_price: Option<Decimal>,
    pub unit: String,
    pub stock: i32,
    pub category_id: Option<Uuid>,
    pub category_slug: Option<String>,
    #[sqlx(try_from = "String")]
    pub images: ImageList,
    pub is_active: bool,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn is_listed(&self) -> bool {
        self.is_active
    }

    pub fn is_featured_listing(&self) -> bool {
        self.is_featured && self.is_active
    }
}

/// Sort orders for product listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductSort {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    Name,
}

impl ProductSort {
    /// ORDER BY clause over the `p` alias
    pub fn order_by(self) -> &'static str {
        match self {
            ProductSort::Newest => "p.created_at DESC, p.id",
            ProductSort::PriceAsc => "p.price ASC, p.id",
            ProductSort::PriceDesc => "p.price DESC, p.id",
            ProductSort::Name => "p.name ASC, p.id",
        }
    }
}

/// Query parameters for product listings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductQuery {
    /// Category slug
    pub category: Option<String>,
    /// Case-insensitive match on name or description
    pub search: Option<String>,
    /// Only featured products
    pub featured: Option<bool>,
    #[serde(default)]
    pub sort: ProductSort,
    /// Page number (1-based)
    pub page: Option<u32>,
    /// Number of items per page
    pub limit: Option<u32>,
}

impl ProductQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            limit: self.limit,
        }
    }

    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Does the product satisfy the filters (not the active flag)?
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = &self.category {
            if product.category_slug.as_deref() != Some(category.as_str()) {
                return false;
            }
        }

        if self.featured == Some(true) && !product.is_featured {
            return false;
        }

        if let Some(term) = self.search_term() {
            let term = term.to_lowercase();
            if !product.name.to_lowercase().contains(&term)
                && !product.description.to_lowercase().contains(&term)
            {
                return false;
            }
        }

        true
    }

    /// Filter, sort and paginate an in-memory list of active products the
    /// same way the SQL listing does.
    pub fn apply(&self, products: Vec<Product>) -> Page<Product> {
        let mut matching: Vec<Product> = products
            .into_iter()
            .filter(|p| p.is_listed() && self.matches(p))
            .collect();

        match self.sort {
            ProductSort::Newest => matching.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            ProductSort::PriceAsc => matching.sort_by(|a, b| a.price.cmp(&b.price)),
            ProductSort::PriceDesc => matching.sort_by(|a, b| b.price.cmp(&a.price)),
            ProductSort::Name => matching.sort_by(|a, b| a.name.cmp(&b.name)),
        }

        let pagination = self.pagination();
        Page::slice(
            matching,
            pagination.page(),
            pagination.limit(DEFAULT_PAGE_SIZE),
        )
    }
}

/// Full set of writable product columns
#[derive(Debug, Clone)]
pub struct ProductInput {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: Decimal,
    pub compare_at_price: Option<Decimal>,
    pub unit: String,
    pub stock: i32,
    pub category_id: Option<Uuid>,
    pub images: ImageList,
    pub is_active: bool,
    pub is_featured: bool,
}

impl From<&Product> for ProductInput {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            slug: product.slug.clone(),
            description: product.description.clone(),
            price: product.price,
            compare_at_price: product.compare_at_price,
            unit: product.unit.clone(),
            stock: product.stock,
            category_id: product.category_id,
            images: product.images.clone(),
            is_active: product.is_active,
            is_featured: product.is_featured,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str, price: i64, category: &str, featured: bool, active: bool) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug: name.to_lowercase().replace(' ', "-"),
            description: format!("Fresh {}", name.to_lowercase()),
            price: Decimal::new(price, 2),
            compare_at_price: None,
            unit: "kg".to_string(),
            stock: 10,
            category_id: None,
            category_slug: Some(category.to_string()),
            images: ImageList::default(),
            is_active: active,
            is_featured: featured,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            product("Atlantic Salmon", 2499, "fresh-fish", true, true),
            product("Tiger Prawns", 1899, "shellfish", true, true),
            product("Blue Crab", 1599, "shellfish", false, true),
            product("Smoked Eel", 2999, "smoked", true, false),
        ]
    }

    #[test]
    fn apply_excludes_inactive_products() {
        let page = ProductQuery::default().apply(catalog());
        assert_eq!(page.total, 3);
        assert!(page.items.iter().all(|p| p.is_active));
    }

    #[test]
    fn apply_filters_by_category_and_search() {
        let query = ProductQuery {
            category: Some("shellfish".to_string()),
            search: Some("CRAB".to_string()),
            ..Default::default()
        };
        let page = query.apply(catalog());
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].name, "Blue Crab");
    }

    #[test]
    fn apply_sorts_by_price() {
        let query = ProductQuery {
            sort: ProductSort::PriceAsc,
            ..Default::default()
        };
        let names: Vec<_> = query
            .apply(catalog())
            .items
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Blue Crab", "Tiger Prawns", "Atlantic Salmon"]);
    }

    #[test]
    fn featured_listing_requires_both_flags() {
        let featured: Vec<_> = catalog()
            .into_iter()
            .filter(Product::is_featured_listing)
            .map(|p| p.name)
            .collect();
        assert_eq!(featured, vec!["Atlantic Salmon", "Tiger Prawns"]);
    }
}
