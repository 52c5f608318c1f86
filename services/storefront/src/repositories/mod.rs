//! Repositories for database operations

pub mod branch;
pub mod category;
pub mod offer;
pub mod product;
pub mod slide;
pub mod user;

pub use branch::BranchRepository;
pub use category::{CategoryRecord, CategoryRepository};
pub use offer::{OfferRepository, Redemption};
pub use product::ProductRepository;
pub use slide::SlideRepository;
pub use user::{UserRecord, UserRepository};

/// Escape LIKE wildcards in user input and wrap it for a substring match
pub(crate) fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}
