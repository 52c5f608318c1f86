//! Static sample catalog served when the database is unavailable or empty
//!
//! Ids are fixed so links built from fallback payloads stay valid across
//! restarts. Every list holds inactive or expired rows too; callers filter
//! with the same predicates the SQL queries use.

use chrono::{DateTime, Duration, Utc};
use media::ImageSet;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{Branch, Category, ImageList, Product, Slide, SpecialOffer, StoredImage};

/// 2025-01-01T00:00:00Z
const EPOCH: i64 = 1_735_689_600;

fn at(days: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(EPOCH + days * 86_400, 0).unwrap_or_default()
}

fn id(n: u128) -> Uuid {
    Uuid::from_u128(0x5eaf_00d0_0000_0000_0000_0000_0000_0000 | n)
}

fn price(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

fn image(path: &str) -> ImageSet {
    ImageSet::single(format!("/images/{}", path))
}

const FRESH_FISH: u128 = 0x100;
const SHELLFISH: u128 = 0x101;
const SMOKED: u128 = 0x102;
const FROZEN: u128 = 0x103;

pub fn categories() -> Vec<Category> {
    let category = |n: u128, name: &str, slug: &str, description: &str, sort_order: i32| Category {
        id: id(n),
        name: name.to_string(),
        slug: slug.to_string(),
        description: description.to_string(),
        image: Some(format!("/images/categories/{}.jpg", slug)),
        sort_order,
        is_active: true,
        created_at: at(0),
        updated_at: at(0),
    };

    vec![
        category(
            FRESH_FISH,
            "Fresh Fish",
            "fresh-fish",
            "Whole fish and fillets landed this week",
            1,
        ),
        category(SHELLFISH, "Shellfish", "shellfish", "Crab, lobster, prawns and oysters", 2),
        category(SMOKED, "Smoked & Cured", "smoked-cured", "Cold-smoked and cured specialities", 3),
        category(FROZEN, "Frozen", "frozen", "Flash-frozen at sea", 4),
    ]
}

struct Seed {
    n: u128,
    name: &'static str,
    slug: &'static str,
    description: &'static str,
    price: i64,
    compare_at: Option<i64>,
    unit: &'static str,
    category: u128,
    featured: bool,
    active: bool,
}

pub fn products() -> Vec<Product> {
    let seeds = [
        Seed {
            n: 0x200,
            name: "Atlantic Salmon Fillet",
            slug: "atlantic-salmon-fillet",
            description: "Skin-on fillet, pin-boned, from sustainable farms",
            price: 2499,
            compare_at: Some(2899),
            unit: "kg",
            category: FRESH_FISH,
            featured: true,
            active: true,
        },
        Seed {
            n: 0x201,
            name: "Whole Sea Bass",
            slug: "whole-sea-bass",
            description: "Line-caught, gutted and scaled",
            price: 1850,
            compare_at: None,
            unit: "piece",
            category: FRESH_FISH,
            featured: false,
            active: true,
        },
        Seed {
            n: 0x202,
            name: "Tiger Prawns",
            slug: "tiger-prawns",
            description: "Large raw shell-on prawns",
            price: 1899,
            compare_at: None,
            unit: "kg",
            category: SHELLFISH,
            featured: true,
            active: true,
        },
        Seed {
            n: 0x203,
            name: "Rock Oysters",
            slug: "rock-oysters",
            description: "Dozen live oysters, ready to shuck",
            price: 2200,
            compare_at: None,
            unit: "dozen",
            category: SHELLFISH,
            featured: true,
            active: true,
        },
        Seed {
            n: 0x204,
            name: "Blue Swimmer Crab",
            slug: "blue-swimmer-crab",
            description: "Cooked whole crab",
            price: 1599,
            compare_at: None,
            unit: "piece",
            category: SHELLFISH,
            featured: false,
            active: true,
        },
        Seed {
            n: 0x205,
            name: "Smoked Mackerel",
            slug: "smoked-mackerel",
            description: "Hot-smoked fillets with black pepper",
            price: 899,
            compare_at: None,
            unit: "pack",
            category: SMOKED,
            featured: false,
            active: true,
        },
        Seed {
            n: 0x206,
            name: "Gravlax",
            slug: "gravlax",
            description: "Dill-cured salmon, sliced",
            price: 1299,
            compare_at: Some(1499),
            unit: "pack",
            category: SMOKED,
            featured: true,
            active: false,
        },
        Seed {
            n: 0x207,
            name: "Frozen Squid Tubes",
            slug: "frozen-squid-tubes",
            description: "Cleaned tubes, individually frozen",
            price: 1099,
            compare_at: None,
            unit: "kg",
            category: FROZEN,
            featured: false,
            active: true,
        },
    ];

    let categories = categories();

    seeds
        .iter()
        .enumerate()
        .map(|(i, seed)| {
            let category = categories.iter().find(|c| c.id == id(seed.category));
            Product {
                id: id(seed.n),
                name: seed.name.to_string(),
                slug: seed.slug.to_string(),
                description: seed.description.to_string(),
                price: price(seed.price),
                compare_at_price: seed.compare_at.map(price),
                unit: seed.unit.to_string(),
                stock: 25,
                category_id: category.map(|c| c.id),
                category_slug: category.map(|c| c.slug.clone()),
                images: ImageList(vec![image(&format!("products/{}.jpg", seed.slug))]),
                is_active: seed.active,
                is_featured: seed.featured,
                created_at: at(i as i64),
                updated_at: at(i as i64),
            }
        })
        .collect()
}

pub fn branches() -> Vec<Branch> {
    let branch = |n: u128,
                  name: &str,
                  address: &str,
                  city: &str,
                  (latitude, longitude): (f64, f64),
                  sort_order: i32,
                  is_active: bool| Branch {
        id: id(n),
        name: name.to_string(),
        address: address.to_string(),
        city: city.to_string(),
        phone: format!("+1 555 01{:02}", sort_order),
        email: Some(format!("branch{}@seafood.example", sort_order)),
        latitude,
        longitude,
        opening_hours: "Mon-Sat 08:00-19:00, Sun 09:00-14:00".to_string(),
        image: StoredImage::from(image(&format!("branches/{}.jpg", sort_order))),
        is_active,
        sort_order,
        created_at: at(0),
        updated_at: at(0),
    };

    vec![
        branch(0x300, "Harbour Market", "1 Quay Street", "Portside", (40.7003, -74.0121), 1, true),
        branch(
            0x301,
            "Old Town Fishmonger",
            "27 Market Lane",
            "Riverton",
            (40.7306, -73.9866),
            2,
            true,
        ),
        branch(0x302, "Airport Kiosk", "Terminal 2", "Portside", (40.6413, -73.7781), 3, false),
    ]
}

/// Offers with windows relative to `now`, so the sample stays current
pub fn offers(now: DateTime<Utc>) -> Vec<SpecialOffer> {
    let offer = |n: u128,
                 title: &str,
                 product: Option<u128>,
                 (original, offer_price): (i64, i64),
                 (from, until): (Duration, Duration),
                 max_redemptions: Option<i32>| SpecialOffer {
        id: id(n),
        title: title.to_string(),
        description: format!("{} while stocks last", title),
        product_id: product.map(id),
        original_price: price(original),
        offer_price: price(offer_price),
        valid_from: now + from,
        valid_until: now + until,
        max_redemptions,
        redemption_count: 0,
        image: StoredImage::from(image(&format!("offers/{:x}.jpg", n))),
        is_active: true,
        created_at: at(0),
        updated_at: at(0),
    };

    vec![
        offer(
            0x400,
            "Salmon Weekend",
            Some(0x200),
            (2499, 1999),
            (Duration::days(-2), Duration::days(5)),
            None,
        ),
        offer(
            0x401,
            "Oyster Happy Hour",
            Some(0x203),
            (2200, 1650),
            (Duration::days(-1), Duration::days(30)),
            Some(200),
        ),
        offer(
            0x402,
            "New Year Prawn Feast",
            Some(0x202),
            (1899, 1399),
            (Duration::days(-40), Duration::days(-10)),
            None,
        ),
    ]
}

pub fn slides() -> Vec<Slide> {
    let slide = |n: u128,
                 title: &str,
                 subtitle: &str,
                 link: &str,
                 sort_order: i32,
                 is_active: bool| Slide {
        id: id(n),
        title: title.to_string(),
        subtitle: Some(subtitle.to_string()),
        button_text: Some("Shop now".to_string()),
        button_link: Some(link.to_string()),
        image: StoredImage::from(image(&format!("slides/{}.jpg", sort_order))),
        sort_order,
        is_active,
        created_at: at(0),
        updated_at: at(0),
    };

    vec![
        slide(0x502, "Winter Smokehouse", "Back in October", "/categories/smoked-cured", 3, false),
        slide(0x500, "Fresh From the Boats", "Landed this morning", "/products", 1, true),
        slide(
            0x501,
            "Shellfish Season",
            "Oysters, crab and lobster",
            "/categories/shellfish",
            2,
            true,
        ),
    ]
}
