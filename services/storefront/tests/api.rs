//! HTTP tests against a service whose database is unreachable

mod support;

use axum::http::{StatusCode, header};
use image::{DynamicImage, ImageFormat, RgbImage};
use serde_json::json;
use std::io::Cursor;
use storefront::response::DATA_SOURCE_HEADER;
use support::*;
use tower::ServiceExt;

#[tokio::test]
async fn test_health_reports_unavailable_database() {
    let app = TestApp::new();

    let response = app.router.oneshot(get("/api/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["database"], "unavailable");
}

#[tokio::test]
async fn test_branches_are_served_from_fallback() {
    let app = TestApp::new();

    let response = app.router.oneshot(get("/api/branches")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(DATA_SOURCE_HEADER).unwrap(),
        "fallback"
    );

    let body = body_json(response).await;
    let branches = body["data"].as_array().unwrap();
    assert!(!branches.is_empty());
    assert!(branches.iter().all(|b| b["isActive"] == true));
    assert!(branches.iter().all(|b| b["name"] != "Airport Kiosk"));
}

#[tokio::test]
async fn test_featured_products_are_featured_and_active() {
    let app = TestApp::new();

    let response = app
        .router
        .oneshot(get("/api/products/featured"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let products = body["data"].as_array().unwrap();
    assert_eq!(products.len(), 3);
    assert!(
        products
            .iter()
            .all(|p| p["isFeatured"] == true && p["isActive"] == true)
    );
}

#[tokio::test]
async fn test_product_by_slug_uses_fallback() {
    let app = TestApp::new();

    let found = app
        .router
        .clone()
        .oneshot(get("/api/products/tiger-prawns"))
        .await
        .unwrap();
    assert_eq!(found.status(), StatusCode::OK);
    let body = body_json(found).await;
    assert_eq!(body["data"]["slug"], "tiger-prawns");

    let missing = app
        .router
        .oneshot(get("/api/products/no-such-fish"))
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    let body = body_json(missing).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_bootstrap_admin_can_log_in_without_database() {
    let app = TestApp::new();

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            &json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let token = body["data"]["token"].as_str().unwrap();
    assert!(!token.is_empty());
    assert_eq!(body["data"]["user"]["role"], "admin");

    let verified = app
        .router
        .clone()
        .oneshot(authorized("GET", "/api/auth/verify", token, Default::default()))
        .await
        .unwrap();
    assert_eq!(verified.status(), StatusCode::OK);
    let body = body_json(verified).await;
    assert_eq!(body["data"]["email"], ADMIN_EMAIL);

    let wrong_password = app
        .router
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            &json!({ "email": ADMIN_EMAIL, "password": "not-the-password" }),
        ))
        .await
        .unwrap();
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_routes_require_a_token() {
    let app = TestApp::new();

    let verify = app
        .router
        .clone()
        .oneshot(get("/api/auth/verify"))
        .await
        .unwrap();
    assert_eq!(verify.status(), StatusCode::UNAUTHORIZED);

    let redeem = app
        .router
        .clone()
        .oneshot(
            axum::http::Request::builder()
                .method("POST")
                .uri(format!("/api/offers/{}/redeem", uuid::Uuid::new_v4()))
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(redeem.status(), StatusCode::UNAUTHORIZED);

    let garbage = app
        .router
        .oneshot(authorized(
            "GET",
            "/api/admin/products",
            "not-a-token",
            Default::default(),
        ))
        .await
        .unwrap();
    assert_eq!(garbage.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_customers_cannot_reach_admin_routes() {
    let app = TestApp::new();
    let token = app.customer_token();

    let response = app
        .router
        .oneshot(authorized(
            "GET",
            "/api/admin/products",
            &token,
            Default::default(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_managers_cannot_manage_users() {
    let app = TestApp::new();
    let token = app.token(uuid::Uuid::new_v4(), storefront::models::Role::Manager);

    let response = app
        .router
        .oneshot(authorized("GET", "/api/admin/users", &token, Default::default()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_upload_rejects_non_images() {
    let app = TestApp::new();
    let token = app.admin_token();

    let mut request = authorized(
        "POST",
        "/api/admin/uploads",
        &token,
        multipart_file("file", "notes.txt", "text/plain", b"just some text"),
    );
    request.headers_mut().insert(
        header::CONTENT_TYPE,
        multipart_content_type().parse().unwrap(),
    );

    let response = app.router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_upload_derives_every_variant() {
    let app = TestApp::new();
    let token = app.admin_token();

    let mut png = Vec::new();
    DynamicImage::ImageRgb8(RgbImage::from_pixel(400, 300, image::Rgb([20, 90, 160])))
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .unwrap();

    let mut request = authorized(
        "POST",
        "/api/admin/uploads?folder=products",
        &token,
        multipart_file("file", "crab.png", "image/png", &png),
    );
    request.headers_mut().insert(
        header::CONTENT_TYPE,
        multipart_content_type().parse().unwrap(),
    );

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    for variant in ["thumbnail", "medium", "large"] {
        let url = body["data"][variant].as_str().unwrap();
        assert!(url.starts_with("/uploads/products/"), "{}", url);

        let path = app.state.image_pipeline.path_for_url(url).unwrap();
        assert!(path.exists(), "{} was not written", path.display());
    }
}

#[tokio::test]
async fn test_huge_page_number_serves_an_empty_page() {
    let app = TestApp::new();

    let response = app
        .router
        .oneshot(get("/api/products?page=4294967295"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 0);
    assert_eq!(body["data"]["page"], 4294967295u64);
    assert!(body["data"]["total"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn test_fallback_offers_are_currently_redeemable() {
    let app = TestApp::new();

    let response = app.router.oneshot(get("/api/offers")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(DATA_SOURCE_HEADER).unwrap(),
        "fallback"
    );

    let body = body_json(response).await;
    let offers = body["data"].as_array().unwrap();
    let titles: Vec<&str> = offers.iter().map(|o| o["title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["Salmon Weekend", "Oyster Happy Hour"]);
    assert!(offers.iter().all(|o| o["isRedeemable"] == true));
}

#[tokio::test]
async fn test_fallback_categories_are_active_and_ordered() {
    let app = TestApp::new();

    let response = app.router.oneshot(get("/api/categories")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let categories = body["data"].as_array().unwrap();
    assert!(!categories.is_empty());
    assert!(categories.iter().all(|c| c["isActive"] == true));

    let orders: Vec<i64> = categories
        .iter()
        .map(|c| c["sortOrder"].as_i64().unwrap())
        .collect();
    let mut sorted = orders.clone();
    sorted.sort();
    assert_eq!(orders, sorted);
}

#[tokio::test]
async fn test_fallback_slideshow_is_active_and_ordered() {
    let app = TestApp::new();

    let response = app.router.oneshot(get("/api/slideshow")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let slides = body["data"].as_array().unwrap();
    let titles: Vec<&str> = slides.iter().map(|s| s["title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["Fresh From the Boats", "Shellfish Season"]);

    let orders: Vec<i64> = slides
        .iter()
        .map(|s| s["sortOrder"].as_i64().unwrap())
        .collect();
    assert_eq!(orders, vec![1, 2]);
}

#[tokio::test]
async fn test_upload_rejects_oversize_and_empty_files() {
    let app = TestApp::new();
    let token = app.admin_token();
    let max = app.state.config.uploads.max_file_size;

    for (name, bytes) in [("huge.png", vec![0u8; max + 1]), ("empty.png", Vec::new())] {
        let mut request = authorized(
            "POST",
            "/api/admin/uploads",
            &token,
            multipart_file("file", name, "image/png", &bytes),
        );
        request.headers_mut().insert(
            header::CONTENT_TYPE,
            multipart_content_type().parse().unwrap(),
        );

        let response = app.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", name);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "validation");
    }

    let staging = &app.state.config.uploads.temp_dir;
    let leftovers = std::fs::read_dir(staging)
        .map(|entries| entries.count())
        .unwrap_or(0);
    assert_eq!(leftovers, 0);
}
