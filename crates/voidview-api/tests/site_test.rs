mod helpers;

use axum::http::StatusCode;
use helpers::fixtures::search_body;
use helpers::{setup_test_app, SITE_URL};
use serde_json::Value;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_home_is_featured_page_one() {
    let app = setup_test_app().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "space"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(&["A"], 1)))
        .expect(1)
        .mount(&app.nasa)
        .await;

    let response = app.client().get("/").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["meta"]["canonical"], format!("{}/", SITE_URL));
    assert_eq!(body["feed"]["cat"], "featured");
    assert_eq!(body["feed"]["page"], 1);
}

#[tokio::test]
async fn test_category_listing_page() {
    let app = setup_test_app().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "galaxy"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(&["G1", "G2"], 80)))
        .mount(&app.nasa)
        .await;

    let response = app.client().get("/c/galaxies/3").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["meta"]["canonical"], format!("{}/c/galaxies/3", SITE_URL));
    assert_eq!(body["feed"]["returned"], 2);
    assert_eq!(body["feed"]["totalPages"], 4);
}

#[tokio::test]
async fn test_category_index_redirects_to_first_page() {
    let app = setup_test_app().await;

    let response = app.client().get("/c/moon").await;
    response.assert_status(StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.header("location"), "/c/moon/1");

    let response = app.client().get("/c/featured").await;
    response.assert_status(StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.header("location"), "/");
}

#[tokio::test]
async fn test_non_canonical_pages_redirect() {
    let app = setup_test_app().await;

    let response = app.client().get("/c/featured/1").await;
    response.assert_status(StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.header("location"), "/");

    for bad in ["0", "abc", "2.5", "-1"] {
        let response = app.client().get(&format!("/c/mars/{}", bad)).await;
        response.assert_status(StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.header("location"), "/c/mars/1");
    }
}

#[tokio::test]
async fn test_unknown_category_is_not_found() {
    let app = setup_test_app().await;

    let response = app.client().get("/c/quasars").await;
    response.assert_status_not_found();
    let body: Value = response.json();
    assert_eq!(body["error"], "Unknown category 'quasars'");

    let response = app.client().get("/c/quasars/2").await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn test_sitemap_lists_static_and_category_pages() {
    let app = setup_test_app().await;

    let response = app.client().get("/sitemap.xml").await;

    response.assert_status_ok();
    assert_eq!(response.header("content-type"), "application/xml");
    let xml = response.text();
    assert!(xml.starts_with("<?xml"));
    assert_eq!(xml.matches("<url>").count(), 5 + 4 + 9 * 5);
    assert!(xml.contains(&format!("<loc>{}/c/featured/2</loc>", SITE_URL)));
    assert!(!xml.contains(&format!("<loc>{}/c/featured/1</loc>", SITE_URL)));
    assert!(xml.contains(&format!("<loc>{}/c/nebulae/1</loc>", SITE_URL)));
}

#[tokio::test]
async fn test_robots_points_at_sitemap() {
    let app = setup_test_app().await;

    let response = app.client().get("/robots.txt").await;

    response.assert_status_ok();
    assert_eq!(
        response.text(),
        format!("User-Agent: *\nAllow: /\n\nSitemap: {}/sitemap.xml\n", SITE_URL)
    );
}
