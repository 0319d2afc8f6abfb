mod helpers;

use axum::http::StatusCode;
use helpers::fixtures::{manifest_body, search_body};
use helpers::{api_path, setup_test_app};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

fn apod_body(date: &str) -> Value {
    json!({
        "date": date,
        "explanation": "A spiral galaxy.",
        "hdurl": "https://apod.nasa.gov/apod/image/hd.jpg",
        "media_type": "image",
        "service_version": "v1",
        "title": "Galaxy",
        "url": "https://apod.nasa.gov/apod/image/sd.jpg",
        "thumbnail_url": "https://apod.nasa.gov/apod/image/thumb.jpg"
    })
}

#[tokio::test]
async fn test_apod_passthrough() {
    let app = setup_test_app().await;
    Mock::given(method("GET"))
        .and(path("/planetary/apod"))
        .and(query_param("api_key", "TEST_KEY"))
        .and(query_param("date", "2024-01-05"))
        .and(query_param("hd", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(apod_body("2024-01-05")))
        .expect(1)
        .mount(&app.nasa)
        .await;

    let response = app
        .client()
        .get(&api_path("/apod"))
        .add_query_param("date", "2024-01-05")
        .await;

    response.assert_status_ok();
    assert!(response.headers().get("x-apod-fallback").is_none());
    let body: Value = response.json();
    assert_eq!(body["title"], "Galaxy");
    assert_eq!(body["thumbnail_url"], "https://apod.nasa.gov/apod/image/thumb.jpg");
    assert!(body.get("source").is_none());
}

#[tokio::test]
async fn test_apod_entry_without_url_is_passed_through() {
    let app = setup_test_app().await;
    Mock::given(method("GET"))
        .and(path("/planetary/apod"))
        .and(query_param("hd", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "date": "2024-06-02",
            "explanation": "An interactive feature.",
            "media_type": "other",
            "service_version": "v1",
            "title": "Solar System Explorer"
        })))
        .expect(1)
        .mount(&app.nasa)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(&["PIA1"], 1)))
        .expect(0)
        .mount(&app.nasa)
        .await;

    let response = app.client().get(&api_path("/apod")).await;

    response.assert_status_ok();
    assert!(response.headers().get("x-apod-fallback").is_none());
    let body: Value = response.json();
    assert_eq!(body["media_type"], "other");
    assert_eq!(body["title"], "Solar System Explorer");
    assert!(body.get("url").is_none());
    assert!(body.get("source").is_none());
}

#[tokio::test]
async fn test_apod_retries_without_hd() {
    let app = setup_test_app().await;
    Mock::given(method("GET"))
        .and(path("/planetary/apod"))
        .and(query_param("hd", "true"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad"))
        .mount(&app.nasa)
        .await;
    Mock::given(method("GET"))
        .and(path("/planetary/apod"))
        .and(query_param("hd", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(apod_body("2024-01-06")))
        .expect(1)
        .mount(&app.nasa)
        .await;

    let response = app.client().get(&api_path("/apod")).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["date"], "2024-01-06");
}

#[tokio::test]
async fn test_apod_falls_back_to_image_library() {
    let app = setup_test_app().await;
    Mock::given(method("GET"))
        .and(path("/planetary/apod"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&app.nasa)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(&["PIA777"], 1)))
        .mount(&app.nasa)
        .await;
    let urls = vec![
        "https://x/PIA777/PIA777~large.jpg".to_string(),
        "https://x/PIA777/PIA777~orig.jpg".to_string(),
    ];
    Mock::given(method("GET"))
        .and(path("/asset/PIA777"))
        .respond_with(ResponseTemplate::new(200).set_body_json(manifest_body(&urls)))
        .mount(&app.nasa)
        .await;

    let response = app.client().get(&api_path("/apod")).await;

    response.assert_status_ok();
    assert_eq!(response.header("x-apod-fallback"), "1");
    let body: Value = response.json();
    assert_eq!(body["source"], "images-api");
    assert_eq!(body["nasa_id"], "PIA777");
    assert_eq!(body["media_type"], "image");
    assert_eq!(body["hdurl"], "https://x/PIA777/PIA777~orig.jpg");
    assert_eq!(body["url"], "https://images-assets.nasa.gov/image/PIA777/PIA777~thumb.jpg");
    assert_eq!(body["explanation"], "A picture");
}

#[tokio::test]
async fn test_apod_all_sources_failing() {
    let app = setup_test_app().await;
    Mock::given(method("GET"))
        .and(path("/planetary/apod"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&app.nasa)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(&[], 0)))
        .mount(&app.nasa)
        .await;

    let response = app.client().get(&api_path("/apod")).await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: Value = response.json();
    assert_eq!(body["error"], "Failed to fetch APOD (and fallback failed)");
    assert!(body["details"]["hd"].is_string());
    assert!(body["details"]["nonHd"].is_string());
    assert!(body["details"]["fallback"].is_string());
}

#[tokio::test]
async fn test_apod_rejects_malformed_date() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .get(&api_path("/apod"))
        .add_query_param("date", "05/01/2024")
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["error"], "Invalid date, expected YYYY-MM-DD");
}
