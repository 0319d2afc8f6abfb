use serde_json::json;
use voidview_core::config::UpstreamConfig;
use voidview_core::models::AssetKind;
use voidview_nasa::NasaClient;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> NasaClient {
    let config = UpstreamConfig {
        images_api_url: server.uri(),
        apod_url: format!("{}/planetary/apod", server.uri()),
        nasa_api_key: "TEST_KEY".to_string(),
        timeout_secs: 2,
        max_retries: 2,
        backoff_ms: 1,
        download_timeout_secs: 2,
    };
    NasaClient::new(&config, 64 * 1024).expect("client")
}

fn search_body(ids: &[&str]) -> serde_json::Value {
    let items: Vec<_> = ids
        .iter()
        .map(|id| {
            json!({
                "data": [{ "nasa_id": id, "title": format!("Title {}", id) }],
                "links": [{ "href": format!("https://images-assets.nasa.gov/image/{id}/{id}~thumb.jpg") }]
            })
        })
        .collect();
    json!({ "collection": { "items": items, "metadata": { "total_hits": ids.len() } } })
}

#[tokio::test]
async fn test_search_sends_query_and_media_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "earth from space"))
        .and(query_param("media_type", "image"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(&["A", "B"])))
        .expect(1)
        .mount(&server)
        .await;

    let collection = client_for(&server).search("earth from space", 3).await.unwrap();
    assert_eq!(collection.gallery_items().len(), 2);
    assert_eq!(collection.total_hits(), Some(2));
}

#[tokio::test]
async fn test_retries_retryable_status_then_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(&["A"])))
        .expect(1)
        .mount(&server)
        .await;

    let collection = client_for(&server).search("nebula", 1).await.unwrap();
    assert_eq!(collection.items.len(), 1);
}

#[tokio::test]
async fn test_non_retryable_status_fails_immediately() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/asset/PIA404"))
        .respond_with(ResponseTemplate::new(404).set_body_string("No assets"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server).asset_manifest("PIA404").await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.to_string(), "HTTP 404 :: No assets");
}

#[tokio::test]
async fn test_exhausted_retries_return_last_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(429))
        .expect(3)
        .mount(&server)
        .await;

    let err = client_for(&server).search("mars", 1).await.unwrap_err();
    assert_eq!(err.status(), Some(429));
}

#[tokio::test]
async fn test_malformed_json_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server).search("mars", 1).await.unwrap_err();
    assert!(matches!(err, voidview_nasa::NasaError::Decode(_)));
}

#[tokio::test]
async fn test_resolve_best_asset_prefers_manifest_variant() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/asset/PIA1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "collection": { "items": [
                { "href": "https://x/PIA1~orig.tif" },
                { "href": "https://x/PIA1~orig.jpg" },
                { "href": "https://x/PIA1~large.jpg" },
                { "href": "https://x/metadata.json" }
            ] }
        })))
        .mount(&server)
        .await;

    let pick = client_for(&server).resolve_best_asset("PIA1").await.unwrap();
    assert_eq!(pick.url, "https://x/PIA1~large.jpg");
    assert_eq!(pick.kind, AssetKind::Jpg);
}

#[tokio::test]
async fn test_resolve_best_asset_falls_back_to_thumbnail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/asset/PIA2"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("nasa_id", "PIA2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(&["PIA2"])))
        .mount(&server)
        .await;

    let pick = client_for(&server).resolve_best_asset("PIA2").await.unwrap();
    assert_eq!(pick.kind, AssetKind::ThumbFallback);
    assert!(pick.url.ends_with("PIA2~thumb.jpg"));
}

#[tokio::test]
async fn test_resolve_best_asset_none_when_nothing_usable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/asset/PIA3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "collection": { "items": ["https://x/PIA3.mp4"] }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(&[])))
        .mount(&server)
        .await;

    assert!(client_for(&server).resolve_best_asset("PIA3").await.is_none());
}

#[tokio::test]
async fn test_apod_uses_hd_first() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/planetary/apod"))
        .and(query_param("hd", "true"))
        .and(query_param("api_key", "TEST_KEY"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "date": "2024-05-01",
            "explanation": "Pillars.",
            "hdurl": "https://apod.nasa.gov/hd.jpg",
            "media_type": "image",
            "title": "Pillars of Creation",
            "url": "https://apod.nasa.gov/sd.jpg"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client_for(&server)
        .apod_with_fallback(Some("2024-05-01"))
        .await
        .unwrap();
    assert!(!outcome.fallback);
    assert_eq!(outcome.apod.title.as_deref(), Some("Pillars of Creation"));
}

#[tokio::test]
async fn test_apod_falls_back_to_images_api() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/planetary/apod"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(&["PIA9"])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/asset/PIA9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "collection": { "items": [
                { "href": "https://x/PIA9~large.jpg" },
                { "href": "https://x/PIA9~orig.jpg" }
            ] }
        })))
        .mount(&server)
        .await;

    let outcome = client_for(&server).apod_with_fallback(None).await.unwrap();
    assert!(outcome.fallback);
    assert_eq!(outcome.apod.nasa_id.as_deref(), Some("PIA9"));
    assert_eq!(outcome.apod.hdurl.as_deref(), Some("https://x/PIA9~orig.jpg"));
    assert_eq!(outcome.apod.explanation.as_deref(), Some("From NASA Image Library."));
    assert_eq!(outcome.apod.date.len(), 10);
}

#[tokio::test]
async fn test_apod_reports_every_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/planetary/apod"))
        .respond_with(ResponseTemplate::new(403).set_body_string("bad key"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(&[])))
        .mount(&server)
        .await;

    let failure = client_for(&server).apod_with_fallback(None).await.unwrap_err();
    assert_eq!(failure.hd, "HTTP 403 :: bad key");
    assert_eq!(failure.non_hd, "HTTP 403 :: bad key");
    assert!(failure.fallback.contains("no usable items"));
}

#[tokio::test]
async fn test_download_enforces_byte_cap() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/big.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 128 * 1024]))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/small.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![7u8; 1024]))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .download(&format!("{}/big.jpg", server.uri()))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("exceeds"));

    let bytes = client
        .download(&format!("{}/small.jpg", server.uri()))
        .await
        .unwrap();
    assert_eq!(bytes.len(), 1024);
}

#[tokio::test]
async fn test_read_header_stops_once_probe_answers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/img.bin"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8; 4096]))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let found = client
        .read_header(&format!("{}/img.bin", server.uri()), |bytes| {
            (bytes.len() >= 16).then_some(bytes.len())
        })
        .await
        .unwrap();
    assert!(found.is_some());

    let none: Option<()> = client
        .read_header(&format!("{}/img.bin", server.uri()), |_| None)
        .await
        .unwrap();
    assert!(none.is_none());
}

#[tokio::test]
async fn test_print_source_candidates_orders_orig_first() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/asset/PIA4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "collection": { "items": [
                "https://x/PIA4~thumb.jpg",
                "https://x/PIA4~large.jpg",
                "https://x/PIA4~orig.tif",
                "https://x/PIA4.json"
            ] }
        })))
        .mount(&server)
        .await;

    let urls = client_for(&server).print_source_candidates("PIA4").await;
    assert_eq!(
        urls,
        vec![
            "https://x/PIA4~orig.tif".to_string(),
            "https://x/PIA4~large.jpg".to_string(),
            "https://x/PIA4~thumb.jpg".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_print_source_candidates_use_thumbnail_when_manifest_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/asset/PIA5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "collection": { "items": [] }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("nasa_id", "PIA5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(&["PIA5"])))
        .mount(&server)
        .await;

    let urls = client_for(&server).print_source_candidates("PIA5").await;
    assert_eq!(urls.len(), 1);
    assert!(urls[0].ends_with("PIA5~thumb.jpg"));
}
