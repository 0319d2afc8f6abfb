//! Canned NASA responses and source images.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([40, 90, 160])));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)
        .expect("encode fixture");
    out.into_inner()
}

pub fn search_item(nasa_id: &str, thumb: &str) -> Value {
    json!({
        "data": [{ "nasa_id": nasa_id, "title": format!("Title {}", nasa_id), "description": "A picture" }],
        "links": [{ "href": thumb }]
    })
}

pub fn search_body(ids: &[&str], total_hits: u64) -> Value {
    let items: Vec<Value> = ids
        .iter()
        .map(|id| search_item(id, &format!("https://images-assets.nasa.gov/image/{id}/{id}~thumb.jpg")))
        .collect();
    json!({ "collection": { "items": items, "metadata": { "total_hits": total_hits } } })
}

pub fn manifest_body(urls: &[String]) -> Value {
    let items: Vec<Value> = urls.iter().map(|u| json!({ "href": u })).collect();
    json!({ "collection": { "items": items } })
}

/// Mock `/asset/{nasa_id}` listing `files` served by the mock host itself,
/// each returning `bytes`.
pub async fn mount_asset(server: &MockServer, nasa_id: &str, files: &[&str], bytes: &[u8]) {
    let urls: Vec<String> = files
        .iter()
        .map(|f| format!("{}/files/{}", server.uri(), f))
        .collect();

    Mock::given(method("GET"))
        .and(path(format!("/asset/{}", nasa_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(manifest_body(&urls)))
        .mount(server)
        .await;

    for file in files {
        Mock::given(method("GET"))
            .and(path(format!("/files/{}", file)))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "image/png")
                    .set_body_bytes(bytes.to_vec()),
            )
            .mount(server)
            .await;
    }
}

pub async fn mount_search_by_id(server: &MockServer, nasa_id: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("nasa_id", nasa_id))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}
