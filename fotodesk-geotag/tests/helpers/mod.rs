//! Shared test helpers: a local fake geocoding endpoint and image fixtures
#![allow(dead_code)]

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Running fake geocoder instance
pub struct FakeGeocoder {
    pub base_url: String,
    /// Number of /search requests served so far
    pub hits: Arc<AtomicUsize>,
}

struct ServerState {
    places: HashMap<String, (f64, f64)>,
    fail_first: bool,
    hits: Arc<AtomicUsize>,
}

/// Spawn a Nominatim-shaped search endpoint on an ephemeral port
///
/// Known locations answer `[{lat, lon}]` as numeric strings; unknown ones
/// answer an empty array. With `fail_first` the very first request answers
/// empty regardless, to exercise per-item error isolation deterministically.
pub async fn spawn_fake_geocoder(
    places: HashMap<String, (f64, f64)>,
    fail_first: bool,
) -> FakeGeocoder {
    let hits = Arc::new(AtomicUsize::new(0));
    let state = Arc::new(ServerState {
        places,
        fail_first,
        hits: Arc::clone(&hits),
    });

    let app = Router::new().route("/search", get(search)).with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake geocoder");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve fake geocoder");
    });

    FakeGeocoder {
        base_url: format!("http://{}", addr),
        hits,
    }
}

async fn search(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let hit = state.hits.fetch_add(1, Ordering::SeqCst);
    if state.fail_first && hit == 0 {
        return Json(json!([]));
    }

    let q = params.get("q").cloned().unwrap_or_default();
    match state.places.get(&q) {
        Some((lat, lon)) => Json(json!([{
            "lat": lat.to_string(),
            "lon": lon.to_string(),
        }])),
        None => Json(json!([])),
    }
}

/// Write a small real JPEG at `path`
pub fn write_jpeg(path: &Path) {
    let img = image::RgbImage::from_pixel(8, 8, image::Rgb([200, 120, 40]));
    image::DynamicImage::ImageRgb8(img)
        .save_with_format(path, image::ImageFormat::Jpeg)
        .expect("write jpeg fixture");
}

/// Write a small real PNG at `path`
pub fn write_png(path: &Path) {
    let img = image::RgbImage::from_pixel(8, 8, image::Rgb([20, 80, 160]));
    image::DynamicImage::ImageRgb8(img)
        .save_with_format(path, image::ImageFormat::Png)
        .expect("write png fixture");
}
