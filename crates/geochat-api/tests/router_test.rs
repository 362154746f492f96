//! Router tests over a temporary data directory and a scripted chat model

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use geochat_api::{create_router, AppState};
use geochat_core::error::{GeochatError, Result};
use geochat_core::models::{ExternalQuery, TypeMapping};
use geochat_core::ports::MapsProvider;
use geochat_core::processing::scan_catalog;
use geochat_llm::{ChatModel, ChatRequest};
use geochat_store::MemoryCatalogStore;
use geojson::{Feature, FeatureCollection, Geometry};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::fs;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tower::ServiceExt;

struct Script {
    replies: Mutex<VecDeque<String>>,
}

impl Script {
    fn new(replies: &[&str]) -> Arc<dyn ChatModel> {
        Arc::new(Self { replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()) })
    }
}

#[async_trait]
impl ChatModel for Script {
    async fn complete(&self, _request: &ChatRequest) -> Result<String> {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| GeochatError::Llm { reason: "script exhausted".to_string() })
    }

    fn model_name(&self) -> &str {
        "script"
    }
}

struct OnePlace;

#[async_trait]
impl MapsProvider for OnePlace {
    async fn search(&self, query: &ExternalQuery) -> Result<FeatureCollection> {
        let geometry = Geometry::from_json_value(json!({"type": "Point", "coordinates": [140.11, 35.61]}))
            .map_err(|e| GeochatError::Maps { reason: e.to_string() })?;
        let mut feature = Feature::from(geometry);
        feature.set_property("name", query.query.clone());
        Ok(FeatureCollection { bbox: None, features: vec![feature], foreign_members: None })
    }

    fn provider_name(&self) -> &str {
        "stub"
    }
}

fn data_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    let point = dir.path().join("data/geoJSON/Point");
    fs::create_dir_all(point.join("schema")).unwrap();

    let parks = json!({
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [140.1146, 35.6186]},
                "properties": {"name": "千葉公園", "parkType": "総合公園"}
            },
            {
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [140.0617, 35.6219]},
                "properties": {"name": "稲毛海浜公園", "parkType": "広域公園"}
            }
        ]
    });
    fs::write(point.join("park.geojson"), parks.to_string()).unwrap();

    let schema = json!({"definitions": {
        "Properties": {"properties": {
            "name": {"type": "string"},
            "parkType": {"$ref": "#/definitions/ParkType"}
        }},
        "ParkType": {"enum": ["総合公園", "広域公園"]}
    }});
    fs::write(point.join("schema/park.schema.geojson"), schema.to_string()).unwrap();
    dir
}

fn app(dir: &TempDir, chat: Option<Arc<dyn ChatModel>>, maps: Option<Arc<dyn MapsProvider>>) -> Router {
    let datasets = scan_catalog(dir.path()).unwrap();
    let state = AppState::new(
        dir.path().to_path_buf(),
        Arc::new(MemoryCatalogStore::with_datasets(datasets)),
        Arc::new(TypeMapping::default()),
        chat,
        maps,
    );
    create_router(Arc::new(state))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let dir = data_dir();
    let (status, body) = send(&app(&dir, None, None), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_chat_endpoints_require_llm_key() {
    let dir = data_dir();
    let app = app(&dir, None, None);

    let (status, body) = send(&app, post("/api/chatbot/select_data", json!({"user_query": "公園"}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    let (status, _) = send(
        &app,
        post("/api/chatbot/generate_response", json!({"messages": [{"role": "user", "content": "hi"}]})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_select_data_for_park_question() {
    let dir = data_dir();
    let app = app(&dir, Some(Script::new(&[r#"{"selected_data": ["park"]}"#, "true", "false"])), None);

    let (status, body) =
        send(&app, post("/api/chatbot/select_data", json!({"user_query": "千葉公園はどこ"}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["selected_data"][0]["name"], "park");
    assert_eq!(body["selected_data"][0]["data_type"], "Point");
    assert_eq!(body["selected_data"][0]["schema_summary"]["feature_count"], 2);
    assert_eq!(body["should_display_on_map"], true);
    assert_eq!(body["should_use_google_maps"], false);
    assert!(body["google_maps_query"].is_null());
}

#[tokio::test]
async fn test_select_data_rejects_blank_query() {
    let dir = data_dir();
    let app = app(&dir, Some(Script::new(&[])), None);

    let (status, body) = send(&app, post("/api/chatbot/select_data", json!({"user_query": "  "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "user_query is required");
}

#[tokio::test]
async fn test_generate_response() {
    let dir = data_dir();
    let app = app(&dir, Some(Script::new(&["千葉公園は中央区にあります。"])), None);

    let (status, body) = send(
        &app,
        post(
            "/api/chatbot/generate_response",
            json!({
                "messages": [{"role": "user", "content": "千葉公園はどこ"}],
                "selected_data": [{"name": "park"}],
                "google_maps_query": null
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "千葉公園は中央区にあります。");

    let (status, _) = send(
        &app,
        post("/api/chatbot/generate_response", json!({"messages": [{"role": "robot", "content": "x"}]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_generate_response_llm_failure_is_unavailable() {
    let dir = data_dir();
    let app = app(&dir, Some(Script::new(&[])), None);

    let (status, body) = send(
        &app,
        post(
            "/api/chatbot/generate_response",
            json!({"messages": [{"role": "user", "content": "公園"}], "selected_data": [{"name": "park"}]}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_catalog_listing_and_detail() {
    let dir = data_dir();
    let app = app(&dir, None, None);

    let (status, body) = send(&app, get("/api/geo_json_data?data_type=Point")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["url"], "/data/geoJSON/Point/park.geojson");

    let (status, body) = send(&app, get("/api/geo_json_data?data_type=MultiLineString")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 0);

    let (status, _) = send(&app, get("/api/geo_json_data?data_type=Polygon")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, get("/api/geo_json_data/park")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["statistics"]["total_features"], 2);
    assert_eq!(body["geojson_content"]["type"], "FeatureCollection");

    let (status, _) = send(&app, get("/api/geo_json_data/missing")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, get("/api/geo_json_data/statistics")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["overall"]["total"], 1);
    assert_eq!(body["by_data_type"][0]["value"], "Point");
    assert_eq!(body["by_data_type"][0]["visible"], 1);
}

#[tokio::test]
async fn test_rescan_picks_up_new_files() {
    let dir = data_dir();
    let app = app(&dir, None, None);

    let line = dir.path().join("data/geoJSON/MultiLineString");
    fs::create_dir_all(&line).unwrap();
    let railway = json!({"type": "FeatureCollection", "features": [{
        "type": "Feature",
        "geometry": {"type": "MultiLineString", "coordinates": [[[140.1, 35.6], [140.2, 35.7]]]},
        "properties": {"railwayLineName": "総武線"}
    }]});
    fs::write(line.join("railway.geojson"), railway.to_string()).unwrap();

    let (status, body) = send(&app, post("/api/geo_json_data/rescan", json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);

    let (_, body) = send(&app, get("/api/geo_json_data")).await;
    assert_eq!(body["data"][1]["name"], "railway");
}

#[tokio::test]
async fn test_rescan_refreshes_filtered_features() {
    let dir = data_dir();
    let app = app(&dir, None, None);
    let park = "/data/geoJSON/Point/park.geojson";
    let apply = || post("/api/filters/apply", json!({"urls": [park], "criteria": {}}));

    let (_, body) = send(&app, apply()).await;
    assert_eq!(body["report"]["results"][0]["visible_count"], 2);

    let path = dir.path().join("data/geoJSON/Point/park.geojson");
    let mut parks: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let extra = json!({
        "type": "Feature",
        "geometry": {"type": "Point", "coordinates": [140.0986, 35.6497]},
        "properties": {"name": "昭和の森", "parkType": "総合公園"}
    });
    parks["features"].as_array_mut().unwrap().push(extra);
    fs::write(&path, parks.to_string()).unwrap();

    let (_, body) = send(&app, apply()).await;
    assert_eq!(body["report"]["results"][0]["visible_count"], 2);

    let (status, _) = send(&app, post("/api/geo_json_data/rescan", json!({}))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, apply()).await;
    assert_eq!(body["report"]["results"][0]["visible_count"], 3);
    assert_eq!(body["features"][park]["features"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_filter_fields_apply_and_clear() {
    let dir = data_dir();
    let app = app(&dir, None, None);
    let park = "/data/geoJSON/Point/park.geojson";

    let (status, body) = send(&app, get("/api/filters/fields?types=park")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fields"]["park"].as_array().unwrap().len(), 2);

    let (status, _) = send(&app, get("/api/filters/fields")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        post("/api/filters/apply", json!({"urls": [park], "criteria": {"park_parkType": ["広域公園"]}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["report"]["results"][0]["visible_count"], 1);
    assert_eq!(body["report"]["results"][0]["hidden_count"], 1);
    let features = body["features"][park]["features"].as_array().unwrap();
    assert_eq!(features.len(), 1);
    assert_eq!(features[0]["properties"]["name"], "稲毛海浜公園");

    let (status, body) = send(&app, post("/api/filters/clear", json!({"urls": [park]}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["report"]["results"][0]["visible_count"], 2);
    assert_eq!(body["features"][park]["features"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_maps_search() {
    let dir = data_dir();

    let (status, _) = send(
        &app(&dir, None, None),
        post("/api/google_maps/search", json!({"type": "places", "query": "カフェ"})),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let app = app(&dir, None, Some(Arc::new(OnePlace)));
    let (status, body) =
        send(&app, post("/api/google_maps/search", json!({"type": "places", "query": "カフェ"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["metadata"]["provider"], "stub");
    assert_eq!(body["metadata"]["feature_count"], 1);
    assert_eq!(body["geojson"]["features"][0]["properties"]["name"], "カフェ");

    let (status, _) =
        send(&app, post("/api/google_maps/search", json!({"type": "places", "query": " "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
