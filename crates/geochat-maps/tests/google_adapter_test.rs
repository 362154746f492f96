//! Exercises the Google Maps adapter against a local stub server

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use geochat_core::models::{ExternalQuery, ExternalQueryKind, ExternalQueryParams};
use geochat_core::ports::MapsProvider;
use geochat_core::GeochatError;
use geochat_maps::{GoogleMapsClient, PlaceSearch};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Params = HashMap<String, String>;

#[derive(Clone, Default)]
struct Recorded {
    calls: Arc<Mutex<Vec<(String, Params)>>>,
}

impl Recorded {
    fn push(&self, endpoint: &str, params: Params) {
        self.calls.lock().unwrap().push((endpoint.to_string(), params));
    }

    fn last(&self) -> (String, Params) {
        self.calls.lock().unwrap().last().cloned().unwrap()
    }
}

async fn places(State(recorded): State<Recorded>, Query(params): Query<Params>) -> Json<Value> {
    let denied = params.get("key").map(String::as_str) == Some("bad-key");
    recorded.push("places", params);

    if denied {
        return Json(json!({
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid.",
            "results": []
        }));
    }

    Json(json!({
        "status": "OK",
        "results": [{
            "name": "千葉公園",
            "place_id": "place-1",
            "rating": 4.1,
            "types": ["park"],
            "formatted_address": "千葉市中央区弁天3丁目",
            "geometry": {"location": {"lat": 35.622, "lng": 140.113}}
        }]
    }))
}

async fn geocode(State(recorded): State<Recorded>, Query(params): Query<Params>) -> Json<Value> {
    recorded.push("geocode", params);
    Json(json!({"status": "ZERO_RESULTS", "results": []}))
}

async fn directions(
    State(recorded): State<Recorded>,
    Query(params): Query<Params>,
) -> (StatusCode, Json<Value>) {
    recorded.push("directions", params);
    (
        StatusCode::OK,
        Json(json!({
            "status": "OK",
            "routes": [{
                "summary": "国道14号",
                "legs": [{
                    "start_address": "千葉駅",
                    "end_address": "幕張メッセ",
                    "steps": [{"polyline": {"points": "_p~iF~ps|U_ulLnnqC"}}]
                }]
            }]
        })),
    )
}

async fn spawn_stub() -> (String, Recorded) {
    let recorded = Recorded::default();
    let app = Router::new()
        .route("/place/textsearch/json", get(places))
        .route("/geocode/json", get(geocode))
        .route("/directions/json", get(directions))
        .with_state(recorded.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), recorded)
}

fn client(base_url: &str, key: &str) -> GoogleMapsClient {
    GoogleMapsClient::with_base_url(base_url, key, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_places_search() {
    let (base_url, recorded) = spawn_stub().await;
    let maps = client(&base_url, "maps-key");

    let mut search = PlaceSearch::new("千葉 公園");
    search.location = Some((35.6, 140.1));
    let collection = maps.search_places(&search).await.unwrap();

    assert_eq!(collection.features.len(), 1);
    let feature = serde_json::to_value(&collection.features[0]).unwrap();
    assert_eq!(feature["geometry"]["coordinates"], json!([140.113, 35.622]));
    assert_eq!(feature["properties"]["place_id"], "place-1");

    let (endpoint, params) = recorded.last();
    assert_eq!(endpoint, "places");
    assert_eq!(params["query"], "千葉 公園");
    assert_eq!(params["language"], "ja");
    assert_eq!(params["radius"], "5000");
    assert_eq!(params["location"], "35.6,140.1");
    assert_eq!(params["key"], "maps-key");
}

#[tokio::test]
async fn test_provider_dispatches_on_query_kind() {
    let (base_url, recorded) = spawn_stub().await;
    let maps = client(&base_url, "maps-key");

    let route = ExternalQuery {
        kind: ExternalQueryKind::Directions,
        query: "千葉駅から幕張メッセ".to_string(),
        params: ExternalQueryParams {
            origin: Some("千葉駅".to_string()),
            destination: Some("幕張メッセ".to_string()),
        },
    };
    let collection = maps.search(&route).await.unwrap();
    assert_eq!(collection.features.len(), 1);
    let (endpoint, params) = recorded.last();
    assert_eq!(endpoint, "directions");
    assert_eq!(params["origin"], "千葉駅");
    assert_eq!(params["mode"], "driving");

    let address = ExternalQuery {
        kind: ExternalQueryKind::Geocode,
        query: "千葉市中央区".to_string(),
        params: Default::default(),
    };
    let collection = maps.search(&address).await.unwrap();
    assert!(collection.features.is_empty());
    assert_eq!(recorded.last().0, "geocode");

    // directions without endpoints degrade to a text search
    let vague = ExternalQuery { params: Default::default(), ..route };
    maps.search(&vague).await.unwrap();
    let (endpoint, params) = recorded.last();
    assert_eq!(endpoint, "places");
    assert_eq!(params["query"], "千葉駅から幕張メッセ");
}

#[tokio::test]
async fn test_denied_status_is_maps_error() {
    let (base_url, _recorded) = spawn_stub().await;
    let maps = client(&base_url, "bad-key");

    let result = maps.search(&ExternalQuery::places("公園")).await;
    match result {
        Err(GeochatError::Maps { reason }) => assert!(reason.starts_with("REQUEST_DENIED")),
        other => panic!("expected maps error, got {:?}", other.map(|c| c.features.len())),
    }
}

#[tokio::test]
async fn test_unreachable_host_is_maps_error() {
    let maps = client("http://127.0.0.1:9", "maps-key");
    let result = maps.geocode("千葉市").await;
    assert!(matches!(result, Err(GeochatError::Maps { .. })));
}
