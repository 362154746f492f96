//! Google Maps responses and their GeoJSON conversion

use geojson::{Feature, FeatureCollection, Geometry};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::polyline::decode_polyline;

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Deserialize)]
pub struct Located {
    pub location: LatLng,
}

/// Places text search reply
#[derive(Debug, Deserialize)]
pub struct PlacesResponse {
    pub status: String,
    pub error_message: Option<String>,
    #[serde(default)]
    pub results: Vec<Place>,
}

#[derive(Debug, Deserialize)]
pub struct Place {
    pub name: Option<String>,
    pub place_id: Option<String>,
    pub rating: Option<f64>,
    pub price_level: Option<u8>,
    #[serde(default)]
    pub types: Vec<String>,
    pub vicinity: Option<String>,
    pub formatted_address: Option<String>,
    pub geometry: Option<Located>,
}

/// Geocoding reply
#[derive(Debug, Deserialize)]
pub struct GeocodeResponse {
    pub status: String,
    pub error_message: Option<String>,
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodeResult {
    pub formatted_address: Option<String>,
    pub place_id: Option<String>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub address_components: Value,
    pub geometry: Option<Located>,
}

/// Directions reply
#[derive(Debug, Deserialize)]
pub struct DirectionsResponse {
    pub status: String,
    pub error_message: Option<String>,
    #[serde(default)]
    pub routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
pub struct Route {
    pub summary: Option<String>,
    #[serde(default)]
    pub legs: Vec<Leg>,
}

#[derive(Debug, Deserialize)]
pub struct Leg {
    pub distance: Option<Value>,
    pub duration: Option<Value>,
    pub start_address: Option<String>,
    pub end_address: Option<String>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
pub struct Step {
    pub polyline: Option<EncodedPolyline>,
}

#[derive(Debug, Deserialize)]
pub struct EncodedPolyline {
    pub points: String,
}

fn feature(geometry: Value, properties: Value) -> Option<Feature> {
    let geometry = Geometry::from_json_value(geometry).ok()?;
    Some(Feature {
        bbox: None,
        geometry: Some(geometry),
        id: None,
        properties: Some(properties.as_object().cloned().unwrap_or_else(Map::new)),
        foreign_members: None,
    })
}

fn collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection { bbox: None, features, foreign_members: None }
}

fn point(location: LatLng) -> Value {
    json!({"type": "Point", "coordinates": [location.lng, location.lat]})
}

/// One Point per place with a location
pub fn places_to_geojson(response: PlacesResponse) -> FeatureCollection {
    let features = response
        .results
        .into_iter()
        .filter_map(|place| {
            let location = place.geometry?.location;
            feature(
                point(location),
                json!({
                    "name": place.name,
                    "place_id": place.place_id,
                    "rating": place.rating,
                    "price_level": place.price_level,
                    "types": place.types,
                    "vicinity": place.vicinity,
                    "formatted_address": place.formatted_address,
                }),
            )
        })
        .collect();
    collection(features)
}

/// One Point per geocoding result
pub fn geocode_to_geojson(response: GeocodeResponse) -> FeatureCollection {
    let features = response
        .results
        .into_iter()
        .filter_map(|result| {
            let location = result.geometry?.location;
            feature(
                point(location),
                json!({
                    "formatted_address": result.formatted_address,
                    "place_id": result.place_id,
                    "types": result.types,
                    "address_components": result.address_components,
                }),
            )
        })
        .collect();
    collection(features)
}

/// One LineString per route, built from every step's polyline.
///
/// Routes whose steps decode to fewer than two positions are dropped.
pub fn directions_to_geojson(response: DirectionsResponse) -> FeatureCollection {
    let features = response
        .routes
        .into_iter()
        .enumerate()
        .filter_map(|(route_index, route)| {
            let coordinates = route_coordinates(&route);
            if coordinates.len() < 2 {
                tracing::debug!(route_index, "Route has no usable geometry");
                return None;
            }

            let legs: Vec<Value> = route
                .legs
                .iter()
                .map(|leg| {
                    json!({
                        "distance": leg.distance,
                        "duration": leg.duration,
                        "start_address": leg.start_address,
                        "end_address": leg.end_address,
                    })
                })
                .collect();

            feature(
                json!({"type": "LineString", "coordinates": coordinates}),
                json!({"route_index": route_index, "summary": route.summary, "legs": legs}),
            )
        })
        .collect();
    collection(features)
}

fn route_coordinates(route: &Route) -> Vec<[f64; 2]> {
    let mut coordinates = Vec::new();
    for step in route.legs.iter().flat_map(|leg| &leg.steps) {
        let Some(polyline) = &step.polyline else {
            continue;
        };
        match decode_polyline(&polyline.points) {
            Some(positions) => coordinates.extend(positions),
            None => tracing::warn!(points = %polyline.points, "Skipping undecodable step polyline"),
        }
    }
    coordinates
}
