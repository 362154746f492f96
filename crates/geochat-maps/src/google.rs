//! Google Maps web services adapter

use async_trait::async_trait;
use geochat_core::error::{GeochatError, Result};
use geochat_core::models::{ExternalQuery, ExternalQueryKind};
use geochat_core::ports::MapsProvider;
use geojson::FeatureCollection;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::convert::{
    directions_to_geojson, geocode_to_geojson, places_to_geojson, DirectionsResponse,
    GeocodeResponse, PlacesResponse,
};

pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api";

/// Search radius used when none is given, in meters
pub const DEFAULT_RADIUS_METERS: u32 = 5000;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const LANGUAGE: &str = "ja";

/// Parameters of a Places text search
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceSearch {
    pub query: String,
    /// Bias point as `(lat, lng)`
    pub location: Option<(f64, f64)>,
    pub radius: Option<u32>,
    /// Google place type such as `park` or `train_station`
    pub place_type: Option<String>,
}

impl PlaceSearch {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            location: None,
            radius: Some(DEFAULT_RADIUS_METERS),
            place_type: None,
        }
    }
}

/// Client for the Places, Geocoding and Directions APIs
pub struct GoogleMapsClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl GoogleMapsClient {
    pub fn new(api_key: impl Into<String>, request_timeout: Duration) -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL, api_key, request_timeout)
    }

    /// Client against another host serving the same API, e.g. a test stub
    pub fn with_base_url(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        request_timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(request_timeout)
            .build()
            .map_err(|e| GeochatError::Maps {
                reason: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        })
    }

    /// Text search for places, one Point feature per result
    pub async fn search_places(&self, search: &PlaceSearch) -> Result<FeatureCollection> {
        let mut params = vec![("query", require_text("query", &search.query)?)];
        if let Some((lat, lng)) = search.location {
            params.push(("location", format!("{},{}", lat, lng)));
        }
        if let Some(radius) = search.radius {
            params.push(("radius", radius.to_string()));
        }
        if let Some(place_type) = &search.place_type {
            params.push(("type", place_type.clone()));
        }

        let response: PlacesResponse = self.get("/place/textsearch/json", params).await?;
        check_status(&response.status, response.error_message.as_deref())?;
        Ok(places_to_geojson(response))
    }

    /// Resolve an address to Point features
    pub async fn geocode(&self, address: &str) -> Result<FeatureCollection> {
        let params = vec![("address", require_text("address", address)?)];

        let response: GeocodeResponse = self.get("/geocode/json", params).await?;
        check_status(&response.status, response.error_message.as_deref())?;
        Ok(geocode_to_geojson(response))
    }

    /// Driving routes between two places, one LineString per route
    pub async fn directions(
        &self,
        origin: &str,
        destination: &str,
        alternatives: bool,
    ) -> Result<FeatureCollection> {
        let params = vec![
            ("origin", require_text("origin", origin)?),
            ("destination", require_text("destination", destination)?),
            ("mode", "driving".to_string()),
            ("alternatives", alternatives.to_string()),
        ];

        let response: DirectionsResponse = self.get("/directions/json", params).await?;
        check_status(&response.status, response.error_message.as_deref())?;
        Ok(directions_to_geojson(response))
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        mut params: Vec<(&str, String)>,
    ) -> Result<T> {
        params.push(("language", LANGUAGE.to_string()));
        params.push(("key", self.api_key.clone()));

        let url = reqwest::Url::parse_with_params(&format!("{}{}", self.base_url, endpoint), &params)
            .map_err(|e| GeochatError::Maps { reason: format!("Invalid request URL: {}", e) })?;

        tracing::debug!(endpoint, "Calling Google Maps");

        let response = self.client.get(url).send().await.map_err(|e| GeochatError::Maps {
            reason: format!("Failed to reach {}: {}", self.base_url, e),
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(GeochatError::Maps {
                reason: format!("Google Maps API error ({}): {}", status, error_text),
            });
        }

        response.json().await.map_err(|e| GeochatError::Maps {
            reason: format!("Failed to parse Google Maps response: {}", e),
        })
    }
}

fn require_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(GeochatError::Maps { reason: format!("{} must not be empty", field) });
    }
    Ok(trimmed.to_string())
}

fn check_status(status: &str, error_message: Option<&str>) -> Result<()> {
    match status {
        "OK" | "ZERO_RESULTS" => Ok(()),
        other => Err(GeochatError::Maps {
            reason: match error_message {
                Some(message) => format!("{}: {}", other, message),
                None => other.to_string(),
            },
        }),
    }
}

#[async_trait]
impl MapsProvider for GoogleMapsClient {
    async fn search(&self, query: &ExternalQuery) -> Result<FeatureCollection> {
        let collection = match query.kind {
            ExternalQueryKind::Places => self.search_places(&PlaceSearch::new(&query.query)).await?,
            ExternalQueryKind::Geocode => self.geocode(&query.query).await?,
            ExternalQueryKind::Directions => {
                match (query.params.origin.as_deref(), query.params.destination.as_deref()) {
                    (Some(origin), Some(destination)) => {
                        self.directions(origin, destination, false).await?
                    }
                    _ => {
                        tracing::warn!(
                            query = %query.query,
                            "Directions query without origin and destination; searching places"
                        );
                        self.search_places(&PlaceSearch::new(&query.query)).await?
                    }
                }
            }
        };

        tracing::info!(
            kind = %query.kind,
            query = %query.query,
            features = collection.features.len(),
            "Google Maps search complete"
        );
        Ok(collection)
    }

    fn provider_name(&self) -> &str {
        "google"
    }
}
