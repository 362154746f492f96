use async_trait::async_trait;
use geojson::FeatureCollection;

use crate::error::Result;
use crate::models::ExternalQuery;

/// Port for an external places / geocoding / directions provider
#[async_trait]
pub trait MapsProvider: Send + Sync {
    /// Run the query and return its results as GeoJSON
    async fn search(&self, query: &ExternalQuery) -> Result<FeatureCollection>;

    /// Provider identifier
    fn provider_name(&self) -> &str;
}
