use geochat_core::config::{Credentials, LayeredConfig};
use geochat_core::error::Result;
use geochat_core::ports::MapsProvider;
use std::sync::Arc;
use std::time::Duration;

use crate::google::GoogleMapsClient;

/// Build the maps provider; fails when `GOOGLE_MAPS_API_KEY` is not set
pub fn create_maps_provider(
    config: &LayeredConfig,
    credentials: &Credentials,
) -> Result<Arc<dyn MapsProvider>> {
    let api_key = credentials.require_maps_key()?;
    let timeout = Duration::from_secs(config.request_timeout_secs.value);
    Ok(Arc::new(GoogleMapsClient::new(api_key, timeout)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_maps_key() {
        let config = LayeredConfig::with_defaults();
        let result = create_maps_provider(&config, &Credentials::default());
        assert!(result.err().is_some_and(|e| e.is_configuration()));

        let credentials = Credentials { llm_api_key: None, maps_api_key: Some("maps-key".into()) };
        let provider = create_maps_provider(&config, &credentials).unwrap();
        assert_eq!(provider.provider_name(), "google");
    }
}
