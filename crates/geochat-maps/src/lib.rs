//! GeoChat Maps - External places, geocoding and directions
//!
//! Adapter for the Google Maps web services. Every lookup is converted to a
//! GeoJSON `FeatureCollection` so results can be drawn beside the internal
//! datasets.

pub mod convert;
pub mod factory;
pub mod google;
pub mod polyline;

pub use factory::create_maps_provider;
pub use google::{GoogleMapsClient, PlaceSearch};
pub use polyline::decode_polyline;
