mod catalog;
mod chatbot;
mod filters;
mod health;
mod maps;

pub use catalog::{catalog_statistics, list_datasets, rescan_catalog, show_dataset};
pub use chatbot::{generate_response, select_data};
pub use filters::{apply_filters, clear_filters, filter_fields};
pub use health::health_check;
pub use maps::maps_search;
