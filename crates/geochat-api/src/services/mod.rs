pub mod catalog;
pub mod filters;

pub use catalog::CatalogService;
pub use filters::FilterRunService;
