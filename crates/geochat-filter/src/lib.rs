//! GeoChat Filter - Schema-driven attribute filtering
//!
//! Loads field descriptors from dataset schemas, compiles filter criteria
//! into per-type predicates, and applies them to scene entities by
//! toggling their visibility.

pub mod engine;
pub mod predicate;
pub mod schema;
pub mod session;

pub use engine::{ExecutionReport, FilterExecutionEngine, UrlReport};
pub use predicate::{compile, Predicate};
pub use schema::{extract_fields, SchemaRegistry};
pub use session::{FilterService, FilterSession};
