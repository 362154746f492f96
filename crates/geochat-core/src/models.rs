pub mod criteria;
pub mod dataset;
pub mod mapping;
pub mod message;
pub mod routing;
pub mod schema;

pub use criteria::{CriterionValue, FilterCriteria, PropertyBag};
pub use dataset::{CatalogStats, DataType, Dataset, PropertySummary, SchemaSummary};
pub use mapping::{TypeMapping, TypeMappingEntry};
pub use message::{Message, Role};
pub use routing::{ExternalQuery, ExternalQueryKind, ExternalQueryParams, RoutingDecision};
pub use schema::{FieldDescriptor, FieldKind, FieldMap, FieldType};
