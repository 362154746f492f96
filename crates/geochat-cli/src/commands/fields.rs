//! Fields command implementation

use crate::cli::FieldsArgs;
use crate::output::OutputWriter;
use crate::output_types::FieldsOutput;
use anyhow::Result;
use geochat_core::config::LayeredConfig;
use geochat_core::models::{FieldDescriptor, FieldKind};
use geochat_filter::SchemaRegistry;
use geochat_store::FileSchemaSource;
use std::sync::Arc;
use tabled::Tabled;

use super::load_mapping;

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "Type")]
    data_type: String,
    #[tabled(rename = "Field")]
    key: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Values")]
    values: String,
}

pub async fn execute(args: FieldsArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let mapping = Arc::new(load_mapping(config)?);
    let registry =
        SchemaRegistry::new(Arc::new(FileSchemaSource::new(&config.data_dir.value)), mapping);

    let fields = registry.load_fields_for_datasets(&args.types).await;

    for data_type in &args.types {
        if fields.fields_for(data_type).is_none() {
            output.warning(format!("No schema fields for '{}'", data_type));
        }
    }

    output.section("Filter Fields");
    let rows: Vec<FieldRow> = fields
        .iter()
        .flat_map(|(data_type, descriptors)| {
            descriptors.iter().map(move |field| field_row(data_type, field))
        })
        .collect();
    output.table(rows);

    output.result(FieldsOutput { types: args.types, fields })
}

fn field_row(data_type: &str, field: &FieldDescriptor) -> FieldRow {
    let (kind, values) = match &field.kind {
        FieldKind::Enum(values) => ("enum", values.join(", ")),
        FieldKind::Number => ("number", String::new()),
        FieldKind::Text => ("text", String::new()),
    };
    FieldRow {
        data_type: data_type.to_string(),
        key: field.key.clone(),
        kind: kind.to_string(),
        values,
    }
}
