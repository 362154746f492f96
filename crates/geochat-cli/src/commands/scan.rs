//! Scan command implementation

use crate::cli::ScanArgs;
use crate::output::OutputWriter;
use crate::output_types::ScanOutput;
use anyhow::{Context, Result};
use geochat_core::config::LayeredConfig;
use geochat_core::models::{CatalogStats, DataType};
use geochat_core::processing::scan_catalog;
use tabled::Tabled;

#[derive(Tabled)]
struct DatasetRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    data_type: String,
    #[tabled(rename = "Features")]
    feature_count: usize,
    #[tabled(rename = "Properties")]
    property_count: usize,
    #[tabled(rename = "URL")]
    url: String,
}

pub fn execute(args: ScanArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let data_dir = &config.data_dir.value;
    let data_type = args.data_type.as_deref().map(str::parse::<DataType>).transpose()?;

    let datasets: Vec<_> = scan_catalog(data_dir)
        .with_context(|| format!("Failed to scan {}", data_dir.display()))?
        .into_iter()
        .filter(|d| data_type.map_or(true, |t| d.data_type == t))
        .collect();
    let stats = CatalogStats::from_datasets(&datasets);

    output.section("Dataset Catalog");
    output.kv("Data directory", data_dir.display());

    let rows: Vec<DatasetRow> = datasets
        .iter()
        .map(|d| DatasetRow {
            name: d.name.clone(),
            data_type: d.data_type.display_name().to_string(),
            feature_count: d.feature_count(),
            property_count: d.schema_summary.properties.len(),
            url: d.url(),
        })
        .collect();
    output.table(rows);

    output.kv("Total", stats.total);
    for (data_type, count) in &stats.by_type {
        output.kv(data_type.display_name(), count);
    }

    output.result(ScanOutput { data_dir: data_dir.display().to_string(), datasets, stats })
}
