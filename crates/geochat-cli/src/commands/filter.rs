//! Filter command implementation

use crate::cli::FilterArgs;
use crate::output::OutputWriter;
use crate::output_types::FilterOutput;
use anyhow::{Context, Result};
use geochat_core::config::LayeredConfig;
use geochat_core::models::FilterCriteria;
use geochat_filter::{FilterService, FilterSession};
use geochat_store::{FileSchemaSource, MemoryScene};
use std::collections::BTreeMap;
use std::fs;
use std::sync::Arc;
use tabled::Tabled;

use super::load_mapping;

#[derive(Tabled)]
struct ReportRow {
    #[tabled(rename = "URL")]
    url: String,
    #[tabled(rename = "Type")]
    data_type: String,
    #[tabled(rename = "Visible")]
    visible: usize,
    #[tabled(rename = "Hidden")]
    hidden: usize,
}

pub async fn execute(args: FilterArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let criteria = read_criteria(&args)?;
    let data_dir = &config.data_dir.value;

    let scene = Arc::new(MemoryScene::with_root(data_dir));
    let service = FilterService::new(
        Arc::new(FileSchemaSource::new(data_dir)),
        scene.clone(),
        Arc::new(load_mapping(config)?),
    );

    let mut session = FilterSession::new();
    service.load(&mut session, args.urls).await;
    if session.field_map.is_empty() && !args.clear {
        output.warning("No filter fields were loaded; every feature stays visible");
    }

    let report = if args.clear {
        service.clear(&mut session).await
    } else {
        service.apply(&mut session, criteria).await
    };

    output.section(if args.clear { "Filters Cleared" } else { "Filter Results" });
    let rows: Vec<ReportRow> = report
        .results
        .iter()
        .map(|r| ReportRow {
            url: r.url.clone(),
            data_type: r.data_type.clone(),
            visible: r.visible_count,
            hidden: r.hidden_count,
        })
        .collect();
    output.table(rows);

    for skipped in &report.skipped {
        output.warning(format!("Skipped {}: {}", skipped.url, skipped.reason));
    }
    output.kv("Visible", report.total_visible());
    output.kv("Hidden", report.total_hidden());

    let features: BTreeMap<_, _> = report
        .results
        .iter()
        .map(|r| (r.url.clone(), scene.visible_features(&r.url)))
        .collect();
    output.result(FilterOutput { cleared: args.clear, report, features })
}

fn read_criteria(args: &FilterArgs) -> Result<FilterCriteria> {
    let raw = match (&args.criteria, &args.criteria_file) {
        (Some(inline), _) => inline.clone(),
        (None, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read criteria file {}", path.display()))?,
        (None, None) => return Ok(FilterCriteria::new()),
    };
    serde_json::from_str(&raw).context("Criteria must be a JSON object of field criteria")
}
