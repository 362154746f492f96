//! Config command implementation

use crate::output::OutputWriter;
use crate::output_types::{ConfigEntry, ConfigOutput};
use anyhow::Result;
use geochat_core::config::{Credentials, LayeredConfig};
use std::collections::BTreeMap;
use tabled::Tabled;

#[derive(Tabled)]
struct ConfigRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Source")]
    source: String,
}

pub fn execute(config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let values: BTreeMap<String, ConfigEntry> = config
        .to_inspection_map()
        .into_iter()
        .map(|(key, (value, source))| (key, ConfigEntry { value, source }))
        .collect();

    let credentials = Credentials::from_env();
    let credentials: BTreeMap<String, bool> = [
        ("llm_api_key".to_string(), credentials.llm_api_key.is_some()),
        ("maps_api_key".to_string(), credentials.maps_api_key.is_some()),
    ]
    .into_iter()
    .collect();

    output.section("Configuration");
    let rows: Vec<ConfigRow> = values
        .iter()
        .map(|(key, entry)| ConfigRow {
            key: key.clone(),
            value: entry.value.clone(),
            source: format!("{:?}", entry.source),
        })
        .collect();
    output.table(rows);

    output.section("Credentials");
    for (key, present) in &credentials {
        output.kv(key, if *present { "set" } else { "not set" });
    }

    output.result(ConfigOutput { values, credentials })
}
