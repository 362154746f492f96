//! Prompt text for every LLM step of a chat turn

use geochat_core::models::{CatalogStats, DataType, Dataset, ExternalQuery};
use std::fmt::Write;

pub const SELECTION_TEMPERATURE: f32 = 0.3;
pub const CLASSIFIER_TEMPERATURE: f32 = 0.1;
pub const QUERY_TEMPERATURE: f32 = 0.3;

pub const SELECTION_SYSTEM: &str = "\
You are an assistant analysing the geospatial datasets of Chiba City.
Choose the datasets that are relevant to the user's question, using the
listed properties and sample values to judge relevance.";

pub const MAP_DISPLAY_SYSTEM: &str = "\
You are an assistant working with the geospatial datasets of Chiba City.
Decide whether answering the user's question calls for showing geospatial data on a map.

Answer true for:
- questions about concrete places such as parks, stations, shelters or landmarks
- questions asking where something is or for its location
- requests to see something on a map
- questions about sightseeing spots, routes or paths
- questions about buildings, roads, railways or other geographic data

Answer false for:
- questions about how to use the system or its features
- statistics or dataset counts
- questions about filters and other functions
- general requests for explanations

Reply with the single word true or false and nothing else.";

pub const EXTERNAL_MAPS_SYSTEM: &str = "\
You are an assistant working with the geospatial datasets of Chiba City.
Decide whether answering the user's question needs Google Maps (place search,
route search or address lookup) in addition to the city's own datasets.

Answer true for:
- searches for specific businesses such as shops, restaurants, cafes, hotels or convenience stores
- route or directions requests between two places
- questions that need an address converted to coordinates
- searches for sightseeing spots or event venues
- questions asking where a specifically named place is

Answer false for:
- questions the city's datasets can answer (parks, stations, shelters and similar)
- questions about data the city manages (buildings, roads, railways)
- statistics or dataset counts
- questions about how to use the system
- abstract questions that name no specific facility

Reply with the single word true or false and nothing else.";

pub const QUERY_SYSTEM: &str = "\
You are an assistant working with the geospatial datasets of Chiba City.
Turn the user's question into a Google Maps request and return it as JSON:
{\"type\": \"places\" | \"geocode\" | \"directions\", \"query\": \"search text or address\",
 \"params\": {\"origin\": \"start (directions only)\", \"destination\": \"goal (directions only)\"}}

- Facility or shop names (cafe, restaurant, convenience store, park): type \"places\"
- Addresses or place names to locate (Chiba Station, Makuhari Messe): type \"geocode\"
- Routes or how to get from one place to another: type \"directions\"

Keep only the essential keywords of the question. Handle questions about Chiba City only.";

pub const CHAT_SYSTEM: &str = "\
You are an assistant analysing the geospatial datasets of Chiba City.
Answer the user's question from the data described below.

Data types:
- Point: point data (parks, stations, ...)
- MultiLineString: line data (roads, railways, ...)
- 3DTiles: 3D building models
- OSM: OSM building data

Answer concisely in Japanese.";

/// One manifest block per candidate: name, type and its described properties
pub fn selection_manifest(candidates: &[Dataset]) -> String {
    candidates
        .iter()
        .map(|dataset| {
            let mut block = format!("{} ({})", dataset.name, dataset.data_type);
            let properties = &dataset.schema_summary.properties;
            if !properties.is_empty() {
                block.push_str("\n  properties:");
                for (key, info) in properties {
                    let description = if info.description.is_empty() { key } else { &info.description };
                    let _ = write!(block, "\n  - {} ({})", description, info.value_type);
                    if !info.samples.is_empty() {
                        let _ = write!(block, " e.g. {}", join_samples(&info.samples));
                    }
                }
            }
            block
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn selection_prompt(manifest: &str, query: &str) -> String {
    format!(
        "Available datasets:\n{manifest}\n\nUser question: {query}\n\n\
         Choose the datasets relevant to this question.\n\
         Reply in JSON: {{\"selected_data\": [\"name1\", \"name2\"]}}\n\
         Return dataset names only."
    )
}

pub fn map_display_prompt(query: &str) -> String {
    format!(
        "User question: {query}\n\n\
         Does answering this question need geospatial data shown on a map?\n\
         Reply with true or false only."
    )
}

pub fn external_maps_prompt(query: &str) -> String {
    format!(
        "User question: {query}\n\n\
         Does answering this question need Google Maps (Places, Directions, Geocoding)?\n\
         Reply with true or false only."
    )
}

pub fn query_prompt(query: &str) -> String {
    format!("User question: {query}\n\nReturn the Google Maps request for this question as JSON.")
}

/// Description of the selected datasets, grouped by data type
pub fn data_context(selected: &[Dataset], stats: &CatalogStats) -> String {
    let mut context = String::from("Selected datasets:\n");

    for data_type in DataType::ALL {
        let group: Vec<&Dataset> = selected.iter().filter(|d| d.data_type == data_type).collect();
        if group.is_empty() {
            continue;
        }

        let _ = writeln!(context, "\n【{}】", data_type);
        for dataset in group {
            let _ = writeln!(context, "  - {}", dataset.name);
            let _ = writeln!(context, "    features: {}", dataset.feature_count());
            for (key, info) in &dataset.schema_summary.properties {
                let description = if info.description.is_empty() { key } else { &info.description };
                let _ = writeln!(context, "    + {} ({})", description, info.value_type);
                if !info.samples.is_empty() {
                    let _ = writeln!(context, "      e.g. {}", join_samples(&info.samples));
                }
            }
        }
    }

    let _ = write!(
        context,
        "\n\nOverall:\n  - datasets: {}\n  - visible datasets: {}\n  - selected datasets: {}\n",
        stats.total,
        stats.visible,
        selected.len()
    );
    context
}

/// Context for a turn answered by an external maps search
pub fn external_maps_context(query: &ExternalQuery) -> String {
    format!(
        "No PLATEAU dataset matched the user's question.\n\
         Instead a Google Maps {kind} search is shown on the map.\n\n\
         Search: {text}\n\n\
         When answering:\n\
         1. Address what the user actually wants to know\n\
         2. Tell the user the Google Maps results are shown on the map\n\
         3. Do not apologise; describe the situation naturally\n\
         4. Where useful, explain how to read or use the results\n\n\
         Answer briefly and kindly in Japanese.",
        kind = query.kind,
        text = query.query,
    )
}

/// Base prompt with `context` appended under an "additional information" heading
pub fn chat_system_prompt(context: &str) -> String {
    format!("{CHAT_SYSTEM}\n\nAdditional information:\n{context}")
}

fn join_samples(samples: &[serde_json::Value]) -> String {
    samples
        .iter()
        .map(|v| match v {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}
