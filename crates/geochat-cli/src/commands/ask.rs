//! Ask command implementation

use crate::cli::AskArgs;
use crate::output::OutputWriter;
use crate::output_types::AskOutput;
use anyhow::{Context, Result};
use geochat_core::config::{Credentials, LayeredConfig};
use geochat_core::models::{ExternalQuery, Message};
use geochat_core::processing::scan_catalog;
use geochat_llm::create_chat_model;
use geochat_maps::create_maps_provider;
use geochat_retrieval::ChatPipeline;
use geochat_store::MemoryCatalogStore;
use serde_json::Value;
use std::sync::Arc;

pub async fn execute(args: AskArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let credentials = Credentials::from_env();
    let model = create_chat_model(config, &credentials).context("Chat model is not available")?;

    let datasets = scan_catalog(&config.data_dir.value)
        .with_context(|| format!("Failed to scan {}", config.data_dir.value.display()))?;
    let pipeline = ChatPipeline::new(model, Arc::new(MemoryCatalogStore::with_datasets(datasets)));

    let outcome = pipeline.select_data(&args.question).await?;
    let selected: Vec<String> = outcome.selected.iter().map(|d| d.name.clone()).collect();
    let decision = outcome.decision;

    output.section("Data Selection");
    output.kv("Question", &args.question);
    output.kv("Selected", if selected.is_empty() { "(none)".to_string() } else { selected.join(", ") });
    output.kv("Display on map", decision.should_display_on_map);
    output.kv("Use Google Maps", decision.should_use_external_maps);
    if let Some(query) = &decision.external_query {
        output.kv("Maps query", format!("{} \"{}\"", query.kind, query.query));
    }

    let maps_results = match (&decision.external_query, args.maps) {
        (Some(query), true) => Some(search_maps(query, config, &credentials, output).await?),
        _ => None,
    };

    let answer = if args.no_answer {
        None
    } else {
        let conversation = [Message::user(args.question.clone())];
        let answer = pipeline
            .generate_response(&conversation, &selected, decision.external_query.as_ref())
            .await?;
        output.section("Answer");
        output.text(&answer);
        Some(answer)
    };

    output.result(AskOutput {
        question: args.question,
        selected_data: selected,
        should_display_on_map: decision.should_display_on_map,
        should_use_google_maps: decision.should_use_external_maps,
        google_maps_query: decision.external_query,
        answer,
        maps_results,
    })
}

async fn search_maps(
    query: &ExternalQuery,
    config: &LayeredConfig,
    credentials: &Credentials,
    output: &OutputWriter,
) -> Result<Value> {
    let provider = create_maps_provider(config, credentials).context("Maps provider is not available")?;
    let collection = provider.search(query).await?;

    output.section("Maps Results");
    output.kv("Provider", provider.provider_name());
    output.kv("Features", collection.features.len());
    for feature in &collection.features {
        let name = feature
            .property("name")
            .and_then(Value::as_str)
            .unwrap_or("(unnamed)");
        output.text(format!("  - {}", name));
    }

    Ok(serde_json::to_value(&collection)?)
}
