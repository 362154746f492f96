//! The two chat operations over a shared catalog

use geochat_core::error::Result;
use geochat_core::models::{Dataset, ExternalQuery, Message, RoutingDecision};
use geochat_llm::ChatModel;
use geochat_store::CatalogStore;
use serde::Serialize;
use std::sync::Arc;

use crate::chat::ChatOrchestrator;
use crate::routing::{LlmRoutingPolicy, RoutingDecisionEngine, RoutingPolicy};
use crate::selector::DataSelector;

/// Result of the data-selection step of a turn
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionOutcome {
    pub selected: Vec<Dataset>,
    pub decision: RoutingDecision,
}

pub struct ChatPipeline {
    catalog: Arc<dyn CatalogStore>,
    selector: DataSelector,
    routing: RoutingDecisionEngine,
    orchestrator: ChatOrchestrator,
}

impl ChatPipeline {
    /// Pipeline using `model` for selection, routing and answers
    pub fn new(model: Arc<dyn ChatModel>, catalog: Arc<dyn CatalogStore>) -> Self {
        let policy = Arc::new(LlmRoutingPolicy::new(model.clone()));
        Self::with_policy(model, catalog, policy)
    }

    pub fn with_policy(
        model: Arc<dyn ChatModel>,
        catalog: Arc<dyn CatalogStore>,
        policy: Arc<dyn RoutingPolicy>,
    ) -> Self {
        Self {
            selector: DataSelector::new(model.clone()),
            routing: RoutingDecisionEngine::new(policy),
            orchestrator: ChatOrchestrator::new(model, catalog.clone()),
            catalog,
        }
    }

    /// Select datasets for `query` and decide how the turn is routed
    pub async fn select_data(&self, query: &str) -> Result<SelectionOutcome> {
        let catalog = self.catalog.list_datasets().await?;
        let selected = self.selector.select_relevant_data(query, &catalog).await;
        let decision = self.routing.decide(query, &selected).await;

        tracing::info!(
            query,
            selected = selected.len(),
            display = decision.should_display_on_map,
            external = decision.should_use_external_maps,
            "Data selection complete"
        );
        Ok(SelectionOutcome { selected, decision })
    }

    /// Answer `conversation` from the datasets named in `selected_names`.
    ///
    /// Names missing from the catalog are dropped.
    pub async fn generate_response(
        &self,
        conversation: &[Message],
        selected_names: &[String],
        external_query: Option<&ExternalQuery>,
    ) -> Result<String> {
        let mut selected = Vec::with_capacity(selected_names.len());
        for name in selected_names {
            match self.catalog.get_dataset(name).await? {
                Some(dataset) => selected.push(dataset),
                None => tracing::warn!(name = %name, "Selected dataset not in catalog; dropping"),
            }
        }

        self.orchestrator.respond(conversation, &selected, external_query).await
    }
}
