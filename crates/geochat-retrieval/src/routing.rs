//! Routing of a chat turn between internal datasets and external maps

use async_trait::async_trait;
use geochat_core::models::{Dataset, ExternalQuery, Message, RoutingDecision};
use geochat_llm::{decode_bool, decode_json, ChatModel, ChatRequest};
use std::sync::Arc;

use crate::prompts;

/// Outcome of one yes/no routing question
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The classifier answered
    Decided(bool),
    /// The classifier could not be used; the answer defaults to `false`
    Defaulted { reason: String },
}

impl Verdict {
    pub fn value(&self) -> bool {
        match self {
            Verdict::Decided(value) => *value,
            Verdict::Defaulted { .. } => false,
        }
    }
}

/// Port for the routing questions asked about a query
#[async_trait]
pub trait RoutingPolicy: Send + Sync {
    /// Should the answer be visualised on a map
    async fn should_display_on_map(&self, query: &str) -> Verdict;

    /// Should the external maps provider be consulted
    async fn should_use_external_maps(&self, query: &str) -> Verdict;

    /// Build the external maps request for `query`, if one can be produced
    async fn generate_external_query(&self, query: &str) -> Option<ExternalQuery>;
}

/// [`RoutingPolicy`] backed by a chat model
pub struct LlmRoutingPolicy {
    model: Arc<dyn ChatModel>,
}

impl LlmRoutingPolicy {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    async fn classify(&self, question: &str, system: &str, prompt: String) -> Verdict {
        let request = ChatRequest::new(vec![Message::system(system), Message::user(prompt)])
            .with_temperature(prompts::CLASSIFIER_TEMPERATURE);

        let reply = match self.model.complete(&request).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(question, error = %e, "Classifier call failed; defaulting to false");
                return Verdict::Defaulted { reason: e.to_string() };
            }
        };

        match decode_bool(&reply) {
            Ok(value) => {
                tracing::info!(question, value, "Classifier verdict");
                Verdict::Decided(value)
            }
            Err(e) => {
                tracing::warn!(question, raw = %reply, "Unexpected classifier reply; defaulting to false");
                Verdict::Defaulted { reason: e.to_string() }
            }
        }
    }
}

#[async_trait]
impl RoutingPolicy for LlmRoutingPolicy {
    async fn should_display_on_map(&self, query: &str) -> Verdict {
        if query.trim().is_empty() {
            return Verdict::Defaulted { reason: "empty query".to_string() };
        }
        self.classify("map_display", prompts::MAP_DISPLAY_SYSTEM, prompts::map_display_prompt(query))
            .await
    }

    async fn should_use_external_maps(&self, query: &str) -> Verdict {
        if query.trim().is_empty() {
            return Verdict::Defaulted { reason: "empty query".to_string() };
        }
        self.classify(
            "external_maps",
            prompts::EXTERNAL_MAPS_SYSTEM,
            prompts::external_maps_prompt(query),
        )
        .await
    }

    async fn generate_external_query(&self, query: &str) -> Option<ExternalQuery> {
        if query.trim().is_empty() {
            return None;
        }

        let request = ChatRequest::new(vec![
            Message::system(prompts::QUERY_SYSTEM),
            Message::user(prompts::query_prompt(query)),
        ])
        .with_temperature(prompts::QUERY_TEMPERATURE)
        .json();

        let reply = match self.model.complete(&request).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(error = %e, "External query generation failed");
                return None;
            }
        };

        match decode_json::<ExternalQuery>(&reply) {
            Ok(external) if !external.query.trim().is_empty() => {
                tracing::info!(kind = %external.kind, query = %external.query, "External query generated");
                Some(external)
            }
            Ok(_) => {
                tracing::warn!(raw = %reply, "External query is blank");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, raw = %reply, "Undecodable external query");
                None
            }
        }
    }
}

/// Chooses between the no-data branch and the classified branch
pub struct RoutingDecisionEngine {
    policy: Arc<dyn RoutingPolicy>,
}

impl RoutingDecisionEngine {
    pub fn new(policy: Arc<dyn RoutingPolicy>) -> Self {
        Self { policy }
    }

    /// Route `query` given the datasets selected for it.
    ///
    /// With nothing selected the turn always goes to the external provider
    /// and only the query generator is consulted. Otherwise both classifiers
    /// run in order and a query is generated only if external maps are wanted.
    pub async fn decide(&self, query: &str, selected: &[Dataset]) -> RoutingDecision {
        if selected.is_empty() {
            let external_query = self.policy.generate_external_query(query).await;
            return RoutingDecision {
                should_display_on_map: true,
                should_use_external_maps: true,
                external_query,
            };
        }

        let map_verdict = self.policy.should_display_on_map(query).await;
        let external_verdict = self.policy.should_use_external_maps(query).await;
        let external_query = if external_verdict.value() {
            self.policy.generate_external_query(query).await
        } else {
            None
        };

        tracing::debug!(?map_verdict, ?external_verdict, "Routing verdicts");
        RoutingDecision {
            should_display_on_map: map_verdict.value(),
            should_use_external_maps: external_verdict.value(),
            external_query,
        }
    }
}
