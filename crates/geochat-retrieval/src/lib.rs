//! GeoChat Retrieval - Data selection, routing and grounded answers
//!
//! One chat turn runs strictly in sequence: keyword candidates from the
//! catalog, an LLM narrowing step, the routing decision, and finally the
//! grounded response.

pub mod candidates;
pub mod chat;
pub mod pipeline;
pub mod prompts;
pub mod routing;
pub mod selector;

pub use candidates::{CandidateIndex, KeywordHit};
pub use chat::{ChatOrchestrator, NO_DATA_APOLOGY};
pub use pipeline::{ChatPipeline, SelectionOutcome};
pub use routing::{LlmRoutingPolicy, RoutingDecisionEngine, RoutingPolicy, Verdict};
pub use selector::DataSelector;

#[cfg(test)]
pub(crate) mod testing;
