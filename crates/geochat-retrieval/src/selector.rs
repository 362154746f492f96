//! LLM narrowing of keyword candidates

use geochat_core::models::{Dataset, Message};
use geochat_llm::{decode_json, ChatModel, ChatRequest, DecodeError};
use serde::Deserialize;
use std::sync::Arc;

use crate::candidates::CandidateIndex;
use crate::prompts;

#[derive(Debug, Deserialize)]
struct Selection {
    selected_data: Option<Vec<String>>,
}

/// Picks the datasets relevant to a query
pub struct DataSelector {
    model: Arc<dyn ChatModel>,
    index: CandidateIndex,
}

impl DataSelector {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model, index: CandidateIndex::new() }
    }

    /// Select datasets for `query` from `catalog`.
    ///
    /// No candidates means an empty result without calling the model. Once
    /// candidates exist the model can only narrow them: a reply naming none of
    /// them, an undecodable reply, or a failed call all yield every candidate.
    pub async fn select_relevant_data(&self, query: &str, catalog: &[Dataset]) -> Vec<Dataset> {
        if query.trim().is_empty() {
            return Vec::new();
        }

        let candidates = self.index.find_candidates(query, catalog);
        if candidates.is_empty() {
            tracing::info!(query, "No candidate datasets");
            return candidates;
        }

        let manifest = prompts::selection_manifest(&candidates);
        let request = ChatRequest::new(vec![
            Message::system(prompts::SELECTION_SYSTEM),
            Message::user(prompts::selection_prompt(&manifest, query)),
        ])
        .with_temperature(prompts::SELECTION_TEMPERATURE);

        let reply = match self.model.complete(&request).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(error = %e, "Data selection call failed; using all candidates");
                return candidates;
            }
        };

        let names = match decode_selection(&reply) {
            Ok(names) => names,
            Err(e) => {
                tracing::warn!(error = %e, raw = %reply, "Undecodable selection; using all candidates");
                return candidates;
            }
        };

        let selected: Vec<Dataset> = names
            .iter()
            .filter_map(|name| candidates.iter().find(|c| &c.name == name))
            .fold(Vec::new(), |mut acc, dataset| {
                if !acc.iter().any(|d: &Dataset| d.name == dataset.name) {
                    acc.push(dataset.clone());
                }
                acc
            });

        if selected.is_empty() {
            tracing::warn!(?names, "Selection matched no candidate; using all candidates");
            return candidates;
        }

        tracing::info!(
            candidates = candidates.len(),
            selected = selected.len(),
            "Datasets selected"
        );
        selected
    }
}

fn decode_selection(reply: &str) -> Result<Vec<String>, DecodeError> {
    let selection: Selection = decode_json(reply)?;
    selection.selected_data.ok_or_else(|| DecodeError::MissingField("selected_data".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{catalog, ScriptedChat};

    fn names(datasets: &[Dataset]) -> Vec<&str> {
        datasets.iter().map(|d| d.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_selects_named_candidates_in_reply_order() {
        let chat = Arc::new(ScriptedChat::replying(&[
            "Sure! {\"selected_data\": [\"station\", \"unknown\", \"park\", \"station\"]}",
        ]));
        let selector = DataSelector::new(chat.clone());

        let selected = selector.select_relevant_data("公園と駅", &catalog()).await;
        assert_eq!(names(&selected), vec!["station", "park"]);

        let request = chat.request(0);
        assert_eq!(request.temperature, Some(0.3));
        assert!(request.messages[1].content.contains("park (Point)"));
        assert!(request.messages[1].content.contains("User question: 公園と駅"));
    }

    #[tokio::test]
    async fn test_no_candidates_makes_no_call() {
        let chat = Arc::new(ScriptedChat::replying(&["{\"selected_data\": [\"park\"]}"]));
        let selector = DataSelector::new(chat.clone());

        assert!(selector.select_relevant_data("近くのカフェ", &catalog()).await.is_empty());
        assert!(selector.select_relevant_data("   ", &catalog()).await.is_empty());
        assert_eq!(chat.calls(), 0);
    }

    #[tokio::test]
    async fn test_unparseable_reply_keeps_all_candidates() {
        for reply in ["park and station", "{\"selected_data\": \"park\"", "{\"other\": 1}"] {
            let selector = DataSelector::new(Arc::new(ScriptedChat::replying(&[reply])));
            let selected = selector.select_relevant_data("駅 park", &catalog()).await;
            assert_eq!(names(&selected), vec!["park", "station"], "reply: {}", reply);
        }
    }

    #[tokio::test]
    async fn test_braces_after_selection_do_not_widen_it() {
        let selector = DataSelector::new(Arc::new(ScriptedChat::replying(&[
            "{\"selected_data\": [\"park\"]}\nNote: I skipped {station}.",
        ])));
        let selected = selector.select_relevant_data("駅 park", &catalog()).await;
        assert_eq!(names(&selected), vec!["park"]);
    }

    #[tokio::test]
    async fn test_empty_match_and_failure_keep_all_candidates() {
        let selector =
            DataSelector::new(Arc::new(ScriptedChat::replying(&["{\"selected_data\": []}"])));
        assert_eq!(selector.select_relevant_data("公園", &catalog()).await.len(), 1);

        let selector = DataSelector::new(Arc::new(ScriptedChat::failing()));
        let selected = selector.select_relevant_data("railway station", &catalog()).await;
        assert_eq!(names(&selected), vec!["station", "railway"]);
    }
}
