//! Grounded response generation

use geochat_core::error::Result;
use geochat_core::models::{Dataset, ExternalQuery, Message, Role};
use geochat_llm::{ChatModel, ChatRequest};
use geochat_store::CatalogStore;
use std::sync::Arc;

use crate::prompts;

/// Reply used when neither datasets nor an external search back the turn
pub const NO_DATA_APOLOGY: &str = "申し訳ございません。該当するPLATEAUデータが見つかりませんでした。マップに表示されたGoogle Mapsの検索結果をご覧ください。";

/// Builds the answer for a conversation from the selected datasets
pub struct ChatOrchestrator {
    model: Arc<dyn ChatModel>,
    catalog: Arc<dyn CatalogStore>,
}

impl ChatOrchestrator {
    pub fn new(model: Arc<dyn ChatModel>, catalog: Arc<dyn CatalogStore>) -> Self {
        Self { model, catalog }
    }

    /// Answer the last turn of `conversation`.
    ///
    /// Selected datasets ground the answer; without them an external query
    /// explains the map results instead. With neither, a fixed apology is
    /// returned and the model is not called.
    pub async fn respond(
        &self,
        conversation: &[Message],
        selected: &[Dataset],
        external_query: Option<&ExternalQuery>,
    ) -> Result<String> {
        let context = if !selected.is_empty() {
            let stats = self.catalog.stats().await?;
            prompts::data_context(selected, &stats)
        } else if let Some(query) = external_query {
            prompts::external_maps_context(query)
        } else {
            tracing::info!("No data and no external query; replying with apology");
            return Ok(NO_DATA_APOLOGY.to_string());
        };

        let messages = with_system_prompt(conversation, &prompts::chat_system_prompt(&context));
        let reply = self.model.complete(&ChatRequest::new(messages)).await?;

        tracing::info!(
            model = self.model.model_name(),
            selected = selected.len(),
            external = external_query.is_some(),
            "Response generated"
        );
        Ok(reply)
    }
}

/// Prepend `system_prompt` unless the conversation already carries a system message
fn with_system_prompt(conversation: &[Message], system_prompt: &str) -> Vec<Message> {
    if conversation.iter().any(|m| m.role == Role::System) {
        return conversation.to_vec();
    }

    let mut messages = Vec::with_capacity(conversation.len() + 1);
    messages.push(Message::system(system_prompt));
    messages.extend_from_slice(conversation);
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{catalog, park, ScriptedChat};
    use geochat_core::models::ExternalQueryKind;
    use geochat_core::GeochatError;
    use geochat_store::MemoryCatalogStore;

    fn orchestrator(chat: &Arc<ScriptedChat>) -> ChatOrchestrator {
        ChatOrchestrator::new(chat.clone(), Arc::new(MemoryCatalogStore::with_datasets(catalog())))
    }

    #[tokio::test]
    async fn test_selected_data_grounds_answer() {
        let chat = Arc::new(ScriptedChat::replying(&["千葉公園は中央区にあります。"]));
        let conversation = vec![Message::user("千葉公園はどこ")];

        let reply = orchestrator(&chat).respond(&conversation, &[park()], None).await.unwrap();
        assert_eq!(reply, "千葉公園は中央区にあります。");

        let request = chat.request(0);
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, Role::System);
        assert!(request.messages[0].content.starts_with(prompts::CHAT_SYSTEM));
        assert!(request.messages[0].content.contains("【Point】\n  - park\n"));
        assert!(request.messages[0].content.contains("  - datasets: 4\n"));
    }

    #[tokio::test]
    async fn test_existing_system_message_is_kept() {
        let chat = Arc::new(ScriptedChat::replying(&["ok"]));
        let conversation = vec![Message::system("custom"), Message::user("公園")];

        orchestrator(&chat).respond(&conversation, &[park()], None).await.unwrap();
        assert_eq!(chat.request(0).messages, conversation);
    }

    #[tokio::test]
    async fn test_external_query_context() {
        let chat = Arc::new(ScriptedChat::replying(&["カフェの検索結果を表示しています。"]));
        let query = ExternalQuery {
            kind: ExternalQueryKind::Places,
            query: "カフェ".to_string(),
            params: Default::default(),
        };

        orchestrator(&chat)
            .respond(&[Message::user("近くのカフェ")], &[], Some(&query))
            .await
            .unwrap();
        assert!(chat.request(0).messages[0].content.contains("Search: カフェ"));
    }

    #[tokio::test]
    async fn test_apology_without_model_call() {
        let chat = Arc::new(ScriptedChat::replying(&["unused"]));
        let reply = orchestrator(&chat).respond(&[Message::user("?")], &[], None).await.unwrap();
        assert_eq!(reply, NO_DATA_APOLOGY);
        assert_eq!(chat.calls(), 0);
    }

    #[tokio::test]
    async fn test_transport_failure_is_llm_error() {
        let chat = Arc::new(ScriptedChat::failing());
        let result = orchestrator(&chat).respond(&[Message::user("公園")], &[park()], None).await;
        assert!(matches!(result, Err(GeochatError::Llm { .. })));
    }
}
