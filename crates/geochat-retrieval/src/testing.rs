//! Shared fixtures for unit tests

use async_trait::async_trait;
use chrono::Utc;
use geochat_core::error::{GeochatError, Result};
use geochat_core::models::{DataType, Dataset, PropertySummary, SchemaSummary};
use geochat_llm::{ChatModel, ChatRequest};
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Mutex;

pub fn dataset(name: &str, data_type: DataType, visible: bool) -> Dataset {
    Dataset {
        name: name.to_string(),
        data_type,
        file_path: format!("data/geoJSON/{}/{}.geojson", data_type, name),
        visible,
        display_order: data_type.display_order(),
        schema_summary: SchemaSummary::default(),
        scanned_at: Utc::now(),
    }
}

pub fn park() -> Dataset {
    let mut park = dataset("park", DataType::Point, true);
    park.schema_summary.feature_count = 12;
    park.schema_summary.properties.insert(
        "parkName".to_string(),
        PropertySummary {
            value_type: "string".to_string(),
            description: "公園名".to_string(),
            samples: vec![json!("千葉公園"), json!("稲毛海浜公園")],
            enum_values: None,
        },
    );
    park
}

pub fn catalog() -> Vec<Dataset> {
    vec![
        park(),
        dataset("shelter", DataType::Point, true),
        dataset("station", DataType::Point, true),
        dataset("railway", DataType::MultiLineString, true),
    ]
}

/// Chat model replaying scripted replies and recording every request
#[derive(Default)]
pub struct ScriptedChat {
    replies: Mutex<VecDeque<Result<String>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedChat {
    pub fn new(replies: Vec<Result<String>>) -> Self {
        Self { replies: Mutex::new(replies.into()), requests: Mutex::default() }
    }

    pub fn replying(replies: &[&str]) -> Self {
        Self::new(replies.iter().map(|r| Ok(r.to_string())).collect())
    }

    pub fn failing() -> Self {
        Self::new(vec![Err(GeochatError::Llm { reason: "connection refused".to_string() })])
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn request(&self, index: usize) -> ChatRequest {
        self.requests.lock().unwrap()[index].clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedChat {
    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GeochatError::Llm { reason: "no scripted reply".to_string() }))
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}
