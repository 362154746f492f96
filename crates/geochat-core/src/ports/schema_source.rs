use async_trait::async_trait;

use crate::error::Result;

/// Fetches JSON schema documents by the path recorded in the type mapping
#[async_trait]
pub trait SchemaSource: Send + Sync {
    async fn fetch_schema(&self, path: &str) -> Result<serde_json::Value>;
}
