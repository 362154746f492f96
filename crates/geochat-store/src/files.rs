use async_trait::async_trait;
use geochat_core::error::{GeochatError, Result};
use geochat_core::ports::SchemaSource;
use std::path::{Component, Path, PathBuf};

/// Map a served URL such as `/data/geoJSON/Point/park.geojson` to a file
/// below `root`. URLs that would escape `root` are rejected.
pub fn resolve_data_path(root: &Path, url: &str) -> Option<PathBuf> {
    let relative = Path::new(url.trim_start_matches('/'));
    if relative.as_os_str().is_empty()
        || relative.components().any(|c| !matches!(c, Component::Normal(_)))
    {
        return None;
    }
    Some(root.join(relative))
}

/// Reads schema documents from the data directory
#[derive(Debug, Clone)]
pub struct FileSchemaSource {
    root: PathBuf,
}

impl FileSchemaSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl SchemaSource for FileSchemaSource {
    async fn fetch_schema(&self, path: &str) -> Result<serde_json::Value> {
        let file = resolve_data_path(&self.root, path).ok_or_else(|| {
            GeochatError::SchemaUnavailable {
                path: path.to_string(),
                reason: "path is outside the data directory".to_string(),
            }
        })?;

        let content = tokio::fs::read_to_string(&file).await.map_err(|e| {
            GeochatError::SchemaUnavailable { path: path.to_string(), reason: e.to_string() }
        })?;

        serde_json::from_str(&content).map_err(|e| GeochatError::SchemaUnavailable {
            path: path.to_string(),
            reason: format!("invalid JSON: {}", e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_data_path() {
        let root = Path::new("/srv/public");
        assert_eq!(
            resolve_data_path(root, "/data/geoJSON/Point/park.geojson").unwrap(),
            PathBuf::from("/srv/public/data/geoJSON/Point/park.geojson")
        );
        assert!(resolve_data_path(root, "/data/../../etc/passwd").is_none());
        assert!(resolve_data_path(root, "/").is_none());
    }

    #[tokio::test]
    async fn test_fetch_schema() {
        let dir = TempDir::new().unwrap();
        let schema_dir = dir.path().join("data/geoJSON/Point/schema");
        std::fs::create_dir_all(&schema_dir).unwrap();
        std::fs::write(schema_dir.join("park.schema.geojson"), r#"{"definitions": {}}"#).unwrap();
        std::fs::write(schema_dir.join("bad.schema.geojson"), "{").unwrap();

        let source = FileSchemaSource::new(dir.path());
        let schema =
            source.fetch_schema("/data/geoJSON/Point/schema/park.schema.geojson").await.unwrap();
        assert!(schema.get("definitions").is_some());

        let missing = source.fetch_schema("/data/geoJSON/Point/schema/none.schema.geojson").await;
        assert!(matches!(missing, Err(GeochatError::SchemaUnavailable { .. })));

        let bad = source.fetch_schema("/data/geoJSON/Point/schema/bad.schema.geojson").await;
        assert!(matches!(bad, Err(GeochatError::SchemaUnavailable { .. })));
    }
}
