//! Apply compiled predicates to scene entities

use geochat_core::error::Result;
use geochat_core::models::TypeMapping;
use geochat_core::ports::{LoadOptions, SceneGraph};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::predicate::Predicate;

/// Visibility counts for one dataset URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlReport {
    pub url: String,
    pub data_type: String,
    pub visible_count: usize,
    pub hidden_count: usize,
}

/// A URL that was not filtered, and why
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedUrl {
    pub url: String,
    pub reason: String,
}

/// Outcome of one apply pass, in URL order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExecutionReport {
    pub results: Vec<UrlReport>,
    pub skipped: Vec<SkippedUrl>,
}

impl ExecutionReport {
    pub fn get(&self, url: &str) -> Option<&UrlReport> {
        self.results.iter().find(|r| r.url == url)
    }

    pub fn total_visible(&self) -> usize {
        self.results.iter().map(|r| r.visible_count).sum()
    }

    pub fn total_hidden(&self) -> usize {
        self.results.iter().map(|r| r.hidden_count).sum()
    }

    fn skip(&mut self, url: &str, reason: impl Into<String>) {
        self.skipped.push(SkippedUrl { url: url.to_string(), reason: reason.into() });
    }
}

/// Loads dataset URLs into the scene and sets entity visibility from predicates
pub struct FilterExecutionEngine {
    scene: Arc<dyn SceneGraph>,
}

impl FilterExecutionEngine {
    pub fn new(scene: Arc<dyn SceneGraph>) -> Self {
        Self { scene }
    }

    /// Filter each URL in turn.
    ///
    /// URLs missing from `mapping`, URLs whose type has no predicate and URLs
    /// that fail to load are logged and reported as skipped.
    pub async fn apply(
        &self,
        urls: &[String],
        predicates: &BTreeMap<String, Predicate>,
        mapping: &TypeMapping,
    ) -> ExecutionReport {
        let mut report = ExecutionReport::default();

        for url in urls {
            let Some(entry) = mapping.get(url) else {
                tracing::warn!(url = %url, "No type mapping for URL; skipping");
                report.skip(url, "unknown dataset URL");
                continue;
            };

            let Some(predicate) = predicates.get(&entry.data_type) else {
                tracing::warn!(url = %url, data_type = %entry.data_type, "No predicate for data type; skipping");
                report.skip(url, format!("no predicate for {}", entry.data_type));
                continue;
            };

            let options = LoadOptions { clamp_to_ground: entry.clamp_to_ground() };
            match self.filter_url(url, options, predicate).await {
                Ok((visible_count, hidden_count)) => {
                    tracing::info!(
                        url = %url,
                        data_type = %entry.data_type,
                        visible = visible_count,
                        hidden = hidden_count,
                        "Filter applied"
                    );
                    report.results.push(UrlReport {
                        url: url.clone(),
                        data_type: entry.data_type.clone(),
                        visible_count,
                        hidden_count,
                    });
                }
                Err(e) => {
                    tracing::error!(url = %url, error = %e, "Failed to apply filter");
                    report.skip(url, e.to_string());
                }
            }
        }

        report
    }

    async fn filter_url(
        &self,
        url: &str,
        options: LoadOptions,
        predicate: &Predicate,
    ) -> Result<(usize, usize)> {
        let handles = self.scene.load_features(url, options).await?;
        let mut visible = 0;

        for &handle in &handles {
            self.scene.reset_display_conditions(handle)?;
            let properties = self.scene.properties_of(handle)?;
            let keep = predicate.evaluate(&properties);
            self.scene.set_visible(handle, keep)?;
            if keep {
                visible += 1;
            }
        }

        Ok((visible, handles.len() - visible))
    }

    /// Show every entity of `urls`; used when filters are cleared
    pub async fn reset(&self, urls: &[String], mapping: &TypeMapping) -> ExecutionReport {
        let accept_all = Predicate::accept_all();
        let predicates: BTreeMap<String, Predicate> = urls
            .iter()
            .filter_map(|url| mapping.get(url))
            .map(|entry| (entry.data_type.clone(), accept_all.clone()))
            .collect();

        self.apply(urls, &predicates, mapping).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::compile;
    use geochat_core::models::{FieldDescriptor, FieldMap, FieldType, FilterCriteria};
    use geochat_store::MemoryScene;
    use serde_json::{json, Value};

    const PARK_URL: &str = "/data/geoJSON/Point/park.geojson";

    fn parks(specs: &[(&str, &str)]) -> Value {
        let features: Vec<Value> = specs
            .iter()
            .map(|(name, category)| {
                json!({
                    "type": "Feature",
                    "geometry": {"type": "Point", "coordinates": [140.1, 35.6]},
                    "properties": {"name": name, "category": category}
                })
            })
            .collect();
        json!({"type": "FeatureCollection", "features": features})
    }

    fn park_fields() -> FieldMap {
        let mut map = FieldMap::new();
        map.insert(
            "park",
            vec![
                FieldDescriptor::new("name", FieldType::String, None),
                FieldDescriptor::new(
                    "category",
                    FieldType::String,
                    Some(vec!["leisure".into(), "sports".into()]),
                ),
            ],
        );
        map
    }

    fn criteria(value: Value) -> FilterCriteria {
        serde_json::from_value(value).unwrap()
    }

    fn setup(document: Value) -> (Arc<MemoryScene>, FilterExecutionEngine) {
        let scene = Arc::new(MemoryScene::new());
        scene.insert_document(PARK_URL, document);
        let engine = FilterExecutionEngine::new(scene.clone());
        (scene, engine)
    }

    #[tokio::test]
    async fn test_only_matching_park_stays_visible() {
        let (scene, engine) = setup(parks(&[("Central Park", "leisure"), ("East Park", "sports")]));
        let predicates = compile(
            &criteria(json!({"park_name": "Central", "park_category": ["leisure"]})),
            &park_fields(),
        );

        let report =
            engine.apply(&[PARK_URL.to_string()], &predicates, &TypeMapping::default()).await;

        let park = report.get(PARK_URL).unwrap();
        assert_eq!((park.visible_count, park.hidden_count), (1, 1));

        let visible = scene.visible_features(PARK_URL);
        assert_eq!(visible["features"].as_array().unwrap().len(), 1);
        assert_eq!(visible["features"][0]["properties"]["name"], "Central Park");

        let handles = scene.handles_for(PARK_URL);
        assert!(scene.entity(handles[0]).unwrap().clamp_to_ground);
    }

    #[tokio::test]
    async fn test_counts_and_reshow_across_passes() {
        let (scene, engine) = setup(parks(&[
            ("Central Park", "leisure"),
            ("East Park", "sports"),
            ("West Park", "sports"),
            ("Lake Park", "leisure"),
        ]));
        let urls = vec![PARK_URL.to_string()];
        let mapping = TypeMapping::default();

        let leisure = compile(&criteria(json!({"park_category": ["leisure"]})), &park_fields());
        let first = engine.apply(&urls, &leisure, &mapping).await;
        assert_eq!(first.get(PARK_URL).unwrap().visible_count, 2);
        assert_eq!(first.get(PARK_URL).unwrap().hidden_count, 2);

        let sports = compile(&criteria(json!({"park_category": ["sports"]})), &park_fields());
        let second = engine.apply(&urls, &sports, &mapping).await;
        assert_eq!(second.get(PARK_URL).unwrap().visible_count, 2);

        let handles = scene.handles_for(PARK_URL);
        let shown: Vec<bool> = handles.iter().map(|h| scene.entity(*h).unwrap().show).collect();
        assert_eq!(shown, vec![false, true, true, false]);

        let cleared = engine.reset(&urls, &mapping).await;
        assert_eq!(cleared.total_visible(), 4);
        assert_eq!(cleared.total_hidden(), 0);
    }

    #[tokio::test]
    async fn test_partial_failures_do_not_abort_batch() {
        let (_scene, engine) = setup(parks(&[("Central Park", "leisure")]));
        let predicates = compile(&FilterCriteria::new(), &park_fields());

        let urls = vec![
            "/unmapped.geojson".to_string(),
            "/data/geoJSON/Point/station.geojson".to_string(),
            "/data/geoJSON/MultiLineString/railway.geojson".to_string(),
            PARK_URL.to_string(),
        ];
        let mut station_predicates = predicates.clone();
        station_predicates.insert("station".to_string(), Predicate::accept_all());

        let report = engine.apply(&urls, &station_predicates, &TypeMapping::default()).await;

        assert_eq!(report.results.len(), 1);
        assert_eq!(report.get(PARK_URL).unwrap().visible_count, 1);
        // unmapped, station (not loadable), railway (no predicate)
        assert_eq!(report.skipped.len(), 3);
        assert_eq!(report.skipped[0].url, "/unmapped.geojson");
    }

    #[tokio::test]
    async fn test_display_conditions_are_reset() {
        use geochat_store::scene::DistanceDisplayCondition;

        let (scene, engine) = setup(parks(&[("Central Park", "leisure")]));
        let urls = vec![PARK_URL.to_string()];
        let mapping = TypeMapping::default();
        engine.reset(&urls, &mapping).await;

        let handle = scene.handles_for(PARK_URL)[0];
        scene
            .set_distance_display_condition(handle, DistanceDisplayCondition { near: 0.0, far: 1000.0 })
            .unwrap();

        let predicates = compile(&FilterCriteria::new(), &park_fields());
        engine.apply(&urls, &predicates, &mapping).await;
        assert!(scene.entity(handle).unwrap().distance_display_condition.is_none());
    }
}
