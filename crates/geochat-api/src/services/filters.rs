use geochat_core::models::FilterCriteria;
use geochat_filter::{ExecutionReport, FilterSession};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::state::AppState;

/// Runs filter passes against the shared scene.
///
/// Each request gets a fresh [`FilterSession`]; the scene keeps entity
/// visibility between requests, so passes are serialized on the state's
/// filter lock.
pub struct FilterRunService;

impl FilterRunService {
    pub async fn apply(
        state: &AppState,
        urls: Vec<String>,
        criteria: FilterCriteria,
    ) -> (ExecutionReport, BTreeMap<String, Value>) {
        let _guard = state.filter_lock.lock().await;

        let mut session = FilterSession::new();
        state.filters.load(&mut session, urls).await;
        let report = state.filters.apply(&mut session, criteria).await;

        let features = Self::visible_features(state, &report);
        (report, features)
    }

    pub async fn clear(state: &AppState, urls: Vec<String>) -> (ExecutionReport, BTreeMap<String, Value>) {
        let _guard = state.filter_lock.lock().await;

        let mut session = FilterSession::new();
        state.filters.load(&mut session, urls).await;
        let report = state.filters.clear(&mut session).await;

        let features = Self::visible_features(state, &report);
        (report, features)
    }

    fn visible_features(state: &AppState, report: &ExecutionReport) -> BTreeMap<String, Value> {
        report
            .results
            .iter()
            .map(|r| (r.url.clone(), state.scene.visible_features(&r.url)))
            .collect()
    }
}
