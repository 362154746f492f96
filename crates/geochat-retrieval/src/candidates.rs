//! Keyword lookup that narrows the catalog before any LLM call

use geochat_core::models::{DataType, Dataset};

/// Keyword, logical dataset name, data type
const KEYWORDS: &[(&str, &str, &str)] = &[
    ("公園", "park", "Point"),
    ("パーク", "park", "Point"),
    ("park", "park", "Point"),
    ("ランドマーク", "landmark", "Point"),
    ("landmark", "landmark", "Point"),
    ("避難所", "shelter", "Point"),
    ("shelter", "shelter", "Point"),
    ("駅", "station", "Point"),
    ("ステーション", "station", "Point"),
    ("station", "station", "Point"),
    ("道路", "border", "MultiLineString"),
    ("border", "border", "MultiLineString"),
    ("避難路", "emergency_route", "MultiLineString"),
    ("emergency", "emergency_route", "MultiLineString"),
    ("鉄道", "railway", "MultiLineString"),
    ("railway", "railway", "MultiLineString"),
    // building models are not GeoJSON datasets
    ("建物", "3DTiles", "OSM"),
    ("building", "3DTiles", "OSM"),
];

/// A keyword or dataset-name match in a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordHit {
    pub logical_name: String,
    pub data_type: String,
}

/// Fixed keyword table over the dataset catalog
#[derive(Debug, Clone, Copy, Default)]
pub struct CandidateIndex;

impl CandidateIndex {
    pub fn new() -> Self {
        Self
    }

    /// Keyword and dataset-name hits for `query`, in table order then catalog order
    pub fn hits(&self, query: &str, catalog: &[Dataset]) -> Vec<KeywordHit> {
        let query = query.to_lowercase();

        let keyword_hits = KEYWORDS
            .iter()
            .filter(|(keyword, _, _)| query.contains(&keyword.to_lowercase()))
            .map(|(_, logical_name, data_type)| KeywordHit {
                logical_name: logical_name.to_string(),
                data_type: data_type.to_string(),
            });

        let name_hits = catalog
            .iter()
            .filter(|d| d.visible && !d.name.is_empty() && query.contains(&d.name.to_lowercase()))
            .map(|d| KeywordHit { logical_name: d.name.clone(), data_type: d.data_type.to_string() });

        keyword_hits.chain(name_hits).collect()
    }

    /// Visible datasets matching `query`, without duplicates.
    ///
    /// An empty result means nothing in the catalog relates to the query.
    pub fn find_candidates(&self, query: &str, catalog: &[Dataset]) -> Vec<Dataset> {
        let mut candidates: Vec<Dataset> = Vec::new();

        for hit in self.hits(query, catalog) {
            let Ok(data_type) = hit.data_type.parse::<DataType>() else {
                tracing::debug!(data_type = %hit.data_type, "Hit names no known data type");
                continue;
            };
            let logical_name = hit.logical_name.to_lowercase();

            for dataset in catalog.iter().filter(|d| d.visible && d.data_type == data_type) {
                let matches = dataset.name.to_lowercase().contains(&logical_name);
                if matches && !candidates.iter().any(|c| c.name == dataset.name) {
                    candidates.push(dataset.clone());
                }
            }
        }

        tracing::debug!(query, candidates = candidates.len(), "Keyword candidates");
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{catalog, dataset};
    use proptest::prelude::*;

    fn names(datasets: &[Dataset]) -> Vec<&str> {
        datasets.iter().map(|d| d.name.as_str()).collect()
    }

    #[test]
    fn test_japanese_keyword_finds_park() {
        let found = CandidateIndex::new().find_candidates("千葉公園はどこ", &catalog());
        assert_eq!(names(&found), vec!["park"]);
    }

    #[test]
    fn test_latin_keywords_ignore_case() {
        let found = CandidateIndex::new().find_candidates("Show me the RAILWAY and Park", &catalog());
        assert_eq!(names(&found), vec!["park", "railway"]);
    }

    #[test]
    fn test_dataset_name_in_query() {
        let mut datasets = catalog();
        datasets.push(dataset("bus_stop", DataType::Point, true));
        let found = CandidateIndex::new().find_candidates("where is the nearest Bus_Stop?", &datasets);
        assert_eq!(names(&found), vec!["bus_stop"]);
    }

    #[test]
    fn test_hidden_and_wrong_type_are_excluded() {
        let datasets = vec![
            dataset("park", DataType::MultiLineString, true),
            dataset("park_hidden", DataType::Point, false),
        ];
        assert!(CandidateIndex::new().find_candidates("公園", &datasets).is_empty());
    }

    #[test]
    fn test_duplicates_suppressed() {
        // "公園" and "park" both hit, and the name matches too
        let found = CandidateIndex::new().find_candidates("公園 park", &catalog());
        assert_eq!(names(&found), vec!["park"]);
    }

    #[test]
    fn test_building_keyword_resolves_to_nothing() {
        let mut datasets = catalog();
        datasets.push(dataset("osm_buildings", DataType::Osm, true));
        let index = CandidateIndex::new();
        assert_eq!(index.hits("建物", &datasets).len(), 1);
        assert!(index.find_candidates("建物", &datasets).is_empty());
    }

    #[test]
    fn test_cafe_query_has_no_candidates() {
        assert!(CandidateIndex::new().find_candidates("近くのカフェ", &catalog()).is_empty());
    }

    proptest! {
        #[test]
        fn prop_no_keyword_no_candidates(query in "[0-9 ?!.,]{0,40}") {
            let found = CandidateIndex::new().find_candidates(&query, &catalog());
            prop_assert!(found.is_empty());
        }
    }
}
