//! Compile-time registry of map source definitions.
//!
//! Each entry is a `(name, toml_content)` pair embedded via `include_str!`.
//! Adding a new dashboard requires creating a TOML file in `sources/` and
//! adding a corresponding entry here.

use accident_map_dataset_models::MapSource;

use crate::DatasetError;

/// Number of registered map sources. Enforced by a test.
#[cfg(test)]
const EXPECTED_SOURCE_COUNT: usize = 5;

/// Embedded TOML source definitions.
const SOURCE_TOMLS: &[(&str, &str)] = &[
    ("california", include_str!("../sources/california.toml")),
    ("usa", include_str!("../sources/usa.toml")),
    (
        "california_roads",
        include_str!("../sources/california_roads.toml"),
    ),
    ("highways", include_str!("../sources/highways.toml")),
    (
        "california_outline",
        include_str!("../sources/california_outline.toml"),
    ),
];

/// Returns all registered map sources.
///
/// # Panics
///
/// Panics if any embedded TOML file fails to parse. Since these are
/// compile-time constants, parse failures indicate a development error
/// and are caught by the tests below.
#[must_use]
pub fn all_sources() -> Vec<MapSource> {
    SOURCE_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            toml::de::from_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse map source '{name}': {e}"))
        })
        .collect()
}

/// Looks up a registered map source by ID.
///
/// # Errors
///
/// Returns [`DatasetError::UnknownSource`] if no source has this ID.
pub fn source_by_id(id: &str) -> Result<MapSource, DatasetError> {
    all_sources()
        .into_iter()
        .find(|s| s.id == id)
        .ok_or_else(|| DatasetError::UnknownSource { id: id.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use accident_map_accident_models::RoadFeature;
    use accident_map_geography_models::states;
    use std::collections::BTreeSet;

    #[test]
    fn loads_all_sources() {
        let sources = all_sources();
        assert_eq!(
            sources.len(),
            EXPECTED_SOURCE_COUNT,
            "Expected {EXPECTED_SOURCE_COUNT} map sources, found {}. \
             Update EXPECTED_SOURCE_COUNT after adding/removing sources.",
            sources.len()
        );
    }

    #[test]
    fn source_ids_are_unique_and_match_registry_names() {
        let mut seen = BTreeSet::new();
        for ((name, _), source) in SOURCE_TOMLS.iter().zip(all_sources()) {
            assert_eq!(*name, source.id, "registry name and TOML id differ");
            assert!(seen.insert(source.id.clone()), "Duplicate ID: {}", source.id);
        }
    }

    #[test]
    fn all_sources_have_valid_fields() {
        for source in &all_sources() {
            assert!(!source.title.is_empty(), "Source {} has empty title", source.id);

            if let Some(records) = &source.records {
                assert!(
                    records.sample_fraction > 0.0 && records.sample_fraction <= 1.0,
                    "Source {} has invalid sample fraction",
                    source.id
                );
                if let Some(state) = &records.state {
                    assert!(
                        states::is_state(state),
                        "Source {} filters on unknown state {state}",
                        source.id
                    );
                }
            }

            if let Some(grid) = &source.grid {
                assert!(
                    source.records.is_some(),
                    "Source {} has a grid but no records",
                    source.id
                );
                for row in &grid.rows {
                    assert!(
                        row.feature.parse::<RoadFeature>().is_ok(),
                        "Source {} has unknown grid feature {}",
                        source.id,
                        row.feature
                    );
                }
            }
        }
    }

    #[test]
    fn looks_up_by_id() {
        assert_eq!(source_by_id("usa").unwrap().id, "usa");
        assert!(matches!(
            source_by_id("atlantis"),
            Err(DatasetError::UnknownSource { .. })
        ));
    }
}
