//! Feature/severity record selection.

use accident_map_accident_models::{AccidentRecord, RoadFeature, Severity};

use crate::FilterError;

/// The records having one road feature at one severity level.
///
/// Borrows from the full record set and keeps its row order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSeverityView<'a> {
    feature: RoadFeature,
    severity: Severity,
    records: Vec<&'a AccidentRecord>,
}

impl<'a> FeatureSeverityView<'a> {
    /// The feature every record in the view has.
    #[must_use]
    pub const fn feature(&self) -> RoadFeature {
        self.feature
    }

    /// The severity every record in the view has.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.severity
    }

    /// Matching records, in source order.
    #[must_use]
    pub fn records(&self) -> &[&'a AccidentRecord] {
        &self.records
    }

    /// Number of matching records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing matched. An empty view is a normal result.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record positions as `(lon, lat)`.
    pub fn coordinates(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.records.iter().map(|r| (r.longitude, r.latitude))
    }
}

/// Selects the records where `feature` is present and severity equals
/// `severity`.
#[must_use]
pub fn filter(
    records: &[AccidentRecord],
    feature: RoadFeature,
    severity: Severity,
) -> FeatureSeverityView<'_> {
    let records = records
        .iter()
        .filter(|r| r.has(feature) && r.severity == severity)
        .collect();

    FeatureSeverityView {
        feature,
        severity,
        records,
    }
}

/// Like [`filter`], but resolves the feature from its column name (e.g.
/// `"Give_Way"`) and the severity from its numeric level.
///
/// # Errors
///
/// Returns [`FilterError::UnknownFeature`] if `feature` is not exactly one
/// of the road feature column names, and [`FilterError::InvalidSeverity`]
/// if `level` is outside 1-4. Neither case yields an empty view.
pub fn filter_by_name<'a>(
    records: &'a [AccidentRecord],
    feature: &str,
    level: u8,
) -> Result<FeatureSeverityView<'a>, FilterError> {
    let feature = parse_feature(feature)?;
    let severity = Severity::from_value(level)?;
    Ok(filter(records, feature, severity))
}

/// Resolves a road feature column name.
///
/// # Errors
///
/// Returns [`FilterError::UnknownFeature`] if `name` is not exactly one of
/// the road feature column names.
pub fn parse_feature(name: &str) -> Result<RoadFeature, FilterError> {
    name.parse().map_err(|_| FilterError::UnknownFeature {
        name: name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use accident_map_accident_models::FeatureFlags;

    use super::*;

    fn record(lat: f64, lng: f64, severity: u8, features: &[RoadFeature]) -> AccidentRecord {
        AccidentRecord {
            latitude: lat,
            longitude: lng,
            state: "CA".to_string(),
            severity: Severity::from_value(severity).unwrap(),
            features: features.iter().copied().collect::<FeatureFlags>(),
        }
    }

    fn example() -> Vec<AccidentRecord> {
        vec![
            record(34.0, -118.0, 2, &[RoadFeature::Crossing]),
            record(37.0, -122.0, 3, &[RoadFeature::Crossing]),
        ]
    }

    fn mixed() -> Vec<AccidentRecord> {
        let mut out = Vec::new();
        for (i, feature) in RoadFeature::all().iter().enumerate() {
            for severity in 1..=4u8 {
                let offset = f64::from(u8::try_from(i).unwrap()) + f64::from(severity) / 10.0;
                out.push(record(33.0 + offset, -117.0, severity, &[*feature]));
                out.push(record(
                    34.0 + offset,
                    -118.0,
                    severity,
                    &[*feature, RoadFeature::Junction],
                ));
            }
        }
        out.push(record(40.0, -120.0, 1, &[]));
        out
    }

    fn keys(view: &FeatureSeverityView<'_>) -> BTreeSet<(u64, u64)> {
        view.records()
            .iter()
            .map(|r| (r.latitude.to_bits(), r.longitude.to_bits()))
            .collect()
    }

    #[test]
    fn selects_matching_record() {
        let records = example();
        let view = filter_by_name(&records, "Crossing", 2).unwrap();
        assert_eq!(view.len(), 1);
        assert_eq!(view.records()[0], &records[0]);
    }

    #[test]
    fn empty_match_is_not_an_error() {
        let records = example();
        let view = filter_by_name(&records, "Crossing", 4).unwrap();
        assert!(view.is_empty());
    }

    #[test]
    fn unknown_feature_fails() {
        let records = example();
        assert_eq!(
            filter_by_name(&records, "Unknown_Flag", 1),
            Err(FilterError::UnknownFeature {
                name: "Unknown_Flag".to_string()
            })
        );
    }

    #[test]
    fn feature_names_are_case_sensitive() {
        let records = example();
        assert!(filter_by_name(&records, "crossing", 2).is_err());
    }

    #[test]
    fn invalid_severity_fails() {
        let records = example();
        assert!(matches!(
            filter_by_name(&records, "Crossing", 5),
            Err(FilterError::InvalidSeverity(_))
        ));
        assert!(filter_by_name(&records, "Crossing", 0).is_err());
    }

    #[test]
    fn only_matching_records_for_every_combination() {
        let records = mixed();
        for feature in RoadFeature::all() {
            for severity in Severity::all() {
                let view = filter(&records, *feature, *severity);
                assert!(!view.is_empty(), "{feature:?}/{severity:?} should match");
                for r in view.records() {
                    assert!(r.has(*feature));
                    assert_eq!(r.severity, *severity);
                }
                let expected = records
                    .iter()
                    .filter(|r| r.has(*feature) && r.severity == *severity)
                    .count();
                assert_eq!(view.len(), expected);
            }
        }
    }

    #[test]
    fn filter_is_idempotent() {
        let records = mixed();
        let first = filter(&records, RoadFeature::Junction, Severity::Serious);
        let second = filter(&records, RoadFeature::Junction, Severity::Serious);
        assert_eq!(first, second);
    }

    #[test]
    fn row_order_does_not_change_contents() {
        let records = mixed();
        let mut reversed = records.clone();
        reversed.reverse();

        for feature in RoadFeature::all() {
            for severity in Severity::all() {
                assert_eq!(
                    keys(&filter(&records, *feature, *severity)),
                    keys(&filter(&reversed, *feature, *severity))
                );
            }
        }
    }

    #[test]
    fn coordinates_are_lon_lat() {
        let records = example();
        let view = filter(&records, RoadFeature::Crossing, Severity::Serious);
        assert_eq!(view.coordinates().collect::<Vec<_>>(), vec![(-122.0, 37.0)]);
    }
}
