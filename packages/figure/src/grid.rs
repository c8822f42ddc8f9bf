//! Feature-by-severity figure grid.
//!
//! One row per road feature, one column per severity level. Every cell is
//! produced by the same figure template with only the points changed, so
//! cells differ in their markers alone.

use accident_map_accident_models::{AccidentRecord, RoadFeature, Severity};
use serde::Serialize;

use crate::FilterError;
use crate::builder::{MapFigure, MapFigureBuilder};
use crate::filter::{filter, parse_feature};

/// One grid row: a road feature and its heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridRowSpec {
    feature: RoadFeature,
    label: String,
}

impl GridRowSpec {
    /// Creates a row for `feature` headed by `label`.
    #[must_use]
    pub fn new(feature: RoadFeature, label: impl Into<String>) -> Self {
        Self {
            feature,
            label: label.into(),
        }
    }

    /// One row per road feature, in column order, with the standard labels.
    #[must_use]
    pub fn default_rows() -> Vec<Self> {
        RoadFeature::all()
            .iter()
            .map(|&feature| Self::new(feature, feature.label()))
            .collect()
    }

    /// Resolves `(column name, label)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::UnknownFeature`] for the first name that is
    /// not a road feature column.
    pub fn from_names<'a>(
        rows: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Vec<Self>, FilterError> {
        rows.into_iter()
            .map(|(name, label)| Ok(Self::new(parse_feature(name)?, label)))
            .collect()
    }

    /// The row's feature.
    #[must_use]
    pub const fn feature(&self) -> RoadFeature {
        self.feature
    }

    /// The row heading.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// One grid cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridCell {
    /// Column severity.
    pub severity: Severity,
    /// Number of accidents drawn in this cell.
    pub point_count: usize,
    /// The cell's figure.
    pub figure: MapFigure,
}

/// One grid row of cells, ordered by severity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridRow {
    /// Row feature.
    pub feature: RoadFeature,
    /// Row heading.
    pub label: String,
    /// One cell per severity level, 1 through 4.
    pub cells: Vec<GridCell>,
}

/// A complete grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FigureGrid {
    rows: Vec<GridRow>,
}

impl FigureGrid {
    /// Rows, in the order they were requested.
    #[must_use]
    pub fn rows(&self) -> &[GridRow] {
        &self.rows
    }

    /// Consumes the grid, returning its rows.
    #[must_use]
    pub fn into_rows(self) -> Vec<GridRow> {
        self.rows
    }

    /// Total number of cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.rows.iter().map(|r| r.cells.len()).sum()
    }

    /// Column headings.
    #[must_use]
    pub fn columns() -> &'static [Severity] {
        Severity::all()
    }
}

/// Fills a grid from a figure template.
#[derive(Debug, Clone)]
pub struct GridComposer<'a> {
    template: MapFigureBuilder<'a>,
    rows: Vec<GridRowSpec>,
}

impl<'a> GridComposer<'a> {
    /// Creates a composer. `template` carries the base layer, viewport and
    /// any road overlay; its points and title are replaced per cell.
    #[must_use]
    pub const fn new(template: MapFigureBuilder<'a>, rows: Vec<GridRowSpec>) -> Self {
        Self { template, rows }
    }

    /// Builds every cell. Combinations with no matching accidents still
    /// get a cell, showing the base layer alone.
    #[must_use]
    pub fn compose(&self, records: &[AccidentRecord]) -> FigureGrid {
        let rows = self
            .rows
            .iter()
            .map(|row| GridRow {
                feature: row.feature,
                label: row.label.clone(),
                cells: Severity::all()
                    .iter()
                    .map(|&severity| {
                        let view = filter(records, row.feature, severity);
                        log::debug!(
                            "Grid cell {}/{}: {} accidents",
                            row.feature,
                            severity.value(),
                            view.len()
                        );
                        GridCell {
                            severity,
                            point_count: view.len(),
                            figure: self
                                .template
                                .clone()
                                .without_title()
                                .with_points(view.coordinates())
                                .build(),
                        }
                    })
                    .collect(),
            })
            .collect();

        FigureGrid { rows }
    }
}

#[cfg(test)]
mod tests {
    use accident_map_accident_models::FeatureFlags;
    use accident_map_geography_models::ViewportPreset;

    use super::*;
    use crate::builder::BaseLayer;

    fn record(lon: f64, lat: f64, severity: Severity, features: &[RoadFeature]) -> AccidentRecord {
        AccidentRecord {
            latitude: lat,
            longitude: lon,
            state: "CA".to_string(),
            severity,
            features: features.iter().copied().collect::<FeatureFlags>(),
        }
    }

    fn composer() -> GridComposer<'static> {
        GridComposer::new(
            MapFigureBuilder::new(BaseLayer::States, ViewportPreset::California),
            GridRowSpec::default_rows(),
        )
    }

    #[test]
    fn empty_data_fills_every_cell() {
        let grid = composer().compose(&[]);

        assert_eq!(grid.rows().len(), 7);
        assert_eq!(grid.cell_count(), 28);
        for row in grid.rows() {
            for cell in &row.cells {
                assert_eq!(cell.point_count, 0);
                assert_eq!(cell.figure.marker_count(), 0);
                assert!(!cell.figure.base_layer().locations.is_empty());
            }
        }
    }

    #[test]
    fn rows_use_readable_labels() {
        let labels: Vec<_> = composer()
            .compose(&[])
            .rows()
            .iter()
            .map(|r| r.label.clone())
            .collect();
        assert_eq!(
            labels,
            [
                "Bump",
                "Crossing",
                "Give Way",
                "Junction",
                "Railway",
                "Stop",
                "Traffic Signal"
            ]
        );
    }

    #[test]
    fn cells_are_ordered_by_severity() {
        let grid = composer().compose(&[]);
        for row in grid.rows() {
            let severities: Vec<_> = row.cells.iter().map(|c| c.severity).collect();
            assert_eq!(severities, FigureGrid::columns());
        }
    }

    #[test]
    fn cells_count_matching_accidents() {
        let records = [
            record(-118.0, 34.0, Severity::Moderate, &[RoadFeature::Crossing]),
            record(
                -122.0,
                37.0,
                Severity::Serious,
                &[RoadFeature::Crossing, RoadFeature::TrafficSignal],
            ),
            record(-119.0, 35.0, Severity::Moderate, &[RoadFeature::Crossing]),
        ];
        let grid = composer().compose(&records);

        let crossing = &grid.rows()[1];
        assert_eq!(crossing.feature, RoadFeature::Crossing);
        let counts: Vec<_> = crossing.cells.iter().map(|c| c.point_count).collect();
        assert_eq!(counts, [0, 2, 1, 0]);
        assert_eq!(crossing.cells[1].figure.marker_count(), 2);

        let signal = &grid.rows()[6];
        let counts: Vec<_> = signal.cells.iter().map(|c| c.point_count).collect();
        assert_eq!(counts, [0, 0, 1, 0]);
    }

    #[test]
    fn cells_share_base_layer_and_viewport() {
        let records = [record(-118.0, 34.0, Severity::Minor, &[RoadFeature::Stop])];
        let grid = composer().compose(&records);
        let first = &grid.rows()[0].cells[0].figure;

        for row in grid.rows() {
            for cell in &row.cells {
                assert_eq!(cell.figure.base_layer(), first.base_layer());
                assert_eq!(cell.figure.viewport(), first.viewport());
            }
        }
    }

    #[test]
    fn cells_drop_template_title() {
        let grid = GridComposer::new(
            MapFigureBuilder::new(BaseLayer::States, ViewportPreset::California)
                .with_title("Main map"),
            GridRowSpec::default_rows(),
        )
        .compose(&[]);

        for row in grid.rows() {
            for cell in &row.cells {
                let layout = &cell.figure.figure().layout;
                assert!(layout.title.is_none());
                assert_eq!(layout.margin.t, 0);
            }
        }
    }

    #[test]
    fn rows_from_names() {
        let rows = GridRowSpec::from_names([("Give_Way", "Yield"), ("Stop", "Stop")]).unwrap();
        assert_eq!(rows[0].feature(), RoadFeature::GiveWay);
        assert_eq!(rows[0].label(), "Yield");

        assert_eq!(
            GridRowSpec::from_names([("Roundabout", "Roundabout")]),
            Err(FilterError::UnknownFeature {
                name: "Roundabout".to_string()
            })
        );
    }
}
