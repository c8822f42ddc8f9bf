#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Accident map dashboards.
//!
//! A [`Dashboard`] is materialized once from a loaded
//! [`DatasetContext`]: a main map of every loaded accident and, when the
//! map source asks for one, a feature-by-severity grid. It can then be
//! written out as a static page ([`page`]) or served over HTTP
//! ([`server`]).

pub mod page;
pub mod server;

use accident_map_dataset::{DatasetContext, DatasetError};
use accident_map_figure::grid::GridRow;
use accident_map_figure::{
    BaseLayer, FilterError, GridComposer, GridRowSpec, MapFigure, MapFigureBuilder,
};
use accident_map_geography_models::states;
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while building or publishing a dashboard.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Loading the dataset failed.
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    /// A grid row names an unknown road feature.
    #[error("Grid error: {0}")]
    Filter(#[from] FilterError),

    /// Serializing figure JSON failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing the page or binding the server failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The grid section of a dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardGrid {
    /// Section heading.
    pub title: String,
    /// Cells, row by row.
    pub rows: Vec<GridRow>,
}

/// Every figure one page shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    source_id: String,
    title: String,
    main: MapFigure,
    grid: Option<DashboardGrid>,
}

impl Dashboard {
    /// Builds all figures for `ctx`.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Filter`] if the source's grid names a road
    /// feature that does not exist.
    pub fn build(ctx: &DatasetContext) -> Result<Self, DashboardError> {
        let source = ctx.source();
        let base = BaseLayer::from_boundaries(ctx.boundaries());

        if matches!(base, BaseLayer::States) {
            warn_unknown_states(ctx);
        }

        let mut template =
            MapFigureBuilder::new(base, source.viewport).with_projection(source.projection());
        if let (Some(network), Some(config)) = (ctx.roads(), &source.roads) {
            template = template.with_roads(network, &config.color, config.width);
        }

        let main = template
            .clone()
            .with_title(&source.title)
            .with_points(ctx.records().iter().map(|r| (r.longitude, r.latitude)))
            .build();
        log::info!(
            "Built main figure for '{}' with {} accidents",
            source.id,
            main.marker_count()
        );

        let grid = match &source.grid {
            Some(config) => {
                let rows = if config.rows.is_empty() {
                    GridRowSpec::default_rows()
                } else {
                    GridRowSpec::from_names(
                        config
                            .rows
                            .iter()
                            .map(|r| (r.feature.as_str(), r.label.as_str())),
                    )?
                };
                let grid = GridComposer::new(template, rows).compose(ctx.records());
                log::info!("Built {} grid cells", grid.cell_count());
                Some(DashboardGrid {
                    title: config.title.clone(),
                    rows: grid.into_rows(),
                })
            }
            None => None,
        };

        Ok(Self {
            source_id: source.id.clone(),
            title: source.title.clone(),
            main,
            grid,
        })
    }

    /// The map source this dashboard was built from.
    #[must_use]
    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    /// Page title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The main map.
    #[must_use]
    pub const fn main(&self) -> &MapFigure {
        &self.main
    }

    /// The feature-by-severity grid, if the source has one.
    #[must_use]
    pub const fn grid(&self) -> Option<&DashboardGrid> {
        self.grid.as_ref()
    }
}

/// Records outside the 50 states and DC have no outline on the state base
/// layer. They are still drawn, but are worth knowing about.
fn warn_unknown_states(ctx: &DatasetContext) {
    let unknown = ctx
        .records()
        .iter()
        .filter(|r| !states::is_state(&r.state))
        .count();
    if unknown > 0 {
        log::warn!("{unknown} records have a state code with no outline on the base layer");
    }
}
