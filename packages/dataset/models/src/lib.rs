#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Map source definition types.
//!
//! Defines the TOML schema describing one dashboard: which accident table
//! to load and how to subsample it, which boundaries form the base layer,
//! which road network to overlay, and how the feature/severity grid is
//! laid out.

use accident_map_geography_models::{Projection, ViewportPreset};
use serde::{Deserialize, Serialize};

/// A dashboard definition, deserialized from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapSource {
    /// Unique source identifier (e.g., `"california"`).
    pub id: String,
    /// Page heading and main figure title.
    pub title: String,
    /// Fallback viewport when there is no geometry to fit.
    pub viewport: ViewportPreset,
    /// Projection override; defaults to the viewport's projection.
    pub projection: Option<Projection>,
    /// Accident records to plot. Maps without records draw only context
    /// layers.
    pub records: Option<RecordsConfig>,
    /// Base layer.
    #[serde(default)]
    pub boundaries: BoundaryConfig,
    /// Road network overlay on the main figure.
    pub roads: Option<RoadsConfig>,
    /// Feature/severity grid below the main figure.
    pub grid: Option<GridConfig>,
}

impl MapSource {
    /// Returns the projection to draw with.
    #[must_use]
    pub fn projection(&self) -> Projection {
        self.projection
            .unwrap_or_else(|| self.viewport.default_projection())
    }
}

/// Where the accident table lives and how to cut it down.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordsConfig {
    /// CSV path, relative to the data directory.
    pub path: String,
    /// Keep only records with this `State` code.
    pub state: Option<String>,
    /// Fraction of records to keep, in `(0, 1]`.
    #[serde(default = "default_sample_fraction")]
    pub sample_fraction: f64,
    /// Seed for the sampler, so a dashboard is reproducible.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

const fn default_sample_fraction() -> f64 {
    1.0
}

const fn default_seed() -> u64 {
    42
}

/// Base layer source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoundaryConfig {
    /// Built-in US state outlines (`locationmode = "USA-states"`).
    #[default]
    UsStates,
    /// `GeoJSON` `FeatureCollection` downloaded from a URL.
    GeojsonUrl {
        /// Full URL returning the collection.
        url: String,
    },
    /// `GeoJSON` `FeatureCollection` read from disk.
    GeojsonFile {
        /// Path relative to the data directory.
        path: String,
    },
}

/// Road network overlay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoadsConfig {
    /// `GeoJSON` path relative to the data directory.
    pub path: String,
    /// Line color.
    #[serde(default = "default_road_color")]
    pub color: String,
    /// Line width in pixels.
    #[serde(default = "default_road_width")]
    pub width: f64,
}

fn default_road_color() -> String {
    "gray".to_string()
}

const fn default_road_width() -> f64 {
    0.5
}

/// Feature/severity grid layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    /// Heading shown above the grid.
    pub title: String,
    /// Rows in display order. Defaults to every road feature with its
    /// standard label.
    #[serde(default)]
    pub rows: Vec<GridRowConfig>,
}

/// One grid row: a feature column name and the label to show for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridRowConfig {
    /// Source column name (e.g., `"Give_Way"`).
    pub feature: String,
    /// Row heading (e.g., `"Give Way"`).
    pub label: String,
}
