#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Feature/severity filtering and map figure assembly.
//!
//! Three layers, each depending only on the one before it:
//!
//! 1. [`filter`] selects the records with one road feature at one
//!    severity level.
//! 2. [`builder`] draws a base layer of uniformly colored regions with
//!    optional road lines and accident points on top.
//! 3. [`grid`] lays out one figure per feature (rows) and severity level
//!    (columns).
//!
//! Every operation is pure: the same inputs always produce the same
//! figures.

pub mod builder;
pub mod filter;
pub mod grid;

use accident_map_accident_models::InvalidSeverityError;
use thiserror::Error;

pub use builder::{BaseLayer, MapFigure, MapFigureBuilder};
pub use filter::FeatureSeverityView;
pub use grid::{FigureGrid, GridComposer, GridRowSpec};

/// Errors from name-based feature/severity lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// The feature name is not one of the road feature columns.
    #[error("Unknown road feature '{name}'")]
    UnknownFeature {
        /// The name that failed to resolve.
        name: String,
    },

    /// The severity level is outside 1-4.
    #[error("{0}")]
    InvalidSeverity(#[from] InvalidSeverityError),
}
