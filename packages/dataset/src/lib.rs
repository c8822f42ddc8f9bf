#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Accident table ingestion, sampling, and map source registry.
//!
//! Everything a dashboard needs is loaded exactly once into a
//! [`DatasetContext`]: the (sampled) accident records, the base layer
//! boundaries and the road network. The context is never mutated after
//! construction and is passed by reference to the figure builders.
//!
//! Map sources are defined as TOML files embedded at compile time; see
//! [`registry`].

pub mod context;
pub mod ingest;
pub mod registry;
pub mod sample;

use thiserror::Error;

pub use context::DatasetContext;

/// Errors that can occur while loading a dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Reading or parsing the CSV failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the CSV header.
    #[error("Missing required column '{column}'")]
    MissingColumn {
        /// Column name.
        column: &'static str,
    },

    /// Loading boundaries or roads failed.
    #[error("Geography error: {0}")]
    Geography(#[from] accident_map_geography::GeoError),

    /// The sample fraction is outside `(0, 1]`.
    #[error("Invalid sample fraction {fraction}: expected a value in (0, 1]")]
    InvalidSampleFraction {
        /// The rejected fraction.
        fraction: f64,
    },

    /// No registered source has this ID.
    #[error("Unknown map source '{id}'")]
    UnknownSource {
        /// The requested source ID.
        id: String,
    },
}
