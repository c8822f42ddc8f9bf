#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Region boundary and road network loading.
//!
//! Reads `GeoJSON` `FeatureCollection`s from a remote URL or a local file
//! and turns them into the two kinds of map geometry the figures draw:
//! named region polygons (counties, states) used as the base layer, and
//! road line strings used as an overlay.

pub mod boundaries;
pub mod fetch;
pub mod roads;

use thiserror::Error;

pub use boundaries::{BoundaryCollection, RegionBoundary};
pub use roads::RoadNetwork;

/// Errors that can occur while loading map geometry.
#[derive(Debug, Error)]
pub enum GeoError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Reading a local file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not valid `GeoJSON`.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Data conversion error.
    #[error("Conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}

/// Parses a `GeoJSON` document that must be a `FeatureCollection`.
fn parse_feature_collection(geojson_str: &str) -> Result<geojson::FeatureCollection, GeoError> {
    match geojson_str.parse::<geojson::GeoJson>()? {
        geojson::GeoJson::FeatureCollection(fc) => Ok(fc),
        geojson::GeoJson::Feature(_) => Err(GeoError::Conversion {
            message: "expected a FeatureCollection, found a single Feature".to_string(),
        }),
        geojson::GeoJson::Geometry(_) => Err(GeoError::Conversion {
            message: "expected a FeatureCollection, found a bare Geometry".to_string(),
        }),
    }
}

/// Converts a rectangle from `geo` into the shared [`BoundingBox`] type.
///
/// [`BoundingBox`]: accident_map_geography_models::BoundingBox
fn rect_to_bbox(rect: geo::Rect<f64>) -> accident_map_geography_models::BoundingBox {
    accident_map_geography_models::BoundingBox::new(
        rect.min().x,
        rect.min().y,
        rect.max().x,
        rect.max().y,
    )
}
