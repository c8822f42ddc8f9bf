//! Named region polygons used as the map base layer.
//!
//! Each feature's `properties.name` is the join key Plotly uses to match a
//! location to its polygon (`featureidkey = "properties.name"`). Features
//! that cannot be keyed are dropped here, loudly, so the figure never
//! references a location the geometry does not carry.

use std::collections::BTreeSet;
use std::sync::Arc;

use accident_map_geography_models::BoundingBox;
use geo::{BoundingRect, MultiPolygon};

use crate::{GeoError, parse_feature_collection, rect_to_bbox};

/// Property holding the join key on every boundary feature.
pub const NAME_PROPERTY: &str = "name";

/// A named polygon representing a county or state.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionBoundary {
    /// Join key, taken from `properties.name`.
    pub name: String,
    /// Region outline.
    pub geometry: MultiPolygon<f64>,
}

impl RegionBoundary {
    /// Bounding box of the outline, or `None` for an empty polygon.
    #[must_use]
    pub fn bounds(&self) -> Option<BoundingBox> {
        self.geometry.bounding_rect().map(rect_to_bbox)
    }
}

/// An immutable set of region boundaries plus the `GeoJSON` they came from.
///
/// The `GeoJSON` is kept pre-serialized behind an [`Arc`] so every figure
/// drawing this base layer shares one copy.
#[derive(Debug, Clone)]
pub struct BoundaryCollection {
    regions: Vec<RegionBoundary>,
    geojson: Arc<serde_json::Value>,
}

impl BoundaryCollection {
    /// Parses a `GeoJSON` `FeatureCollection` of polygon features.
    ///
    /// Features without a string `name` property, without geometry, or
    /// with a non-polygon geometry are skipped with a warning. Duplicate
    /// names are kept but reported, since Plotly colors only the first
    /// feature matching a key.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError`] if the document is not a valid `GeoJSON`
    /// `FeatureCollection`, or if no usable region remains.
    pub fn from_geojson_str(geojson_str: &str) -> Result<Self, GeoError> {
        let collection = parse_feature_collection(geojson_str)?;
        let total = collection.features.len();

        let mut regions = Vec::with_capacity(total);
        let mut kept_features = Vec::with_capacity(total);
        let mut seen = BTreeSet::new();

        for (index, feature) in collection.features.into_iter().enumerate() {
            let Some(name) = feature
                .property(NAME_PROPERTY)
                .and_then(serde_json::Value::as_str)
                .map(str::to_string)
            else {
                log::warn!("Boundary feature #{index} has no '{NAME_PROPERTY}' property, skipping");
                continue;
            };

            let Some(geometry) = feature.geometry.clone() else {
                log::warn!("Boundary '{name}' has no geometry, skipping");
                continue;
            };

            let geometry = match geo::Geometry::<f64>::try_from(geometry) {
                Ok(geo::Geometry::MultiPolygon(mp)) => mp,
                Ok(geo::Geometry::Polygon(p)) => MultiPolygon(vec![p]),
                Ok(_) => {
                    log::warn!("Boundary '{name}' is not a polygon, skipping");
                    continue;
                }
                Err(e) => {
                    log::warn!("Boundary '{name}' has invalid geometry ({e}), skipping");
                    continue;
                }
            };

            if !seen.insert(name.clone()) {
                log::warn!("Duplicate boundary name '{name}': only the first is colored");
            }

            regions.push(RegionBoundary { name, geometry });
            kept_features.push(feature);
        }

        if regions.is_empty() {
            return Err(GeoError::Conversion {
                message: format!("none of the {total} boundary features were usable"),
            });
        }

        if regions.len() < total {
            log::warn!(
                "Kept {} of {total} boundary features; the rest cannot be drawn",
                regions.len()
            );
        }

        let geojson = serde_json::to_value(geojson::FeatureCollection {
            bbox: None,
            features: kept_features,
            foreign_members: None,
        })?;

        Ok(Self {
            regions,
            geojson: Arc::new(geojson),
        })
    }

    /// The regions, in source order.
    #[must_use]
    pub fn regions(&self) -> &[RegionBoundary] {
        &self.regions
    }

    /// Number of regions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Whether the collection has no regions. Never true for a collection
    /// built by [`Self::from_geojson_str`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Join keys in source order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.regions.iter().map(|r| r.name.as_str())
    }

    /// Shared `GeoJSON` of the kept features.
    #[must_use]
    pub fn geojson(&self) -> Arc<serde_json::Value> {
        Arc::clone(&self.geojson)
    }

    /// Bounding box over every region.
    #[must_use]
    pub fn bounds(&self) -> Option<BoundingBox> {
        self.regions
            .iter()
            .filter_map(RegionBoundary::bounds)
            .reduce(|acc, b| acc.union(&b))
    }
}
