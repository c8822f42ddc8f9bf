//! Road network geometry drawn as line overlays.

use accident_map_geography_models::BoundingBox;
use geo::{BoundingRect, LineString};

use crate::{GeoError, parse_feature_collection, rect_to_bbox};

/// An immutable collection of road center lines.
///
/// `MultiLineString` features are flattened into their member lines.
/// Coordinates beyond longitude/latitude (elevation, measure) are dropped
/// during conversion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoadNetwork {
    lines: Vec<LineString<f64>>,
}

impl RoadNetwork {
    /// Creates a network from already-converted lines.
    #[must_use]
    pub const fn new(lines: Vec<LineString<f64>>) -> Self {
        Self { lines }
    }

    /// Parses a `GeoJSON` `FeatureCollection` of line features.
    ///
    /// Features with any other geometry type are skipped; the number
    /// skipped is logged.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError`] if the document is not a valid `GeoJSON`
    /// `FeatureCollection`.
    pub fn from_geojson_str(geojson_str: &str) -> Result<Self, GeoError> {
        let collection = parse_feature_collection(geojson_str)?;
        let total = collection.features.len();

        let mut lines = Vec::with_capacity(total);
        let mut skipped = 0usize;

        for feature in collection.features {
            let Some(geometry) = feature.geometry else {
                skipped += 1;
                continue;
            };
            match geo::Geometry::<f64>::try_from(geometry) {
                Ok(geo::Geometry::LineString(line)) => lines.push(line),
                Ok(geo::Geometry::MultiLineString(multi)) => lines.extend(multi.0),
                Ok(_) | Err(_) => skipped += 1,
            }
        }

        lines.retain(|line| line.0.len() >= 2);

        if skipped > 0 {
            log::warn!("Skipped {skipped} of {total} road features without line geometry");
        }
        log::info!("Loaded {} road lines", lines.len());

        Ok(Self { lines })
    }

    /// The road lines.
    #[must_use]
    pub fn lines(&self) -> &[LineString<f64>] {
        &self.lines
    }

    /// Whether the network has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Bounding box over every line.
    #[must_use]
    pub fn bounds(&self) -> Option<BoundingBox> {
        self.lines
            .iter()
            .filter_map(|line| line.bounding_rect())
            .map(rect_to_bbox)
            .reduce(|acc, b| acc.union(&b))
    }
}
