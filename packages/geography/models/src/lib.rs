#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Bounding boxes, map viewports, and projections.
//!
//! These are plain value types shared by the geometry loaders and the
//! figure builders. They carry no geometry library dependency so that
//! configuration types can reference them directly.

pub mod states;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A geographic bounding box in WGS84 coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Western longitude boundary.
    pub west: f64,
    /// Southern latitude boundary.
    pub south: f64,
    /// Eastern longitude boundary.
    pub east: f64,
    /// Northern latitude boundary.
    pub north: f64,
}

impl BoundingBox {
    /// Creates a new bounding box from the given coordinates.
    #[must_use]
    pub const fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// A zero-area box around a single point.
    #[must_use]
    pub const fn from_point(lon: f64, lat: f64) -> Self {
        Self::new(lon, lat, lon, lat)
    }

    /// Smallest box covering every `(lon, lat)` pair, or `None` if the
    /// iterator is empty.
    pub fn from_points(points: impl IntoIterator<Item = (f64, f64)>) -> Option<Self> {
        points
            .into_iter()
            .map(|(lon, lat)| Self::from_point(lon, lat))
            .reduce(|acc, b| acc.union(&b))
    }

    /// Smallest box covering both `self` and `other`.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self::new(
            self.west.min(other.west),
            self.south.min(other.south),
            self.east.max(other.east),
            self.north.max(other.north),
        )
    }

    /// Whether the point lies inside or on the edge of this box.
    #[must_use]
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        (self.west..=self.east).contains(&lon) && (self.south..=self.north).contains(&lat)
    }

    /// Grows every side by `fraction` of the span on that axis, but by at
    /// least `min_degrees`.
    #[must_use]
    pub fn padded(&self, fraction: f64, min_degrees: f64) -> Self {
        let pad_lon = ((self.east - self.west) * fraction).max(min_degrees);
        let pad_lat = ((self.north - self.south) * fraction).max(min_degrees);
        Self::new(
            self.west - pad_lon,
            self.south - pad_lat,
            self.east + pad_lon,
            self.north + pad_lat,
        )
    }

    /// Center as `(lon, lat)`.
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        (
            f64::midpoint(self.west, self.east),
            f64::midpoint(self.south, self.north),
        )
    }

    /// Longitude axis range as `[west, east]`.
    #[must_use]
    pub const fn lon_range(&self) -> [f64; 2] {
        [self.west, self.east]
    }

    /// Latitude axis range as `[south, north]`.
    #[must_use]
    pub const fn lat_range(&self) -> [f64; 2] {
        [self.south, self.north]
    }
}

/// Map projection, named as Plotly's `geo.projection.type` expects.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum Projection {
    /// Web Mercator.
    #[default]
    #[serde(rename = "mercator")]
    #[strum(serialize = "mercator")]
    Mercator,
    /// Albers equal-area conic with Alaska and Hawaii insets. Only valid
    /// with the `usa` scope.
    #[serde(rename = "albers usa")]
    #[strum(serialize = "albers usa")]
    AlbersUsa,
}

impl Projection {
    /// The Plotly `geo.scope` this projection requires, if any.
    #[must_use]
    pub const fn scope(self) -> Option<&'static str> {
        match self {
            Self::Mercator => None,
            Self::AlbersUsa => Some("usa"),
        }
    }
}

/// Fixed viewports used when a figure has no geometry to fit.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ViewportPreset {
    /// California: latitude 32 to 42, longitude -125 to -114.
    California,
    /// Lower 48 states: latitude 24 to 50, longitude -125 to -66.
    ContinentalUs,
}

impl ViewportPreset {
    /// The bounding box for this preset.
    #[must_use]
    pub const fn bounds(self) -> BoundingBox {
        match self {
            Self::California => BoundingBox::new(-125.0, 32.0, -114.0, 42.0),
            Self::ContinentalUs => BoundingBox::new(-125.0, 24.0, -66.0, 50.0),
        }
    }

    /// The projection this preset is normally drawn with.
    #[must_use]
    pub const fn default_projection(self) -> Projection {
        match self {
            Self::California => Projection::Mercator,
            Self::ContinentalUs => Projection::AlbersUsa,
        }
    }
}
