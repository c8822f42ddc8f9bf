#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Plotly-compatible figure types.
//!
//! These types serialize to the `{ "data": [...], "layout": {...} }` JSON
//! that `Plotly.newPlot` accepts. Only the attributes the accident maps
//! use are modeled; field names follow Plotly's attribute names exactly.

use std::sync::Arc;

use accident_map_geography_models::Projection;
use serde::{Deserialize, Serialize};

/// A complete figure: traces plus layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    /// Traces in drawing order. The first is always the base layer.
    pub data: Vec<Trace>,
    /// Layout.
    pub layout: Layout,
}

/// One trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    /// Filled regions.
    Choropleth(ChoroplethTrace),
    /// Points or lines on a geographic axis.
    Scattergeo(ScatterGeoTrace),
}

/// A choropleth trace used as uniformly colored context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoroplethTrace {
    /// Region geometry. Absent when `locationmode` selects built-in shapes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geojson: Option<Arc<serde_json::Value>>,
    /// Property path matching `locations` to `geojson` features.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featureidkey: Option<String>,
    /// Built-in location set (e.g., `"USA-states"`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locationmode: Option<String>,
    /// Location keys.
    pub locations: Vec<String>,
    /// One value per location.
    pub z: Vec<f64>,
    /// Color scale as `[position, color]` pairs.
    pub colorscale: Vec<(f64, String)>,
    /// Whether Plotly may pick its own color scale.
    pub autocolorscale: bool,
    /// Whether to draw the color bar.
    pub showscale: bool,
    /// Region outline.
    pub marker: ChoroplethMarker,
    /// Hover behavior.
    pub hoverinfo: String,
}

/// Choropleth marker (region outline).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoroplethMarker {
    /// Outline stroke.
    pub line: LineStyle,
}

/// Line stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    /// Stroke color.
    pub color: String,
    /// Stroke width in pixels.
    pub width: f64,
}

/// A scatter-geo trace of points or polylines.
///
/// `None` entries in `lon`/`lat` serialize as `null`, which Plotly treats
/// as a gap: several disjoint polylines share one trace that way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterGeoTrace {
    /// Longitudes.
    pub lon: Vec<Option<f64>>,
    /// Latitudes.
    pub lat: Vec<Option<f64>>,
    /// Draw mode.
    pub mode: ScatterMode,
    /// Point style (markers mode).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<MarkerStyle>,
    /// Line style (lines mode).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<LineStyle>,
    /// Hover behavior.
    pub hoverinfo: String,
    /// Whether the trace appears in the legend.
    pub showlegend: bool,
}

impl ScatterGeoTrace {
    /// Number of drawn vertices, excluding gap markers.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.lon.iter().filter(|v| v.is_some()).count()
    }
}

/// Scatter draw mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScatterMode {
    /// Individual markers.
    Markers,
    /// Connected lines.
    Lines,
}

/// Point marker style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerStyle {
    /// Diameter in pixels.
    pub size: f64,
    /// Fill color.
    pub color: String,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
}

/// Figure layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// Title, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    /// Geographic axis.
    pub geo: Geo,
    /// Outer margins.
    pub margin: Margin,
    /// Whether to draw the legend.
    pub showlegend: bool,
}

/// Figure title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title {
    /// Title text.
    pub text: String,
}

/// Outer margins in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Margin {
    /// Left.
    pub l: u32,
    /// Right.
    pub r: u32,
    /// Top.
    pub t: u32,
    /// Bottom.
    pub b: u32,
}

impl Margin {
    /// Zero margins except `top`.
    #[must_use]
    pub const fn top(t: u32) -> Self {
        Self { l: 0, r: 0, t, b: 0 }
    }
}

/// Geographic axis settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct Geo {
    /// Projection.
    pub projection: GeoProjection,
    /// Map scope (e.g., `"usa"`), required by some projections.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Map center.
    pub center: GeoCenter,
    /// Visible latitude range.
    pub lataxis: GeoAxis,
    /// Visible longitude range.
    pub lonaxis: GeoAxis,
    /// Whether to frame the map.
    pub showframe: bool,
    /// Whether to draw coastlines.
    pub showcoastlines: bool,
    /// Whether to fill land.
    pub showland: bool,
    /// Land fill color.
    pub landcolor: String,
    /// Whether to draw lakes.
    pub showlakes: bool,
    /// Whether to draw country borders.
    pub showcountries: bool,
    /// Whether to fill oceans.
    pub showocean: bool,
}

/// Projection settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoProjection {
    /// Projection type.
    #[serde(rename = "type")]
    pub kind: Projection,
}

/// Map center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCenter {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lon: f64,
}

/// Visible range on one geographic axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoAxis {
    /// `[min, max]` in degrees.
    pub range: [f64; 2],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scatter_gaps_serialize_as_null() {
        let trace = Trace::Scattergeo(ScatterGeoTrace {
            lon: vec![Some(-120.0), None, Some(-119.0)],
            lat: vec![Some(35.0), None, Some(36.0)],
            mode: ScatterMode::Lines,
            marker: None,
            line: Some(LineStyle {
                color: "gray".to_string(),
                width: 0.5,
            }),
            hoverinfo: "none".to_string(),
            showlegend: false,
        });

        let json = serde_json::to_value(&trace).unwrap();
        assert_eq!(json["type"], "scattergeo");
        assert_eq!(json["mode"], "lines");
        assert!(json["lon"][1].is_null());
        assert!(json.get("marker").is_none());
    }

    #[test]
    fn projection_serializes_as_plotly_type() {
        let projection = GeoProjection {
            kind: Projection::AlbersUsa,
        };
        assert_eq!(
            serde_json::to_value(projection).unwrap(),
            serde_json::json!({ "type": "albers usa" })
        );
    }

    #[test]
    fn colorscale_serializes_as_pairs() {
        let colorscale = vec![(0.0, "white".to_string()), (1.0, "white".to_string())];
        assert_eq!(
            serde_json::to_value(colorscale).unwrap(),
            serde_json::json!([[0.0, "white"], [1.0, "white"]])
        );
    }
}
