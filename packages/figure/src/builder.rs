//! Map figure assembly.
//!
//! A figure is always a base layer of uniformly white regions with thin
//! black outlines, optionally overlaid by road lines and then by accident
//! points. The base layer carries geographic context only; no region is
//! colored by data.

use accident_map_figure_models::{
    ChoroplethMarker, ChoroplethTrace, Figure, Geo, GeoAxis, GeoCenter, GeoProjection, Layout,
    LineStyle, Margin, MarkerStyle, ScatterGeoTrace, ScatterMode, Title, Trace,
};
use accident_map_geography::{BoundaryCollection, RoadNetwork};
use accident_map_geography_models::{BoundingBox, Projection, ViewportPreset, states};
use serde::Serialize;

/// Region fill color.
pub const BASE_FILL: &str = "white";
/// Region outline color.
pub const OUTLINE_COLOR: &str = "black";
/// Region outline width.
pub const OUTLINE_WIDTH: f64 = 0.5;
/// Land color behind the US state outlines.
pub const LAND_COLOR: &str = "lightgray";
/// Accident marker diameter.
pub const MARKER_SIZE: f64 = 4.0;
/// Accident marker color.
pub const MARKER_COLOR: &str = "red";
/// Accident marker opacity.
pub const MARKER_OPACITY: f64 = 0.6;
/// Top margin reserved for a title.
pub const TITLE_MARGIN: u32 = 50;

/// Fraction of the fitted extent added on every side.
const VIEWPORT_PADDING: f64 = 0.02;
/// Minimum padding, so a single point still gets a usable viewport.
const MIN_PADDING_DEGREES: f64 = 0.25;

/// Plotly's `featureidkey` for region boundaries.
const FEATURE_ID_KEY: &str = "properties.name";
/// Plotly's built-in US state location set.
const US_STATES_LOCATION_MODE: &str = "USA-states";

/// The regions drawn under every overlay.
#[derive(Debug, Clone, Copy)]
pub enum BaseLayer<'a> {
    /// Named polygons from a boundary collection.
    Regions(&'a BoundaryCollection),
    /// Plotly's built-in US state outlines. Carries no geometry of its
    /// own, so figures on this layer always use the fallback viewport.
    States,
}

impl<'a> BaseLayer<'a> {
    /// `Regions` when boundaries are loaded, `States` otherwise.
    #[must_use]
    pub const fn from_boundaries(boundaries: Option<&'a BoundaryCollection>) -> Self {
        match boundaries {
            Some(b) => Self::Regions(b),
            None => Self::States,
        }
    }

    fn trace(self) -> ChoroplethTrace {
        let (geojson, featureidkey, locationmode, locations): (_, _, _, Vec<String>) = match self {
            Self::Regions(boundaries) => (
                Some(boundaries.geojson()),
                Some(FEATURE_ID_KEY.to_string()),
                None,
                boundaries.names().map(str::to_string).collect(),
            ),
            Self::States => (
                None,
                None,
                Some(US_STATES_LOCATION_MODE.to_string()),
                states::abbreviations().map(str::to_string).collect(),
            ),
        };

        ChoroplethTrace {
            geojson,
            featureidkey,
            locationmode,
            z: vec![1.0; locations.len()],
            locations,
            colorscale: vec![(0.0, BASE_FILL.to_string()), (1.0, BASE_FILL.to_string())],
            autocolorscale: false,
            showscale: false,
            marker: ChoroplethMarker {
                line: LineStyle {
                    color: OUTLINE_COLOR.to_string(),
                    width: OUTLINE_WIDTH,
                },
            },
            hoverinfo: "skip".to_string(),
        }
    }
}

/// A finished figure. Immutable; the first trace is the base layer and
/// the rest are overlays.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MapFigure {
    figure: Figure,
}

impl MapFigure {
    /// The underlying Plotly figure.
    #[must_use]
    pub const fn figure(&self) -> &Figure {
        &self.figure
    }

    /// The base layer trace.
    ///
    /// # Panics
    ///
    /// Never: [`MapFigureBuilder::build`] always emits the base layer first.
    #[must_use]
    pub fn base_layer(&self) -> &ChoroplethTrace {
        match self.figure.data.first() {
            Some(Trace::Choropleth(base)) => base,
            _ => unreachable!("MapFigure always starts with a choropleth base layer"),
        }
    }

    /// Road and point overlays, in drawing order.
    #[must_use]
    pub fn overlays(&self) -> &[Trace] {
        &self.figure.data[1..]
    }

    /// Number of accident markers drawn.
    #[must_use]
    pub fn marker_count(&self) -> usize {
        self.overlays()
            .iter()
            .filter_map(|t| match t {
                Trace::Scattergeo(s) if s.mode == ScatterMode::Markers => Some(s.point_count()),
                _ => None,
            })
            .sum()
    }

    /// The visible extent.
    #[must_use]
    pub const fn viewport(&self) -> BoundingBox {
        let geo = &self.figure.layout.geo;
        BoundingBox::new(
            geo.lonaxis.range[0],
            geo.lataxis.range[0],
            geo.lonaxis.range[1],
            geo.lataxis.range[1],
        )
    }
}

/// Builds a [`MapFigure`] from a base layer and optional overlays.
///
/// Cloning a configured builder is how the grid stamps out one figure per
/// cell.
#[derive(Debug, Clone)]
pub struct MapFigureBuilder<'a> {
    base: BaseLayer<'a>,
    fallback: BoundingBox,
    projection: Projection,
    title: Option<String>,
    roads: Option<(&'a RoadNetwork, LineStyle)>,
    points: Vec<(f64, f64)>,
}

impl<'a> MapFigureBuilder<'a> {
    /// Creates a builder drawing `base`, falling back to `preset` when
    /// there is nothing to fit, in the preset's usual projection.
    #[must_use]
    pub const fn new(base: BaseLayer<'a>, preset: ViewportPreset) -> Self {
        Self {
            base,
            fallback: preset.bounds(),
            projection: preset.default_projection(),
            title: None,
            roads: None,
            points: Vec::new(),
        }
    }

    /// Overrides the projection.
    #[must_use]
    pub const fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    /// Sets the figure title. Titled figures reserve a top margin.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Clears any title set before, along with its top margin.
    #[must_use]
    pub fn without_title(mut self) -> Self {
        self.title = None;
        self
    }

    /// Draws `network` as lines in the given color and width.
    #[must_use]
    pub fn with_roads(mut self, network: &'a RoadNetwork, color: &str, width: f64) -> Self {
        self.roads = Some((
            network,
            LineStyle {
                color: color.to_string(),
                width,
            },
        ));
        self
    }

    /// Sets the accident points as `(lon, lat)` pairs, replacing any set
    /// before.
    #[must_use]
    pub fn with_points(mut self, points: impl IntoIterator<Item = (f64, f64)>) -> Self {
        self.points = points.into_iter().collect();
        self
    }

    /// Assembles the figure. An empty point series yields a figure with no
    /// marker trace; that is a normal result.
    #[must_use]
    pub fn build(self) -> MapFigure {
        let viewport = self.viewport();
        let (center_lon, center_lat) = viewport.center();

        let mut data = vec![Trace::Choropleth(self.base.trace())];

        if let Some((network, style)) = &self.roads
            && !network.is_empty()
        {
            data.push(Trace::Scattergeo(road_trace(network, style.clone())));
        }

        if !self.points.is_empty() {
            data.push(Trace::Scattergeo(point_trace(&self.points)));
        }

        let states_base = matches!(self.base, BaseLayer::States);

        let layout = Layout {
            margin: Margin::top(if self.title.is_some() { TITLE_MARGIN } else { 0 }),
            title: self.title.map(|text| Title { text }),
            geo: Geo {
                projection: GeoProjection {
                    kind: self.projection,
                },
                scope: self.projection.scope().map(str::to_string),
                center: GeoCenter {
                    lat: center_lat,
                    lon: center_lon,
                },
                lataxis: GeoAxis {
                    range: viewport.lat_range(),
                },
                lonaxis: GeoAxis {
                    range: viewport.lon_range(),
                },
                showframe: false,
                showcoastlines: false,
                showland: states_base,
                landcolor: LAND_COLOR.to_string(),
                showlakes: false,
                showcountries: false,
                showocean: false,
            },
            showlegend: false,
        };

        MapFigure {
            figure: Figure { data, layout },
        }
    }

    /// Extent of everything drawn on a region base layer, padded; the
    /// fallback for the state outlines or when there is no geometry.
    fn viewport(&self) -> BoundingBox {
        let BaseLayer::Regions(boundaries) = self.base else {
            return self.fallback;
        };

        [
            boundaries.bounds(),
            self.roads.as_ref().and_then(|(network, _)| network.bounds()),
            BoundingBox::from_points(self.points.iter().copied()),
        ]
        .into_iter()
        .flatten()
        .reduce(|acc, b| acc.union(&b))
        .map_or(self.fallback, |extent| {
            extent.padded(VIEWPORT_PADDING, MIN_PADDING_DEGREES)
        })
    }
}

fn point_trace(points: &[(f64, f64)]) -> ScatterGeoTrace {
    ScatterGeoTrace {
        lon: points.iter().map(|(lon, _)| Some(*lon)).collect(),
        lat: points.iter().map(|(_, lat)| Some(*lat)).collect(),
        mode: ScatterMode::Markers,
        marker: Some(MarkerStyle {
            size: MARKER_SIZE,
            color: MARKER_COLOR.to_string(),
            opacity: MARKER_OPACITY,
        }),
        line: None,
        hoverinfo: "skip".to_string(),
        showlegend: false,
    }
}

/// One trace for the whole network, with a `null` gap between lines.
fn road_trace(network: &RoadNetwork, style: LineStyle) -> ScatterGeoTrace {
    let mut lon = Vec::new();
    let mut lat = Vec::new();

    for (i, line) in network.lines().iter().enumerate() {
        if i > 0 {
            lon.push(None);
            lat.push(None);
        }
        for coord in &line.0 {
            lon.push(Some(coord.x));
            lat.push(Some(coord.y));
        }
    }

    ScatterGeoTrace {
        lon,
        lat,
        mode: ScatterMode::Lines,
        marker: None,
        line: Some(style),
        hoverinfo: "none".to_string(),
        showlegend: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COUNTIES: &str = r#"{"type": "FeatureCollection", "features": [
        {"type": "Feature", "properties": {"name": "Kern"},
         "geometry": {"type": "Polygon", "coordinates":
            [[[-119.0, 35.0], [-118.0, 35.0], [-118.0, 36.0], [-119.0, 36.0], [-119.0, 35.0]]]}},
        {"type": "Feature", "properties": {"name": "Inyo"},
         "geometry": {"type": "Polygon", "coordinates":
            [[[-118.0, 36.0], [-117.0, 36.0], [-117.0, 37.0], [-118.0, 37.0], [-118.0, 36.0]]]}}
    ]}"#;

    const ROADS: &str = r#"{"type": "FeatureCollection", "features": [
        {"type": "Feature", "properties": {},
         "geometry": {"type": "LineString", "coordinates": [[-119.0, 35.0], [-118.5, 35.5]]}},
        {"type": "Feature", "properties": {},
         "geometry": {"type": "LineString", "coordinates": [[-118.0, 36.0], [-117.5, 36.5]]}}
    ]}"#;

    fn counties() -> BoundaryCollection {
        BoundaryCollection::from_geojson_str(COUNTIES).unwrap()
    }

    #[test]
    fn empty_points_give_base_layer_only() {
        let boundaries = counties();
        let figure =
            MapFigureBuilder::new(BaseLayer::Regions(&boundaries), ViewportPreset::California)
                .with_points(std::iter::empty())
                .build();

        assert!(figure.overlays().is_empty());
        assert_eq!(figure.marker_count(), 0);
        assert_eq!(figure.base_layer().locations, vec!["Kern", "Inyo"]);
        assert_eq!(figure.base_layer().z, vec![1.0, 1.0]);
    }

    #[test]
    fn base_layer_is_uniform_context() {
        let boundaries = counties();
        let figure =
            MapFigureBuilder::new(BaseLayer::Regions(&boundaries), ViewportPreset::California)
                .build();
        let base = figure.base_layer();

        assert!(!base.showscale);
        assert!(base.colorscale.iter().all(|(_, color)| color == BASE_FILL));
        assert_eq!(base.marker.line.color, OUTLINE_COLOR);
        assert!((base.marker.line.width - OUTLINE_WIDTH).abs() < f64::EPSILON);
        assert_eq!(base.featureidkey.as_deref(), Some("properties.name"));
        assert!(base.geojson.is_some());
    }

    #[test]
    fn points_are_uniform_red_markers() {
        let boundaries = counties();
        let figure =
            MapFigureBuilder::new(BaseLayer::Regions(&boundaries), ViewportPreset::California)
                .with_points([(-118.5, 35.5), (-117.5, 36.5)])
                .build();

        assert_eq!(figure.overlays().len(), 1);
        assert_eq!(figure.marker_count(), 2);
        let Trace::Scattergeo(points) = &figure.overlays()[0] else {
            panic!("expected a scattergeo overlay");
        };
        let marker = points.marker.as_ref().unwrap();
        assert_eq!(marker.color, MARKER_COLOR);
        assert!((marker.size - MARKER_SIZE).abs() < f64::EPSILON);
        assert!((marker.opacity - MARKER_OPACITY).abs() < f64::EPSILON);
        assert_eq!(points.hoverinfo, "skip");
    }

    #[test]
    fn roads_share_one_trace_with_gaps() {
        let boundaries = counties();
        let roads = RoadNetwork::from_geojson_str(ROADS).unwrap();
        let figure =
            MapFigureBuilder::new(BaseLayer::Regions(&boundaries), ViewportPreset::California)
                .with_roads(&roads, "gray", 0.5)
                .with_points([(-118.5, 35.5)])
                .build();

        assert_eq!(figure.overlays().len(), 2);
        let Trace::Scattergeo(lines) = &figure.overlays()[0] else {
            panic!("roads must be drawn below points");
        };
        assert_eq!(lines.mode, ScatterMode::Lines);
        assert_eq!(lines.lon.len(), 5);
        assert_eq!(lines.lon[2], None);
        assert_eq!(figure.marker_count(), 1);
    }

    #[test]
    fn viewport_fits_regions() {
        let boundaries = counties();
        let figure =
            MapFigureBuilder::new(BaseLayer::Regions(&boundaries), ViewportPreset::California)
                .build();
        let viewport = figure.viewport();

        assert!(viewport.west < -119.0 && viewport.west > -119.5);
        assert!(viewport.north > 37.0 && viewport.north < 37.5);
    }

    #[test]
    fn viewport_includes_points_outside_regions() {
        let boundaries = counties();
        let figure =
            MapFigureBuilder::new(BaseLayer::Regions(&boundaries), ViewportPreset::California)
                .with_points([(-122.0, 38.0)])
                .build();
        assert!(figure.viewport().contains(-122.0, 38.0));
    }

    #[test]
    fn state_outlines_use_fallback_viewport() {
        let figure = MapFigureBuilder::new(BaseLayer::States, ViewportPreset::ContinentalUs)
            .with_points([(-118.0, 34.0)])
            .build();

        assert_eq!(figure.viewport(), ViewportPreset::ContinentalUs.bounds());
        let base = figure.base_layer();
        assert_eq!(base.locationmode.as_deref(), Some("USA-states"));
        assert_eq!(base.locations.len(), states::STATES.len());
        assert!(base.geojson.is_none());

        let geo = &figure.figure().layout.geo;
        assert_eq!(geo.projection.kind, Projection::AlbersUsa);
        assert_eq!(geo.scope.as_deref(), Some("usa"));
        assert!(geo.showland);
    }

    #[test]
    fn title_reserves_margin() {
        let titled = MapFigureBuilder::new(BaseLayer::States, ViewportPreset::California)
            .with_title("California")
            .build();
        assert_eq!(titled.figure().layout.margin.t, TITLE_MARGIN);
        assert_eq!(
            titled.figure().layout.title.as_ref().map(|t| t.text.as_str()),
            Some("California")
        );

        let untitled = MapFigureBuilder::new(BaseLayer::States, ViewportPreset::California).build();
        assert_eq!(untitled.figure().layout.margin, Margin::default());
        assert!(untitled.figure().layout.title.is_none());
    }

    #[test]
    fn serializes_to_plotly_json() {
        let figure = MapFigureBuilder::new(BaseLayer::States, ViewportPreset::California)
            .with_points([(-118.0, 34.0)])
            .build();
        let json = serde_json::to_value(&figure).unwrap();

        assert_eq!(json["data"][0]["type"], "choropleth");
        assert_eq!(json["data"][1]["type"], "scattergeo");
        assert_eq!(json["layout"]["geo"]["projection"]["type"], "mercator");
        assert_eq!(
            json["layout"]["geo"]["lataxis"]["range"],
            serde_json::json!([32.0, 42.0])
        );
    }
}
