#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Traffic accident record types, severity levels, and road feature flags.
//!
//! These types describe one row of the accident table after ingestion. The
//! set of road features is closed: every record carries exactly the seven
//! boolean flags defined by [`RoadFeature`], and the source column names
//! (`Give_Way`, `Traffic_Signal`, ...) are the canonical identifiers.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Severity level for an accident, from 1 (minor) to 4 (severe).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// Level 1: little impact on traffic
    Minor = 1,
    /// Level 2: short delays
    Moderate = 2,
    /// Level 3: significant delays
    Serious = 3,
    /// Level 4: long delays, road closures
    Severe = 4,
}

impl Severity {
    /// Returns the numeric value of this severity level.
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Creates a severity level from a numeric value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not in the range 1-4.
    pub const fn from_value(value: u8) -> Result<Self, InvalidSeverityError> {
        match value {
            1 => Ok(Self::Minor),
            2 => Ok(Self::Moderate),
            3 => Ok(Self::Serious),
            4 => Ok(Self::Severe),
            _ => Err(InvalidSeverityError { value }),
        }
    }

    /// Returns all severity levels in ascending order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Minor, Self::Moderate, Self::Serious, Self::Severe]
    }
}

/// Error returned when attempting to create a [`Severity`] from an invalid
/// numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidSeverityError {
    /// The invalid severity value that was provided.
    pub value: u8,
}

impl std::fmt::Display for InvalidSeverityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid severity value {}: expected 1-4", self.value)
    }
}

impl std::error::Error for InvalidSeverityError {}

/// Road conditions recorded as boolean columns on every accident row.
///
/// The string form (via `Display`/`FromStr`) is the exact source column
/// name. Parsing is case-sensitive and rejects anything outside the set.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum RoadFeature {
    /// Speed bump or hump
    Bump,
    /// Pedestrian or bicycle crossing
    Crossing,
    /// Give-way (yield) sign
    #[serde(rename = "Give_Way")]
    #[strum(serialize = "Give_Way")]
    GiveWay,
    /// Road junction
    Junction,
    /// Railway crossing
    Railway,
    /// Stop sign
    Stop,
    /// Traffic signal
    #[serde(rename = "Traffic_Signal")]
    #[strum(serialize = "Traffic_Signal")]
    TrafficSignal,
}

impl RoadFeature {
    /// Returns the source column name for this feature.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Bump => "Bump",
            Self::Crossing => "Crossing",
            Self::GiveWay => "Give_Way",
            Self::Junction => "Junction",
            Self::Railway => "Railway",
            Self::Stop => "Stop",
            Self::TrafficSignal => "Traffic_Signal",
        }
    }

    /// Returns the human-readable label used for grid row headings.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bump => "Bump",
            Self::Crossing => "Crossing",
            Self::GiveWay => "Give Way",
            Self::Junction => "Junction",
            Self::Railway => "Railway",
            Self::Stop => "Stop",
            Self::TrafficSignal => "Traffic Signal",
        }
    }

    /// Returns all variants of this enum in column order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Bump,
            Self::Crossing,
            Self::GiveWay,
            Self::Junction,
            Self::Railway,
            Self::Stop,
            Self::TrafficSignal,
        ]
    }

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// The set of [`RoadFeature`] flags that are true for one record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureFlags(u8);

impl FeatureFlags {
    /// An empty flag set.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Returns a copy of this set with `feature` set to `present`.
    #[must_use]
    pub const fn with(self, feature: RoadFeature, present: bool) -> Self {
        if present {
            Self(self.0 | feature.bit())
        } else {
            Self(self.0 & !feature.bit())
        }
    }

    /// Whether `feature` is present.
    #[must_use]
    pub const fn contains(self, feature: RoadFeature) -> bool {
        self.0 & feature.bit() != 0
    }

    /// Iterates over the features that are present, in column order.
    pub fn iter(self) -> impl Iterator<Item = RoadFeature> {
        RoadFeature::all()
            .iter()
            .copied()
            .filter(move |f| self.contains(*f))
    }
}

impl FromIterator<RoadFeature> for FeatureFlags {
    fn from_iter<T: IntoIterator<Item = RoadFeature>>(iter: T) -> Self {
        iter.into_iter()
            .fold(Self::empty(), |flags, feature| flags.with(feature, true))
    }
}

/// One accident row as loaded from the source table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccidentRecord {
    /// Latitude of the accident start point (`Start_Lat`).
    pub latitude: f64,
    /// Longitude of the accident start point (`Start_Lng`).
    pub longitude: f64,
    /// Two-letter state abbreviation (`State`).
    pub state: String,
    /// Severity level.
    pub severity: Severity,
    /// Road features present at the accident location.
    pub features: FeatureFlags,
}

impl AccidentRecord {
    /// Whether `feature` is present on this record.
    #[must_use]
    pub const fn has(&self, feature: RoadFeature) -> bool {
        self.features.contains(feature)
    }
}
