//! CSV ingestion of accident records.
//!
//! Reads the `Start_Lat`, `Start_Lng`, `State` and `Severity` columns plus
//! the seven road feature columns by header name; every other column is
//! ignored. Rows whose coordinates, severity or flags cannot be parsed are
//! skipped and counted rather than failing the whole load.
//!
//! A latitude or longitude of exactly `0` is the table's placeholder for
//! an ungeocoded accident, so such rows are skipped as well. No US
//! accident lies on the equator or the prime meridian.

use std::io::Read;
use std::path::Path;

use accident_map_accident_models::{AccidentRecord, FeatureFlags, RoadFeature, Severity};

use crate::DatasetError;

/// Latitude column.
pub const LAT_COLUMN: &str = "Start_Lat";
/// Longitude column.
pub const LNG_COLUMN: &str = "Start_Lng";
/// State abbreviation column.
pub const STATE_COLUMN: &str = "State";
/// Severity column.
pub const SEVERITY_COLUMN: &str = "Severity";

/// Header positions of every column the ingest reads.
struct Columns {
    lat: usize,
    lng: usize,
    state: usize,
    severity: usize,
    features: Vec<(RoadFeature, usize)>,
}

impl Columns {
    fn locate(headers: &csv::StringRecord) -> Result<Self, DatasetError> {
        let find = |column: &'static str| {
            headers
                .iter()
                .position(|h| h.trim() == column)
                .ok_or(DatasetError::MissingColumn { column })
        };

        let features = RoadFeature::all()
            .iter()
            .map(|f| find(f.column()).map(|idx| (*f, idx)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            lat: find(LAT_COLUMN)?,
            lng: find(LNG_COLUMN)?,
            state: find(STATE_COLUMN)?,
            severity: find(SEVERITY_COLUMN)?,
            features,
        })
    }

    fn parse(&self, row: &csv::StringRecord) -> Option<AccidentRecord> {
        let field = |idx: usize| row.get(idx).map(str::trim);

        let (latitude, longitude) = parse_lat_lng(field(self.lat)?, field(self.lng)?)?;
        let severity = parse_severity(field(self.severity)?)?;
        let state = field(self.state)?.to_string();

        let mut features = FeatureFlags::empty();
        for (feature, idx) in &self.features {
            features = features.with(*feature, parse_flag(field(*idx)?)?);
        }

        Some(AccidentRecord {
            latitude,
            longitude,
            state,
            severity,
            features,
        })
    }
}

/// Reads accident records from CSV data with a header row.
///
/// # Errors
///
/// Returns [`DatasetError`] if the CSV is malformed or a required column
/// is missing from the header.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<AccidentRecord>, DatasetError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let columns = Columns::locate(reader.headers()?)?;

    let mut records = Vec::new();
    let mut skipped = 0u64;

    for result in reader.records() {
        let row = result?;
        match columns.parse(&row) {
            Some(record) => records.push(record),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        log::warn!("Skipped {skipped} accident rows with missing or invalid fields");
    }
    log::info!("Parsed {} accident records", records.len());

    Ok(records)
}

/// Reads accident records from a CSV file.
///
/// # Errors
///
/// Returns [`DatasetError`] if the file cannot be opened or parsed.
pub fn load_records(path: &Path) -> Result<Vec<AccidentRecord>, DatasetError> {
    log::info!("Loading accident records from {}", path.display());
    let file = std::fs::File::open(path).map_err(csv::Error::from)?;
    read_records(std::io::BufReader::new(file))
}

/// Parses a coordinate pair. Returns `None` if either value is
/// unparseable, out of range, or zero.
fn parse_lat_lng(lat: &str, lng: &str) -> Option<(f64, f64)> {
    let latitude = lat.parse::<f64>().ok()?;
    let longitude = lng.parse::<f64>().ok()?;
    if latitude == 0.0 || longitude == 0.0 {
        return None;
    }
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return None;
    }
    Some((latitude, longitude))
}

/// Parses a severity cell. Accepts integral floats (`"2.0"`) since some
/// exports write every numeric column as float.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_severity(s: &str) -> Option<Severity> {
    let value = s.parse::<u8>().ok().or_else(|| {
        let f = s.parse::<f64>().ok()?;
        (f.fract() == 0.0 && (1.0..=4.0).contains(&f)).then_some(f as u8)
    })?;
    Severity::from_value(value).ok()
}

/// Parses a boolean feature cell.
fn parse_flag(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" | "1.0" => Some(true),
        "false" | "0" | "0.0" => Some(false),
        _ => None,
    }
}
