//! The immutable per-process dataset.

use std::path::Path;

use accident_map_accident_models::AccidentRecord;
use accident_map_dataset_models::{BoundaryConfig, MapSource, RecordsConfig};
use accident_map_geography::fetch::{fetch_geojson, read_geojson};
use accident_map_geography::{BoundaryCollection, RoadNetwork};

use crate::{DatasetError, ingest, sample};

/// Everything one dashboard draws, loaded once at startup.
///
/// There are no mutating methods: after construction the context is only
/// ever shared by reference.
#[derive(Debug, Clone)]
pub struct DatasetContext {
    source: MapSource,
    records: Vec<AccidentRecord>,
    boundaries: Option<BoundaryCollection>,
    roads: Option<RoadNetwork>,
}

impl DatasetContext {
    /// Assembles a context from already-loaded parts.
    ///
    /// `boundaries` of `None` means the base layer is the built-in US state
    /// outlines.
    #[must_use]
    pub const fn new(
        source: MapSource,
        records: Vec<AccidentRecord>,
        boundaries: Option<BoundaryCollection>,
        roads: Option<RoadNetwork>,
    ) -> Self {
        Self {
            source,
            records,
            boundaries,
            roads,
        }
    }

    /// Loads every input `source` names. Relative paths resolve against
    /// `data_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if any input cannot be read, fetched or
    /// parsed, or if the sampling parameters are invalid.
    pub async fn load(
        source: MapSource,
        data_dir: &Path,
        client: &reqwest::Client,
    ) -> Result<Self, DatasetError> {
        log::info!("Loading map source '{}'", source.id);

        let records = match &source.records {
            Some(config) => load_records(config, data_dir)?,
            None => Vec::new(),
        };

        let boundaries = match &source.boundaries {
            BoundaryConfig::UsStates => None,
            BoundaryConfig::GeojsonUrl { url } => {
                let body = fetch_geojson(client, url).await?;
                Some(BoundaryCollection::from_geojson_str(&body)?)
            }
            BoundaryConfig::GeojsonFile { path } => {
                let body = read_geojson(&data_dir.join(path)).await?;
                Some(BoundaryCollection::from_geojson_str(&body)?)
            }
        };
        if let Some(boundaries) = &boundaries {
            log::info!("Loaded {} region boundaries", boundaries.len());
        }

        let roads = match &source.roads {
            Some(config) => {
                let body = read_geojson(&data_dir.join(&config.path)).await?;
                Some(RoadNetwork::from_geojson_str(&body)?)
            }
            None => None,
        };

        Ok(Self::new(source, records, boundaries, roads))
    }

    /// The source definition this context was loaded from.
    #[must_use]
    pub const fn source(&self) -> &MapSource {
        &self.source
    }

    /// The loaded (filtered and sampled) accident records.
    #[must_use]
    pub fn records(&self) -> &[AccidentRecord] {
        &self.records
    }

    /// Region boundaries, or `None` when the base layer is the US state
    /// outlines.
    #[must_use]
    pub const fn boundaries(&self) -> Option<&BoundaryCollection> {
        self.boundaries.as_ref()
    }

    /// Road network overlay, if the source has one.
    #[must_use]
    pub const fn roads(&self) -> Option<&RoadNetwork> {
        self.roads.as_ref()
    }
}

fn load_records(
    config: &RecordsConfig,
    data_dir: &Path,
) -> Result<Vec<AccidentRecord>, DatasetError> {
    let mut records = ingest::load_records(&data_dir.join(&config.path))?;
    if let Some(state) = &config.state {
        records = sample::select_state(records, state);
    }
    sample::sample(records, config.sample_fraction, config.seed)
}
