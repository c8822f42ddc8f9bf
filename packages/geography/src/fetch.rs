//! Retrieval of raw `GeoJSON` documents.
//!
//! Boundaries come either from a static URL (the county outlines) or from
//! a file exported next to the accident data (road networks).

use std::path::Path;

use crate::GeoError;

/// Downloads a `GeoJSON` document from `url`.
///
/// # Errors
///
/// Returns [`GeoError`] if the request fails or the server responds with
/// a non-success status.
pub async fn fetch_geojson(client: &reqwest::Client, url: &str) -> Result<String, GeoError> {
    log::info!("Fetching GeoJSON from {url}");

    let resp = client.get(url).send().await?;
    if !resp.status().is_success() {
        return Err(GeoError::Conversion {
            message: format!("GeoJSON request failed with status {}", resp.status()),
        });
    }
    let body = resp.text().await?;

    log::debug!("Downloaded {} bytes from {url}", body.len());
    Ok(body)
}

/// Reads a `GeoJSON` document from a local file.
///
/// # Errors
///
/// Returns [`GeoError`] if the file cannot be read.
pub async fn read_geojson(path: &Path) -> Result<String, GeoError> {
    log::info!("Reading GeoJSON from {}", path.display());
    Ok(tokio::fs::read_to_string(path).await?)
}
