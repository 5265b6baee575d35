use std::time::Duration;

use thiserror::Error;
use tokio::time::timeout;
use tracing::{info, warn};

use crate::model::catalog::QuoteCatalog;

/// Upper bound on the remote catalog fetch; past it the bundled copy wins.
pub const CATALOG_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Quote data request took too long")]
    Timeout,
    #[error("Request failed: {0}")]
    Http(String),
    #[error("Invalid data structure")]
    InvalidData,
}

fn ensure_valid(catalog: QuoteCatalog) -> Result<QuoteCatalog, CatalogError> {
    if catalog.steps.is_empty() {
        return Err(CatalogError::InvalidData);
    }
    Ok(catalog)
}

/// Fetch the wizard catalog from a remote endpoint, bounded by
/// [`CATALOG_FETCH_TIMEOUT`].
pub async fn fetch_catalog(
    client: &reqwest::Client,
    url: &str,
) -> Result<QuoteCatalog, CatalogError> {
    let fetch = async {
        let response = client
            .get(url)
            .send()
            .await
            .map_err(|e| CatalogError::Http(e.to_string()))?;
        if !response.status().is_success() {
            return Err(CatalogError::Http(format!(
                "Unexpected status: {}",
                response.status()
            )));
        }
        let catalog: QuoteCatalog = response
            .json()
            .await
            .map_err(|_| CatalogError::InvalidData)?;
        ensure_valid(catalog)
    };
    timeout(CATALOG_FETCH_TIMEOUT, fetch)
        .await
        .map_err(|_| CatalogError::Timeout)?
}

/// Load the catalog for serving: try the remote source when configured,
/// fall back to the bundled copy on any failure. The bundled catalog is
/// validated the same way the remote one is.
pub async fn load_catalog(
    client: &reqwest::Client,
    remote_url: Option<&str>,
) -> Result<QuoteCatalog, CatalogError> {
    if let Some(url) = remote_url {
        match fetch_catalog(client, url).await {
            Ok(catalog) => {
                info!(url = %url, "Loaded quote catalog from remote source");
                return Ok(catalog);
            }
            Err(e) => {
                warn!(url = %url, "Remote catalog unavailable, using bundled copy: {}", e);
            }
        }
    }
    let bundled = QuoteCatalog::bundled().map_err(|_| CatalogError::InvalidData)?;
    ensure_valid(bundled)
}
