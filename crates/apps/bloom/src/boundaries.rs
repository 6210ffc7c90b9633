use std::path::PathBuf;

use formats::{BoundaryCollection, BoundaryError};
use reqwest::Client;

pub const DEFAULT_BOUNDARIES_URL: &str =
    "https://raw.githubusercontent.com/johan/world.geo.json/master/countries.geo.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundarySource {
    Url(String),
    Path(PathBuf),
    /// Run without polygons.
    Disabled,
}

impl BoundarySource {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("none") {
            BoundarySource::Disabled
        } else if raw.starts_with("http://") || raw.starts_with("https://") {
            BoundarySource::Url(raw.to_string())
        } else {
            BoundarySource::Path(PathBuf::from(raw))
        }
    }
}

impl std::fmt::Display for BoundarySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoundarySource::Url(url) => write!(f, "{url}"),
            BoundarySource::Path(path) => write!(f, "{}", path.display()),
            BoundarySource::Disabled => write!(f, "(disabled)"),
        }
    }
}

#[derive(Debug)]
pub enum BoundaryLoadError {
    Http(reqwest::Error),
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Format(BoundaryError),
}

impl std::fmt::Display for BoundaryLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoundaryLoadError::Http(e) => write!(f, "boundary download failed: {e}"),
            BoundaryLoadError::Io { path, source } => {
                write!(f, "failed to read boundaries {}: {source}", path.display())
            }
            BoundaryLoadError::Format(e) => write!(f, "invalid boundary data: {e}"),
        }
    }
}

impl std::error::Error for BoundaryLoadError {}

/// One-shot startup fetch of the boundary collection.
pub async fn load_boundaries(
    client: &Client,
    source: &BoundarySource,
    name_property: &str,
) -> Result<BoundaryCollection, BoundaryLoadError> {
    let payload = match source {
        BoundarySource::Disabled => return Ok(BoundaryCollection::empty()),
        BoundarySource::Url(url) => client
            .get(url)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(BoundaryLoadError::Http)?
            .text()
            .await
            .map_err(BoundaryLoadError::Http)?,
        BoundarySource::Path(path) => {
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| BoundaryLoadError::Io {
                    path: path.clone(),
                    source,
                })?
        }
    };
    BoundaryCollection::from_geojson_str_with_property(&payload, name_property)
        .map_err(BoundaryLoadError::Format)
}
