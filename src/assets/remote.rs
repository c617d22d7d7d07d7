/// Remote catalog and style image transport
///
/// ureq is blocking, so every request runs on tokio's blocking pool and the
/// result is awaited from an iced task. There is no timeout and no retry:
/// a request that never answers keeps the catalog loading.

use serde::Deserialize;
use std::collections::HashSet;
use std::io::Read;
use tracing::{debug, info};

use crate::errors::FetchError;
use crate::state::data::{EntryId, EyewearEntry, ImageRef, StyleImage};

/// Upper bound on a downloaded style image
const MAX_IMAGE_BYTES: u64 = 16 * 1024 * 1024;

/// One element of the catalog JSON array
#[derive(Debug, Deserialize)]
struct WireEntry {
    id: String,
    name: String,
    url: String,
    #[serde(default)]
    price: Option<String>,
}

/// Fetch and parse the catalog list
pub async fn fetch_catalog(endpoint: String) -> Result<Vec<EyewearEntry>, FetchError> {
    tokio::task::spawn_blocking(move || fetch_catalog_blocking(&endpoint))
        .await
        .map_err(|e| FetchError::Task(e.to_string()))?
}

fn fetch_catalog_blocking(endpoint: &str) -> Result<Vec<EyewearEntry>, FetchError> {
    info!(endpoint, "fetching eyewear catalog");
    let body = get(endpoint)?
        .into_string()
        .map_err(|e| FetchError::Transport {
            url: endpoint.to_string(),
            reason: e.to_string(),
        })?;
    parse_catalog(&body)
}

/// Parse a catalog payload.
///
/// Any entry missing `id`, `name` or `url`, carrying a non-string price, or
/// repeating an earlier id makes the whole payload malformed.
pub fn parse_catalog(body: &str) -> Result<Vec<EyewearEntry>, FetchError> {
    let wire: Vec<WireEntry> =
        serde_json::from_str(body).map_err(|e| FetchError::Malformed(e.to_string()))?;

    let mut seen = HashSet::new();
    let mut entries = Vec::with_capacity(wire.len());
    for (index, entry) in wire.into_iter().enumerate() {
        if entry.id.trim().is_empty() || entry.name.trim().is_empty() || entry.url.trim().is_empty() {
            return Err(FetchError::Malformed(format!(
                "entry {} has an empty id, name or url",
                index
            )));
        }
        if !seen.insert(entry.id.clone()) {
            return Err(FetchError::Malformed(format!(
                "duplicate id {:?} at entry {}",
                entry.id, index
            )));
        }
        entries.push(EyewearEntry {
            id: EntryId::new(entry.id),
            name: entry.name,
            price: entry.price,
            image: ImageRef::Remote(entry.url),
        });
    }

    debug!(count = entries.len(), "parsed catalog payload");
    Ok(entries)
}

/// Download a style image; SVG stays vector, everything else is decoded
pub async fn fetch_image(url: String) -> Result<StyleImage, FetchError> {
    tokio::task::spawn_blocking(move || fetch_image_blocking(&url))
        .await
        .map_err(|e| FetchError::Task(e.to_string()))?
}

fn fetch_image_blocking(url: &str) -> Result<StyleImage, FetchError> {
    debug!(url, "fetching style image");
    let response = get(url)?;
    let content_type = response.content_type().to_string();
    let bytes = read_limited(response.into_reader(), MAX_IMAGE_BYTES, url)?;

    StyleImage::from_bytes(&bytes, Some(&content_type)).map_err(|e| FetchError::Decode {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

/// Read a whole body, failing instead of truncating past `limit` bytes
fn read_limited(reader: impl Read, limit: u64, url: &str) -> Result<Vec<u8>, FetchError> {
    let mut bytes = Vec::new();
    reader
        .take(limit + 1)
        .read_to_end(&mut bytes)
        .map_err(|e| FetchError::Transport {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    if bytes.len() as u64 > limit {
        return Err(FetchError::TooLarge {
            url: url.to_string(),
            limit,
        });
    }
    Ok(bytes)
}

fn get(url: &str) -> Result<ureq::Response, FetchError> {
    match ureq::get(url).call() {
        Ok(response) => Ok(response),
        Err(ureq::Error::Status(status, _)) => Err(FetchError::Status {
            url: url.to_string(),
            status,
        }),
        Err(ureq::Error::Transport(transport)) => Err(FetchError::Transport {
            url: url.to_string(),
            reason: transport.to_string(),
        }),
    }
}
