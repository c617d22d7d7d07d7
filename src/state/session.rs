/// One try-on session: a catalog plus a placement transform.
///
/// Sessions share no state, so tests can create as many as they like.

use super::catalog::Catalog;
use super::transform::TransformController;
use crate::config::AppConfig;

/// Where the initial catalog comes from.
///
/// Chosen once per build: the `remote-catalog` feature switches from the
/// built-in list to the configured endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// Fixed list compiled into the binary
    Builtin,
    /// JSON list served over HTTP
    Remote { endpoint: String },
}

impl CatalogSource {
    /// Resolve the strategy for this build
    pub fn for_build(config: &AppConfig) -> Self {
        if cfg!(feature = "remote-catalog") {
            Self::Remote {
                endpoint: config.catalog_endpoint.trim().to_string(),
            }
        } else {
            Self::Builtin
        }
    }
}

#[derive(Debug)]
pub struct Session {
    /// Styles and the active selection
    pub catalog: Catalog,
    /// Overlay placement
    pub transform: TransformController,
    source: CatalogSource,
}

impl Session {
    /// Start a session. Remote sources begin in the loading state; the caller
    /// issues the fetch and hands the result to `Catalog::complete_remote_load`.
    pub fn start(source: &CatalogSource) -> Self {
        let catalog = match source {
            CatalogSource::Builtin => Catalog::with_defaults(),
            CatalogSource::Remote { .. } => {
                let mut catalog = Catalog::loading();
                catalog.begin_remote_load();
                catalog
            }
        };

        Self {
            catalog,
            transform: TransformController::new(),
            source: source.clone(),
        }
    }

    /// Endpoint to fetch, while the catalog still waits for it
    pub fn remote_endpoint(&self) -> Option<&str> {
        match &self.source {
            CatalogSource::Remote { endpoint } if self.catalog.is_loading() => Some(endpoint),
            _ => None,
        }
    }
}
