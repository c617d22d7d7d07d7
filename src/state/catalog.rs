use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::data::{EntryId, EyewearEntry, ImageRef, LocalImage};
use crate::errors::FetchError;

/// Process-wide upload sequence, so ids never repeat even within one millisecond
static UPLOAD_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Built-in styles used when no remote catalog is configured
const DEFAULT_STYLES: [(&str, &str, &str); 3] = [
    (
        "blue-frame",
        "Blue Frame",
        "https://www.kp2020.org/images/frames-blue.svg",
    ),
    (
        "finley-red",
        "Finley Red",
        "https://cdn.shopify.com/s/files/1/1147/9910/products/FINLEY_RED_21_SOLIDCLASSIC_3D_e3a5e7fa-872c-4ec7-97d5-55e2c48e6c92.png",
    ),
    (
        "murphy",
        "Murphy Heat",
        "https://cdn.shopify.com/s/files/1/1147/9910/files/MURPHY_HEATSPLATTER_22_NBA_3D.png",
    ),
];

/// Whether the catalog has finished loading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// A remote fetch is in flight; no entries, no selection
    Loading,
    /// Entries are final (possibly empty); uploads may append
    Ready,
}

/// The Catalog owns the selectable eyewear styles and the current selection.
///
/// Entries are append-only, so the selection is kept as an index.
#[derive(Debug)]
pub struct Catalog {
    entries: Vec<EyewearEntry>,
    selected: Option<usize>,
    state: LoadState,
}

impl Catalog {
    /// Create a catalog populated with the built-in styles
    pub fn with_defaults() -> Self {
        let mut catalog = Self::loading();
        catalog.initialize_default();
        catalog
    }

    /// Create an empty catalog waiting for a remote fetch
    pub fn loading() -> Self {
        Self {
            entries: Vec::new(),
            selected: None,
            state: LoadState::Loading,
        }
    }

    /// Replace the contents with the built-in styles and select the first
    pub fn initialize_default(&mut self) {
        self.entries = DEFAULT_STYLES
            .iter()
            .map(|(id, name, url)| EyewearEntry::remote(id, name, url))
            .collect();
        self.selected = Some(0);
        self.state = LoadState::Ready;
    }

    /// Enter the loading state before a remote fetch is issued
    pub fn begin_remote_load(&mut self) {
        self.entries.clear();
        self.selected = None;
        self.state = LoadState::Loading;
    }

    /// Resolve an in-flight remote fetch.
    ///
    /// A failure leaves the catalog empty but ready; it is never retried and
    /// never falls back to the built-in styles.
    pub fn complete_remote_load(&mut self, result: Result<Vec<EyewearEntry>, FetchError>) {
        if self.state != LoadState::Loading {
            debug!("ignoring catalog response received outside of loading");
            return;
        }

        match result {
            Ok(entries) => {
                info!(count = entries.len(), "remote catalog loaded");
                self.selected = if entries.is_empty() { None } else { Some(0) };
                self.entries = entries;
            }
            Err(err) => {
                warn!(error = %err, "catalog fetch failed, continuing with an empty catalog");
                self.entries.clear();
                self.selected = None;
            }
        }
        self.state = LoadState::Ready;
    }

    /// Select the following entry, wrapping to the first
    pub fn select_next(&mut self) {
        let len = self.entries.len();
        if len < 2 {
            return;
        }
        if let Some(index) = self.selected {
            self.selected = Some((index + 1) % len);
        }
    }

    /// Select the preceding entry, wrapping to the last
    pub fn select_previous(&mut self) {
        let len = self.entries.len();
        if len < 2 {
            return;
        }
        if let Some(index) = self.selected {
            self.selected = Some((index + len - 1) % len);
        }
    }

    /// Select the entry with the given id.
    /// Returns false (and keeps the current selection) when no entry matches.
    pub fn select_by_id(&mut self, id: &str) -> bool {
        match self.entries.iter().position(|entry| entry.id.as_str() == id) {
            Some(index) => {
                self.selected = Some(index);
                true
            }
            None => {
                debug!(id, "no catalog entry with this id");
                false
            }
        }
    }

    /// Append a user upload and select it.
    /// Refused while the remote catalog is still loading.
    pub fn add_uploaded(&mut self, display_name: String, image: LocalImage) -> Option<&EyewearEntry> {
        if self.state == LoadState::Loading {
            debug!("upload ignored while the catalog is loading");
            return None;
        }

        let id = self.fresh_upload_id();
        info!(%id, name = %display_name, file = %image.file_name, "adding uploaded style");
        self.entries.push(EyewearEntry {
            id,
            name: display_name,
            price: None,
            image: ImageRef::Local(Arc::new(image)),
        });
        let index = self.entries.len() - 1;
        self.selected = Some(index);
        self.entries.get(index)
    }

    fn fresh_upload_id(&self) -> EntryId {
        let millis = Utc::now().timestamp_millis();
        loop {
            let sequence = UPLOAD_SEQUENCE.fetch_add(1, Ordering::Relaxed);
            let candidate = format!("custom-{}-{}", millis, sequence);
            if !self.contains_id(&candidate) {
                return EntryId::new(candidate);
            }
        }
    }

    fn contains_id(&self, id: &str) -> bool {
        self.entries.iter().any(|entry| entry.id.as_str() == id)
    }

    /// All entries in insertion order
    pub fn entries(&self) -> &[EyewearEntry] {
        &self.entries
    }

    /// The currently selected entry
    pub fn selected(&self) -> Option<&EyewearEntry> {
        self.selected.and_then(|index| self.entries.get(index))
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn load_state(&self) -> LoadState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.load_state() == LoadState::Loading
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::DecodedImage;

    fn upload(file_name: &str) -> LocalImage {
        LocalImage {
            file_name: file_name.to_string(),
            image: DecodedImage::from_rgba(image::RgbaImage::new(2, 1)),
        }
    }

    fn ready_catalog(ids: &[&str]) -> Catalog {
        let mut catalog = Catalog::loading();
        catalog.complete_remote_load(Ok(ids
            .iter()
            .map(|id| EyewearEntry::remote(id, id, "https://example.com/x.png"))
            .collect()));
        catalog
    }

    fn selected_id(catalog: &Catalog) -> Option<String> {
        catalog.selected().map(|entry| entry.id.to_string())
    }

    #[test]
    fn test_defaults_select_first() {
        let catalog = Catalog::with_defaults();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.load_state(), LoadState::Ready);
        assert_eq!(selected_id(&catalog).as_deref(), Some("blue-frame"));
        assert!(catalog.entries().iter().all(|e| e.price.is_none()));
    }

    #[test]
    fn test_next_cycles_back_to_start() {
        for start in 0..3 {
            let mut catalog = ready_catalog(&["a", "b", "c"]);
            catalog.select_by_id(["a", "b", "c"][start]);
            let original = catalog.selected_index();
            for _ in 0..3 {
                catalog.select_next();
            }
            assert_eq!(catalog.selected_index(), original);
        }
    }

    #[test]
    fn test_previous_undoes_next() {
        let mut catalog = ready_catalog(&["a", "b", "c"]);
        catalog.select_by_id("c");
        catalog.select_next();
        assert_eq!(selected_id(&catalog).as_deref(), Some("a"));
        catalog.select_previous();
        assert_eq!(selected_id(&catalog).as_deref(), Some("c"));
    }

    #[test]
    fn test_previous_wraps_from_first() {
        let mut catalog = ready_catalog(&["a", "b", "c"]);
        catalog.select_previous();
        assert_eq!(selected_id(&catalog).as_deref(), Some("c"));
    }

    #[test]
    fn test_single_entry_navigation_is_idempotent() {
        let mut catalog = ready_catalog(&["only"]);
        catalog.select_next();
        catalog.select_previous();
        assert_eq!(selected_id(&catalog).as_deref(), Some("only"));
    }

    #[test]
    fn test_unknown_id_keeps_selection() {
        let mut catalog = ready_catalog(&["a", "b"]);
        catalog.select_by_id("b");
        assert!(!catalog.select_by_id("missing"));
        assert_eq!(selected_id(&catalog).as_deref(), Some("b"));
    }

    #[test]
    fn test_empty_catalog_operations_are_inert() {
        let mut catalog = ready_catalog(&[]);
        catalog.select_next();
        catalog.select_previous();
        assert!(!catalog.select_by_id("anything"));
        assert!(catalog.is_empty());
        assert!(catalog.selected().is_none());
        assert_eq!(catalog.load_state(), LoadState::Ready);
    }

    #[test]
    fn test_failed_load_is_ready_and_empty() {
        let mut catalog = Catalog::loading();
        assert!(catalog.is_loading());
        catalog.complete_remote_load(Err(FetchError::Malformed("bad".to_string())));
        assert!(!catalog.is_loading());
        assert!(catalog.is_empty());
        assert!(catalog.selected().is_none());
    }

    #[test]
    fn test_late_response_is_ignored() {
        let mut catalog = Catalog::with_defaults();
        catalog.complete_remote_load(Ok(Vec::new()));
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_uploads_get_distinct_ids_and_selection() {
        let mut catalog = Catalog::with_defaults();
        let first = catalog.add_uploaded("Aviator".to_string(), upload("aviator.png")).unwrap().id.clone();
        assert_eq!(catalog.selected().map(|e| &e.id), Some(&first));
        let second = catalog.add_uploaded("Aviator".to_string(), upload("aviator.png")).unwrap().id.clone();
        assert_ne!(first, second);
        assert_eq!(catalog.selected().map(|e| &e.id), Some(&second));
        assert_eq!(catalog.len(), 5);
        // insertion order of earlier entries is preserved
        assert_eq!(catalog.entries()[0].id.as_str(), "blue-frame");
        assert_eq!(catalog.entries()[3].id, first);
    }

    #[test]
    fn test_upload_into_empty_catalog_selects_it() {
        let mut catalog = ready_catalog(&[]);
        catalog.add_uploaded("Mine".to_string(), upload("mine.png"));
        assert_eq!(catalog.selected().map(|e| e.name.as_str()), Some("Mine"));
        assert!(catalog.selected().unwrap().local_image().is_some());
    }

    #[test]
    fn test_upload_refused_while_loading() {
        let mut catalog = Catalog::loading();
        assert!(catalog.add_uploaded("Mine".to_string(), upload("mine.png")).is_none());
        assert!(catalog.is_empty());
    }
}
