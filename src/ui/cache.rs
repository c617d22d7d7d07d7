/// Per-URL cache of downloaded style images
///
/// Each URL is requested at most once per session; failures stay failed so a
/// broken image does not trigger a download on every selection change.

use std::collections::HashMap;
use tracing::warn;

use crate::errors::FetchError;
use crate::state::data::{DecodedImage, EyewearEntry, StyleImage, VectorImage};

#[derive(Debug, Clone)]
enum Slot {
    Pending,
    Ready(StyleImage),
    Failed,
}

/// What the renderer can show for the selected entry
#[derive(Debug, Clone, Copy)]
pub enum OverlayImage<'a> {
    /// Nothing is selected
    Nothing,
    /// Download in flight
    Pending,
    /// Pixels are available
    Ready(&'a DecodedImage),
    /// Vector artwork is available
    Vector(&'a VectorImage),
    /// Download or decode failed
    Unavailable,
}

#[derive(Debug, Default)]
pub struct ImageCache {
    slots: HashMap<String, Slot>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `url` as requested. Returns true if the caller should start a fetch.
    pub fn request(&mut self, url: &str) -> bool {
        if self.slots.contains_key(url) {
            return false;
        }
        self.slots.insert(url.to_string(), Slot::Pending);
        true
    }

    /// Store the outcome of a fetch started after `request`
    pub fn complete(&mut self, url: String, result: Result<StyleImage, FetchError>) {
        let slot = match result {
            Ok(image) => Slot::Ready(image),
            Err(err) => {
                warn!(url = %url, error = %err, "style image unavailable");
                Slot::Failed
            }
        };
        self.slots.insert(url, slot);
    }

    /// Resolve what to draw for an entry; uploads bypass the cache
    pub fn overlay_for<'a>(&'a self, entry: Option<&'a EyewearEntry>) -> OverlayImage<'a> {
        let Some(entry) = entry else {
            return OverlayImage::Nothing;
        };
        if let Some(image) = entry.local_image() {
            return OverlayImage::Ready(image);
        }

        match entry.image_url().and_then(|url| self.slots.get(url)) {
            Some(Slot::Ready(StyleImage::Raster(image))) => OverlayImage::Ready(image),
            Some(Slot::Ready(StyleImage::Vector(vector))) => OverlayImage::Vector(vector),
            Some(Slot::Failed) => OverlayImage::Unavailable,
            Some(Slot::Pending) | None => OverlayImage::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> EyewearEntry {
        EyewearEntry::remote("a", "Alpha", "https://example.com/a.png")
    }

    #[test]
    fn test_request_only_once() {
        let mut cache = ImageCache::new();
        assert!(cache.request("https://example.com/a.png"));
        assert!(!cache.request("https://example.com/a.png"));
    }

    #[test]
    fn test_states_follow_fetch_outcome() {
        let mut cache = ImageCache::new();
        let entry = entry();
        assert!(matches!(cache.overlay_for(None), OverlayImage::Nothing));
        assert!(matches!(cache.overlay_for(Some(&entry)), OverlayImage::Pending));

        cache.request("https://example.com/a.png");
        cache.complete(
            "https://example.com/a.png".to_string(),
            Ok(StyleImage::Raster(DecodedImage::from_rgba(image::RgbaImage::new(8, 4)))),
        );
        match cache.overlay_for(Some(&entry)) {
            OverlayImage::Ready(image) => assert_eq!(image.width, 8),
            other => panic!("expected ready image, got {:?}", other),
        }
    }

    #[test]
    fn test_svg_style_is_drawable() {
        let mut cache = ImageCache::new();
        let entry = EyewearEntry::remote("blue-frame", "Blue Frame", "https://example.com/frames.svg");
        let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 40"><rect width="100" height="40"/></svg>"#;

        cache.request("https://example.com/frames.svg");
        cache.complete(
            "https://example.com/frames.svg".to_string(),
            StyleImage::from_bytes(svg, Some("image/svg+xml")).map_err(|e| FetchError::Decode {
                url: "https://example.com/frames.svg".to_string(),
                reason: e.to_string(),
            }),
        );
        assert!(matches!(cache.overlay_for(Some(&entry)), OverlayImage::Vector(_)));
    }

    #[test]
    fn test_failed_fetch_is_not_retried() {
        let mut cache = ImageCache::new();
        cache.request("https://example.com/a.png");
        cache.complete(
            "https://example.com/a.png".to_string(),
            Err(FetchError::Status {
                url: "https://example.com/a.png".to_string(),
                status: 500,
            }),
        );
        assert!(matches!(cache.overlay_for(Some(&entry())), OverlayImage::Unavailable));
        assert!(!cache.request("https://example.com/a.png"));
    }
}
