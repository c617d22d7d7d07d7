/// Shared data structures for the application state
///
/// These structs represent the eyewear catalog model that flows between
/// the state layer, the asset loaders and the UI layer.

use iced::widget::image::Handle;
use iced::widget::svg;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Opaque identifier of a catalog entry, unique for the whole process
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Decoded RGBA pixels ready to hand to the renderer
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Renderer handle wrapping the pixel buffer
    pub handle: Handle,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl DecodedImage {
    /// Decode any format the `image` crate understands
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, image::ImageError> {
        let rgba = image::load_from_memory(bytes)?.to_rgba8();
        Ok(Self::from_rgba(rgba))
    }

    /// Wrap an already decoded buffer
    pub fn from_rgba(rgba: image::RgbaImage) -> Self {
        let (width, height) = rgba.dimensions();
        Self {
            handle: Handle::from_rgba(width, height, rgba.into_raw()),
            width,
            height,
        }
    }

    /// Height divided by width (1.0 for degenerate images)
    pub fn aspect_ratio(&self) -> f32 {
        if self.width == 0 {
            return 1.0;
        }
        self.height as f32 / self.width as f32
    }
}

/// Vector artwork, rasterized by the renderer at draw time
#[derive(Debug, Clone)]
pub struct VectorImage {
    pub handle: svg::Handle,
}

/// A downloaded style image in whichever form the renderer can draw it
#[derive(Debug, Clone)]
pub enum StyleImage {
    Raster(DecodedImage),
    Vector(VectorImage),
}

impl StyleImage {
    /// Classify a payload: SVG (by content type or markup) is kept as-is,
    /// anything else goes through the raster decoder.
    pub fn from_bytes(bytes: &[u8], content_type: Option<&str>) -> Result<Self, image::ImageError> {
        if is_svg(bytes, content_type) {
            return Ok(Self::Vector(VectorImage {
                handle: svg::Handle::from_memory(bytes.to_vec()),
            }));
        }
        DecodedImage::from_bytes(bytes).map(Self::Raster)
    }
}

fn is_svg(bytes: &[u8], content_type: Option<&str>) -> bool {
    if content_type.is_some_and(|ct| ct.trim().starts_with("image/svg+xml")) {
        return true;
    }
    // sniff the head of the document; XML prologs and comments may precede the root
    let head = &bytes[..bytes.len().min(1024)];
    let head = String::from_utf8_lossy(head);
    let head = head.trim_start_matches('\u{feff}').trim_start();
    (head.starts_with("<svg") || head.starts_with("<?xml") || head.starts_with("<!--"))
        && head.contains("<svg")
}

/// Pixels of a user-uploaded style.
///
/// Acquired when the file is decoded; released when the last entry holding it
/// is dropped. The catalog never removes entries, so in practice an upload
/// stays resident for the rest of the session.
#[derive(Debug, Clone)]
pub struct LocalImage {
    /// Original file name as chosen by the user
    pub file_name: String,
    /// Decoded pixels
    pub image: DecodedImage,
}

/// Where the pixels of an entry come from
#[derive(Debug, Clone)]
pub enum ImageRef {
    /// Stable remote URL, fetched lazily by the renderer
    Remote(String),
    /// Upload decoded in-process
    Local(Arc<LocalImage>),
}

/// One selectable eyewear style
#[derive(Debug, Clone)]
pub struct EyewearEntry {
    /// Unique id (e.g., "blue-frame", "custom-1718000000000-0")
    pub id: EntryId,
    /// Display label, never empty
    pub name: String,
    /// Display-only price string
    pub price: Option<String>,
    /// Image source
    pub image: ImageRef,
}

impl EyewearEntry {
    /// Build an entry backed by a remote image
    pub fn remote(id: &str, name: &str, url: &str) -> Self {
        Self {
            id: EntryId::new(id),
            name: name.to_string(),
            price: None,
            image: ImageRef::Remote(url.to_string()),
        }
    }

    /// Remote URL of the image, if this entry is not an upload
    pub fn image_url(&self) -> Option<&str> {
        match &self.image {
            ImageRef::Remote(url) => Some(url),
            ImageRef::Local(_) => None,
        }
    }

    /// Decoded pixels for uploads (remote images live in the UI cache)
    pub fn local_image(&self) -> Option<&DecodedImage> {
        match &self.image {
            ImageRef::Local(local) => Some(&local.image),
            ImageRef::Remote(_) => None,
        }
    }
}
