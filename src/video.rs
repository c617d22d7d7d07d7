/// Video surface the overlay is composited on
///
/// Camera capture lives outside this application; the overlay only needs a
/// frame of known size that is already mirrored for self-view. `PreviewSurface`
/// provides that from a still backdrop (or a generated gradient).

use iced::widget::image::Handle;
use iced::Size;
use image::{imageops, Rgba, RgbaImage};
use std::path::Path;
use tracing::{info, warn};

use crate::config::PreviewConfig;

/// Anything that can supply the displayed video frame
pub trait VideoSurface {
    /// Frame size in pixels
    fn frame_size(&self) -> Size<u32>;

    /// Whether the frame is horizontally mirrored (self-view)
    fn is_mirrored(&self) -> bool;

    /// Current frame, if one is available yet
    fn current_frame(&self) -> Option<&Handle>;
}

/// Static stand-in for a live camera feed
#[derive(Debug, Clone)]
pub struct PreviewSurface {
    frame: Handle,
    size: Size<u32>,
    mirrored: bool,
}

impl PreviewSurface {
    /// Build from config: the backdrop file if set and readable, else a gradient
    pub fn from_config(config: &PreviewConfig) -> Self {
        let pixels = match &config.backdrop {
            Some(path) => match load_backdrop(path) {
                Ok(pixels) => {
                    info!(path = %path.display(), "using preview backdrop");
                    pixels
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "could not load backdrop, using gradient");
                    gradient(config.width, config.height)
                }
            },
            None => gradient(config.width, config.height),
        };

        Self::from_pixels(pixels, config.mirrored)
    }

    /// Wrap raw pixels, mirroring them for self-view when requested
    pub fn from_pixels(pixels: RgbaImage, mirrored: bool) -> Self {
        let pixels = prepare_frame(pixels, mirrored);
        let (width, height) = pixels.dimensions();
        Self {
            frame: Handle::from_rgba(width, height, pixels.into_raw()),
            size: Size::new(width, height),
            mirrored,
        }
    }
}

impl VideoSurface for PreviewSurface {
    fn frame_size(&self) -> Size<u32> {
        self.size
    }

    fn is_mirrored(&self) -> bool {
        self.mirrored
    }

    fn current_frame(&self) -> Option<&Handle> {
        Some(&self.frame)
    }
}

fn load_backdrop(path: &Path) -> Result<RgbaImage, image::ImageError> {
    Ok(image::open(path)?.to_rgba8())
}

/// Flip horizontally for self-view
fn prepare_frame(mut pixels: RgbaImage, mirrored: bool) -> RgbaImage {
    if mirrored {
        imageops::flip_horizontal_in_place(&mut pixels);
    }
    pixels
}

/// Soft diagonal gradient used when there is no backdrop
fn gradient(width: u32, height: u32) -> RgbaImage {
    let span = (width + height).max(1) as f32;
    RgbaImage::from_fn(width.max(1), height.max(1), |x, y| {
        let t = (x + y) as f32 / span;
        Rgba([
            (40.0 + 30.0 * t) as u8,
            (44.0 + 40.0 * t) as u8,
            (70.0 + 80.0 * t) as u8,
            255,
        ])
    })
}
