/// User interface module
///
/// - `overlay.rs` - canvas compositing the selected style over the video frame
/// - `cache.rs` - downloaded style images, keyed by URL
/// - `controls.rs` - placement buttons and the style panel

pub mod cache;
pub mod controls;
pub mod overlay;

pub use cache::ImageCache;
pub use overlay::OverlayView;
