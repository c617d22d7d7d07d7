use cgmath::Point2;
use iced::advanced::svg::{self, Renderer as _};
use iced::mouse::Cursor;
use iced::widget::canvas::{self, Frame, Path, Program, Stroke};
use iced::{Color, Point, Rectangle, Renderer, Size, Theme, Vector};

use super::cache::OverlayImage;
use crate::state::data::VectorImage;
use crate::state::transform::Transform;
use crate::video::VideoSurface;
use crate::Message;

/// Overlay width relative to the video frame width
const OVERLAY_WIDTH_FRACTION: f32 = 0.5;
/// Overlay width never exceeds this many pixels
const OVERLAY_MAX_WIDTH: f32 = 300.0;
/// Height/width of the guide outline shown while no pixels are available
const GUIDE_ASPECT: f32 = 0.4;

/// Canvas program compositing the selected style over the video frame
pub struct OverlayView<'a, S: VideoSurface> {
    pub surface: &'a S,
    pub transform: Transform,
    pub overlay: OverlayImage<'a>,
}

impl<'a, S: VideoSurface> Program<Message> for OverlayView<'a, S> {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(Point::ORIGIN, bounds.size(), Color::BLACK);

        let video = fit_frame(bounds.size(), self.surface.frame_size());
        if let Some(handle) = self.surface.current_frame() {
            frame.draw_image(video, canvas::Image::new(handle.clone()));
        }

        match self.overlay {
            OverlayImage::Ready(image) => {
                self.place_overlay(&mut frame, video, image.aspect_ratio(), |frame, bounds| {
                    frame.draw_image(bounds, canvas::Image::new(image.handle.clone()));
                });
            }
            OverlayImage::Vector(vector) => {
                let aspect = vector_aspect_ratio(renderer, vector);
                self.place_overlay(&mut frame, video, aspect, |frame, bounds| {
                    frame.draw_svg(bounds, svg::Svg::new(vector.handle.clone()));
                });
            }
            OverlayImage::Pending | OverlayImage::Unavailable => self.draw_guide(&mut frame, video),
            OverlayImage::Nothing => {}
        }

        vec![frame.into_geometry()]
    }
}

impl<'a, S: VideoSurface> OverlayView<'a, S> {
    /// Anchor-translate, rotate, then scale about the image center, and let
    /// `paint` fill the unscaled overlay bounds
    fn place_overlay(
        &self,
        frame: &mut Frame,
        video: Rectangle,
        aspect_ratio: f32,
        paint: impl FnOnce(&mut Frame, Rectangle),
    ) {
        let anchor = self.transform.anchor_in(video.width, video.height);
        let size = overlay_size(video.width, aspect_ratio);

        frame.with_save(|frame| {
            frame.translate(Vector::new(video.x + anchor.x, video.y + anchor.y));
            frame.rotate(self.transform.rotation());
            frame.scale(self.transform.scale());
            paint(
                frame,
                Rectangle::new(Point::new(-size.width / 2.0, -size.height / 2.0), size),
            );
        });
    }

    /// Outline where the style will land once its pixels arrive
    fn draw_guide(&self, frame: &mut Frame, video: Rectangle) {
        let size = overlay_size(video.width, GUIDE_ASPECT);
        let (half_w, half_h) = (size.width / 2.0, size.height / 2.0);
        let corners = [(-half_w, -half_h), (half_w, -half_h), (half_w, half_h), (-half_w, half_h)]
            .map(|(x, y)| {
                let p = self
                    .transform
                    .map_point(video.width, video.height, Point2::new(x, y));
                Point::new(video.x + p.x, video.y + p.y)
            });

        let outline = Path::new(|builder| {
            builder.move_to(corners[0]);
            for corner in &corners[1..] {
                builder.line_to(*corner);
            }
            builder.close();
        });
        frame.stroke(
            &outline,
            Stroke::default()
                .with_color(Color::from_rgba(1.0, 1.0, 1.0, 0.6))
                .with_width(2.0),
        );
    }
}

/// Intrinsic height/width of vector artwork, or the guide shape when the
/// document declares no size
fn vector_aspect_ratio(renderer: &Renderer, vector: &VectorImage) -> f32 {
    aspect_or_guide(renderer.measure_svg(&vector.handle))
}

fn aspect_or_guide(natural: Size<u32>) -> f32 {
    if natural.width == 0 || natural.height == 0 {
        return GUIDE_ASPECT;
    }
    natural.height as f32 / natural.width as f32
}

/// Largest rectangle with the frame's aspect ratio, centered in `bounds`
pub fn fit_frame(bounds: Size, frame: Size<u32>) -> Rectangle {
    if frame.width == 0 || frame.height == 0 {
        return Rectangle::with_size(bounds);
    }
    let scale = (bounds.width / frame.width as f32).min(bounds.height / frame.height as f32);
    let size = Size::new(frame.width as f32 * scale, frame.height as f32 * scale);
    Rectangle::new(
        Point::new((bounds.width - size.width) / 2.0, (bounds.height - size.height) / 2.0),
        size,
    )
}

/// Unscaled overlay size: half the frame width, capped, keeping the image aspect
pub fn overlay_size(frame_width: f32, aspect_ratio: f32) -> Size {
    let width = (frame_width * OVERLAY_WIDTH_FRACTION).min(OVERLAY_MAX_WIDTH);
    Size::new(width, width * aspect_ratio)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_frame_letterboxes_wide_bounds() {
        let rect = fit_frame(Size::new(1000.0, 360.0), Size::new(1280, 720));
        assert_eq!(rect.height, 360.0);
        assert_eq!(rect.width, 640.0);
        assert_eq!(rect.x, 180.0);
        assert_eq!(rect.y, 0.0);
    }

    #[test]
    fn test_fit_frame_letterboxes_tall_bounds() {
        let rect = fit_frame(Size::new(640.0, 1000.0), Size::new(1280, 720));
        assert_eq!(rect.width, 640.0);
        assert_eq!(rect.height, 360.0);
        assert_eq!(rect.y, 320.0);
    }

    #[test]
    fn test_unsized_vector_uses_guide_aspect() {
        assert_eq!(aspect_or_guide(Size::new(0, 0)), GUIDE_ASPECT);
        assert_eq!(aspect_or_guide(Size::new(200, 80)), 0.4);
        assert_eq!(aspect_or_guide(Size::new(100, 50)), 0.5);
    }

    #[test]
    fn test_overlay_size_is_half_width_until_cap() {
        let small = overlay_size(400.0, 0.5);
        assert_eq!((small.width, small.height), (200.0, 100.0));

        let capped = overlay_size(1280.0, 0.5);
        assert_eq!((capped.width, capped.height), (300.0, 150.0));
    }
}
