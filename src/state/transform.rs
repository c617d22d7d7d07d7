/// Overlay placement transform
///
/// Position is stored as percentages of the displayed (already mirrored)
/// video frame, scale as a uniform factor, rotation in radians. The renderer
/// applies them as translate to anchor, then rotate, then scale.

use cgmath::{Matrix3, Point2, Rad, Vector2, Vector3};
use tracing::debug;

/// Smallest allowed overlay scale
pub const MIN_SCALE: f32 = 0.5;
/// Largest allowed overlay scale
pub const MAX_SCALE: f32 = 2.0;
/// Position bounds, in percent of the frame
pub const MIN_POSITION: f32 = 0.0;
pub const MAX_POSITION: f32 = 100.0;

/// Horizontal or vertical position component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Read-only snapshot of the overlay placement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    scale: f32,
    rotation: f32,
    x: f32,
    y: f32,
}

impl Default for Transform {
    /// Centered, unrotated, natural size
    fn default() -> Self {
        Self {
            scale: 1.0,
            rotation: 0.0,
            x: 50.0,
            y: 50.0,
        }
    }
}

impl Transform {
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Accumulated rotation in radians (never normalized)
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Position in percent of the frame, as (x, y)
    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    /// Overlay center in pixels for a frame of the given size
    pub fn anchor_in(&self, frame_width: f32, frame_height: f32) -> Point2<f32> {
        let (x, y) = self.position();
        Point2::new(x / 100.0 * frame_width, y / 100.0 * frame_height)
    }

    /// Homogeneous matrix mapping overlay-local coordinates (origin at the
    /// image center) to frame pixels: T(anchor) * R(rotation) * S(scale).
    pub fn overlay_matrix(&self, frame_width: f32, frame_height: f32) -> Matrix3<f32> {
        let anchor = self.anchor_in(frame_width, frame_height);
        Matrix3::from_translation(Vector2::new(anchor.x, anchor.y))
            * Matrix3::from_angle_z(Rad(self.rotation))
            * Matrix3::from_nonuniform_scale(self.scale, self.scale)
    }

    /// Map an overlay-local point to frame pixels
    pub fn map_point(&self, frame_width: f32, frame_height: f32, local: Point2<f32>) -> Point2<f32> {
        let mapped = self.overlay_matrix(frame_width, frame_height) * Vector3::new(local.x, local.y, 1.0);
        Point2::new(mapped.x, mapped.y)
    }
}

/// Bound a value to `[min, max]`, holding at the bound
pub fn saturating_clamp(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

/// Owns the single mutable overlay transform
#[derive(Debug, Default)]
pub struct TransformController {
    transform: Transform,
}

impl TransformController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current placement
    pub fn current(&self) -> Transform {
        self.transform
    }

    /// Grow or shrink the overlay, saturating at [0.5, 2.0]
    pub fn adjust_scale(&mut self, delta: f32) {
        if !delta.is_finite() {
            debug!(delta, "ignoring non-finite scale delta");
            return;
        }
        self.transform.scale = saturating_clamp(self.transform.scale + delta, MIN_SCALE, MAX_SCALE);
    }

    /// Rotate by `delta` radians; accumulates without wrapping
    pub fn adjust_rotation(&mut self, delta: f32) {
        if !delta.is_finite() {
            debug!(delta, "ignoring non-finite rotation delta");
            return;
        }
        self.transform.rotation += delta;
    }

    /// Move along one axis, saturating at [0, 100] percent
    pub fn adjust_position(&mut self, axis: Axis, delta: f32) {
        if !delta.is_finite() {
            debug!(delta, ?axis, "ignoring non-finite position delta");
            return;
        }
        let component = match axis {
            Axis::X => &mut self.transform.x,
            Axis::Y => &mut self.transform.y,
        };
        *component = saturating_clamp(*component + delta, MIN_POSITION, MAX_POSITION);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_defaults() {
        let t = TransformController::new().current();
        assert_eq!(t.scale(), 1.0);
        assert_eq!(t.rotation(), 0.0);
        assert_eq!(t.position(), (50.0, 50.0));
    }

    #[test]
    fn test_scale_saturates_at_max() {
        let mut controller = TransformController::new();
        for _ in 0..15 {
            controller.adjust_scale(0.1);
        }
        assert_eq!(controller.current().scale(), MAX_SCALE);
    }

    #[test]
    fn test_scale_saturates_at_min() {
        let mut controller = TransformController::new();
        for _ in 0..40 {
            controller.adjust_scale(-0.1);
        }
        assert_eq!(controller.current().scale(), MIN_SCALE);
        controller.adjust_scale(0.1);
        assert!(close(controller.current().scale(), 0.6));
    }

    #[test]
    fn test_scale_stays_in_range_for_mixed_deltas() {
        let mut controller = TransformController::new();
        for delta in [0.7, 0.9, -3.0, 0.2, 5.0, -0.05, -1.2, 0.33] {
            controller.adjust_scale(delta);
            let scale = controller.current().scale();
            assert!((MIN_SCALE..=MAX_SCALE).contains(&scale), "scale {} out of range", scale);
        }
    }

    #[test]
    fn test_position_axes_are_independent() {
        let mut controller = TransformController::new();
        for _ in 0..50 {
            controller.adjust_position(Axis::X, -2.0);
        }
        assert_eq!(controller.current().position(), (0.0, 50.0));

        for _ in 0..30 {
            controller.adjust_position(Axis::Y, 2.0);
        }
        assert_eq!(controller.current().position(), (0.0, 100.0));
    }

    #[test]
    fn test_rotation_accumulates_without_wrapping() {
        let mut controller = TransformController::new();
        for _ in 0..6 {
            controller.adjust_rotation(0.1);
        }
        assert!(close(controller.current().rotation(), 0.6));

        for _ in 0..100 {
            controller.adjust_rotation(0.1);
        }
        assert!(close(controller.current().rotation(), 10.6));
    }

    #[test]
    fn test_non_finite_deltas_leave_state_unchanged() {
        let mut controller = TransformController::new();
        controller.adjust_scale(f32::NAN);
        controller.adjust_rotation(f32::INFINITY);
        controller.adjust_position(Axis::X, f32::NEG_INFINITY);
        assert_eq!(controller.current(), Transform::default());
    }

    #[test]
    fn test_anchor_uses_percentages() {
        let t = Transform::default();
        let anchor = t.anchor_in(640.0, 480.0);
        assert_eq!((anchor.x, anchor.y), (320.0, 240.0));
    }

    #[test]
    fn test_matrix_applies_scale_then_rotation_then_anchor() {
        let mut controller = TransformController::new();
        controller.adjust_scale(1.0);
        controller.adjust_rotation(FRAC_PI_2);
        let t = controller.current();

        // (10, 0) scaled to (20, 0), rotated a quarter turn to (0, 20), moved to the anchor
        let mapped = t.map_point(640.0, 480.0, Point2::new(10.0, 0.0));
        assert!(close(mapped.x, 320.0), "x = {}", mapped.x);
        assert!(close(mapped.y, 260.0), "y = {}", mapped.y);
    }

    #[test]
    fn test_image_center_lands_on_anchor() {
        let mut controller = TransformController::new();
        controller.adjust_position(Axis::X, 10.0);
        controller.adjust_rotation(1.3);
        controller.adjust_scale(-0.3);
        let mapped = controller.current().map_point(1000.0, 500.0, Point2::new(0.0, 0.0));
        assert!(close(mapped.x, 600.0));
        assert!(close(mapped.y, 250.0));
    }
}
