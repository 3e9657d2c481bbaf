/// Camera (world to camera) and camera to screen projection
use nalgebra::{Matrix4, Point2, Point3};

use crate::transform::{transform_point_divided, Transform};

/// Drawing surface size in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as f32,
            height: height as f32,
        }
    }

    pub fn center(&self) -> Point2<f32> {
        Point2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// A view matrix mapping world space straight into camera space.
///
/// Camera space has the camera at the origin looking down +Z with +Y up, so
/// visible geometry has positive depth.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    view: Matrix4<f32>,
}

impl Camera {
    /// Camera at world `(0, 0, -distance)` looking at the origin
    pub fn new(distance: f32) -> Self {
        Self {
            view: Transform::translation(0.0, 0.0, distance),
        }
    }

    /// World-to-camera matrix
    pub fn view_matrix(&self) -> &Matrix4<f32> {
        &self.view
    }

    /// Swing the camera about the world Y axis through the origin.
    ///
    /// The world is turned before the view transform, so the camera keeps
    /// its distance and keeps facing the origin.
    pub fn orbit(&mut self, angle: f32) {
        self.view = Transform::multiply(&[self.view, Transform::rotation_y(angle)]);
    }

    /// World-space point to camera space, including the homogeneous divide
    pub fn to_camera_space(&self, world: &Point3<f32>) -> Point3<f32> {
        transform_point_divided(&self.view, world)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(10.0)
    }
}

/// Perspective divide by depth followed by the viewport mapping
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub focal_length: f32,
    pub viewport: Viewport,
}

impl Projection {
    pub fn new(focal_length: f32, viewport: Viewport) -> Self {
        Self {
            focal_length,
            viewport,
        }
    }

    /// Project a camera-space point; `x`/`y` are pixels, `z` keeps the camera depth.
    ///
    /// A point at `z == 0` yields infinite or NaN coordinates. Nothing is clipped.
    #[inline]
    pub fn project(&self, p: &Point3<f32>) -> Point3<f32> {
        let f = self.focal_length / p.z;
        let ndc_x = p.x * f;
        let ndc_y = p.y * f;

        let screen_x = (ndc_x * 0.5 + 0.5) * self.viewport.width;
        let screen_y = (1.0 - ndc_y) * 0.5 * self.viewport.height;

        Point3::new(screen_x, screen_y, p.z)
    }
}
