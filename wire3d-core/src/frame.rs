/// Frame orchestration: animation, the five pipeline stages, then drawing
use nalgebra::Point2;

use crate::pipeline::{self, DepthOrder, FrameBuffers};
use crate::projection::{Camera, Projection, Viewport};
use crate::scene::Scene;
use crate::surface::DrawSurface;

/// Knobs that select a pipeline variant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    pub cull_backfaces: bool,
    pub depth_order: DepthOrder,
    pub focal_length: f32,
    /// Radians per second the camera orbits the origin
    pub camera_orbit_rate: f32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            cull_backfaces: true,
            depth_order: DepthOrder::FarthestFirst,
            focal_length: 2.0,
            camera_orbit_rate: 1.0,
        }
    }
}

/// What one frame produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    pub total_triangles: usize,
    pub visible_triangles: usize,
}

/// Owns the scene, the camera and every scratch buffer.
///
/// Buffers are sized from the scene at construction. A different object or
/// model set needs a new renderer.
pub struct FrameRenderer {
    scene: Scene,
    camera: Camera,
    projection: Projection,
    options: RenderOptions,
    buffers: FrameBuffers,
}

impl FrameRenderer {
    pub fn new(scene: Scene, camera: Camera, viewport: Viewport, options: RenderOptions) -> Self {
        let buffers = FrameBuffers::for_scene(&scene);
        log::info!(
            "renderer ready: {} objects, {} vertices, {} triangles, viewport {}x{}",
            scene.len(),
            buffers.vertex_count(),
            buffers.triangle_count(),
            viewport.width,
            viewport.height
        );

        Self {
            scene,
            camera,
            projection: Projection::new(options.focal_length, viewport),
            options,
            buffers,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn buffers(&self) -> &FrameBuffers {
        &self.buffers
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Toggle culling between frames; buffer sizes are unaffected
    pub fn set_cull_backfaces(&mut self, enabled: bool) {
        self.options.cull_backfaces = enabled;
    }

    /// Advance animation by `elapsed_ms`, then render
    pub fn tick<S: DrawSurface + ?Sized>(&mut self, elapsed_ms: f32, surface: &mut S) -> FrameStats {
        let elapsed_secs = elapsed_ms / 1000.0;
        self.scene.animate(elapsed_secs);
        self.camera.orbit(self.options.camera_orbit_rate * elapsed_secs);
        self.render(surface)
    }

    /// Run the pipeline on the current state and draw the result
    pub fn render<S: DrawSurface + ?Sized>(&mut self, surface: &mut S) -> FrameStats {
        let stats = self.run_pipeline();
        self.draw(surface);
        self.buffers.restore();

        log::trace!(
            "frame: {}/{} triangles drawn",
            stats.visible_triangles,
            stats.total_triangles
        );
        stats
    }

    fn run_pipeline(&mut self) -> FrameStats {
        let buffers = &mut self.buffers;

        pipeline::to_world_space(self.scene.objects(), &mut buffers.world);
        pipeline::to_camera_space(self.camera.view_matrix(), &buffers.world, &mut buffers.camera);
        if self.options.cull_backfaces {
            pipeline::cull_backfaces(&buffers.camera, &mut buffers.triangles);
        }
        buffers.sort_by_depth(self.options.depth_order);
        pipeline::to_screen_space(
            &buffers.camera,
            buffers.triangles.as_slice(),
            &self.projection,
            &mut buffers.screen,
        );

        FrameStats {
            total_triangles: buffers.triangle_count(),
            visible_triangles: buffers.triangles.len(),
        }
    }

    fn draw<S: DrawSurface + ?Sized>(&self, surface: &mut S) {
        let screen = &self.buffers.screen;
        surface.clear();
        for tri in self.buffers.triangles.as_slice() {
            let points = tri.map(|vi| {
                let p = screen.get(vi as usize);
                Point2::new(p.x, p.y)
            });
            surface.polygon(&points);
        }
    }
}

/// Turns a driver's monotonically increasing millisecond timestamps into
/// per-frame deltas. The first timestamp only sets the baseline.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delta(&mut self, now_ms: f64) -> f64 {
        let delta = self.last_ms.map_or(0.0, |last| now_ms - last);
        self.last_ms = Some(now_ms);
        delta
    }
}
