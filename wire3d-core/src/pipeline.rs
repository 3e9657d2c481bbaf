/// Per-frame transform stages: object -> world -> camera -> cull -> sort -> screen
///
/// Each stage writes only the buffer it owns and reads buffers written by
/// earlier stages of the same frame.
use nalgebra::{Matrix4, Point3, Vector3};

use crate::buffer::{TriangleSet, VertexBuffer};
use crate::projection::Projection;
use crate::scene::{Scene, SceneObject};
use crate::transform::{transform_point, transform_point_divided};

/// The axis the camera looks along, in camera space
pub const VIEW_DIRECTION: [f32; 3] = [0.0, 0.0, 1.0];

/// Draw order after sorting by mean camera-space depth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DepthOrder {
    /// Painter's algorithm: nearer triangles are drawn last
    #[default]
    FarthestFirst,
    NearestFirst,
}

/// Scratch buffers sized once for a scene and reused every frame
#[derive(Debug, Clone)]
pub struct FrameBuffers {
    pub world: VertexBuffer,
    pub camera: VertexBuffer,
    pub screen: VertexBuffer,
    pub triangles: TriangleSet,
    pristine: Vec<[u32; 3]>,
    depth_keys: Vec<(f32, [u32; 3])>,
}

impl FrameBuffers {
    /// Lay objects out back to back in submission order and index their
    /// triangles into that shared layout.
    pub fn for_scene(scene: &Scene) -> Self {
        let vertex_count = scene.vertex_count();
        let triangle_count = scene.triangle_count();

        let mut pristine = Vec::with_capacity(triangle_count);
        let mut base = 0u32;
        for object in scene.objects() {
            pristine.extend(
                object
                    .model
                    .triangle_indices()
                    .map(|[a, b, c]| [base + a, base + b, base + c]),
            );
            base += object.model.vertex_count() as u32;
        }

        log::debug!(
            "allocated frame buffers: {} vertices, {} triangles across {} objects",
            vertex_count,
            triangle_count,
            scene.len()
        );

        Self {
            world: VertexBuffer::new(vertex_count),
            camera: VertexBuffer::new(vertex_count),
            screen: VertexBuffer::new(vertex_count),
            triangles: TriangleSet::new(&pristine),
            pristine,
            depth_keys: Vec::with_capacity(triangle_count),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.world.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.pristine.len()
    }

    /// Every triangle in submission order
    pub fn pristine(&self) -> &[[u32; 3]] {
        &self.pristine
    }

    /// Refill the working set for the next frame
    pub fn restore(&mut self) {
        self.triangles.reset(&self.pristine);
    }

    /// Sort the working set using the owned key scratch
    pub fn sort_by_depth(&mut self, order: DepthOrder) {
        sort_by_depth(&self.camera, &mut self.triangles, order, &mut self.depth_keys);
    }
}

/// Stage 1: apply each object's transform to its model's vertices
pub fn to_world_space(objects: &[SceneObject], world: &mut VertexBuffer) {
    let expected: usize = objects.iter().map(|o| o.model.vertex_count()).sum();
    assert_eq!(expected, world.len(), "world buffer does not match the scene");

    let mut base = 0;
    for object in objects {
        let model = &object.model;
        for i in 0..model.vertex_count() {
            let v = transform_point(&object.transform, &model.vertex(i));
            world.set(base + i, &Point3::from(v.xyz()));
        }
        base += model.vertex_count();
    }
}

/// Stage 2: view transform with the homogeneous divide
pub fn to_camera_space(view: &Matrix4<f32>, world: &VertexBuffer, camera: &mut VertexBuffer) {
    assert_eq!(world.len(), camera.len(), "camera buffer does not match world buffer");

    for i in 0..world.len() {
        camera.set(i, &transform_point_divided(view, &world.get(i)));
    }
}

/// Whether a camera-space triangle faces the viewer.
///
/// The normal `(b - a) x (c - a)` must point against the view direction.
/// Edge-on triangles (dot product of exactly zero) do not face the viewer.
pub fn is_front_facing(a: &Point3<f32>, b: &Point3<f32>, c: &Point3<f32>) -> bool {
    let normal = (b - a).cross(&(c - a));
    normal.dot(&Vector3::from(VIEW_DIRECTION)) < 0.0
}

/// Stage 3: drop triangles facing away, compacting the working set in place.
/// Returns the number of survivors.
pub fn cull_backfaces(camera: &VertexBuffer, triangles: &mut TriangleSet) -> usize {
    triangles.retain(|&[a, b, c]| {
        is_front_facing(
            &camera.get(a as usize),
            &camera.get(b as usize),
            &camera.get(c as usize),
        )
    })
}

/// Mean camera-space depth of a triangle's vertices
#[inline]
pub fn mean_depth(camera: &VertexBuffer, [a, b, c]: &[u32; 3]) -> f32 {
    (camera.z(*a as usize) + camera.z(*b as usize) + camera.z(*c as usize)) / 3.0
}

/// Stage 4: order the working set by mean depth.
///
/// `keys` is scratch storage; it is cleared and refilled, and never needs to
/// grow past the working set's capacity.
pub fn sort_by_depth(
    camera: &VertexBuffer,
    triangles: &mut TriangleSet,
    order: DepthOrder,
    keys: &mut Vec<(f32, [u32; 3])>,
) {
    keys.clear();
    keys.extend(triangles.as_slice().iter().map(|t| (mean_depth(camera, t), *t)));

    match order {
        DepthOrder::FarthestFirst => keys.sort_unstable_by(|a, b| b.0.total_cmp(&a.0)),
        DepthOrder::NearestFirst => keys.sort_unstable_by(|a, b| a.0.total_cmp(&b.0)),
    }

    for (slot, (_, tri)) in triangles.as_mut_slice().iter_mut().zip(keys.iter()) {
        *slot = *tri;
    }
}

/// Stage 5: project every vertex of the visible triangles into pixels
pub fn to_screen_space(
    camera: &VertexBuffer,
    triangles: &[[u32; 3]],
    projection: &Projection,
    screen: &mut VertexBuffer,
) {
    assert_eq!(camera.len(), screen.len(), "screen buffer does not match camera buffer");

    for tri in triangles {
        for &vi in tri {
            let vi = vi as usize;
            screen.set(vi, &projection.project(&camera.get(vi)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Model;
    use crate::projection::{Camera, Viewport};
    use crate::scene::ObjectKind;
    use crate::transform::Transform;
    use std::sync::Arc;

    fn p(x: f32, y: f32, z: f32) -> Point3<f32> {
        Point3::new(x, y, z)
    }

    /// Three flat triangles facing the camera at the given depths
    fn layered_triangles(depths: &[f32]) -> VertexBuffer {
        let points: Vec<Point3<f32>> = depths
            .iter()
            .flat_map(|&z| [p(0.0, 0.0, z), p(0.0, 1.0, z), p(1.0, 0.0, z)])
            .collect();
        VertexBuffer::from_points(&points)
    }

    fn two_cube_scene() -> Scene {
        let cube = Arc::new(Model::cube(0.5));
        let mut scene = Scene::new();
        scene.add(SceneObject::new(
            Arc::clone(&cube),
            Transform::translation(-2.5, 0.0, 0.0),
            ObjectKind::Cube,
        ));
        scene.add(SceneObject::new(
            cube,
            Transform::translation(2.5, 0.0, 0.0),
            ObjectKind::Static,
        ));
        scene
    }

    #[test]
    fn test_backface_winding_is_pinned() {
        // Normal (0,0,1) points along the view direction: facing away
        assert!(!is_front_facing(&p(0.0, 0.0, 1.0), &p(1.0, 0.0, 1.0), &p(0.0, 1.0, 1.0)));
        // Reversed winding faces the camera
        assert!(is_front_facing(&p(0.0, 0.0, 1.0), &p(0.0, 1.0, 1.0), &p(1.0, 0.0, 1.0)));
    }

    #[test]
    fn test_edge_on_triangle_is_culled() {
        assert!(!is_front_facing(&p(0.0, 0.0, 1.0), &p(1.0, 0.0, 1.0), &p(0.0, 0.0, 2.0)));
        // Zero-area triangles have a zero normal
        assert!(!is_front_facing(&p(1.0, 1.0, 1.0), &p(1.0, 1.0, 1.0), &p(1.0, 1.0, 1.0)));
    }

    #[test]
    fn test_depth_sort_farthest_first() {
        let camera = layered_triangles(&[5.0, 1.0, 3.0]);
        let mut triangles = TriangleSet::new(&[[0, 1, 2], [3, 4, 5], [6, 7, 8]]);
        let mut keys = Vec::new();

        sort_by_depth(&camera, &mut triangles, DepthOrder::FarthestFirst, &mut keys);
        let depths: Vec<f32> = triangles.as_slice().iter().map(|t| mean_depth(&camera, t)).collect();
        assert_eq!(depths, vec![5.0, 3.0, 1.0]);
        assert_eq!(triangles.as_slice(), &[[0, 1, 2], [6, 7, 8], [3, 4, 5]]);
    }

    #[test]
    fn test_depth_sort_nearest_first() {
        let camera = layered_triangles(&[5.0, 1.0, 3.0]);
        let mut triangles = TriangleSet::new(&[[0, 1, 2], [3, 4, 5], [6, 7, 8]]);
        let mut keys = Vec::new();

        sort_by_depth(&camera, &mut triangles, DepthOrder::NearestFirst, &mut keys);
        assert_eq!(triangles.as_slice(), &[[3, 4, 5], [6, 7, 8], [0, 1, 2]]);
    }

    #[test]
    fn test_depth_sort_uses_mean_of_vertices() {
        // Triangle 0 has the deepest single vertex but the shallower mean
        let camera = VertexBuffer::from_points(&[
            p(0.0, 0.0, 1.0),
            p(0.0, 1.0, 1.0),
            p(1.0, 0.0, 9.0),
            p(0.0, 0.0, 4.0),
            p(0.0, 1.0, 4.0),
            p(1.0, 0.0, 4.0),
        ]);
        let mut triangles = TriangleSet::new(&[[0, 1, 2], [3, 4, 5]]);
        let mut keys = Vec::new();

        sort_by_depth(&camera, &mut triangles, DepthOrder::FarthestFirst, &mut keys);
        assert_eq!(triangles.as_slice(), &[[3, 4, 5], [0, 1, 2]]);
    }

    #[test]
    fn test_sort_only_touches_working_length() {
        let camera = layered_triangles(&[1.0, 2.0, 3.0]);
        let mut triangles = TriangleSet::new(&[[0, 1, 2], [3, 4, 5], [6, 7, 8]]);
        triangles.retain(|t| t[0] != 6);
        let mut keys = Vec::new();

        sort_by_depth(&camera, &mut triangles, DepthOrder::FarthestFirst, &mut keys);
        assert_eq!(triangles.as_slice(), &[[3, 4, 5], [0, 1, 2]]);
    }

    #[test]
    fn test_buffers_lay_objects_out_contiguously() {
        let scene = two_cube_scene();
        let buffers = FrameBuffers::for_scene(&scene);

        assert_eq!(buffers.vertex_count(), 16);
        assert_eq!(buffers.triangle_count(), 24);
        assert_eq!(buffers.triangles.len(), 24);
        // Second cube's triangles are offset past the first cube's 8 vertices
        assert_eq!(buffers.pristine()[12], [12, 13, 14]);
        assert!(buffers.pristine()[12..].iter().flatten().all(|&i| i >= 8));
    }

    #[test]
    fn test_world_space_uses_each_object_transform() {
        let scene = two_cube_scene();
        let mut buffers = FrameBuffers::for_scene(&scene);
        to_world_space(scene.objects(), &mut buffers.world);

        assert_eq!(buffers.world.get(0), p(-2.75, -0.25, -0.25));
        assert_eq!(buffers.world.get(8), p(2.25, -0.25, -0.25));
    }

    #[test]
    #[should_panic(expected = "world buffer does not match")]
    fn test_world_space_rejects_wrong_buffer_size() {
        let scene = two_cube_scene();
        let mut world = VertexBuffer::new(3);
        to_world_space(scene.objects(), &mut world);
    }

    #[test]
    fn test_camera_space_divides_by_w() {
        let world = VertexBuffer::from_points(&[p(2.0, 4.0, 6.0)]);
        let mut camera = VertexBuffer::new(1);

        let mut view = Transform::identity();
        view[(3, 3)] = 2.0;
        to_camera_space(&view, &world, &mut camera);
        assert_eq!(camera.get(0), p(1.0, 2.0, 3.0));

        to_camera_space(Camera::new(10.0).view_matrix(), &world, &mut camera);
        assert_eq!(camera.get(0), p(2.0, 4.0, 16.0));
    }

    #[test]
    fn test_cull_compacts_working_set() {
        let camera = VertexBuffer::from_points(&[
            p(0.0, 0.0, 1.0),
            p(1.0, 0.0, 1.0),
            p(0.0, 1.0, 1.0),
        ]);
        let mut triangles = TriangleSet::new(&[[0, 1, 2], [0, 2, 1], [1, 0, 2]]);

        let visible = cull_backfaces(&camera, &mut triangles);
        assert_eq!(visible, 2);
        assert_eq!(triangles.as_slice(), &[[0, 2, 1], [1, 0, 2]]);
    }

    #[test]
    fn test_screen_space_projects_only_visible_vertices() {
        let camera = VertexBuffer::from_points(&[
            p(0.0, 0.0, 2.0),
            p(1.0, 0.0, 2.0),
            p(0.0, 1.0, 2.0),
            p(5.0, 5.0, 5.0),
        ]);
        let mut screen = VertexBuffer::new(4);
        let projection = Projection::new(1.0, Viewport::new(100, 100));

        to_screen_space(&camera, &[[0, 1, 2]], &projection, &mut screen);
        assert_eq!(screen.get(0), p(50.0, 50.0, 2.0));
        assert_eq!(screen.get(1), p(75.0, 50.0, 2.0));
        assert_eq!(screen.get(2), p(50.0, 25.0, 2.0));
        assert_eq!(screen.get(3), Point3::origin());
    }
}
