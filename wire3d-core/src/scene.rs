/// Placed object instances and their per-frame animation
use std::sync::Arc;

use nalgebra::{Matrix4, Vector3};

use crate::geometry::Model;
use crate::transform::{EulerAngles, Transform};

/// Selects the animation rule applied to an object every frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObjectKind {
    #[default]
    Static,
    /// Tumbles about X and Y
    Cube,
    /// Turns about all three axes, X against the others
    Teapot,
}

impl ObjectKind {
    /// Radians per second about each axis, or `None` for objects that never move
    pub fn spin_rate(self) -> Option<EulerAngles> {
        match self {
            ObjectKind::Static => None,
            ObjectKind::Cube => Some(EulerAngles::new(1.0, 1.0, 0.0)),
            ObjectKind::Teapot => Some(EulerAngles::new(-1.0, 1.0, 1.0)),
        }
    }
}

/// A model placed in the world
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub model: Arc<Model>,
    pub transform: Matrix4<f32>,
    pub kind: ObjectKind,
}

impl SceneObject {
    pub fn new(model: Arc<Model>, transform: Matrix4<f32>, kind: ObjectKind) -> Self {
        Self {
            model,
            transform,
            kind,
        }
    }

    /// Scale, then rotate, then translate into position
    pub fn placed(
        model: Arc<Model>,
        kind: ObjectKind,
        position: Vector3<f32>,
        rotation: EulerAngles,
        scale: f32,
    ) -> Self {
        let transform = Transform::multiply(&[
            Transform::translation(position.x, position.y, position.z),
            Transform::rotation_xyz(&rotation),
            Transform::uniform_scale(scale),
        ]);
        Self::new(model, transform, kind)
    }

    /// Pre-multiply the current transform by this frame's spin.
    ///
    /// The rotation compounds with whatever the transform already holds, so
    /// repeated calls keep turning the object.
    pub fn spin(&mut self, elapsed_secs: f32) {
        if let Some(rate) = self.kind.spin_rate() {
            let rotation = Transform::rotation_xyz(&rate.scaled(elapsed_secs));
            self.transform = Transform::multiply(&[rotation, self.transform]);
        }
    }
}

/// Ordered object list; insertion order is submission order
#[derive(Debug, Clone, Default)]
pub struct Scene {
    objects: Vec<SceneObject>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, object: SceneObject) {
        self.objects.push(object);
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.objects.iter().map(|o| o.model.vertex_count()).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.objects.iter().map(|o| o.model.triangle_count()).sum()
    }

    /// Apply every object's animation rule for `elapsed_secs`
    pub fn animate(&mut self, elapsed_secs: f32) {
        for object in &mut self.objects {
            object.spin(elapsed_secs);
        }
    }
}

impl FromIterator<SceneObject> for Scene {
    fn from_iter<I: IntoIterator<Item = SceneObject>>(iter: I) -> Self {
        Self {
            objects: iter.into_iter().collect(),
        }
    }
}
