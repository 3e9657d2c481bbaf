/// TOML scene description: camera, render options and placed objects
use anyhow::Context;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::path::Path;
use wire3d_core::{
    Camera, DepthOrder, EulerAngles, ObjectKind, RenderOptions, Scene, SceneObject,
};

use crate::canvas::DrawStyle;
use crate::library::{LibraryError, ModelLibrary, BUILTIN_CUBE};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSection {
    /// Camera sits at `(0, 0, -distance)` looking at the origin
    pub distance: f32,
    pub focal_length: f32,
    /// Radians per second
    pub orbit_rate: f32,
}

impl Default for CameraSection {
    fn default() -> Self {
        Self {
            distance: 10.0,
            focal_length: 2.0,
            orbit_rate: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DepthOrderSetting {
    #[default]
    FarthestFirst,
    NearestFirst,
}

impl From<DepthOrderSetting> for DepthOrder {
    fn from(setting: DepthOrderSetting) -> Self {
        match setting {
            DepthOrderSetting::FarthestFirst => DepthOrder::FarthestFirst,
            DepthOrderSetting::NearestFirst => DepthOrder::NearestFirst,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSection {
    pub cull_backfaces: bool,
    pub depth_order: DepthOrderSetting,
    pub style: DrawStyle,
    pub target_fps: u32,
    pub show_fps: bool,
}

impl Default for RenderSection {
    fn default() -> Self {
        Self {
            cull_backfaces: true,
            depth_order: DepthOrderSetting::FarthestFirst,
            style: DrawStyle::Outlined,
            target_fps: 30,
            show_fps: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KindSetting {
    #[default]
    Static,
    Cube,
    Teapot,
}

impl From<KindSetting> for ObjectKind {
    fn from(setting: KindSetting) -> Self {
        match setting {
            KindSetting::Static => ObjectKind::Static,
            KindSetting::Cube => ObjectKind::Cube,
            KindSetting::Teapot => ObjectKind::Teapot,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectSection {
    /// `"cube"` or a path to a mesh file
    pub model: String,
    #[serde(default)]
    pub kind: KindSetting,
    #[serde(default)]
    pub position: [f32; 3],
    /// Radians about X, Y and Z
    #[serde(default)]
    pub rotation: [f32; 3],
    #[serde(default = "default_scale")]
    pub scale: f32,
}

fn default_scale() -> f32 {
    1.0
}

impl ObjectSection {
    fn cube(kind: KindSetting, position: [f32; 3]) -> Self {
        Self {
            model: BUILTIN_CUBE.to_string(),
            kind,
            position,
            rotation: [0.0; 3],
            scale: 1.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub camera: CameraSection,
    pub render: RenderSection,
    pub objects: Vec<ObjectSection>,
}

impl SceneConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scene file `{}`", path.display()))?;
        Self::from_toml_str(&text)
            .with_context(|| format!("failed to parse scene file `{}`", path.display()))
    }

    /// Four tumbling cubes around a larger one turning on all three axes
    pub fn demo() -> Self {
        let mut center = ObjectSection::cube(KindSetting::Teapot, [0.0, 0.0, 0.0]);
        center.scale = 2.0;

        Self {
            camera: CameraSection::default(),
            render: RenderSection::default(),
            objects: vec![
                ObjectSection::cube(KindSetting::Cube, [-2.5, 0.0, 0.0]),
                ObjectSection::cube(KindSetting::Cube, [2.5, 0.0, 0.0]),
                ObjectSection::cube(KindSetting::Cube, [0.0, 2.5, 0.0]),
                ObjectSection::cube(KindSetting::Cube, [0.0, -2.5, 0.0]),
                center,
            ],
        }
    }

    pub fn camera(&self) -> Camera {
        Camera::new(self.camera.distance)
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            cull_backfaces: self.render.cull_backfaces,
            depth_order: self.render.depth_order.into(),
            focal_length: self.camera.focal_length,
            camera_orbit_rate: self.camera.orbit_rate,
        }
    }

    /// Place every object, loading each distinct model once
    pub fn build_scene(&self, library: &mut ModelLibrary) -> Result<Scene, LibraryError> {
        let mut scene = Scene::new();
        for object in &self.objects {
            let model = library.get(&object.model)?;
            scene.add(SceneObject::placed(
                model,
                object.kind.into(),
                Vector3::from(object.position),
                EulerAngles::from(object.rotation),
                object.scale,
            ));
        }
        Ok(scene)
    }
}
