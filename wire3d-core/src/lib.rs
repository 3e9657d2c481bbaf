/// wire3d core - software transform pipeline for wireframe and filled meshes
///
/// Stateless math plus the per-frame pipeline: object -> world -> camera
/// transforms, backface culling, painter's-algorithm depth sorting and
/// perspective projection onto any `DrawSurface`.

pub mod buffer;
pub mod frame;
pub mod geometry;
pub mod obj;
pub mod pipeline;
pub mod projection;
pub mod scene;
pub mod surface;
pub mod transform;

// Re-export commonly used types
pub use frame::{FrameClock, FrameRenderer, FrameStats, RenderOptions};
pub use geometry::{Model, ModelError};
pub use obj::{parse_obj, ObjError, ObjMesh};
pub use pipeline::DepthOrder;
pub use projection::{Camera, Projection, Viewport};
pub use scene::{ObjectKind, Scene, SceneObject};
pub use surface::DrawSurface;
pub use transform::{EulerAngles, Transform};
