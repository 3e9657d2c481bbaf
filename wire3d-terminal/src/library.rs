/// Loads models from disk once and shares them between objects
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use wire3d_core::{obj, Model, ObjError};

/// Name that selects the built-in cube instead of a file
pub const BUILTIN_CUBE: &str = "cube";

/// Edge length of the built-in cube
pub const CUBE_SIZE: f32 = 0.5;

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("failed to read model `{}`", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse model `{}`", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ObjError,
    },
}

/// Model cache keyed by the name used in the scene description
pub struct ModelLibrary {
    base_dir: PathBuf,
    models: HashMap<String, Arc<Model>>,
}

impl ModelLibrary {
    /// Relative model paths resolve against `base_dir`
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            models: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Fetch a model, loading it on first use
    pub fn get(&mut self, name: &str) -> Result<Arc<Model>, LibraryError> {
        if let Some(model) = self.models.get(name) {
            return Ok(Arc::clone(model));
        }

        let model = if name == BUILTIN_CUBE {
            Model::cube(CUBE_SIZE)
        } else {
            self.load(&self.base_dir.join(name))?
        };
        let model = Arc::new(model);
        self.models.insert(name.to_string(), Arc::clone(&model));
        Ok(model)
    }

    fn load(&self, path: &Path) -> Result<Model, LibraryError> {
        log::debug!("loading model {}", path.display());

        let data = fs::read(path).map_err(|source| LibraryError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let parse_error = |source| LibraryError::Parse {
            path: path.to_path_buf(),
            source,
        };
        let model = obj::parse_obj_bytes(&data)
            .and_then(|mesh| mesh.into_model())
            .map_err(parse_error)?;

        log::info!(
            "loaded {}: {} vertices, {} triangles",
            path.display(),
            model.vertex_count(),
            model.triangle_count()
        );
        Ok(model)
    }
}
