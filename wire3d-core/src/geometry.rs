/// Model geometry: a flat object-space vertex buffer plus triangle connectivity
use nalgebra::Point3;
use thiserror::Error;

use crate::buffer::VertexBuffer;

/// Three vertex positions, in winding order
pub type TrianglePoints = [Point3<f32>; 3];

#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("face {face} references vertex {index}, but the model has {vertex_count} vertices")]
    IndexOutOfRange {
        face: usize,
        index: u32,
        vertex_count: usize,
    },
}

/// How vertices group into triangles
#[derive(Debug, Clone, PartialEq)]
pub enum Connectivity {
    /// Vertices are already grouped in consecutive triples
    Implicit,
    /// Index triples into the vertex buffer
    Indexed(Vec<[u32; 3]>),
}

/// Immutable geometry shared by any number of scene objects
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    vertices: VertexBuffer,
    connectivity: Connectivity,
}

impl Model {
    /// Build a model from a triangle soup; connectivity is implicit
    pub fn from_triangles(triangles: &[TrianglePoints]) -> Self {
        let points: Vec<Point3<f32>> = triangles.iter().flatten().copied().collect();
        Self {
            vertices: VertexBuffer::from_points(&points),
            connectivity: Connectivity::Implicit,
        }
    }

    /// Build a model from shared positions and index triples
    pub fn from_indexed(
        positions: &[Point3<f32>],
        faces: Vec<[u32; 3]>,
    ) -> Result<Self, ModelError> {
        let vertex_count = positions.len();
        for (face, tri) in faces.iter().enumerate() {
            if let Some(&index) = tri.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(ModelError::IndexOutOfRange {
                    face,
                    index,
                    vertex_count,
                });
            }
        }

        Ok(Self {
            vertices: VertexBuffer::from_points(positions),
            connectivity: Connectivity::Indexed(faces),
        })
    }

    /// Axis-aligned cube centred on the origin.
    ///
    /// 8 corners, 6 quads split into 2 triangles each, wound so every face
    /// normal (right-hand rule) points outwards.
    pub fn cube(size: f32) -> Self {
        let h = size / 2.0;
        let corners = [
            Point3::new(-h, -h, -h),
            Point3::new(h, -h, -h),
            Point3::new(h, h, -h),
            Point3::new(-h, h, -h),
            Point3::new(-h, -h, h),
            Point3::new(h, -h, h),
            Point3::new(h, h, h),
            Point3::new(-h, h, h),
        ];
        let quads: [[u32; 4]; 6] = [
            [4, 5, 6, 7], // +Z
            [1, 0, 3, 2], // -Z
            [3, 7, 6, 2], // +Y
            [0, 1, 5, 4], // -Y
            [1, 2, 6, 5], // +X
            [0, 4, 7, 3], // -X
        ];
        let faces = quads
            .iter()
            .flat_map(|&[a, b, c, d]| [[a, b, c], [a, c, d]])
            .collect();

        Self {
            vertices: VertexBuffer::from_points(&corners),
            connectivity: Connectivity::Indexed(faces),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        match &self.connectivity {
            Connectivity::Implicit => self.vertices.len() / 3,
            Connectivity::Indexed(faces) => faces.len(),
        }
    }

    pub fn vertices(&self) -> &VertexBuffer {
        &self.vertices
    }

    pub fn vertex(&self, index: usize) -> Point3<f32> {
        self.vertices.get(index)
    }

    pub fn connectivity(&self) -> &Connectivity {
        &self.connectivity
    }

    /// Vertex indices of triangle `t`
    pub fn triangle(&self, t: usize) -> [u32; 3] {
        match &self.connectivity {
            Connectivity::Implicit => {
                let base = (t * 3) as u32;
                [base, base + 1, base + 2]
            }
            Connectivity::Indexed(faces) => faces[t],
        }
    }

    pub fn triangle_indices(&self) -> TriangleIndices<'_> {
        TriangleIndices {
            model: self,
            next: 0,
        }
    }

    /// Positions of every triangle, in order
    pub fn triangles(&self) -> impl Iterator<Item = TrianglePoints> + '_ {
        self.triangle_indices()
            .map(|[a, b, c]| [self.vertex(a as usize), self.vertex(b as usize), self.vertex(c as usize)])
    }
}

/// Iterator over the index triples of a model, whatever its connectivity
pub struct TriangleIndices<'a> {
    model: &'a Model,
    next: usize,
}

impl Iterator for TriangleIndices<'_> {
    type Item = [u32; 3];

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.model.triangle_count() {
            return None;
        }
        let tri = self.model.triangle(self.next);
        self.next += 1;
        Some(tri)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.model.triangle_count() - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TriangleIndices<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;
    use std::collections::HashSet;

    #[test]
    fn test_cube_topology() {
        let cube = Model::cube(0.5);
        assert_eq!(cube.triangle_count(), 12);
        assert_eq!(cube.vertex_count(), 8);

        let unique: HashSet<[u32; 3]> = cube
            .vertices()
            .iter()
            .map(|p| [p.x.to_bits(), p.y.to_bits(), p.z.to_bits()])
            .collect();
        assert_eq!(unique.len(), 8);
        assert!(cube.vertices().iter().all(|p| p.coords.amax() == 0.25));
    }

    #[test]
    fn test_cube_faces_are_planar_and_outward() {
        let cube = Model::cube(0.5);
        let triangles: Vec<TrianglePoints> = cube.triangles().collect();

        for pair in triangles.chunks_exact(2) {
            let normals: Vec<Vector3<f32>> = pair
                .iter()
                .map(|[a, b, c]| (b - a).cross(&(c - a)))
                .collect();

            // Both halves of a quad share one plane and one orientation
            assert!((normals[0].normalize() - normals[1].normalize()).norm() < 1e-6);
            for ([a, b, c], n) in pair.iter().zip(&normals) {
                let centroid = (a.coords + b.coords + c.coords) / 3.0;
                assert!(n.dot(&centroid) > 0.0, "face normal points inwards");
            }
        }
    }

    #[test]
    fn test_from_triangles_is_implicit() {
        let tri = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let model = Model::from_triangles(&[tri, tri]);
        assert_eq!(model.connectivity(), &Connectivity::Implicit);
        assert_eq!(model.vertex_count(), 6);
        assert_eq!(model.triangle_count(), 2);
        assert_eq!(
            model.triangle_indices().collect::<Vec<_>>(),
            vec![[0, 1, 2], [3, 4, 5]]
        );
        assert_eq!(model.triangles().nth(1), Some(tri));
    }

    #[test]
    fn test_from_indexed_validates_indices() {
        let positions = [Point3::origin(), Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0)];
        assert!(Model::from_indexed(&positions, vec![[0, 1, 2]]).is_ok());

        let err = Model::from_indexed(&positions, vec![[0, 1, 2], [2, 1, 3]]).unwrap_err();
        assert_eq!(
            err,
            ModelError::IndexOutOfRange {
                face: 1,
                index: 3,
                vertex_count: 3
            }
        );
    }

    #[test]
    fn test_triangle_indices_len() {
        let cube = Model::cube(1.0);
        assert_eq!(cube.triangle_indices().len(), 12);
    }
}
