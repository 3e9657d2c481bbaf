/// Flat scratch buffers reused across frames
use nalgebra::Point3;

/// Scalars per vertex in every vertex buffer
pub const STRIDE: usize = 3;

/// A fixed-size run of `x, y, z` scalars.
///
/// The length is set at construction and never changes; stages overwrite
/// vertices in place.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexBuffer {
    data: Vec<f32>,
}

impl VertexBuffer {
    pub fn new(vertex_count: usize) -> Self {
        Self {
            data: vec![0.0; vertex_count * STRIDE],
        }
    }

    pub fn from_points(points: &[Point3<f32>]) -> Self {
        let mut buffer = Self::new(points.len());
        for (i, p) in points.iter().enumerate() {
            buffer.set(i, p);
        }
        buffer
    }

    /// Number of vertices (not scalars)
    pub fn len(&self) -> usize {
        self.data.len() / STRIDE
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Point3<f32> {
        let i = index * STRIDE;
        Point3::new(self.data[i], self.data[i + 1], self.data[i + 2])
    }

    #[inline]
    pub fn set(&mut self, index: usize, p: &Point3<f32>) {
        let i = index * STRIDE;
        self.data[i] = p.x;
        self.data[i + 1] = p.y;
        self.data[i + 2] = p.z;
    }

    #[inline]
    pub fn z(&self, index: usize) -> f32 {
        self.data[index * STRIDE + 2]
    }

    pub fn iter(&self) -> impl Iterator<Item = Point3<f32>> + '_ {
        self.data
            .chunks_exact(STRIDE)
            .map(|c| Point3::new(c[0], c[1], c[2]))
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

/// Working set of triangles: a fixed-capacity buffer plus a valid-length counter.
///
/// Culling compacts survivors to the front and shrinks the counter; the
/// storage itself is never resized. `reset` refills it from the pristine list.
#[derive(Debug, Clone)]
pub struct TriangleSet {
    indices: Vec<[u32; 3]>,
    len: usize,
}

impl TriangleSet {
    pub fn new(pristine: &[[u32; 3]]) -> Self {
        Self {
            indices: pristine.to_vec(),
            len: pristine.len(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.indices.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[[u32; 3]] {
        &self.indices[..self.len]
    }

    pub fn as_mut_slice(&mut self) -> &mut [[u32; 3]] {
        &mut self.indices[..self.len]
    }

    /// Restore every triangle in submission order
    pub fn reset(&mut self, pristine: &[[u32; 3]]) {
        assert_eq!(
            pristine.len(),
            self.indices.len(),
            "pristine triangle list does not match working set capacity"
        );
        self.indices.copy_from_slice(pristine);
        self.len = pristine.len();
    }

    /// Keep the triangles for which `keep` holds, preserving their order.
    /// Returns the new length.
    pub fn retain<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&[u32; 3]) -> bool,
    {
        let mut count = 0;
        for i in 0..self.len {
            let tri = self.indices[i];
            if keep(&tri) {
                self.indices[count] = tri;
                count += 1;
            }
        }
        self.len = count;
        count
    }
}
