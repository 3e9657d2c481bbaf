/// The drawing primitive the pipeline feeds
use nalgebra::Point2;

/// Something that can stroke and/or fill closed polygons.
///
/// Calls arrive in draw order; later polygons land on top of earlier ones.
pub trait DrawSurface {
    /// Start a new frame
    fn clear(&mut self) {}

    /// Draw one closed polygon given its corners in pixel coordinates
    fn polygon(&mut self, points: &[Point2<f32>]);
}

/// Records every polygon instead of drawing it
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct PolygonRecorder {
    pub polygons: Vec<Vec<Point2<f32>>>,
    pub clears: usize,
}

#[cfg(test)]
impl DrawSurface for PolygonRecorder {
    fn clear(&mut self) {
        self.clears += 1;
        self.polygons.clear();
    }

    fn polygon(&mut self, points: &[Point2<f32>]) {
        self.polygons.push(points.to_vec());
    }
}
