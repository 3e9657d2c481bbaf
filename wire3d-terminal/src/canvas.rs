/// Character-cell drawing surface for terminal output
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use std::io::Write;
use wire3d_core::DrawSurface;

const FILL_CHAR: char = '.';
const STROKE_CHAR: char = '#';
const FILL_COLOR: Color = Color::Yellow;
const STROKE_COLOR: Color = Color::Red;

/// Upper bound on samples per edge, for edges that run far off screen
const MAX_LINE_STEPS: usize = 4096;

/// How each polygon is put on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DrawStyle {
    /// Edges only
    Wireframe,
    /// Interior only
    Filled,
    /// Interior, then edges on top
    #[default]
    Outlined,
}

impl DrawStyle {
    pub fn next(self) -> Self {
        match self {
            DrawStyle::Wireframe => DrawStyle::Filled,
            DrawStyle::Filled => DrawStyle::Outlined,
            DrawStyle::Outlined => DrawStyle::Wireframe,
        }
    }

    fn fills(self) -> bool {
        matches!(self, DrawStyle::Filled | DrawStyle::Outlined)
    }

    fn strokes(self) -> bool {
        matches!(self, DrawStyle::Wireframe | DrawStyle::Outlined)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    ch: char,
    color: Color,
}

const BLANK: Cell = Cell {
    ch: ' ',
    color: Color::Reset,
};

/// A grid of characters. No depth buffer: later polygons overwrite earlier ones.
pub struct CharCanvas {
    width: usize,
    height: usize,
    x_offset: f32,
    style: DrawStyle,
    cells: Vec<Cell>,
}

impl CharCanvas {
    pub fn new(width: usize, height: usize, style: DrawStyle) -> Self {
        Self {
            width,
            height,
            x_offset: 0.0,
            style,
            cells: vec![BLANK; width * height],
        }
    }

    /// Shift every polygon right, e.g. to centre a narrower viewport
    pub fn with_x_offset(mut self, x_offset: f32) -> Self {
        self.x_offset = x_offset;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn style(&self) -> DrawStyle {
        self.style
    }

    pub fn set_style(&mut self, style: DrawStyle) {
        self.style = style;
    }

    /// Character at a cell, for inspection
    pub fn char_at(&self, x: usize, y: usize) -> char {
        self.cells[y * self.width + x].ch
    }

    /// The canvas as text, one line per row
    pub fn to_text(&self) -> String {
        self.cells
            .chunks(self.width.max(1))
            .map(|row| row.iter().map(|c| c.ch).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn plot(&mut self, x: i32, y: i32, cell: Cell) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        self.cells[idx] = cell;
    }

    fn fill_triangle(&mut self, v0: Point2<f32>, v1: Point2<f32>, v2: Point2<f32>) {
        let cell = Cell {
            ch: FILL_CHAR,
            color: FILL_COLOR,
        };

        // Bounding box
        let min_x = v0.x.min(v1.x).min(v2.x).floor() as i32;
        let max_x = v0.x.max(v1.x).max(v2.x).ceil() as i32;
        let min_y = v0.y.min(v1.y).min(v2.y).floor() as i32;
        let max_y = v0.y.max(v1.y).max(v2.y).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = Point2::new(x as f32 + 0.5, y as f32 + 0.5);
                if let Some((w0, w1, w2)) = barycentric(v0, v1, v2, p) {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        self.plot(x, y, cell);
                    }
                }
            }
        }
    }

    fn stroke_line(&mut self, from: Point2<f32>, to: Point2<f32>) {
        let cell = Cell {
            ch: STROKE_CHAR,
            color: STROKE_COLOR,
        };
        let delta = to - from;
        let steps = (delta.x.abs().max(delta.y.abs()).ceil() as usize).clamp(1, MAX_LINE_STEPS);

        for i in 0..=steps {
            let p = from + delta * (i as f32 / steps as f32);
            self.plot(p.x.floor() as i32, p.y.floor() as i32, cell);
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current = None;
        for (y, row) in self.cells.chunks(self.width.max(1)).enumerate() {
            if y > 0 {
                writer.queue(Print("\r\n"))?;
            }
            for cell in row {
                if current != Some(cell.color) {
                    writer.queue(SetForegroundColor(cell.color))?;
                    current = Some(cell.color);
                }
                writer.queue(Print(cell.ch))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl DrawSurface for CharCanvas {
    fn clear(&mut self) {
        self.cells.fill(BLANK);
    }

    fn polygon(&mut self, points: &[Point2<f32>]) {
        if points.len() < 2 || points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return;
        }
        let shifted: Vec<Point2<f32>> = points
            .iter()
            .map(|p| Point2::new(p.x + self.x_offset, p.y))
            .collect();

        if self.style.fills() {
            for k in 1..shifted.len() - 1 {
                self.fill_triangle(shifted[0], shifted[k], shifted[k + 1]);
            }
        }
        if self.style.strokes() {
            for (i, &from) in shifted.iter().enumerate() {
                let to = shifted[(i + 1) % shifted.len()];
                self.stroke_line(from, to);
            }
        }
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: Point2<f32>,
    v1: Point2<f32>,
    v2: Point2<f32>,
    p: Point2<f32>,
) -> Option<(f32, f32, f32)> {
    let denom = (v1.y - v2.y) * (v0.x - v2.x) + (v2.x - v1.x) * (v0.y - v2.y);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.y - v2.y) * (p.x - v2.x) + (v2.x - v1.x) * (p.y - v2.y)) / denom;
    let w1 = ((v2.y - v0.y) * (p.x - v2.x) + (v0.x - v2.x) * (p.y - v2.y)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
