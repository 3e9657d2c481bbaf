/// Parser for the line-based `v` / `f` mesh text format
use nalgebra::Point3;
use nom::{
    bytes::complete::{tag, take_while},
    character::complete::{char, digit1, space0, space1},
    combinator::{all_consuming, map_res, opt, verify},
    multi::many1,
    number::complete::float,
    sequence::{preceded, terminated, tuple},
    IResult,
};
use thiserror::Error;

use crate::geometry::{Model, ModelError, TrianglePoints};

#[derive(Debug, Error, PartialEq)]
pub enum ObjError {
    #[error("mesh data is not valid UTF-8")]
    InvalidUtf8,
    #[error("line {line}: malformed vertex `{text}`")]
    InvalidVertex { line: usize, text: String },
    #[error("line {line}: malformed face `{text}`")]
    InvalidFace { line: usize, text: String },
    #[error("line {line}: a face needs at least 3 vertices, found {found}")]
    DegenerateFace { line: usize, found: usize },
    #[error("line {line}: vertex index {index} is out of range (1..={vertex_count})")]
    IndexOutOfRange {
        line: usize,
        index: u32,
        vertex_count: usize,
    },
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Vertex positions in declaration order plus 0-based index triples
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjMesh {
    pub positions: Vec<Point3<f32>>,
    pub faces: Vec<[u32; 3]>,
}

impl ObjMesh {
    /// Each face as three positions
    pub fn triangles(&self) -> Vec<TrianglePoints> {
        self.faces
            .iter()
            .map(|&[a, b, c]| {
                [
                    self.positions[a as usize],
                    self.positions[b as usize],
                    self.positions[c as usize],
                ]
            })
            .collect()
    }

    /// Model sharing vertices between faces (explicit indices)
    pub fn into_model(self) -> Result<Model, ObjError> {
        Ok(Model::from_indexed(&self.positions, self.faces)?)
    }

    /// Model with one vertex per triangle corner (implicit triples)
    pub fn to_triangle_model(&self) -> Model {
        Model::from_triangles(&self.triangles())
    }
}

/// Parse mesh text. The first malformed line fails the whole input.
pub fn parse_obj(input: &str) -> Result<ObjMesh, ObjError> {
    let mut mesh = ObjMesh::default();
    // (line number, 1-based indices) resolved once every vertex is known
    let mut raw_faces: Vec<(usize, Vec<u32>)> = Vec::new();

    for (i, raw) in input.lines().enumerate() {
        let line_no = i + 1;
        let line = raw.trim();

        match line.split_whitespace().next() {
            Some("v") => {
                let (_, (x, y, z)) =
                    parse_vertex(line).map_err(|_| ObjError::InvalidVertex {
                        line: line_no,
                        text: line.to_string(),
                    })?;
                mesh.positions.push(Point3::new(x, y, z));
            }
            Some("f") => {
                let (_, indices) = parse_face(line).map_err(|_| ObjError::InvalidFace {
                    line: line_no,
                    text: line.to_string(),
                })?;
                if indices.len() < 3 {
                    return Err(ObjError::DegenerateFace {
                        line: line_no,
                        found: indices.len(),
                    });
                }
                raw_faces.push((line_no, indices));
            }
            _ => {}
        }
    }

    let vertex_count = mesh.positions.len();
    for (line, indices) in raw_faces {
        let mut resolved = Vec::with_capacity(indices.len());
        for index in indices {
            if index == 0 || index as usize > vertex_count {
                return Err(ObjError::IndexOutOfRange {
                    line,
                    index,
                    vertex_count,
                });
            }
            resolved.push(index - 1);
        }

        // Polygons with more than three corners become a fan around the first
        for k in 1..resolved.len() - 1 {
            mesh.faces.push([resolved[0], resolved[k], resolved[k + 1]]);
        }
    }

    if mesh.faces.is_empty() {
        log::warn!("mesh has {} vertices but no faces", vertex_count);
    }
    log::debug!(
        "parsed mesh: {} vertices, {} triangles",
        vertex_count,
        mesh.faces.len()
    );

    Ok(mesh)
}

/// Parse mesh bytes, which must be UTF-8 text
pub fn parse_obj_bytes(data: &[u8]) -> Result<ObjMesh, ObjError> {
    let text = std::str::from_utf8(data).map_err(|_| ObjError::InvalidUtf8)?;
    parse_obj(text)
}

/// A coordinate; `nan` and `inf` are rejected like any other bad number
fn coordinate(input: &str) -> IResult<&str, f32> {
    verify(float, |f: &f32| f.is_finite())(input)
}

/// `v x y z [w]`
fn parse_vertex(input: &str) -> IResult<&str, (f32, f32, f32)> {
    all_consuming(terminated(
        preceded(
            tag("v"),
            tuple((
                preceded(space1, coordinate),
                preceded(space1, coordinate),
                preceded(space1, coordinate),
            )),
        ),
        tuple((opt(preceded(space1, coordinate)), space0)),
    ))(input)
}

/// `f a b c ...` where each entry may carry `/vt/vn` suffixes
fn parse_face(input: &str) -> IResult<&str, Vec<u32>> {
    all_consuming(terminated(
        preceded(tag("f"), many1(preceded(space1, parse_face_index))),
        space0,
    ))(input)
}

fn parse_face_index(input: &str) -> IResult<&str, u32> {
    let (input, index) = map_res(digit1, str::parse::<u32>)(input)?;
    let (input, _) = opt(preceded(
        char('/'),
        take_while(|c: char| c == '/' || c.is_ascii_digit()),
    ))(input)?;
    Ok((input, index))
}
