use crate::{BatchMesh, Rgba};

use ilattice::glam::Vec3;
use std::io::{self, Write};
use thiserror::Error;

/// Reasons a PLY export can be refused or fail.
#[derive(Debug, Error)]
pub enum PlyError {
    #[error("vertex and color buffers have mismatched lengths ({vertices} vs {colors})")]
    MismatchedBuffers { vertices: usize, colors: usize },
    #[error("face index count {0} is not a multiple of 3")]
    RaggedFaces(usize),
    #[error("nothing to export: empty vertex, color, or face buffer")]
    Empty,
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Writes an ASCII PLY document: header, `x y z r g b` vertex lines, then
/// `3 i j k` face lines.
///
/// Invalid input is rejected before a single byte is written, so a failed
/// export never leaves a partial document behind (barring I/O errors from the
/// writer itself).
pub fn write_ply<W: Write>(
    writer: &mut W,
    vertices: &[Vec3],
    colors: &[Rgba],
    faces: &[u32],
) -> Result<(), PlyError> {
    if vertices.is_empty() || colors.is_empty() || faces.is_empty() {
        return Err(PlyError::Empty);
    }
    if vertices.len() != colors.len() {
        return Err(PlyError::MismatchedBuffers {
            vertices: vertices.len(),
            colors: colors.len(),
        });
    }
    if faces.len() % 3 != 0 {
        return Err(PlyError::RaggedFaces(faces.len()));
    }

    writeln!(writer, "ply")?;
    writeln!(writer, "format ascii 1.0")?;
    writeln!(writer, "element vertex {}", vertices.len())?;
    writeln!(writer, "property float x")?;
    writeln!(writer, "property float y")?;
    writeln!(writer, "property float z")?;
    writeln!(writer, "property uchar red")?;
    writeln!(writer, "property uchar green")?;
    writeln!(writer, "property uchar blue")?;
    writeln!(writer, "element face {}", faces.len() / 3)?;
    writeln!(writer, "property list uchar int vertex_indices")?;
    writeln!(writer, "end_header")?;

    for (v, c) in vertices.iter().zip(colors) {
        writeln!(writer, "{} {} {} {} {} {}", v.x, v.y, v.z, c.r, c.g, c.b)?;
    }
    for face in faces.chunks_exact(3) {
        writeln!(writer, "3 {} {} {}", face[0], face[1], face[2])?;
    }

    Ok(())
}

impl BatchMesh {
    /// Exports the batched mesh as ASCII PLY.
    pub fn write_ply<W: Write>(&self, writer: &mut W) -> Result<(), PlyError> {
        let vertices: Vec<Vec3> = self.vertices.iter().map(|v| v.position.into()).collect();
        let colors: Vec<Rgba> = self.vertices.iter().map(|v| v.color).collect();

        write_ply(writer, &vertices, &colors, &self.indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_input() -> (Vec<Vec3>, Vec<Rgba>, Vec<u32>) {
        (
            vec![
                Vec3::ZERO,
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            vec![Rgba::new(255, 0, 0, 255); 3],
            vec![0, 1, 2],
        )
    }

    #[test]
    fn writes_header_and_elements() {
        let (vertices, colors, faces) = sample_input();
        let mut out = Vec::new();
        write_ply(&mut out, &vertices, &colors, &faces).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "ply");
        assert_eq!(lines[1], "format ascii 1.0");
        assert!(lines.contains(&"element vertex 3"));
        assert!(lines.contains(&"element face 1"));
        assert!(lines.contains(&"end_header"));
        assert!(text.ends_with("3 0 1 2\n"));
        assert!(lines.contains(&"0 0 0 255 0 0"));
    }

    #[test]
    fn rejects_mismatched_buffers_without_writing() {
        let (vertices, mut colors, faces) = sample_input();
        colors.pop();

        let mut out = Vec::new();
        let err = write_ply(&mut out, &vertices, &colors, &faces).unwrap_err();
        assert!(matches!(err, PlyError::MismatchedBuffers { .. }));
        assert!(out.is_empty());
    }

    #[test]
    fn rejects_empty_input() {
        let mut out = Vec::new();
        let err = write_ply(&mut out, &[], &[], &[]).unwrap_err();
        assert!(matches!(err, PlyError::Empty));
        assert!(out.is_empty());
    }

    #[test]
    fn rejects_ragged_faces() {
        let (vertices, colors, mut faces) = sample_input();
        faces.push(0);

        let mut out = Vec::new();
        let err = write_ply(&mut out, &vertices, &colors, &faces).unwrap_err();
        assert!(matches!(err, PlyError::RaggedFaces(4)));
        assert!(out.is_empty());
    }
}
