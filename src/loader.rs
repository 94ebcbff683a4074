//! Text input formats for meshes.
//!
//! Two encodings are understood:
//!
//! - **Grid**: one `x y z` point per line. The points form an implicit
//!   `n x n` square grid (row-major) and every grid cell becomes two
//!   triangles.
//! - **Tagged**: a `POINTS` section followed by a `POLYGONS` section. Each
//!   polygon line starts with its corner count followed by that many point
//!   indices:
//!
//! ```text
//! POINTS 4 float
//! 0 0 0
//! 1 0 0
//! 1 1 0
//! 0 1 0
//! POLYGONS 1 5
//! 4 0 1 2 3
//! ```
//!
//! Counts on the tag lines are informational and ignored. Lines before the
//! first tag (file headers) and blank lines are skipped. A file containing a
//! `POINTS` tag is parsed as tagged, anything else as a grid.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::math::vec3::Vec3;
use crate::mesh::LoadError;

/// Raw points and polygons, ready for [`crate::mesh::Mesh::from_polygons`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub points: Vec<Vec3>,
    pub polygons: Vec<Vec<usize>>,
}

/// Reads and parses a mesh file, detecting its format.
pub fn load_file(path: impl AsRef<Path>) -> Result<MeshData, LoadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let data = parse_mesh_str(&text)?;
    log::info!(
        "read {}: {} points, {} polygons",
        path.display(),
        data.points.len(),
        data.polygons.len()
    );
    Ok(data)
}

/// Parses mesh text, choosing the tagged format when a `POINTS` tag is present.
pub fn parse_mesh_str(text: &str) -> Result<MeshData, LoadError> {
    let tagged = text
        .lines()
        .any(|line| line.split_whitespace().next() == Some("POINTS"));
    if tagged {
        parse_tagged(text)
    } else {
        parse_grid(text)
    }
}

/// Parses the grid format and triangulates it.
pub fn parse_grid(text: &str) -> Result<MeshData, LoadError> {
    let mut points = Vec::new();
    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        points.push(parse_point(line, index + 1)?);
    }

    let n = grid_side(points.len()).ok_or(LoadError::NonSquareGrid(points.len()))?;
    Ok(MeshData {
        polygons: grid_polygons(n),
        points,
    })
}

/// Two triangles per cell of an `n x n` row-major grid.
///
/// Cell `(r, c)` (with `r, c >= 1`) yields `(r-1,c-1) (r-1,c) (r,c)` and
/// `(r-1,c-1) (r,c) (r,c-1)`, so an `n x n` grid gives `2 (n-1)^2` faces.
pub fn grid_polygons(n: usize) -> Vec<Vec<usize>> {
    let mut polygons = Vec::with_capacity(2 * n.saturating_sub(1).pow(2));
    for row in 1..n {
        for col in 1..n {
            let top_left = (row - 1) * n + (col - 1);
            let top_right = (row - 1) * n + col;
            let bottom_right = row * n + col;
            let bottom_left = row * n + (col - 1);
            polygons.push(vec![top_left, top_right, bottom_right]);
            polygons.push(vec![top_left, bottom_right, bottom_left]);
        }
    }
    polygons
}

fn grid_side(count: usize) -> Option<usize> {
    let n = (count as f64).sqrt().round() as usize;
    (n >= 2 && n * n == count).then_some(n)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Header,
    Points,
    Polygons,
}

/// Parses the tagged `POINTS` / `POLYGONS` format.
pub fn parse_tagged(text: &str) -> Result<MeshData, LoadError> {
    let mut section = Section::Header;
    let mut coords: Vec<f32> = Vec::new();
    let mut polygons = Vec::new();
    let mut saw_polygons = false;

    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        let mut tokens = line.split_whitespace().peekable();
        match tokens.peek() {
            None => continue,
            Some(&"POINTS") => {
                section = Section::Points;
                continue;
            }
            Some(&"POLYGONS") => {
                section = Section::Polygons;
                saw_polygons = true;
                continue;
            }
            Some(_) => {}
        }

        match section {
            Section::Header => {}
            Section::Points => {
                for token in tokens {
                    coords.push(parse_number(token, line_no)?);
                }
            }
            Section::Polygons => {
                let count: usize = parse_number(tokens.next().unwrap_or_default(), line_no)?;
                let indices = tokens
                    .map(|token| parse_number::<usize>(token, line_no))
                    .collect::<Result<Vec<_>, _>>()?;
                if indices.len() != count {
                    return Err(LoadError::Malformed {
                        line: line_no,
                        message: format!(
                            "polygon declares {count} corners but lists {}",
                            indices.len()
                        ),
                    });
                }
                polygons.push(indices);
            }
        }
    }

    if !saw_polygons {
        return Err(LoadError::Malformed {
            line: text.lines().count(),
            message: "missing POLYGONS section".to_string(),
        });
    }
    if coords.len() % 3 != 0 {
        return Err(LoadError::Malformed {
            line: 0,
            message: format!(
                "POINTS section holds {} numbers, not a multiple of 3",
                coords.len()
            ),
        });
    }

    let points = coords
        .chunks_exact(3)
        .map(|c| Vec3::new(c[0], c[1], c[2]))
        .collect();
    Ok(MeshData { points, polygons })
}

fn parse_point(line: &str, line_no: usize) -> Result<Vec3, LoadError> {
    let coords = line
        .split_whitespace()
        .map(|token| parse_number::<f32>(token, line_no))
        .collect::<Result<Vec<_>, _>>()?;
    match coords.as_slice() {
        [x, y, z] => Ok(Vec3::new(*x, *y, *z)),
        _ => Err(LoadError::Malformed {
            line: line_no,
            message: format!("expected 3 coordinates, got {}", coords.len()),
        }),
    }
}

fn parse_number<T: FromStr>(token: &str, line_no: usize) -> Result<T, LoadError> {
    token.parse().map_err(|_| LoadError::InvalidNumber {
        line: line_no,
        token: token.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_text(n: usize) -> String {
        let mut text = String::new();
        for row in 0..n {
            for col in 0..n {
                text.push_str(&format!("{col} {row} 0.5\n"));
            }
        }
        text
    }

    #[test]
    fn grid_yields_two_triangles_per_cell() {
        for n in [2, 3, 5] {
            let data = parse_grid(&grid_text(n)).unwrap();
            assert_eq!(data.points.len(), n * n);
            assert_eq!(data.polygons.len(), 2 * (n - 1) * (n - 1));
        }
    }

    #[test]
    fn grid_cell_triangulation_order() {
        let polygons = grid_polygons(2);
        assert_eq!(polygons, vec![vec![0, 1, 3], vec![0, 3, 2]]);
    }

    #[test]
    fn non_square_grid_is_rejected() {
        let text = "0 0 0\n1 0 0\n0 1 0\n";
        assert!(matches!(parse_grid(text), Err(LoadError::NonSquareGrid(3))));
    }

    #[test]
    fn non_numeric_coordinate_reports_line() {
        let text = "0 0 0\n1 zero 0\n";
        match parse_grid(text) {
            Err(LoadError::InvalidNumber { line, token }) => {
                assert_eq!(line, 2);
                assert_eq!(token, "zero");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn tagged_format_parses_mixed_polygons() {
        let text = "\
# header line
POINTS 5 float
0 0 0
1 0 0
1 1 0
0 1 0
0.5 0.5 1

POLYGONS 2 9
4 0 1 2 3
3 0 1 4
";
        let data = parse_mesh_str(text).unwrap();
        assert_eq!(data.points.len(), 5);
        assert_eq!(data.points[4], Vec3::new(0.5, 0.5, 1.0));
        assert_eq!(data.polygons, vec![vec![0, 1, 2, 3], vec![0, 1, 4]]);
    }

    #[test]
    fn tagged_polygon_count_mismatch_is_malformed() {
        let text = "POINTS\n0 0 0\n1 0 0\n0 1 0\nPOLYGONS\n4 0 1 2\n";
        assert!(matches!(
            parse_tagged(text),
            Err(LoadError::Malformed { line: 6, .. })
        ));
    }

    #[test]
    fn tagged_without_polygons_is_malformed() {
        let text = "POINTS\n0 0 0\n";
        assert!(matches!(parse_tagged(text), Err(LoadError::Malformed { .. })));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_file("/nonexistent/polyshade/mesh.dat").unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }
}
