/// STL loading into welded, warpable meshes
use nalgebra::Point3;
use nom::{
    bytes::complete::tag,
    character::complete::{multispace0, multispace1, not_line_ending},
    multi::many0,
    number::complete::float,
    sequence::{preceded, tuple},
    IResult,
};

use crate::error::StlError;
use crate::geometry::Mesh;

const HEADER_LEN: usize = 80;
const RECORD_LEN: usize = 50;

type Corners = [Point3<f32>; 3];

fn read_point(bytes: &[u8]) -> Point3<f32> {
    let component = |at: usize| {
        f32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
    };
    Point3::new(component(0), component(4), component(8))
}

/// Parse a binary STL file
pub fn parse_binary_stl(data: &[u8]) -> Result<Mesh, StlError> {
    if data.len() < HEADER_LEN + 4 {
        return Err(StlError::TooSmall(data.len()));
    }

    let count_bytes = &data[HEADER_LEN..HEADER_LEN + 4];
    let expected =
        u32::from_le_bytes([count_bytes[0], count_bytes[1], count_bytes[2], count_bytes[3]])
            as usize;

    let records = &data[HEADER_LEN + 4..];
    let available = records.len() / RECORD_LEN;
    if available < expected {
        return Err(StlError::Truncated {
            parsed: available,
            expected,
        });
    }

    // Normals are recomputed from the corners, so skip the first 12 bytes
    let triangles: Vec<Corners> = records
        .chunks_exact(RECORD_LEN)
        .take(expected)
        .map(|record| {
            [
                read_point(&record[12..24]),
                read_point(&record[24..36]),
                read_point(&record[36..48]),
            ]
        })
        .collect();

    Ok(Mesh::from_triangles(&triangles))
}

/// Parse an ASCII STL file
pub fn parse_ascii_stl(input: &str) -> Result<Mesh, StlError> {
    match solid(input) {
        Ok((_, triangles)) => Ok(Mesh::from_triangles(&triangles)),
        Err(e) => Err(StlError::Malformed(format!("{e:?}"))),
    }
}

fn solid(input: &str) -> IResult<&str, Vec<Corners>> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    let (input, _) = not_line_ending(input)?;
    let (input, triangles) = many0(facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;
    Ok((input, triangles))
}

fn facet(input: &str) -> IResult<&str, Corners> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, _) = vector3(input)?;
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, (a, b, c)) = tuple((corner, corner, corner))(input)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;
    Ok((input, [a, b, c]))
}

fn corner(input: &str) -> IResult<&str, Point3<f32>> {
    let (input, _) = preceded(multispace0, tag("vertex"))(input)?;
    vector3(input)
}

fn vector3(input: &str) -> IResult<&str, Point3<f32>> {
    let (input, x) = preceded(multispace1, float)(input)?;
    let (input, y) = preceded(multispace1, float)(input)?;
    let (input, z) = preceded(multispace1, float)(input)?;
    Ok((input, Point3::new(x, y, z)))
}

/// Detect and parse STL data (ASCII first, then binary)
pub fn parse_stl(data: &[u8]) -> Result<Mesh, StlError> {
    if data.starts_with(b"solid") {
        if let Ok(text) = std::str::from_utf8(data) {
            if let Ok(mesh) = parse_ascii_stl(text) {
                return Ok(mesh);
            }
        }
    }

    parse_binary_stl(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD: &str = "solid quad
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 1 0 0
      vertex 1 1 0
    endloop
  endfacet
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 1 1 0
      vertex 0 1 0
    endloop
  endfacet
endsolid quad
";

    fn binary(triangles: &[[[f32; 3]; 3]], declared: u32) -> Vec<u8> {
        let mut data = vec![0u8; HEADER_LEN];
        data.extend_from_slice(&declared.to_le_bytes());
        for triangle in triangles {
            data.extend_from_slice(&[0u8; 12]);
            for corner in triangle {
                for component in corner {
                    data.extend_from_slice(&component.to_le_bytes());
                }
            }
            data.extend_from_slice(&[0u8; 2]);
        }
        data
    }

    #[test]
    fn test_parse_binary_header() {
        let mesh = parse_binary_stl(&binary(&[], 0)).unwrap();
        assert!(mesh.is_empty());
    }

    #[test]
    fn test_binary_too_small() {
        assert!(matches!(
            parse_binary_stl(&[0u8; 10]),
            Err(StlError::TooSmall(10))
        ));
    }

    #[test]
    fn test_binary_truncated() {
        let data = binary(&[[[0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]], 3);
        assert!(matches!(
            parse_binary_stl(&data),
            Err(StlError::Truncated {
                parsed: 1,
                expected: 3
            })
        ));
    }

    #[test]
    fn test_binary_welds_vertices() {
        let data = binary(
            &[
                [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0]],
                [[0.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
            ],
            2,
        );
        let mesh = parse_stl(&data).unwrap();
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.faces.len(), 2);
    }

    #[test]
    fn test_ascii_quad() {
        let mesh = parse_stl(QUAD.as_bytes()).unwrap();
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.faces, vec![[0, 1, 2], [0, 2, 3]]);
    }

    #[test]
    fn test_ascii_malformed() {
        let result = parse_ascii_stl("solid broken\n facet normal 0 0\n");
        assert!(matches!(result, Err(StlError::Malformed(_))));
    }
}
