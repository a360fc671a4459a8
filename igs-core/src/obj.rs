/// Wireframe subset of the Wavefront OBJ format
use log::trace;
use nalgebra::Point3;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_till},
    character::complete::{char, i64 as index, not_line_ending, space0, space1},
    combinator::{all_consuming, map, opt},
    multi::separated_list1,
    number::complete::double,
    sequence::{pair, preceded, terminated, tuple},
    IResult,
};

use crate::error::{Error, Result};
use crate::geometry::Segment3;

/// A named group of edges read from an OBJ file
#[derive(Debug, Clone, PartialEq)]
pub struct ObjModel {
    pub name: String,
    pub segments: Vec<Segment3>,
}

#[derive(Debug, Clone, PartialEq)]
enum Record {
    Vertex(Point3<f64>),
    Polyline(Vec<i64>),
    Face(Vec<i64>),
    Object(String),
}

/// Parse OBJ text into models.
///
/// Only `v`, `l`, `f` and `o` records are read; other records are skipped.
/// Faces become closed edge loops. Vertex indices are shared across objects
/// as in the format itself.
pub fn parse_obj(input: &str) -> Result<Vec<ObjModel>> {
    let mut vertices: Vec<Point3<f64>> = Vec::new();
    let mut models = Vec::new();
    let mut current = ObjModel {
        name: String::from("default"),
        segments: Vec::new(),
    };

    for (number, line) in input.lines().enumerate() {
        let number = number + 1;
        let line = line.trim();
        let keyword = line.split_whitespace().next().unwrap_or("");
        if !matches!(keyword, "v" | "l" | "f" | "o") {
            if !line.is_empty() && !line.starts_with('#') {
                trace!("obj line {number}: skipping '{keyword}' record");
            }
            continue;
        }

        let record = match all_consuming(terminated(parse_record, space0))(line) {
            Ok((_, record)) => record,
            Err(e) => return Err(Error::Obj(format!("line {number}: {e:?}"))),
        };

        match record {
            Record::Vertex(point) => vertices.push(point),
            Record::Object(name) => {
                if !current.segments.is_empty() {
                    models.push(current);
                }
                current = ObjModel {
                    name,
                    segments: Vec::new(),
                };
            }
            Record::Polyline(indices) => {
                let points = resolve(&indices, &vertices, number)?;
                current
                    .segments
                    .extend(points.windows(2).map(|pair| Segment3::new(pair[0], pair[1])));
            }
            Record::Face(indices) => {
                let points = resolve(&indices, &vertices, number)?;
                current
                    .segments
                    .extend(points.windows(2).map(|pair| Segment3::new(pair[0], pair[1])));
                if points.len() > 2 {
                    current.segments.push(Segment3::new(points[points.len() - 1], points[0]));
                }
            }
        }
    }

    if !current.segments.is_empty() {
        models.push(current);
    }
    Ok(models)
}

/// Serialize edges as one OBJ object made of `l` records
pub fn write_obj(name: &str, segments: &[Segment3]) -> String {
    let mut vertices: Vec<Point3<f64>> = Vec::new();
    let mut lines = Vec::with_capacity(segments.len());

    for segment in segments {
        let mut slot = |p: Point3<f64>| match vertices.iter().position(|v| *v == p) {
            Some(i) => i + 1,
            None => {
                vertices.push(p);
                vertices.len()
            }
        };
        let a = slot(segment.start);
        let b = slot(segment.end);
        lines.push((a, b));
    }

    let mut out = format!("o {name}\n");
    for v in &vertices {
        out.push_str(&format!("v {} {} {}\n", v.x, v.y, v.z));
    }
    for (a, b) in lines {
        out.push_str(&format!("l {a} {b}\n"));
    }
    out
}

fn resolve(indices: &[i64], vertices: &[Point3<f64>], line: usize) -> Result<Vec<Point3<f64>>> {
    let count = vertices.len() as i64;
    indices
        .iter()
        .map(|&i| {
            let position = if i < 0 { count + i } else { i - 1 };
            if i == 0 || position < 0 || position >= count {
                return Err(Error::Obj(format!("line {line}: vertex index {i} out of range")));
            }
            Ok(vertices[position as usize])
        })
        .collect()
}

fn parse_record(input: &str) -> IResult<&str, Record> {
    alt((
        map(preceded(pair(tag("v"), space1), parse_point), Record::Vertex),
        map(preceded(pair(tag("l"), space1), parse_indices), Record::Polyline),
        map(preceded(pair(tag("f"), space1), parse_indices), Record::Face),
        map(preceded(pair(tag("o"), space1), not_line_ending), |name: &str| {
            Record::Object(name.trim().to_string())
        }),
    ))(input)
}

fn parse_point(input: &str) -> IResult<&str, Point3<f64>> {
    let (input, (x, y, z)) = tuple((double, preceded(space1, double), preceded(space1, double)))(input)?;
    // Optional weight
    let (input, _) = opt(preceded(space1, double))(input)?;
    Ok((input, Point3::new(x, y, z)))
}

/// Vertex references: `i`, `i/t`, `i//n` or `i/t/n`
fn parse_indices(input: &str) -> IResult<&str, Vec<i64>> {
    separated_list1(
        space1,
        terminated(index, opt(preceded(char('/'), take_till(|c: char| c.is_whitespace())))),
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CUBE_FACES: &str = "\
# unit cube, two faces
o cube
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
v 0 0 1
v 1 0 1
vn 0 0 1
f 1/1/1 2/2/1 3/3/1 4/4/1
f -3//1 -2//1 2//1 1//1
";

    #[test]
    fn test_parse_faces() {
        let models = parse_obj(CUBE_FACES).unwrap();
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].name, "cube");
        assert_eq!(models[0].segments.len(), 8);
        // Closing edge of the first face
        assert_eq!(
            models[0].segments[3],
            Segment3::new(Point3::new(0.0, 1.0, 0.0), Point3::origin())
        );
        // Relative indices resolve against the vertices read so far
        assert_eq!(models[0].segments[4].start, Point3::new(0.0, 1.0, 0.0));
        assert_eq!(models[0].segments[4].end, Point3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_parse_polylines_and_objects() {
        let text = "v 0 0 0\nv 1 0 0\nv 1 1 0\nl 1 2 3\n\no second\nl 3 1\n";
        let models = parse_obj(text).unwrap();
        assert_eq!(models.len(), 2);
        assert_eq!(models[0].name, "default");
        assert_eq!(models[0].segments.len(), 2);
        assert_eq!(models[1].name, "second");
        assert_eq!(
            models[1].segments,
            vec![Segment3::new(Point3::new(1.0, 1.0, 0.0), Point3::origin())]
        );
    }

    #[test]
    fn test_index_out_of_range() {
        assert!(matches!(parse_obj("v 0 0 0\nl 1 2\n"), Err(Error::Obj(_))));
        assert!(matches!(parse_obj("v 0 0 0\nl 0 1\n"), Err(Error::Obj(_))));
        assert!(matches!(parse_obj("v 0 0 0\nl 1 -2\n"), Err(Error::Obj(_))));
    }

    #[test]
    fn test_malformed_vertex() {
        let err = parse_obj("v 1.0 two 3.0\n").unwrap_err();
        assert!(matches!(err, Error::Obj(message) if message.starts_with("line 1")));
    }

    #[test]
    fn test_write_then_parse() {
        let segments = vec![
            Segment3::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.5, 0.0, -2.0)),
            Segment3::new(Point3::new(1.5, 0.0, -2.0), Point3::new(0.0, 3.0, 0.25)),
        ];
        let text = write_obj("path", &segments);
        assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 3);
        assert!(text.ends_with("l 1 2\nl 2 3\n"));

        let models = parse_obj(&text).unwrap();
        assert_eq!(models, vec![ObjModel { name: "path".into(), segments }]);
    }
}
