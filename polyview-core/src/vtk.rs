/// Legacy VTK polydata reader for the ASCII and binary forms
use nalgebra::Point3;
use nom::{
    bytes::complete::tag,
    character::complete::{alpha1, digit1, multispace0, multispace1},
    combinator::map_res,
    number::complete::float,
    sequence::preceded,
    IResult,
};
use thiserror::Error;

use crate::geometry::{Mesh, Polyline, Triangle};

/// Reader errors. Connectivity problems are reported, never panicked
/// over.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VtkError {
    #[error("not a legacy VTK file (missing `# vtk DataFile Version` header)")]
    NotVtk,

    #[error("unsupported dataset `{0}` (only POLYDATA)")]
    UnsupportedDataset(String),

    #[error("unsupported data format `{0}` (expected ASCII or BINARY)")]
    UnsupportedFormat(String),

    #[error("file ends inside the {0} section")]
    Truncated(&'static str),

    #[error("connectivity index {index} out of range for {points} points")]
    IndexOutOfRange { index: usize, points: usize },

    #[error("malformed {0} section")]
    Parse(&'static str),
}

/// Parse a legacy VTK polydata file, either form.
///
/// Polygons are fan-triangulated, triangle strips unwound and `LINES`
/// cells kept as polylines. `VERTICES` cells and trailing attribute
/// data (`POINT_DATA`, `CELL_DATA`, `FIELD`) are skipped.
pub fn parse_vtk(data: &[u8]) -> Result<Mesh, VtkError> {
    let mut cursor = ByteCursor::new(data);

    let magic = cursor.line().ok_or(VtkError::NotVtk)?;
    if !magic.starts_with("# vtk DataFile Version") {
        return Err(VtkError::NotVtk);
    }
    let _title = cursor.line().ok_or(VtkError::Truncated("header"))?;
    let format = cursor
        .line()
        .ok_or(VtkError::Truncated("header"))?
        .trim()
        .to_string();
    let dataset = cursor
        .line()
        .ok_or(VtkError::Truncated("header"))?
        .trim()
        .strip_prefix("DATASET")
        .ok_or(VtkError::Parse("header"))?
        .trim()
        .to_string();
    if dataset != "POLYDATA" {
        return Err(VtkError::UnsupportedDataset(dataset));
    }

    let sections = match format.as_str() {
        "ASCII" => {
            let body =
                std::str::from_utf8(cursor.rest()).map_err(|_| VtkError::Parse("body"))?;
            parse_ascii(body)?
        }
        "BINARY" => parse_binary(&mut cursor)?,
        _ => return Err(VtkError::UnsupportedFormat(format)),
    };
    sections.into_mesh()
}

/// Raw section contents before connectivity is resolved.
#[derive(Default)]
struct Sections {
    points: Vec<Point3<f32>>,
    polygons: Vec<Vec<usize>>,
    strips: Vec<Vec<usize>>,
    lines: Vec<Vec<usize>>,
}

impl Sections {
    fn into_mesh(self) -> Result<Mesh, VtkError> {
        let points = self.points;
        let resolve = |index: usize| {
            points
                .get(index)
                .copied()
                .ok_or(VtkError::IndexOutOfRange {
                    index,
                    points: points.len(),
                })
        };

        let mut mesh = Mesh::new();
        for polygon in &self.polygons {
            // Fan about the first corner.
            for i in 1..polygon.len().saturating_sub(1) {
                mesh.add_triangle(Triangle::new(
                    resolve(polygon[0])?,
                    resolve(polygon[i])?,
                    resolve(polygon[i + 1])?,
                ));
            }
        }
        for strip in &self.strips {
            for i in 0..strip.len().saturating_sub(2) {
                // Alternate the winding so the whole strip faces one way.
                let (a, b) = if i % 2 == 0 {
                    (strip[i], strip[i + 1])
                } else {
                    (strip[i + 1], strip[i])
                };
                mesh.add_triangle(Triangle::new(
                    resolve(a)?,
                    resolve(b)?,
                    resolve(strip[i + 2])?,
                ));
            }
        }
        for line in &self.lines {
            let mut path = Vec::with_capacity(line.len());
            for &index in line {
                path.push(resolve(index)?);
            }
            mesh.add_polyline(Polyline::new(path));
        }

        log::info!(
            "polydata: {} points, {} polygons, {} strips, {} lines",
            points.len(),
            self.polygons.len(),
            self.strips.len(),
            self.lines.len()
        );
        Ok(mesh)
    }
}

// ASCII form: whitespace-separated tokens after the header.

fn parse_ascii(body: &str) -> Result<Sections, VtkError> {
    let mut sections = Sections::default();
    let mut rest = body;
    while let Some(keyword) = peek_keyword(rest) {
        match keyword {
            "POINTS" => {
                let (next, points) =
                    ascii_points(rest).map_err(|_| VtkError::Parse("POINTS"))?;
                sections.points = points;
                rest = next;
            }
            "POLYGONS" => {
                let (next, cells) =
                    ascii_cells(rest, "POLYGONS").map_err(|_| VtkError::Parse("POLYGONS"))?;
                sections.polygons = cells;
                rest = next;
            }
            "TRIANGLE_STRIPS" => {
                let (next, cells) = ascii_cells(rest, "TRIANGLE_STRIPS")
                    .map_err(|_| VtkError::Parse("TRIANGLE_STRIPS"))?;
                sections.strips = cells;
                rest = next;
            }
            "LINES" => {
                let (next, cells) =
                    ascii_cells(rest, "LINES").map_err(|_| VtkError::Parse("LINES"))?;
                sections.lines = cells;
                rest = next;
            }
            "VERTICES" => {
                let (next, cells) =
                    ascii_cells(rest, "VERTICES").map_err(|_| VtkError::Parse("VERTICES"))?;
                log::warn!("ignoring {} VERTICES cells", cells.len());
                rest = next;
            }
            "POINT_DATA" | "CELL_DATA" | "FIELD" => break,
            _ => return Err(VtkError::Parse("body")),
        }
    }
    Ok(sections)
}

fn peek_keyword(input: &str) -> Option<&str> {
    let trimmed = input.trim_start();
    if trimmed.is_empty() {
        return None;
    }
    let end = trimmed
        .find(|c: char| !(c.is_ascii_alphabetic() || c == '_'))
        .unwrap_or(trimmed.len());
    Some(&trimmed[..end])
}

fn parse_usize(input: &str) -> IResult<&str, usize> {
    map_res(digit1, str::parse)(input)
}

fn parse_point(input: &str) -> IResult<&str, Point3<f32>> {
    let (input, x) = preceded(multispace0, float)(input)?;
    let (input, y) = preceded(multispace1, float)(input)?;
    let (input, z) = preceded(multispace1, float)(input)?;
    Ok((input, Point3::new(x, y, z)))
}

fn ascii_points(input: &str) -> IResult<&str, Vec<Point3<f32>>> {
    let (input, _) = preceded(multispace0, tag("POINTS"))(input)?;
    let (input, count) = preceded(multispace1, parse_usize)(input)?;
    let (input, _dtype) = preceded(multispace1, alpha1)(input)?;

    let mut points = Vec::with_capacity(count.min(65536));
    let mut rest = input;
    for _ in 0..count {
        let (next, point) = parse_point(rest)?;
        points.push(point);
        rest = next;
    }
    Ok((rest, points))
}

fn ascii_cells<'a>(input: &'a str, keyword: &'static str) -> IResult<&'a str, Vec<Vec<usize>>> {
    let (input, _) = preceded(multispace0, tag(keyword))(input)?;
    let (input, count) = preceded(multispace1, parse_usize)(input)?;
    let (input, _total) = preceded(multispace1, parse_usize)(input)?;

    let mut cells = Vec::with_capacity(count.min(65536));
    let mut rest = input;
    for _ in 0..count {
        let (next, size) = preceded(multispace0, parse_usize)(rest)?;
        rest = next;
        let mut cell = Vec::with_capacity(size.min(65536));
        for _ in 0..size {
            let (next, index) = preceded(multispace0, parse_usize)(rest)?;
            cell.push(index);
            rest = next;
        }
        cells.push(cell);
    }
    Ok((rest, cells))
}

// Binary form: section headers stay text lines, payloads are
// big-endian floats and 32-bit connectivity.

struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Next text line without its terminator; `None` at end of input
    /// or on non-UTF8 bytes.
    fn line(&mut self) -> Option<&'a str> {
        if self.at_end() {
            return None;
        }
        let rest = &self.data[self.pos..];
        let (raw, advance) = match rest.iter().position(|&b| b == b'\n') {
            Some(end) => (&rest[..end], end + 1),
            None => (rest, rest.len()),
        };
        self.pos += advance;
        let line = std::str::from_utf8(raw).ok()?;
        Some(line.trim_end_matches('\r'))
    }

    fn take(&mut self, n: usize, section: &'static str) -> Result<&'a [u8], VtkError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.data.len())
            .ok_or(VtkError::Truncated(section))?;
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn rest(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    fn skip_blank(&mut self) {
        while self.pos < self.data.len() && self.data[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.data.len()
    }
}

fn parse_binary(cursor: &mut ByteCursor) -> Result<Sections, VtkError> {
    let mut sections = Sections::default();
    loop {
        cursor.skip_blank();
        if cursor.at_end() {
            break;
        }
        let header = cursor.line().ok_or(VtkError::Parse("section header"))?;
        let mut fields = header.split_whitespace();
        let keyword = fields.next().ok_or(VtkError::Parse("section header"))?;
        match keyword {
            "POINTS" => {
                let count = header_count(&mut fields, "POINTS")?;
                let dtype = fields.next().ok_or(VtkError::Parse("POINTS"))?;
                sections.points = binary_points(cursor, count, dtype)?;
            }
            "POLYGONS" => {
                sections.polygons = binary_cells(cursor, &mut fields, "POLYGONS")?;
            }
            "TRIANGLE_STRIPS" => {
                sections.strips = binary_cells(cursor, &mut fields, "TRIANGLE_STRIPS")?;
            }
            "LINES" => {
                sections.lines = binary_cells(cursor, &mut fields, "LINES")?;
            }
            "VERTICES" => {
                let cells = binary_cells(cursor, &mut fields, "VERTICES")?;
                log::warn!("ignoring {} VERTICES cells", cells.len());
            }
            "POINT_DATA" | "CELL_DATA" | "FIELD" => break,
            _ => return Err(VtkError::Parse("body")),
        }
    }
    Ok(sections)
}

fn header_count(
    fields: &mut std::str::SplitWhitespace,
    section: &'static str,
) -> Result<usize, VtkError> {
    fields
        .next()
        .and_then(|field| field.parse().ok())
        .ok_or(VtkError::Parse(section))
}

fn binary_points(
    cursor: &mut ByteCursor,
    count: usize,
    dtype: &str,
) -> Result<Vec<Point3<f32>>, VtkError> {
    let stride = match dtype {
        "float" => 12,
        "double" => 24,
        _ => return Err(VtkError::Parse("POINTS")),
    };
    let total = count
        .checked_mul(stride)
        .ok_or(VtkError::Truncated("POINTS"))?;
    let bytes = cursor.take(total, "POINTS")?;

    let mut points = Vec::with_capacity(count.min(65536));
    for chunk in bytes.chunks_exact(stride) {
        let point = if stride == 12 {
            Point3::new(f32_be(&chunk[0..]), f32_be(&chunk[4..]), f32_be(&chunk[8..]))
        } else {
            Point3::new(
                f64_be(&chunk[0..]) as f32,
                f64_be(&chunk[8..]) as f32,
                f64_be(&chunk[16..]) as f32,
            )
        };
        points.push(point);
    }
    Ok(points)
}

fn binary_cells(
    cursor: &mut ByteCursor,
    fields: &mut std::str::SplitWhitespace,
    section: &'static str,
) -> Result<Vec<Vec<usize>>, VtkError> {
    let count = header_count(fields, section)?;
    let total = header_count(fields, section)?;
    let bytes = cursor.take(
        total.checked_mul(4).ok_or(VtkError::Truncated(section))?,
        section,
    )?;
    let mut stream = bytes.chunks_exact(4).map(i32_be);

    let mut cells = Vec::with_capacity(count.min(65536));
    for _ in 0..count {
        let size = stream.next().ok_or(VtkError::Truncated(section))?;
        let size = usize::try_from(size).map_err(|_| VtkError::Parse(section))?;
        let mut cell = Vec::with_capacity(size.min(65536));
        for _ in 0..size {
            let index = stream.next().ok_or(VtkError::Truncated(section))?;
            cell.push(usize::try_from(index).map_err(|_| VtkError::Parse(section))?);
        }
        cells.push(cell);
    }
    Ok(cells)
}

fn f32_be(bytes: &[u8]) -> f32 {
    f32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

fn f64_be(bytes: &[u8]) -> f64 {
    f64::from_be_bytes([
        bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
    ])
}

fn i32_be(bytes: &[u8]) -> i32 {
    i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}
