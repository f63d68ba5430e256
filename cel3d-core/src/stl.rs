/// STL file parser for binary and ASCII formats
///
/// Facet normals stored in the file are skipped; the renderer derives
/// normals from vertex order, which STL writers keep counter-clockwise
/// seen from outside.
use nom::{
    bytes::complete::{tag, take},
    character::complete::{multispace0, multispace1, not_line_ending},
    combinator::{all_consuming, map},
    multi::{count, many0},
    number::complete::{double, le_f32, le_u16, le_u32},
    sequence::{preceded, terminated, tuple},
    IResult,
};

use crate::error::{Error, Result};
use crate::geometry::{Mesh, Triangle};

const HEADER_LEN: usize = 80;
const FACET_LEN: usize = 50;

/// Parse a binary STL file
pub fn parse_binary_stl(data: &[u8]) -> Result<Mesh> {
    if data.len() < HEADER_LEN + 4 {
        return Err(Error::Stl(format!(
            "{} bytes is too small for a binary STL header",
            data.len()
        )));
    }

    let (body, facet_count) = binary_header(data).map_err(stl_error)?;
    let needed = facet_count as usize * FACET_LEN;
    if body.len() < needed {
        return Err(Error::Stl(format!(
            "header declares {} facets ({} bytes) but only {} bytes follow",
            facet_count,
            needed,
            body.len()
        )));
    }

    let (_, triangles) = count(binary_facet, facet_count as usize)(body).map_err(stl_error)?;
    Ok(Mesh::from(triangles))
}

fn binary_header(input: &[u8]) -> IResult<&[u8], u32> {
    preceded(take(HEADER_LEN), le_u32)(input)
}

fn binary_vector(input: &[u8]) -> IResult<&[u8], [f64; 3]> {
    map(tuple((le_f32, le_f32, le_f32)), |(x, y, z)| {
        [f64::from(x), f64::from(y), f64::from(z)]
    })(input)
}

fn binary_facet(input: &[u8]) -> IResult<&[u8], Triangle> {
    let (input, _normal) = binary_vector(input)?;
    let (input, (v1, v2, v3)) = tuple((binary_vector, binary_vector, binary_vector))(input)?;
    let (input, _attributes) = le_u16(input)?;
    Ok((input, Triangle::new(v1, v2, v3)))
}

/// Parse an ASCII STL file
pub fn parse_ascii_stl(input: &str) -> Result<Mesh> {
    let (_, triangles) = all_consuming(ascii_solid)(input).map_err(stl_error)?;
    Ok(Mesh::from(triangles))
}

fn ascii_solid(input: &str) -> IResult<&str, Vec<Triangle>> {
    let (input, _name) = preceded(preceded(multispace0, tag("solid")), not_line_ending)(input)?;
    let (input, triangles) = many0(ascii_facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;
    let (input, _) = terminated(not_line_ending, multispace0)(input)?;
    Ok((input, triangles))
}

fn keyword<'a>(word: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    preceded(multispace0, tag(word))
}

fn ascii_facet(input: &str) -> IResult<&str, Triangle> {
    let (input, _) = keyword("facet")(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, _normal) = ascii_vector(input)?;
    let (input, _) = keyword("outer")(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, v1) = ascii_vertex(input)?;
    let (input, v2) = ascii_vertex(input)?;
    let (input, v3) = ascii_vertex(input)?;
    let (input, _) = keyword("endloop")(input)?;
    let (input, _) = keyword("endfacet")(input)?;
    Ok((input, Triangle::new(v1, v2, v3)))
}

fn ascii_vertex(input: &str) -> IResult<&str, [f64; 3]> {
    preceded(keyword("vertex"), ascii_vector)(input)
}

fn ascii_vector(input: &str) -> IResult<&str, [f64; 3]> {
    let (input, x) = preceded(multispace1, double)(input)?;
    let (input, y) = preceded(multispace1, double)(input)?;
    let (input, z) = preceded(multispace1, double)(input)?;
    Ok((input, [x, y, z]))
}

fn stl_error<E: std::fmt::Debug>(e: nom::Err<E>) -> Error {
    Error::Stl(format!("{:?}", e))
}

/// Detect and parse STL data (ASCII when it parses as such, binary otherwise)
pub fn parse_stl(data: &[u8]) -> Result<Mesh> {
    if data.starts_with(b"solid") {
        if let Ok(text) = std::str::from_utf8(data) {
            match parse_ascii_stl(text) {
                Ok(mesh) => return Ok(mesh),
                Err(e) => log::debug!("Not an ASCII STL, trying binary: {}", e),
            }
        }
    }

    parse_binary_stl(data)
}
