//! Line types 1–5 and `!TEXMAP` payloads.

use super::lexer::{Field, rest_of_line};
use crate::base::{Matrix4, Vector3};
use crate::colour::parse_colour_code;
use crate::dom::{ElementKind, Graphic, Primitive, Projection, Reference, Texmap, TexmapMode};

fn numbers<const N: usize>(fields: &[Field<'_>]) -> Result<[f64; N], String> {
    let mut out = [0.0; N];
    for (slot, field) in out.iter_mut().zip(fields) {
        *slot = field.number()?;
    }
    Ok(out)
}

fn vertices(values: &[f64]) -> Vec<Vector3> {
    values
        .chunks_exact(3)
        .map(|c| Vector3::new(c[0], c[1], c[2]))
        .collect()
}

/// Parse a line whose first field is `1`–`5`.
pub fn parse_geometry(line: &str, fields: &[Field<'_>]) -> Result<ElementKind, String> {
    let code = fields.first().map_or("", |f| f.text);
    if code == "1" {
        return parse_reference(line, fields);
    }
    let primitive = code
        .parse::<u8>()
        .ok()
        .and_then(Primitive::from_line_type)
        .ok_or_else(|| format!("unknown line type '{code}'"))?;
    let expected = 2 + primitive.vertex_count() * 3;
    if fields.len() != expected {
        return Err(format!(
            "line type {code} needs {expected} fields, found {}",
            fields.len()
        ));
    }
    let colour = parse_colour_code(fields[1].text)?;
    let values = fields[2..]
        .iter()
        .map(Field::number)
        .collect::<Result<Vec<_>, _>>()?;
    Graphic::new(primitive, colour, vertices(&values))
        .map(ElementKind::Graphic)
        .ok_or_else(|| format!("line type {code} has the wrong number of vertices"))
}

fn parse_reference(line: &str, fields: &[Field<'_>]) -> Result<ElementKind, String> {
    if fields.len() < 15 {
        return Err(format!(
            "line type 1 needs at least 15 fields, found {}",
            fields.len()
        ));
    }
    let colour = parse_colour_code(fields[1].text)?;
    let values: [f64; 12] = numbers(&fields[2..14])?;
    let name = rest_of_line(line, fields, 14);
    Ok(ElementKind::Reference(Reference::new(
        colour,
        Matrix4::from_ldraw(values),
        name,
    )))
}

/// Parse the fields after `!TEXMAP START` or `!TEXMAP NEXT`.
///
/// `fields` starts at the projection keyword.
pub fn parse_texmap(mode: TexmapMode, line: &str, fields: &[Field<'_>]) -> Result<Texmap, String> {
    let keyword = fields.first().map_or("", |f| f.text);
    let extra = match keyword {
        "PLANAR" => 0,
        "CYLINDRICAL" => 1,
        "SPHERICAL" => 2,
        other => return Err(format!("unknown texture projection '{other}'")),
    };
    let needed = 1 + 9 + extra + 1;
    if fields.len() < needed {
        return Err(format!("!TEXMAP {keyword} needs {needed} fields, found {}", fields.len()));
    }
    let values = fields[1..10 + extra]
        .iter()
        .map(Field::number)
        .collect::<Result<Vec<_>, _>>()?;
    let points = vertices(&values[..9]);
    let projection = match extra {
        0 => Projection::Planar,
        1 => Projection::Cylindrical { angle: values[9] },
        _ => Projection::Spherical {
            angle1: values[9],
            angle2: values[10],
        },
    };

    let images = rest_of_line(line, fields, 10 + extra);
    let (texture, glossmap) = match images.split_once(" GLOSSMAP ") {
        Some((texture, glossmap)) => (texture, Some(unquote(glossmap))),
        None => (images, None),
    };
    let mut texmap = Texmap::new(
        mode,
        projection,
        [points[0], points[1], points[2]],
        unquote(texture),
    );
    if let Some(glossmap) = glossmap {
        texmap = texmap.with_glossmap(glossmap);
    }
    Ok(texmap)
}

fn unquote(text: &str) -> &str {
    let text = text.trim();
    text.strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(text)
}
