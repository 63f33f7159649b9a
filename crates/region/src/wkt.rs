//! WKT boundary parsing.
//!
//! Accepts:
//! - `POLYGON((lon1 lat1, lon2 lat2, lon3 lat3, lon1 lat1))`
//! - `POLYGON((exterior), (hole), ...)`
//! - `MULTIPOLYGON(((ring1)),((ring2), (hole2)))`

use crate::error::{RegionError, Result};
use crate::polygon::{Polygon, Ring};

/// Parse a WKT `POLYGON` or `MULTIPOLYGON` into its polygons.
pub fn parse_polygons(text: &str) -> Result<Vec<Polygon>> {
    let text = text.trim();
    let upper = text.to_uppercase();

    if let Some(rest) = upper.strip_prefix("MULTIPOLYGON") {
        let body = &text[text.len() - rest.len()..];
        let inner = strip_parens(body)?;
        let polygons = split_top_level(inner)?
            .into_iter()
            .map(|item| parse_polygon_body(strip_parens(item)?))
            .collect::<Result<Vec<_>>>()?;

        if polygons.is_empty() {
            return Err(RegionError::InvalidWkt(
                "MULTIPOLYGON must contain at least one polygon".to_string(),
            ));
        }
        return Ok(polygons);
    }

    if let Some(rest) = upper.strip_prefix("POLYGON") {
        let body = &text[text.len() - rest.len()..];
        return Ok(vec![parse_polygon_body(strip_parens(body)?)?]);
    }

    Err(RegionError::InvalidWkt(
        "Expected POLYGON or MULTIPOLYGON format".to_string(),
    ))
}

/// Parse `(exterior), (hole), ...`.
fn parse_polygon_body(body: &str) -> Result<Polygon> {
    let mut rings = split_top_level(body)?
        .into_iter()
        .map(|ring| parse_ring(strip_parens(ring)?))
        .collect::<Result<Vec<_>>>()?
        .into_iter();

    let exterior = rings
        .next()
        .ok_or_else(|| RegionError::InvalidWkt("Polygon has no rings".to_string()))?;

    Ok(Polygon::new(exterior, rings.collect()))
}

/// Remove one pair of enclosing parentheses.
fn strip_parens(s: &str) -> Result<&str> {
    let s = s.trim();
    if s.starts_with('(') && s.ends_with(')') && s.len() >= 2 {
        Ok(&s[1..s.len() - 1])
    } else {
        Err(RegionError::InvalidWkt(format!(
            "Expected parenthesised group, got '{}'",
            truncate(s)
        )))
    }
}

/// Split on commas that are not nested inside parentheses.
fn split_top_level(s: &str) -> Result<Vec<&str>> {
    let mut items = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;

    for (idx, ch) in s.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return Err(RegionError::InvalidWkt(
                        "Invalid parenthesis order".to_string(),
                    ));
                }
            }
            ',' if depth == 0 => {
                items.push(s[start..idx].trim());
                start = idx + 1;
            }
            _ => {}
        }
    }

    if depth != 0 {
        return Err(RegionError::InvalidWkt(
            "Unbalanced parentheses".to_string(),
        ));
    }

    let last = s[start..].trim();
    if !last.is_empty() {
        items.push(last);
    }
    Ok(items)
}

/// Parse a single ring from "lon lat, lon lat, ...".
fn parse_ring(coords_str: &str) -> Result<Ring> {
    let points = coords_str
        .split(',')
        .map(|pair| {
            let pair = pair.trim();
            let parts: Vec<&str> = pair.split_whitespace().collect();
            if parts.len() < 2 || parts.len() > 3 {
                return Err(RegionError::InvalidWkt(format!(
                    "Expected 'lon lat' format, got '{}'",
                    pair
                )));
            }

            let lon: f64 = parts[0]
                .parse()
                .map_err(|_| RegionError::InvalidCoordinate(parts[0].to_string()))?;
            let lat: f64 = parts[1]
                .parse()
                .map_err(|_| RegionError::InvalidCoordinate(parts[1].to_string()))?;

            validate_coordinates(lon, lat)?;
            Ok((lon, lat))
        })
        .collect::<Result<Vec<(f64, f64)>>>()?;

    if points.len() < 4 {
        return Err(RegionError::InvalidWkt(
            "Polygon ring must have at least 4 points (including closing point)".to_string(),
        ));
    }

    Ring::new(points)
}

/// Check a position lies in the geographic coordinate range.
pub fn validate_coordinates(lon: f64, lat: f64) -> Result<()> {
    if !(-180.0..=180.0).contains(&lon) {
        return Err(RegionError::OutOfRange(format!(
            "longitude {} must be between -180 and 180",
            lon
        )));
    }
    if !(-90.0..=90.0).contains(&lat) {
        return Err(RegionError::OutOfRange(format!(
            "latitude {} must be between -90 and 90",
            lat
        )));
    }
    Ok(())
}

fn truncate(s: &str) -> String {
    s.chars().take(40).collect()
}
