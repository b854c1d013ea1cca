//! Control-points codec.
//!
//! The symbol renderer consumes an entity's geometry as a delimited string:
//!
//! - a point encodes as `x,y`
//! - a polygon encodes every vertex of every part as `;x,y`, concatenated
//! - a polyline encodes the vertices of its first part as `;x,y`,
//!   concatenated, after an optional arrow adjustment
//!
//! Arrow-shaped symbols (axis of advance and similar) need at least three
//! control points in a specific order: a two-point line is padded to three by
//! duplicating its last point, then every point but the last is reversed and
//! the last one appended. The resulting strings are passed to the renderer
//! unchanged, so the exact formatting matters.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{MissionError, Result};

/// A coordinate pair in the mission's spatial reference.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MapPoint {
    pub x: f64,
    pub y: f64,
}

impl MapPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for MapPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// How the renderer expects a symbol's line geometry to be laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DrawShape {
    /// Control points are passed through in drawing order
    #[default]
    Polyline,
    /// Control points are padded and reordered for arrow symbols
    Arrow,
}

/// Geometry handed over by the drawing collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates", rename_all = "lowercase")]
pub enum Geometry {
    Point(MapPoint),
    Polyline(Vec<Vec<MapPoint>>),
    Polygon(Vec<Vec<MapPoint>>),
}

impl Geometry {
    /// Single-part polyline.
    pub fn polyline(points: Vec<MapPoint>) -> Self {
        Geometry::Polyline(vec![points])
    }

    /// Single-ring polygon.
    pub fn polygon(points: Vec<MapPoint>) -> Self {
        Geometry::Polygon(vec![points])
    }

    /// Encodes the geometry as a control-points string.
    pub fn to_control_points(&self, shape: DrawShape) -> Result<String> {
        match self {
            Geometry::Point(point) => Ok(point.to_string()),
            Geometry::Polygon(parts) => {
                let vertices: Vec<MapPoint> = parts.iter().flatten().copied().collect();
                if vertices.is_empty() {
                    return Err(invalid_geometry("polygon has no vertices"));
                }
                Ok(join_vertices(&vertices))
            }
            Geometry::Polyline(parts) => {
                let first = parts
                    .first()
                    .filter(|part| !part.is_empty())
                    .ok_or_else(|| invalid_geometry("polyline has no vertices"))?;
                let vertices = match shape {
                    DrawShape::Arrow => adjust_for_arrow(first),
                    DrawShape::Polyline => first.clone(),
                };
                Ok(join_vertices(&vertices))
            }
        }
    }
}

/// Pads a two-point line to three points and reorders it for arrow symbols.
fn adjust_for_arrow(points: &[MapPoint]) -> Vec<MapPoint> {
    let mut points = points.to_vec();
    if points.len() == 2 {
        points.push(points[1]);
    }

    let Some((last, rest)) = points.split_last() else {
        return points;
    };
    let mut adjusted: Vec<MapPoint> = rest.iter().rev().copied().collect();
    adjusted.push(*last);
    adjusted
}

fn join_vertices(vertices: &[MapPoint]) -> String {
    vertices.iter().map(|p| format!(";{p}")).collect()
}

fn invalid_geometry(reason: &str) -> MissionError {
    MissionError::InvalidControlPoints {
        value: String::new(),
        reason: reason.to_string(),
    }
}

/// Decodes a control-points string into its coordinate pairs.
///
/// Accepts both the point form (`x,y`) and the multi-vertex form
/// (`;x,y;x,y`); empty segments are ignored.
pub fn parse_control_points(value: &str) -> Result<Vec<MapPoint>> {
    let invalid = |reason: String| MissionError::InvalidControlPoints {
        value: value.to_string(),
        reason,
    };

    let points = value
        .split(';')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let (x, y) = segment
                .split_once(',')
                .ok_or_else(|| invalid(format!("'{segment}' is not an x,y pair")))?;
            let x = x
                .trim()
                .parse::<f64>()
                .map_err(|e| invalid(format!("bad x in '{segment}': {e}")))?;
            let y = y
                .trim()
                .parse::<f64>()
                .map_err(|e| invalid(format!("bad y in '{segment}': {e}")))?;
            Ok(MapPoint::new(x, y))
        })
        .collect::<Result<Vec<_>>>()?;

    if points.is_empty() {
        return Err(invalid("no coordinates".to_string()));
    }
    Ok(points)
}
