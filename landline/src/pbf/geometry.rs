//! Coordinate reconstruction and GeoJSON geometry assembly

use super::decode::DecodeError;
use super::proto::{self, GeometryType, QuantizeOriginPostion};
use crate::feature::{Geometry, Position};

/// Maps quantized integer coordinates back to real coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dequantizer {
    scale: [f64; 4],
    translate: [f64; 4],
    upper_left: bool,
    has_z: bool,
    has_m: bool,
}

impl Dequantizer {
    /// Builds a dequantizer from a feature result's transform.
    ///
    /// Without a transform coordinates are used as-is.
    pub fn new(transform: Option<&proto::Transform>, has_z: bool, has_m: bool) -> Self {
        let Some(transform) = transform else {
            return Self {
                scale: [1.0; 4],
                translate: [0.0; 4],
                upper_left: false,
                has_z,
                has_m,
            };
        };

        let scale = transform
            .scale
            .as_ref()
            .map_or([1.0; 4], |s| [s.x_scale, s.y_scale, s.z_scale, s.m_scale]);
        let translate = transform.translate.as_ref().map_or([0.0; 4], |t| {
            [t.x_translate, t.y_translate, t.z_translate, t.m_translate]
        });

        Self {
            scale,
            translate,
            upper_left: transform.quantize_origin_postion == QuantizeOriginPostion::UpperLeft as i32,
            has_z,
            has_m,
        }
    }

    /// Number of integers per vertex.
    pub fn stride(&self) -> usize {
        2 + usize::from(self.has_z) + usize::from(self.has_m)
    }

    fn position(&self, quantized: &[i64]) -> Position {
        let mut position = Vec::with_capacity(quantized.len());
        position.push(self.translate[0] + self.scale[0] * quantized[0] as f64);

        let y = self.scale[1] * quantized[1] as f64;
        position.push(if self.upper_left {
            self.translate[1] - y
        } else {
            self.translate[1] + y
        });

        let mut next = 2;
        if self.has_z {
            position.push(self.translate[2] + self.scale[2] * quantized[next] as f64);
            next += 1;
        }
        if self.has_m {
            position.push(self.translate[3] + self.scale[3] * quantized[next] as f64);
        }
        position
    }

    /// Splits a geometry's delta stream into parts of real positions.
    ///
    /// Each part starts its running sum at zero, so a part's first vertex is
    /// absolute. An empty `lengths` list means a single part spanning every
    /// coordinate.
    pub fn parts(&self, geometry: &proto::Geometry) -> Result<Vec<Vec<Position>>, DecodeError> {
        let stride = self.stride();
        let coords = &geometry.coords;

        if coords.len() % stride != 0 {
            return Err(DecodeError::Geometry(format!(
                "{} coordinates do not divide into vertices of {}",
                coords.len(),
                stride
            )));
        }

        let vertex_count = coords.len() / stride;
        let lengths: Vec<usize> = if geometry.lengths.is_empty() {
            vec![vertex_count]
        } else {
            geometry.lengths.iter().map(|&n| n as usize).collect()
        };

        let declared: usize = lengths.iter().sum();
        if declared != vertex_count {
            return Err(DecodeError::Geometry(format!(
                "part lengths cover {} vertices but {} were encoded",
                declared, vertex_count
            )));
        }

        let mut vertices = coords.chunks_exact(stride);
        let mut parts = Vec::with_capacity(lengths.len());

        for length in lengths {
            let mut running = vec![0i64; stride];
            let mut part = Vec::with_capacity(length);
            for delta in vertices.by_ref().take(length) {
                for (sum, d) in running.iter_mut().zip(delta) {
                    *sum = sum.wrapping_add(*d);
                }
                part.push(self.position(&running));
            }
            parts.push(part);
        }

        Ok(parts)
    }
}

/// Twice the signed area of a ring; positive when counter-clockwise.
fn signed_area(ring: &[Position]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for (i, a) in ring.iter().enumerate() {
        let b = &ring[(i + 1) % ring.len()];
        sum += a[0] * b[1] - b[0] * a[1];
    }
    sum
}

/// Groups Esri rings into GeoJSON polygons.
///
/// Clockwise rings are outer rings; counter-clockwise rings are holes of
/// the preceding outer ring. A hole seen before any outer ring starts a
/// polygon of its own. Output rings follow the right-hand rule.
pub fn assemble_polygons(rings: Vec<Vec<Position>>) -> Vec<Vec<Vec<Position>>> {
    let mut polygons: Vec<Vec<Vec<Position>>> = Vec::new();

    for mut ring in rings {
        let area = signed_area(&ring);
        let clockwise = area <= 0.0;

        match polygons.last_mut() {
            Some(polygon) if !clockwise => {
                ring.reverse();
                polygon.push(ring);
            }
            _ => {
                if clockwise {
                    ring.reverse();
                }
                polygons.push(vec![ring]);
            }
        }
    }

    polygons
}

/// Converts one feature's quantized geometry into GeoJSON.
///
/// Returns `Ok(None)` for an empty geometry.
pub fn to_geojson(
    geometry_type: GeometryType,
    geometry: &proto::Geometry,
    dequantizer: &Dequantizer,
) -> Result<Option<Geometry>, DecodeError> {
    let parts = dequantizer.parts(geometry)?;
    let non_empty = parts.iter().any(|p| !p.is_empty());
    if !non_empty {
        return Ok(None);
    }

    let geometry = match geometry_type {
        GeometryType::Point => {
            let point = parts.into_iter().flatten().next();
            point.map(Geometry::Point)
        }
        GeometryType::Multipoint => Some(Geometry::MultiPoint(
            parts.into_iter().flatten().collect(),
        )),
        GeometryType::Polyline => {
            let mut lines: Vec<Vec<Position>> =
                parts.into_iter().filter(|p| !p.is_empty()).collect();
            if lines.len() == 1 {
                lines.pop().map(Geometry::LineString)
            } else {
                Some(Geometry::MultiLineString(lines))
            }
        }
        GeometryType::Polygon => {
            let rings = parts.into_iter().filter(|p| !p.is_empty()).collect();
            let mut polygons = assemble_polygons(rings);
            if polygons.len() == 1 {
                polygons.pop().map(Geometry::Polygon)
            } else {
                Some(Geometry::MultiPolygon(polygons))
            }
        }
        GeometryType::Multipatch => {
            return Err(DecodeError::UnsupportedGeometry(
                "multipatch geometry".to_string(),
            ))
        }
        GeometryType::Absent => None,
    };

    Ok(geometry)
}
