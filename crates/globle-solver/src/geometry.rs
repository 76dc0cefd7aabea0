//! Country shapes and the bearing/distance math between them
//!
//! Coordinates are geographic (x = longitude, y = latitude). Border distance and
//! border direction are planar in degree space; only the centroid bearing uses
//! the spherical initial-bearing formula.

use crate::{Result, SolverError, KM_BUCKET, KM_SCALE};
use geo::{
    BoundingRect, Centroid, Closest, ClosestPoint, Coord, CoordsIter, Intersects, MultiPolygon,
    Point, Rect, Relate,
};
use serde::{Deserialize, Serialize};

/// A (latitude, longitude) pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl From<Coord<f64>> for GeoPoint {
    fn from(c: Coord<f64>) -> Self {
        Self::new(c.y, c.x)
    }
}

/// Closest pair of points between two shapes, `from` lying on the first shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestPair {
    pub from: GeoPoint,
    pub to: GeoPoint,
}

impl NearestPair {
    /// Planar separation in degrees
    pub fn distance_deg(&self) -> f64 {
        let dx = self.to.longitude - self.from.longitude;
        let dy = self.to.latitude - self.from.latitude;
        dx.hypot(dy)
    }
}

/// One country's territory. Immutable once built; centroid and bounds are
/// computed up front.
#[derive(Debug, Clone)]
pub struct Shape {
    polygons: MultiPolygon<f64>,
    centroid: GeoPoint,
    bounds: Rect<f64>,
}

impl Shape {
    /// Build a shape, rejecting geometries with no area-bearing coordinates.
    /// `label` only feeds error messages.
    pub fn new(polygons: MultiPolygon<f64>, label: &str) -> Result<Self> {
        if polygons.0.iter().all(|p| p.exterior().0.is_empty()) {
            return Err(SolverError::EmptyGeometry(label.to_string()));
        }
        let centroid = polygons
            .centroid()
            .ok_or_else(|| SolverError::EmptyGeometry(label.to_string()))?;
        let bounds = polygons
            .bounding_rect()
            .ok_or_else(|| SolverError::EmptyGeometry(label.to_string()))?;
        if !centroid.x().is_finite() || !centroid.y().is_finite() {
            return Err(SolverError::InvalidGeometry(
                label.to_string(),
                "non-finite centroid".to_string(),
            ));
        }

        Ok(Self {
            polygons,
            centroid: GeoPoint::new(centroid.y(), centroid.x()),
            bounds,
        })
    }

    pub fn polygons(&self) -> &MultiPolygon<f64> {
        &self.polygons
    }

    pub fn centroid(&self) -> GeoPoint {
        self.centroid
    }

    pub fn bounds(&self) -> Rect<f64> {
        self.bounds
    }

    /// Boundaries meet while interiors stay disjoint
    pub fn touches(&self, other: &Shape) -> bool {
        if !self.bounds.intersects(&other.bounds) {
            return false;
        }
        self.polygons.relate(&other.polygons).is_touches()
    }

    /// Closest pair of points between the two shapes.
    ///
    /// Overlapping or touching shapes yield a shared point on both sides.
    pub fn nearest_points(&self, other: &Shape) -> NearestPair {
        if self.bounds.intersects(&other.bounds) && self.polygons.intersects(&other.polygons) {
            let shared = shared_point(&self.polygons, &other.polygons)
                .unwrap_or(self.centroid);
            return NearestPair {
                from: shared,
                to: shared,
            };
        }

        let mut best: Option<(f64, Coord<f64>, Coord<f64>)> = None;
        let mut consider = |from: Coord<f64>, to: Coord<f64>| {
            let d = (to.x - from.x).hypot(to.y - from.y);
            if best.map_or(true, |(best_d, _, _)| d < best_d) {
                best = Some((d, from, to));
            }
        };

        for c in self.polygons.coords_iter() {
            if let Some(p) = closest_on(&other.polygons, c) {
                consider(c, p);
            }
        }
        for c in other.polygons.coords_iter() {
            if let Some(p) = closest_on(&self.polygons, c) {
                consider(p, c);
            }
        }

        match best {
            Some((_, from, to)) => NearestPair {
                from: from.into(),
                to: to.into(),
            },
            None => NearestPair {
                from: self.centroid,
                to: other.centroid,
            },
        }
    }
}

fn closest_on(target: &MultiPolygon<f64>, c: Coord<f64>) -> Option<Coord<f64>> {
    match target.closest_point(&Point::from(c)) {
        Closest::Intersection(p) | Closest::SinglePoint(p) => Some(p.0),
        Closest::Indeterminate => None,
    }
}

/// A point lying on both geometries, preferring vertices of `a`
fn shared_point(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> Option<GeoPoint> {
    a.coords_iter()
        .find(|c| b.intersects(&Point::from(*c)))
        .or_else(|| b.coords_iter().find(|c| a.intersects(&Point::from(*c))))
        .map(GeoPoint::from)
        .or_else(|| {
            // Edges cross without either shape owning a vertex inside the other
            a.coords_iter()
                .filter_map(|c| closest_on(b, c).map(|p| (c, p)))
                .min_by(|(c1, p1), (c2, p2)| {
                    let d1 = (p1.x - c1.x).hypot(p1.y - c1.y);
                    let d2 = (p2.x - c2.x).hypot(p2.y - c2.y);
                    d1.total_cmp(&d2)
                })
                .map(|(_, p)| GeoPoint::from(p))
        })
}

/// Normalize degrees into [0, 360)
fn normalize_bearing(degrees: f64) -> f64 {
    let b = (degrees + 360.0) % 360.0;
    if b >= 360.0 {
        0.0
    } else {
        b
    }
}

/// Initial bearing from `a` to `b` on the sphere, in [0, 360)
pub fn bearing_between(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let diff_long = (b.longitude - a.longitude).to_radians();

    let x = diff_long.sin() * lat2.cos();
    let y = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * diff_long.cos();

    normalize_bearing(x.atan2(y).to_degrees())
}

/// Planar bearing across the closest boundary points, `atan2(dlon, dlat)`
pub fn border_direction(from: &Shape, to: &Shape) -> f64 {
    let pair = from.nearest_points(to);
    let dx = pair.to.longitude - pair.from.longitude;
    let dy = pair.to.latitude - pair.from.latitude;
    normalize_bearing(dx.atan2(dy).to_degrees())
}

/// Border-to-border distance in bucketed km (always a multiple of 10)
pub fn border_distance_km(a: &Shape, b: &Shape) -> f64 {
    bucket_km(a.nearest_points(b).distance_deg())
}

/// `round(distance_deg * 100 / 10) * 10`, rounding half to even
pub fn bucket_km(distance_deg: f64) -> f64 {
    (distance_deg * KM_SCALE).round_ties_even() * KM_BUCKET
}

pub fn centroid_of(shape: &Shape) -> GeoPoint {
    shape.centroid()
}
