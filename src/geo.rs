/*!
 * Geographic calculations.
 *
 * These are simple spherical-earth approximations. They are plenty accurate for grouping case
 * reports that are at most a few kilometers apart, which is the scale this crate works at.
 */

use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters, fixed for all distance calculations in this crate.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/**
 * A geographic coordinate.
 *
 * Note the serialized form uses the key "lng" for the longitude. That matches what the map and
 * statistics consumers expect, and it is intentionally the opposite member order from the
 * `[lng, lat]` arrays used by incoming case records.
 */
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    #[serde(rename = "lng")]
    pub lon: f64,
}

impl Coord {
    /// Test if two coordinates are within `eps` degrees of each other in both components.
    pub fn are_close(self, other: Coord, eps: f64) -> bool {
        (self.lat - other.lat).abs() < eps && (self.lon - other.lon).abs() < eps
    }
}

/**
 * The great circle distance between two coordinates using the haversine formula.
 *
 * #Arguments
 * * a - the first point.
 * * b - the second point.
 *
 * #Returns
 * The distance between the points in meters. Identical points yield exactly 0 and the function
 * is symmetric in its arguments.
 */
pub fn great_circle_distance(a: Coord, b: Coord) -> f64 {
    const DEG2RAD: f64 = 2.0 * std::f64::consts::PI / 360.0;

    let lat1_r = a.lat * DEG2RAD;
    let lat2_r = b.lat * DEG2RAD;

    let dlat2 = (lat2_r - lat1_r) / 2.0;
    let dlon2 = (b.lon - a.lon) * DEG2RAD / 2.0;

    let sin2_dlat = f64::powf(f64::sin(dlat2), 2.0);
    let sin2_dlon = f64::powf(f64::sin(dlon2), 2.0);

    let arc = 2.0
        * f64::asin(f64::sqrt(
            sin2_dlat + sin2_dlon * f64::cos(lat1_r) * f64::cos(lat2_r),
        ));

    arc * EARTH_RADIUS_M
}

/**
 * The arithmetic mean position of a set of coordinates.
 *
 * An empty input yields `(0, 0)`. That is a documented degenerate case, not an error; callers
 * never ask for the centroid of an empty cluster.
 */
pub fn centroid(points: &[Coord]) -> Coord {
    if points.is_empty() {
        return Coord { lat: 0.0, lon: 0.0 };
    }

    let mut sum_lat = 0.0;
    let mut sum_lon = 0.0;
    for point in points {
        sum_lat += point.lat;
        sum_lon += point.lon;
    }

    Coord {
        lat: sum_lat / points.len() as f64,
        lon: sum_lon / points.len() as f64,
    }
}

/**
 * A north/south/east/west rectangle in geographic coordinates, as supplied by map viewports.
 */
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl GeoBounds {
    /// Test if a coordinate falls inside the rectangle. The boundary counts as inside.
    pub fn contains(&self, coord: Coord) -> bool {
        coord.lat <= self.north
            && coord.lat >= self.south
            && coord.lon <= self.east
            && coord.lon >= self.west
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_of_identical_points_is_zero() {
        let pnt = Coord {
            lat: 45.5,
            lon: -120.0,
        };

        assert_eq!(great_circle_distance(pnt, pnt), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let left = Coord {
            lat: 46.8721,
            lon: -113.9940,
        };
        let right = Coord {
            lat: 45.6793,
            lon: -111.0373,
        };

        assert_eq!(
            great_circle_distance(left, right),
            great_circle_distance(right, left)
        );
    }

    #[test]
    fn distance_matches_known_values() {
        // One degree of latitude is very close to 111.2 km on a 6,371 km sphere.
        let south = Coord { lat: 45.0, lon: 0.0 };
        let north = Coord { lat: 46.0, lon: 0.0 };

        let dist = great_circle_distance(south, north);
        assert!((dist - 111_195.0).abs() < 10.0, "distance was {}", dist);
    }

    #[test]
    fn centroid_of_empty_set_is_origin() {
        assert_eq!(centroid(&[]), Coord { lat: 0.0, lon: 0.0 });
    }

    #[test]
    fn centroid_is_the_arithmetic_mean() {
        let points = [
            Coord {
                lat: 45.0,
                lon: -120.0,
            },
            Coord {
                lat: 44.0,
                lon: -119.0,
            },
        ];

        let center = centroid(&points);
        assert!(center.are_close(
            Coord {
                lat: 44.5,
                lon: -119.5
            },
            1.0e-12
        ));
    }

    #[test]
    fn bounds_include_their_boundary() {
        let bounds = GeoBounds {
            north: 46.0,
            south: 44.0,
            east: -118.0,
            west: -120.0,
        };

        assert!(bounds.contains(Coord {
            lat: 45.0,
            lon: -119.0
        }));
        assert!(bounds.contains(Coord {
            lat: 46.0,
            lon: -119.0
        }));
        assert!(bounds.contains(Coord {
            lat: 45.0,
            lon: -120.0
        }));
        assert!(!bounds.contains(Coord {
            lat: 46.5,
            lon: -119.0
        }));
        assert!(!bounds.contains(Coord {
            lat: 45.0,
            lon: -117.5
        }));
    }
}
