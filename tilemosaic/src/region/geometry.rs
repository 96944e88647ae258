//! Rhumb-line bearing and destination on a spherical Earth.

use geo::{Point, RhumbBearing, RhumbDestination};
use serde::{Deserialize, Serialize};

use std::f64::consts::PI;

use super::LngLat;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

/// Distance units accepted for region radii.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    Meters,
    #[default]
    Kilometers,
    Miles,
    #[serde(alias = "nauticalMiles")]
    NauticalMiles,
    Feet,
    Yards,
    Degrees,
    Radians,
}

impl Units {
    /// Length of one radian of arc at the Earth's surface, in these units.
    pub fn per_radian(&self) -> f64 {
        match self {
            Units::Meters => EARTH_RADIUS_METERS,
            Units::Kilometers => EARTH_RADIUS_METERS / 1000.0,
            Units::Miles => EARTH_RADIUS_METERS / 1609.344,
            Units::NauticalMiles => EARTH_RADIUS_METERS / 1852.0,
            Units::Feet => EARTH_RADIUS_METERS / 0.3048,
            Units::Yards => EARTH_RADIUS_METERS / 0.9144,
            Units::Degrees => 180.0 / PI,
            Units::Radians => 1.0,
        }
    }

    /// Convert `distance` in these units to meters.
    pub fn to_meters(&self, distance: f64) -> f64 {
        distance / self.per_radian() * EARTH_RADIUS_METERS
    }
}

/// Geodesy needed to expand a region outline into tiles.
///
/// Kept behind a trait so callers can plug in great-circle math or a full
/// geodesy library instead of [`RhumbLine`].
pub trait RegionGeometry {
    /// Bearing in degrees from `from` to `to`, in `(-180, 180]`.
    fn bearing(&self, from: LngLat, to: LngLat) -> f64;

    /// Point reached from `origin` after `distance` (in `units`) along
    /// `bearing` degrees.
    fn destination(&self, origin: LngLat, distance: f64, bearing: f64, units: Units) -> LngLat;
}

/// Constant-bearing (loxodrome) paths on a sphere, backed by `geo`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RhumbLine;

impl RegionGeometry for RhumbLine {
    fn bearing(&self, from: LngLat, to: LngLat) -> f64 {
        let bearing = to_point(from).rhumb_bearing(to_point(to));

        // geo reports [0, 360)
        if bearing > 180.0 {
            bearing - 360.0
        } else {
            bearing
        }
    }

    fn destination(&self, origin: LngLat, distance: f64, bearing: f64, units: Units) -> LngLat {
        let point = to_point(origin).rhumb_destination(bearing, units.to_meters(distance));
        LngLat::new(point.x(), point.y())
    }
}

fn to_point(p: LngLat) -> Point<f64> {
    Point::new(p.lng, p.lat)
}
