//! Region to tile-set expansion.
//!
//! Expands a circular region outline (center, radius, polygon ring) into the
//! set of tiles at one level that the region touches. Geodesy is delegated to
//! a [`RegionGeometry`] implementation; everything else is tile arithmetic.

mod geometry;

pub use geometry::{RegionGeometry, RhumbLine, Units, EARTH_RADIUS_METERS};

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::coord::{point_to_tile, tile_to_key, TileCoord, TileKey};

/// A longitude/latitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    /// Create a new point.
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

impl From<[f64; 2]> for LngLat {
    fn from([lng, lat]: [f64; 2]) -> Self {
        Self { lng, lat }
    }
}

/// A circular region approximated by a polygon ring.
///
/// Deserializes from either this flat shape or a GeoJSON polygon `Feature`
/// carrying `center`, `radius` and `units` in its properties, as produced by
/// circle-drawing map controls. Only the outer ring of the polygon is used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RegionDocument")]
pub struct Region {
    /// Center of the circle.
    pub center: LngLat,
    /// Radius in `units`.
    pub radius: f64,
    /// Units of `radius`.
    #[serde(default)]
    pub units: Units,
    /// Outline vertices as `[lng, lat]`.
    pub ring: Vec<[f64; 2]>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RegionDocument {
    Feature {
        properties: RegionProperties,
        geometry: PolygonGeometry,
    },
    Flat {
        center: LngLat,
        radius: f64,
        #[serde(default)]
        units: Units,
        ring: Vec<[f64; 2]>,
    },
}

#[derive(Deserialize)]
struct RegionProperties {
    center: LngLat,
    radius: f64,
    #[serde(default)]
    units: Units,
}

#[derive(Deserialize)]
struct PolygonGeometry {
    coordinates: Vec<Vec<[f64; 2]>>,
}

impl TryFrom<RegionDocument> for Region {
    type Error = String;

    fn try_from(doc: RegionDocument) -> Result<Self, Self::Error> {
        match doc {
            RegionDocument::Feature {
                properties,
                geometry,
            } => {
                let ring = geometry
                    .coordinates
                    .into_iter()
                    .next()
                    .ok_or_else(|| "region polygon has no outer ring".to_string())?;
                Ok(Region {
                    center: properties.center,
                    radius: properties.radius,
                    units: properties.units,
                    ring,
                })
            }
            RegionDocument::Flat {
                center,
                radius,
                units,
                ring,
            } => Ok(Region {
                center,
                radius,
                units,
                ring,
            }),
        }
    }
}

/// Keys of every tile at `level` touched by `region`.
///
/// Always includes the center tile and each outline vertex's tile. Where a
/// vertex lies more than one tile from the center, tiles of points spaced
/// evenly along the center→vertex bearing are added so the interior has no
/// gaps. Keys are unique and in first-seen order.
pub fn get_tiles_of_region<G>(region: &Region, level: u8, geometry: &G) -> Vec<TileKey>
where
    G: RegionGeometry + ?Sized,
{
    let center = region.center;
    let central = point_to_tile(center.lng, center.lat, level);

    let mut tiles = TileSet::default();
    tiles.insert(central);

    for &vertex in &region.ring {
        let vertex = LngLat::from(vertex);
        let edge = point_to_tile(vertex.lng, vertex.lat, level);
        tiles.insert(edge);

        let max_diff = edge.x.abs_diff(central.x).max(edge.y.abs_diff(central.y));
        if max_diff > 1 {
            let bearing = geometry.bearing(center, vertex);
            for i in 1..max_diff {
                let distance = f64::from(i) * region.radius / f64::from(max_diff);
                let point = geometry.destination(center, distance, bearing, region.units);
                tiles.insert(point_to_tile(point.lng, point.lat, level));
            }
        }
    }

    debug!(
        level,
        vertices = region.ring.len(),
        tiles = tiles.keys.len(),
        "expanded region"
    );

    tiles.keys
}

/// Insertion-ordered set of tile keys.
#[derive(Default)]
struct TileSet {
    seen: HashSet<TileCoord>,
    keys: Vec<TileKey>,
}

impl TileSet {
    fn insert(&mut self, tile: TileCoord) {
        if self.seen.insert(tile) {
            self.keys.push(tile_to_key(tile));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Geometry stub that walks straight lines in degree space.
    struct Planar;

    impl RegionGeometry for Planar {
        fn bearing(&self, from: LngLat, to: LngLat) -> f64 {
            (to.lng - from.lng).atan2(to.lat - from.lat).to_degrees()
        }

        fn destination(&self, origin: LngLat, distance: f64, bearing: f64, _units: Units) -> LngLat {
            let theta = bearing.to_radians();
            LngLat::new(
                origin.lng + distance * theta.sin(),
                origin.lat + distance * theta.cos(),
            )
        }
    }

    fn square(center: LngLat, half: f64) -> Vec<[f64; 2]> {
        vec![
            [center.lng - half, center.lat - half],
            [center.lng + half, center.lat - half],
            [center.lng + half, center.lat + half],
            [center.lng - half, center.lat + half],
        ]
    }

    #[test]
    fn test_small_region_single_tile() {
        let center = LngLat::new(10.0, 10.0);
        let region = Region {
            center,
            radius: 0.1,
            units: Units::Degrees,
            ring: square(center, 0.1),
        };
        let keys = get_tiles_of_region(&region, 2, &RhumbLine);
        assert_eq!(keys, vec![point_to_tile(10.0, 10.0, 2).key()]);
    }

    #[test]
    fn test_center_tile_first_and_unique() {
        let center = LngLat::new(0.5, 0.5);
        let region = Region {
            center,
            radius: 1.0,
            units: Units::Degrees,
            ring: square(center, 1.0),
        };
        let keys = get_tiles_of_region(&region, 4, &RhumbLine);
        assert_eq!(keys[0], point_to_tile(0.5, 0.5, 4).key());

        let unique: HashSet<_> = keys.iter().collect();
        assert_eq!(unique.len(), keys.len());
    }

    #[test]
    fn test_intermediate_tiles_fill_gaps() {
        // Vertex 4 columns east of the center at level 4 (22.5° per column)
        let center = LngLat::new(1.0, 0.1);
        let region = Region {
            center,
            radius: 90.0,
            units: Units::Degrees,
            ring: vec![[91.0, 0.1]],
        };
        let keys = get_tiles_of_region(&region, 4, &Planar);
        let columns: Vec<u32> = keys.iter().map(|k| k.tile().x).collect();
        assert_eq!(columns, vec![8, 12, 9, 10, 11]);
        assert!(keys.iter().all(|k| k.tile().y == 7));
    }

    #[test]
    fn test_region_deserializes() {
        let json = r#"{
            "center": { "lng": -122.4, "lat": 37.8 },
            "radius": 50,
            "units": "miles",
            "ring": [[-123.0, 37.0], [-122.0, 38.0]]
        }"#;
        let region: Region = serde_json::from_str(json).unwrap();
        assert_eq!(region.units, Units::Miles);
        assert_eq!(region.ring.len(), 2);

        let json = r#"{ "center": { "lng": 0, "lat": 0 }, "radius": 1, "ring": [] }"#;
        let region: Region = serde_json::from_str(json).unwrap();
        assert_eq!(region.units, Units::Kilometers);
    }

    #[test]
    fn test_region_deserializes_from_feature() {
        let json = r#"{
            "type": "Feature",
            "properties": {
                "center": { "lng": 10.0, "lat": 20.0 },
                "radius": 500,
                "units": "kilometers"
            },
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[9.0, 19.0], [11.0, 19.0], [11.0, 21.0], [9.0, 19.0]]]
            }
        }"#;
        let region: Region = serde_json::from_str(json).unwrap();
        assert_eq!(region.center, LngLat::new(10.0, 20.0));
        assert_eq!(region.radius, 500.0);
        assert_eq!(region.ring.len(), 4);
        assert_eq!(region.ring[1], [11.0, 19.0]);
    }

    #[test]
    fn test_feature_without_ring_is_rejected() {
        let json = r#"{
            "properties": { "center": { "lng": 0, "lat": 0 }, "radius": 1 },
            "geometry": { "type": "Polygon", "coordinates": [] }
        }"#;
        assert!(serde_json::from_str::<Region>(json).is_err());
    }
}
