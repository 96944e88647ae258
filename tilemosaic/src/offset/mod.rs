//! Mapping placements into a substitute tile's texture space.
//!
//! A placement at level `z` may be drawn with a tile from a coarser level
//! (an ancestor) or a finer one (one cell of a descendant mosaic). The
//! adjusted offset is expressed in the rendered tile's grid so the renderer
//! can sample the matching region.

use crate::coord::{Offset, TileKey};

/// Adjusted `(x, y)` offset of `offset` in units of `rendered`'s grid.
///
/// With `rendered` at level `rz`:
/// - coarser (`rz < z`): the offset is scaled down by `2^(z - rz)`, flooring
///   towards negative infinity so wrapped placements left of the origin land
///   in the right cell;
/// - finer (`rz > z`): the offset is scaled up by `2^(rz - z)` and the
///   rendered tile's position within its mosaic, `rendered mod 2^(rz - z)`,
///   is added;
/// - same level: the offset is returned unchanged.
///
/// All arithmetic is integer shifting and the function is total for any
/// `offset.z`. Scaling down by 2^63 or more floors every `i64` to `0` or
/// `-1`, so larger shifts are capped there without changing the result.
/// Scaling up saturates at the `i64` bounds.
pub fn get_adjusted_offset(offset: Offset, rendered: &TileKey) -> (i64, i64) {
    let target = rendered.tile();

    if target.z <= offset.z {
        let shift = u32::from(offset.z - target.z).min(MAX_DOWN_SHIFT);
        (offset.x >> shift, offset.y >> shift)
    } else {
        // Key levels are at most MAX_LEVEL, well below 63
        let shift = u32::from(target.z - offset.z);
        let factor = 1i64 << shift;
        let cell_mask = factor - 1;
        (
            offset.x.saturating_mul(factor).saturating_add(i64::from(target.x) & cell_mask),
            offset.y.saturating_mul(factor).saturating_add(i64::from(target.y) & cell_mask),
        )
    }
}

const MAX_DOWN_SHIFT: u32 = i64::BITS - 1;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::TileCoord;

    fn key(s: &str) -> TileKey {
        s.parse().unwrap()
    }

    #[test]
    fn test_same_tile_needs_no_adjustment() {
        assert_eq!(get_adjusted_offset(Offset::new(0, 0, 0), &key("0,0,0")), (0, 0));
        assert_eq!(get_adjusted_offset(Offset::new(3, 2, 2), &key("3,2,2")), (3, 2));
    }

    #[test]
    fn test_wrapped_placement_same_level() {
        // Placement just past the east edge drawn with the wrapped tile
        assert_eq!(get_adjusted_offset(Offset::new(4, 1, 2), &key("0,1,2")), (4, 1));
    }

    #[test]
    fn test_ancestor_scales_down() {
        assert_eq!(get_adjusted_offset(Offset::new(4, 3, 5), &key("1,0,3")), (1, 0));
        assert_eq!(get_adjusted_offset(Offset::new(7, 5, 3), &key("1,1,1")), (1, 1));
    }

    #[test]
    fn test_ancestor_floors_negative_placements() {
        // -1 at level 2 is the west wrap; at level 0 it is world -1, not 0
        assert_eq!(get_adjusted_offset(Offset::new(-1, 0, 2), &key("0,0,0")), (-1, 0));
        assert_eq!(get_adjusted_offset(Offset::new(-4, 0, 2), &key("0,0,0")), (-1, 0));
        assert_eq!(get_adjusted_offset(Offset::new(-5, 0, 2), &key("0,0,0")), (-2, 0));
    }

    #[test]
    fn test_descendant_adds_cell_position() {
        // Target (1,1,2) drawn with its four level-3 children
        let offset = Offset::new(1, 1, 2);
        assert_eq!(get_adjusted_offset(offset, &key("2,2,3")), (2, 2));
        assert_eq!(get_adjusted_offset(offset, &key("3,2,3")), (3, 2));
        assert_eq!(get_adjusted_offset(offset, &key("2,3,3")), (2, 3));
        assert_eq!(get_adjusted_offset(offset, &key("3,3,3")), (3, 3));
    }

    #[test]
    fn test_descendant_of_wrapped_placement() {
        // Placement one world east of (3,1,2), drawn with child (7,3,3)
        assert_eq!(get_adjusted_offset(Offset::new(7, 1, 2), &key("7,3,3")), (15, 3));
    }

    #[test]
    fn test_placement_deeper_than_any_key_floors() {
        assert_eq!(get_adjusted_offset(Offset::new(0, 0, 70), &key("0,0,0")), (0, 0));
        assert_eq!(get_adjusted_offset(Offset::new(5, -5, 255), &key("0,0,0")), (0, -1));
        assert_eq!(
            get_adjusted_offset(Offset::new(i64::MAX, i64::MIN, 64), &key("0,0,1")),
            (0, -1)
        );
    }

    #[test]
    fn test_huge_placement_saturates_when_scaled_up() {
        let adjusted = get_adjusted_offset(Offset::new(i64::MAX, i64::MIN, 0), &key("1,1,30"));
        assert_eq!(adjusted, (i64::MAX, i64::MIN + 1));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_rendering_own_tile_returns_offset(
                z in 0u8..=20,
                x_raw in any::<u32>(),
                y_raw in any::<u32>(),
            ) {
                let size = 1u64 << z;
                let tile = TileCoord::new(
                    (u64::from(x_raw) % size) as u32,
                    (u64::from(y_raw) % size) as u32,
                    z,
                );
                let adjusted = get_adjusted_offset(tile.to_offset(), &tile.key());
                prop_assert_eq!(adjusted, (i64::from(tile.x), i64::from(tile.y)));
            }

            #[test]
            fn test_ancestor_contains_placement(
                z in 1u8..=16,
                x_raw in 0u32..65536,
                y_raw in 0u32..65536,
                up in 1u8..=16,
            ) {
                let size = 1u32 << z;
                let tile = TileCoord::new(x_raw % size, y_raw % size, z);
                let up = up.min(z);
                let ancestor = TileCoord::new(tile.x >> up, tile.y >> up, z - up);

                let adjusted = get_adjusted_offset(tile.to_offset(), &ancestor.key());
                prop_assert_eq!(adjusted, (i64::from(ancestor.x), i64::from(ancestor.y)));
            }
        }
    }
}
