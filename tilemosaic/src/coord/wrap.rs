//! Horizontal/vertical wraparound of tile coordinates.
//!
//! The tile grid at each level is treated as cyclic so placements just past
//! either edge map back onto the tile at the other edge.

/// Largest valid column/row index at `level`, i.e. `2^level - 1`.
#[inline]
pub fn max_index(level: u8) -> i64 {
    (1i64 << level) - 1
}

/// Wrap `v` into the cyclic range `[0, max]`.
///
/// Values one world-width out of range are wrapped once; anything further out
/// is clamped to the nearest edge rather than wrapped repeatedly.
#[inline]
pub fn clip(v: i64, max: i64) -> i64 {
    let wrapped = if v < 0 {
        v + max + 1
    } else if v > max {
        v - max - 1
    } else {
        v
    };

    wrapped.clamp(0, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_index() {
        assert_eq!(max_index(0), 0);
        assert_eq!(max_index(1), 1);
        assert_eq!(max_index(5), 31);
    }

    #[test]
    fn test_clip_wraps_one_step() {
        assert_eq!(clip(-1, 7), 7);
        assert_eq!(clip(8, 7), 0);
        assert_eq!(clip(9, 7), 1);
        assert_eq!(clip(3, 7), 3);
    }

    #[test]
    fn test_clip_clamps_far_values() {
        // Two world-widths away: wrapped once, then clamped
        assert_eq!(clip(-20, 7), 0);
        assert_eq!(clip(20, 7), 7);
    }

    #[test]
    fn test_clip_single_tile_world() {
        assert_eq!(clip(-1, 0), 0);
        assert_eq!(clip(1, 0), 0);
        assert_eq!(clip(0, 0), 0);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_clip_in_range(v in -10_000i64..10_000, level in 0u8..=12) {
                let max = max_index(level);
                let c = clip(v, max);
                prop_assert!(c >= 0 && c <= max, "clip({}, {}) = {}", v, max, c);
            }

            #[test]
            fn test_clip_identity_in_range(level in 0u8..=12, raw in 0i64..4096) {
                let max = max_index(level);
                let v = raw % (max + 1);
                prop_assert_eq!(clip(v, max), v);
            }

            #[test]
            fn test_clip_wraps_adjacent_worlds(level in 0u8..=12, raw in 0i64..4096) {
                let max = max_index(level);
                let v = raw % (max + 1);
                prop_assert_eq!(clip(v - (max + 1), max), v);
                prop_assert_eq!(clip(v + (max + 1), max), v);
            }
        }
    }
}
