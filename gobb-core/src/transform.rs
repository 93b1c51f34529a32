//! The dihedral group D4 acting on board locations.
//!
//! Eight symmetries: four rotations and their mirrored counterparts. `Out`
//! is a fixed point of every transform. Canonicalization picks the minimum
//! position id over the orbit, so symmetric positions share one table cell.

use crate::types::Location;

/// One of the eight D4 symmetries.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[repr(u8)]
pub enum Transform {
    Identity = 0,
    Rotate90 = 1,
    Rotate180 = 2,
    Rotate270 = 3,
    /// Flip left-right.
    Mirror = 4,
    /// Flip left-right, then rotate 90 degrees clockwise.
    MirrorRotate90 = 5,
    MirrorRotate180 = 6,
    MirrorRotate270 = 7,
}

impl Transform {
    /// The number of symmetries.
    pub const NUM: usize = 8;

    /// All eight symmetries.
    pub const ALL: [Transform; 8] = [
        Transform::Identity,
        Transform::Rotate90,
        Transform::Rotate180,
        Transform::Rotate270,
        Transform::Mirror,
        Transform::MirrorRotate90,
        Transform::MirrorRotate180,
        Transform::MirrorRotate270,
    ];

    /// The seven non-identity symmetries, used when scanning an orbit.
    pub const EFFECTIVE: [Transform; 7] = [
        Transform::Rotate90,
        Transform::Rotate180,
        Transform::Rotate270,
        Transform::Mirror,
        Transform::MirrorRotate90,
        Transform::MirrorRotate180,
        Transform::MirrorRotate270,
    ];

    /// Apply the symmetry to a location.
    #[inline]
    pub fn apply(self, loc: Location) -> Location {
        LOCATION_MAPS[self as usize][loc.index()]
    }

    /// The symmetry undoing this one: `t.invert().apply(t.apply(l)) == l`.
    ///
    /// Only the quarter rotations are non-involutive.
    #[inline]
    pub fn invert(self) -> Transform {
        INVERSES[self as usize]
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Transform::Identity => "Identity",
            Transform::Rotate90 => "Rotate90",
            Transform::Rotate180 => "Rotate180",
            Transform::Rotate270 => "Rotate270",
            Transform::Mirror => "Mirror",
            Transform::MirrorRotate90 => "MirrorRotate90",
            Transform::MirrorRotate180 => "MirrorRotate180",
            Transform::MirrorRotate270 => "MirrorRotate270",
        }
    }
}

use Location::{Center, E, N, NE, NW, Out, S, SE, SW, W};

/// Location maps for each symmetry, indexed `[transform][location]`.
static LOCATION_MAPS: [[Location; Location::NUM]; Transform::NUM] = [
    // Identity
    [Out, NW, N, NE, W, Center, E, SW, S, SE],
    // Rotate90
    [Out, NE, E, SE, N, Center, S, NW, W, SW],
    // Rotate180
    [Out, SE, S, SW, E, Center, W, NE, N, NW],
    // Rotate270
    [Out, SW, W, NW, S, Center, N, SE, E, NE],
    // Mirror
    [Out, NE, N, NW, E, Center, W, SE, S, SW],
    // MirrorRotate90
    [Out, SE, E, NE, S, Center, N, SW, W, NW],
    // MirrorRotate180
    [Out, SW, S, SE, W, Center, E, NW, N, NE],
    // MirrorRotate270
    [Out, NW, W, SW, N, Center, S, NE, E, SE],
];

static INVERSES: [Transform; Transform::NUM] = [
    Transform::Identity,
    Transform::Rotate270,
    Transform::Rotate180,
    Transform::Rotate90,
    Transform::Mirror,
    Transform::MirrorRotate90,
    Transform::MirrorRotate180,
    Transform::MirrorRotate270,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_is_fixed() {
        for t in Transform::ALL {
            assert_eq!(t.apply(Location::Out), Location::Out);
        }
    }

    #[test]
    fn test_center_is_fixed() {
        for t in Transform::ALL {
            assert_eq!(t.apply(Location::Center), Location::Center);
        }
    }

    #[test]
    fn test_rotate90_corners() {
        assert_eq!(Transform::Rotate90.apply(Location::NW), Location::NE);
        assert_eq!(Transform::Rotate90.apply(Location::NE), Location::SE);
        assert_eq!(Transform::Rotate90.apply(Location::SE), Location::SW);
        assert_eq!(Transform::Rotate90.apply(Location::SW), Location::NW);
    }

    #[test]
    fn test_mirror_edges() {
        assert_eq!(Transform::Mirror.apply(Location::W), Location::E);
        assert_eq!(Transform::Mirror.apply(Location::E), Location::W);
        assert_eq!(Transform::Mirror.apply(Location::N), Location::N);
        assert_eq!(Transform::Mirror.apply(Location::S), Location::S);
    }

    #[test]
    fn test_each_map_is_a_permutation() {
        for t in Transform::ALL {
            let mut seen = [false; Location::NUM];
            for loc in Location::ALL {
                let mapped = t.apply(loc);
                assert!(!seen[mapped.index()], "{:?} maps two locations onto {:?}", t, mapped);
                seen[mapped.index()] = true;
            }
        }
    }

    #[test]
    fn test_invert_round_trip() {
        for t in Transform::ALL {
            for loc in Location::ALL {
                assert_eq!(t.invert().apply(t.apply(loc)), loc, "transform {:?}", t);
                assert_eq!(t.apply(t.invert().apply(loc)), loc, "transform {:?}", t);
            }
        }
    }
}
