//! Quad lookup tables generated by `build.rs`.
//!
//! A "quad" is the 4-tuple of locations occupied by the four same-size
//! pieces: (active #1, active #2, inactive #1, inactive #2), each pair in
//! non-ascending order. The 10^4 raw tuple space collapses to 1,423 legal
//! placements once overlapping board cells are ruled out; the dense index
//! over those placements is one digit of the mixed-radix position id.

use crate::types::Location;

include!(concat!(env!("OUT_DIR"), "/quad_tables.rs"));

/// The number of legal same-size placements.
pub const QUAD_COMBINATIONS: u64 = 1423;

/// Look up the quad index of four locations.
///
/// Accepts pairs in any order; returns `None` when two pieces would share a
/// board cell.
#[inline]
pub fn quad_index(locs: [Location; 4]) -> Option<u16> {
    let raw = locs[0].index()
        + locs[1].index() * 10
        + locs[2].index() * 100
        + locs[3].index() * 1000;
    match LOCATION_QUAD_MAP[raw] {
        u16::MAX => None,
        index => Some(index),
    }
}

/// The four locations of a quad index, pairs in non-ascending order.
///
/// `index` must be below [`QUAD_COMBINATIONS`].
#[inline]
pub fn quad_locations(index: u16) -> [Location; 4] {
    let digits = PIECE_QUAD_INDEX_MAP[index as usize];
    digits.map(|d| Location::from_u8(d).expect("generated table holds location digits"))
}
