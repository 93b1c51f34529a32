//! Generates the two quad lookup tables at build time.
//!
//! Four same-size pieces (two per player) occupy four locations, each either
//! `Out` (0) or a board cell (1-9). Board cells must be pairwise distinct;
//! any number of pieces may sit at `Out`. Each player's two locations are
//! kept in non-ascending order. Enumerating every such 4-tuple yields 1,423
//! distinct placements, which serve as one digit of the mixed-radix
//! position id.
//!
//! Emitted into `$OUT_DIR/quad_tables.rs`:
//! - `PIECE_QUAD_INDEX_MAP`: quad index -> [active0, active1, inactive0,
//!   inactive1] locations.
//! - `LOCATION_QUAD_MAP`: raw 4-tuple (base-10 digits) -> quad index, or
//!   `u16::MAX` for tuples with overlapping board cells. Non-canonical
//!   orderings map to the index of their sorted form.

use std::collections::HashMap;
use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

const LOCATION_NUMS: usize = 10;
const QUAD_COMBINATIONS: usize = 1423;

/// All location pairs in canonical (non-ascending) order: (Out, Out) first,
/// then every strictly descending pair, sorted by (low, high).
fn location_pairs() -> Vec<(u8, u8)> {
    let mut pairs = vec![(0u8, 0u8)];
    for low in 0..9u8 {
        for high in (low + 1)..10 {
            pairs.push((high, low));
        }
    }
    pairs
}

/// Bitmap of the board cells a pair occupies (bit 0, the Out bit, masked off).
fn board_bitmap(pair: (u8, u8)) -> u16 {
    ((1u16 << pair.0) | (1u16 << pair.1)) & 0x3fe
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let pairs = location_pairs();

    // Forward table: inactive pair outer, active pair inner. The iteration
    // order defines the quad index.
    let mut quads: Vec<[u8; 4]> = Vec::with_capacity(QUAD_COMBINATIONS);
    for &(i0, i1) in &pairs {
        let inactive_map = board_bitmap((i0, i1));
        for &(a0, a1) in &pairs {
            if board_bitmap((a0, a1)) & inactive_map == 0 {
                quads.push([a0, a1, i0, i1]);
            }
        }
    }
    assert_eq!(quads.len(), QUAD_COMBINATIONS, "quad enumeration drifted");

    let mut index_of: HashMap<[u8; 4], u16> = HashMap::with_capacity(quads.len());
    for (seq, quad) in quads.iter().enumerate() {
        index_of.insert(*quad, seq as u16);
    }

    // Inverse table over all 10^4 raw tuples.
    let mut inverse = vec![u16::MAX; LOCATION_NUMS.pow(4)];
    for l3 in 0..LOCATION_NUMS as u8 {
        for l2 in 0..LOCATION_NUMS as u8 {
            for l1 in 0..LOCATION_NUMS as u8 {
                for l0 in 0..LOCATION_NUMS as u8 {
                    let on_board: Vec<u8> =
                        [l0, l1, l2, l3].into_iter().filter(|&l| l != 0).collect();
                    let mut dedup = on_board.clone();
                    dedup.sort_unstable();
                    dedup.dedup();
                    if dedup.len() != on_board.len() {
                        continue;
                    }

                    let canon = [l0.max(l1), l0.min(l1), l2.max(l3), l2.min(l3)];
                    let index = l0 as usize
                        + l1 as usize * LOCATION_NUMS
                        + l2 as usize * LOCATION_NUMS.pow(2)
                        + l3 as usize * LOCATION_NUMS.pow(3);
                    inverse[index] = index_of[&canon];
                }
            }
        }
    }

    let mut out = String::new();
    out.push_str("// Generated by build.rs. Do not edit.\n\n");

    writeln!(
        out,
        "pub(crate) static PIECE_QUAD_INDEX_MAP: [[u8; 4]; {}] = [",
        QUAD_COMBINATIONS
    )
    .unwrap();
    for quad in &quads {
        writeln!(out, "    [{}, {}, {}, {}],", quad[0], quad[1], quad[2], quad[3]).unwrap();
    }
    out.push_str("];\n\n");

    writeln!(
        out,
        "pub(crate) static LOCATION_QUAD_MAP: [u16; {}] = [",
        inverse.len()
    )
    .unwrap();
    for chunk in inverse.chunks(10) {
        let row: Vec<String> = chunk.iter().map(|v| v.to_string()).collect();
        writeln!(out, "    {},", row.join(", ")).unwrap();
    }
    out.push_str("];\n");

    let out_dir = env::var("OUT_DIR").expect("OUT_DIR not set by cargo");
    fs::write(Path::new(&out_dir).join("quad_tables.rs"), out)
        .expect("failed to write quad_tables.rs");
}
