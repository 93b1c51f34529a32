//! Gobblet Gobblers game model.
//!
//! Gobblet Gobblers is played on a 3x3 board; each player owns two pieces in
//! each of three sizes, and a larger piece may cover ("gobble") a smaller
//! one of either player. This crate provides the compact position encoding
//! used by the retrograde analyzer:
//!
//! - [`types`] — players, piece kinds and board locations, with ownership
//!   expressed as Active/Inactive roles plus one color bit.
//! - [`transform`] — the eight D4 board symmetries.
//! - [`tables`] — the build-time generated quad tables that map same-size
//!   placements to a dense index.
//! - [`position`] — [`Position`]: id round-trips, forward moves, retrograde
//!   moves, win detection and orbit canonicalization.

pub mod position;
pub mod tables;
pub mod transform;
pub mod types;

pub use position::{
    is_valid_position_id, LocationPair, MoveOutcome, Position, PositionId, INITIAL_POSITION_ID,
    INVALID_POSITION_ID, PIECE_SET_COMBINATIONS, POSITION_ID_NUMS,
};
pub use tables::QUAD_COMBINATIONS;
pub use transform::Transform;
pub use types::{Color, Location, Piece, Role, Size};
