//! Move enumeration shared by the engine and the inspector.
//!
//! Enumeration order is fixed: piece kinds smallest to largest, first pair
//! slot before the second, destinations in location order. When both copies
//! of a kind share a location only the first slot is visited, so a move is
//! reported once.

use std::ops::ControlFlow;

use gobb_core::{Location, MoveOutcome, Piece, Position, Role};

/// One enumerated move together with the position it leads to.
#[derive(Clone, Copy, Debug)]
pub struct MoveRecord {
    pub piece: Piece,
    pub source: Location,
    pub destination: Location,
    pub position: Position,
}

/// Visit every successful forward move of the active player, stopping early
/// when the visitor breaks.
pub fn try_for_each_forward(
    pos: &Position,
    mut visit: impl FnMut(MoveRecord) -> ControlFlow<()>,
) -> ControlFlow<()> {
    for piece in Piece::ACTIVE {
        let pair = pos.locations_of(piece);
        for slot in 0..2 {
            let src = if slot == 0 { pair.first() } else { pair.second() };
            for dst in Location::ON_BOARD {
                if let MoveOutcome::Success(next) = pos.move_piece(piece, src, dst) {
                    visit(MoveRecord { piece, source: src, destination: dst, position: next })?;
                }
            }
            if pair.is_doubled() {
                break;
            }
        }
    }
    ControlFlow::Continue(())
}

/// Visit every successful forward move of the active player.
pub fn for_each_forward(pos: &Position, mut visit: impl FnMut(MoveRecord)) {
    let _ = try_for_each_forward(pos, |record| {
        visit(record);
        ControlFlow::Continue(())
    });
}

/// Visit every successful retrograde move of the inactive player.
///
/// Destinations include `Out`: un-placing a piece is a valid undo.
pub fn for_each_retro(pos: &Position, mut visit: impl FnMut(MoveRecord)) {
    for piece in Piece::INACTIVE {
        let pair = pos.locations_of(piece);
        for slot in 0..2 {
            let src = if slot == 0 { pair.first() } else { pair.second() };
            for dst in Location::ALL {
                if let MoveOutcome::Success(next) = pos.move_back(piece, src, dst) {
                    visit(MoveRecord { piece, source: src, destination: dst, position: next });
                }
            }
            if pair.is_doubled() {
                break;
            }
        }
    }
}

/// All successful forward moves, in enumeration order.
pub fn forward_moves(pos: &Position) -> Vec<MoveRecord> {
    let mut moves = Vec::new();
    for_each_forward(pos, |record| moves.push(record));
    moves
}

/// All successful retrograde moves, in enumeration order.
pub fn retro_moves(pos: &Position) -> Vec<MoveRecord> {
    let mut moves = Vec::new();
    for_each_retro(pos, |record| moves.push(record));
    moves
}

/// The number of legal forward moves. Zero means stalemate: every remaining
/// option would uncover an opposing line.
pub fn forward_move_count(pos: &Position) -> usize {
    let mut count = 0;
    for_each_forward(pos, |_| count += 1);
    count
}

/// How many of `role`'s pieces sit on the board.
pub fn on_board_piece_count(pos: &Position, role: Role) -> usize {
    let kinds = match role {
        Role::Active => Piece::ACTIVE,
        Role::Inactive => Piece::INACTIVE,
    };
    let mut count = 0;
    for piece in kinds {
        let pair = pos.locations_of(piece);
        if pair.first().is_on_board() {
            count += 1;
        }
        if pair.second().is_on_board() {
            count += 1;
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use gobb_core::{Color, LocationPair, INITIAL_POSITION_ID};
    use Location::{Center, Out, NW, SE, W};

    fn parts(pairs: [(Location, Location); 6]) -> [LocationPair; 6] {
        pairs.map(|(a, b)| LocationPair::new(a, b))
    }

    #[test]
    fn test_empty_board_has_27_moves() {
        // Three sizes, one visited slot each, nine destinations.
        let pos = Position::from_id(INITIAL_POSITION_ID).unwrap();
        assert_eq!(forward_move_count(&pos), 27);
    }

    #[test]
    fn test_empty_board_has_no_retro_moves() {
        let pos = Position::from_id(INITIAL_POSITION_ID).unwrap();
        assert!(retro_moves(&pos).is_empty());
    }

    #[test]
    fn test_doubled_pair_not_visited_twice() {
        let pos = Position::from_id(INITIAL_POSITION_ID).unwrap();
        let moves = forward_moves(&pos);
        // Both copies of each kind are Out; placing either is the same move.
        let small_placements = moves
            .iter()
            .filter(|m| m.piece == Piece::ActiveSmall)
            .count();
        assert_eq!(small_placements, 9);
    }

    #[test]
    fn test_split_pair_visits_both_slots() {
        let pos = Position::from_parts(
            Color::Orange,
            parts([
                (NW, Out),
                (Out, Out),
                (Out, Out),
                (Out, Out),
                (Out, Out),
                (Out, Out),
            ]),
        )
        .unwrap();
        let moves = forward_moves(&pos);
        // The on-board small can slide to 8 cells, the reserve copy can be
        // placed on any of the 8 free cells (not onto its twin).
        let small_moves = moves
            .iter()
            .filter(|m| m.piece == Piece::ActiveSmall)
            .count();
        assert_eq!(small_moves, 16);
    }

    #[test]
    fn test_retro_moves_from_one_piece() {
        // Blue just placed a small at W (S2's successor shape).
        let pos = Position::from_parts(
            Color::Blue,
            parts([
                (Out, Out),
                (W, Out),
                (Out, Out),
                (Out, Out),
                (Out, Out),
                (Out, Out),
            ]),
        )
        .unwrap();
        let moves = retro_moves(&pos);
        // The inactive small can be picked up back to the reserve or slid
        // backwards to any of the 8 other cells.
        assert_eq!(moves.len(), 9);
        assert!(moves
            .iter()
            .all(|m| m.piece == Piece::InactiveSmall && m.source == W));
        assert_eq!(moves[0].destination, Out);
    }

    #[test]
    fn test_forward_and_retro_are_inverse_on_sample() {
        let pos = Position::from_parts(
            Color::Orange,
            parts([
                (NW, Out),
                (SE, Out),
                (Center, Out),
                (Out, Out),
                (Out, Out),
                (Out, Out),
            ]),
        )
        .unwrap();
        for record in forward_moves(&pos) {
            let found = retro_moves(&record.position)
                .iter()
                .any(|back| back.position.id() == pos.id());
            assert!(found, "move {:?} has no retrograde inverse", record);
        }
    }

    #[test]
    fn test_on_board_piece_count() {
        let pos = Position::from_parts(
            Color::Orange,
            parts([
                (NW, SE),
                (W, Out),
                (Out, Out),
                (Center, Out),
                (Out, Out),
                (Out, Out),
            ]),
        )
        .unwrap();
        assert_eq!(on_board_piece_count(&pos, Role::Active), 2);
        assert_eq!(on_board_piece_count(&pos, Role::Inactive), 2);
    }
}
