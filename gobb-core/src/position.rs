//! Position encoding and move execution.
//!
//! # Position id (64-bit)
//!
//! ```text
//! 1. For each size, list the four piece locations as
//!    (active #1, active #2, inactive #1, inactive #2), each pair in
//!    non-ascending order, and look up its quad index Q(size) in [0, 1423).
//! 2. base = Q(Small) + 1423*Q(Medium) + 1423^2*Q(Large)
//! 3. id = base, plus 1423^3 when Blue is the active player.
//! ```
//!
//! Ids therefore live in [0, 2*1423^3); `u64::MAX` is reserved as the
//! invalid sentinel. The analysis table is indexed by the *canonical* id:
//! the minimum over the eight D4 symmetries with the color offset removed.

use crate::tables::{quad_index, quad_locations, QUAD_COMBINATIONS};
use crate::transform::Transform;
use crate::types::{Color, Location, Piece, Role, Size};

/// A position identifier.
pub type PositionId = u64;

/// The id of the empty starting position.
pub const INITIAL_POSITION_ID: PositionId = 0;

/// Sentinel id representing "no position".
pub const INVALID_POSITION_ID: PositionId = u64::MAX;

/// The number of placements of all twelve pieces (1423^3).
pub const PIECE_SET_COMBINATIONS: u64 =
    QUAD_COMBINATIONS * QUAD_COMBINATIONS * QUAD_COMBINATIONS;

/// The number of position ids: every placement, for either active color.
pub const POSITION_ID_NUMS: u64 = PIECE_SET_COMBINATIONS * 2;

/// Check that an id is within the encodable range.
#[inline]
pub fn is_valid_position_id(id: PositionId) -> bool {
    id < POSITION_ID_NUMS
}

/// The locations of the two copies of one piece kind.
///
/// Invariant: kept in non-ascending order, `first() >= second()`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct LocationPair(Location, Location);

impl LocationPair {
    /// Build a pair, restoring the non-ascending invariant.
    #[inline]
    pub fn new(a: Location, b: Location) -> LocationPair {
        if a >= b {
            LocationPair(a, b)
        } else {
            LocationPair(b, a)
        }
    }

    /// Both copies in the reserve.
    #[inline]
    pub fn out() -> LocationPair {
        LocationPair(Location::Out, Location::Out)
    }

    #[inline]
    pub fn first(self) -> Location {
        self.0
    }

    #[inline]
    pub fn second(self) -> Location {
        self.1
    }

    /// True if either copy sits at `loc`.
    #[inline]
    pub fn contains(self, loc: Location) -> bool {
        self.0 == loc || self.1 == loc
    }

    /// True when both copies share a location (e.g. both `Out`).
    #[inline]
    pub fn is_doubled(self) -> bool {
        self.0 == self.1
    }

    /// Relocate the copy at `src` to `dst`, keeping the invariant.
    ///
    /// Returns false when neither copy is at `src`.
    #[must_use]
    pub fn update_either(&mut self, src: Location, dst: Location) -> bool {
        if self.0 == src {
            if self.1 <= dst {
                self.0 = dst;
            } else {
                self.0 = self.1;
                self.1 = dst;
            }
        } else if self.1 == src {
            if self.0 >= dst {
                self.1 = dst;
            } else {
                self.1 = self.0;
                self.0 = dst;
            }
        } else {
            return false;
        }
        true
    }

    /// Apply a board symmetry to both copies.
    #[inline]
    pub fn transform(self, trans: Transform) -> LocationPair {
        LocationPair::new(trans.apply(self.0), trans.apply(self.1))
    }
}

/// Outcome of a forward or retrograde move attempt.
#[derive(Clone, Copy, Debug)]
pub enum MoveOutcome {
    /// The move is legal; the position after the role swap.
    Success(Position),
    /// Picking the piece up exposes a finished line for the opponent of the
    /// mover, so the move loses on the spot. Not an error: the retrograde
    /// engine treats such moves as unavailable.
    Lost,
    /// The move violates a precondition (wrong piece, covered piece,
    /// occupied destination, ...).
    Invalid,
}

impl MoveOutcome {
    /// The resulting position of a successful move.
    #[inline]
    pub fn position(self) -> Option<Position> {
        match self {
            MoveOutcome::Success(pos) => Some(pos),
            _ => None,
        }
    }

    #[inline]
    pub fn is_success(self) -> bool {
        matches!(self, MoveOutcome::Success(_))
    }
}

/// The eight winning lines: three rows, three columns, two diagonals.
const LINES: [[Location; 3]; 8] = [
    [Location::NW, Location::N, Location::NE],
    [Location::W, Location::Center, Location::E],
    [Location::SW, Location::S, Location::SE],
    [Location::NW, Location::W, Location::SW],
    [Location::N, Location::Center, Location::S],
    [Location::NE, Location::E, Location::SE],
    [Location::NW, Location::Center, Location::SE],
    [Location::NE, Location::Center, Location::SW],
];

/// A decoded position.
///
/// Holds the six location pairs plus two derived views: the topmost piece of
/// each board cell, and the 64-bit id. Instances are always internally
/// consistent; constructors return `None` instead of producing a broken
/// position.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Position {
    id: PositionId,
    active_color: Color,
    pairs: [LocationPair; Piece::NUM],
    tops: [Option<Piece>; 9],
}

impl Position {
    /// Decode a position from its id.
    ///
    /// Returns `None` when `id` is out of range (including the invalid
    /// sentinel).
    pub fn from_id(id: PositionId) -> Option<Position> {
        if !is_valid_position_id(id) {
            return None;
        }

        let (active_color, base) = if id < PIECE_SET_COMBINATIONS {
            (Color::Orange, id)
        } else {
            (Color::Blue, id - PIECE_SET_COMBINATIONS)
        };

        let small = quad_locations((base % QUAD_COMBINATIONS) as u16);
        let medium = quad_locations((base / QUAD_COMBINATIONS % QUAD_COMBINATIONS) as u16);
        let large = quad_locations((base / (QUAD_COMBINATIONS * QUAD_COMBINATIONS)) as u16);

        let pairs = [
            LocationPair::new(small[0], small[1]),
            LocationPair::new(small[2], small[3]),
            LocationPair::new(medium[0], medium[1]),
            LocationPair::new(medium[2], medium[3]),
            LocationPair::new(large[0], large[1]),
            LocationPair::new(large[2], large[3]),
        ];

        let mut pos = Position { id, active_color, pairs, tops: [None; 9] };
        pos.update_tops();
        Some(pos)
    }

    /// Build a position from the active color and six location pairs, in
    /// piece-kind order (active Small, inactive Small, active Medium,
    /// inactive Medium, active Large, inactive Large).
    ///
    /// Returns `None` when two same-size pieces would share a board cell.
    pub fn from_parts(active_color: Color, pairs: [LocationPair; Piece::NUM]) -> Option<Position> {
        for size in Size::ALL {
            let active = pairs[Piece::new(Role::Active, size).index()];
            let inactive = pairs[Piece::new(Role::Inactive, size).index()];
            quad_index([active.first(), active.second(), inactive.first(), inactive.second()])?;
        }

        let mut pos = Position { id: 0, active_color, pairs, tops: [None; 9] };
        pos.update_tops();
        pos.update_id();
        Some(pos)
    }

    /// The position id.
    #[inline]
    pub fn id(&self) -> PositionId {
        self.id
    }

    /// The color of the player to move.
    #[inline]
    pub fn active_color(&self) -> Color {
        self.active_color
    }

    /// The color of the opponent.
    #[inline]
    pub fn inactive_color(&self) -> Color {
        self.active_color.invert()
    }

    /// The locations of the two copies of `piece`.
    #[inline]
    pub fn locations_of(&self, piece: Piece) -> LocationPair {
        self.pairs[piece.index()]
    }

    /// The topmost (visible) piece at a board cell, `None` for an empty cell
    /// or for `Out`.
    #[inline]
    pub fn top_piece(&self, loc: Location) -> Option<Piece> {
        loc.cell().and_then(|cell| self.tops[cell])
    }

    /// True if three of `role`'s pieces top a full line.
    pub fn is_winner(&self, role: Role) -> bool {
        LINES.iter().any(|line| {
            line.iter()
                .all(|&loc| self.top_piece(loc).map(Piece::role) == Some(role))
        })
    }

    /// Execute a forward move of the active player: take `piece` from `src`
    /// (reserve or board) and place it on board cell `dst`.
    ///
    /// Returns [`MoveOutcome::Lost`] when lifting the piece reveals a
    /// finished line of the inactive player; the game ended against the
    /// mover and no successor position exists.
    pub fn move_piece(&self, piece: Piece, src: Location, dst: Location) -> MoveOutcome {
        if piece.role() != Role::Active {
            return MoveOutcome::Invalid;
        }
        if !self.pairs[piece.index()].contains(src) {
            return MoveOutcome::Invalid;
        }
        if !dst.is_on_board() {
            return MoveOutcome::Invalid;
        }
        // A covered piece cannot be moved.
        if src.is_on_board() && self.top_piece(src) != Some(piece) {
            return MoveOutcome::Invalid;
        }
        // Gobbling requires a strictly larger piece.
        if let Some(top) = self.top_piece(dst) {
            if !piece.size().can_gobble(top.size()) {
                return MoveOutcome::Invalid;
            }
        }
        if src == dst {
            return MoveOutcome::Invalid;
        }

        let mut next = *self;
        if src.is_on_board() {
            let moved = next.pairs[piece.index()].update_either(src, Location::Out);
            debug_assert!(moved);
            next.update_tops();
            if next.is_winner(Role::Inactive) {
                return MoveOutcome::Lost;
            }
        }

        let moved = next.pairs[piece.index()].update_either(Location::Out, dst);
        debug_assert!(moved);
        next.update_tops();
        next.invert_roles();
        next.update_id();
        MoveOutcome::Success(next)
    }

    /// Execute a retrograde move: the inactive player picks `piece` back up
    /// from board cell `src` and returns it to `dst` (a cell or the
    /// reserve), undoing a forward move of the previous turn.
    ///
    /// Returns [`MoveOutcome::Lost`] when the pickup reveals a finished line
    /// of the active player.
    pub fn move_back(&self, piece: Piece, src: Location, dst: Location) -> MoveOutcome {
        if piece.role() != Role::Inactive {
            return MoveOutcome::Invalid;
        }
        if !self.pairs[piece.index()].contains(src) {
            return MoveOutcome::Invalid;
        }
        if !src.is_on_board() {
            return MoveOutcome::Invalid;
        }
        if self.top_piece(src) != Some(piece) {
            return MoveOutcome::Invalid;
        }
        if dst.is_on_board() {
            if let Some(top) = self.top_piece(dst) {
                if !piece.size().can_gobble(top.size()) {
                    return MoveOutcome::Invalid;
                }
            }
        }
        if src == dst {
            return MoveOutcome::Invalid;
        }

        let mut next = *self;
        let moved = next.pairs[piece.index()].update_either(src, Location::Out);
        debug_assert!(moved);
        next.update_tops();
        if next.is_winner(Role::Active) {
            return MoveOutcome::Lost;
        }

        let moved = next.pairs[piece.index()].update_either(Location::Out, dst);
        debug_assert!(moved);
        next.update_tops();
        next.invert_roles();
        next.update_id();
        MoveOutcome::Success(next)
    }

    /// The position under a board symmetry. The active color is unchanged.
    pub fn transform(&self, trans: Transform) -> Position {
        let mut next = *self;
        for index in 0..Piece::NUM {
            next.pairs[index] = self.pairs[index].transform(trans);
        }
        next.update_tops();
        next.update_id();
        next
    }

    /// The canonical id: the minimum over the D4 orbit, color offset
    /// removed. Always below [`PIECE_SET_COMBINATIONS`]; this is the
    /// analysis table index.
    pub fn minimize_id(&self) -> PositionId {
        let mut min_id = self.id;
        for trans in Transform::EFFECTIVE {
            let trans_id = self.transform(trans).id;
            if trans_id < min_id {
                min_id = trans_id;
            }
        }
        if min_id >= PIECE_SET_COMBINATIONS {
            min_id -= PIECE_SET_COMBINATIONS;
        }
        min_id
    }

    /// Rebuild the per-cell topmost view. Kinds are visited smallest size
    /// first, so a later write is always the larger piece.
    fn update_tops(&mut self) {
        self.tops = [None; 9];
        for piece in Piece::ALL {
            let pair = self.pairs[piece.index()];
            if let Some(cell) = pair.first().cell() {
                self.tops[cell] = Some(piece);
            }
            if let Some(cell) = pair.second().cell() {
                self.tops[cell] = Some(piece);
            }
        }
    }

    /// Recompute the id from the pairs and the active color.
    fn update_id(&mut self) {
        let mut quads = [0u64; 3];
        for size in Size::ALL {
            let active = self.pairs[Piece::new(Role::Active, size).index()];
            let inactive = self.pairs[Piece::new(Role::Inactive, size).index()];
            let index = quad_index([
                active.first(),
                active.second(),
                inactive.first(),
                inactive.second(),
            ])
            .expect("same-size pieces never overlap in a consistent position");
            quads[size as usize] = u64::from(index);
        }

        self.id = quads[Size::Small as usize]
            + quads[Size::Medium as usize] * QUAD_COMBINATIONS
            + quads[Size::Large as usize] * QUAD_COMBINATIONS * QUAD_COMBINATIONS;
        if self.active_color == Color::Blue {
            self.id += PIECE_SET_COMBINATIONS;
        }
    }

    /// Swap the two players: invert the color, exchange each size's active
    /// and inactive pairs, and re-role every topmost piece.
    fn invert_roles(&mut self) {
        self.active_color = self.active_color.invert();
        for size in Size::ALL {
            let active = Piece::new(Role::Active, size).index();
            let inactive = Piece::new(Role::Inactive, size).index();
            self.pairs.swap(active, inactive);
        }
        for top in self.tops.iter_mut() {
            *top = top.map(Piece::invert_role);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Location::{Center, Out, E, N, NE, NW, S, SE, SW, W};

    fn parts(pairs: [(Location, Location); 6]) -> [LocationPair; 6] {
        pairs.map(|(a, b)| LocationPair::new(a, b))
    }

    #[test]
    fn test_location_pair_invariant() {
        let pair = LocationPair::new(Out, Center);
        assert_eq!(pair.first(), Center);
        assert_eq!(pair.second(), Out);

        let mut pair = LocationPair::new(NW, Out);
        assert!(pair.update_either(NW, Out));
        assert_eq!(pair, LocationPair::out());
        assert!(pair.update_either(Out, SE));
        assert_eq!(pair.first(), SE);
        assert_eq!(pair.second(), Out);
        assert!(!pair.update_either(NW, Center));
    }

    #[test]
    fn test_from_id_round_trip_small_quads() {
        // Small pieces only.
        for id in 0..QUAD_COMBINATIONS {
            let pos = Position::from_id(id).unwrap();
            assert_eq!(pos.transform(Transform::Identity).id(), id);
        }
        // Medium pieces only.
        for quad in 0..QUAD_COMBINATIONS {
            let id = quad * QUAD_COMBINATIONS;
            let pos = Position::from_id(id).unwrap();
            assert_eq!(pos.transform(Transform::Identity).id(), id);
        }
        // Large pieces only.
        for quad in 0..QUAD_COMBINATIONS {
            let id = quad * QUAD_COMBINATIONS * QUAD_COMBINATIONS;
            let pos = Position::from_id(id).unwrap();
            assert_eq!(pos.transform(Transform::Identity).id(), id);
        }
    }

    #[test]
    fn test_from_id_round_trip_mixed_quads() {
        for quad in 0..QUAD_COMBINATIONS {
            let q1 = (quad + 1) % QUAD_COMBINATIONS;
            let q2 = (quad + 2) % QUAD_COMBINATIONS;
            let id = quad + q1 * QUAD_COMBINATIONS + q2 * QUAD_COMBINATIONS * QUAD_COMBINATIONS;
            let pos = Position::from_id(id).unwrap();
            assert_eq!(pos.transform(Transform::Identity).id(), id);

            // Same placement, Blue to move.
            let blue = id + PIECE_SET_COMBINATIONS;
            let pos = Position::from_id(blue).unwrap();
            assert_eq!(pos.active_color(), Color::Blue);
            assert_eq!(pos.transform(Transform::Identity).id(), blue);
        }
    }

    #[test]
    fn test_from_id_out_of_range() {
        assert!(Position::from_id(POSITION_ID_NUMS).is_none());
        assert!(Position::from_id(INVALID_POSITION_ID).is_none());
    }

    #[test]
    fn test_initial_position_is_empty() {
        let pos = Position::from_id(INITIAL_POSITION_ID).unwrap();
        assert_eq!(pos.active_color(), Color::Orange);
        for piece in Piece::ALL {
            assert_eq!(pos.locations_of(piece), LocationPair::out());
        }
        for loc in Location::ON_BOARD {
            assert_eq!(pos.top_piece(loc), None);
        }
    }

    #[test]
    fn test_is_winner_every_line() {
        let lines = [
            [NW, N, NE],
            [W, Center, E],
            [SW, S, SE],
            [NW, W, SW],
            [N, Center, S],
            [NE, E, SE],
            [NW, Center, SE],
            [NE, Center, SW],
        ];
        for line in lines {
            // One size per cell, active player.
            let pos = Position::from_parts(
                Color::Orange,
                parts([
                    (line[0], Out),
                    (Out, Out),
                    (line[1], Out),
                    (Out, Out),
                    (line[2], Out),
                    (Out, Out),
                ]),
            )
            .unwrap();
            assert!(pos.is_winner(Role::Active), "line {:?}", line);
            assert!(!pos.is_winner(Role::Inactive), "line {:?}", line);

            // Same cells for the inactive player.
            let pos = Position::from_parts(
                Color::Orange,
                parts([
                    (Out, Out),
                    (line[0], Out),
                    (Out, Out),
                    (line[1], Out),
                    (Out, Out),
                    (line[2], Out),
                ]),
            )
            .unwrap();
            assert!(!pos.is_winner(Role::Active), "line {:?}", line);
            assert!(pos.is_winner(Role::Inactive), "line {:?}", line);
        }
    }

    #[test]
    fn test_covered_piece_does_not_win() {
        // Inactive pieces on NW-N-NE, but the one at NE is hidden under an
        // active large.
        let pos = Position::from_parts(
            Color::Orange,
            parts([
                (Out, Out),
                (NW, N),
                (Out, Out),
                (NE, Out),
                (NE, Out),
                (Out, Out),
            ]),
        )
        .unwrap();
        assert!(!pos.is_winner(Role::Inactive));
        assert_eq!(pos.top_piece(NE), Some(Piece::ActiveLarge));
    }

    #[test]
    fn test_move_from_reserve() {
        let empty = Position::from_id(INITIAL_POSITION_ID).unwrap();
        let outcome = empty.move_piece(Piece::ActiveSmall, Out, W);
        let next = outcome.position().expect("placing on an empty board succeeds");

        // Roles swapped: the placed piece now belongs to the inactive side.
        assert_eq!(next.active_color(), Color::Blue);
        assert_eq!(
            next.locations_of(Piece::InactiveSmall),
            LocationPair::new(W, Out)
        );
        assert_eq!(next.locations_of(Piece::ActiveSmall), LocationPair::out());
        assert_eq!(next.top_piece(W), Some(Piece::InactiveSmall));
    }

    #[test]
    fn test_move_rejects_equal_size_gobble() {
        let pos = Position::from_parts(
            Color::Orange,
            parts([
                (NW, SW),
                (Out, Out),
                (N, S),
                (Out, Out),
                (NE, SE),
                (Out, Out),
            ]),
        )
        .unwrap();
        // Same size is not strictly smaller.
        assert!(matches!(
            pos.move_piece(Piece::ActiveSmall, NW, SW),
            MoveOutcome::Invalid
        ));
        // Neither is a larger one.
        assert!(matches!(
            pos.move_piece(Piece::ActiveSmall, NW, NE),
            MoveOutcome::Invalid
        ));
        // Gobbling the smaller piece works.
        assert!(pos.move_piece(Piece::ActiveLarge, NE, NW).is_success());
    }

    #[test]
    fn test_move_precondition_violations() {
        // Two smalls on one cell never construct.
        let pos = Position::from_parts(
            Color::Orange,
            parts([
                (NW, Out),
                (NW, Out),
                (Out, Out),
                (Out, Out),
                (Out, Out),
                (Out, Out),
            ]),
        );
        assert!(pos.is_none());

        let pos = Position::from_parts(
            Color::Orange,
            parts([
                (NW, Out),
                (Out, Out),
                (NW, Out),
                (Out, Out),
                (Out, Out),
                (Out, Out),
            ]),
        )
        .unwrap();
        // Moving the opponent's piece forward.
        assert!(matches!(
            pos.move_piece(Piece::InactiveSmall, Out, W),
            MoveOutcome::Invalid
        ));
        // Moving a piece from a location it does not occupy.
        assert!(matches!(
            pos.move_piece(Piece::ActiveSmall, N, W),
            MoveOutcome::Invalid
        ));
        // Moving a covered piece.
        assert!(matches!(
            pos.move_piece(Piece::ActiveSmall, NW, W),
            MoveOutcome::Invalid
        ));
        // Moving to the reserve.
        assert!(matches!(
            pos.move_piece(Piece::ActiveMedium, NW, Out),
            MoveOutcome::Invalid
        ));
        // Moving onto itself.
        assert!(matches!(
            pos.move_piece(Piece::ActiveMedium, NW, NW),
            MoveOutcome::Invalid
        ));
    }

    #[test]
    fn test_move_uncover_loses() {
        // The active large at NW covers an inactive small; the inactive
        // player tops N and NE. Lifting the large completes NW-N-NE.
        let pos = Position::from_parts(
            Color::Orange,
            parts([
                (Out, Out),
                (NW, Out),
                (Out, Out),
                (N, Out),
                (NW, Out),
                (NE, Out),
            ]),
        )
        .unwrap();
        assert!(matches!(
            pos.move_piece(Piece::ActiveLarge, NW, Center),
            MoveOutcome::Lost
        ));
    }

    #[test]
    fn test_move_back_reverses_move() {
        let pos = Position::from_parts(
            Color::Orange,
            parts([
                (NW, Out),
                (SE, Out),
                (Out, Out),
                (Center, Out),
                (Out, Out),
                (Out, Out),
            ]),
        )
        .unwrap();
        let next = pos
            .move_piece(Piece::ActiveSmall, NW, W)
            .position()
            .expect("legal slide");

        // From the successor, picking the (now inactive) small back up from
        // W and returning it to NW restores the original position.
        let back = next
            .move_back(Piece::InactiveSmall, W, NW)
            .position()
            .expect("legal retrograde move");
        assert_eq!(back.id(), pos.id());
    }

    #[test]
    fn test_move_back_to_reserve() {
        let pos = Position::from_parts(
            Color::Orange,
            parts([
                (NW, Out),
                (SE, Out),
                (Out, Out),
                (Out, Out),
                (Out, Out),
                (Out, Out),
            ]),
        )
        .unwrap();
        let prev = pos
            .move_back(Piece::InactiveSmall, SE, Out)
            .position()
            .expect("un-placing is a legal retrograde move");
        assert_eq!(prev.locations_of(Piece::ActiveSmall), LocationPair::out());
        assert_eq!(prev.active_color(), Color::Blue);
    }

    #[test]
    fn test_move_back_uncover_loses() {
        // Active smalls top NW and SE, an active medium sits at Center under
        // the inactive large. Picking the large back up completes the
        // NW-Center-SE diagonal for the active player.
        let pos = Position::from_parts(
            Color::Orange,
            parts([
                (NW, SE),
                (Out, Out),
                (Center, Out),
                (Out, Out),
                (Out, Out),
                (Center, Out),
            ]),
        )
        .unwrap();
        assert!(!pos.is_winner(Role::Active));
        assert!(matches!(
            pos.move_back(Piece::InactiveLarge, Center, Out),
            MoveOutcome::Lost
        ));
    }

    #[test]
    fn test_move_back_preconditions() {
        let pos = Position::from_parts(
            Color::Orange,
            parts([
                (NW, Out),
                (SE, Out),
                (Out, Out),
                (Out, Out),
                (Out, Out),
                (Out, Out),
            ]),
        )
        .unwrap();
        // Active pieces do not move backwards.
        assert!(matches!(
            pos.move_back(Piece::ActiveSmall, NW, Out),
            MoveOutcome::Invalid
        ));
        // A reserve piece cannot be picked up.
        assert!(matches!(
            pos.move_back(Piece::InactiveMedium, Out, N),
            MoveOutcome::Invalid
        ));
        // Destination occupied by an equal piece.
        assert!(matches!(
            pos.move_back(Piece::InactiveSmall, SE, NW),
            MoveOutcome::Invalid
        ));
    }

    #[test]
    fn test_transform_invert_round_trip() {
        let pos = Position::from_parts(
            Color::Blue,
            parts([
                (NW, Out),
                (SE, Center),
                (N, Out),
                (Out, Out),
                (E, Out),
                (SW, Out),
            ]),
        )
        .unwrap();
        for trans in Transform::ALL {
            let round = pos.transform(trans).transform(trans.invert());
            assert_eq!(round.id(), pos.id(), "transform {:?}", trans);
        }
    }

    #[test]
    fn test_transform_moves_pieces() {
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
        let rotated = pos.transform(Transform::Rotate90);
        assert_eq!(
            rotated.locations_of(Piece::ActiveSmall),
            LocationPair::new(NE, Out)
        );
    }

    #[test]
    fn test_minimize_id_idempotent() {
        // Canonicalizing a canonical representative is the identity.
        let samples = [
            0u64,
            1,
            17,
            QUAD_COMBINATIONS + 3,
            QUAD_COMBINATIONS * QUAD_COMBINATIONS + 11,
            12_345_678,
        ];
        for &id in &samples {
            let canonical = Position::from_id(id).unwrap().minimize_id();
            let again = Position::from_id(canonical).unwrap().minimize_id();
            assert_eq!(again, canonical, "id {}", id);
        }
    }

    #[test]
    fn test_minimize_id_strips_color() {
        let orange = Position::from_id(42).unwrap();
        let blue = Position::from_id(42 + PIECE_SET_COMBINATIONS).unwrap();
        assert_eq!(orange.minimize_id(), blue.minimize_id());
        assert!(orange.minimize_id() < PIECE_SET_COMBINATIONS);
    }

    #[test]
    fn test_minimize_id_joins_orbit() {
        // A single active small in each corner: all four corners share one
        // canonical representative.
        let mut canonical = None;
        for corner in [NW, NE, SW, SE] {
            let pos = Position::from_parts(
                Color::Orange,
                parts([
                    (corner, Out),
                    (Out, Out),
                    (Out, Out),
                    (Out, Out),
                    (Out, Out),
                    (Out, Out),
                ]),
            )
            .unwrap();
            let min = pos.minimize_id();
            match canonical {
                None => canonical = Some(min),
                Some(expect) => assert_eq!(min, expect, "corner {:?}", corner),
            }
        }
    }

    #[test]
    fn test_sampled_ids_survive_symmetry_closure() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(0x60bb);
        for _ in 0..200 {
            let id = rng.gen_range(0..POSITION_ID_NUMS);
            let pos = Position::from_id(id).unwrap();
            assert_eq!(pos.transform(Transform::Identity).id(), id);
            for trans in Transform::ALL {
                let round = pos.transform(trans).transform(trans.invert());
                assert_eq!(round.id(), id);
            }
            assert!(pos.minimize_id() < PIECE_SET_COMBINATIONS);
        }
    }

    #[test]
    fn test_sampled_moves_reverse() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(0xb0a2d);
        let mut checked = 0;
        while checked < 50 {
            let id = rng.gen_range(0..POSITION_ID_NUMS);
            let pos = Position::from_id(id).unwrap();
            // A finished game has no meaningful forward moves.
            if pos.is_winner(Role::Active) || pos.is_winner(Role::Inactive) {
                continue;
            }

            for piece in Piece::ACTIVE {
                let pair = pos.locations_of(piece);
                let sources = if pair.is_doubled() {
                    vec![pair.first()]
                } else {
                    vec![pair.first(), pair.second()]
                };
                for src in sources {
                    for dst in Location::ON_BOARD {
                        if let MoveOutcome::Success(next) = pos.move_piece(piece, src, dst) {
                            // The same physical piece, now inactive, moves
                            // back from dst to src.
                            let back = next.move_back(piece.invert_role(), dst, src);
                            let prev = back.position().expect("forward moves reverse");
                            assert_eq!(prev.id(), pos.id());
                            checked += 1;
                        }
                    }
                }
            }
        }
    }
}
