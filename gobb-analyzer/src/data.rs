//! Per-position analysis cells and related scalar types.
//!
//! # Cell encoding (8-bit)
//!
//! ```text
//! Bits 0-2: status (AnalysisStatus discriminant)
//! Bits 3-6: remaining turns, saturating at MAX_TURN
//! Bit 7:    update flag for the propagation loop
//! ```
//!
//! One byte per canonical position; the full table is 1423^3 cells
//! (~2.7 GiB).

use gobb_core::PIECE_SET_COMBINATIONS;

/// Remaining turns to a terminal position under optimal play.
pub type Turn = u8;

/// The saturating maximum of [`Turn`]; the largest value the cell encoding
/// can hold.
pub const MAX_TURN: Turn = 15;

/// A generation number of the analysis (generation 0 is initialization).
pub type Generation = u64;

/// Sentinel meaning "no generation".
pub const INVALID_GENERATION: Generation = u64::MAX;

/// The largest generation the engine will run and the store will accept.
pub const MAX_GENERATION: Generation = 1000;

/// The number of cells in the analysis table: one per canonical position.
pub const ANALYSIS_TABLE_SIZE: u64 = PIECE_SET_COMBINATIONS;

/// Classification of a canonical position, from the active player's view.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum AnalysisStatus {
    /// Not yet classified within the propagation frontier.
    Unfixed = 0,
    /// The active player loses in `turn` turns.
    Lost = 1,
    /// The active player has no legal move and loses by being forced to
    /// uncover an opposing line.
    LostStalemate = 2,
    /// The active player wins in `turn` turns.
    Won = 3,
    /// Reserved counterpart of `LostStalemate`; never assigned by the
    /// engine but kept for status inversion.
    WonStalemate = 4,
    /// Non-canonical orbit member, permanently redirected to its
    /// representative.
    Transformed = 5,
    /// Unreachable by legal play (e.g. the player to move already won).
    Contradictory = 6,
}

impl AnalysisStatus {
    /// Convert from a raw discriminant.
    #[inline]
    pub fn from_u8(value: u8) -> Option<AnalysisStatus> {
        match value {
            0 => Some(AnalysisStatus::Unfixed),
            1 => Some(AnalysisStatus::Lost),
            2 => Some(AnalysisStatus::LostStalemate),
            3 => Some(AnalysisStatus::Won),
            4 => Some(AnalysisStatus::WonStalemate),
            5 => Some(AnalysisStatus::Transformed),
            6 => Some(AnalysisStatus::Contradictory),
            _ => None,
        }
    }

    /// Swap the point of view between the two players.
    ///
    /// A successor cell stores the status of the player to move *after* a
    /// move; the mover sees the opposite outcome. `Unfixed`, `Transformed`
    /// and `Contradictory` are side-neutral.
    #[inline]
    pub fn invert(self) -> AnalysisStatus {
        match self {
            AnalysisStatus::Lost => AnalysisStatus::Won,
            AnalysisStatus::Won => AnalysisStatus::Lost,
            AnalysisStatus::LostStalemate => AnalysisStatus::WonStalemate,
            AnalysisStatus::WonStalemate => AnalysisStatus::LostStalemate,
            other => other,
        }
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            AnalysisStatus::Unfixed => "Unfixed",
            AnalysisStatus::Lost => "Lost",
            AnalysisStatus::LostStalemate => "LostStalemate",
            AnalysisStatus::Won => "Won",
            AnalysisStatus::WonStalemate => "WonStalemate",
            AnalysisStatus::Transformed => "Transformed",
            AnalysisStatus::Contradictory => "Contradictory",
        }
    }
}

const STATUS_MASK: u8 = 0b0000_0111;
const TURN_SHIFT: u8 = 3;
const TURN_MASK: u8 = 0b0111_1000;
const FLAG_BIT: u8 = 0b1000_0000;

/// One byte-packed analysis cell.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
#[repr(transparent)]
pub struct AnalysisData(pub u8);

impl AnalysisData {
    /// Pack a cell. `turn` saturates at [`MAX_TURN`].
    #[inline]
    pub fn new(update_flag: bool, turn: Turn, status: AnalysisStatus) -> AnalysisData {
        let turn = turn.min(MAX_TURN);
        let flag = if update_flag { FLAG_BIT } else { 0 };
        AnalysisData(flag | (turn << TURN_SHIFT) | status as u8)
    }

    /// The status field.
    #[inline]
    pub fn status(self) -> AnalysisStatus {
        AnalysisStatus::from_u8(self.0 & STATUS_MASK)
            .expect("cells only ever hold encoded statuses")
    }

    /// The remaining-turns field.
    #[inline]
    pub fn turn(self) -> Turn {
        (self.0 & TURN_MASK) >> TURN_SHIFT
    }

    /// The propagation flag.
    #[inline]
    pub fn update_flag(self) -> bool {
        self.0 & FLAG_BIT != 0
    }

    /// The same cell with a different turn (saturating).
    #[inline]
    pub fn with_turn(self, turn: Turn) -> AnalysisData {
        AnalysisData((self.0 & !TURN_MASK) | (turn.min(MAX_TURN) << TURN_SHIFT))
    }

    /// The same cell with the flag set or cleared.
    #[inline]
    pub fn with_update_flag(self, flag: bool) -> AnalysisData {
        if flag {
            AnalysisData(self.0 | FLAG_BIT)
        } else {
            AnalysisData(self.0 & !FLAG_BIT)
        }
    }
}

impl std::fmt::Debug for AnalysisData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisData")
            .field("status", &self.status())
            .field("turn", &self.turn())
            .field("update_flag", &self.update_flag())
            .finish()
    }
}

/// `turn + 1`, saturating at [`MAX_TURN`].
#[inline]
pub fn next_turn(turn: Turn) -> Turn {
    turn.saturating_add(1).min(MAX_TURN)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STATUSES: [AnalysisStatus; 7] = [
        AnalysisStatus::Unfixed,
        AnalysisStatus::Lost,
        AnalysisStatus::LostStalemate,
        AnalysisStatus::Won,
        AnalysisStatus::WonStalemate,
        AnalysisStatus::Transformed,
        AnalysisStatus::Contradictory,
    ];

    #[test]
    fn test_pack_round_trip() {
        for status in ALL_STATUSES {
            for turn in 0..=MAX_TURN {
                for flag in [false, true] {
                    let data = AnalysisData::new(flag, turn, status);
                    assert_eq!(data.status(), status);
                    assert_eq!(data.turn(), turn);
                    assert_eq!(data.update_flag(), flag);
                }
            }
        }
    }

    #[test]
    fn test_turn_saturates() {
        let data = AnalysisData::new(false, 200, AnalysisStatus::Won);
        assert_eq!(data.turn(), MAX_TURN);
        assert_eq!(data.with_turn(99).turn(), MAX_TURN);

        assert_eq!(next_turn(0), 1);
        assert_eq!(next_turn(MAX_TURN - 1), MAX_TURN);
        assert_eq!(next_turn(MAX_TURN), MAX_TURN);
        assert_eq!(next_turn(Turn::MAX), MAX_TURN);
    }

    #[test]
    fn test_field_updates_keep_others() {
        let data = AnalysisData::new(true, 7, AnalysisStatus::Lost);

        let tightened = data.with_turn(3);
        assert_eq!(tightened.status(), AnalysisStatus::Lost);
        assert_eq!(tightened.turn(), 3);
        assert!(tightened.update_flag());

        let cleared = data.with_update_flag(false);
        assert_eq!(cleared.status(), AnalysisStatus::Lost);
        assert_eq!(cleared.turn(), 7);
        assert!(!cleared.update_flag());
    }

    #[test]
    fn test_default_cell_is_unfixed() {
        let data = AnalysisData::default();
        assert_eq!(data.status(), AnalysisStatus::Unfixed);
        assert_eq!(data.turn(), 0);
        assert!(!data.update_flag());
    }

    #[test]
    fn test_status_inversion() {
        assert_eq!(AnalysisStatus::Lost.invert(), AnalysisStatus::Won);
        assert_eq!(AnalysisStatus::Won.invert(), AnalysisStatus::Lost);
        assert_eq!(
            AnalysisStatus::LostStalemate.invert(),
            AnalysisStatus::WonStalemate
        );
        assert_eq!(
            AnalysisStatus::WonStalemate.invert(),
            AnalysisStatus::LostStalemate
        );
        assert_eq!(AnalysisStatus::Unfixed.invert(), AnalysisStatus::Unfixed);
        assert_eq!(
            AnalysisStatus::Transformed.invert(),
            AnalysisStatus::Transformed
        );
        assert_eq!(
            AnalysisStatus::Contradictory.invert(),
            AnalysisStatus::Contradictory
        );
        for status in ALL_STATUSES {
            assert_eq!(status.invert().invert(), status);
        }
    }
}
