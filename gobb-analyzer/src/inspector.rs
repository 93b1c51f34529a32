//! Read-only queries over a loaded analysis table.

use std::io;

use gobb_core::{is_valid_position_id, Location, Piece, Position, PositionId, Role};

use crate::data::{AnalysisData, AnalysisStatus, Generation, Turn, ANALYSIS_TABLE_SIZE};
use crate::movegen::{forward_moves, retro_moves};
use crate::stats::AnalysisStatistics;
use crate::store::AnalysisStore;

/// The table cell behind a position, as stored (no status inversion).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PositionInspection {
    pub position_id: PositionId,
    pub turn: Turn,
    pub status: AnalysisStatus,
}

/// One legal move from an inspected position.
///
/// `status` is given from the mover's point of view: the stored status of
/// the successor cell describes the player to move *after* the move, so it
/// is inverted here.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveInspection {
    pub piece: Piece,
    pub source: Location,
    pub destination: Location,
    /// The successor's full (non-canonical) id.
    pub position_id: PositionId,
    /// Remaining turns of the successor cell.
    pub turn: Turn,
    pub status: AnalysisStatus,
    pub is_best_move: bool,
}

/// A loaded analysis table plus query methods.
pub struct Inspector {
    table: Vec<AnalysisData>,
    stats: AnalysisStatistics,
}

impl Inspector {
    /// Allocate an inspector with an empty table (~2.7 GiB).
    pub fn new() -> Inspector {
        Inspector {
            table: vec![AnalysisData::default(); ANALYSIS_TABLE_SIZE as usize],
            stats: AnalysisStatistics::new(),
        }
    }

    /// Load the snapshot of one generation.
    pub fn load(&mut self, store: &dyn AnalysisStore, generation: Generation) -> io::Result<()> {
        store.load(generation, &mut self.stats, &mut self.table)
    }

    /// Load the latest stored snapshot; returns its generation.
    pub fn load_latest(&mut self, store: &dyn AnalysisStore) -> io::Result<Generation> {
        store.load_latest(&mut self.stats, &mut self.table)
    }

    /// The statistics of the loaded snapshot.
    pub fn statistics(&self) -> &AnalysisStatistics {
        &self.stats
    }

    fn cell_of(&self, pos: &Position) -> AnalysisData {
        self.table[pos.minimize_id() as usize]
    }

    /// The canonical cell behind `id`. Returns `None` for an out-of-range
    /// id.
    pub fn inspect_position(&self, id: PositionId) -> Option<PositionInspection> {
        if !is_valid_position_id(id) {
            return None;
        }
        let pos = Position::from_id(id)?;
        let cell = self.cell_of(&pos);
        Some(PositionInspection {
            position_id: id,
            turn: cell.turn(),
            status: cell.status(),
        })
    }

    /// Every legal forward move from `id`, statuses inverted to the mover's
    /// view, best moves marked.
    ///
    /// Contradictory positions and finished games have no moves.
    pub fn inspect_moves(&self, id: PositionId) -> Vec<MoveInspection> {
        let Some(pos) = Position::from_id(id) else {
            return Vec::new();
        };
        if self.cell_of(&pos).status() == AnalysisStatus::Contradictory
            || pos.is_winner(Role::Active)
            || pos.is_winner(Role::Inactive)
        {
            return Vec::new();
        }

        let mut result: Vec<MoveInspection> = forward_moves(&pos)
            .into_iter()
            .filter_map(|record| self.to_inspection(record))
            .collect();
        mark_best_move(&mut result);
        result
    }

    /// Every legal retrograde move from `id`, statuses inverted, best moves
    /// marked.
    pub fn inspect_move_backs(&self, id: PositionId) -> Vec<MoveInspection> {
        let Some(pos) = Position::from_id(id) else {
            return Vec::new();
        };
        if self.cell_of(&pos).status() == AnalysisStatus::Contradictory {
            return Vec::new();
        }

        let mut result: Vec<MoveInspection> = retro_moves(&pos)
            .into_iter()
            .filter_map(|record| self.to_inspection(record))
            .collect();
        mark_best_move(&mut result);
        result
    }

    fn to_inspection(&self, record: crate::movegen::MoveRecord) -> Option<MoveInspection> {
        let cell = self.cell_of(&record.position);
        let status = cell.status().invert();
        // Redirects and impossible cells carry no useful verdict.
        if matches!(
            status,
            AnalysisStatus::Contradictory | AnalysisStatus::Transformed
        ) {
            return None;
        }
        Some(MoveInspection {
            piece: record.piece,
            source: record.source,
            destination: record.destination,
            position_id: record.position.id(),
            turn: cell.turn(),
            status,
            is_best_move: false,
        })
    }
}

impl Default for Inspector {
    fn default() -> Self {
        Self::new()
    }
}

/// Mark the move(s) to highlight, from best to worst:
///
/// 1. any win — the fastest (smallest turn), all ties;
/// 2. else any unfixed move — all of them;
/// 3. else the slowest loss (largest turn), all ties.
pub fn mark_best_move(moves: &mut [MoveInspection]) {
    use AnalysisStatus::{Lost, LostStalemate, Unfixed, Won, WonStalemate};

    let mut best_status: Option<AnalysisStatus> = None;
    let mut best_turn: Turn = 0;

    for entry in moves.iter() {
        match entry.status {
            Won | WonStalemate => match best_status {
                Some(Won) | Some(WonStalemate) => best_turn = best_turn.min(entry.turn),
                _ => {
                    best_status = Some(entry.status);
                    best_turn = entry.turn;
                }
            },
            Unfixed => match best_status {
                Some(Won) | Some(WonStalemate) => {}
                _ => best_status = Some(Unfixed),
            },
            Lost | LostStalemate => match best_status {
                Some(Lost) | Some(LostStalemate) => best_turn = best_turn.max(entry.turn),
                None => {
                    best_status = Some(entry.status);
                    best_turn = entry.turn;
                }
                _ => {}
            },
            _ => {}
        }
    }

    match best_status {
        Some(Won) | Some(WonStalemate) => {
            for entry in moves.iter_mut() {
                if matches!(entry.status, Won | WonStalemate) && entry.turn == best_turn {
                    entry.is_best_move = true;
                }
            }
        }
        Some(Unfixed) => {
            for entry in moves.iter_mut() {
                if entry.status == Unfixed {
                    entry.is_best_move = true;
                }
            }
        }
        Some(Lost) | Some(LostStalemate) => {
            for entry in moves.iter_mut() {
                if matches!(entry.status, Lost | LostStalemate) && entry.turn == best_turn {
                    entry.is_best_move = true;
                }
            }
        }
        _ => {}
    }
}
