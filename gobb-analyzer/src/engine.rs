//! The retrograde fixed-point engine.
//!
//! Generation 0 seeds the table: non-canonical orbit members are stamped
//! `Transformed`, impossible positions `Contradictory`, finished games
//! `Lost`, and stalemates `LostStalemate`. Every later generation scans the
//! table in ascending canonical id and expands flagged cells backwards
//! through `move_back`, labelling predecessors until a full scan changes
//! nothing.

use std::io;
use std::ops::ControlFlow;
use std::time::Instant;

use gobb_core::{Position, PositionId, Role, Transform, PIECE_SET_COMBINATIONS};

use crate::data::{
    next_turn, AnalysisData, AnalysisStatus, Generation, Turn, ANALYSIS_TABLE_SIZE,
    INVALID_GENERATION, MAX_GENERATION, MAX_TURN,
};
use crate::movegen::{for_each_retro, try_for_each_forward, forward_move_count, on_board_piece_count};
use crate::stats::AnalysisStatistics;
use crate::store::AnalysisStore;

/// When snapshots are written during a run.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum IoMode {
    /// Never store.
    StoreNoGeneration,
    /// Store only the terminating generation.
    StoreFinalGeneration,
    /// Store after every generation.
    StoreEveryGenerations,
}

/// The retrograde analyzer: owns the full table and drives it to the fixed
/// point.
pub struct Analyzer {
    table: Vec<AnalysisData>,
    stats: AnalysisStatistics,
    generation: Generation,
    stored_generation: Generation,
}

impl Analyzer {
    /// Allocate an analyzer with a fresh (all-unfixed) table. The table is
    /// one byte per canonical position, about 2.7 GiB.
    pub fn new() -> Analyzer {
        Analyzer {
            table: vec![AnalysisData::default(); ANALYSIS_TABLE_SIZE as usize],
            stats: AnalysisStatistics::new(),
            generation: INVALID_GENERATION,
            stored_generation: INVALID_GENERATION,
        }
    }

    /// The generation the engine is at (or stopped at).
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// The cumulative statistics.
    pub fn statistics(&self) -> &AnalysisStatistics {
        &self.stats
    }

    /// Run the analysis from scratch.
    pub fn start(&mut self, store: &dyn AnalysisStore, mode: IoMode) -> io::Result<()> {
        self.generation = 0;
        log::info!("start the generation 0 (initialization).");
        let started = Instant::now();
        let seeded = self.initialize();
        log::info!(
            "the initialization took {:.1}s.",
            started.elapsed().as_secs_f64()
        );
        if !seeded {
            log::warn!("no terminal positions were seeded.");
        }
        self.stats.log(0, None);

        if mode == IoMode::StoreEveryGenerations {
            if let Err(err) = store.store(0, &self.stats, &self.table) {
                log::error!("failed to store the initial analysis data: {}", err);
                return Err(err);
            }
            self.stored_generation = 0;
            log::info!("stored analysis data of the generation 0 (initialization).");
        }

        self.generation = 1;
        self.analyze(store, mode)
    }

    /// Resume from the latest stored generation, or start from scratch when
    /// nothing is stored.
    pub fn resume_latest(&mut self, store: &dyn AnalysisStore, mode: IoMode) -> io::Result<()> {
        let generation = store.find_latest();
        if generation == INVALID_GENERATION {
            log::warn!("no analysis data found.");
            return self.start(store, mode);
        }
        log::info!("found the analysis data of the generation {}.", generation);
        self.resume(store, mode, generation)
    }

    /// Resume from a specific stored generation.
    pub fn resume(
        &mut self,
        store: &dyn AnalysisStore,
        mode: IoMode,
        generation: Generation,
    ) -> io::Result<()> {
        if let Err(err) = store.load(generation, &mut self.stats, &mut self.table) {
            log::error!(
                "failed to load the analysis data of the generation {}: {}",
                generation,
                err
            );
            return Err(err);
        }
        self.generation = generation + 1;
        self.stored_generation = generation;
        log::info!("resume analysis from the generation {}.", self.generation);
        self.analyze(store, mode)
    }

    /// The generation loop: run until a scan changes nothing, storing
    /// snapshots according to `mode`.
    fn analyze(&mut self, store: &dyn AnalysisStore, mode: IoMode) -> io::Result<()> {
        while self.generation <= MAX_GENERATION {
            log::info!("analyze the generation {}.", self.generation);
            let started = Instant::now();

            let mut generation_stats = AnalysisStatistics::new();
            let updated = self.analyze_generation(&mut generation_stats);
            self.stats.add(&generation_stats);
            log::info!(
                "the generation {} took {:.1}s.",
                self.generation,
                started.elapsed().as_secs_f64()
            );
            self.stats.log(self.generation, Some(&generation_stats));

            if needs_storing(mode, updated, self.stored_generation, self.generation) {
                if let Err(err) = store.store(self.generation, &self.stats, &self.table) {
                    log::error!(
                        "failed to store analysis data of the generation {}: {}",
                        self.generation,
                        err
                    );
                    return Err(err);
                }
                self.stored_generation = self.generation;
                log::info!("stored analysis data of the generation {}.", self.generation);
            }

            if !updated {
                log::info!("no update occurred. the analysis is complete.");
                return Ok(());
            }
            self.generation += 1;
        }

        log::warn!("the generation exceeds its limit. give up the analysis.");
        Ok(())
    }

    /// Generation 0: classify every canonical position that is decidable
    /// without looking at the move graph.
    ///
    /// Returns true when at least one Lost/LostStalemate seed was created.
    fn initialize(&mut self) -> bool {
        let mut updated = false;

        let seed = AnalysisData::new(false, MAX_TURN, AnalysisStatus::Unfixed);
        self.table.fill(seed);

        for id in 0..ANALYSIS_TABLE_SIZE {
            // Stamped by a smaller orbit member earlier in the scan.
            if self.table[id as usize].status() == AnalysisStatus::Transformed {
                self.stats.transformed_nums += 1;
                continue;
            }

            let pos = decode(id);

            // Stamp the rest of the orbit: every symmetric position with a
            // larger id redirects here.
            for trans in Transform::EFFECTIVE {
                let trans_id = pos.transform(trans).id();
                if trans_id > id && trans_id < ANALYSIS_TABLE_SIZE {
                    self.table[trans_id as usize] =
                        AnalysisData::new(false, 0, AnalysisStatus::Transformed);
                }
            }

            let cell = seed_classification(&pos);
            match cell.status() {
                AnalysisStatus::Contradictory => {
                    self.table[id as usize] = cell;
                    self.stats.contradictory_nums += 1;
                }
                AnalysisStatus::Lost => {
                    self.table[id as usize] = cell;
                    self.stats.lost_nums += 1;
                    updated = true;
                }
                AnalysisStatus::LostStalemate => {
                    self.table[id as usize] = cell;
                    self.stats.lost_stalemate_nums += 1;
                    updated = true;
                }
                _ => self.stats.unfixed_nums += 1,
            }
        }

        debug_assert_eq!(self.stats.total(), ANALYSIS_TABLE_SIZE);
        updated
    }

    /// One full pass over the table. Returns true when any cell changed
    /// (status, turn, or a raised flag).
    fn analyze_generation(&mut self, generation_stats: &mut AnalysisStatistics) -> bool {
        let mut updated = false;

        for id in 0..ANALYSIS_TABLE_SIZE {
            let cell = self.table[id as usize];
            if !cell.update_flag() {
                continue;
            }
            self.table[id as usize] = cell.with_update_flag(false);

            match cell.status() {
                AnalysisStatus::Lost | AnalysisStatus::LostStalemate => {
                    let pos = decode(id);
                    if self.propagate_lost(generation_stats, &pos) {
                        updated = true;
                    }
                }
                AnalysisStatus::Won => {
                    let pos = decode(id);
                    if self.flag_predecessors_of_won(&pos) {
                        updated = true;
                    }
                }
                AnalysisStatus::Unfixed => {
                    let pos = decode(id);
                    if let Some(turn) = self.forced_loss_turn(&pos) {
                        self.table[id as usize] =
                            AnalysisData::new(false, turn, AnalysisStatus::Lost);
                        generation_stats.lost_nums += 1;
                        self.propagate_lost(generation_stats, &pos);
                        updated = true;
                    }
                }
                AnalysisStatus::WonStalemate
                | AnalysisStatus::Transformed
                | AnalysisStatus::Contradictory => {
                    debug_assert!(false, "flagged {:?} cell at {}", cell.status(), id);
                }
            }
        }

        updated
    }

    /// The position at `id` loses in `turn` turns; every retrograde
    /// predecessor therefore wins in `turn + 1`. Newly won predecessors are
    /// flagged for the next generation; known wins get their turn tightened.
    fn propagate_lost(
        &mut self,
        generation_stats: &mut AnalysisStatistics,
        pos: &Position,
    ) -> bool {
        let turn = self.table[pos.id() as usize].turn();
        let won_turn = next_turn(turn);
        let mut updated = false;

        for_each_retro(pos, |record| {
            let index = record.position.minimize_id() as usize;
            let cell = self.table[index];
            match cell.status() {
                AnalysisStatus::Unfixed => {
                    self.table[index] = AnalysisData::new(true, won_turn, AnalysisStatus::Won);
                    generation_stats.won_nums += 1;
                    updated = true;
                }
                AnalysisStatus::Won if cell.turn() > won_turn => {
                    self.table[index] = cell.with_turn(won_turn);
                    updated = true;
                }
                _ => {}
            }
        });

        updated
    }

    /// The position at `id` wins; its unfixed predecessors might now be
    /// forced losses, so flag them for re-evaluation.
    fn flag_predecessors_of_won(&mut self, pos: &Position) -> bool {
        let mut updated = false;

        for_each_retro(pos, |record| {
            let index = record.position.minimize_id() as usize;
            let cell = self.table[index];
            if cell.status() == AnalysisStatus::Unfixed {
                self.table[index] = cell.with_update_flag(true);
                updated = true;
            }
        });

        updated
    }

    /// If every forward move of `pos` lands on a won cell the mover is
    /// forced to lose; the loss takes one turn more than the slowest
    /// opposing win. Returns `None` while any successor is still open.
    fn forced_loss_turn(&self, pos: &Position) -> Option<Turn> {
        let mut worst_turn: Turn = 0;
        let all_won = try_for_each_forward(pos, |record| {
            let cell = self.table[record.position.minimize_id() as usize];
            if cell.status() != AnalysisStatus::Won {
                return ControlFlow::Break(());
            }
            worst_turn = worst_turn.max(next_turn(cell.turn()));
            ControlFlow::Continue(())
        });
        match all_won {
            ControlFlow::Continue(()) => Some(worst_turn),
            ControlFlow::Break(()) => None,
        }
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Decide whether this generation must be snapshotted.
///
/// Updating generations store only in the store-everything mode. The
/// terminating generation stores in every storing mode, unless the previous
/// generation was already persisted (then the table content is identical).
fn needs_storing(
    mode: IoMode,
    updated: bool,
    stored_generation: Generation,
    generation: Generation,
) -> bool {
    if updated {
        mode == IoMode::StoreEveryGenerations
    } else if stored_generation == INVALID_GENERATION || stored_generation + 1 < generation {
        mode != IoMode::StoreNoGeneration
    } else {
        false
    }
}

/// Decode a canonical table index back into a position.
fn decode(id: PositionId) -> Position {
    debug_assert!(id < PIECE_SET_COMBINATIONS);
    Position::from_id(id).expect("table indices are valid position ids")
}

/// Classify one position for generation 0, symmetry redirects aside.
///
/// In order: positions unreachable by legal play are `Contradictory`
/// (the player to move already has a line, or the piece counts betray a
/// move made out of turn); a line of the previous player means the game is
/// over and the position is `Lost` with zero turns left; no legal move at
/// all is `LostStalemate` with one turn left. Everything else starts
/// `Unfixed`.
fn seed_classification(pos: &Position) -> AnalysisData {
    if pos.is_winner(Role::Active) {
        return AnalysisData::new(false, 0, AnalysisStatus::Contradictory);
    }

    let active_pieces = on_board_piece_count(pos, Role::Active);
    let inactive_pieces = on_board_piece_count(pos, Role::Inactive);
    if active_pieces == 0 && inactive_pieces >= 2 {
        return AnalysisData::new(false, 0, AnalysisStatus::Contradictory);
    }
    if inactive_pieces == 0 && active_pieces >= 1 {
        return AnalysisData::new(false, 0, AnalysisStatus::Contradictory);
    }

    if pos.is_winner(Role::Inactive) {
        return AnalysisData::new(true, 0, AnalysisStatus::Lost);
    }

    if forward_move_count(pos) == 0 {
        return AnalysisData::new(true, 1, AnalysisStatus::LostStalemate);
    }

    AnalysisData::new(false, MAX_TURN, AnalysisStatus::Unfixed)
}
