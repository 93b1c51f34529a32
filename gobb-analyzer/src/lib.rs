//! Retrograde analysis of Gobblet Gobblers.
//!
//! The engine classifies every canonical position as won, lost or unfixed
//! by labelling terminal positions and walking the move graph backwards to
//! a fixed point (classical retrograde analysis). Results live in a flat
//! one-byte-per-position table indexed by canonical id and are snapshotted
//! per generation, so an interrupted run resumes from the last stored
//! generation.
//!
//! - [`data`] — byte-packed analysis cells and scalar types.
//! - [`stats`] — per-status position counts.
//! - [`movegen`] — forward/retrograde move enumeration.
//! - [`engine`] — the fixed-point [`engine::Analyzer`].
//! - [`store`] — generation-numbered snapshots with atomic rename.
//! - [`inspector`] — read-only queries and best-move marking.
//! - [`text`], [`repl`] — the interactive inspection front end.

pub mod data;
pub mod engine;
pub mod inspector;
pub mod movegen;
pub mod repl;
pub mod stats;
pub mod store;
pub mod text;

pub use data::{
    AnalysisData, AnalysisStatus, Generation, Turn, ANALYSIS_TABLE_SIZE, INVALID_GENERATION,
    MAX_GENERATION, MAX_TURN,
};
pub use engine::{Analyzer, IoMode};
pub use inspector::{Inspector, MoveInspection, PositionInspection};
pub use stats::AnalysisStatistics;
pub use store::{AnalysisFileStore, AnalysisStore};
