//! Generation-numbered persistence of the analysis table.
//!
//! One file per stored generation, named `gobb_analyzer_<G>.dat`: the
//! 48-byte statistics record followed by the raw cell table. No framing and
//! no checksum; the files are snapshots for resumption, not an interchange
//! format. Writes go to a temporary sibling first and are renamed over the
//! final name, so a crash mid-write never corrupts an existing snapshot.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::data::{AnalysisData, Generation, INVALID_GENERATION, MAX_GENERATION};
use crate::stats::AnalysisStatistics;

/// I/O chunk size for the multi-gigabyte table (16 MiB).
const MAX_IO_SIZE: usize = 0x100_0000;

const FILE_PREFIX: &str = "gobb_analyzer_";
const FILE_SUFFIX: &str = ".dat";
const TMP_FILE: &str = "gobb_analyzer_tmp.dat";

/// Snapshot storage used by the engine and the inspector.
///
/// The trait seam exists so the engine's failure handling can be exercised
/// against an in-memory implementation.
pub trait AnalysisStore {
    /// Persist one generation.
    fn store(
        &self,
        generation: Generation,
        stats: &AnalysisStatistics,
        table: &[AnalysisData],
    ) -> io::Result<()>;

    /// Load one generation into the caller's buffers.
    fn load(
        &self,
        generation: Generation,
        stats: &mut AnalysisStatistics,
        table: &mut [AnalysisData],
    ) -> io::Result<()>;

    /// The largest stored generation, or `INVALID_GENERATION` when none.
    fn find_latest(&self) -> Generation;

    /// Load the largest stored generation; returns its number.
    fn load_latest(
        &self,
        stats: &mut AnalysisStatistics,
        table: &mut [AnalysisData],
    ) -> io::Result<Generation> {
        let generation = self.find_latest();
        if generation == INVALID_GENERATION {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                "no analysis data found",
            ));
        }
        self.load(generation, stats, table)?;
        Ok(generation)
    }

    /// Remove any leftover temporary file. Idempotent.
    fn clean(&self);
}

/// File-backed [`AnalysisStore`] rooted at one directory.
#[derive(Clone, Debug)]
pub struct AnalysisFileStore {
    dir: PathBuf,
}

impl AnalysisFileStore {
    /// A store reading and writing snapshots under `dir`. The directory is
    /// created on the first successful `store`.
    pub fn new(dir: impl Into<PathBuf>) -> AnalysisFileStore {
        AnalysisFileStore { dir: dir.into() }
    }

    /// The snapshot path for a generation.
    pub fn file_path(&self, generation: Generation) -> PathBuf {
        self.dir
            .join(format!("{}{}{}", FILE_PREFIX, generation, FILE_SUFFIX))
    }

    fn tmp_file_path(&self) -> PathBuf {
        self.dir.join(TMP_FILE)
    }

    /// Parse a generation number out of a snapshot file name.
    fn parse_generation(name: &str) -> Option<Generation> {
        let digits = name.strip_prefix(FILE_PREFIX)?.strip_suffix(FILE_SUFFIX)?;
        if digits.is_empty() {
            return None;
        }
        let generation: Generation = digits.parse().ok()?;
        if generation > MAX_GENERATION {
            return None;
        }
        Some(generation)
    }

    fn write_snapshot(
        &self,
        path: &Path,
        stats: &AnalysisStatistics,
        table: &[AnalysisData],
    ) -> io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        writer.write_all(&stats.to_bytes())?;
        for chunk in as_bytes(table).chunks(MAX_IO_SIZE) {
            writer.write_all(chunk)?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl AnalysisStore for AnalysisFileStore {
    fn store(
        &self,
        generation: Generation,
        stats: &AnalysisStatistics,
        table: &[AnalysisData],
    ) -> io::Result<()> {
        if generation > MAX_GENERATION {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "generation out of range",
            ));
        }
        if !self.dir.is_dir() {
            fs::create_dir_all(&self.dir)?;
        }

        let tmp_path = self.tmp_file_path();
        if let Err(err) = self.write_snapshot(&tmp_path, stats, table) {
            self.clean();
            return Err(err);
        }
        if let Err(err) = fs::rename(&tmp_path, self.file_path(generation)) {
            self.clean();
            return Err(err);
        }
        Ok(())
    }

    fn load(
        &self,
        generation: Generation,
        stats: &mut AnalysisStatistics,
        table: &mut [AnalysisData],
    ) -> io::Result<()> {
        if generation > MAX_GENERATION {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "generation out of range",
            ));
        }

        let mut reader = BufReader::new(File::open(self.file_path(generation))?);
        let mut stats_bytes = [0u8; AnalysisStatistics::SERIALIZED_SIZE];
        reader.read_exact(&mut stats_bytes)?;
        *stats = AnalysisStatistics::from_bytes(&stats_bytes);

        for chunk in as_bytes_mut(table).chunks_mut(MAX_IO_SIZE) {
            reader.read_exact(chunk)?;
        }
        Ok(())
    }

    fn find_latest(&self) -> Generation {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(_) => return INVALID_GENERATION,
        };

        let mut latest = INVALID_GENERATION;
        for entry in entries.flatten() {
            if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            let Some(generation) = Self::parse_generation(name) else {
                continue;
            };
            if latest == INVALID_GENERATION || generation > latest {
                latest = generation;
            }
        }
        latest
    }

    fn clean(&self) {
        let _ = fs::remove_file(self.tmp_file_path());
    }
}

#[inline]
fn as_bytes(table: &[AnalysisData]) -> &[u8] {
    // AnalysisData is a transparent u8 wrapper.
    unsafe { std::slice::from_raw_parts(table.as_ptr() as *const u8, table.len()) }
}

#[inline]
fn as_bytes_mut(table: &mut [AnalysisData]) -> &mut [u8] {
    unsafe { std::slice::from_raw_parts_mut(table.as_mut_ptr() as *mut u8, table.len()) }
}
