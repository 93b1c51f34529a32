//! Running statistics over the analysis table.

use crate::data::Generation;

/// Position counts per status. The six counters always sum to the table
/// size: every classification moves a position out of the unfixed pool.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct AnalysisStatistics {
    pub lost_nums: u64,
    pub lost_stalemate_nums: u64,
    pub won_nums: u64,
    pub transformed_nums: u64,
    pub contradictory_nums: u64,
    pub unfixed_nums: u64,
}

impl AnalysisStatistics {
    /// The serialized size: six little-endian u64 words.
    pub const SERIALIZED_SIZE: usize = 48;

    pub fn new() -> AnalysisStatistics {
        AnalysisStatistics::default()
    }

    /// Reset every counter.
    pub fn clear(&mut self) {
        *self = AnalysisStatistics::default();
    }

    /// Fold a generation's newly fixed counts into the totals.
    ///
    /// Every count in `delta` is a transition out of `Unfixed`, so the
    /// unfixed pool shrinks by the sum of the other five.
    pub fn add(&mut self, delta: &AnalysisStatistics) {
        self.unfixed_nums -= delta.lost_nums
            + delta.lost_stalemate_nums
            + delta.won_nums
            + delta.transformed_nums
            + delta.contradictory_nums;
        self.lost_nums += delta.lost_nums;
        self.lost_stalemate_nums += delta.lost_stalemate_nums;
        self.won_nums += delta.won_nums;
        self.transformed_nums += delta.transformed_nums;
        self.contradictory_nums += delta.contradictory_nums;
    }

    /// Sum of all six counters.
    pub fn total(&self) -> u64 {
        self.lost_nums
            + self.lost_stalemate_nums
            + self.won_nums
            + self.transformed_nums
            + self.contradictory_nums
            + self.unfixed_nums
    }

    /// Serialize in field order as little-endian words.
    pub fn to_bytes(&self) -> [u8; Self::SERIALIZED_SIZE] {
        let mut bytes = [0u8; Self::SERIALIZED_SIZE];
        let words = [
            self.lost_nums,
            self.lost_stalemate_nums,
            self.won_nums,
            self.transformed_nums,
            self.contradictory_nums,
            self.unfixed_nums,
        ];
        for (chunk, word) in bytes.chunks_exact_mut(8).zip(words) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        bytes
    }

    /// Deserialize the counterpart of [`to_bytes`](Self::to_bytes).
    pub fn from_bytes(bytes: &[u8; Self::SERIALIZED_SIZE]) -> AnalysisStatistics {
        let mut words = [0u64; 6];
        for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(8)) {
            *word = u64::from_le_bytes(chunk.try_into().expect("chunks_exact yields 8 bytes"));
        }
        AnalysisStatistics {
            lost_nums: words[0],
            lost_stalemate_nums: words[1],
            won_nums: words[2],
            transformed_nums: words[3],
            contradictory_nums: words[4],
            unfixed_nums: words[5],
        }
    }

    /// Log the per-generation result in the analyzer's layout.
    pub fn log(&self, generation: Generation, delta: Option<&AnalysisStatistics>) {
        if generation == 0 {
            log::info!("analysis result of the initialization:");
        } else {
            log::info!("analysis result of the generation {}:", generation);
            if let Some(delta) = delta {
                log::info!("  fixed positions during this generation:");
                log::info!("    lost          = {}", delta.lost_nums);
                log::info!("    won           = {}", delta.won_nums);
            }
        }
        log::info!("  total:");
        log::info!("    lost          = {}", self.lost_nums);
        log::info!("    lostStalemate = {}", self.lost_stalemate_nums);
        log::info!("    won           = {}", self.won_nums);
        log::info!("    transformed   = {}", self.transformed_nums);
        log::info!("    contradictory = {}", self.contradictory_nums);
        log::info!("    unfixed       = {}", self.unfixed_nums);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_moves_counts_out_of_unfixed() {
        let mut total = AnalysisStatistics {
            unfixed_nums: 100,
            ..Default::default()
        };
        let delta = AnalysisStatistics {
            lost_nums: 3,
            won_nums: 7,
            ..Default::default()
        };
        total.add(&delta);
        assert_eq!(total.lost_nums, 3);
        assert_eq!(total.won_nums, 7);
        assert_eq!(total.unfixed_nums, 90);
        // The grand total is invariant under add().
        assert_eq!(total.total(), 100);
    }

    #[test]
    fn test_clear() {
        let mut stats = AnalysisStatistics {
            lost_nums: 1,
            won_nums: 2,
            unfixed_nums: 3,
            ..Default::default()
        };
        stats.clear();
        assert_eq!(stats, AnalysisStatistics::default());
    }

    #[test]
    fn test_bytes_round_trip() {
        let stats = AnalysisStatistics {
            lost_nums: 1,
            lost_stalemate_nums: 22,
            won_nums: 333,
            transformed_nums: 4_444,
            contradictory_nums: 55_555,
            unfixed_nums: 666_666_666_666,
        };
        let bytes = stats.to_bytes();
        assert_eq!(AnalysisStatistics::from_bytes(&bytes), stats);
    }
}
