// Business rules - Partitioning, frame classification and the quality gate

use std::ops::Range;

use crate::domain::model::*;


/// Frames whose Laplacian variance is below this may be black screens
pub const BLACK_SCREEN_VARIANCE_THRESHOLD: f64 = 1.0;

/// Frames whose mean luminance is below this may be black screens
pub const BLACK_SCREEN_MEAN_THRESHOLD: f64 = 10.0;

/// Deterministic contiguous slicing of the channel list
pub struct ChunkPartitioner;

impl ChunkPartitioner {
    /// Index range owned by `chunk` out of `total_items`
    ///
    /// `chunk_size = ceil(total_items / total_chunks)`; the trailing chunk may
    /// be shorter or empty, never out of bounds.
    pub fn bounds(total_items: usize, chunk: ChunkSpec) -> Range<usize> {
        let total_chunks = chunk.total_chunks() as usize;
        let chunk_size = total_items.div_ceil(total_chunks);
        let start = ((chunk.chunk() as usize - 1) * chunk_size).min(total_items);
        let end = (start + chunk_size).min(total_items);
        start..end
    }

    /// The slice of `items` owned by `chunk`
    pub fn select<T>(items: &[T], chunk: ChunkSpec) -> &[T] {
        &items[Self::bounds(items.len(), chunk)]
    }
}

/// Black-screen classification over luminance statistics
pub struct FrameClassifier;

impl FrameClassifier {
    /// Classify a measured frame
    pub fn classify(stats: &LumaStats) -> QualityVerdict {
        if stats.laplacian_variance < BLACK_SCREEN_VARIANCE_THRESHOLD
            && stats.mean < BLACK_SCREEN_MEAN_THRESHOLD
        {
            QualityVerdict::BlackScreen
        } else {
            QualityVerdict::Measured(stats.laplacian_variance)
        }
    }
}

/// Pass/fail decision for a finished chunk
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GateOutcome {
    /// Success rate met the threshold
    Passed { success_rate: f64 },
    /// Success rate fell below the threshold
    Failed { success_rate: f64 },
    /// The chunk selected no channels
    EmptyChunk,
}

impl GateOutcome {
    pub fn is_pass(&self) -> bool {
        !matches!(self, GateOutcome::Failed { .. })
    }
}

/// Success-rate threshold applied to a report
pub struct QualityGate {
    threshold: f64,
}

impl QualityGate {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn evaluate(&self, report: &Report) -> GateOutcome {
        match report.success_rate() {
            None => GateOutcome::EmptyChunk,
            Some(rate) if rate >= self.threshold => GateOutcome::Passed { success_rate: rate },
            Some(rate) => GateOutcome::Failed { success_rate: rate },
        }
    }
}

impl Default for QualityGate {
    fn default() -> Self {
        Self::new(50.0)
    }
}
