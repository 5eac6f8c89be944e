//! Splitting a chunk of the search space into per-worker blocks

use crate::error::{Result, SearchError};
use crate::search::parallel::ParallelConfig;
use crate::search::space::SearchSpace;

/// Half-open index range `[start, finish)` assigned to one worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkBlock {
    pub start: u64,
    pub finish: u64,
}

impl WorkBlock {
    /// Number of indices in the block (zero when start is past finish)
    pub fn len(&self) -> u64 {
        self.finish.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The slice of the space covered by one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkRange {
    pub start: u64,
    pub size: u64,
}

impl ChunkRange {
    pub fn end(&self) -> u64 {
        self.start + self.size
    }
}

/// Locate chunk `chunk` of `chunks` in a space of `space_size` indices.
///
/// The final chunk absorbs the remainder of the integer division.
pub fn chunk_range(space_size: u64, chunk: u64, chunks: u64) -> Result<ChunkRange> {
    if chunks == 0 || chunk >= chunks {
        return Err(SearchError::InvalidChunk { chunk, chunks });
    }
    let base = space_size / chunks;
    let start = base * chunk;
    let size = if chunk == chunks - 1 {
        space_size - start
    } else {
        base
    };
    Ok(ChunkRange { start, size })
}

/// Assign one block per worker within the configured chunk.
///
/// `resume_offset` is added to every worker's start rather than skipped once
/// globally, so a resumed worker only avoids its own prefix. Blocks are
/// therefore disjoint but, after a resume, do not cover the chunk exactly.
pub fn partition(space: &SearchSpace, config: &ParallelConfig) -> Result<Vec<WorkBlock>> {
    let workers = config.num_workers as u64;
    if workers == 0 {
        return Err(SearchError::NoWorkers);
    }
    let chunk = chunk_range(space.size(), config.chunk, config.chunks)?;
    let block_size = chunk.size / workers;

    let mut blocks = Vec::with_capacity(config.num_workers);
    for w in 0..workers {
        let first = w * block_size + chunk.start;
        let start = first
            .checked_add(config.resume_offset)
            .ok_or(SearchError::ResumeOverflow(config.resume_offset))?;
        let finish = if w == workers - 1 {
            chunk.end()
        } else {
            first + block_size
        };

        if let Some(len) = space.dictionary_len() {
            if finish > len {
                return Err(SearchError::DictionaryBounds { start, finish, len });
            }
        }
        blocks.push(WorkBlock { start, finish });
    }
    Ok(blocks)
}
