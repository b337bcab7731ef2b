//! Splitting a layer's records into object-id range queries.
//!
//! Records are assumed to carry object ids `1..=count`. A layer of `count`
//! records is split into ranges `(start, end]` of at most `chunk_size`
//! ids, where `chunk_size = min(ceil(count / divisor), max_chunk_size)`.

/// Default number of chunks a layer is split into.
pub const DEFAULT_CHUNK_DIVISOR: u64 = 3;

/// Default upper bound on records per chunk request.
pub const DEFAULT_MAX_CHUNK_SIZE: u64 = 10_000;

/// Name of the object id field the range filter applies to.
pub const OBJECT_ID_FIELD: &str = "ObjectId";

/// Chunking parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkConfig {
    /// Target number of chunks; values below 1 are treated as 1.
    pub divisor: u64,
    /// Maximum records per chunk; values below 1 are treated as 1.
    pub max_chunk_size: u64,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            divisor: DEFAULT_CHUNK_DIVISOR,
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
        }
    }
}

impl ChunkConfig {
    /// Records per chunk for a layer of `count` records.
    pub fn chunk_size(&self, count: u64) -> u64 {
        let divisor = self.divisor.max(1);
        let cap = self.max_chunk_size.max(1);
        count.div_ceil(divisor).min(cap).max(1)
    }
}

/// Object ids in `(start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkRange {
    pub start: u64,
    pub end: u64,
}

impl ChunkRange {
    /// The query `where` clause selecting this range.
    pub fn where_clause(&self) -> String {
        format!(
            "{field}>{} and {field}<={}",
            self.start,
            self.end,
            field = OBJECT_ID_FIELD
        )
    }

    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// The ordered ranges covering `1..=count`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkPlan {
    pub count: u64,
    pub chunk_size: u64,
    pub ranges: Vec<ChunkRange>,
}

impl ChunkPlan {
    pub fn new(count: u64, config: &ChunkConfig) -> Self {
        if count == 0 {
            return Self {
                count,
                chunk_size: 0,
                ranges: Vec::new(),
            };
        }

        let chunk_size = config.chunk_size(count);
        let ranges = (0..count)
            .step_by(chunk_size as usize)
            .map(|start| ChunkRange {
                start,
                end: (start + chunk_size).min(count),
            })
            .collect();

        Self {
            count,
            chunk_size,
            ranges,
        }
    }

    /// Range start offsets, in request order.
    pub fn offsets(&self) -> Vec<u64> {
        self.ranges.iter().map(|r| r.start).collect()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn ranges_cover_every_id_exactly_once(
            count in 1u64..200_000,
            divisor in 1u64..10,
            max_chunk_size in 1u64..20_000,
        ) {
            let plan = ChunkPlan::new(count, &ChunkConfig { divisor, max_chunk_size });

            prop_assert_eq!(plan.ranges[0].start, 0);
            prop_assert_eq!(plan.ranges[plan.len() - 1].end, count);
            for pair in plan.ranges.windows(2) {
                prop_assert_eq!(pair[0].end, pair[1].start, "gap or overlap in {:?}", pair);
            }
            for range in &plan.ranges {
                prop_assert!(!range.is_empty());
                prop_assert!(range.len() <= plan.chunk_size);
            }
        }

        #[test]
        fn chunk_count_is_bounded(count in 1u64..200_000) {
            let plan = ChunkPlan::new(count, &ChunkConfig::default());
            let bound = std::cmp::max(3, count.div_ceil(DEFAULT_MAX_CHUNK_SIZE)) as usize;
            prop_assert!(plan.len() <= bound, "{} chunks for {} records", plan.len(), count);
        }

        #[test]
        fn chunk_size_never_exceeds_cap(count in 1u64..1_000_000, cap in 1u64..50_000) {
            let config = ChunkConfig { divisor: DEFAULT_CHUNK_DIVISOR, max_chunk_size: cap };
            prop_assert!(config.chunk_size(count) <= cap);
        }
    }
}
