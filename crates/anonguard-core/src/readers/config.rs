/// Tuning knobs for CSV loading.
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    min_chunk_size: u64,
    max_chunk_size: u64,
    chunks_per_thread: u8,
    pub batch_size: u32,
    parallel_threshold: u64,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            min_chunk_size: 1024 * 1024,
            max_chunk_size: 100 * 1024 * 1024,
            chunks_per_thread: 5,
            batch_size: 128 * 1024,
            parallel_threshold: 64 * 1024 * 1024,
        }
    }
}

impl ReaderConfig {
    /// Files of at least this many bytes are split into chunks read in parallel.
    pub fn should_parallelize(&self, file_size: u64) -> bool {
        file_size >= self.parallel_threshold
    }
}

pub(crate) fn calculate_chunk_size(
    file_size: u64,
    header: u64,
    num_threads: usize,
    config: &ReaderConfig,
) -> u64 {
    let data_size = file_size.saturating_sub(header);
    let desired_chunks = num_threads * config.chunks_per_thread as usize;
    if desired_chunks == 0 {
        return config.max_chunk_size;
    }
    let chunk_size = data_size / desired_chunks as u64;
    chunk_size.clamp(config.min_chunk_size, config.max_chunk_size)
}

pub struct ReaderConfigBuilder {
    config: ReaderConfig,
}

impl Default for ReaderConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReaderConfigBuilder {
    /// Create a new [`ReaderConfigBuilder`]
    pub fn new() -> Self {
        Self {
            config: ReaderConfig::default(),
        }
    }

    /// Build a [`ReaderConfig`]
    pub fn build(self) -> ReaderConfig {
        self.config
    }

    pub fn with_min_chunk_size(mut self, min: u64) -> Self {
        self.config.min_chunk_size = min;
        self
    }

    pub fn with_max_chunk_size(mut self, max: u64) -> Self {
        self.config.max_chunk_size = max;
        self
    }

    pub fn with_chunks_per_thread(mut self, chunks: u8) -> Self {
        self.config.chunks_per_thread = chunks;
        self
    }

    pub fn with_batch_size(mut self, batch_size: u32) -> Self {
        self.config.batch_size = batch_size;
        self
    }

    pub fn with_parallel_threshold(mut self, threshold: u64) -> Self {
        self.config.parallel_threshold = threshold;
        self
    }
}
