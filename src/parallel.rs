/// Parallel file processing module for vuestyle
///
/// Files are independent, so each one is processed on its own rayon task.
/// Results come back in input order.
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::time::Instant;

/// Configuration for parallel execution
#[derive(Debug, Clone)]
pub struct ParallelConfig {
    /// Enable/disable parallel execution
    pub enabled: bool,
    /// Number of threads to use (None = one per core)
    pub thread_count: Option<usize>,
    /// Minimum number of files to enable parallel execution
    pub min_file_count: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            thread_count: None,
            min_file_count: 2,
        }
    }
}

/// File-level parallel processing for multiple files
pub struct FileParallelProcessor {
    config: ParallelConfig,
}

impl FileParallelProcessor {
    pub fn new(config: ParallelConfig) -> Self {
        Self { config }
    }

    pub fn with_default_config() -> Self {
        Self::new(ParallelConfig::default())
    }

    /// Apply `process` to every file, returning results in input order.
    pub fn process_files<T, R, F>(&self, files: &[T], process: F) -> Vec<R>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> R + Sync + Send,
    {
        if !self.should_use_parallel(files.len()) {
            return files.iter().map(&process).collect();
        }
        self.process_parallel(files, process)
    }

    #[cfg(feature = "parallel")]
    fn process_parallel<T, R, F>(&self, files: &[T], process: F) -> Vec<R>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> R + Sync + Send,
    {
        let timed = |file: &T| {
            let start = Instant::now();
            let result = process(file);
            let duration = start.elapsed();
            if duration.as_millis() > 1000 {
                log::debug!("File took {duration:?}");
            }
            result
        };

        let Some(thread_count) = self.config.thread_count else {
            return files.par_iter().map(timed).collect();
        };

        match rayon::ThreadPoolBuilder::new().num_threads(thread_count).build() {
            Ok(pool) => pool.install(|| files.par_iter().map(timed).collect()),
            Err(e) => {
                log::warn!("Failed to set thread pool size to {thread_count}: {e}");
                files.par_iter().map(timed).collect()
            }
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn process_parallel<T, R, F>(&self, files: &[T], process: F) -> Vec<R>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> R + Sync + Send,
    {
        files
            .iter()
            .map(|file| {
                let start = Instant::now();
                let result = process(file);
                log::trace!("File took {:?}", start.elapsed());
                result
            })
            .collect()
    }

    /// Determine if file-level parallel processing should be used
    pub fn should_use_parallel(&self, file_count: usize) -> bool {
        if !self.config.enabled || cfg!(not(feature = "parallel")) {
            return false;
        }

        if file_count < self.config.min_file_count {
            return false;
        }

        if self.config.thread_count == Some(1) {
            return false;
        }

        available_threads() >= 2
    }
}

#[cfg(feature = "parallel")]
fn available_threads() -> usize {
    rayon::current_num_threads()
}

#[cfg(not(feature = "parallel"))]
fn available_threads() -> usize {
    1
}
