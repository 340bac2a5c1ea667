use crate::DemuxError;
use std::path::PathBuf;

pub const DEFAULT_WORKERS: usize = 4;
pub const FASTQ_SUFFIX: &str = ".fastq";
pub const POD5_SUFFIX: &str = ".pod5";

/// A configure struct for one demultiplexing run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory of FASTQ files.
    pub fastq_dir: PathBuf,
    /// Directory of the source containers.
    pub pod5_dir: PathBuf,
    /// The match relation (CSV) to write, or to read when resuming.
    pub match_output: PathBuf,
    /// Directory for the filtered containers.
    pub output_dir: PathBuf,
    /// Maximum number of output containers written at once.
    pub workers: usize,
    /// Where to keep the per-file id dumps. A temporary directory
    /// (removed at the end of the run) when `None`.
    pub scratch_dir: Option<PathBuf>,
    /// Optional JSON summary of every group's outcome.
    pub report: Option<PathBuf>,
    pub fastq_suffix: String,
    pub pod5_suffix: String,
}

impl Config {
    pub fn new<P: Into<PathBuf>>(fastq_dir: P, pod5_dir: P, match_output: P, output_dir: P) -> Self {
        Self {
            fastq_dir: fastq_dir.into(),
            pod5_dir: pod5_dir.into(),
            match_output: match_output.into(),
            output_dir: output_dir.into(),
            workers: DEFAULT_WORKERS,
            scratch_dir: None,
            report: None,
            fastq_suffix: FASTQ_SUFFIX.to_string(),
            pod5_suffix: POD5_SUFFIX.to_string(),
        }
    }
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }
    pub fn validate(&self) -> Result<(), DemuxError> {
        if self.workers == 0 {
            return Err(DemuxError::Config("workers should be positive".to_string()));
        }
        if self.fastq_suffix.is_empty() || self.pod5_suffix.is_empty() {
            return Err(DemuxError::Config("file suffixes should not be empty".to_string()));
        }
        Ok(())
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "FASTQ:\t{}(*{})", self.fastq_dir.display(), self.fastq_suffix)?;
        writeln!(f, "POD5:\t{}(*{})", self.pod5_dir.display(), self.pod5_suffix)?;
        writeln!(f, "Matches:\t{}", self.match_output.display())?;
        writeln!(f, "Output:\t{}", self.output_dir.display())?;
        write!(f, "Workers:\t{}", self.workers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn defaults_and_validation() {
        let config = Config::new("fq", "pod5", "matches.csv", "out");
        assert_eq!(config.workers, 4);
        assert_eq!(config.fastq_suffix, ".fastq");
        assert_eq!(config.pod5_suffix, ".pod5");
        assert!(config.validate().is_ok());
        assert!(config.clone().workers(0).validate().is_err());
        let mut config = config;
        config.pod5_suffix = String::new();
        assert!(config.validate().is_err());
    }
}
