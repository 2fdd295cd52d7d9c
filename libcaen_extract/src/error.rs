use std::path::PathBuf;
use thiserror::Error;

use super::worker_status::WorkerStatus;

#[derive(Debug, Clone, Error)]
pub enum LayoutError {
    #[error("Invalid layout pivot {0:?}; expected a YYYY-MM-DD date or an RFC 3339 timestamp")]
    InvalidPivot(String),
}

#[derive(Debug, Error)]
pub enum DatFileError {
    #[error("DatFile failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("DatFile of {size} bytes is not a whole number of {record_size} byte records; {remainder} trailing bytes")]
    TrailingBytes {
        size: usize,
        record_size: usize,
        remainder: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelSelectionError {
    #[error("Channel selection is empty")]
    Empty,
    #[error("Channel selection failed to parse an integer: {0}")]
    ParsingError(#[from] std::num::ParseIntError),
    #[error("Channel range {0}-{1} is reversed")]
    ReversedRange(u32, u32),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration as file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("Config failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Config failed to parse YAML: {0}")]
    ParsingError(#[from] serde_yaml::Error),
    #[error("Config has invalid clock frequency {0} Hz; must be finite and positive")]
    InvalidClock(f64),
    #[error("Config has invalid number of threads {0}; must be at least 1")]
    InvalidThreads(i32),
    #[error("Config has a bad layout pivot: {0}")]
    LayoutError(#[from] LayoutError),
}

#[derive(Debug, Error)]
pub enum ExtractorError {
    #[error("Extractor failed due to DatFile error: {0}")]
    DatFileError(#[from] DatFileError),
    #[error("Extractor failed due to Config error: {0}")]
    ConfigError(#[from] ConfigError),
    #[error("Extractor failed to write {0:?}: {1}")]
    WriteError(PathBuf, std::io::Error),
}

#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error("Processor failed due to Extractor error: {0}")]
    ExtractorError(#[from] ExtractorError),
    #[error("Processor failed due to Config error: {0}")]
    ConfigError(#[from] ConfigError),
    #[error("Processor failed due to Send error: {0}")]
    SendError(#[from] std::sync::mpsc::SendError<WorkerStatus>),
    #[error("Processor worker {0} panicked")]
    WorkerPanic(usize),
}
