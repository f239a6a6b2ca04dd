use thiserror::Error;

/// Core error type shared across the pipeline crates.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration does not describe a usable pipeline.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// A value does not belong to its declared vocabulary.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

/// Convenience alias for results returned by the core crate.
pub type Result<T> = std::result::Result<T, Error>;
