use thiserror::Error;

/// Top-level error type for the zping library.
#[derive(Error, Debug)]
pub enum ZpingError {
    /// DNS resolution failure.
    #[error("{0}")]
    Dns(String),
    /// Invalid logging configuration.
    #[error("{0}")]
    Config(String),
    /// ICMP socket setup failure.
    #[error("icmp: {0}")]
    Icmp(String),
    /// Underlying IO error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Other error cases.
    #[error("other: {0}")]
    Other(String),
}
