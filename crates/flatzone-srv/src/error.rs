//! Error types for the flatzone DNS server.

use thiserror::Error;

/// Errors that can occur in flatzone-srv operations.
#[derive(Error, Debug)]
pub enum SrvError {
    /// DNS server failed to bind or start.
    #[error("dns server error: {0}")]
    Server(String),

    /// Zone database could not be parsed.
    #[error("database error: {0}")]
    Database(String),

    /// A record value could not be turned into a wire record.
    #[error("record error: {0}")]
    Record(String),

    /// Upstream lookup for an ANAME target failed.
    #[error("upstream lookup failed: {0}")]
    Upstream(String),

    /// Configuration is invalid or missing required fields.
    #[error("config error: {0}")]
    Config(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
