use std::io;

use thiserror::Error;

use crate::address::Radix;

/// Address text rejected before it reaches an engine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("invalid {radix} input: {text:?}")]
    InvalidAddressText { text: String, radix: Radix },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration for cache {name:?}: {field} must be positive")]
    InvalidConfiguration { name: String, field: &'static str },

    #[error("unrecognized cache organization: {0}")]
    UnknownOrganization(String),

    #[error("unrecognized replacement policy: {0}")]
    UnknownPolicy(String),

    #[error("config contains no caches")]
    Empty,

    #[error("could not read config: {0}")]
    Io(#[from] io::Error),

    #[error("could not parse config: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum TraceError {
    #[error("trace line {line}: {source}")]
    Address {
        line: usize,
        #[source]
        source: AddressError,
    },

    #[error("could not read trace: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Trace(#[from] TraceError),

    #[error("bad arguments: {0}")]
    Args(#[from] pico_args::Error),

    #[error("{0}")]
    Usage(String),

    #[error("could not write report: {0}")]
    Report(#[from] io::Error),

    #[error("could not serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
