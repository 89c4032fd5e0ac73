use crate::types::{ConnectionHash, TimeToLive};
use thiserror::Error;

/// An encoding result.
pub type Result<T> = std::result::Result<T, Error>;

/// An encoding error.
///
/// Verification never fails; a collision is reported as data.  These errors
/// are raised only for input which violates a precondition.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum Error {
    #[error("invalid config: {0}")]
    BadConfig(String),
    #[error("connection hash {hash} out of range, expected < {buckets}")]
    InvalidConnection { hash: ConnectionHash, buckets: u16 },
    #[error("ttl {ttl} out of range, expected {first}..={max}")]
    InvalidTtl {
        ttl: TimeToLive,
        first: TimeToLive,
        max: TimeToLive,
    },
    #[error("{concurrent} concurrent connections exceed {buckets} hash buckets")]
    CapacityExceeded { concurrent: usize, buckets: u16 },
}
