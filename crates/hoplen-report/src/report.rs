use crate::config::HoplenConfig;
use tracing::instrument;
use types::{Candidate, Capacity, EncodingInfo, Report};

pub mod csv;
pub mod json;
pub mod silent;
pub mod table;
mod types;

/// Verify every candidate encoding and check the connection capacity.
#[instrument(skip_all, fields(candidates = ?cfg.candidates), level = "debug")]
pub fn evaluate(cfg: &HoplenConfig) -> anyhow::Result<types::Report> {
    let capacity = cfg.concurrent_connections.map(|concurrent| {
        let warning = cfg.encoding.check_capacity(concurrent).err().map(|err| {
            tracing::warn!(
                %err,
                "connections will share hash buckets, collisions are only checked per bucket"
            );
            err.to_string()
        });
        Capacity {
            concurrent,
            buckets: cfg.encoding.connection_buckets(),
            warning,
        }
    });
    let candidates = cfg
        .candidate_encodings()?
        .iter()
        .map(|encoding| Candidate::new(encoding, cfg.max_examples))
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(Report {
        encoding: EncodingInfo::from(&cfg.encoding),
        capacity,
        candidates,
    })
}
