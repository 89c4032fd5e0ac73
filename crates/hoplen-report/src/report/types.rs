use crate::config::SPACING_SAMPLE_TTLS;
use hoplen_core::{Collision, ConnectionHash, Encoding, ProbeLength, TimeToLive};
use itertools::Itertools;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Report {
    pub encoding: EncodingInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<Capacity>,
    pub candidates: Vec<Candidate>,
}

impl Report {
    /// The hop multipliers of every candidate which has collisions.
    pub fn failing(&self) -> impl Iterator<Item = u32> + '_ {
        self.candidates
            .iter()
            .filter(|candidate| !candidate.ok)
            .map(|candidate| candidate.hop_multiplier)
    }
}

#[derive(Debug, Serialize)]
pub struct EncodingInfo {
    pub base_size: u32,
    pub conn_id_multiplier: u32,
    pub overhead_min: u32,
    pub overhead_max: u32,
    pub jitter: u32,
    pub header_size: u32,
    pub first_ttl: u8,
    pub max_ttl: u8,
    pub connection_buckets: u16,
    pub scope: String,
}

impl From<&Encoding> for EncodingInfo {
    fn from(value: &Encoding) -> Self {
        Self {
            base_size: value.encoder().base_size(),
            conn_id_multiplier: value.encoder().conn_id_multiplier(),
            overhead_min: value.overhead().min(),
            overhead_max: value.overhead().max(),
            jitter: value.overhead().jitter(),
            header_size: value.header_size(),
            first_ttl: value.first_ttl().0,
            max_ttl: value.max_ttl().0,
            connection_buckets: value.connection_buckets(),
            scope: value.scope().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Capacity {
    pub concurrent: usize,
    pub buckets: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Candidate {
    pub hop_multiplier: u32,
    pub ok: bool,
    pub probes: usize,
    pub total_collisions: usize,
    pub cross_connection_collisions: usize,
    pub gap: Option<i64>,
    pub closed_form_gap: i64,
    pub collisions: Vec<Pair>,
    pub spacing: Vec<Spacing>,
}

impl Candidate {
    /// Verify a candidate encoding.
    ///
    /// The spacing of the first connection is sampled only for a collision
    /// free candidate.
    pub fn new(encoding: &Encoding, max_examples: usize) -> anyhow::Result<Self> {
        let report = encoding.verify();
        let verdict = report.verdict(max_examples);
        let spacing = if verdict.ok {
            spacing(encoding)?
        } else {
            vec![]
        };
        Ok(Self {
            hop_multiplier: encoding.encoder().hop_multiplier(),
            ok: verdict.ok,
            probes: report.probes(),
            total_collisions: verdict.total_collisions,
            cross_connection_collisions: report.cross_connection_total(),
            gap: verdict.gap,
            closed_form_gap: encoding.closed_form_gap(),
            collisions: verdict.collisions.iter().map(Pair::from).collect(),
            spacing,
        })
    }

    /// The number of collisions not shown as examples.
    pub fn remaining(&self) -> usize {
        self.total_collisions.saturating_sub(self.collisions.len())
    }
}

#[derive(Debug, Serialize)]
pub struct Pair {
    pub lower: Probe,
    pub upper: Probe,
}

impl From<&Collision> for Pair {
    fn from(value: &Collision) -> Self {
        Self {
            lower: Probe::from(&value.lower),
            upper: Probe::from(&value.upper),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Probe {
    pub connection: u16,
    pub ttl: u8,
    pub size: u32,
    pub wire_min: u32,
    pub wire_max: u32,
}

impl From<&ProbeLength> for Probe {
    fn from(value: &ProbeLength) -> Self {
        Self {
            connection: value.connection.0,
            ttl: value.ttl.0,
            size: value.size.0,
            wire_min: value.wire.low(),
            wire_max: value.wire.high(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Spacing {
    pub ttl: u8,
    pub wire_min: u32,
    pub wire_max: u32,
}

/// Sample the wire length ranges of the first connection.
fn spacing(encoding: &Encoding) -> anyhow::Result<Vec<Spacing>> {
    let ttls = encoding.ttls();
    SPACING_SAMPLE_TTLS
        .into_iter()
        .map(TimeToLive)
        .chain([encoding.first_ttl(), encoding.max_ttl()])
        .filter(|ttl| ttls.contains(ttl))
        .sorted()
        .dedup()
        .map(|ttl| -> anyhow::Result<Spacing> {
            let wire = encoding.wire_length_range(ConnectionHash(0), ttl)?;
            Ok(Spacing {
                ttl: ttl.0,
                wire_min: wire.low(),
                wire_max: wire.high(),
            })
        })
        .collect()
}
