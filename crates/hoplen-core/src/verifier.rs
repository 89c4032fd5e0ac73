use crate::encoder::Encoder;
use crate::projector::project;
use crate::report::{Collision, CollisionReport, ProbeLength};
use crate::types::{ConnectionHash, OverheadBounds, TimeToLive};
use itertools::Itertools;
use std::ops::RangeInclusive;
use tracing::instrument;

/// Verify that no two ttls of any given connection have overlapping wire lengths.
///
/// Connections are verified independently and the per-connection reports
/// merged; probes of different connections are never compared.
#[instrument(skip_all, level = "trace")]
pub fn verify<I, E>(
    connections: I,
    ttls: RangeInclusive<TimeToLive>,
    overhead: OverheadBounds,
    header_size: u32,
    encoder: &E,
) -> CollisionReport
where
    I: IntoIterator<Item = ConnectionHash>,
    E: Encoder + ?Sized,
{
    let report = connections
        .into_iter()
        .map(|connection| {
            verify_connection(connection, ttls.clone(), overhead, header_size, encoder)
        })
        .fold(CollisionReport::default(), CollisionReport::merge);
    tracing::debug!(
        probes = report.probes(),
        collisions = report.total(),
        min_gap = ?report.min_gap(),
        "verified within connection"
    );
    report
}

/// Verify a single connection.
///
/// Every unordered pair of distinct ttls is compared.  Since the encoder is
/// strictly increasing in ttl the pair collides exactly when the top of the
/// lower ttl's range reaches the bottom of the higher ttl's range.
#[instrument(skip(ttls, overhead, header_size, encoder), level = "trace")]
pub fn verify_connection<E: Encoder + ?Sized>(
    connection: ConnectionHash,
    ttls: RangeInclusive<TimeToLive>,
    overhead: OverheadBounds,
    header_size: u32,
    encoder: &E,
) -> CollisionReport {
    let probes = ttl_iter(&ttls)
        .map(|ttl| probe_length(connection, ttl, overhead, header_size, encoder))
        .collect::<Vec<_>>();
    let collisions = probes
        .iter()
        .tuple_combinations()
        .filter(|(lower, upper)| lower.wire.collides_with(&upper.wire))
        .map(|(lower, upper)| Collision {
            lower: *lower,
            upper: *upper,
        })
        .collect::<Vec<_>>();
    let min_gap = probes
        .iter()
        .tuple_windows()
        .map(|(lower, upper)| lower.wire.gap_to(&upper.wire))
        .min();
    CollisionReport::new(collisions, probes.len(), min_gap)
}

/// Verify that no two probes have overlapping wire lengths, whether or not
/// they belong to the same connection.
///
/// The report contains the within connection collisions followed by the
/// cross connection collisions.
#[instrument(skip_all, level = "trace")]
pub fn verify_across<I, E>(
    connections: I,
    ttls: RangeInclusive<TimeToLive>,
    overhead: OverheadBounds,
    header_size: u32,
    encoder: &E,
) -> CollisionReport
where
    I: IntoIterator<Item = ConnectionHash>,
    E: Encoder + ?Sized,
{
    let connections = connections.into_iter().collect::<Vec<_>>();
    let within = verify(
        connections.iter().copied(),
        ttls.clone(),
        overhead,
        header_size,
        encoder,
    );
    let probes = connections
        .iter()
        .flat_map(|&connection| {
            ttl_iter(&ttls)
                .map(move |ttl| probe_length(connection, ttl, overhead, header_size, encoder))
        })
        .collect::<Vec<_>>();
    let cross = probes
        .iter()
        .tuple_combinations()
        .filter(|(fst, snd)| fst.connection != snd.connection && fst.wire.overlaps(&snd.wire))
        .map(|(fst, snd)| {
            if (fst.wire.low(), fst.connection) <= (snd.wire.low(), snd.connection) {
                Collision {
                    lower: *fst,
                    upper: *snd,
                }
            } else {
                Collision {
                    lower: *snd,
                    upper: *fst,
                }
            }
        })
        .collect::<Vec<_>>();
    tracing::debug!(
        probes = probes.len(),
        collisions = cross.len(),
        "verified across connections"
    );
    within.with_collisions(cross)
}

fn probe_length<E: Encoder + ?Sized>(
    connection: ConnectionHash,
    ttl: TimeToLive,
    overhead: OverheadBounds,
    header_size: u32,
    encoder: &E,
) -> ProbeLength {
    let size = encoder.encode(connection, ttl);
    ProbeLength {
        connection,
        ttl,
        size,
        wire: project(size, overhead, header_size),
    }
}

fn ttl_iter(ttls: &RangeInclusive<TimeToLive>) -> impl Iterator<Item = TimeToLive> {
    (ttls.start().0..=ttls.end().0).map(TimeToLive)
}
