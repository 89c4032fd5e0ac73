use crate::config::{defaults, CollisionScope};
use crate::encoder::{Encoder, LinearEncoder};
use crate::error::{Error, Result};
use crate::projector::project;
use crate::report::CollisionReport;
use crate::types::{ConnectionHash, OverheadBounds, ProbeSize, TimeToLive, WireLengthRange};
use crate::verifier::{verify, verify_across};
use crate::Builder;
use std::ops::RangeInclusive;
use tracing::instrument;

/// A validated probe size encoding.
///
/// Holds every constant of the scheme (the encoder multipliers, the
/// overhead bounds, the header size, the ttl range, the number of
/// connection hash buckets and the collision scope).  An `Encoding` is
/// immutable; candidates are compared by deriving new values from an
/// existing one.
///
/// Use [`Builder`] to create an `Encoding`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Encoding {
    encoder: LinearEncoder,
    overhead: OverheadBounds,
    header_size: u32,
    first_ttl: TimeToLive,
    max_ttl: TimeToLive,
    connection_buckets: u16,
    scope: CollisionScope,
}

impl Encoding {
    pub(crate) const fn new(
        encoder: LinearEncoder,
        overhead: OverheadBounds,
        header_size: u32,
        first_ttl: TimeToLive,
        max_ttl: TimeToLive,
        connection_buckets: u16,
        scope: CollisionScope,
    ) -> Self {
        Self {
            encoder,
            overhead,
            header_size,
            first_ttl,
            max_ttl,
            connection_buckets,
            scope,
        }
    }

    #[must_use]
    pub const fn encoder(&self) -> &LinearEncoder {
        &self.encoder
    }

    #[must_use]
    pub const fn overhead(&self) -> OverheadBounds {
        self.overhead
    }

    #[must_use]
    pub const fn header_size(&self) -> u32 {
        self.header_size
    }

    #[must_use]
    pub const fn first_ttl(&self) -> TimeToLive {
        self.first_ttl
    }

    #[must_use]
    pub const fn max_ttl(&self) -> TimeToLive {
        self.max_ttl
    }

    #[must_use]
    pub const fn connection_buckets(&self) -> u16 {
        self.connection_buckets
    }

    #[must_use]
    pub const fn scope(&self) -> CollisionScope {
        self.scope
    }

    /// All connection hashes, `0..connection_buckets`.
    pub fn connections(&self) -> impl Iterator<Item = ConnectionHash> {
        (0..self.connection_buckets).map(ConnectionHash)
    }

    /// The ttl range, `first_ttl..=max_ttl`.
    #[must_use]
    pub const fn ttls(&self) -> RangeInclusive<TimeToLive> {
        self.first_ttl..=self.max_ttl
    }

    /// The payload size of a probe.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConnection` or `Error::InvalidTtl` if the
    /// connection hash or ttl are out of range.
    pub fn probe_size(&self, connection: ConnectionHash, ttl: TimeToLive) -> Result<ProbeSize> {
        self.check_connection(connection)?;
        self.check_ttl(ttl)?;
        Ok(self.encoder.encode(connection, ttl))
    }

    /// The range of lengths a probe may have on the wire.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConnection` or `Error::InvalidTtl` if the
    /// connection hash or ttl are out of range.
    pub fn wire_length_range(
        &self,
        connection: ConnectionHash,
        ttl: TimeToLive,
    ) -> Result<WireLengthRange> {
        let size = self.probe_size(connection, ttl)?;
        Ok(project(size, self.overhead, self.header_size))
    }

    /// The gap between the wire length ranges of adjacent ttls.
    ///
    /// Equal to `hop_multiplier - (overhead_max - overhead_min)` for every
    /// connection.  The encoding is collision free within a connection if
    /// and only if this is strictly positive (or there is only one ttl).
    #[must_use]
    pub fn closed_form_gap(&self) -> i64 {
        i64::from(self.encoder.hop_multiplier()) - i64::from(self.overhead.jitter())
    }

    /// The largest length any probe may have on the wire.
    #[must_use]
    pub fn max_wire_length(&self) -> u64 {
        let last_connection = u64::from(self.connection_buckets.saturating_sub(1));
        u64::from(self.encoder.base_size())
            + last_connection * u64::from(self.encoder.conn_id_multiplier())
            + u64::from(self.max_ttl.0) * u64::from(self.encoder.hop_multiplier())
            + u64::from(self.header_size)
            + u64::from(self.overhead.max())
    }

    /// Verify the encoding for every connection and ttl, honouring the collision scope.
    #[instrument(
        skip(self),
        fields(hop_multiplier = self.encoder.hop_multiplier(), scope = %self.scope),
        level = "debug"
    )]
    pub fn verify(&self) -> CollisionReport {
        let report = match self.scope {
            CollisionScope::WithinConnection => verify(
                self.connections(),
                self.ttls(),
                self.overhead,
                self.header_size,
                &self.encoder,
            ),
            CollisionScope::AcrossConnections => verify_across(
                self.connections(),
                self.ttls(),
                self.overhead,
                self.header_size,
                &self.encoder,
            ),
        };
        if report.is_collision_free() {
            tracing::debug!(probes = report.probes(), "encoding is collision free");
        } else {
            tracing::debug!(
                probes = report.probes(),
                collisions = report.total(),
                "encoding has collisions"
            );
        }
        report
    }

    /// Derive a candidate encoding which differs only in its hop multiplier.
    ///
    /// # Errors
    ///
    /// Returns `Error::BadConfig` if the derived encoding is invalid.
    pub fn with_hop_multiplier(&self, hop_multiplier: u32) -> Result<Self> {
        Builder::from(*self).hop_multiplier(hop_multiplier).build()
    }

    /// Check that a number of concurrent connections can each be given a distinct hash bucket.
    ///
    /// When there are more connections than buckets some connections must
    /// share a bucket, and the within connection guarantee then only holds
    /// per bucket.
    ///
    /// # Errors
    ///
    /// Returns `Error::CapacityExceeded` if `concurrent` exceeds the number
    /// of connection buckets.
    pub fn check_capacity(&self, concurrent: usize) -> Result<()> {
        if concurrent > usize::from(self.connection_buckets) {
            Err(Error::CapacityExceeded {
                concurrent,
                buckets: self.connection_buckets,
            })
        } else {
            Ok(())
        }
    }

    pub(crate) fn check_connection(&self, connection: ConnectionHash) -> Result<()> {
        if connection.0 < self.connection_buckets {
            Ok(())
        } else {
            Err(Error::InvalidConnection {
                hash: connection,
                buckets: self.connection_buckets,
            })
        }
    }

    fn check_ttl(&self, ttl: TimeToLive) -> Result<()> {
        if self.ttls().contains(&ttl) {
            Ok(())
        } else {
            Err(Error::InvalidTtl {
                ttl,
                first: self.first_ttl,
                max: self.max_ttl,
            })
        }
    }
}

impl Default for Encoding {
    fn default() -> Self {
        Self::new(
            LinearEncoder::default(),
            OverheadBounds::default(),
            defaults::DEFAULT_HEADER_SIZE,
            TimeToLive(defaults::DEFAULT_FIRST_TTL),
            TimeToLive(defaults::DEFAULT_MAX_TTL),
            defaults::DEFAULT_CONNECTION_BUCKETS,
            defaults::DEFAULT_COLLISION_SCOPE,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_default_is_reference() {
        let encoding = Encoding::default();
        assert_eq!(Builder::new().build().unwrap(), encoding);
        assert_eq!(10, encoding.connections().count());
        assert_eq!(TimeToLive(1)..=TimeToLive(30), encoding.ttls());
        assert_eq!(20, encoding.closed_form_gap());
    }

    #[test_case(0, 1, 150, 238, 268; "first connection first hop")]
    #[test_case(0, 2, 200, 288, 318; "first connection second hop")]
    #[test_case(0, 30, 1600, 1688, 1718; "first connection last hop")]
    #[test_case(9, 1, 1023, 1111, 1141; "last connection first hop")]
    #[test_case(9, 30, 2473, 2561, 2591; "last connection last hop")]
    fn test_wire_length_range(connection: u16, ttl: u8, size: u32, low: u32, high: u32) {
        let encoding = Encoding::default();
        let connection = ConnectionHash(connection);
        let ttl = TimeToLive(ttl);
        assert_eq!(
            ProbeSize(size),
            encoding.probe_size(connection, ttl).unwrap()
        );
        let range = encoding.wire_length_range(connection, ttl).unwrap();
        assert_eq!((low, high), (range.low(), range.high()));
    }

    #[test]
    fn test_invalid_connection() {
        let err = Encoding::default()
            .probe_size(ConnectionHash(10), TimeToLive(1))
            .unwrap_err();
        assert_eq!(
            Error::InvalidConnection {
                hash: ConnectionHash(10),
                buckets: 10
            },
            err
        );
        assert_eq!(
            "connection hash 10 out of range, expected < 10",
            err.to_string()
        );
    }

    #[test_case(0; "zero ttl")]
    #[test_case(31; "beyond max ttl")]
    fn test_invalid_ttl(ttl: u8) {
        let err = Encoding::default()
            .wire_length_range(ConnectionHash(0), TimeToLive(ttl))
            .unwrap_err();
        assert_eq!(
            Error::InvalidTtl {
                ttl: TimeToLive(ttl),
                first: TimeToLive(1),
                max: TimeToLive(30)
            },
            err
        );
    }

    #[test]
    fn test_with_hop_multiplier() {
        let narrow = Encoding::default().with_hop_multiplier(3).unwrap();
        assert_eq!(3, narrow.encoder().hop_multiplier());
        assert_eq!(-27, narrow.closed_form_gap());
        assert_eq!(Encoding::default().overhead(), narrow.overhead());
        assert!(Encoding::default().with_hop_multiplier(0).is_err());
    }

    #[test]
    fn test_max_wire_length() {
        assert_eq!(2591, Encoding::default().max_wire_length());
    }

    #[test_case(1, true; "single connection")]
    #[test_case(10, true; "one connection per bucket")]
    #[test_case(11, false; "more connections than buckets")]
    fn test_check_capacity(concurrent: usize, ok: bool) {
        let result = Encoding::default().check_capacity(concurrent);
        assert_eq!(ok, result.is_ok());
        if let Err(err) = result {
            assert_eq!(
                "11 concurrent connections exceed 10 hash buckets",
                err.to_string()
            );
        }
    }

    #[test]
    fn test_verify_scope() {
        let within = Encoding::default();
        assert!(within.verify().is_collision_free());
        let across = Builder::from(within)
            .scope(CollisionScope::AcrossConnections)
            .build()
            .unwrap();
        let report = across.verify();
        assert!(!report.is_collision_free());
        assert_eq!(report.total(), report.cross_connection_total());
    }

    #[test]
    fn test_gap_agrees_with_scan() {
        for hop_multiplier in 1..=80 {
            let encoding = Encoding::default()
                .with_hop_multiplier(hop_multiplier)
                .unwrap();
            let report = encoding.verify();
            assert_eq!(Some(encoding.closed_form_gap()), report.min_gap());
            assert_eq!(encoding.closed_form_gap() > 0, report.is_collision_free());
        }
    }
}
