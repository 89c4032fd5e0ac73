use crate::config::{defaults, CollisionScope};
use crate::constants::{MAX_TTL, MAX_WIRE_LENGTH};
use crate::encoder::LinearEncoder;
use crate::error::Result;
use crate::types::{OverheadBounds, TimeToLive};
use crate::{Encoding, Error};

/// Build an encoding.
///
/// This is a convenience builder to simplify the creation of a validated
/// [`Encoding`].
///
/// # Examples
///
/// ```
/// # fn main() -> anyhow::Result<()> {
/// use hoplen_core::{Builder, CollisionScope};
///
/// let encoding = Builder::new()
///     .hop_multiplier(50)
///     .overhead(80, 110)
///     .max_ttl(30)
///     .scope(CollisionScope::WithinConnection)
///     .build()?;
/// assert!(encoding.verify().is_collision_free());
/// # Ok(())
/// # }
/// ```
///
/// # See Also
///
/// - [`Encoding`] - A validated probe size encoding.
#[derive(Debug)]
pub struct Builder {
    base_size: u32,
    conn_id_multiplier: u32,
    hop_multiplier: u32,
    overhead_min: u32,
    overhead_max: u32,
    header_size: u32,
    first_ttl: TimeToLive,
    max_ttl: TimeToLive,
    connection_buckets: u16,
    scope: CollisionScope,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            base_size: defaults::DEFAULT_BASE_SIZE,
            conn_id_multiplier: defaults::DEFAULT_CONN_ID_MULTIPLIER,
            hop_multiplier: defaults::DEFAULT_HOP_MULTIPLIER,
            overhead_min: defaults::DEFAULT_OVERHEAD_MIN,
            overhead_max: defaults::DEFAULT_OVERHEAD_MAX,
            header_size: defaults::DEFAULT_HEADER_SIZE,
            first_ttl: TimeToLive(defaults::DEFAULT_FIRST_TTL),
            max_ttl: TimeToLive(defaults::DEFAULT_MAX_TTL),
            connection_buckets: defaults::DEFAULT_CONNECTION_BUCKETS,
            scope: defaults::DEFAULT_COLLISION_SCOPE,
        }
    }
}

impl From<Encoding> for Builder {
    fn from(encoding: Encoding) -> Self {
        Self {
            base_size: encoding.encoder().base_size(),
            conn_id_multiplier: encoding.encoder().conn_id_multiplier(),
            hop_multiplier: encoding.encoder().hop_multiplier(),
            overhead_min: encoding.overhead().min(),
            overhead_max: encoding.overhead().max(),
            header_size: encoding.header_size(),
            first_ttl: encoding.first_ttl(),
            max_ttl: encoding.max_ttl(),
            connection_buckets: encoding.connection_buckets(),
            scope: encoding.scope(),
        }
    }
}

impl Builder {
    /// Build an encoding builder with the reference values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the payload size floor.
    #[must_use]
    pub fn base_size(self, base_size: u32) -> Self {
        Self { base_size, ..self }
    }

    /// Set the size spacing between connections.
    #[must_use]
    pub fn conn_id_multiplier(self, conn_id_multiplier: u32) -> Self {
        Self {
            conn_id_multiplier,
            ..self
        }
    }

    /// Set the size spacing between consecutive ttls of a connection.
    ///
    /// This must exceed the overhead jitter for the encoding to be collision
    /// free.
    #[must_use]
    pub fn hop_multiplier(self, hop_multiplier: u32) -> Self {
        Self {
            hop_multiplier,
            ..self
        }
    }

    /// Set the inclusive bounds on the wrapping overhead.
    #[must_use]
    pub fn overhead(self, overhead_min: u32, overhead_max: u32) -> Self {
        Self {
            overhead_min,
            overhead_max,
            ..self
        }
    }

    /// Set the transport header size added on the wire.
    #[must_use]
    pub fn header_size(self, header_size: u32) -> Self {
        Self {
            header_size,
            ..self
        }
    }

    /// Set the first ttl.
    #[must_use]
    pub fn first_ttl(self, first_ttl: u8) -> Self {
        Self {
            first_ttl: TimeToLive(first_ttl),
            ..self
        }
    }

    /// Set the maximum ttl.
    #[must_use]
    pub fn max_ttl(self, max_ttl: u8) -> Self {
        Self {
            max_ttl: TimeToLive(max_ttl),
            ..self
        }
    }

    /// Set the number of connection hash buckets.
    #[must_use]
    pub fn connection_buckets(self, connection_buckets: u16) -> Self {
        Self {
            connection_buckets,
            ..self
        }
    }

    /// Set the collision scope.
    #[must_use]
    pub fn scope(self, scope: CollisionScope) -> Self {
        Self { scope, ..self }
    }

    /// Build the `Encoding`.
    ///
    /// # Errors
    ///
    /// This function will return `Error::BadConfig` if the configuration is invalid.
    pub fn build(self) -> Result<Encoding> {
        let overhead = OverheadBounds::new(self.overhead_min, self.overhead_max)?;
        if self.hop_multiplier == 0 {
            return Err(Error::BadConfig(String::from(
                "hop_multiplier must be greater than 0",
            )));
        }
        if self.first_ttl.0 == 0 {
            return Err(Error::BadConfig(String::from(
                "first_ttl must be greater than 0",
            )));
        }
        if self.max_ttl.0 > MAX_TTL {
            return Err(Error::BadConfig(format!(
                "max_ttl {} > {MAX_TTL}",
                self.max_ttl.0
            )));
        }
        if self.first_ttl > self.max_ttl {
            return Err(Error::BadConfig(format!(
                "first_ttl {} > max_ttl {}",
                self.first_ttl.0, self.max_ttl.0
            )));
        }
        if self.connection_buckets == 0 {
            return Err(Error::BadConfig(String::from(
                "connection_buckets must be greater than 0",
            )));
        }
        if self.conn_id_multiplier == 0 && self.connection_buckets > 1 {
            return Err(Error::BadConfig(String::from(
                "conn_id_multiplier must be greater than 0 for more than one connection bucket",
            )));
        }
        let encoding = Encoding::new(
            LinearEncoder::new(self.base_size, self.conn_id_multiplier, self.hop_multiplier),
            overhead,
            self.header_size,
            self.first_ttl,
            self.max_ttl,
            self.connection_buckets,
            self.scope,
        );
        let max_wire_length = encoding.max_wire_length();
        if max_wire_length > u64::from(MAX_WIRE_LENGTH) {
            return Err(Error::BadConfig(format!(
                "max wire length {max_wire_length} > {MAX_WIRE_LENGTH}"
            )));
        }
        Ok(encoding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ConnectionHash;
    use test_case::test_case;

    #[test]
    fn test_builder_minimal() {
        let encoding = Builder::new().build().unwrap();
        assert_eq!(defaults::DEFAULT_BASE_SIZE, encoding.encoder().base_size());
        assert_eq!(
            defaults::DEFAULT_CONN_ID_MULTIPLIER,
            encoding.encoder().conn_id_multiplier()
        );
        assert_eq!(
            defaults::DEFAULT_HOP_MULTIPLIER,
            encoding.encoder().hop_multiplier()
        );
        assert_eq!(defaults::DEFAULT_OVERHEAD_MIN, encoding.overhead().min());
        assert_eq!(defaults::DEFAULT_OVERHEAD_MAX, encoding.overhead().max());
        assert_eq!(defaults::DEFAULT_HEADER_SIZE, encoding.header_size());
        assert_eq!(defaults::DEFAULT_FIRST_TTL, encoding.first_ttl().0);
        assert_eq!(defaults::DEFAULT_MAX_TTL, encoding.max_ttl().0);
        assert_eq!(
            defaults::DEFAULT_CONNECTION_BUCKETS,
            encoding.connection_buckets()
        );
        assert_eq!(defaults::DEFAULT_COLLISION_SCOPE, encoding.scope());
    }

    #[test]
    fn test_builder_full() {
        let encoding = Builder::new()
            .base_size(64)
            .conn_id_multiplier(1000)
            .hop_multiplier(40)
            .overhead(16, 48)
            .header_size(0)
            .first_ttl(2)
            .max_ttl(16)
            .connection_buckets(4)
            .scope(CollisionScope::AcrossConnections)
            .build()
            .unwrap();
        assert_eq!(64, encoding.encoder().base_size());
        assert_eq!(1000, encoding.encoder().conn_id_multiplier());
        assert_eq!(40, encoding.encoder().hop_multiplier());
        assert_eq!(OverheadBounds::new(16, 48).unwrap(), encoding.overhead());
        assert_eq!(0, encoding.header_size());
        assert_eq!(TimeToLive(2), encoding.first_ttl());
        assert_eq!(TimeToLive(16), encoding.max_ttl());
        assert_eq!(4, encoding.connection_buckets());
        assert_eq!(CollisionScope::AcrossConnections, encoding.scope());
        assert_eq!(
            vec![0, 1, 2, 3],
            encoding.connections().map(|c| c.0).collect::<Vec<_>>()
        );
        let result = encoding.probe_size(ConnectionHash(0), TimeToLive(1));
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_round_trip() {
        let encoding = Builder::new()
            .hop_multiplier(64)
            .max_ttl(20)
            .build()
            .unwrap();
        assert_eq!(encoding, Builder::from(encoding).build().unwrap());
    }

    #[test]
    fn test_builder_single_bucket_without_conn_id_multiplier() {
        let encoding = Builder::new()
            .conn_id_multiplier(0)
            .connection_buckets(1)
            .build()
            .unwrap();
        assert_eq!(0, encoding.encoder().conn_id_multiplier());
        assert_eq!(1, encoding.connections().count());
    }

    #[test_case(Builder::new().overhead(120, 110), "overhead_min 120 > overhead_max 110"; "inverted overhead")]
    #[test_case(Builder::new().hop_multiplier(0), "hop_multiplier must be greater than 0"; "zero hop multiplier")]
    #[test_case(Builder::new().first_ttl(0), "first_ttl must be greater than 0"; "zero first ttl")]
    #[test_case(Builder::new().max_ttl(255), "max_ttl 255 > 254"; "max ttl too large")]
    #[test_case(Builder::new().first_ttl(10).max_ttl(5), "first_ttl 10 > max_ttl 5"; "first ttl after max ttl")]
    #[test_case(Builder::new().connection_buckets(0), "connection_buckets must be greater than 0"; "no connection buckets")]
    #[test_case(Builder::new().conn_id_multiplier(0), "conn_id_multiplier must be greater than 0 for more than one connection bucket"; "zero conn id multiplier")]
    #[test_case(Builder::new().hop_multiplier(3000), "max wire length 91091 > 65535"; "wire length overflow")]
    fn test_builder_invalid(builder: Builder, expected: &str) {
        let err = builder.build().unwrap_err();
        assert!(matches!(&err, Error::BadConfig(s) if s == expected), "{err}");
    }
}
