use crate::error::Result;
use crate::types::{ConnectionHash, TimeToLive};
use crate::Encoding;
use tracing::instrument;

/// The outcome of matching an observed wire length to a probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// Exactly one ttl could have produced the wire length.
    Hop(TimeToLive),
    /// More than one ttl could have produced the wire length.
    ///
    /// This cannot happen for an encoding which is collision free.
    Ambiguous(Vec<TimeToLive>),
    /// No ttl could have produced the wire length.
    Unmatched,
}

/// Recover the ttl of a probe from the length echoed back in an ICMP error.
///
/// An ICMP `TimeExceeded` or `DestinationUnreachable` reply quotes the UDP
/// header of the original probe and so carries its wire length.  Given the
/// connection the reply belongs to, the ttl is found by inverting the
/// [`Encoding`] under the overhead bounds.
///
/// # Examples
///
/// ```
/// # fn main() -> anyhow::Result<()> {
/// use hoplen_core::{ConnectionHash, Decoded, Decoder, Encoding, TimeToLive};
///
/// let decoder = Decoder::new(Encoding::default());
/// assert_eq!(Decoded::Hop(TimeToLive(2)), decoder.decode(ConnectionHash(0), 300)?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Decoder {
    encoding: Encoding,
}

impl Decoder {
    #[must_use]
    pub const fn new(encoding: Encoding) -> Self {
        Self { encoding }
    }

    #[must_use]
    pub const fn encoding(&self) -> &Encoding {
        &self.encoding
    }

    /// Decode the ttl of a probe sent on a known connection.
    ///
    /// A probe with ttl `t` has a wire length `w` in the range
    /// `[k + t * h + min, k + t * h + max]` where `k` is the connection floor
    /// plus the header size and `h` the hop multiplier, therefore
    /// `ceil((w - k - max) / h) <= t <= floor((w - k - min) / h)`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConnection` if the connection hash is out of range.
    #[instrument(skip(self), level = "trace")]
    pub fn decode(&self, connection: ConnectionHash, wire_length: u16) -> Result<Decoded> {
        self.encoding.check_connection(connection)?;
        let encoder = self.encoding.encoder();
        let overhead = self.encoding.overhead();
        let floor = i64::from(encoder.connection_floor(connection))
            + i64::from(self.encoding.header_size());
        let hop = i64::from(encoder.hop_multiplier());
        let offset = i64::from(wire_length) - floor;
        let lowest = div_ceil(offset - i64::from(overhead.max()), hop)
            .max(i64::from(self.encoding.first_ttl().0));
        let highest = (offset - i64::from(overhead.min()))
            .div_euclid(hop)
            .min(i64::from(self.encoding.max_ttl().0));
        let decoded = match highest - lowest {
            n if n < 0 => Decoded::Unmatched,
            0 => Decoded::Hop(TimeToLive(lowest as u8)),
            _ => Decoded::Ambiguous(
                (lowest..=highest)
                    .map(|ttl| TimeToLive(ttl as u8))
                    .collect(),
            ),
        };
        tracing::trace!(?decoded);
        Ok(decoded)
    }

    /// Find every connection and ttl which could have produced a wire length.
    ///
    /// Useful when the connection a reply belongs to is not known; the
    /// result is unique only for an encoding which is collision free across
    /// connections.
    #[must_use]
    pub fn decode_any(&self, wire_length: u16) -> Vec<(ConnectionHash, TimeToLive)> {
        self.encoding
            .connections()
            .flat_map(|connection| {
                let ttls = match self.decode(connection, wire_length) {
                    Ok(Decoded::Hop(ttl)) => vec![ttl],
                    Ok(Decoded::Ambiguous(ttls)) => ttls,
                    Ok(Decoded::Unmatched) | Err(_) => vec![],
                };
                ttls.into_iter().map(move |ttl| (connection, ttl))
            })
            .collect()
    }
}

/// Integer division rounding towards positive infinity, for a positive divisor.
const fn div_ceil(dividend: i64, divisor: i64) -> i64 {
    -((-dividend).div_euclid(divisor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Builder, CollisionScope, Error};
    use test_case::test_case;

    #[test_case(0, 238, Decoded::Hop(TimeToLive(1)); "bottom of first hop")]
    #[test_case(0, 268, Decoded::Hop(TimeToLive(1)); "top of first hop")]
    #[test_case(0, 288, Decoded::Hop(TimeToLive(2)); "bottom of second hop")]
    #[test_case(0, 1718, Decoded::Hop(TimeToLive(30)); "top of last hop")]
    #[test_case(9, 1111, Decoded::Hop(TimeToLive(1)); "last connection first hop")]
    #[test_case(0, 237, Decoded::Unmatched; "below first hop")]
    #[test_case(0, 270, Decoded::Unmatched; "between hops")]
    #[test_case(0, 1719, Decoded::Unmatched; "above last hop")]
    #[test_case(0, 10, Decoded::Unmatched; "tiny")]
    #[allow(clippy::needless_pass_by_value)]
    fn test_decode_reference(connection: u16, wire_length: u16, expected: Decoded) {
        let decoder = Decoder::new(Encoding::default());
        assert_eq!(
            expected,
            decoder
                .decode(ConnectionHash(connection), wire_length)
                .unwrap()
        );
    }

    #[test]
    fn test_decode_ambiguous() {
        let encoding = Encoding::default().with_hop_multiplier(3).unwrap();
        let decoder = Decoder::new(encoding);
        assert_eq!(
            Decoded::Ambiguous((1..=4).map(TimeToLive).collect()),
            decoder.decode(ConnectionHash(0), 200).unwrap()
        );
    }

    #[test]
    fn test_decode_every_length() {
        let encoding = Encoding::default();
        let decoder = Decoder::new(encoding);
        for connection in encoding.connections() {
            for ttl in (1..=30).map(TimeToLive) {
                let range = encoding.wire_length_range(connection, ttl).unwrap();
                for len in range.low()..=range.high() {
                    assert_eq!(
                        Decoded::Hop(ttl),
                        decoder.decode(connection, len as u16).unwrap()
                    );
                }
            }
        }
    }

    #[test]
    fn test_decode_invalid_connection() {
        let decoder = Decoder::new(Encoding::default());
        let err = decoder.decode(ConnectionHash(10), 238).unwrap_err();
        assert!(matches!(err, Error::InvalidConnection { .. }));
    }

    #[test]
    fn test_decode_any() {
        let decoder = Decoder::new(Encoding::default());
        assert_eq!(
            vec![(ConnectionHash(0), TimeToLive(1))],
            decoder.decode_any(238)
        );
        // connection 0 ttl 4 spans 388-418 and connection 1 ttl 2 spans 385-415
        assert_eq!(
            vec![
                (ConnectionHash(0), TimeToLive(4)),
                (ConnectionHash(1), TimeToLive(2))
            ],
            decoder.decode_any(400)
        );
    }

    #[test]
    fn test_decode_any_across_connections() {
        let encoding = Builder::new()
            .conn_id_multiplier(2000)
            .scope(CollisionScope::AcrossConnections)
            .build()
            .unwrap();
        assert!(encoding.verify().is_collision_free());
        let decoder = Decoder::new(encoding);
        for connection in encoding.connections() {
            for ttl in (1..=30).map(TimeToLive) {
                let range = encoding.wire_length_range(connection, ttl).unwrap();
                assert_eq!(
                    vec![(connection, ttl)],
                    decoder.decode_any(range.low() as u16)
                );
            }
        }
    }
}
