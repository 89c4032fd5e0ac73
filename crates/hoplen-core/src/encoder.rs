use crate::config::defaults;
use crate::types::{ConnectionHash, ProbeSize, TimeToLive};

/// Map a connection and ttl to a probe payload size.
///
/// Implementations must be pure and strictly increasing in `ttl` for a
/// fixed connection; the verifier relies on this to detect overlap with a
/// single comparison per pair.
pub trait Encoder {
    /// The payload size of the probe sent on `connection` with `ttl`.
    fn encode(&self, connection: ConnectionHash, ttl: TimeToLive) -> ProbeSize;
}

impl<E: Encoder + ?Sized> Encoder for &E {
    fn encode(&self, connection: ConnectionHash, ttl: TimeToLive) -> ProbeSize {
        (**self).encode(connection, ttl)
    }
}

/// The linear probe size encoding.
///
/// `size = base_size + connection * conn_id_multiplier + ttl * hop_multiplier`
///
/// The `conn_id_multiplier` places each connection in its own band of sizes
/// and the `hop_multiplier` spaces consecutive hops of one connection apart.
/// The `hop_multiplier` must exceed the overhead jitter for hops to remain
/// distinguishable on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearEncoder {
    base_size: u32,
    conn_id_multiplier: u32,
    hop_multiplier: u32,
}

impl LinearEncoder {
    #[must_use]
    pub const fn new(base_size: u32, conn_id_multiplier: u32, hop_multiplier: u32) -> Self {
        Self {
            base_size,
            conn_id_multiplier,
            hop_multiplier,
        }
    }

    #[must_use]
    pub const fn base_size(&self) -> u32 {
        self.base_size
    }

    #[must_use]
    pub const fn conn_id_multiplier(&self) -> u32 {
        self.conn_id_multiplier
    }

    #[must_use]
    pub const fn hop_multiplier(&self) -> u32 {
        self.hop_multiplier
    }

    /// The size of the lowest probe (ttl zero) of a connection.
    pub(crate) fn connection_floor(&self, connection: ConnectionHash) -> u32 {
        self.base_size
            .saturating_add(u32::from(connection.0).saturating_mul(self.conn_id_multiplier))
    }
}

impl Default for LinearEncoder {
    fn default() -> Self {
        Self::new(
            defaults::DEFAULT_BASE_SIZE,
            defaults::DEFAULT_CONN_ID_MULTIPLIER,
            defaults::DEFAULT_HOP_MULTIPLIER,
        )
    }
}

impl Encoder for LinearEncoder {
    /// Arithmetic saturates; an `Encoding` is only built when the largest
    /// wire length fits in a `u16` and so saturation never occurs there.
    fn encode(&self, connection: ConnectionHash, ttl: TimeToLive) -> ProbeSize {
        ProbeSize(
            self.connection_floor(connection)
                .saturating_add(u32::from(ttl.0).saturating_mul(self.hop_multiplier)),
        )
    }
}
