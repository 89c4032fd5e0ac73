use std::fmt::{Display, Formatter};

/// Default values for configuration.
///
/// These are the reference values of the probe size encoding.
pub mod defaults {
    use crate::config::CollisionScope;
    use crate::constants::UDP_HEADER_SIZE;

    /// The default value for `base-size`.
    pub const DEFAULT_BASE_SIZE: u32 = 100;

    /// The default value for `conn-id-multiplier`.
    pub const DEFAULT_CONN_ID_MULTIPLIER: u32 = 97;

    /// The default value for `hop-multiplier`.
    pub const DEFAULT_HOP_MULTIPLIER: u32 = 50;

    /// The default value for `overhead-min`.
    pub const DEFAULT_OVERHEAD_MIN: u32 = 80;

    /// The default value for `overhead-max`.
    pub const DEFAULT_OVERHEAD_MAX: u32 = 110;

    /// The default value for `header-size`.
    pub const DEFAULT_HEADER_SIZE: u32 = UDP_HEADER_SIZE;

    /// The default value for `first-ttl`.
    pub const DEFAULT_FIRST_TTL: u8 = 1;

    /// The default value for `max-ttl`.
    pub const DEFAULT_MAX_TTL: u8 = 30;

    /// The default value for `connection-buckets`.
    pub const DEFAULT_CONNECTION_BUCKETS: u16 = 10;

    /// The default value for `scope`.
    pub const DEFAULT_COLLISION_SCOPE: CollisionScope = CollisionScope::WithinConnection;
}

/// Which pairs of probes must have disjoint wire lengths.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CollisionScope {
    /// Only probes of the same connection are compared.
    ///
    /// Decoding is assumed to always happen in the context of a known
    /// connection.
    WithinConnection,
    /// Probes of different connections are compared as well.
    ///
    /// Required when a reply must be matched without knowing which
    /// connection it belongs to.
    AcrossConnections,
}

impl Display for CollisionScope {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WithinConnection => write!(f, "within-connection"),
            Self::AcrossConnections => write!(f, "across-connections"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_display() {
        assert_eq!(
            "within-connection",
            CollisionScope::WithinConnection.to_string()
        );
        assert_eq!(
            "across-connections",
            CollisionScope::AcrossConnections.to_string()
        );
    }
}
