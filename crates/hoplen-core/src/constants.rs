/// The maximum time-to-live value allowed.
///
/// The IP `ttl` is an u8 (0..255) but since a `ttl` of zero isn't useful we only allow 254 distinct
/// hops (1..255).
pub const MAX_TTL: u8 = 254;

/// The size of a UDP header in bytes.
pub const UDP_HEADER_SIZE: u32 = 8;

/// The largest wire length that can be echoed back in the 16-bit UDP `length` field.
pub const MAX_WIRE_LENGTH: u32 = u16::MAX as u32;
