//! Hoplen - probe size encoding for connection-aware traceroute.
//!
//! A traceroute which runs inside an existing connection cannot mark its
//! probes with distinct ports or sequence numbers.  Instead every probe is
//! given a payload size which encodes the connection hash bucket and the
//! ttl it was sent with, and the ttl is recovered from the length of the
//! original datagram quoted back in the ICMP error.
//!
//! The wrapping layer (i.e. encryption and padding) adds a bounded but
//! unpredictable number of bytes to every probe so each probe maps to a
//! range of wire lengths.  This crate computes those ranges and verifies
//! that the encoding keeps them disjoint.
//!
//! # Example
//!
//! The following example verifies the reference encoding and decodes a
//! wire length:
//!
//! ```
//! # fn main() -> anyhow::Result<()> {
//! use hoplen_core::{ConnectionHash, Decoded, Decoder, Encoding, TimeToLive};
//!
//! let encoding = Encoding::default();
//! let report = encoding.verify();
//! assert!(report.is_collision_free());
//! assert_eq!(Some(20), report.min_gap());
//!
//! let decoded = Decoder::new(encoding).decode(ConnectionHash(3), 740)?;
//! assert_eq!(Decoded::Hop(TimeToLive(5)), decoded);
//! # Ok(())
//! # }
//! ```
//!
//! The following example shows that a hop multiplier narrower than the
//! overhead jitter is rejected by the verifier:
//!
//! ```
//! # fn main() -> anyhow::Result<()> {
//! use hoplen_core::Builder;
//!
//! let encoding = Builder::new().hop_multiplier(3).build()?;
//! let verdict = encoding.verify().verdict(3);
//! assert!(!verdict.ok);
//! assert_eq!(Some(-27), verdict.gap);
//! # Ok(())
//! # }
//! ```
//!
//! # See Also
//!
//! - [`Builder`] - Build an [`Encoding`].
//! - [`Encoding::verify`] - Verify an encoding for collisions.
//! - [`Decoder::decode`] - Recover the ttl from a wire length.
#![warn(clippy::all, clippy::pedantic, clippy::nursery, rust_2018_idioms)]
#![allow(
    clippy::module_name_repetitions,
    clippy::option_if_let_else,
    clippy::missing_const_for_fn,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    clippy::missing_errors_doc
)]
#![deny(unsafe_code)]

mod builder;
mod config;
mod constants;
mod decoder;
mod encoder;
mod encoding;
mod error;
mod projector;
mod report;
mod types;
mod verifier;

pub use builder::Builder;
pub use config::{defaults, CollisionScope};
pub use constants::{MAX_TTL, MAX_WIRE_LENGTH, UDP_HEADER_SIZE};
pub use decoder::{Decoded, Decoder};
pub use encoder::{Encoder, LinearEncoder};
pub use encoding::Encoding;
pub use error::{Error, Result};
pub use projector::project;
pub use report::{Collision, CollisionReport, ProbeLength, Verdict};
pub use types::{ConnectionHash, OverheadBounds, ProbeSize, TimeToLive, WireLengthRange};
pub use verifier::{verify, verify_across, verify_connection};
