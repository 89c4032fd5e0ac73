use crate::types::{ConnectionHash, ProbeSize, TimeToLive, WireLengthRange};

/// A single probe and the range of lengths it may have on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeLength {
    pub connection: ConnectionHash,
    pub ttl: TimeToLive,
    pub size: ProbeSize,
    pub wire: WireLengthRange,
}

/// Two probes whose wire length ranges overlap.
///
/// The `lower` probe is the one whose range starts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collision {
    pub lower: ProbeLength,
    pub upper: ProbeLength,
}

impl Collision {
    /// Whether the colliding probes belong to different connections.
    #[must_use]
    pub fn is_cross_connection(&self) -> bool {
        self.lower.connection != self.upper.connection
    }
}

/// The outcome of a collision verification.
///
/// Reports for disjoint sets of connections may be combined with
/// [`CollisionReport::merge`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionReport {
    collisions: Vec<Collision>,
    probes: usize,
    min_gap: Option<i64>,
}

impl CollisionReport {
    pub(crate) const fn new(
        collisions: Vec<Collision>,
        probes: usize,
        min_gap: Option<i64>,
    ) -> Self {
        Self {
            collisions,
            probes,
            min_gap,
        }
    }

    /// All colliding pairs, in the order they were found.
    #[must_use]
    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }

    /// The colliding pairs involving a given connection.
    pub fn collisions_for(&self, connection: ConnectionHash) -> impl Iterator<Item = &Collision> {
        self.collisions.iter().filter(move |collision| {
            collision.lower.connection == connection || collision.upper.connection == connection
        })
    }

    /// The total number of colliding pairs.
    #[must_use]
    pub fn total(&self) -> usize {
        self.collisions.len()
    }

    /// The number of colliding pairs which span two connections.
    #[must_use]
    pub fn cross_connection_total(&self) -> usize {
        self.collisions
            .iter()
            .filter(|collision| collision.is_cross_connection())
            .count()
    }

    /// The number of probes examined.
    #[must_use]
    pub const fn probes(&self) -> usize {
        self.probes
    }

    /// The smallest gap observed between adjacent ttls of any connection.
    ///
    /// This is `None` if no connection had at least two ttls.
    #[must_use]
    pub const fn min_gap(&self) -> Option<i64> {
        self.min_gap
    }

    /// Whether no colliding pairs were found.
    #[must_use]
    pub fn is_collision_free(&self) -> bool {
        self.collisions.is_empty()
    }

    /// Combine two reports.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        self.collisions.extend(other.collisions);
        self.probes += other.probes;
        self.min_gap = match (self.min_gap, other.min_gap) {
            (Some(fst), Some(snd)) => Some(fst.min(snd)),
            (fst, snd) => fst.or(snd),
        };
        self
    }

    pub(crate) fn with_collisions(mut self, collisions: Vec<Collision>) -> Self {
        self.collisions.extend(collisions);
        self
    }

    /// Summarise the report, keeping at most `max_examples` colliding pairs.
    #[must_use]
    pub fn verdict(&self, max_examples: usize) -> Verdict {
        Verdict {
            ok: self.is_collision_free(),
            total_collisions: self.total(),
            collisions: self.collisions.iter().take(max_examples).copied().collect(),
            gap: self.min_gap,
        }
    }
}

/// A bounded summary of a [`CollisionReport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub ok: bool,
    pub total_collisions: usize,
    pub collisions: Vec<Collision>,
    pub gap: Option<i64>,
}
