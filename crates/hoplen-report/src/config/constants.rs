use crate::config::{LogFormat, LogSpanEvents, Mode};

/// The default value for `mode`.
pub const DEFAULT_MODE: Mode = Mode::Pretty;

/// The default value for `log-format`.
pub const DEFAULT_LOG_FORMAT: LogFormat = LogFormat::Pretty;

/// The default value for `log-span-events`.
pub const DEFAULT_LOG_SPAN_EVENTS: LogSpanEvents = LogSpanEvents::Off;

/// The default value for `log-filter`.
pub const DEFAULT_LOG_FILTER: &str = "hoplen=debug";

/// The default value for `max-examples`.
pub const DEFAULT_MAX_EXAMPLES: usize = 3;

/// The ttls sampled when showing the spacing of a collision free candidate.
pub const SPACING_SAMPLE_TTLS: [u8; 6] = [1, 2, 3, 10, 20, 30];
