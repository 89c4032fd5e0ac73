use anyhow::anyhow;
use clap::ValueEnum;
use clap_complete::Shell;
use file::ConfigFile;
use hoplen_core::{defaults, Builder, CollisionScope, Encoding};
use itertools::Itertools;
use serde::Deserialize;

mod cmd;
mod constants;
mod file;

pub use cmd::Args;
pub use constants::SPACING_SAMPLE_TTLS;

/// The report mode.
#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Generate a pretty text table report.
    Pretty,
    /// Generate a Markdown text table report.
    Markdown,
    /// Generate a JSON report.
    Json,
    /// Generate a CSV report.
    Csv,
    /// Do not generate any output, only the exit status.
    Silent,
}

/// Which probes must have distinct wire lengths.
#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScopeConfig {
    /// Only probes of the same connection are compared.
    WithinConnection,
    /// Probes of different connections are compared as well.
    AcrossConnections,
}

impl From<CollisionScope> for ScopeConfig {
    fn from(value: CollisionScope) -> Self {
        match value {
            CollisionScope::WithinConnection => Self::WithinConnection,
            CollisionScope::AcrossConnections => Self::AcrossConnections,
        }
    }
}

impl From<ScopeConfig> for CollisionScope {
    fn from(value: ScopeConfig) -> Self {
        match value {
            ScopeConfig::WithinConnection => Self::WithinConnection,
            ScopeConfig::AcrossConnections => Self::AcrossConnections,
        }
    }
}

/// How to format log data.
#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogFormat {
    /// Display log data in a compact format.
    Compact,
    /// Display log data in a pretty format.
    Pretty,
    /// Display log data in a json format.
    Json,
}

/// How to log event spans.
#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogSpanEvents {
    /// Do not display event spans.
    Off,
    /// Display enter and exit event spans.
    Active,
    /// Display all event spans.
    Full,
}

/// The action to perform.
#[derive(Debug, Eq, PartialEq)]
pub enum HoplenAction {
    /// Verify and report the candidate encodings.
    Hoplen(HoplenConfig),
    /// Print a template toml config file and exit.
    PrintConfigTemplate,
    /// Generate shell completion and exit.
    PrintShellCompletions(Shell),
    /// Generate a man page and exit.
    PrintManPage,
}

impl HoplenAction {
    pub fn from(args: Args) -> anyhow::Result<Self> {
        Ok(if args.print_config_template {
            Self::PrintConfigTemplate
        } else if let Some(shell) = args.generate {
            Self::PrintShellCompletions(shell)
        } else if args.generate_man {
            Self::PrintManPage
        } else {
            Self::Hoplen(HoplenConfig::from(args)?)
        })
    }
}

/// Fully parsed and validated configuration.
///
/// The `encoding` carries the first candidate hop multiplier; every other
/// candidate differs from it only in the hop multiplier.
#[derive(Debug, Eq, PartialEq)]
pub struct HoplenConfig {
    pub encoding: Encoding,
    pub candidates: Vec<u32>,
    pub mode: Mode,
    pub max_examples: usize,
    pub concurrent_connections: Option<usize>,
    pub verbose: bool,
    pub log_format: LogFormat,
    pub log_filter: String,
    pub log_span_events: LogSpanEvents,
}

impl HoplenConfig {
    pub fn from(args: Args) -> anyhow::Result<Self> {
        let cfg_file = if let Some(cfg) = &args.config_file {
            file::read_config_file(cfg)?
        } else {
            file::read_default_config_file()?.unwrap_or_default()
        };
        Self::build_config(args, cfg_file)
    }

    /// The encoding of every candidate, in order.
    pub fn candidate_encodings(&self) -> anyhow::Result<Vec<Encoding>> {
        self.candidates
            .iter()
            .map(|&hop_multiplier| Ok(self.encoding.with_hop_multiplier(hop_multiplier)?))
            .collect()
    }

    #[allow(clippy::too_many_lines)]
    fn build_config(args: Args, cfg_file: ConfigFile) -> anyhow::Result<Self> {
        let cfg_file_hoplen = cfg_file.hoplen.unwrap_or_default();
        let cfg_file_encoding = cfg_file.encoding.unwrap_or_default();
        let cfg_file_report = cfg_file.report.unwrap_or_default();
        let mode = cfg_layer(args.mode, cfg_file_hoplen.mode, constants::DEFAULT_MODE);
        let verbose = args.verbose;
        let log_format = cfg_layer(
            args.log_format,
            cfg_file_hoplen.log_format,
            constants::DEFAULT_LOG_FORMAT,
        );
        let log_filter = cfg_layer(
            args.log_filter,
            cfg_file_hoplen.log_filter,
            String::from(constants::DEFAULT_LOG_FILTER),
        );
        let log_span_events = cfg_layer(
            args.log_span_events,
            cfg_file_hoplen.log_span_events,
            constants::DEFAULT_LOG_SPAN_EVENTS,
        );
        let base_size = cfg_layer(
            args.base_size,
            cfg_file_encoding.base_size,
            defaults::DEFAULT_BASE_SIZE,
        );
        let conn_id_multiplier = cfg_layer(
            args.conn_id_multiplier,
            cfg_file_encoding.conn_id_multiplier,
            defaults::DEFAULT_CONN_ID_MULTIPLIER,
        );
        let candidates = cfg_layer(
            Some(args.hop_multiplier).filter(|candidates| !candidates.is_empty()),
            cfg_file_encoding.hop_multiplier,
            vec![defaults::DEFAULT_HOP_MULTIPLIER],
        )
        .into_iter()
        .unique()
        .collect_vec();
        let overhead_min = cfg_layer(
            args.overhead_min,
            cfg_file_encoding.overhead_min,
            defaults::DEFAULT_OVERHEAD_MIN,
        );
        let overhead_max = cfg_layer(
            args.overhead_max,
            cfg_file_encoding.overhead_max,
            defaults::DEFAULT_OVERHEAD_MAX,
        );
        let header_size = cfg_layer(
            args.header_size,
            cfg_file_encoding.header_size,
            defaults::DEFAULT_HEADER_SIZE,
        );
        let first_ttl = cfg_layer(
            args.first_ttl,
            cfg_file_encoding.first_ttl,
            defaults::DEFAULT_FIRST_TTL,
        );
        let max_ttl = cfg_layer(
            args.max_ttl,
            cfg_file_encoding.max_ttl,
            defaults::DEFAULT_MAX_TTL,
        );
        let connection_buckets = cfg_layer(
            args.connection_buckets,
            cfg_file_encoding.connection_buckets,
            defaults::DEFAULT_CONNECTION_BUCKETS,
        );
        let scope = cfg_layer(
            args.scope,
            cfg_file_encoding.scope,
            ScopeConfig::from(defaults::DEFAULT_COLLISION_SCOPE),
        );
        let max_examples = cfg_layer(
            args.max_examples,
            cfg_file_report.max_examples,
            constants::DEFAULT_MAX_EXAMPLES,
        );
        let concurrent_connections = cfg_layer_opt(
            args.concurrent_connections,
            cfg_file_report.concurrent_connections,
        );
        let first_candidate = validate_candidates(&candidates)?;
        let encoding = Builder::new()
            .base_size(base_size)
            .conn_id_multiplier(conn_id_multiplier)
            .hop_multiplier(first_candidate)
            .overhead(overhead_min, overhead_max)
            .header_size(header_size)
            .first_ttl(first_ttl)
            .max_ttl(max_ttl)
            .connection_buckets(connection_buckets)
            .scope(CollisionScope::from(scope))
            .build()?;
        let config = Self {
            encoding,
            candidates,
            mode,
            max_examples,
            concurrent_connections,
            verbose,
            log_format,
            log_filter,
            log_span_events,
        };
        config.candidate_encodings()?;
        Ok(config)
    }
}

impl Default for HoplenConfig {
    fn default() -> Self {
        Self {
            encoding: Encoding::default(),
            candidates: vec![defaults::DEFAULT_HOP_MULTIPLIER],
            mode: constants::DEFAULT_MODE,
            max_examples: constants::DEFAULT_MAX_EXAMPLES,
            concurrent_connections: None,
            verbose: false,
            log_format: constants::DEFAULT_LOG_FORMAT,
            log_filter: String::from(constants::DEFAULT_LOG_FILTER),
            log_span_events: constants::DEFAULT_LOG_SPAN_EVENTS,
        }
    }
}

fn cfg_layer<T>(fst: Option<T>, snd: Option<T>, def: T) -> T {
    match (fst, snd) {
        (Some(val), _) | (None, Some(val)) => val,
        (None, None) => def,
    }
}

fn cfg_layer_opt<T>(fst: Option<T>, snd: Option<T>) -> Option<T> {
    match (fst, snd) {
        (Some(val), _) | (None, Some(val)) => Some(val),
        (None, None) => None,
    }
}

/// Validate the candidate hop multipliers, returning the first.
fn validate_candidates(candidates: &[u32]) -> anyhow::Result<u32> {
    candidates
        .first()
        .copied()
        .ok_or_else(|| anyhow!("hop-multiplier must name at least one candidate"))
}
