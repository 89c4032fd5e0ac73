use crate::config::{LogFormat, LogSpanEvents, Mode, ScopeConfig};
use clap::builder::Styles;
use clap::Parser;
use clap_complete::Shell;

/// Verify that traceroute probe sizes decode to a unique hop
#[derive(Parser, Debug)]
#[command(name = "hoplen", author, version, about, long_about = None, styles=Styles::styled())]
pub struct Args {
    /// Config file
    #[arg(value_enum, short = 'c', long, value_hint = clap::ValueHint::FilePath)]
    pub config_file: Option<String>,

    /// Output mode [default: pretty]
    #[arg(value_enum, short = 'm', long)]
    pub mode: Option<Mode>,

    /// The payload size of the first probe before connection and ttl spacing [default: 100]
    #[arg(long)]
    pub base_size: Option<u32>,

    /// The size spacing between connection hash buckets [default: 97]
    #[arg(long)]
    pub conn_id_multiplier: Option<u32>,

    /// Candidate size spacings between consecutive ttls, comma separated [default: 50]
    #[arg(short = 'H', long, value_delimiter = ',')]
    pub hop_multiplier: Vec<u32>,

    /// The minimum number of bytes added by the wrapping layer [default: 80]
    #[arg(long)]
    pub overhead_min: Option<u32>,

    /// The maximum number of bytes added by the wrapping layer [default: 110]
    #[arg(long)]
    pub overhead_max: Option<u32>,

    /// The transport header size added on the wire [default: 8]
    #[arg(long)]
    pub header_size: Option<u32>,

    /// The TTL to start from [default: 1]
    #[arg(short = 'f', long)]
    pub first_ttl: Option<u8>,

    /// The maximum number of TTL hops [default: 30]
    #[arg(short = 't', long)]
    pub max_ttl: Option<u8>,

    /// The number of connection hash buckets [default: 10]
    #[arg(short = 'B', long)]
    pub connection_buckets: Option<u16>,

    /// Which probes must have distinct wire lengths [default: within-connection]
    #[arg(value_enum, short = 's', long)]
    pub scope: Option<ScopeConfig>,

    /// The maximum number of colliding pairs to show per candidate [default: 3]
    #[arg(short = 'e', long)]
    pub max_examples: Option<usize>,

    /// The expected number of concurrent connections, checked against the hash buckets
    #[arg(long)]
    pub concurrent_connections: Option<usize>,

    /// Generate shell completion
    #[arg(long)]
    pub generate: Option<Shell>,

    /// Generate ROFF man page
    #[arg(long)]
    pub generate_man: bool,

    /// Print a template toml config file and exit
    #[arg(long)]
    pub print_config_template: bool,

    /// The debug log format [default: pretty]
    #[arg(long)]
    pub log_format: Option<LogFormat>,

    /// The debug log filter [default: hoplen=debug]
    #[arg(long)]
    pub log_filter: Option<String>,

    /// The debug log format [default: off]
    #[arg(long)]
    pub log_span_events: Option<LogSpanEvents>,

    /// Enable verbose debug logging
    #[arg(short = 'v', long, default_value_t = false)]
    pub verbose: bool,
}
