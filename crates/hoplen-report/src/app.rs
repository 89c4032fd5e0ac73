use crate::config::{HoplenConfig, LogFormat, LogSpanEvents, Mode};
use crate::report;
use anyhow::anyhow;
use itertools::Itertools;
use tracing_subscriber::fmt::format::FmtSpan;

/// Run the hoplen application.
///
/// Returns an error naming the failing hop multipliers if any candidate
/// has collisions.
pub fn run_hoplen(cfg: &HoplenConfig) -> anyhow::Result<()> {
    configure_logging(cfg);
    tracing::debug!(?cfg, "starting");
    let report = report::evaluate(cfg)?;
    match cfg.mode {
        Mode::Pretty => report::table::report_pretty(&report),
        Mode::Markdown => report::table::report_md(&report),
        Mode::Json => report::json::report(&report, std::io::stdout())?,
        Mode::Csv => report::csv::report(&report, std::io::stdout())?,
        Mode::Silent => report::silent::report(&report),
    }
    let failing = report.failing().collect_vec();
    if failing.is_empty() {
        Ok(())
    } else {
        Err(anyhow!(
            "collisions found for hop multiplier {}",
            failing.iter().join(", ")
        ))
    }
}

/// Log to stderr so that reports written to stdout are not interleaved.
fn configure_logging(cfg: &HoplenConfig) {
    if cfg.verbose {
        let fmt_span = match cfg.log_span_events {
            LogSpanEvents::Off => FmtSpan::NONE,
            LogSpanEvents::Active => FmtSpan::ACTIVE,
            LogSpanEvents::Full => FmtSpan::FULL,
        };
        match cfg.log_format {
            LogFormat::Compact => {
                tracing_subscriber::fmt()
                    .with_writer(std::io::stderr)
                    .with_span_events(fmt_span)
                    .with_env_filter(&cfg.log_filter)
                    .compact()
                    .init();
            }
            LogFormat::Pretty => {
                tracing_subscriber::fmt()
                    .with_writer(std::io::stderr)
                    .with_span_events(fmt_span)
                    .with_env_filter(&cfg.log_filter)
                    .pretty()
                    .init();
            }
            LogFormat::Json => {
                tracing_subscriber::fmt()
                    .with_writer(std::io::stderr)
                    .with_span_events(fmt_span)
                    .with_env_filter(&cfg.log_filter)
                    .json()
                    .init();
            }
        }
    }
}
