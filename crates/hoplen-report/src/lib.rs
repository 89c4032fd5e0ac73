#![forbid(unsafe_code)]

use crate::config::HoplenAction;
use clap::Parser;
use config::Args;

mod app;
mod config;
mod print;
mod report;
mod util;

/// Run the hoplen application.
pub fn hoplen() -> anyhow::Result<()> {
    let args = Args::parse();
    match HoplenAction::from(args)? {
        HoplenAction::Hoplen(cfg) => app::run_hoplen(&cfg)?,
        HoplenAction::PrintConfigTemplate => print::print_config_template(),
        HoplenAction::PrintManPage => print::print_man_page()?,
        HoplenAction::PrintShellCompletions(shell) => print::print_shell_completions(shell)?,
    }
    Ok(())
}
