mod commands;
mod common;
mod menu;
mod ui;

use clap::{Parser, ValueHint};
use std::path::PathBuf;

use crate::commands::{Commands, GlobalOptions, handle_command};
use crate::common::distro::OperatingSystem;
use crate::ui::prelude::*;

/// Linux setup: install, switch and remove software across distributions
#[derive(Parser, Debug)]
#[command(name = "linux-setup", author, version, about, long_about = None)]
struct Cli {
    /// Activate debug mode
    #[arg(short, long, global = true)]
    debug: bool,

    /// Emit machine-readable JSON events
    #[arg(long, global = true)]
    json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Config file (defaults to ~/.config/linux-setup/config.toml)
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Pretend to run on this distribution (read-only commands)
    #[arg(long, global = true)]
    distro: Option<OperatingSystem>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn main() {
    let cli = Cli::parse();

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    ui::init(format, !cli.no_color && !cli.json);
    ui::set_debug_mode(cli.debug);

    let options = GlobalOptions {
        config: cli.config,
        distro: cli.distro,
    };

    let code = match handle_command(cli.command.unwrap_or(Commands::Menu), &options) {
        Ok(code) => code,
        Err(e) => {
            emit(Level::Error, "error", &format!("Error: {:#}", e), None);
            1
        }
    };
    std::process::exit(code);
}
