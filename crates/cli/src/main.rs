// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! sg - startgate CLI

mod commands;
mod error;
mod logging;
mod output;
mod simulate;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{names, run};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "sg",
    version,
    about = "startgate - Hold services back until initial deployments are installed"
)]
struct Cli {
    /// Log filter, overrides RUST_LOG (e.g. "debug", "sg_engine=trace")
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulated startup episode from a config file
    Run(run::RunArgs),
    /// Print the deployment names a config waits for
    Names(names::NamesArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let guard = match logging::setup_logging(cli.log_level.as_deref(), cli.log_file.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("error: {:#}", e);
            std::process::exit(1);
        }
    };

    let result = dispatch(cli.command).await;
    if let Err(e) = &result {
        error::report(e);
    }
    // Flush the log file before exiting
    drop(guard);
    if result.is_err() {
        std::process::exit(1);
    }
}

async fn dispatch(command: Commands) -> Result<()> {
    match command {
        Commands::Run(args) => run::run(args).await,
        Commands::Names(args) => names::names(args),
    }
}
