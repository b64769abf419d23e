// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sg names <config>` - Print the expected deployment names

use crate::output::{self, OutputFormat};
use anyhow::Result;
use clap::Args;
use sg_config::TomlNamesSource;
use sg_core::ExpectedNamesSource;
use std::path::PathBuf;

#[derive(Args)]
pub struct NamesArgs {
    /// Startup config file
    pub config: PathBuf,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn names(args: NamesArgs) -> Result<()> {
    let config = super::load_config(&args.config)?;
    let names: Vec<String> = TomlNamesSource::from_config(config)
        .resolve_expected_names()?
        .into_iter()
        .collect();

    output::print_list(&names, OutputFormat::from_json_flag(args.json));
    Ok(())
}
