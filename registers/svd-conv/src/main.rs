// Licensed under the Apache-2.0 license

//! `svd-conv`: convert between C register headers and CMSIS-SVD.

mod header_to_svd;
mod io;
mod svd_to_header;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;
use registers_svd::config::{
    DEFAULT_DEVICE_DESCRIPTION, DEFAULT_DEVICE_NAME, DEFAULT_INCLUDE_GUARD,
};
use simple_logger::SimpleLogger;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "svd-conv",
    author,
    version,
    about = "Convert between C register headers and CMSIS-SVD"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log more; repeat for debug output
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rebuild the register tree from a header and write it as SVD
    HeaderToSvd {
        /// Header file to read; stdin when omitted
        #[arg(value_name = "HEADER")]
        header: Option<PathBuf>,

        /// Output SVD file; stdout when omitted
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Device name written to the SVD
        #[arg(short = 'n', long = "device-name", default_value = DEFAULT_DEVICE_NAME)]
        device_name: String,

        /// Device description written to the SVD
        #[arg(short = 'd', long = "device-description", default_value = DEFAULT_DEVICE_DESCRIPTION)]
        device_description: String,
    },
    /// Read an SVD file and write a header of register and field macros
    SvdToHeader {
        /// SVD file to read
        #[arg(value_name = "SVD")]
        svd: PathBuf,

        /// Output header file; stdout when omitted
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Include guard macro of the generated header
        #[arg(long, value_name = "MACRO", default_value = DEFAULT_INCLUDE_GUARD)]
        include_guard: String,
    },
}

fn log_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    SimpleLogger::new().with_level(log_level(cli.verbose)).init()?;

    match cli.command {
        Commands::HeaderToSvd {
            header,
            output,
            device_name,
            device_description,
        } => header_to_svd::convert(
            header.as_deref(),
            output.as_deref(),
            &device_name,
            &device_description,
        ),
        Commands::SvdToHeader {
            svd,
            output,
            include_guard,
        } => svd_to_header::convert(&svd, output.as_deref(), &include_guard),
    }
}
