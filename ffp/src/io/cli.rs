use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

/// Arranges the items of an instance on its bed with the First Fit Placer
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Instance to arrange, in JSON
    #[arg(short, long, value_name = "FILE")]
    pub input_file: PathBuf,
    /// Folder to write the solution (JSON) and its drawing (SVG) to, created if missing
    #[arg(short, long, value_name = "FOLDER")]
    pub solution_folder: PathBuf,
    #[arg(short, long, value_name = "FILE")]
    pub config_file: Option<PathBuf>,
    #[arg(
        short,
        long,
        value_name = "[off, error, warn, info, debug, trace]",
        default_value = "info"
    )]
    pub log_level: LevelFilter,
}
