use std::fs;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use arrange_rs::arrange::arrange_with_config;
use arrange_rs::entities::Bed;
use arrange_rs::io::export::export_solution;
use arrange_rs::io::import::import_instance;
use arrange_rs::io::svg::arrangement_to_svg;
use clap::Parser as ClapParser;
use ffp::config::FFPConfig;
use ffp::io::cli::Cli;
use ffp::placer::FirstFitPlacer;
use ffp::{EPOCH, io};
use log::{info, warn};

fn main() -> Result<()> {
    let args = Cli::parse();
    io::init_logger(args.log_level)?;

    let config = match args.config_file {
        None => {
            warn!("[MAIN] No config file provided, use --config-file to provide a custom config");
            FFPConfig::default()
        }
        Some(config_file) => {
            let file = File::open(config_file)?;
            let reader = BufReader::new(file);
            serde_json::from_reader(reader).context("incorrect config file format")?
        }
    };

    info!("[MAIN] Successfully parsed FFPConfig: {config:?}");

    let input_file_stem = args
        .input_file
        .file_stem()
        .and_then(|s| s.to_str())
        .context("input file has no valid name")?;

    if !args.solution_folder.exists() {
        fs::create_dir_all(&args.solution_folder).with_context(|| {
            format!(
                "could not create solution folder: {:?}",
                args.solution_folder
            )
        })?;
    }

    let ext_instance = io::read_json_instance(&args.input_file)?;
    let mut instance = import_instance(&ext_instance)?;

    info!(
        "[MAIN] instance {} imported: {} movable and {} fixed items, min distance {}",
        instance.name,
        instance.movable.len(),
        instance.fixed.len(),
        instance.min_distance
    );

    let success = arrange_with_config::<FirstFitPlacer, _, _>(
        &mut instance.movable,
        &instance.fixed,
        instance.min_distance,
        &instance.bed_hint,
        &config.arrange_config,
        None,
        None,
    )?;

    {
        let solution = export_solution(&instance.name, success, &instance.movable, EPOCH.elapsed());
        let solution_path = args
            .solution_folder
            .join(format!("sol_{input_file_stem}.json"));
        io::write_json(&solution, Path::new(&solution_path))?;
    }

    {
        let bed = Bed::from_hint(&instance.bed_hint)?;
        let svg = arrangement_to_svg(
            &bed,
            &instance.movable,
            &instance.fixed,
            config.svg_draw_options,
        )?;
        let svg_path = args
            .solution_folder
            .join(format!("sol_{input_file_stem}.svg"));
        io::write_svg(&svg, Path::new(&svg_path))?;
    }

    Ok(())
}
