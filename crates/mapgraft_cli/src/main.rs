//! Command-line front end: import source scene descriptions and write
//! placement records as JSON lines.
//!
//! Run with: cargo run -- --bounds bounds.json --lights maps/edz_info.cfg

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use mapgraft_core::{
    BoundsTable, FsSupplier, ImportConfig, Importer, JsonLinesSink, RunReporter, RunSummary,
};

#[derive(Parser, Debug)]
#[command(name = "mapgraft", version, about = "Import scene descriptions as placement records")]
struct Args {
    /// Source scene descriptions (`*_info.cfg`)
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// JSON import config; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON table of model bounds used for detail geometry classification
    #[arg(long)]
    bounds: Option<PathBuf>,

    /// Write records here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Seed for random render colours
    #[arg(long)]
    seed: Option<u64>,

    /// Skip static models
    #[arg(long)]
    no_objects: bool,

    /// Give every entry its own base placement
    #[arg(long)]
    no_instancing: bool,

    /// Do not set detail geometry / occluder flags from model size
    #[arg(long)]
    no_autoset_detail: bool,

    /// Force terrain onto the dev material
    #[arg(long)]
    override_terrain_materials: bool,

    /// Force everything onto the dev material with random colours
    #[arg(long)]
    override_all_materials: bool,

    /// Import lights
    #[arg(long)]
    lights: bool,

    /// Import cubemaps as light probe volumes
    #[arg(long)]
    cubemaps: bool,
}

impl Args {
    fn import_config(&self) -> Result<ImportConfig> {
        let mut config = match &self.config {
            Some(path) => ImportConfig::from_json_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => ImportConfig::default(),
        };

        if self.no_objects {
            config.import_objects = false;
        }
        if self.no_instancing {
            config.instance_objects = false;
        }
        if self.no_autoset_detail {
            config.autoset_detail = false;
        }
        if self.override_terrain_materials {
            config.override_terrain_materials = true;
        }
        if self.override_all_materials {
            config.override_all_materials = true;
        }
        if self.lights {
            config.import_lights = true;
        }
        if self.cubemaps {
            config.import_cubemaps = true;
        }

        Ok(config)
    }

    fn bounds_table(&self) -> Result<BoundsTable> {
        match &self.bounds {
            Some(path) => BoundsTable::from_json_file(path)
                .with_context(|| format!("Failed to load bounds table {}", path.display())),
            None => {
                log::warn!("No bounds table given; every model will be treated as large");
                Ok(BoundsTable::new())
            }
        }
    }
}

/// Prints the run summary to stderr.
struct ConsoleReporter;

impl RunReporter for ConsoleReporter {
    fn report(&mut self, summary: &RunSummary) {
        eprintln!(
            "Imported {} files in {:.2} seconds",
            summary.files_processed,
            summary.elapsed.as_secs_f64()
        );
        eprintln!(
            "  {} bases, {} instances, {} lights, {} probe volumes",
            summary.bases, summary.instances, summary.lights, summary.probe_volumes
        );
        if summary.files_failed > 0 || summary.skipped_entries > 0 || summary.rejected_groups > 0 {
            eprintln!(
                "  {} files failed, {} entries skipped, {} groups rejected",
                summary.files_failed, summary.skipped_entries, summary.rejected_groups
            );
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = args.import_config()?;
    let bounds = args.bounds_table()?;

    log::info!("Import config: {:?}", config);

    let writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    let mut sink = JsonLinesSink::new(BufWriter::new(writer));

    let mut importer = Importer::new(&config, &bounds);
    if let Some(seed) = args.seed {
        importer = importer.with_seed(seed);
    }

    let summary = importer.run(&args.files, &FsSupplier, &mut sink, &mut ConsoleReporter);
    sink.into_inner().context("Failed to flush output")?;

    if summary.files_processed == 0 {
        anyhow::bail!("No files were imported");
    }

    Ok(())
}
