//! Locobj CLI - Command-line tool for Locomotion industry objects.
//!
//! This is the main entry point for the locobj command-line application.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use locobj::common::ObjectLookup;
use locobj::industry::{ProductionRateRange, MAX_BUILDING_VARIATIONS};
use locobj::prelude::*;

/// Locobj - Locomotion industry object tool
#[derive(Parser)]
#[command(name = "locobj")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log decode steps (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode an industry object and print its contents
    Inspect {
        /// Industry object file (.dat)
        #[arg(short, long, env = "LOCOBJ_INPUT")]
        input: PathBuf,

        /// Directory of objects to treat as loaded when resolving references
        #[arg(long, env = "LOCOBJ_OBJDATA")]
        objdata: Option<PathBuf>,

        /// First image index handed out to image tables
        #[arg(long, env = "LOCOBJ_IMAGE_BASE", default_value_t = 0)]
        image_base: u32,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Decode and validate every industry object under a path
    Validate {
        /// Object file or directory
        #[arg(short, long, env = "LOCOBJ_INPUT")]
        input: PathBuf,

        /// Directory of objects to treat as loaded when resolving references
        #[arg(long, env = "LOCOBJ_OBJDATA")]
        objdata: Option<PathBuf>,
    },

    /// List the objects an industry object references
    Deps {
        /// Industry object file (.dat)
        #[arg(short, long, env = "LOCOBJ_INPUT")]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Inspect {
            input,
            objdata,
            image_base,
            json,
        } => {
            cmd_inspect(&input, objdata.as_deref(), image_base, json)?;
        }
        Commands::Validate { input, objdata } => {
            cmd_validate(&input, objdata.as_deref())?;
        }
        Commands::Deps { input } => {
            cmd_deps(&input)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

/// Every `.dat` file under `path`, or `path` itself when it is a file.
fn dat_files(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        return vec![path.to_path_buf()];
    }

    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!(%err, "skipping directory entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("dat"))
        })
        .collect();
    files.sort();
    files
}

fn load_environment(objdata: Option<&Path>, image_base: u32) -> LoadEnvironment {
    let mut env = LoadEnvironment::with_image_base(image_base);
    if let Some(dir) = objdata {
        let start = Instant::now();
        let registered = env.register_files(dat_files(dir));
        debug!(registered, elapsed = ?start.elapsed(), "registered object data");
    }
    env
}

fn open_object(path: &Path) -> Result<ObjectFile> {
    let file = ObjectFile::open(path)
        .with_context(|| format!("Failed to read object file {}", path.display()))?;
    if let Err(err) = file.verify_checksum() {
        warn!(path = %path.display(), %err, "checksum mismatch");
    }
    Ok(file)
}

#[derive(Serialize)]
struct DependencyReport {
    header: ObjectHeader,
    resolved: Option<LoadedObjectHandle>,
}

#[derive(Serialize)]
struct Names {
    name: String,
    secondary: String,
    closing_down: String,
    up_production: String,
    down_production: String,
    singular: String,
    plural: String,
}

#[derive(Serialize)]
struct IndustryReport {
    header: ObjectHeader,
    valid: bool,
    names: Names,
    num_building_parts: u8,
    num_building_variations: u8,
    part_heights: Vec<u8>,
    variations: Vec<Vec<u8>>,
    buildings: Vec<u8>,
    min_num_buildings: u8,
    max_num_buildings: u8,
    available_colours: u32,
    designed_year: u16,
    obsolete_year: u16,
    total_of_type_in_scenario: u8,
    cost_index: u8,
    cost_factor: i16,
    clear_cost_factor: i16,
    initial_production_rate: [ProductionRateRange; 2],
    flags: u32,
    produced_cargo: String,
    required_cargo: String,
    shadow_image_offset: u32,
    building_image_offset: u32,
    farm_image_offset: u32,
    preview: Vec<PreviewLayer>,
    dependencies: Vec<DependencyReport>,
}

impl IndustryReport {
    fn new(
        header: ObjectHeader,
        industry: &IndustryObject<'_>,
        env: &LoadEnvironment,
        dependencies: &DependentObjects,
    ) -> Self {
        let text = |id: StringId| env.text(id).to_string();
        let cargo_name = |id: u8| {
            let handle = LoadedObjectHandle::new(ObjectType::Cargo, id);
            env.objects
                .header_of(handle)
                .map(|header| header.name())
                .unwrap_or_else(|| format!("cargo #{id}"))
        };

        let variations = (0..industry.num_building_variations.min(MAX_BUILDING_VARIATIONS as u8))
            .map(|variation| industry.building_parts(variation).to_vec())
            .collect();

        Self {
            header,
            valid: industry.validate(),
            names: Names {
                name: text(industry.name),
                secondary: text(industry.name_secondary),
                closing_down: text(industry.name_closing_down),
                up_production: text(industry.name_up_production),
                down_production: text(industry.name_down_production),
                singular: text(industry.name_singular),
                plural: text(industry.name_plural),
            },
            num_building_parts: industry.num_building_parts,
            num_building_variations: industry.num_building_variations,
            part_heights: industry.building_part_heights().to_vec(),
            variations,
            buildings: industry.buildings().to_vec(),
            min_num_buildings: industry.min_num_buildings,
            max_num_buildings: industry.max_num_buildings,
            available_colours: industry.available_colours,
            designed_year: industry.designed_year,
            obsolete_year: industry.obsolete_year,
            total_of_type_in_scenario: industry.total_of_type_in_scenario,
            cost_index: industry.cost_index,
            cost_factor: industry.cost_factor,
            clear_cost_factor: industry.clear_cost_factor,
            initial_production_rate: industry.initial_production_rate,
            flags: industry.flags.bits(),
            produced_cargo: industry.produced_cargo_description(cargo_name),
            required_cargo: industry.required_cargo_description(cargo_name),
            shadow_image_offset: industry.shadow_image_offset,
            building_image_offset: industry.building_image_offset,
            farm_image_offset: industry.farm_image_offset,
            preview: industry.preview_layers(0, 0),
            dependencies: dependencies
                .required
                .iter()
                .map(|&header| DependencyReport {
                    header,
                    resolved: env.objects.find_object_handle(&header),
                })
                .collect(),
        }
    }

    fn print(&self) {
        println!("{}", self.header);
        println!("  Name:            {}", self.names.name);
        println!("  Plural:          {}", self.names.plural);
        println!("  Valid:           {}", self.valid);
        println!("  Parts:           {}", self.num_building_parts);
        println!("  Part heights:    {:?}", self.part_heights);
        println!("  Variations:      {}", self.num_building_variations);
        for (index, parts) in self.variations.iter().enumerate() {
            println!("    [{index:>2}] {parts:?}");
        }
        println!(
            "  Buildings:       {}..={} {:?}",
            self.min_num_buildings, self.max_num_buildings, self.buildings
        );
        println!("  Years:           {}..{}", self.designed_year, self.obsolete_year);
        println!(
            "  Cost:            index {} factor {} clear {}",
            self.cost_index, self.cost_factor, self.clear_cost_factor
        );
        for (index, rate) in self.initial_production_rate.iter().enumerate() {
            println!("  Production {index}:    {}%..{}%", rate.min, rate.max);
        }
        println!("  Flags:           {:#010x}", self.flags);
        println!("  Colours:         {:#010x}", self.available_colours);
        println!("  Produces:        {}", self.produced_cargo);
        println!("  Requires:        {}", self.required_cargo);
        println!(
            "  Images:          shadows {} buildings {} farm {}",
            self.shadow_image_offset, self.building_image_offset, self.farm_image_offset
        );
        println!("  Dependencies:    {}", self.dependencies.len());
        for dependency in &self.dependencies {
            match dependency.resolved {
                Some(handle) => println!("    {} -> id {}", dependency.header, handle.id),
                None => println!("    {} (not loaded)", dependency.header),
            }
        }
    }
}

fn cmd_inspect(input: &Path, objdata: Option<&Path>, image_base: u32, json: bool) -> Result<()> {
    let file = open_object(input)?;
    let mut env = load_environment(objdata, image_base);

    let mut dependencies = DependentObjects::default();
    let industry = locobj::decode_industry(&file, &mut env, Some(&mut dependencies))
        .with_context(|| format!("Failed to decode {}", input.display()))?;

    let report = IndustryReport::new(*file.header(), &industry, &env, &dependencies);
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        report.print();
    }

    Ok(())
}

enum Outcome {
    Valid,
    Invalid,
    Skipped,
    Failed(String),
}

fn validate_file(path: &Path, base: &LoadEnvironment) -> Outcome {
    let file = match ObjectFile::open(path) {
        Ok(file) => file,
        Err(err) => return Outcome::Failed(err.to_string()),
    };
    if file.header().object_type() != Some(ObjectType::Industry) {
        return Outcome::Skipped;
    }

    let mut env = base.clone();
    match locobj::decode_industry(&file, &mut env, None) {
        Ok(industry) if industry.validate() => Outcome::Valid,
        Ok(_) => Outcome::Invalid,
        Err(err) => Outcome::Failed(err.to_string()),
    }
}

fn cmd_validate(input: &Path, objdata: Option<&Path>) -> Result<()> {
    let files = dat_files(input);
    if files.is_empty() {
        bail!("No object files found under {}", input.display());
    }
    let base = load_environment(objdata, 0);

    println!("Validating {} object files...", files.len());

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let outcomes: Vec<(&PathBuf, Outcome)> = files
        .par_iter()
        .map(|path| {
            let outcome = validate_file(path, &base);
            pb.inc(1);
            (path, outcome)
        })
        .collect();
    pb.finish_and_clear();

    let mut valid = 0;
    let mut skipped = 0;
    let mut failed = 0;
    for (path, outcome) in &outcomes {
        match outcome {
            Outcome::Valid => valid += 1,
            Outcome::Skipped => skipped += 1,
            Outcome::Invalid => {
                failed += 1;
                println!("INVALID  {}", path.display());
            }
            Outcome::Failed(err) => {
                failed += 1;
                println!("ERROR    {}: {err}", path.display());
            }
        }
    }

    println!(
        "{valid} valid, {failed} failed, {skipped} skipped in {:?}",
        start.elapsed()
    );
    if failed > 0 {
        bail!("{failed} industry objects failed validation");
    }

    Ok(())
}

fn cmd_deps(input: &Path) -> Result<()> {
    let file = open_object(input)?;
    let mut env = LoadEnvironment::new();

    let mut dependencies: Vec<ObjectHeader> = Vec::new();
    locobj::decode_industry(&file, &mut env, Some(&mut dependencies))
        .with_context(|| format!("Failed to decode {}", input.display()))?;

    for header in &dependencies {
        println!("{header}");
    }

    Ok(())
}
