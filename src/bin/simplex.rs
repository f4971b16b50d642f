//! simplex - compositional geometry CLI
//!
//! Command-line interface for log-ratio transforms, zero replacement and
//! tight simplex fitting over TSV composition tables.

use clap::{Parser, Subcommand};
use compositional_geometry::config::GeometryConfig;
use compositional_geometry::data::CompositionTable;
use compositional_geometry::error::{normalize_index, Result};
use compositional_geometry::normalize::{aitchison_distance_matrix, alr_rows, clr_rows};
use compositional_geometry::simplex::tight_simplex_with_config;
use compositional_geometry::zero::multiplicative_replacement_rows;
use log::info;
use std::path::{Path, PathBuf};

/// Compositional data geometry
#[derive(Parser)]
#[command(name = "simplex")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Centered log-ratio transform (zeros are replaced first)
    Clr {
        /// Path to composition table TSV
        #[arg(short, long)]
        input: PathBuf,

        /// Output TSV (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Additive log-ratio transform (zeros are replaced first)
    Alr {
        /// Path to composition table TSV
        #[arg(short, long)]
        input: PathBuf,

        /// Reference part index; negative counts from the end
        #[arg(short, long, allow_hyphen_values = true)]
        reference: Option<isize>,

        /// Output TSV (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Multiplicative replacement of zeros in every composition
    Replace {
        /// Path to composition table TSV
        #[arg(short, long)]
        input: PathBuf,

        /// Value substituted for each zero (default: scale / D^2)
        #[arg(short, long)]
        delta: Option<f64>,

        /// Output TSV (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Fit a tight simplex around the compositions
    Fit {
        /// Path to composition table TSV
        #[arg(short, long)]
        input: PathBuf,

        /// Relative margin over the smallest enclosing simplex
        #[arg(long)]
        margin: Option<f64>,

        /// Fail when a vertex leaves the unit simplex
        #[arg(long)]
        confine: bool,

        /// Also report barycentric coordinates of every sample
        #[arg(long)]
        coordinates: bool,

        /// Output format: tsv or json
        #[arg(short, long, default_value = "tsv")]
        format: String,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Pairwise Aitchison distances between samples
    Distance {
        /// Path to composition table TSV
        #[arg(short, long)]
        input: PathBuf,

        /// Output TSV (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the default configuration as YAML
    Config,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = load_config(cli.config.as_deref()).and_then(|config| match cli.command {
        Commands::Clr { input, output } => cmd_clr(&config, &input, output.as_deref()),
        Commands::Alr {
            input,
            reference,
            output,
        } => cmd_alr(&config, &input, reference, output.as_deref()),
        Commands::Replace {
            input,
            delta,
            output,
        } => cmd_replace(&config, &input, delta, output.as_deref()),
        Commands::Fit {
            input,
            margin,
            confine,
            coordinates,
            format,
            output,
        } => cmd_fit(
            &config,
            &input,
            margin,
            confine,
            coordinates,
            &format,
            output.as_deref(),
        ),
        Commands::Distance { input, output } => cmd_distance(&config, &input, output.as_deref()),
        Commands::Config => cmd_config(&config),
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<GeometryConfig> {
    match path {
        Some(path) => {
            eprintln!("Loading configuration from {:?}...", path);
            GeometryConfig::from_yaml_file(path)
        }
        None => Ok(GeometryConfig::default()),
    }
}

fn load_table(path: &Path) -> Result<CompositionTable> {
    eprintln!("Loading compositions from {:?}...", path);
    let table = CompositionTable::from_tsv(path)?.closed()?;
    eprintln!(
        "Loaded {} samples x {} parts",
        table.n_samples(),
        table.n_parts()
    );
    Ok(table)
}

/// Closed, zero-free copy of the input, as required by log-ratios.
fn load_positive(config: &GeometryConfig, path: &Path) -> Result<CompositionTable> {
    let table = load_table(path)?;
    let n_zeros = table.matrix().iter().filter(|&&v| v == 0.0).count();
    if n_zeros == 0 {
        return Ok(table);
    }
    eprintln!("Replacing {} zeros (multiplicative)...", n_zeros);
    let replaced = multiplicative_replacement_rows(table.matrix(), &config.replacement)?;
    table.with_data(replaced, table.part_ids().to_vec())
}

fn emit_table(table: &CompositionTable, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            eprintln!("Writing results to {:?}...", path);
            table.to_tsv(path)
        }
        None => table.write_tsv(std::io::stdout().lock()),
    }
}

fn emit_text(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            eprintln!("Writing results to {:?}...", path);
            std::fs::write(path, text)?;
        }
        None => println!("{}", text),
    }
    Ok(())
}

/// Centered log-ratio transform of every sample
fn cmd_clr(config: &GeometryConfig, input: &Path, output: Option<&Path>) -> Result<()> {
    let table = load_positive(config, input)?;
    let coords = clr_rows(table.matrix())?;
    let result = table.with_data(coords, table.part_ids().to_vec())?;
    emit_table(&result, output)
}

/// Additive log-ratio transform of every sample
fn cmd_alr(
    config: &GeometryConfig,
    input: &Path,
    reference: Option<isize>,
    output: Option<&Path>,
) -> Result<()> {
    let table = load_positive(config, input)?;
    let reference = reference.unwrap_or(config.alr_reference);
    let coords = alr_rows(table.matrix(), reference)?;

    let ref_idx = normalize_index(reference, table.n_parts())?;
    let ref_id = &table.part_ids()[ref_idx];
    eprintln!("Reference part: {}", ref_id);
    let part_ids: Vec<String> = table
        .part_ids()
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != ref_idx)
        .map(|(_, id)| format!("{}/{}", id, ref_id))
        .collect();

    let result = table.with_data(coords, part_ids)?;
    emit_table(&result, output)
}

/// Zero replacement of every sample
fn cmd_replace(
    config: &GeometryConfig,
    input: &Path,
    delta: Option<f64>,
    output: Option<&Path>,
) -> Result<()> {
    let table = load_table(input)?;

    let mut replacement = config.replacement.clone();
    if delta.is_some() {
        replacement.delta = delta;
    }
    let replaced = multiplicative_replacement_rows(table.matrix(), &replacement)?;

    info!("Replaced zeros (delta {:?})", replacement.delta);
    let result = table.with_data(replaced, table.part_ids().to_vec())?;
    emit_table(&result, output)
}

/// Fit a tight simplex
fn cmd_fit(
    config: &GeometryConfig,
    input: &Path,
    margin: Option<f64>,
    confine: bool,
    coordinates: bool,
    format: &str,
    output: Option<&Path>,
) -> Result<()> {
    let table = load_table(input)?;

    let mut fit_config = config.tight_simplex.clone();
    if let Some(margin) = margin {
        fit_config.margin = margin;
    }
    fit_config.confine_to_simplex |= confine;

    eprintln!("Fitting simplex...");
    let fit = tight_simplex_with_config(table.matrix(), &fit_config)?;
    eprintln!(
        "Done! scale = {:.6}, edge length = {:.6}",
        fit.scale, fit.edge_length
    );

    let vertex_ids: Vec<String> = (0..fit.dim()).map(|i| format!("vertex_{}", i)).collect();
    let barycentric = if coordinates {
        Some(fit.barycentric(table.matrix())?)
    } else {
        None
    };

    match format {
        "json" => {
            let mut report = serde_json::json!({ "simplex": fit });
            if let Some(coords) = &barycentric {
                let rows: Vec<serde_json::Value> = table
                    .sample_ids()
                    .iter()
                    .enumerate()
                    .map(|(i, id)| {
                        serde_json::json!({
                            "sample_id": id,
                            "coordinates": coords.row(i).iter().copied().collect::<Vec<f64>>(),
                        })
                    })
                    .collect();
                report["barycentric"] = serde_json::Value::Array(rows);
            }
            emit_text(&serde_json::to_string_pretty(&report)?, output)
        }
        _ => {
            let vertices = CompositionTable::new(
                fit.vertices().clone(),
                vertex_ids.clone(),
                table.part_ids().to_vec(),
            )?;
            emit_table(&vertices, output)?;

            if let Some(coords) = barycentric {
                let coords_table = table.with_data(coords, vertex_ids)?;
                match output {
                    Some(path) => {
                        let mut coords_path = path.to_path_buf().into_os_string();
                        coords_path.push(".barycentric.tsv");
                        emit_table(&coords_table, Some(Path::new(&coords_path)))?;
                    }
                    None => {
                        println!();
                        emit_table(&coords_table, None)?;
                    }
                }
            }
            Ok(())
        }
    }
}

/// Pairwise Aitchison distances
fn cmd_distance(config: &GeometryConfig, input: &Path, output: Option<&Path>) -> Result<()> {
    let table = load_positive(config, input)?;
    let dist = aitchison_distance_matrix(table.matrix())?;
    let result = table.with_data(dist, table.sample_ids().to_vec())?;
    emit_table(&result, output)
}

/// Print configuration
fn cmd_config(config: &GeometryConfig) -> Result<()> {
    print!("{}", config.to_yaml()?);
    Ok(())
}
