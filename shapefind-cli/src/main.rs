//! shapefind command line tool
//!
//! # Commands
//!
//! - `shapefind search --database db.json query.obj` - Rank the database against a mesh
//! - `shapefind describe query.obj` - Print a mesh's descriptor as a database record
//! - `shapefind simplify --target 500 in.obj out.obj` - Reduce a mesh to a face budget
//!
//! Logging goes to stderr. `-v` enables info, `-vv` debug; `RUST_LOG`
//! takes precedence over both.

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use shapefind::SearchContext;
use shapefind_core::Vector3d;
use shapefind_descriptors::{DescriptorRecord, SearchConfig};
use shapefind_simplification::EdgeCollapseSimplifier;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 3D shape similarity search
#[derive(Parser)]
#[command(name = "shapefind")]
#[command(about = "Find the reference meshes most similar in shape to a query mesh", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank the descriptor database against a query mesh
    Search {
        /// JSON descriptor database
        #[arg(long)]
        database: PathBuf,

        /// Number of matches to print
        #[arg(long, default_value_t = SearchConfig::DEFAULT_TOP_K)]
        top_k: usize,

        /// Reference axis as "x,y,z"
        #[arg(long, value_parser = parse_axis)]
        axis: Option<Vector3d>,

        /// Query mesh (OBJ)
        #[arg(name = "MESH")]
        mesh: PathBuf,
    },

    /// Print the descriptor of a mesh as a database record
    Describe {
        /// Reference axis as "x,y,z"
        #[arg(long, value_parser = parse_axis)]
        axis: Option<Vector3d>,

        /// Mesh to describe (OBJ)
        #[arg(name = "MESH")]
        mesh: PathBuf,
    },

    /// Reduce a mesh to at most a given number of triangles
    Simplify {
        /// Target face count
        #[arg(long)]
        target: usize,

        /// Never move vertices on open boundaries
        #[arg(long)]
        keep_boundary: bool,

        #[arg(name = "INPUT")]
        input: PathBuf,

        #[arg(name = "OUTPUT")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Search {
            database,
            top_k,
            axis,
            mesh,
        } => search(&database, top_k, axis, &mesh),
        Commands::Describe { axis, mesh } => describe(axis, &mesh),
        Commands::Simplify {
            target,
            keep_boundary,
            input,
            output,
        } => simplify(target, keep_boundary, &input, &output),
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Parse "x,y,z" into a vector; the length check happens in `SearchConfig`
fn parse_axis(s: &str) -> std::result::Result<Vector3d, String> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<f64>().map_err(|e| format!("bad component {:?}: {}", p, e)))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    match parts.as_slice() {
        [x, y, z] => Ok(Vector3d::new(*x, *y, *z)),
        _ => Err(format!("expected three comma separated components, got {}", parts.len())),
    }
}

fn config_for(axis: Option<Vector3d>, top_k: usize) -> Result<SearchConfig> {
    let config = SearchConfig::default().with_top_k(top_k);
    match axis {
        Some(axis) => config.with_axis(axis).context("invalid --axis"),
        None => Ok(config),
    }
}

fn search(database: &Path, top_k: usize, axis: Option<Vector3d>, mesh: &Path) -> Result<()> {
    let config = config_for(axis, top_k)?;
    let context = SearchContext::open(config, database)
        .with_context(|| format!("failed to load database {}", database.display()))?;
    let matches = context
        .search_file(mesh)
        .with_context(|| format!("failed to search with {}", mesh.display()))?;

    for (rank, m) in matches.iter().enumerate() {
        println!("{} {} {}", rank + 1, m.id, m.dissimilarity);
    }
    Ok(())
}

fn describe(axis: Option<Vector3d>, mesh: &Path) -> Result<()> {
    let config = config_for(axis, SearchConfig::DEFAULT_TOP_K)?;
    let loaded = shapefind_io::read_mesh(mesh)
        .with_context(|| format!("failed to read {}", mesh.display()))?;
    let descriptor = shapefind_descriptors::compute_descriptor(&loaded, &config)
        .with_context(|| format!("failed to describe {}", mesh.display()))?;

    let id = mesh
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| mesh.display().to_string());
    let record = DescriptorRecord::from_descriptor(id, &descriptor);
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

fn simplify(target: usize, keep_boundary: bool, input: &Path, output: &Path) -> Result<()> {
    if target == 0 {
        bail!("--target must be at least 1");
    }
    let mesh = shapefind_io::read_mesh(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let simplified = EdgeCollapseSimplifier::with_params(keep_boundary)
        .simplify_to(&mesh, target)
        .with_context(|| format!("failed to simplify {}", input.display()))?;
    shapefind_io::write_mesh(&simplified, output)
        .with_context(|| format!("failed to write {}", output.display()))?;

    info!(
        before = mesh.face_count(),
        after = simplified.face_count(),
        "wrote {}",
        output.display()
    );
    Ok(())
}
