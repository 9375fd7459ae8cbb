use ephtree::config::HierarchyConfig;
use ephtree::distance::CostFunctions;
use ephtree::matrix::write_matrix;
use ephtree::{compare_files, Error};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Environment variable naming an optional TOML configuration file.
const CONFIG_ENV: &str = "EPHTREE_CONFIG";

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let paths: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    if paths.is_empty() {
        eprintln!("Usage: ephtree FILES...");
        return ExitCode::FAILURE;
    }

    match run(&paths) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(paths: &[PathBuf]) -> Result<(), Error> {
    let config = match std::env::var_os(CONFIG_ENV) {
        Some(path) => HierarchyConfig::from_file(path)?,
        None => HierarchyConfig::default(),
    };

    let matrix = compare_files(paths, &config, &CostFunctions::canonical())?;
    for class in matrix.duplicate_classes() {
        tracing::info!(?class, "hierarchies at distance zero");
    }

    let mut stdout = BufWriter::new(io::stdout().lock());
    write_matrix(&mut stdout, &matrix)
        .and_then(|()| stdout.flush())
        .map_err(|source| Error::output("<stdout>", source))
}
