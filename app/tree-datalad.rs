//! Command-line interface for tree-datalad.
//!
//! `tree-datalad [TREE OPTIONS...] [DIRECTORY...]` accepts exactly what
//! `tree` accepts, forwards it, and marks dataset roots in the output. The
//! exit code is the one `tree` returned.

use clap::Parser;
use std::io;
use std::path::PathBuf;
use std::process::exit;
use tree_datalad::{DataladOracle, TreeOptions, run};
#[cfg(feature = "logging")]
use tracing_subscriber::{EnvFilter, fmt};

/// tree-datalad: tree(1) with DataLad dataset roots marked
#[derive(Parser, Debug)]
#[command(
    name = "tree-datalad",
    about,
    long_about = None,
    disable_help_flag = true,
    disable_version_flag = true
)]
struct Cli {
    /// tree executable to run (must come before any tree option)
    #[arg(long = "ds-tree-bin", env = "TREE_DATALAD_TREE_BIN", default_value = "tree")]
    tree_bin: PathBuf,

    /// Options and directories, passed on to tree
    #[arg(
        value_name = "TREE ARGS",
        num_args = 0..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    tree_args: Vec<String>,
}

#[cfg(feature = "logging")]
fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

#[cfg(not(feature = "logging"))]
fn init_logging() {}

fn main() {
    let cli = Cli::parse();
    init_logging();
    #[cfg(feature = "logging")]
    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let mut options = match TreeOptions::from_args(cli.tree_args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {}", e);
            exit(e.exit_code());
        }
    };
    options.program = cli.tree_bin;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    match run(&options, &DataladOracle, &mut handle) {
        Ok(outcome) => exit(outcome.exit_code),
        Err(e) => {
            eprintln!("Error: {}", e);
            exit(e.exit_code());
        }
    }
}
