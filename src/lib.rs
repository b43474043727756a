//! # tree-datalad
//!
//! `tree-datalad` runs `tree(1)` and marks every directory that is the root of
//! a dataset (a self-contained version-controlled repository, possibly nested
//! inside another one) by appending [`DS_MARKER`] to its line. Every other byte
//! of the output is left as `tree` printed it.
//!
//! `tree` prints only leaf names behind box-drawing prefixes, so the full path
//! of each entry is rebuilt from the indentation: [`classify`] reads one line,
//! [`PathReconstructor`] keeps the ancestry of the current entry, and
//! [`annotate`] asks a [`DatasetOracle`] whether the directory is a dataset.
//! [`run`] drives the whole pipeline over a `tree` subprocess.
//!
//! # Features
//!
//! - `logging` (default): debug and warning events via the `tracing` crate.
//!
//! # Example
//!
//! ```no_run
//! use tree_datalad::{DataladOracle, TreeOptionsBuilder, run};
//!
//! let options = TreeOptionsBuilder::new(".")
//!     .flag("-a")
//!     .max_depth(3)
//!     .build();
//!
//! let stdout = std::io::stdout();
//! let outcome = run(&options, &DataladOracle, &mut stdout.lock()).expect("tree failed to start");
//! std::process::exit(outcome.exit_code);
//! ```

mod annotate;
mod classify;
mod engine;
mod error;
mod glyphs;
mod options;
mod reconstruct;
mod types;

pub use annotate::{
    DS_MARKER, DataladOracle, DatasetOracle, PathExtractor, annotate, ds_marker, extract_path,
    extract_path_with, has_dataset_marker, should_mark, strip_marker,
};
pub use classify::{classify, is_report};
pub use engine::{EXIT_SPAWN_FAILURE, annotate_stream, run, run_with_glyphs};
pub use error::DsTreeError;
pub use glyphs::{Glyphs, INDENT_WIDTH, Prefix};
pub use options::{OutputStyle, TreeOptions, TreeOptionsBuilder, VCS_IGNORE_PATTERN};
pub use reconstruct::{AncestryStack, PathReconstructor, resolve_kind};
pub use types::{ClassifiedLine, LineKind, RunOutcome, StreamStats};
