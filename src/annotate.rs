//! Dataset detection and the marker appended to dataset-root lines.

use crate::classify::classify;
use crate::glyphs::Glyphs;
use crate::options::OutputStyle;
use crate::reconstruct::{PathReconstructor, resolve_standalone};
use crate::types::{ClassifiedLine, LineKind};
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Suffix appended to the line of every dataset root.
///
/// A name may itself end with this text. [`has_dataset_marker`] only looks at
/// the text; [`PathExtractor::extract_marked`] checks the filesystem as well.
pub const DS_MARKER: &str = " [DS]";

/// Returns [`DS_MARKER`].
pub fn ds_marker() -> &'static str {
    DS_MARKER
}

/// Decides whether a directory is the root of a dataset.
///
/// Implementations must answer `false`, not panic, for paths that are missing
/// or unreadable.
pub trait DatasetOracle {
    fn is_dataset_root(&self, path: &Path) -> bool;
}

impl<F> DatasetOracle for F
where
    F: Fn(&Path) -> bool,
{
    fn is_dataset_root(&self, path: &Path) -> bool {
        self(path)
    }
}

/// Recognises installed DataLad datasets: a `.datalad/config` file next to a
/// `.git` directory or gitlink file.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataladOracle;

impl DatasetOracle for DataladOracle {
    fn is_dataset_root(&self, path: &Path) -> bool {
        path.join(".datalad").join("config").is_file() && path.join(".git").exists()
    }
}

/// Splits a line into its body and its terminator (`\n`, `\r\n` or nothing).
fn split_terminator(line: &str) -> (&str, &str) {
    if let Some(body) = line.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = line.strip_suffix('\n') {
        (body, "\n")
    } else {
        (line, "")
    }
}

/// Whether a line with this kind and path gets the marker.
pub fn should_mark<O>(kind: LineKind, path: Option<&Path>, oracle: &O) -> bool
where
    O: DatasetOracle + ?Sized,
{
    match (kind, path) {
        (LineKind::Directory, Some(path)) => {
            let marked = oracle.is_dataset_root(path);
            if marked {
                #[cfg(feature = "logging")]
                tracing::debug!("Dataset root: {}", path.display());
            }
            marked
        }
        _ => false,
    }
}

/// Appends the marker to `line` when it names a dataset root.
///
/// Everything already on the line, trailing whitespace included, stays in
/// place; the marker goes right before the line terminator.
pub fn annotate<'a, O>(
    line: &'a str,
    kind: LineKind,
    path: Option<&Path>,
    oracle: &O,
) -> Cow<'a, str>
where
    O: DatasetOracle + ?Sized,
{
    if !should_mark(kind, path, oracle) {
        return Cow::Borrowed(line);
    }
    let (body, terminator) = split_terminator(line);
    Cow::Owned(format!("{}{}{}", body, DS_MARKER, terminator))
}

/// Whether `line` carries the dataset marker.
pub fn has_dataset_marker(line: &str) -> bool {
    split_terminator(line).0.ends_with(DS_MARKER)
}

/// Removes a trailing dataset marker, leaving any other line unchanged.
pub fn strip_marker(line: &str) -> Cow<'_, str> {
    let (body, terminator) = split_terminator(line);
    match body.strip_suffix(DS_MARKER) {
        Some(stripped) => Cow::Owned(format!("{}{}", stripped, terminator)),
        None => Cow::Borrowed(line),
    }
}

/// Classifies an emitted line with any trailing marker removed.
///
/// When a marker is present, the reading that keeps it as part of the name is
/// added to the alternates; the returned index is where those readings start.
fn classify_emitted(
    line: &str,
    style: &OutputStyle,
    glyphs: &Glyphs,
) -> (ClassifiedLine, Option<usize>) {
    let (body, _) = split_terminator(line);
    let Some(stripped) = body.strip_suffix(DS_MARKER) else {
        return (classify(body, style, glyphs), None);
    };
    let mut classified = classify(stripped, style, glyphs);
    let whole = classify(body, style, glyphs);
    if !whole.kind.is_entry() || whole.name == classified.name {
        return (classified, None);
    }
    let from = classified.alternates.len();
    classified.alternates.push((whole.name, whole.kind));
    classified.alternates.extend(whole.alternates);
    (classified, Some(from))
}

/// Returns the path printed on an output line, marker or not.
///
/// For `tree -f` output this is the entry's full path; for indented output it
/// is the leaf name (see [`PathExtractor`] to rebuild full paths). Summary and
/// blank lines yield `None`.
pub fn extract_path(line: &str) -> Option<PathBuf> {
    extract_path_with(line, &OutputStyle::default(), &Glyphs::default())
}

/// [`extract_path`] for output produced with a specific style.
pub fn extract_path_with(line: &str, style: &OutputStyle, glyphs: &Glyphs) -> Option<PathBuf> {
    let (classified, _) = classify_emitted(line, style, glyphs);
    if classified.kind.is_entry() && !classified.name.is_empty() {
        Some(resolve_standalone(&classified).path)
    } else {
        None
    }
}

/// Extracts full paths from a sequence of output lines, indented or not.
#[derive(Debug, Clone)]
pub struct PathExtractor {
    style: OutputStyle,
    glyphs: Glyphs,
    reconstructor: PathReconstructor,
}

impl PathExtractor {
    pub fn new(style: OutputStyle) -> Self {
        Self::with_glyphs(style, Glyphs::default())
    }

    pub fn with_glyphs(style: OutputStyle, glyphs: Glyphs) -> Self {
        Self {
            reconstructor: PathReconstructor::new(&style),
            style,
            glyphs,
        }
    }

    /// Path denoted by the next line of output; lines must be fed in order.
    pub fn extract(&mut self, line: &str) -> Option<PathBuf> {
        self.extract_marked(line).map(|(path, _)| path)
    }

    /// Path denoted by the next line and whether the line carries the dataset
    /// marker. Trailing text that only looks like the marker counts as part of
    /// the name when that is the entry found on disk.
    pub fn extract_marked(&mut self, line: &str) -> Option<(PathBuf, bool)> {
        let (classified, marker_from) = classify_emitted(line, &self.style, &self.glyphs);
        let resolved = self.reconstructor.resolve_entry(&classified)?;
        let marker_in_name = matches!(
            (resolved.alternate, marker_from),
            (Some(ix), Some(from)) if ix >= from
        );
        Some((resolved.path, has_dataset_marker(line) && !marker_in_name))
    }
}
