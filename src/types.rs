use serde::{Deserialize, Serialize};

/// What a single line of `tree` output represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineKind {
    /// A directory entry, including root lines.
    Directory,
    /// A non-directory entry.
    File,
    /// An entry whose type the text alone does not reveal.
    ///
    /// Resolved against the filesystem once its path is known.
    Entry,
    /// The trailing `N directories, M files` summary.
    Report,
    /// Blank lines, structured output and anything that does not parse.
    Other,
}

impl LineKind {
    /// Whether the line names a filesystem entry.
    pub fn is_entry(&self) -> bool {
        matches!(self, LineKind::Directory | LineKind::File | LineKind::Entry)
    }
}

/// A line broken down by the classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLine {
    pub kind: LineKind,
    /// The printed name: a leaf name, or the whole path in full-path mode.
    ///
    /// Empty for [`LineKind::Report`] and [`LineKind::Other`].
    pub name: String,
    /// Indentation level; 0 for root lines.
    pub depth: usize,
    /// Other readings of the printed text, tried in order when nothing named
    /// [`name`](Self::name) exists on disk. A directory literally called
    /// `a -> b` prints exactly like a symlink `a` pointing at `b`.
    pub alternates: Vec<(String, LineKind)>,
}

impl ClassifiedLine {
    pub fn new(kind: LineKind, name: impl Into<String>, depth: usize) -> Self {
        Self {
            kind,
            name: name.into(),
            depth,
            alternates: Vec::new(),
        }
    }

    pub(crate) fn passthrough(kind: LineKind) -> Self {
        Self::new(kind, String::new(), 0)
    }
}

/// Counters collected while annotating a stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamStats {
    /// Lines read from the engine and written back out.
    pub lines: usize,
    /// Directory lines checked against the dataset oracle.
    pub directories: usize,
    /// Lines that received the dataset marker.
    pub marked: usize,
    /// Lines with a prefix that did not parse.
    pub unparsed: usize,
    /// Whether the consumer closed the output before the engine finished.
    pub truncated: bool,
}

/// The result of one complete run of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOutcome {
    /// Exit code of the engine, passed through unchanged.
    pub exit_code: i32,
    pub stats: StreamStats,
}
