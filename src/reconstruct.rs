//! Path reconstruction from indented `tree` output.

use crate::options::OutputStyle;
use crate::types::{ClassifiedLine, LineKind};
use std::fs;
use std::path::{Path, PathBuf};

/// Last entry name seen at each open depth, root first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AncestryStack {
    frames: Vec<(usize, String)>,
}

impl AncestryStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every frame at `depth` or deeper.
    pub fn truncate_to(&mut self, depth: usize) {
        let keep = self.frames.partition_point(|(d, _)| *d < depth);
        self.frames.truncate(keep);
    }

    /// Opens `name` at `depth`, discarding the frames it replaces.
    pub fn push(&mut self, depth: usize, name: impl Into<String>) {
        self.truncate_to(depth);
        self.frames.push((depth, name.into()));
    }

    /// Joins the frame names in depth order.
    pub fn path(&self) -> PathBuf {
        self.frames.iter().map(|(_, name)| name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Indented,
    FullPath,
    /// `-i` without `-f`: depth is not printed, so paths cannot be rebuilt.
    Flat,
}

/// Stateful per-run path reconstructor.
///
/// Feed it every classified line in output order; it returns the path of each
/// entry line and the entry's resolved kind.
#[derive(Debug, Clone)]
pub struct PathReconstructor {
    mode: Mode,
    stack: AncestryStack,
    seen_root: bool,
}

impl PathReconstructor {
    pub fn new(style: &OutputStyle) -> Self {
        let mode = if style.full_path {
            Mode::FullPath
        } else if style.no_indent {
            Mode::Flat
        } else {
            Mode::Indented
        };
        Self {
            mode,
            stack: AncestryStack::new(),
            seen_root: false,
        }
    }

    /// Returns the path denoted by `line`, or `None` for non-entry lines and
    /// entries whose ancestry is unknown.
    pub fn path_for(&mut self, line: &ClassifiedLine) -> Option<PathBuf> {
        self.resolve(line).map(|(path, _)| path)
    }

    /// Like [`path_for`](Self::path_for), also returning the kind of the
    /// reading that was picked among the line's alternates.
    pub fn resolve(&mut self, line: &ClassifiedLine) -> Option<(PathBuf, LineKind)> {
        self.resolve_entry(line).map(|resolved| (resolved.path, resolved.kind))
    }

    pub(crate) fn resolve_entry(&mut self, line: &ClassifiedLine) -> Option<Resolved> {
        if !line.kind.is_entry() {
            return None;
        }
        match self.mode {
            Mode::FullPath => Some(resolve_standalone(line)),
            Mode::Flat => {
                if self.seen_root {
                    return None;
                }
                self.seen_root = true;
                Some(resolve_standalone(line))
            }
            Mode::Indented => {
                if line.depth == 0 {
                    self.stack.clear();
                } else if self.stack.is_empty() {
                    return None;
                }
                self.stack.truncate_to(line.depth);
                let reading = if line.alternates.is_empty() {
                    Reading::primary(line)
                } else {
                    choose_reading(&self.stack.path(), line)
                };
                self.stack.push(line.depth, reading.name);
                Some(Resolved {
                    path: self.stack.path(),
                    kind: reading.kind,
                    alternate: reading.alternate,
                })
            }
        }
    }

    /// Depth of the ancestry currently held.
    pub fn stack_len(&self) -> usize {
        self.stack.len()
    }
}

/// A resolved entry line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Resolved {
    pub(crate) path: PathBuf,
    pub(crate) kind: LineKind,
    /// Index into the line's alternates when one of them was picked.
    pub(crate) alternate: Option<usize>,
}

struct Reading<'a> {
    name: &'a str,
    kind: LineKind,
    alternate: Option<usize>,
}

impl<'a> Reading<'a> {
    fn primary(line: &'a ClassifiedLine) -> Self {
        Self {
            name: &line.name,
            kind: line.kind,
            alternate: None,
        }
    }

    fn into_resolved(self, parent: PathBuf) -> Resolved {
        Resolved {
            path: parent.join(self.name),
            kind: self.kind,
            alternate: self.alternate,
        }
    }
}

/// Picks the printed name unless nothing by that name exists under `parent`
/// while one of the alternates does.
fn choose_reading<'a>(parent: &Path, line: &'a ClassifiedLine) -> Reading<'a> {
    if line.alternates.is_empty() || fs::symlink_metadata(parent.join(&line.name)).is_ok() {
        return Reading::primary(line);
    }
    line.alternates
        .iter()
        .enumerate()
        .find(|(_, (name, _))| fs::symlink_metadata(parent.join(name)).is_ok())
        .map(|(ix, (name, kind))| Reading {
            name: name.as_str(),
            kind: *kind,
            alternate: Some(ix),
        })
        .unwrap_or_else(|| Reading::primary(line))
}

/// Resolves a line without ancestry: its name is the whole path, relative to
/// the working directory when not absolute.
pub(crate) fn resolve_standalone(line: &ClassifiedLine) -> Resolved {
    choose_reading(Path::new(""), line).into_resolved(PathBuf::new())
}

/// Settles [`LineKind::Entry`] by asking the filesystem.
///
/// Symlinks are followed; anything that cannot be inspected is a file.
pub fn resolve_kind(kind: LineKind, path: &Path) -> LineKind {
    match kind {
        LineKind::Entry => match fs::metadata(path) {
            Ok(meta) if meta.is_dir() => LineKind::Directory,
            _ => LineKind::File,
        },
        other => other,
    }
}
