//! Line classifier: turns one line of `tree` output into a kind, a printed
//! name and an indentation depth.
//!
//! This is the only place that knows how `tree` decorates a name. Path
//! reconstruction, annotation and [`extract_path`](crate::extract_path) all
//! go through [`classify`].

use crate::glyphs::{Glyphs, Prefix};
use crate::options::OutputStyle;
use crate::types::{ClassifiedLine, LineKind};

/// Diagnostics `tree` appends in brackets after an entry.
const DIAGNOSTICS: &[&str] = &["error opening dir", "recursive, not followed"];
const FILELIMIT_DIAGNOSTIC: &str = "exceeds filelimit, not opening dir";

/// Indicators printed by `tree -F` after non-directory names.
const FILE_INDICATORS: &[char] = &['*', '=', '|', '>', '@'];

/// Classifies a line of `tree` output.
///
/// `line` must not include its line terminator. Never fails: anything that
/// does not look like `tree` output is [`LineKind::Other`].
pub fn classify(line: &str, style: &OutputStyle, glyphs: &Glyphs) -> ClassifiedLine {
    if style.structured || line.trim().is_empty() {
        return ClassifiedLine::passthrough(LineKind::Other);
    }
    if is_report(line) {
        return ClassifiedLine::passthrough(LineKind::Report);
    }
    let line = if style.metafirst && style.info_block {
        strip_info_block(line)
    } else {
        line
    };
    match glyphs.split_prefix(line) {
        Prefix::Malformed => ClassifiedLine::passthrough(LineKind::Other),
        Prefix::Bare(text) => {
            let mut classified = parse_name(text, style);
            if !style.no_indent {
                classified.kind = LineKind::Directory;
                for (_, kind) in classified.alternates.iter_mut() {
                    *kind = LineKind::Directory;
                }
            }
            classified
        }
        Prefix::Entry { depth, rest } => {
            let mut classified = parse_name(rest, style);
            if classified.name.is_empty() {
                return ClassifiedLine::passthrough(LineKind::Other);
            }
            classified.depth = depth;
            classified
        }
    }
}

/// Whether `line` is the summary `tree` prints after the listing.
///
/// Recognises `N directories`, `N directories, M files` and the `--du` form
/// `SIZE used in N directories, M files`, singular nouns included.
pub fn is_report(line: &str) -> bool {
    let text = line.trim();
    let counts = match text.split_once(" used in ") {
        Some((_, counts)) => counts,
        None => text,
    };
    counts.split(", ").all(|part| {
        let Some((count, noun)) = part.split_once(' ') else {
            return false;
        };
        !count.is_empty()
            && count.chars().all(|c| c.is_ascii_digit())
            && matches!(noun, "directory" | "directories" | "file" | "files")
    })
}

/// Strips every decoration `tree` adds around a name and infers the entry
/// type where the decorations reveal it.
///
/// Text containing ` -> ` is read as a symlink first and as a plain name
/// second; the reconstructor settles which one exists.
fn parse_name(text: &str, style: &OutputStyle) -> ClassifiedLine {
    let plain = strip_ansi(text);
    let mut name = plain.as_str();
    if style.info_block && !style.metafirst {
        name = strip_info_block(name);
    }
    name = strip_diagnostic(name);

    let Some((link, target)) = split_link(name, style) else {
        let (name, kind) = read_plain(name, style);
        return ClassifiedLine::new(kind, name, 0);
    };
    let kind = if !style.classify {
        unrevealed(style)
    } else if target.ends_with('/') {
        LineKind::Directory
    } else {
        LineKind::File
    };
    let mut classified = ClassifiedLine::new(kind, decode(link, style), 0);
    classified.alternates.push(read_plain(name, style));
    classified
}

fn unrevealed(style: &OutputStyle) -> LineKind {
    if style.dirs_only {
        LineKind::Directory
    } else {
        LineKind::Entry
    }
}

fn read_plain(text: &str, style: &OutputStyle) -> (String, LineKind) {
    let mut name = text;
    let mut kind = unrevealed(style);
    if style.classify {
        if let Some(stripped) = name.strip_suffix('/') {
            if !stripped.is_empty() {
                name = stripped;
            }
            kind = LineKind::Directory;
        } else {
            if let Some(stripped) = name.strip_suffix(FILE_INDICATORS) {
                name = stripped;
            }
            kind = LineKind::File;
        }
    }
    (decode(name, style), kind)
}

/// Splits `link -> target`. Under `-Q` both sides are quoted separately.
fn split_link<'a>(name: &'a str, style: &OutputStyle) -> Option<(&'a str, &'a str)> {
    let (link, target) = name.split_once(" -> ")?;
    if style.quoted && !(link.ends_with('"') && target.starts_with('"')) {
        return None;
    }
    Some((link, target))
}

fn decode(name: &str, style: &OutputStyle) -> String {
    if style.quoted {
        unquote(name)
    } else {
        name.to_string()
    }
}

/// Drops a leading `[...]  ` metadata block.
fn strip_info_block(text: &str) -> &str {
    if !text.starts_with('[') {
        return text;
    }
    match text.find("]  ") {
        Some(end) => &text[end + 3..],
        None => text,
    }
}

fn strip_diagnostic(name: &str) -> &str {
    let Some(body) = name.strip_suffix(']') else {
        return name;
    };
    match body.rfind(" [") {
        Some(start)
            if DIAGNOSTICS.contains(&&body[start + 2..])
                || body[start + 2..].ends_with(FILELIMIT_DIAGNOSTIC) =>
        {
            &name[..start]
        }
        _ => name,
    }
}

fn unquote(name: &str) -> String {
    let inner = match name
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    {
        Some(inner) => inner,
        None => return name.to_string(),
    };
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(escaped @ ('"' | '\\')) => out.push(escaped),
                Some(other) => {
                    out.push(c);
                    out.push(other);
                }
                None => out.push(c),
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Removes ANSI colour (CSI) and hyperlink (OSC) escape sequences.
fn strip_ansi(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\x1b' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('[') => {
                for c in chars.by_ref() {
                    if ('@'..='~').contains(&c) {
                        break;
                    }
                }
            }
            Some(']') => {
                while let Some(c) = chars.next() {
                    if c == '\x07' {
                        break;
                    }
                    if c == '\x1b' && chars.peek() == Some(&'\\') {
                        chars.next();
                        break;
                    }
                }
            }
            _ => {}
        }
    }
    out
}
