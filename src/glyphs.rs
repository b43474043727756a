//! Indentation glyphs printed by `tree(1)` in front of every entry.
//!
//! Each nesting level occupies [`INDENT_WIDTH`] characters. Ancestor levels
//! are drawn as a vertical bar or as blanks, and the entry's own level as a
//! connector (`├── ` or `└── `, `|-- ` or `` `-- `` with the ASCII charset).
//! Recent `tree` releases pad with non-breaking spaces instead of plain ones,
//! so both count as filler.

use serde::{Deserialize, Serialize};

/// Number of characters `tree` uses per indentation level.
pub const INDENT_WIDTH: usize = 4;

/// Glyph alphabet recognised in line prefixes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Glyphs {
    /// Characters per indentation level.
    pub indent_width: usize,
    /// First character of a continued ancestor level.
    pub verticals: Vec<char>,
    /// First character of a connector with more siblings below it.
    pub tees: Vec<char>,
    /// First character of the connector of a last sibling.
    pub corners: Vec<char>,
    /// Characters drawing the horizontal part of a connector.
    pub horizontals: Vec<char>,
    /// Padding characters.
    pub fillers: Vec<char>,
}

impl Default for Glyphs {
    fn default() -> Self {
        Self {
            indent_width: INDENT_WIDTH,
            verticals: vec!['│', '|'],
            tees: vec!['├', '|'],
            corners: vec!['└', '`'],
            horizontals: vec!['─', '-'],
            fillers: vec![' ', '\u{a0}'],
        }
    }
}

/// Result of splitting a line into its indentation prefix and the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prefix<'a> {
    /// The line starts with no glyph at all (root lines, summaries, `-i` output).
    Bare(&'a str),
    /// A well-formed prefix: `depth` levels, the last one a connector.
    Entry { depth: usize, rest: &'a str },
    /// The line starts like a prefix but is not a valid glyph sequence.
    Malformed,
}

impl Glyphs {
    /// Glyphs for `tree --charset=ascii` only.
    pub fn ascii() -> Self {
        Self {
            verticals: vec!['|'],
            tees: vec!['|'],
            corners: vec!['`'],
            horizontals: vec!['-'],
            ..Self::default()
        }
    }

    fn is_glyph_start(&self, c: char) -> bool {
        self.verticals.contains(&c)
            || self.tees.contains(&c)
            || self.corners.contains(&c)
            || self.fillers.contains(&c)
    }

    fn is_indent(&self, token: &[char]) -> bool {
        let (first, tail) = match token.split_first() {
            Some(split) => split,
            None => return false,
        };
        (self.verticals.contains(first) || self.fillers.contains(first))
            && tail.iter().all(|c| self.fillers.contains(c))
    }

    fn is_connector(&self, token: &[char]) -> bool {
        if token.len() < 2 {
            return false;
        }
        let first = token[0];
        let last = token[token.len() - 1];
        (self.tees.contains(&first) || self.corners.contains(&first))
            && token[1..token.len() - 1]
                .iter()
                .all(|c| self.horizontals.contains(c))
            && self.fillers.contains(&last)
    }

    /// Splits `line` into indentation depth and the text after the connector.
    pub fn split_prefix<'a>(&self, line: &'a str) -> Prefix<'a> {
        match line.chars().next() {
            Some(c) if self.is_glyph_start(c) => {}
            _ => return Prefix::Bare(line),
        }
        if self.indent_width == 0 {
            return Prefix::Malformed;
        }
        let mut token = Vec::with_capacity(self.indent_width);
        let mut depth = 0;
        for (offset, c) in line.char_indices() {
            token.push(c);
            if token.len() < self.indent_width {
                continue;
            }
            if self.is_connector(&token) {
                let end = offset + c.len_utf8();
                return Prefix::Entry {
                    depth: depth + 1,
                    rest: &line[end..],
                };
            }
            if !self.is_indent(&token) {
                return Prefix::Malformed;
            }
            depth += 1;
            token.clear();
        }
        Prefix::Malformed
    }
}
