use crate::error::DsTreeError;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::PathBuf;

/// Pattern always handed to `tree -I`, hiding version-control metadata.
pub const VCS_IGNORE_PATTERN: &str = ".git";

/// Short options of `tree` that take a value, attached (`-L2`) or as the next argument.
const SHORT_WITH_VALUE: &[char] = &['L', 'P', 'I', 'H', 'T', 'o'];
/// Long options of `tree` that accept their value as the next argument.
const LONG_WITH_VALUE: &[&str] = &[
    "--charset",
    "--filelimit",
    "--timefmt",
    "--sort",
    "--gitfile",
    "--hintro",
    "--houtro",
];
/// Long options that print a `[...]` metadata block before each name.
///
/// `--timefmt` implies `-D`.
const LONG_INFO: &[&str] = &["--inodes", "--device", "--du", "--si", "--timefmt"];

/// How the active `tree` flags shape every printed line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputStyle {
    /// `-f`: entries are printed with their full path.
    pub full_path: bool,
    /// `-i`: no indentation glyphs at all.
    pub no_indent: bool,
    /// `-F`: a type indicator follows each name (`/` for directories).
    pub classify: bool,
    /// `-Q`: names are double-quoted.
    pub quoted: bool,
    /// `-p -s -h -u -g -D --inodes --device --du --si --timefmt`: a `[...]` block
    /// precedes names.
    pub info_block: bool,
    /// `--metafirst`: the `[...]` block comes before the indentation glyphs.
    pub metafirst: bool,
    /// `-d`: only directories are listed.
    pub dirs_only: bool,
    /// `-J -X -H`: JSON, XML or HTML instead of text lines.
    pub structured: bool,
}

impl OutputStyle {
    /// Derives the style from raw `tree` arguments.
    pub fn from_flags(flags: &[String]) -> Self {
        let mut style = Self::default();
        for arg in scan(flags) {
            match arg {
                Arg::Short(letter) => match letter {
                    'f' => style.full_path = true,
                    'i' => style.no_indent = true,
                    'F' => style.classify = true,
                    'Q' => style.quoted = true,
                    'd' => style.dirs_only = true,
                    'p' | 's' | 'h' | 'u' | 'g' | 'D' => style.info_block = true,
                    'J' | 'X' | 'H' => style.structured = true,
                    _ => {}
                },
                Arg::Long(name) if LONG_INFO.contains(&name) => style.info_block = true,
                Arg::Long("--metafirst") => style.metafirst = true,
                _ => {}
            }
        }
        style
    }

    /// Whether a path can be recovered for entry lines in this style.
    pub fn paths_recoverable(&self) -> bool {
        !self.structured && (self.full_path || !self.no_indent)
    }
}

/// Everything needed to launch one `tree` run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeOptions {
    /// Engine executable.
    pub program: PathBuf,
    /// Flags forwarded to the engine untouched.
    pub flags: Vec<String>,
    /// Value for `-L`; unlimited when `None`.
    pub max_depth: Option<usize>,
    /// Caller-supplied `-I` patterns, merged with [`VCS_IGNORE_PATTERN`].
    pub ignore_patterns: Vec<String>,
    /// Directories to list; `tree` lists `.` when empty.
    pub roots: Vec<PathBuf>,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            program: PathBuf::from("tree"),
            flags: Vec::new(),
            max_depth: None,
            ignore_patterns: Vec::new(),
            roots: Vec::new(),
        }
    }
}

impl TreeOptions {
    /// Splits a raw `tree` command line into forwarded flags, depth, ignore patterns and roots.
    ///
    /// Short option clusters are forwarded verbatim unless they carry `-L` or `-I`,
    /// in which case the remaining letters are forwarded as a shorter cluster.
    pub fn from_args<I, S>(args: I) -> Result<Self, DsTreeError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let mut options = Self::default();
        let mut i = 0;
        while i < args.len() {
            let token = &args[i];
            i += 1;
            if token == "--" {
                options.roots.extend(args[i..].iter().map(PathBuf::from));
                break;
            }
            if token.starts_with("--") {
                options.flags.push(token.clone());
                if LONG_WITH_VALUE.contains(&token.as_str()) {
                    if let Some(value) = args.get(i) {
                        options.flags.push(value.clone());
                        i += 1;
                    }
                }
                continue;
            }
            let Some(cluster) = token.strip_prefix('-').filter(|c| !c.is_empty()) else {
                options.roots.push(PathBuf::from(token));
                continue;
            };
            let mut forwarded = String::from("-");
            for (offset, letter) in cluster.char_indices() {
                if !SHORT_WITH_VALUE.contains(&letter) {
                    forwarded.push(letter);
                    continue;
                }
                let attached = &cluster[offset + letter.len_utf8()..];
                let value = if attached.is_empty() {
                    let value = args.get(i).cloned().ok_or_else(|| {
                        DsTreeError::InvalidOption(format!("-{} requires a value", letter))
                    })?;
                    i += 1;
                    value
                } else {
                    attached.to_string()
                };
                match letter {
                    'L' => {
                        let depth = value.parse::<usize>().map_err(|_| {
                            DsTreeError::InvalidOption(format!("invalid level '{}'", value))
                        })?;
                        options.max_depth = Some(depth);
                    }
                    'I' => options.ignore_patterns.push(value),
                    _ => {
                        forwarded.push(letter);
                        if attached.is_empty() {
                            options.flags.push(std::mem::take(&mut forwarded));
                            options.flags.push(value);
                            forwarded.push('-');
                        } else {
                            forwarded.push_str(&value);
                        }
                    }
                }
                break;
            }
            if forwarded.len() > 1 {
                options.flags.push(forwarded);
            }
        }
        Ok(options)
    }

    /// The output style implied by the forwarded flags.
    pub fn style(&self) -> OutputStyle {
        OutputStyle::from_flags(&self.flags)
    }

    /// The `-I` value: caller patterns plus the version-control pattern.
    pub fn ignore_pattern(&self) -> String {
        let mut patterns: Vec<&str> = self.ignore_patterns.iter().map(String::as_str).collect();
        if !patterns.contains(&VCS_IGNORE_PATTERN) {
            patterns.push(VCS_IGNORE_PATTERN);
        }
        patterns.join("|")
    }

    /// Argument vector for the engine: `flags... [-L depth] -I pattern roots...`.
    pub fn to_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = self.flags.iter().map(OsString::from).collect();
        if let Some(depth) = self.max_depth {
            args.push("-L".into());
            args.push(depth.to_string().into());
        }
        args.push("-I".into());
        args.push(self.ignore_pattern().into());
        if self
            .roots
            .iter()
            .any(|root| root.to_string_lossy().starts_with('-'))
        {
            args.push("--".into());
        }
        args.extend(self.roots.iter().map(|root| root.clone().into_os_string()));
        args
    }
}

#[derive(Debug, Default)]
pub struct TreeOptionsBuilder {
    options: TreeOptions,
}

impl TreeOptionsBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            options: TreeOptions {
                roots: vec![root.into()],
                ..Default::default()
            },
        }
    }
    pub fn program(mut self, program: impl Into<PathBuf>) -> Self {
        self.options.program = program.into();
        self
    }
    pub fn flag(mut self, flag: impl Into<String>) -> Self {
        self.options.flags.push(flag.into());
        self
    }
    pub fn flags<I, S>(mut self, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.flags.extend(flags.into_iter().map(Into::into));
        self
    }
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.options.max_depth = Some(depth);
        self
    }
    pub fn no_limit_depth(mut self) -> Self {
        self.options.max_depth = None;
        self
    }
    pub fn ignore_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.options.ignore_patterns.push(pattern.into());
        self
    }
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.options.roots.push(root.into());
        self
    }
    pub fn build(self) -> TreeOptions {
        self.options
    }
}

enum Arg<'a> {
    Short(char),
    Long(&'a str),
    Positional,
}

fn scan(args: &[String]) -> Vec<Arg<'_>> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < args.len() {
        let token = args[i].as_str();
        i += 1;
        if token == "--" {
            break;
        }
        if token.starts_with("--") {
            let name = match token.split_once('=') {
                Some((name, _)) => name,
                None => {
                    if LONG_WITH_VALUE.contains(&token) {
                        i += 1;
                    }
                    token
                }
            };
            out.push(Arg::Long(name));
            continue;
        }
        let Some(cluster) = token.strip_prefix('-').filter(|c| !c.is_empty()) else {
            out.push(Arg::Positional);
            continue;
        };
        for (offset, letter) in cluster.char_indices() {
            out.push(Arg::Short(letter));
            if SHORT_WITH_VALUE.contains(&letter) {
                if cluster[offset + letter.len_utf8()..].is_empty() {
                    i += 1;
                }
                break;
            }
        }
    }
    out
}
