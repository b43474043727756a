//! Shared fixtures: dataset trees on disk and `tree`-style renderings of them.

#![allow(dead_code)]

use ignore::WalkBuilder;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::{TempDir, tempdir};
use tree_datalad::{DataladOracle, DatasetOracle};

/// Turns `path` into an installed DataLad dataset.
pub fn make_dataset(path: &Path) {
    fs::create_dir_all(path.join(".git")).unwrap();
    fs::create_dir_all(path.join(".datalad")).unwrap();
    fs::write(
        path.join(".datalad/config"),
        "[datalad \"dataset\"]\n\tid = 00000000-0000-0000-0000-000000000000\n",
    )
    .unwrap();
}

/// Builds:
///
/// ```text
/// R/
/// ├── A/notes.txt
/// ├── B/            dataset
/// │   ├── C/        dataset, with data.csv
/// │   ├── D/plain.txt
/// │   └── readme.md
/// └── top.txt
/// ```
pub fn dataset_fixture() -> TempDir {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("A")).unwrap();
    fs::write(root.join("A/notes.txt"), "notes").unwrap();
    make_dataset(&root.join("B"));
    fs::write(root.join("B/readme.md"), "# B").unwrap();
    make_dataset(&root.join("B/C"));
    fs::write(root.join("B/C/data.csv"), "a,b\n1,2\n").unwrap();
    fs::create_dir_all(root.join("B/D")).unwrap();
    fs::write(root.join("B/D/plain.txt"), "plain").unwrap();
    fs::write(root.join("top.txt"), "top").unwrap();
    dir
}

struct Counts {
    dirs: usize,
    files: usize,
}

/// How [`render_tree_with`] formats its listing, mirroring `tree` flags.
#[derive(Debug, Clone, Copy, Default)]
pub struct Render {
    /// `-f`
    pub full_path: bool,
    /// `-F`
    pub classify: bool,
    /// `-Q`
    pub quoted: bool,
    /// `-s`
    pub sizes: bool,
    /// `--metafirst`, only meaningful with `sizes`
    pub metafirst: bool,
    /// `-d`
    pub dirs_only: bool,
    /// `--charset=ascii`
    pub ascii: bool,
    /// Non-breaking space padding, as newer `tree` releases print.
    pub nbsp: bool,
    /// `-L`
    pub max_depth: Option<usize>,
}

impl Render {
    /// The `tree` flags producing this rendering.
    pub fn flags(&self) -> Vec<String> {
        let mut flags = Vec::new();
        for (on, flag) in [
            (self.full_path, "-f"),
            (self.classify, "-F"),
            (self.quoted, "-Q"),
            (self.sizes, "-s"),
            (self.metafirst, "--metafirst"),
            (self.dirs_only, "-d"),
            (self.ascii, "--charset=ascii"),
        ] {
            if on {
                flags.push(flag.to_string());
            }
        }
        if let Some(depth) = self.max_depth {
            flags.push("-L".to_string());
            flags.push(depth.to_string());
        }
        flags
    }

    fn glyphs(&self) -> [&'static str; 4] {
        if self.ascii {
            ["|-- ", "`-- ", "|   ", "    "]
        } else if self.nbsp {
            ["├──\u{a0}", "└──\u{a0}", "│\u{a0}\u{a0} ", "\u{a0}\u{a0}\u{a0} "]
        } else {
            ["├── ", "└── ", "│   ", "    "]
        }
    }

    fn label(&self, text: &str, is_dir: bool) -> String {
        let mut label = if self.quoted {
            format!("\"{}\"", text)
        } else {
            text.to_string()
        };
        if self.classify && is_dir {
            label.push('/');
        }
        label
    }

    fn info(&self, path: &Path) -> String {
        if !self.sizes {
            return String::new();
        }
        let size = if path.is_dir() {
            4096
        } else {
            fs::metadata(path).unwrap().len()
        };
        format!("[{:>11}]  ", size)
    }
}

/// Renders `root` the way `tree` does with default options (hidden entries
/// skipped), or with `-f` when `full_path` is set.
pub fn render_tree(root: &Path, full_path: bool) -> String {
    render_tree_with(
        root,
        &Render {
            full_path,
            ..Render::default()
        },
    )
}

/// Renders `root` as `tree` would with the flags in `render`.
pub fn render_tree_with(root: &Path, render: &Render) -> String {
    let root_label = render.label(&root.display().to_string(), false);
    let mut out = format!("{}{}\n", render.info(root), root_label);
    let mut counts = Counts { dirs: 0, files: 0 };
    render_dir(root, root, "", 1, render, &mut out, &mut counts);
    if render.dirs_only {
        out.push_str(&format!("\n{} directories\n", counts.dirs));
    } else {
        out.push_str(&format!(
            "\n{} directories, {} files\n",
            counts.dirs, counts.files
        ));
    }
    out
}

fn render_dir(
    dir: &Path,
    shown: &Path,
    prefix: &str,
    level: usize,
    render: &Render,
    out: &mut String,
    counts: &mut Counts,
) {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| !path.file_name().unwrap().to_string_lossy().starts_with('.'))
        .filter(|path| !render.dirs_only || path.is_dir())
        .collect();
    entries.sort();
    let [tee, corner, vertical, blank] = render.glyphs();
    for (i, path) in entries.iter().enumerate() {
        let last = i + 1 == entries.len();
        let name = path.file_name().unwrap();
        let text = if render.full_path {
            shown.join(name).display().to_string()
        } else {
            name.to_string_lossy().into_owned()
        };
        let connector = if last { corner } else { tee };
        let label = render.label(&text, path.is_dir());
        let info = render.info(path);
        if render.metafirst {
            out.push_str(&format!("{}{}{}{}\n", info, prefix, connector, label));
        } else {
            out.push_str(&format!("{}{}{}{}\n", prefix, connector, info, label));
        }
        if path.is_dir() {
            counts.dirs += 1;
            if render.max_depth.is_none_or(|max| level < max) {
                let child_prefix = format!("{}{}", prefix, if last { blank } else { vertical });
                render_dir(
                    path,
                    &shown.join(name),
                    &child_prefix,
                    level + 1,
                    render,
                    out,
                    counts,
                );
            }
        } else {
            counts.files += 1;
        }
    }
}

/// Every visible dataset root under `root`, root included.
pub fn dataset_roots(root: &Path) -> Vec<PathBuf> {
    let mut roots: Vec<PathBuf> = WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(false)
        .git_exclude(false)
        .git_global(false)
        .ignore(false)
        .parents(false)
        .build()
        .filter_map(Result::ok)
        .map(|entry| entry.into_path())
        .filter(|path| DataladOracle.is_dataset_root(path))
        .collect();
    roots.sort();
    roots
}

/// Writes a shell script standing in for `tree`: it records its arguments,
/// prints `output` and exits with `code`. Run it as `sh <script>`.
pub fn fake_engine(dir: &Path, output: &str, code: i32) -> PathBuf {
    let output_file = dir.join("engine-output");
    fs::write(&output_file, output).unwrap();
    let script = dir.join("fake-tree.sh");
    fs::write(
        &script,
        format!(
            "printf '%s\\n' \"$@\" > '{args}'\ncat '{output}'\nexit {code}\n",
            args = dir.join("engine-args").display(),
            output = output_file.display(),
            code = code,
        ),
    )
    .unwrap();
    script
}

/// Arguments the fake engine was called with, one per line.
pub fn recorded_args(dir: &Path) -> Vec<String> {
    fs::read_to_string(dir.join("engine-args"))
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

/// Whether a real `tree` binary is on `PATH`.
pub fn tree_available() -> bool {
    Command::new("tree")
        .arg("--version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}
