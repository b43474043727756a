use crate::annotate::{DS_MARKER, DatasetOracle, should_mark};
use crate::classify::classify;
use crate::error::DsTreeError;
use crate::glyphs::Glyphs;
use crate::options::{OutputStyle, TreeOptions};
use crate::reconstruct::{PathReconstructor, resolve_kind};
use crate::types::{LineKind, RunOutcome, StreamStats};
use std::io::{self, BufRead, BufReader, Write};
use std::process::{Command, ExitStatus, Stdio};

/// Exit code reported when the engine cannot be launched at all.
pub const EXIT_SPAWN_FAILURE: i32 = 127;

fn split_terminator(line: &[u8]) -> (&[u8], &[u8]) {
    if let Some(body) = line.strip_suffix(b"\r\n") {
        (body, &b"\r\n"[..])
    } else if let Some(body) = line.strip_suffix(b"\n") {
        (body, &b"\n"[..])
    } else {
        (line, &[])
    }
}

enum Emit {
    Written,
    Closed,
}

fn emit<W: Write>(out: &mut W, parts: &[&[u8]]) -> Result<Emit, DsTreeError> {
    for part in parts {
        match out.write_all(part) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => return Ok(Emit::Closed),
            Err(e) => return Err(DsTreeError::io("output", e)),
        }
    }
    Ok(Emit::Written)
}

/// Annotates a stream of `tree` output, writing every line as soon as it is read.
///
/// Bytes are copied through unchanged; the only addition is [`DS_MARKER`] on
/// dataset-root lines. Lines are decoded lossily for parsing only.
pub fn annotate_stream<R, W, O>(
    mut reader: R,
    out: &mut W,
    style: &OutputStyle,
    glyphs: &Glyphs,
    oracle: &O,
) -> Result<StreamStats, DsTreeError>
where
    R: BufRead,
    W: Write,
    O: DatasetOracle + ?Sized,
{
    let mut stats = StreamStats::default();
    let mut reconstructor = PathReconstructor::new(style);
    let mut buf = Vec::with_capacity(256);
    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|e| DsTreeError::io("engine output", e))?;
        if read == 0 {
            break;
        }
        stats.lines += 1;
        let (body, terminator) = split_terminator(&buf);
        let text = String::from_utf8_lossy(body);
        let classified = classify(&text, style, glyphs);
        if classified.kind == LineKind::Other && !style.structured && !text.trim().is_empty() {
            stats.unparsed += 1;
            #[cfg(feature = "logging")]
            tracing::warn!("Unrecognised line left as is: {:?}", text);
        }
        let (path, kind) = match reconstructor.resolve(&classified) {
            Some((path, kind)) => {
                let kind = resolve_kind(kind, &path);
                (Some(path), kind)
            }
            None => (None, classified.kind),
        };
        if kind == LineKind::Directory && path.is_some() {
            stats.directories += 1;
        }
        let marker: &[u8] = if should_mark(kind, path.as_deref(), oracle) {
            stats.marked += 1;
            DS_MARKER.as_bytes()
        } else {
            &[]
        };
        if let Emit::Closed = emit(out, &[body, marker, terminator])? {
            stats.truncated = true;
            break;
        }
    }
    match out.flush() {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => stats.truncated = true,
        Err(e) => return Err(DsTreeError::io("output", e)),
        Ok(()) => {}
    }
    Ok(stats)
}

/// Runs the engine once and annotates its output into `out`.
///
/// The engine's exit code is returned unchanged, even when it is non-zero;
/// whatever it printed before failing has been written by then.
pub fn run<W, O>(options: &TreeOptions, oracle: &O, out: &mut W) -> Result<RunOutcome, DsTreeError>
where
    W: Write,
    O: DatasetOracle + ?Sized,
{
    run_with_glyphs(options, &Glyphs::default(), oracle, out)
}

/// [`run`] with a custom glyph alphabet.
pub fn run_with_glyphs<W, O>(
    options: &TreeOptions,
    glyphs: &Glyphs,
    oracle: &O,
    out: &mut W,
) -> Result<RunOutcome, DsTreeError>
where
    W: Write,
    O: DatasetOracle + ?Sized,
{
    let args = options.to_args();
    #[cfg(feature = "logging")]
    tracing::debug!("Running {} {:?}", options.program.display(), args);
    let mut child = Command::new(&options.program)
        .args(&args)
        .stdout(Stdio::piped())
        .spawn()
        .map_err(|source| DsTreeError::Spawn {
            program: options.program.clone(),
            source,
        })?;
    let stdout = child.stdout.take().ok_or_else(|| {
        DsTreeError::io("engine output", io::Error::other("stdout was not captured"))
    })?;
    let style = options.style();
    let stats = match annotate_stream(BufReader::new(stdout), out, &style, glyphs, oracle) {
        Ok(stats) => stats,
        Err(e) => {
            let _ = child.kill();
            let _ = child.wait();
            return Err(e);
        }
    };
    let status = child.wait().map_err(|e| DsTreeError::io("engine", e))?;
    #[cfg(feature = "logging")]
    tracing::debug!(
        "Engine exited with {} after {} lines ({} marked)",
        status,
        stats.lines,
        stats.marked
    );
    Ok(RunOutcome {
        exit_code: exit_code(status),
        stats,
    })
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status
        .code()
        .or_else(|| status.signal().map(|signal| 128 + signal))
        .unwrap_or(1)
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}
