//! Zip archive assembly for TDS and CTAN bundles.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{Seek, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// Extensions stored with normalized (`\n`) line endings.
///
/// These are the sources and docs people edit; everything else (the built
/// `.sty`, the PDF, nested zips) is copied byte for byte.
pub const TEXT_EXTENSIONS: &[&str] = &["dtx", "ins", "txt", "md", "py", "tex"];

pub fn should_normalize(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| TEXT_EXTENSIONS.iter().any(|t| ext.eq_ignore_ascii_case(t)))
        .unwrap_or(false)
}

/// Rewrite `\r\n` and lone `\r` as `\n`.
pub fn normalize_line_endings(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len());
    let mut iter = bytes.iter().copied().peekable();
    while let Some(byte) = iter.next() {
        if byte == b'\r' {
            if iter.peek() == Some(&b'\n') {
                iter.next();
            }
            out.push(b'\n');
        } else {
            out.push(byte);
        }
    }
    out
}

/// Join path segments into an archive member name.
///
/// Zip member names always use `/`, whatever the host uses.
pub fn archive_path<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("/")
}

/// Options for every member: deflated, with a fixed timestamp so identical
/// inputs produce identical archives.
pub fn entry_options() -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default())
}

/// Add `file` to `archive` as `internal_name`.
///
/// `normalize` forces line-ending normalization on or off; `None` decides
/// from the file extension with [`should_normalize`].
pub fn write_entry<W: Write + Seek>(
    archive: &mut ZipWriter<W>,
    file: &Path,
    internal_name: &str,
    normalize: Option<bool>,
) -> Result<()> {
    let normalize = normalize.unwrap_or_else(|| should_normalize(file));
    let raw = fs::read(file).with_context(|| format!("reading '{}'", file.display()))?;
    let contents = if normalize {
        normalize_line_endings(&raw)
    } else {
        raw
    };

    let name = internal_name.replace('\\', "/");
    archive
        .start_file(name.as_str(), entry_options())
        .with_context(|| format!("adding '{}' to archive", name))?;
    archive
        .write_all(&contents)
        .with_context(|| format!("writing '{}' to archive", name))?;
    Ok(())
}

/// Write a new archive at `output` holding `entries` in order.
///
/// Each entry is `(file on disk, member name)`.
pub fn create_archive(output: &Path, entries: &[(PathBuf, String)]) -> Result<()> {
    let file =
        File::create(output).with_context(|| format!("creating '{}'", output.display()))?;
    let mut archive = ZipWriter::new(file);

    for (source, name) in entries {
        write_entry(&mut archive, source, name, None)?;
    }

    archive
        .finish()
        .with_context(|| format!("finishing '{}'", output.display()))?;
    Ok(())
}
