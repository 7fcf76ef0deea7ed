//! classremap
//!
//! A byte-level rewriter for JVM class files: replaces string literals inside
//! the constant pool according to a user-supplied mapping, canonically
//! migrating `javax/...` references to `jakarta/...` without recompiling from
//! source. Outputs are byte-for-byte equivalent to their inputs except inside
//! matched Utf8 constants, whose length prefixes are recomputed.
//!
//! ## Architecture
//!
//! - **classfile**: modified UTF-8 codec and constant pool walker
//! - **transform**: mapping table builder and the two-pass rewriter
//! - **properties**: `key=value` mapping resources (embedded default included)
//! - **archive**: jar member iteration and rewriting
//! - **bin**: command-line interface
//!
//! ## Flow
//!
//! ```text
//! input bytes → pool walker (discovery) → patch records → materializer → output bytes
//! ```

pub mod archive;
pub mod classfile;
pub mod common;
pub mod properties;
pub mod transform;

pub use common::{Config, Error, Result};
pub use transform::{transform, MappingBuilder, MappingTable};

use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::Path;

use log::{debug, info};
use walkdir::WalkDir;

use common::consts::{ARCHIVE_EXTS, CLASS_FILE_EXT, MAX_CLASS_FILE_SIZE};

/// Counts reported after transforming a directory tree
#[derive(Debug, Default, Clone, Copy)]
pub struct DirSummary {
    /// Regular files visited
    pub files: usize,
    /// Files recognized as class files
    pub classes: usize,
    /// Class files that actually changed
    pub rewritten: usize,
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

pub fn is_class_path(path: &Path) -> bool {
    has_extension(path, CLASS_FILE_EXT)
}

pub fn is_archive_path(path: &Path) -> bool {
    ARCHIVE_EXTS.iter().any(|ext| has_extension(path, ext))
}

/// Mapping table selected by `config`: the given properties file, or the
/// embedded javax -> jakarta default.
pub fn effective_table(config: &Config) -> Result<MappingTable> {
    match &config.mapping_file {
        Some(path) => properties::table_from_path(path),
        None => properties::default_table(),
    }
}

/// Transform a single class file on disk. Returns whether the output differs
/// from the input.
pub fn transform_class_file(input: &Path, output: &Path, mapping: &MappingTable) -> Result<bool> {
    let len = fs::metadata(input)?.len();
    if len > MAX_CLASS_FILE_SIZE {
        return Err(Error::malformed(format!(
            "{} is {len} bytes, larger than the {MAX_CLASS_FILE_SIZE}-byte limit",
            input.display()
        )));
    }
    let bytes = fs::read(input)?;
    let rewritten = transform::transform(&bytes, mapping)?;
    let changed = matches!(rewritten, Cow::Owned(_));
    fs::write(output, rewritten.as_ref())?;
    debug!("{} -> {} (changed: {changed})", input.display(), output.display());
    Ok(changed)
}

/// Mirror the tree under `input` into `output`, transforming every `.class`
/// file and copying everything else.
pub fn transform_directory(
    input: &Path,
    output: &Path,
    mapping: &MappingTable,
    verbose: bool,
) -> Result<DirSummary> {
    let mut summary = DirSummary::default();
    for entry in WalkDir::new(input) {
        let entry = entry.map_err(io::Error::from)?;
        let rel = entry
            .path()
            .strip_prefix(input)
            .expect("walkdir stays under its root");
        let target = output.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        summary.files += 1;
        if is_class_path(entry.path()) {
            summary.classes += 1;
            if transform_class_file(entry.path(), &target, mapping)? {
                summary.rewritten += 1;
                if verbose {
                    println!("rewrote {}", entry.path().display());
                }
            }
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(summary)
}

/// Transform whatever `input` points at (a `.class` file, a jar-style
/// archive, or a directory tree), writing the result to `output`.
pub fn transform_path(input: &Path, output: &Path, config: &Config) -> Result<()> {
    let mapping = effective_table(config)?;
    if input.is_dir() {
        let summary = transform_directory(input, output, &mapping, config.verbose)?;
        info!(
            "{}: {} files, {} classes, {} rewritten",
            input.display(),
            summary.files,
            summary.classes,
            summary.rewritten
        );
        if config.verbose {
            println!(
                "{} classes seen, {} rewritten",
                summary.classes, summary.rewritten
            );
        }
    } else if is_class_path(input) {
        let changed = transform_class_file(input, output, &mapping)?;
        info!("{}: changed = {changed}", input.display());
        if config.verbose {
            println!(
                "{} {}",
                if changed { "rewrote" } else { "copied" },
                input.display()
            );
        }
    } else if is_archive_path(input) {
        let summary = archive::transform_jar(input, output, &mapping)?;
        info!(
            "{}: {} members, {} classes, {} rewritten",
            input.display(),
            summary.members,
            summary.classes,
            summary.rewritten
        );
        if config.verbose {
            println!(
                "{} members, {} classes rewritten",
                summary.members, summary.rewritten
            );
        }
    } else {
        return Err(Error::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "unrecognized input kind: {} (expected .class, an archive, or a directory)",
                input.display()
            ),
        )));
    }
    Ok(())
}
