//! Archive transformation.
//!
//! Iterates the members of a jar (or any zip-based bundle), rewriting every
//! `.class` member through the core transformer and copying the rest
//! untouched. Member order, compression method and unix permissions are
//! preserved.

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use log::debug;
use tempfile::NamedTempFile;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use crate::common::{Error, Result};
use crate::transform::{self, MappingTable};

const CLASS_MEMBER_SUFFIX: &str = ".class";

/// Counts reported after transforming one archive
#[derive(Debug, Default, Clone, Copy)]
pub struct JarSummary {
    /// Total members seen, directories included
    pub members: usize,
    /// Members recognized as class files
    pub classes: usize,
    /// Class members that actually changed
    pub rewritten: usize,
}

/// Transform the archive at `input` into a new archive at `output`.
///
/// The output is staged in `output`'s directory and renamed into place only
/// after the whole archive succeeds; a failing member leaves no file behind.
pub fn transform_jar(input: &Path, output: &Path, mapping: &MappingTable) -> Result<JarSummary> {
    let mut archive = ZipArchive::new(BufReader::new(File::open(input)?))?;
    let staging_dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    // deleted on drop, so every early return cleans up after itself
    let mut staging = NamedTempFile::new_in(staging_dir)?;
    let mut summary = JarSummary::default();

    {
        let mut writer = ZipWriter::new(staging.as_file_mut());
        for i in 0..archive.len() {
            let mut member = archive.by_index(i)?;
            summary.members += 1;
            let name = member.name().to_owned();

            let mut options =
                SimpleFileOptions::default().compression_method(member.compression());
            if let Some(mode) = member.unix_mode() {
                options = options.unix_permissions(mode);
            }
            if member.is_dir() {
                writer.add_directory(name.as_str(), options)?;
                continue;
            }

            let mut data = Vec::with_capacity(member.size() as usize);
            member.read_to_end(&mut data)?;

            let payload: Cow<'_, [u8]> = if name.ends_with(CLASS_MEMBER_SUFFIX) {
                summary.classes += 1;
                let rewritten = transform::transform(&data, mapping)?;
                if matches!(rewritten, Cow::Owned(_)) {
                    summary.rewritten += 1;
                    debug!("rewrote archive member {name}");
                }
                rewritten
            } else {
                Cow::Borrowed(data.as_slice())
            };

            writer.start_file(name.as_str(), options)?;
            writer.write_all(&payload)?;
        }
        writer.finish()?;
    }

    staging.persist(output).map_err(|e| Error::Io(e.error))?;
    Ok(summary)
}
