//! Two-pass class file rewriter.
//!
//! Pass 1 walks the constant pool and scans every Utf8 payload for mapping
//! matches, accumulating a patch plan. Pass 2 copies the input into an
//! exactly-sized output buffer, splicing replacements and fixing the 2-byte
//! length prefix of each patched entry. Everything outside matched Utf8
//! payloads (header, non-Utf8 entries, method bodies, attributes) is copied
//! verbatim at its shifted offset.

use std::borrow::Cow;

use crate::classfile::pool::{self, PoolEntryKind};
use crate::common::consts::{CLASS_HEADER_LEN, CLASS_MAGIC, POOL_COUNT_OFFSET};
use crate::common::{Error, Result};

use super::mapping::MappingTable;

#[derive(Debug)]
struct Replacement {
    /// 0-based index into the mapping table
    mapping: usize,
    /// Whole-file offset of the matched `from` sequence
    at: usize,
}

/// All replacements within a single Utf8 entry, in increasing offset order
#[derive(Debug)]
struct PatchRecord {
    /// Whole-file offset where the entry's payload begins, just past the
    /// 2-byte length prefix
    entry_body_offset: usize,
    /// Signed sum of `|to| - |from|` over this entry's replacements
    net_len_delta: isize,
    replacements: Vec<Replacement>,
}

/// Rewrite `class` according to `mapping`.
///
/// Returns the input borrowed when nothing matched, otherwise a freshly
/// allocated buffer of exactly `class.len()` plus the net length delta.
/// Structural errors abort with no partial output.
pub fn transform<'a>(class: &'a [u8], mapping: &MappingTable) -> Result<Cow<'a, [u8]>> {
    if class.len() < CLASS_HEADER_LEN {
        return Err(Error::malformed(format!(
            "{} bytes is shorter than the {CLASS_HEADER_LEN}-byte class file header",
            class.len()
        )));
    }
    if class[..4] != CLASS_MAGIC {
        return Err(Error::malformed("missing 0xCAFEBABE magic"));
    }
    let pool_size = pool::read_u16(class, POOL_COUNT_OFFSET)?;
    let utf8_count = pool::count_utf8_entries(class, pool_size, CLASS_HEADER_LEN)?;

    let mut plan: Vec<PatchRecord> = Vec::with_capacity(utf8_count);
    let mut total_delta: isize = 0;
    pool::walk(class, pool_size, CLASS_HEADER_LEN, |entry| {
        if entry.kind != PoolEntryKind::Utf8 {
            return;
        }
        let begin = entry.payload_offset;
        if let Some(record) = scan_entry(class, begin, begin + entry.payload_len, mapping) {
            total_delta += record.net_len_delta;
            plan.push(record);
        }
    })?;

    if plan.is_empty() {
        return Ok(Cow::Borrowed(class));
    }
    materialize(class, mapping, &plan, total_delta).map(Cow::Owned)
}

/// Scan one Utf8 payload, left to right, first match wins at each position.
/// Matched spans are skipped whole, so matches never overlap; the window
/// bound keeps them from spanning the entry boundary.
fn scan_entry(
    class: &[u8],
    begin: usize,
    end: usize,
    mapping: &MappingTable,
) -> Option<PatchRecord> {
    let min = mapping.min_from_len();
    let mut record: Option<PatchRecord> = None;
    let mut i = begin;
    while i + min <= end {
        match mapping.match_at(class, i, end) {
            Some(index) => {
                let entry = &mapping.entries()[index];
                let record = record.get_or_insert_with(|| PatchRecord {
                    entry_body_offset: begin,
                    net_len_delta: 0,
                    replacements: Vec::with_capacity((end - i) / min + 2),
                });
                record.net_len_delta += entry.to.len() as isize - entry.from.len() as isize;
                record.replacements.push(Replacement { mapping: index, at: i });
                i += entry.from.len();
            }
            None => i += 1,
        }
    }
    record
}

fn materialize(
    class: &[u8],
    mapping: &MappingTable,
    plan: &[PatchRecord],
    total_delta: isize,
) -> Result<Vec<u8>> {
    let out_len = (class.len() as isize + total_delta) as usize;
    let mut out = vec![0u8; out_len];
    out[..CLASS_HEADER_LEN].copy_from_slice(&class[..CLASS_HEADER_LEN]);

    let mut src = CLASS_HEADER_LEN;
    let mut dst = CLASS_HEADER_LEN;
    for record in plan {
        // copy through this entry's tag byte and length prefix, together with
        // any intervening entries since the previous record
        let run = record.entry_body_offset - src;
        out[dst..dst + run].copy_from_slice(&class[src..src + run]);
        src += run;
        dst += run;

        let new_len = pool::read_u16(class, src - 2)? as isize + record.net_len_delta;
        if new_len > u16::MAX as isize {
            return Err(Error::LengthOverflow { length: new_len as usize });
        }
        pool::write_u16(&mut out, dst - 2, new_len as u16);

        for rep in &record.replacements {
            let run = rep.at - src;
            out[dst..dst + run].copy_from_slice(&class[src..src + run]);
            src += run;
            dst += run;

            let entry = &mapping.entries()[rep.mapping];
            out[dst..dst + entry.to.len()].copy_from_slice(&entry.to);
            src += entry.from.len();
            dst += entry.to.len();
        }
        // the rest of this payload rides along with the next record's run,
        // or with the final flush
    }
    let tail = class.len() - src;
    out[dst..dst + tail].copy_from_slice(&class[src..src + tail]);
    debug_assert_eq!(dst + tail, out.len());
    Ok(out)
}
