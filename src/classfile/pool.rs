//! Constant pool walking.
//!
//! The walker is a stateless forward cursor over the typed, variable-width
//! entries at the head of a class file. It never interprets entry contents;
//! it only knows each tag's on-disk width, in accordance with the Java VM
//! specification (version 13).

use crate::common::{Error, Result};

mod constant_tags {
    pub const CONSTANT_UTF8: u8 = 1;
    pub const CONSTANT_INTEGER: u8 = 3;
    pub const CONSTANT_FLOAT: u8 = 4;
    pub const CONSTANT_LONG: u8 = 5;
    pub const CONSTANT_DOUBLE: u8 = 6;
    pub const CONSTANT_CLASS: u8 = 7;
    pub const CONSTANT_STRING: u8 = 8;
    pub const CONSTANT_FIELDREF: u8 = 9;
    pub const CONSTANT_METHODREF: u8 = 10;
    pub const CONSTANT_INTERFACEMETHODREF: u8 = 11;
    pub const CONSTANT_NAMEANDTYPE: u8 = 12;
    pub const CONSTANT_METHODHANDLE: u8 = 15;
    pub const CONSTANT_METHODTYPE: u8 = 16;
    pub const CONSTANT_DYNAMIC: u8 = 17;
    pub const CONSTANT_INVOKEDYNAMIC: u8 = 18;
    pub const CONSTANT_MODULE: u8 = 19;
    pub const CONSTANT_PACKAGE: u8 = 20;
}

/// Recognized constant pool entry kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolEntryKind {
    Utf8,
    Integer,
    Float,
    Long,
    Double,
    Class,
    String,
    FieldRef,
    MethodRef,
    InterfaceMethodRef,
    NameAndType,
    MethodHandle,
    MethodType,
    Dynamic,
    InvokeDynamic,
    Module,
    Package,
}

impl PoolEntryKind {
    pub fn from_tag(tag: u8) -> Option<Self> {
        use constant_tags::*;
        Some(match tag {
            CONSTANT_UTF8 => Self::Utf8,
            CONSTANT_INTEGER => Self::Integer,
            CONSTANT_FLOAT => Self::Float,
            CONSTANT_LONG => Self::Long,
            CONSTANT_DOUBLE => Self::Double,
            CONSTANT_CLASS => Self::Class,
            CONSTANT_STRING => Self::String,
            CONSTANT_FIELDREF => Self::FieldRef,
            CONSTANT_METHODREF => Self::MethodRef,
            CONSTANT_INTERFACEMETHODREF => Self::InterfaceMethodRef,
            CONSTANT_NAMEANDTYPE => Self::NameAndType,
            CONSTANT_METHODHANDLE => Self::MethodHandle,
            CONSTANT_METHODTYPE => Self::MethodType,
            CONSTANT_DYNAMIC => Self::Dynamic,
            CONSTANT_INVOKEDYNAMIC => Self::InvokeDynamic,
            CONSTANT_MODULE => Self::Module,
            CONSTANT_PACKAGE => Self::Package,
            _ => return None,
        })
    }

    pub fn tag(self) -> u8 {
        use constant_tags::*;
        match self {
            Self::Utf8 => CONSTANT_UTF8,
            Self::Integer => CONSTANT_INTEGER,
            Self::Float => CONSTANT_FLOAT,
            Self::Long => CONSTANT_LONG,
            Self::Double => CONSTANT_DOUBLE,
            Self::Class => CONSTANT_CLASS,
            Self::String => CONSTANT_STRING,
            Self::FieldRef => CONSTANT_FIELDREF,
            Self::MethodRef => CONSTANT_METHODREF,
            Self::InterfaceMethodRef => CONSTANT_INTERFACEMETHODREF,
            Self::NameAndType => CONSTANT_NAMEANDTYPE,
            Self::MethodHandle => CONSTANT_METHODHANDLE,
            Self::MethodType => CONSTANT_METHODTYPE,
            Self::Dynamic => CONSTANT_DYNAMIC,
            Self::InvokeDynamic => CONSTANT_INVOKEDYNAMIC,
            Self::Module => CONSTANT_MODULE,
            Self::Package => CONSTANT_PACKAGE,
        }
    }

    /// Fixed body width beyond the tag byte; `None` for Utf8, whose width is
    /// carried in its own 2-byte length prefix.
    fn body_width(self) -> Option<usize> {
        match self {
            Self::Utf8 => None,
            Self::Class
            | Self::String
            | Self::MethodType
            | Self::Module
            | Self::Package => Some(2),
            Self::MethodHandle => Some(3),
            Self::Integer
            | Self::Float
            | Self::FieldRef
            | Self::MethodRef
            | Self::InterfaceMethodRef
            | Self::NameAndType
            | Self::Dynamic
            | Self::InvokeDynamic => Some(4),
            Self::Long | Self::Double => Some(8),
        }
    }

    /// Logical slots the entry occupies; 8-byte numeric literals take two.
    fn slots(self) -> u16 {
        match self {
            Self::Long | Self::Double => 2,
            _ => 1,
        }
    }
}

/// One visited constant pool entry.
///
/// For `Utf8` entries `payload_offset` points past the 2-byte length prefix
/// and `payload_len` is the prefix value; for every other kind the payload is
/// the fixed-width body immediately after the tag byte.
#[derive(Debug, Clone, Copy)]
pub struct PoolEntry {
    /// 1-based logical index, matching the VM's numbering
    pub index: u16,
    pub kind: PoolEntryKind,
    /// Offset of the entry's tag byte
    pub offset: usize,
    pub payload_offset: usize,
    pub payload_len: usize,
}

/// Read a big-endian unsigned 16-bit value at `offset`.
pub fn read_u16(bytes: &[u8], offset: usize) -> Result<u16> {
    if offset + 2 > bytes.len() {
        return Err(Error::malformed(format!(
            "u16 read at offset {offset} past end of {}-byte buffer",
            bytes.len()
        )));
    }
    Ok(u16::from_be_bytes([bytes[offset], bytes[offset + 1]]))
}

/// Write a big-endian unsigned 16-bit value at `offset`.
pub(crate) fn write_u16(bytes: &mut [u8], offset: usize, value: u16) {
    bytes[offset..offset + 2].copy_from_slice(&value.to_be_bytes());
}

/// Walk the `pool_size - 1` logical entries starting at `start`, yielding
/// each to `visit`, and return the offset immediately past the pool.
///
/// Unknown tags fail with [`Error::UnsupportedClassVersion`]; a cursor that
/// would run past the buffer fails with [`Error::MalformedClassFile`].
pub fn walk<F>(bytes: &[u8], pool_size: u16, start: usize, mut visit: F) -> Result<usize>
where
    F: FnMut(PoolEntry),
{
    let mut offset = start;
    // wider than u16: a boundary pool whose last entry is a Long/Double
    // steps the cursor to pool_size + 1, past the u16 range
    let mut index: u32 = 1;
    while index < pool_size as u32 {
        let entry_offset = offset;
        let tag = *bytes.get(offset).ok_or_else(|| {
            Error::malformed(format!(
                "constant pool entry {index} starts past end of {}-byte buffer",
                bytes.len()
            ))
        })?;
        offset += 1;
        let kind = PoolEntryKind::from_tag(tag)
            .ok_or(Error::UnsupportedClassVersion { tag, offset: entry_offset })?;

        let (payload_offset, payload_len) = match kind.body_width() {
            None => {
                let len = read_u16(bytes, offset)? as usize;
                (offset + 2, len)
            }
            Some(width) => (offset, width),
        };
        let end = payload_offset + payload_len;
        if end > bytes.len() {
            return Err(Error::malformed(format!(
                "constant pool entry {index} ({kind:?}) runs to offset {end} past end of {}-byte buffer",
                bytes.len()
            )));
        }

        visit(PoolEntry {
            index: index as u16,
            kind,
            offset: entry_offset,
            payload_offset,
            payload_len,
        });

        offset = end;
        index += kind.slots() as u32;
    }
    Ok(offset)
}

/// Count `Utf8` entries in the pool; used to pre-size the rewriter's plan.
pub fn count_utf8_entries(bytes: &[u8], pool_size: u16, start: usize) -> Result<usize> {
    let mut count = 0usize;
    walk(bytes, pool_size, start, |entry| {
        if entry.kind == PoolEntryKind::Utf8 {
            count += 1;
        }
    })?;
    Ok(count)
}
