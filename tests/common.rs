// Common test utilities: hand-assembled class file images and mapping tables.

#![allow(dead_code)]

use classremap::classfile::{mutf8, walk, PoolEntryKind};
use classremap::MappingTable;

/// Constant pool entries the fixture builder can emit.
pub enum Const<'a> {
    Utf8(&'a str),
    /// Utf8 entry with an explicit payload, for near-64K boundary tests
    Utf8Bytes(Vec<u8>),
    Integer(i32),
    Long(i64),
    ClassRef(u16),
    Str(u16),
    MethodRef(u16, u16),
    NameAndType(u16, u16),
    MethodHandle(u8, u16),
    /// Raw bytes emitted as-is, occupying one logical slot; for bad-tag tests
    Raw(Vec<u8>),
}

/// Assemble a class file image: magic, version 55.0, the given constants,
/// then `trailer` standing in for everything past the pool.
pub fn class_file(constants: &[Const], trailer: &[u8]) -> Vec<u8> {
    let mut pool_size: u16 = 1;
    let mut body = Vec::new();
    for c in constants {
        pool_size += match c {
            Const::Long(_) => 2,
            _ => 1,
        };
        match c {
            Const::Utf8(text) => {
                let payload = mutf8::encode(text);
                body.push(1);
                body.extend_from_slice(&(payload.len() as u16).to_be_bytes());
                body.extend_from_slice(&payload);
            }
            Const::Utf8Bytes(payload) => {
                body.push(1);
                body.extend_from_slice(&(payload.len() as u16).to_be_bytes());
                body.extend_from_slice(payload);
            }
            Const::Integer(v) => {
                body.push(3);
                body.extend_from_slice(&v.to_be_bytes());
            }
            Const::Long(v) => {
                body.push(5);
                body.extend_from_slice(&v.to_be_bytes());
            }
            Const::ClassRef(idx) => {
                body.push(7);
                body.extend_from_slice(&idx.to_be_bytes());
            }
            Const::Str(idx) => {
                body.push(8);
                body.extend_from_slice(&idx.to_be_bytes());
            }
            Const::MethodRef(class, nt) => {
                body.push(10);
                body.extend_from_slice(&class.to_be_bytes());
                body.extend_from_slice(&nt.to_be_bytes());
            }
            Const::NameAndType(name, desc) => {
                body.push(12);
                body.extend_from_slice(&name.to_be_bytes());
                body.extend_from_slice(&desc.to_be_bytes());
            }
            Const::MethodHandle(kind, idx) => {
                body.push(15);
                body.push(*kind);
                body.extend_from_slice(&idx.to_be_bytes());
            }
            Const::Raw(bytes) => body.extend_from_slice(bytes),
        }
    }

    let mut image = vec![0xCA, 0xFE, 0xBA, 0xBE, 0x00, 0x00, 0x00, 0x37];
    image.extend_from_slice(&pool_size.to_be_bytes());
    image.extend_from_slice(&body);
    image.extend_from_slice(trailer);
    image
}

/// Build a mapping table from textual pairs.
pub fn table(pairs: &[(&str, &str)]) -> MappingTable {
    let mut builder = MappingTable::builder();
    for (from, to) in pairs {
        builder.add(from, to).expect("valid test mapping");
    }
    builder.build().expect("non-empty test mapping")
}

fn pool_count(class: &[u8]) -> u16 {
    u16::from_be_bytes([class[8], class[9]])
}

/// Utf8 payloads of `class`, in pool order.
pub fn utf8_payloads(class: &[u8]) -> Vec<Vec<u8>> {
    let mut payloads = Vec::new();
    walk(class, pool_count(class), 10, |e| {
        if e.kind == PoolEntryKind::Utf8 {
            payloads.push(class[e.payload_offset..e.payload_offset + e.payload_len].to_vec());
        }
    })
    .expect("walkable fixture");
    payloads
}

/// Kind sequence of `class`'s constant pool.
pub fn pool_kinds(class: &[u8]) -> Vec<PoolEntryKind> {
    let mut kinds = Vec::new();
    walk(class, pool_count(class), 10, |e| kinds.push(e.kind)).expect("walkable fixture");
    kinds
}

/// `(kind, payload_bytes)` for every non-Utf8 entry, in pool order.
pub fn non_utf8_payloads(class: &[u8]) -> Vec<(PoolEntryKind, Vec<u8>)> {
    let mut entries = Vec::new();
    walk(class, pool_count(class), 10, |e| {
        if e.kind != PoolEntryKind::Utf8 {
            entries.push((
                e.kind,
                class[e.payload_offset..e.payload_offset + e.payload_len].to_vec(),
            ));
        }
    })
    .expect("walkable fixture");
    entries
}
