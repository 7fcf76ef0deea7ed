// Global caps and well-known names shared across the shell

// Largest class file the shell will read; keeps every offset in signed 32-bit range
pub const MAX_CLASS_FILE_SIZE: u64 = i32::MAX as u64;

// File extensions the path dispatcher recognizes
pub const CLASS_FILE_EXT: &str = "class";
pub const ARCHIVE_EXTS: &[&str] = &["jar", "war", "ear", "zip"];

// Class file header: magic (4) + minor/major version (4) + constant pool count (2)
pub const CLASS_HEADER_LEN: usize = 10;

// Offset of the big-endian u16 constant pool count within the header
pub const POOL_COUNT_OFFSET: usize = 8;

pub const CLASS_MAGIC: [u8; 4] = [0xCA, 0xFE, 0xBA, 0xBE];
