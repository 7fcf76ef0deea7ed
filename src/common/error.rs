use thiserror::Error;

/// Result type for classremap operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the classremap library and shell
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid mapping: {message}")]
    InvalidMapping { message: String },

    #[error("mapping builder misuse: {message}")]
    BuilderState { message: String },

    #[error("mapping builder touched from a thread other than its creator")]
    ForeignThread,

    #[error("unrecognized constant pool tag {tag} at offset {offset}")]
    UnsupportedClassVersion { tag: u8, offset: usize },

    #[error("malformed class file: {message}")]
    MalformedClassFile { message: String },

    #[error("patched UTF-8 constant length {length} does not fit in 16 bits")]
    LengthOverflow { length: usize },

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("mapping file error: {message}")]
    MappingFile { message: String },
}

impl Error {
    /// Create an invalid-mapping error
    pub fn invalid_mapping(message: impl Into<String>) -> Self {
        Self::InvalidMapping { message: message.into() }
    }

    /// Create a builder-state error
    pub fn builder_state(message: impl Into<String>) -> Self {
        Self::BuilderState { message: message.into() }
    }

    /// Create a malformed-class-file error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedClassFile { message: message.into() }
    }

    /// Create a mapping-file error
    pub fn mapping_file(message: impl Into<String>) -> Self {
        Self::MappingFile { message: message.into() }
    }
}
