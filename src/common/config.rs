use std::path::PathBuf;

/// Shell configuration shared by the CLI and the path dispatcher
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Mapping properties file overriding the embedded default mapping
    pub mapping_file: Option<PathBuf>,
    /// Report every rewritten file on stdout
    pub verbose: bool,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mapping_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.mapping_file = Some(path.into());
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}
