use std::path::PathBuf;

/// Immutable settings for one listing or extraction run
#[derive(Debug, Clone)]
pub struct Config {
    /// Names to select; empty selects every entry
    pub requested: Vec<String>,
    /// Echo matched names while extracting
    pub verbose: bool,
    /// Reject input whose first header lacks the ustar tag
    pub check_tag: bool,
    /// Verify each header's checksum
    pub verify_checksum: bool,
    /// Extraction root, the current directory when unset
    pub directory: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            requested: Vec::new(),
            verbose: false,
            check_tag: true,
            verify_checksum: false,
            directory: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requested<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.requested = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn check_tag(mut self, check: bool) -> Self {
        self.check_tag = check;
        self
    }

    pub fn verify_checksum(mut self, verify: bool) -> Self {
        self.verify_checksum = verify;
        self
    }

    pub fn directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.directory = Some(dir.into());
        self
    }
}
