use std::path::PathBuf;

use clap::{ArgGroup, Parser};

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "untar")]
#[command(version)]
#[command(about = "A Rust tar utility that lists and extracts regular files", long_about = None)]
#[command(group(ArgGroup::new("mode").required(true).args(["list", "extract"])))]
#[command(after_help = "Examples:\n  \
  untar -t -f data.tar               list every file in data.tar\n  \
  untar -x -v -f data.tar a.txt      extract a.txt, echoing its name\n  \
  untar -x -C out -f data.tar        extract everything into out/")]
pub struct Cli {
    /// Files to list or extract (default: all)
    #[arg(value_name = "FILES")]
    pub files: Vec<String>,

    /// List the contents of an archive
    #[arg(short = 't')]
    pub list: bool,

    /// Extract files from an archive
    #[arg(short = 'x')]
    pub extract: bool,

    /// Use archive file ARCHIVE
    #[arg(short = 'f', value_name = "ARCHIVE", required = true)]
    pub archive: PathBuf,

    /// Verbosely list files processed
    #[arg(short = 'v')]
    pub verbose: bool,

    /// Change to directory DIR before extracting
    #[arg(short = 'C', value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Verify header checksums
    #[arg(long)]
    pub verify_checksum: bool,

    /// Accept archives without the ustar tag
    #[arg(long)]
    pub no_tag_check: bool,
}

impl Cli {
    /// Settings for the listing or extraction run
    pub fn config(&self) -> Config {
        let mut config = Config::new()
            .requested(self.files.iter().cloned())
            .verbose(self.verbose)
            .check_tag(!self.no_tag_check)
            .verify_checksum(self.verify_checksum);
        if let Some(dir) = &self.directory {
            config = config.directory(dir);
        }
        config
    }
}
