use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Component, Path, PathBuf};

use log::{debug, info};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::io::ReadAt;

use super::archive::{Archive, Entry};
use super::selector::Selector;

/// Result of a traversal that ran to the end of the archive
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    /// Entries listed or extracted
    pub matched: usize,
    /// Requested names no entry claimed, in request order
    pub missing: Vec<String>,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        self.missing.is_empty()
    }

    /// Turn unmatched requests into [`Error::NotFound`]
    pub fn into_result(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::NotFound {
                missing: self.missing,
            })
        }
    }
}

/// Lists or extracts the selected regular files of an archive
pub struct TarExtractor<'a, R: ReadAt> {
    archive: Archive<R>,
    config: &'a Config,
    selector: Selector,
    warned_absolute: bool,
}

impl<'a, R: ReadAt> TarExtractor<'a, R> {
    /// Take ownership of the source and run the open-time tag check
    pub fn new(reader: R, config: &'a Config) -> Result<Self> {
        let mut archive = Archive::new(reader).verify_checksum(config.verify_checksum);
        if config.check_tag {
            archive.check_tag()?;
        }
        Ok(Self {
            archive,
            config,
            selector: Selector::new(config.requested.iter().cloned()),
            warned_absolute: false,
        })
    }

    /// Print each selected name on its own line.
    ///
    /// Every line is flushed as soon as it is written, so names printed before
    /// a fatal error stay visible.
    pub fn list<W, D>(mut self, out: &mut W, diag: &mut D) -> Result<Outcome>
    where
        W: Write + ?Sized,
        D: Write + ?Sized,
    {
        let mut matched = 0;
        while let Some(entry) = self.next_selected()? {
            write_name(out, &entry)?;
            matched += 1;
        }
        self.finish(matched, diag)
    }

    /// Write each selected entry to a file named after it.
    ///
    /// Existing files are overwritten. With `verbose`, names are echoed to
    /// `out` before their data is written.
    pub fn extract<W, D>(mut self, out: &mut W, diag: &mut D) -> Result<Outcome>
    where
        W: Write + ?Sized,
        D: Write + ?Sized,
    {
        let mut matched = 0;
        while let Some(entry) = self.next_selected()? {
            let path = self.output_path(&entry, diag)?;
            if self.config.verbose {
                write_name(out, &entry)?;
            }
            self.extract_entry(&entry, &path)?;
            matched += 1;
        }
        self.finish(matched, diag)
    }

    /// Next entry chosen by the selector; any non-regular entry is fatal
    fn next_selected(&mut self) -> Result<Option<Entry>> {
        while let Some(entry) = self.archive.next_entry()? {
            if !entry.header.typeflag.is_regular() {
                return Err(Error::UnsupportedType {
                    name: entry.path(),
                    typeflag: entry.header.typeflag.as_u8(),
                });
            }
            if self.selector.matches(&entry.path_bytes()) {
                return Ok(Some(entry));
            }
            debug!("skipping {:?}", entry.path());
        }
        Ok(None)
    }

    fn finish<D: Write + ?Sized>(self, matched: usize, diag: &mut D) -> Result<Outcome> {
        if let Some(block) = self.archive.lone_zero_block() {
            writeln!(diag, "A lone zero block at {block}")?;
        }

        let missing = self.selector.missing();
        for name in &missing {
            writeln!(diag, "{name}: Not found in archive")?;
        }
        diag.flush()?;

        Ok(Outcome { matched, missing })
    }

    /// Where an entry lands on disk: leading `/` stripped, `..` refused
    fn output_path<D: Write + ?Sized>(&mut self, entry: &Entry, diag: &mut D) -> Result<PathBuf> {
        let name = entry.path_bytes();
        let start = name.iter().position(|&b| b != b'/').unwrap_or(name.len());
        if start > 0 && !self.warned_absolute {
            writeln!(diag, "Removing leading '/' from member names")?;
            self.warned_absolute = true;
        }

        let relative = path_from_bytes(&name[start..]);
        if relative
            .components()
            .any(|c| matches!(c, Component::ParentDir))
        {
            return Err(Error::UnsafePath { name: entry.path() });
        }

        Ok(match &self.config.directory {
            Some(dir) => dir.join(relative),
            None => relative,
        })
    }

    fn extract_entry(&mut self, entry: &Entry, path: &Path) -> Result<()> {
        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut writer = BufWriter::new(File::create(path)?);
        let copied = self.archive.read_data(entry, &mut writer)?;
        writer.flush()?;

        info!("extracted {} ({} bytes)", path.display(), copied);
        Ok(())
    }
}

/// Write the stored name bytes followed by a newline, then flush
fn write_name<W: Write + ?Sized>(out: &mut W, entry: &Entry) -> Result<()> {
    out.write_all(&entry.path_bytes())?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

#[cfg(unix)]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    PathBuf::from(OsStr::from_bytes(bytes))
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(bytes).into_owned())
}
