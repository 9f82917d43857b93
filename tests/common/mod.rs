//! Shared helpers for the integration tests.
//!
//! Archives are produced with the `tar` crate so that traversal is checked
//! against an independent writer.

#![allow(dead_code)]

use std::io::Cursor;
use std::path::{Path, PathBuf};

use untar::{Config, Outcome, StreamReader};

/// Regular-file archive in POSIX ustar format, terminated by two zero blocks
pub fn ustar_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
    build(entries, tar::Header::new_ustar)
}

/// Regular-file archive in GNU format (`"ustar  "` magic)
pub fn gnu_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
    build(entries, tar::Header::new_gnu)
}

fn build(entries: &[(&str, &[u8])], new_header: fn() -> tar::Header) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for (name, data) in entries {
        let mut header = new_header();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_mtime(1_700_000_000);
        header.set_entry_type(tar::EntryType::Regular);
        builder
            .append_data(&mut header, name, *data)
            .expect("append entry");
    }
    builder.into_inner().expect("finish archive")
}

/// Single-entry archive of the given type, without data
pub fn typed_entry(name: &str, entry_type: tar::EntryType) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    let mut header = tar::Header::new_ustar();
    header.set_size(0);
    header.set_mode(0o755);
    header.set_entry_type(entry_type);
    builder
        .append_data(&mut header, name, std::io::empty())
        .expect("append entry");
    let mut bytes = builder.into_inner().expect("finish archive");
    // drop the terminator so entries can be concatenated
    bytes.truncate(bytes.len() - 1024);
    bytes
}

pub fn source(bytes: Vec<u8>) -> StreamReader<Cursor<Vec<u8>>> {
    StreamReader::new(Cursor::new(bytes)).expect("in-memory source")
}

/// Run a listing, returning the result with captured stdout and diagnostics
pub fn run_list(bytes: Vec<u8>, config: &Config) -> (untar::Result<Outcome>, String, String) {
    let mut out = Vec::new();
    let mut diag = Vec::new();
    let result = untar::list(source(bytes), config, &mut out, &mut diag);
    (
        result,
        String::from_utf8(out).expect("utf-8 output"),
        String::from_utf8(diag).expect("utf-8 diagnostics"),
    )
}

/// Run an extraction, returning the result with captured stdout and diagnostics
pub fn run_extract(bytes: Vec<u8>, config: &Config) -> (untar::Result<Outcome>, String, String) {
    let mut out = Vec::new();
    let mut diag = Vec::new();
    let result = untar::extract(source(bytes), config, &mut out, &mut diag);
    (
        result,
        String::from_utf8(out).expect("utf-8 output"),
        String::from_utf8(diag).expect("utf-8 diagnostics"),
    )
}

/// Write archive bytes to `dir/name`
pub fn write_archive(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).expect("write archive");
    path
}
