//! Shared fixture builders for integration tests.
//!
//! Fixtures are real archives built with the same crates the assembler reads
//! them with, laid out in a Maven-style cache under a temp directory.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

/// Creates a temporary directory inside `.tmp/` for test isolation.
/// The directory is automatically cleaned up when the returned `TempDir` is dropped.
///
/// Converts to an absolute path to avoid issues with parallel test execution.
pub fn test_temp_dir() -> TempDir {
    let tmp_root = Path::new(".tmp");
    std::fs::create_dir_all(tmp_root).expect("Failed to create .tmp directory");
    // Canonicalize to get absolute path, avoiding cwd-related issues in parallel tests
    let tmp_root = tmp_root
        .canonicalize()
        .expect("Failed to canonicalize .tmp path");
    tempfile::tempdir_in(&tmp_root).expect("Failed to create temp dir")
}

/// One entry for a constructed tar archive.
pub enum TarEntry<'a> {
    Dir(&'a str),
    File(&'a str, &'a [u8]),
}

/// Builds a gzip-compressed tar archive in memory.
pub fn gzipped_tar(entries: &[TarEntry<'_>]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());

    for entry in entries {
        match entry {
            TarEntry::Dir(path) => {
                let mut header = tar::Header::new_gnu();
                header.set_entry_type(tar::EntryType::Directory);
                header.set_size(0);
                header.set_mode(0o755);
                header.set_cksum();
                builder
                    .append_data(&mut header, *path, &[][..])
                    .expect("Failed to append tar directory");
            }
            TarEntry::File(path, contents) => {
                let mut header = tar::Header::new_gnu();
                header.set_size(contents.len() as u64);
                header.set_mode(0o644);
                header.set_cksum();
                builder
                    .append_data(&mut header, *path, *contents)
                    .expect("Failed to append tar file");
            }
        }
    }

    let tar_bytes = builder.into_inner().expect("Failed to finish tar");
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&tar_bytes).expect("Failed to gzip tar");
    encoder.finish().expect("Failed to finish gzip")
}

/// Writes a zip archive with the given name → content entries.
pub fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
    let file = std::fs::File::create(path).expect("Failed to create zip");
    let mut writer = zip::ZipWriter::new(file);
    for (name, contents) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .expect("Failed to start zip entry");
        writer.write_all(contents).expect("Failed to write zip entry");
    }
    writer.finish().expect("Failed to finish zip");
}

/// Writes a plugin jar (a zip) containing a manifest, a class file and the
/// given extra entries.
pub fn write_plugin_jar(path: &Path, extra_entries: &[(&str, &[u8])]) {
    let mut entries: Vec<(&str, &[u8])> = vec![
        ("META-INF/MANIFEST.MF", b"Manifest-Version: 1.0\n"),
        ("org/sonar/Plugin.class", b"\xca\xfe\xba\xbe"),
    ];
    entries.extend_from_slice(extra_entries);
    write_zip(path, &entries);
}

/// Places a file into a Maven-layout cache at
/// `<cache>/<group-as-path>/<name>/<version>/<file_name>` and returns its
/// path.
pub fn stage_in_cache(
    cache: &Path,
    group: &str,
    name: &str,
    version: &str,
    file_name: &str,
) -> PathBuf {
    let mut dir = cache.to_path_buf();
    for segment in group.split('.') {
        dir.push(segment);
    }
    dir.push(name);
    dir.push(version);
    std::fs::create_dir_all(&dir).expect("Failed to create cache directory");
    dir.join(file_name)
}
