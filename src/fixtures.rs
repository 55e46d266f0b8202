//! Shared helpers for building archives in tests.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use zip::{write::SimpleFileOptions, CompressionMethod, ZipWriter};

pub fn init_test_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,zipingest=debug")),
        )
        .with_test_writer()
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Write a zip at `dir/name` holding `entries` in order. Names ending in
/// `/` become directory entries.
pub fn write_zip(dir: &Path, name: &str, entries: &[(&str, &str)]) -> PathBuf {
    let path = dir.join(name);
    let file = File::create(&path).expect("create zip");
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    for (entry, data) in entries {
        if entry.ends_with('/') {
            zip.add_directory(*entry, options).expect("add directory");
        } else {
            zip.start_file(*entry, options).expect("start file");
            zip.write_all(data.as_bytes()).expect("write entry");
        }
    }
    zip.finish().expect("finish zip");
    path
}

/// Write a single-entry zip64 archive, then rewrite the zip64 size fields
/// so the entry claims to be 2^60 bytes long.
pub fn write_zip_with_forged_size(dir: &Path, name: &str, entry: &str, data: &str) -> PathBuf {
    let path = dir.join(name);
    let mut zip = ZipWriter::new(File::create(&path).expect("create zip"));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Stored)
        .large_file(true);
    zip.start_file(entry, options).expect("start file");
    zip.write_all(data.as_bytes()).expect("write entry");
    zip.finish().expect("finish zip");

    // zip64 extra field: id 0x0001, u16 length, u64 uncompressed, u64 compressed
    let real = (data.len() as u64).to_le_bytes();
    let forged = (1u64 << 60).to_le_bytes();
    let mut bytes = fs::read(&path).expect("read zip");
    let mut patched = 0;
    for i in 0..bytes.len().saturating_sub(20) {
        if bytes[i..i + 2] == [0x01, 0x00] && bytes[i + 3] == 0 && bytes[i + 4..i + 12] == real {
            bytes[i + 4..i + 12].copy_from_slice(&forged);
            if bytes[i + 12..i + 20] == real {
                bytes[i + 12..i + 20].copy_from_slice(&forged);
            }
            patched += 1;
        }
    }
    assert!(patched > 0, "no zip64 size field found");
    fs::write(&path, bytes).expect("rewrite zip");
    path
}

pub const PEOPLE_CSV: &str = "name,age,score\nalice,31,0.5\nbob,27,1.25\ncarol,45,-3.75\n";
