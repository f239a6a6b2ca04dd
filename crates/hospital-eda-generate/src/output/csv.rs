use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use sha2::{Digest, Sha256};

use hospital_eda_core::write_atomic;

/// Bytes and digest of a written file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub bytes_written: u64,
    pub sha256: String,
}

/// Write `rows` as CSV under a fixed header, replacing any previous file.
///
/// The header is written explicitly so that an empty table still carries it.
pub fn write_table_csv<T: Serialize>(
    path: &Path,
    columns: &[&str],
    rows: &[T],
) -> Result<WrittenFile, csv::Error> {
    write_atomic(path, |file: &mut File| {
        let digesting = DigestWriter::new(BufWriter::new(file));
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(digesting);

        writer.write_record(columns)?;
        for row in rows {
            writer.serialize(row)?;
        }

        writer.flush()?;
        let digesting = writer.into_inner().map_err(|err| err.into_error())?;
        Ok(digesting.finish()?)
    })
}

/// Counts and hashes everything passing through to `inner`.
struct DigestWriter<W: Write> {
    inner: W,
    bytes: u64,
    hasher: Sha256,
}

impl<W: Write> DigestWriter<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            bytes: 0,
            hasher: Sha256::new(),
        }
    }

    fn finish(mut self) -> std::io::Result<WrittenFile> {
        self.inner.flush()?;
        Ok(WrittenFile {
            bytes_written: self.bytes,
            sha256: hex::encode(self.hasher.finalize()),
        })
    }
}

impl<W: Write> Write for DigestWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.hasher.update(&buf[..size]);
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
