//! In-place removal of a file's leading bytes.
//!
//! The tail `[trim, total)` is shifted down to `[0, total - trim)` one chunk at
//! a time, then the file is cut to its new length. Each chunk is read in full
//! before it is written back, and the write offset never passes the read
//! offset, so overlapping source and destination ranges are safe.

use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};
use std::num::NonZeroUsize;

use tracing::debug;

use super::error::{LedgerError, Result};

/// Handles whose length can be cut down in place
pub trait Truncate {
    fn truncate(&mut self, len: u64) -> io::Result<()>;
}

impl Truncate for File {
    fn truncate(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)
    }
}

impl Truncate for Cursor<Vec<u8>> {
    fn truncate(&mut self, len: u64) -> io::Result<()> {
        let len = usize::try_from(len).map_err(io::Error::other)?;
        self.get_mut().truncate(len);
        Ok(())
    }
}

/// Drop the first `trim` bytes of a `total`-byte file, buffering at most
/// `chunk` bytes at a time (`None` buffers the whole remaining tail).
///
/// Leaves the handle positioned at the new end of file and returns the new
/// length.
pub fn compact<F>(file: &mut F, trim: u64, total: u64, chunk: Option<NonZeroUsize>) -> Result<u64>
where
    F: Read + Write + Seek + Truncate,
{
    debug_assert!(trim <= total, "trim {trim} exceeds file length {total}");
    let keep = total - trim;

    if keep > 0 {
        let tail = usize::try_from(keep).unwrap_or(usize::MAX);
        let size = chunk.map_or(tail, |c| c.get().min(tail));
        let mut buffer = vec![0u8; size];

        let mut read_offset = trim;
        let mut write_offset = 0u64;

        while write_offset < keep {
            let want = usize::try_from(keep - write_offset).map_or(size, |left| left.min(size));

            file.seek(SeekFrom::Start(read_offset))?;
            let read = read_some(file, &mut buffer[..want])?;
            if read == 0 {
                return Err(LedgerError::ShortRead {
                    expected: keep,
                    copied: write_offset,
                });
            }

            file.seek(SeekFrom::Start(write_offset))?;
            file.write_all(&buffer[..read])?;

            read_offset += read as u64;
            write_offset += read as u64;
        }
    }

    file.truncate(keep)?;
    file.seek(SeekFrom::End(0))?;
    debug!(trimmed = trim, kept = keep, "Compacted log file");
    Ok(keep)
}

fn read_some<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match reader.read(buf) {
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            other => return other,
        }
    }
}
