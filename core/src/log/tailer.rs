//! Incremental reader for a growing log file
//!
//! The cursor starts at end-of-file so history is never replayed. Each read
//! consumes only complete lines; a trailing partial line stays unread until
//! its terminator arrives.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use memchr::{memchr_iter, memrchr};

use crate::error::TailError;

/// Upper bound on bytes consumed by one read
pub const MAX_READ_BYTES: u64 = 1 << 20;

/// Lines read by one call to [`LogTailer::read_new_lines`]
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TailRead {
    pub lines: Vec<String>,
    /// More complete data was available than one read may take
    pub more_pending: bool,
}

pub struct LogTailer {
    path: PathBuf,
    file: File,
    offset: u64,
}

impl LogTailer {
    /// Open `path` with the cursor at its current end.
    pub fn open(path: &Path) -> Result<Self, TailError> {
        let mut file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => TailError::NotFound(path.to_path_buf()),
            _ => io_error(path, e),
        })?;
        let offset = file.seek(SeekFrom::End(0)).map_err(|e| io_error(path, e))?;

        tracing::info!(path = %path.display(), offset, "tailing log file");
        Ok(Self {
            path: path.to_path_buf(),
            file,
            offset,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Byte position of the next unread line
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Read complete lines appended since the last call.
    ///
    /// If the file shrank below the cursor (truncated or replaced in place)
    /// the cursor rewinds to the start.
    pub fn read_new_lines(&mut self) -> Result<TailRead, TailError> {
        let len = self
            .file
            .metadata()
            .map_err(|e| io_error(&self.path, e))?
            .len();

        if len < self.offset {
            tracing::info!(
                path = %self.path.display(),
                old_offset = self.offset,
                len,
                "log file shrank, rewinding to start"
            );
            self.offset = 0;
        }
        if len == self.offset {
            return Ok(TailRead::default());
        }

        let available = len - self.offset;
        let want = available.min(MAX_READ_BYTES);

        self.file
            .seek(SeekFrom::Start(self.offset))
            .map_err(|e| io_error(&self.path, e))?;
        let mut buf = Vec::with_capacity(want as usize);
        (&mut self.file)
            .take(want)
            .read_to_end(&mut buf)
            .map_err(|e| io_error(&self.path, e))?;

        let consumed = match memrchr(b'\n', &buf) {
            Some(last) => last + 1,
            // A single line longer than the read limit is taken as-is
            None if buf.len() as u64 == MAX_READ_BYTES => {
                tracing::warn!(path = %self.path.display(), "overlong log line, splitting");
                buf.len()
            }
            None => 0,
        };

        self.offset += consumed as u64;
        Ok(TailRead {
            lines: split_lines(&buf[..consumed]),
            more_pending: available > want,
        })
    }
}

fn io_error(path: &Path, source: std::io::Error) -> TailError {
    TailError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Split a buffer of complete lines, trimming whitespace and dropping blanks.
fn split_lines(bytes: &[u8]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut push = |slice: &[u8]| {
        let text = String::from_utf8_lossy(slice);
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            lines.push(trimmed.to_string());
        }
    };
    for end in memchr_iter(b'\n', bytes) {
        push(&bytes[start..end]);
        start = end + 1;
    }
    if start < bytes.len() {
        push(&bytes[start..]);
    }
    lines
}
