//! Forward-only line reader over a located log.

mod error;


pub use error::StreamError;

use crate::locate::LogFileRef;
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// One line of the log, without its line ending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    /// 1-based position in the file.
    pub number: u64,
    pub bytes: Vec<u8>,
}

/// Lazily yields the lines of a log, decompressing gzip transparently.
///
/// The stream owns the open file. It is released as soon as the end of input
/// or a read error is reached, or when the stream is dropped. Once exhausted
/// it keeps returning `None`; reading again needs a fresh [`LineStream::open`].
pub struct LineStream {
    path: PathBuf,
    compressed: bool,
    reader: Option<Box<dyn BufRead + Send>>,
    lines_read: u64,
}

impl LineStream {
    pub fn open(log: &LogFileRef) -> Result<Self, StreamError> {
        let file = File::open(&log.path).map_err(|e| StreamError::Open {
            path: log.path.clone(),
            source: e,
        })?;

        let reader: Box<dyn BufRead + Send> = if log.compressed {
            Box::new(BufReader::new(GzDecoder::new(file)))
        } else {
            Box::new(BufReader::new(file))
        };

        Ok(Self {
            path: log.path.clone(),
            compressed: log.compressed,
            reader: Some(reader),
            lines_read: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }

    /// True once the underlying file has been released.
    pub fn is_exhausted(&self) -> bool {
        self.reader.is_none()
    }

    fn read_error(&self, source: std::io::Error) -> StreamError {
        if self.compressed {
            StreamError::CorruptArchive {
                path: self.path.clone(),
                lines_read: self.lines_read,
                source,
            }
        } else {
            StreamError::Read {
                path: self.path.clone(),
                lines_read: self.lines_read,
                source,
            }
        }
    }
}

impl Iterator for LineStream {
    type Item = Result<RawLine, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        let reader = self.reader.as_mut()?;
        let mut bytes = Vec::new();

        match reader.read_until(b'\n', &mut bytes) {
            Ok(0) => {
                self.reader = None;
                None
            }
            Ok(_) => {
                strip_line_ending(&mut bytes);
                self.lines_read += 1;
                Some(Ok(RawLine {
                    number: self.lines_read,
                    bytes,
                }))
            }
            Err(e) => {
                self.reader = None;
                Some(Err(self.read_error(e)))
            }
        }
    }
}

fn strip_line_ending(bytes: &mut Vec<u8>) {
    if bytes.last() == Some(&b'\n') {
        bytes.pop();
        if bytes.last() == Some(&b'\r') {
            bytes.pop();
        }
    }
}
