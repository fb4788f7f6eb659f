//! Rotated log discovery.
//!
//! Rotation produces one file per day named `<prefix>-YYYYMMDD`, optionally
//! gzip-compressed with a `.gz` suffix. The locator picks the newest of them.

mod error;


pub use error::LocateError;

use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

pub const GZIP_SUFFIX: &str = ".gz";
const DATE_FORMAT: &str = "%Y%m%d";
const DATE_LEN: usize = 8;

/// A log selected for processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFileRef {
    pub path: PathBuf,
    pub date: NaiveDate,
    pub compressed: bool,
}

impl LogFileRef {
    /// Builds a reference for an explicitly requested log, bypassing the scan.
    ///
    /// The date still comes from the file name so that the report name stays
    /// deterministic.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, LocateError> {
        let path = path.into();

        if !path.is_file() {
            return Err(LocateError::MissingLog { path });
        }

        let parsed = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(split_dated_name)
            .and_then(|name| name.date().map(|date| (date, name.compressed)));

        match parsed {
            Some((date, compressed)) => Ok(Self {
                path,
                date,
                compressed,
            }),
            None => Err(LocateError::InvalidLogName { path }),
        }
    }
}

/// Scans `dir` and returns the log with the newest embedded date.
///
/// Ties on the date are broken by the greater path, so the result does not
/// depend on directory listing order.
pub fn locate_newest(dir: &Path, prefix: &str) -> Result<LogFileRef, LocateError> {
    let entries = fs::read_dir(dir).map_err(|e| LocateError::InaccessibleDirectory {
        dir: dir.to_path_buf(),
        source: e,
    })?;

    let mut newest: Option<LogFileRef> = None;

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, dir = %dir.display(), "skipping unreadable directory entry");
                continue;
            }
        };

        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        let Some(dated) = split_dated_name(name).filter(|d| d.base == prefix) else {
            continue;
        };

        let Some(date) = dated.date() else {
            tracing::warn!(file = name, "skipping log with malformed date in its name");
            continue;
        };

        if !path.is_file() {
            continue;
        }

        let candidate = LogFileRef {
            compressed: dated.compressed,
            path,
            date,
        };

        let is_newer = newest
            .as_ref()
            .is_none_or(|best| (candidate.date, &candidate.path) > (best.date, &best.path));
        if is_newer {
            newest = Some(candidate);
        }
    }

    newest.ok_or_else(|| LocateError::NotFound {
        dir: dir.to_path_buf(),
        prefix: prefix.to_string(),
    })
}

/// `<base>-<digits>[.gz]`, split apart but not yet validated as a date.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct DatedName<'a> {
    pub base: &'a str,
    pub digits: &'a str,
    pub compressed: bool,
}

impl DatedName<'_> {
    pub(crate) fn date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.digits, DATE_FORMAT).ok()
    }
}

pub(crate) fn split_dated_name(name: &str) -> Option<DatedName<'_>> {
    let (stem, compressed) = match name.strip_suffix(GZIP_SUFFIX) {
        Some(stem) => (stem, true),
        None => (name, false),
    };

    let split = stem.len().checked_sub(DATE_LEN)?;
    if !stem.is_char_boundary(split) {
        return None;
    }

    let (head, digits) = stem.split_at(split);
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let base = head.strip_suffix('-').filter(|b| !b.is_empty())?;

    Some(DatedName {
        base,
        digits,
        compressed,
    })
}
