//! Size-rotated log file for the JSON log layer.
//!
//! [`RotatingFile`] implements [`MakeWriter`], so `tracing-subscriber` can
//! write formatted events straight into it. When the active file grows past
//! the limit it is shifted to `<name>.1`, older backups move up by one, and
//! anything past the retention count is dropped.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing_subscriber::fmt::MakeWriter;

/// Maximum file size before rotation (10 MB).
pub const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Number of backup files to retain after rotation.
pub const MAX_BACKUP_FILES: usize = 3;

#[derive(Debug)]
struct Inner {
    path: PathBuf,
    file: Option<File>,
    written: u64,
    max_bytes: u64,
    backups: usize,
}

/// Thread-safe rotating log file, cheap to clone.
#[derive(Debug, Clone)]
pub struct RotatingFile {
    inner: Arc<Mutex<Inner>>,
}

impl RotatingFile {
    /// Log file at `path` with the default 10 MB / 3 backups policy.
    ///
    /// The file is opened lazily on the first write.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self::with_limits(path, MAX_FILE_SIZE_BYTES, MAX_BACKUP_FILES)
    }

    #[must_use]
    pub fn with_limits(path: PathBuf, max_bytes: u64, backups: usize) -> Self {
        let written = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
        Self {
            inner: Arc::new(Mutex::new(Inner {
                path,
                file: None,
                written,
                max_bytes,
                backups,
            })),
        }
    }

    fn write_record(&self, buf: &[u8]) -> io::Result<()> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|e| io::Error::other(format!("log writer poisoned: {e}")))?;

        if inner.written > 0 && inner.written + buf.len() as u64 > inner.max_bytes {
            inner.file = None;
            rotate(&inner.path, inner.backups)?;
            inner.written = 0;
        }

        if inner.file.is_none() {
            let file = OpenOptions::new().create(true).append(true).open(&inner.path)?;
            inner.file = Some(file);
        }

        if let Some(file) = inner.file.as_mut() {
            file.write_all(buf)?;
            file.flush()?;
        }
        inner.written += buf.len() as u64;
        Ok(())
    }
}

/// `<path>.<n>`
fn backup_path(path: &Path, n: usize) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(format!(".{n}"));
    PathBuf::from(name)
}

/// Shifts `path` to `path.1`, `path.1` to `path.2` and so on, dropping the oldest.
fn rotate(path: &Path, backups: usize) -> io::Result<()> {
    if backups == 0 {
        return fs::remove_file(path).or_else(|e| match e.kind() {
            io::ErrorKind::NotFound => Ok(()),
            _ => Err(e),
        });
    }

    let oldest = backup_path(path, backups);
    if oldest.exists() {
        fs::remove_file(&oldest)?;
    }
    for n in (1..backups).rev() {
        let from = backup_path(path, n);
        if from.exists() {
            fs::rename(&from, backup_path(path, n + 1))?;
        }
    }
    if path.exists() {
        fs::rename(path, backup_path(path, 1))?;
    }
    Ok(())
}

/// Handle given to the fmt layer for one event.
#[derive(Debug)]
pub struct RotatingFileWriter {
    file: RotatingFile,
}

impl Write for RotatingFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write_record(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for RotatingFile {
    type Writer = RotatingFileWriter;

    fn make_writer(&'a self) -> Self::Writer {
        RotatingFileWriter { file: self.clone() }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn rotates_past_the_limit_and_keeps_backups() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("dexy.log");
        let file = RotatingFile::with_limits(path.clone(), 10, 2);

        for record in ["first-rec\n", "second-rec\n", "third-rec\n", "fourth-rec\n"] {
            file.make_writer().write_all(record.as_bytes())?;
        }

        assert_eq!(fs::read_to_string(&path)?, "fourth-rec\n");
        assert_eq!(fs::read_to_string(backup_path(&path, 1))?, "third-rec\n");
        assert_eq!(fs::read_to_string(backup_path(&path, 2))?, "second-rec\n");
        assert!(!backup_path(&path, 3).exists());
        Ok(())
    }

    #[test]
    fn small_records_share_a_file() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("dexy.log");
        let file = RotatingFile::with_limits(path.clone(), 1024, 3);

        file.make_writer().write_all(b"a\n")?;
        file.make_writer().write_all(b"b\n")?;

        assert_eq!(fs::read_to_string(&path)?, "a\nb\n");
        assert!(!backup_path(&path, 1).exists());
        Ok(())
    }
}
