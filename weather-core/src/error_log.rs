use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::Local;

/// Writes one diagnostic file per error event. Files are never read back.
#[derive(Debug, Clone)]
pub struct ErrorLog {
    dir: PathBuf,
}

impl ErrorLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Record `message` and the full cause chain of `error`. A failure to
    /// write is reported through `tracing` and otherwise ignored.
    pub fn record(&self, message: &str, error: &anyhow::Error) {
        match self.write_entry(message, error) {
            Ok(path) => tracing::debug!(path = %path.display(), "Wrote error log entry"),
            Err(err) => tracing::error!(error = ?err, "Failed to save error to file"),
        }
    }

    fn write_entry(&self, message: &str, error: &anyhow::Error) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).with_context(|| {
            format!("Failed to create error log directory: {}", self.dir.display())
        })?;

        let now = Local::now();
        let stamp = now.format("%Y-%m-%d_%H-%M-%S-%3f").to_string();
        let (mut file, path) = self.create_unique(&stamp)?;

        writeln!(file, "Timestamp: {}", now.to_rfc3339())?;
        writeln!(file, "Message: {message}")?;
        writeln!(file, "Error:")?;
        writeln!(file, "{error:?}")?;
        writeln!(file)?;

        Ok(path)
    }

    // Two errors in the same millisecond get `-1`, `-2`, ... suffixes.
    fn create_unique(&self, stamp: &str) -> Result<(fs::File, PathBuf)> {
        let mut attempt = 0u32;
        loop {
            let name = match attempt {
                0 => format!("error_{stamp}.log"),
                n => format!("error_{stamp}-{n}.log"),
            };
            let path = self.dir.join(name);

            match fs::OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((file, path)),
                Err(err) if err.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
                Err(err) => {
                    return Err(err).with_context(|| {
                        format!("Failed to create error log file: {}", path.display())
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn record_creates_directory_and_writes_entry() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let log = ErrorLog::new(tmp.path().join("errors"));

        let err = anyhow!("disk full").context("Failed to write state file");
        log.record("Error writing to file: appstate.json", &err);

        let entries: Vec<_> = fs::read_dir(log.dir()).expect("errors dir").collect();
        assert_eq!(entries.len(), 1);

        let path = entries[0].as_ref().expect("entry").path();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("error_") && name.ends_with(".log"));

        let contents = fs::read_to_string(&path).expect("read");
        assert!(contents.contains("Message: Error writing to file: appstate.json"));
        assert!(contents.contains("Failed to write state file"));
        assert!(contents.contains("disk full"));
    }

    #[test]
    fn entries_in_quick_succession_get_separate_files() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let log = ErrorLog::new(tmp.path());

        for i in 0..5 {
            log.record(&format!("failure {i}"), &anyhow!("boom"));
        }

        assert_eq!(fs::read_dir(tmp.path()).expect("dir").count(), 5);
    }

    #[test]
    fn record_swallows_unwritable_directory() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let blocker = tmp.path().join("not-a-dir");
        fs::write(&blocker, "x").expect("write");

        let log = ErrorLog::new(blocker.join("errors"));
        log.record("ignored", &anyhow!("boom"));

        assert!(!blocker.join("errors").exists());
    }
}
