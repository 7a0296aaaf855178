//! The upload folder

use std::fs;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use sheetspell_core::Row;

use crate::error::{IntakeError, IntakeResult};
use crate::reader::read_rows;

/// Name that selects every file in the folder
pub const ALL_FILES: &str = "*";

const PROGRESS_INTERVAL: Duration = Duration::from_secs(60);

/// Prefix of in-flight uploads; hidden from listings
const PARTIAL_PREFIX: &str = ".partial-";

/// Result of looking a file up by name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileLookup {
    Present,
    /// Not present as given, but these names match ignoring case
    DifferentCase(Vec<String>),
    Missing,
}

/// Result of an upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Saved { bytes: u64 },
    /// Extension not allowed; nothing was written
    Rejected { allowed: Vec<String> },
}

/// Result of a delete request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Confirmation was not given; nothing was touched
    NotConfirmed,
    Deleted(Vec<String>),
    Missing,
}

/// Flat folder of uploaded input files
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    allowed_extensions: Vec<String>,
    buffer_size: usize,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>, allowed_extensions: Vec<String>, buffer_size: usize) -> Self {
        Self {
            root: root.into(),
            allowed_extensions: allowed_extensions
                .into_iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            buffer_size: buffer_size.max(1),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn allowed_extensions(&self) -> &[String] {
        &self.allowed_extensions
    }

    /// Create the folder if it does not exist yet
    pub fn ensure_root(&self) -> IntakeResult<()> {
        fs::create_dir_all(&self.root)?;
        Ok(())
    }

    /// Names of all regular files in the folder, sorted
    pub fn list(&self) -> IntakeResult<Vec<String>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if entry.file_type()?.is_file() && !name.starts_with(PARTIAL_PREFIX) {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    /// Look a file up by exact name, falling back to a case-insensitive match
    pub fn lookup(&self, name: &str) -> IntakeResult<FileLookup> {
        let names = self.list()?;
        if names.iter().any(|n| n == name) {
            return Ok(FileLookup::Present);
        }
        let wanted = name.to_lowercase();
        let matches: Vec<String> = names
            .into_iter()
            .filter(|n| n.to_lowercase() == wanted)
            .collect();
        if matches.is_empty() {
            Ok(FileLookup::Missing)
        } else {
            Ok(FileLookup::DifferentCase(matches))
        }
    }

    /// Check whether an extension may be uploaded
    pub fn is_allowed(&self, name: &str) -> bool {
        Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .is_some_and(|e| self.allowed_extensions.contains(&e))
    }

    /// Stream `body` into the folder under `name`, replacing any existing file.
    ///
    /// The body goes to a temporary file first and only replaces `name` once it
    /// has been read to the end, so a broken upload leaves the old file intact.
    pub fn upload(&self, name: &str, body: &mut dyn Read) -> IntakeResult<UploadOutcome> {
        let name = validate_name(name)?;
        if !self.is_allowed(name) {
            return Ok(UploadOutcome::Rejected {
                allowed: self.allowed_extensions.clone(),
            });
        }

        self.ensure_root()?;
        let target = self.root.join(name);
        let partial = tempfile::Builder::new()
            .prefix(PARTIAL_PREFIX)
            .tempfile_in(&self.root)?;
        let mut out = BufWriter::new(partial);
        let mut chunk = vec![0u8; self.buffer_size];

        let start = Instant::now();
        let mut last_report = start;
        let mut since_report: u64 = 0;
        let mut written: u64 = 0;

        loop {
            let n = body.read(&mut chunk)?;
            if n == 0 {
                break;
            }
            out.write_all(&chunk[..n])?;
            written += n as u64;
            since_report += n as u64;

            let elapsed = last_report.elapsed();
            if elapsed > PROGRESS_INTERVAL {
                let kb_per_sec = since_report as f64 / elapsed.as_secs_f64() / 1000.0;
                tracing::info!(bytes = written, kb_per_sec, "Receiving {}", target.display());
                last_report = Instant::now();
                since_report = 0;
            }
        }
        let partial = out.into_inner().map_err(|e| e.into_error())?;
        partial.persist(&target).map_err(|e| e.error)?;

        tracing::info!(
            bytes = written,
            "Finished receiving '{}' in {:.2} seconds",
            target.display(),
            start.elapsed().as_secs_f64()
        );
        Ok(UploadOutcome::Saved { bytes: written })
    }

    /// Delete one file, or every file when `name` is `*`
    pub fn delete(&self, name: &str, confirmed: bool) -> IntakeResult<DeleteOutcome> {
        if !confirmed {
            return Ok(DeleteOutcome::NotConfirmed);
        }

        if name == ALL_FILES {
            let names = self.list()?;
            for n in &names {
                fs::remove_file(self.root.join(n))?;
            }
            tracing::info!(count = names.len(), "Deleted all uploaded files");
            return Ok(DeleteOutcome::Deleted(names));
        }

        let name = validate_name(name)?;
        let path = self.root.join(name);
        if !path.is_file() {
            return Ok(DeleteOutcome::Missing);
        }
        fs::remove_file(&path)?;
        tracing::info!("Deleted {}", path.display());
        Ok(DeleteOutcome::Deleted(vec![name.to_string()]))
    }

    /// Full path of a stored file
    pub fn path_of(&self, name: &str) -> IntakeResult<PathBuf> {
        let name = validate_name(name)?;
        let path = self.root.join(name);
        if path.is_file() {
            Ok(path)
        } else {
            Err(IntakeError::NotFound(name.to_string()))
        }
    }

    /// Read a stored file into rows
    pub fn read(&self, name: &str) -> IntakeResult<Vec<Row>> {
        read_rows(self.path_of(name)?)
    }
}

/// Reject anything that is not a plain file name inside the folder
fn validate_name(name: &str) -> IntakeResult<&str> {
    let trimmed = name.trim();
    let plain = !trimmed.is_empty()
        && trimmed != "."
        && trimmed != ".."
        && !trimmed.contains(['/', '\\', '\0']);
    if plain {
        Ok(trimmed)
    } else {
        Err(IntakeError::InvalidName(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn store(dir: &Path) -> FileStore {
        FileStore::new(
            dir.join("uploads"),
            vec!["csv".into(), "txt".into(), "xls".into(), "xlsx".into()],
            4,
        )
    }

    #[test]
    fn test_upload_then_list_and_read() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());

        let body = b"ID,TEXT\n1,helo wrld\n";
        let outcome = store.upload("words.csv", &mut &body[..]).unwrap();
        assert_eq!(outcome, UploadOutcome::Saved { bytes: body.len() as u64 });

        assert_eq!(store.list().unwrap(), vec!["words.csv"]);
        let rows = store.read("words.csv").unwrap();
        assert_eq!(rows[0].text(), "helo wrld");
    }

    #[test]
    fn test_upload_rejects_extension() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());

        let outcome = store.upload("script.sh", &mut &b"echo"[..]).unwrap();
        assert!(matches!(outcome, UploadOutcome::Rejected { allowed } if allowed.len() == 4));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_upload_rejects_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());

        assert!(matches!(
            store.upload("../escape.csv", &mut &b"x"[..]),
            Err(IntakeError::InvalidName(_))
        ));
    }

    #[test]
    fn test_lookup_case() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        store.upload("Words.csv", &mut &b"1,a"[..]).unwrap();

        assert_eq!(store.lookup("Words.csv").unwrap(), FileLookup::Present);
        assert_eq!(
            store.lookup("words.CSV").unwrap(),
            FileLookup::DifferentCase(vec!["Words.csv".into()])
        );
        assert_eq!(store.lookup("other.csv").unwrap(), FileLookup::Missing);
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        store.upload("a.txt", &mut &b"x"[..]).unwrap();

        assert_eq!(store.delete("a.txt", false).unwrap(), DeleteOutcome::NotConfirmed);
        assert_eq!(store.list().unwrap(), vec!["a.txt"]);
    }

    #[test]
    fn test_delete_one_and_all() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        for name in ["a.txt", "b.txt", "c.csv"] {
            store.upload(name, &mut &b"x"[..]).unwrap();
        }

        assert_eq!(
            store.delete("a.txt", true).unwrap(),
            DeleteOutcome::Deleted(vec!["a.txt".into()])
        );
        assert_eq!(store.delete("a.txt", true).unwrap(), DeleteOutcome::Missing);
        assert_eq!(
            store.delete(ALL_FILES, true).unwrap(),
            DeleteOutcome::Deleted(vec!["b.txt".into(), "c.csv".into()])
        );
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_path_of_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());

        assert!(matches!(store.path_of("nope.csv"), Err(IntakeError::NotFound(n)) if n == "nope.csv"));
    }

    struct BrokenBody {
        sent: bool,
    }

    impl Read for BrokenBody {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.sent {
                return Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset"));
            }
            self.sent = true;
            let chunk = b"1,partial";
            let n = chunk.len().min(buf.len());
            buf[..n].copy_from_slice(&chunk[..n]);
            Ok(n)
        }
    }

    #[test]
    fn test_broken_upload_keeps_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        store.upload("in.txt", &mut &b"good\n"[..]).unwrap();

        let result = store.upload("in.txt", &mut BrokenBody { sent: false });
        assert!(matches!(result, Err(IntakeError::Io(_))));

        assert_eq!(store.list().unwrap(), vec!["in.txt"]);
        assert_eq!(fs::read_dir(store.root()).unwrap().count(), 1);
        let rows = store.read("in.txt").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].text(), "good");
    }

    #[test]
    fn test_broken_upload_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());

        assert!(store.upload("new.txt", &mut BrokenBody { sent: false }).is_err());
        assert!(store.list().unwrap().is_empty());
        assert_eq!(fs::read_dir(store.root()).unwrap().count(), 0);
    }
}
