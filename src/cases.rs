//! Declarative test case storage.
//!
//! Test cases live in a directory of YAML documents, each shaped as:
//!
//! ```yaml
//! test_cases:
//!   - name: single row
//!     query: SELECT 1
//!     expected_output:
//!       - "1": 1
//! ```
//!
//! The `test_cases` key is a hard contract: one malformed document fails
//! the whole load.

use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf}
};

use chrono::Local;
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{AppResult, LoadError, file_write_error, report_error};

/// A named query with the output it must produce
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    pub name:            CompactString,
    pub query:           String,
    pub expected_output: Value
}

impl TestCase {
    pub fn new(name: impl Into<CompactString>, query: impl Into<String>, expected: Value) -> Self {
        Self {
            name:            name.into(),
            query:           query.into(),
            expected_output: expected
        }
    }
}

/// On-disk document shape
#[derive(Debug, Serialize, Deserialize)]
struct CaseDocument {
    test_cases: Vec<TestCase>
}

/// Directory-backed test case store
#[derive(Debug, Clone)]
pub struct TestCaseStore {
    dir: PathBuf
}

impl TestCaseStore {
    /// Open the store, creating the directory when it does not exist
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, LoadError> {
        let dir = dir.into();
        if !dir.exists() {
            debug!(dir = %dir.display(), "creating test case directory");
            fs::create_dir_all(&dir).map_err(|e| LoadError::io(&dir, e))?;
        }
        Ok(Self {
            dir
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load every test case from the directory.
    ///
    /// Files ending in `.yaml` or `.yml` are read in file name order and
    /// their `test_cases` lists concatenated. Other files are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the directory or any document cannot be
    /// read, or if a document is not valid YAML with a `test_cases` list.
    pub fn load(&self) -> Result<Vec<TestCase>, LoadError> {
        let mut cases = Vec::new();
        for path in self.document_paths()? {
            let content = fs::read_to_string(&path).map_err(|e| LoadError::io(&path, e))?;
            let document: CaseDocument =
                serde_yaml::from_str(&content).map_err(|e| LoadError::parse(&path, e))?;
            debug!(
                file = %path.display(),
                count = document.test_cases.len(),
                "loaded test cases"
            );
            cases.extend(document.test_cases);
        }
        info!(count = cases.len(), dir = %self.dir.display(), "test cases loaded");
        Ok(cases)
    }

    /// Save one case as a new document and return its path.
    ///
    /// The file name carries a timestamp; two saves within the same
    /// microsecond collide and the second one fails rather than overwriting
    /// the first.
    pub fn save(&self, case: &TestCase) -> AppResult<PathBuf> {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S_%6f");
        let path = self.dir.join(format!("test_case_{}.yaml", timestamp));
        let document = CaseDocument {
            test_cases: vec![case.clone()]
        };
        let content = serde_yaml::to_string(&document).map_err(|e| report_error(e.to_string()))?;
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| file_write_error(&path, e))?;
        file.write_all(content.as_bytes())
            .map_err(|e| file_write_error(&path, e))?;
        info!(name = %case.name, file = %path.display(), "test case saved");
        Ok(path)
    }

    fn document_paths(&self) -> Result<Vec<PathBuf>, LoadError> {
        let entries = fs::read_dir(&self.dir).map_err(|e| LoadError::io(&self.dir, e))?;
        let mut paths = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| LoadError::io(&self.dir, e))?.path();
            if path.is_file() && is_yaml(&path) {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}
