//! Finds the manifests a run should execute.

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::errors::HarnessError;

/// Where manifests come from: a single file, a directory tree, or both.
#[derive(Debug, Clone, Default)]
pub struct TestSource {
    pub file: Option<PathBuf>,
    pub directory: Option<PathBuf>,
}

/// Discovers manifest files.
#[derive(Debug)]
pub struct TestDiscoverer;

impl TestDiscoverer {
    /// Resolves `source` into the ordered list of manifests to run.
    ///
    /// The single file, if any, comes first; discovered files follow in sorted order.
    /// Any invalid path aborts before a single test runs.
    pub fn resolve(source: &TestSource, suffix: &str) -> Result<Vec<PathBuf>, HarnessError> {
        if source.file.is_none() && source.directory.is_none() {
            return Err(HarnessError::NoInput);
        }

        let mut manifests = Vec::new();
        if let Some(file) = &source.file {
            if !file.is_file() {
                return Err(HarnessError::InvalidTestFile { path: file.clone() });
            }
            manifests.push(file.clone());
        }
        if let Some(directory) = &source.directory {
            if !directory.is_dir() {
                return Err(HarnessError::InvalidTestDirectory {
                    path: directory.clone(),
                });
            }
            manifests.extend(Self::discover_manifest_files(directory, suffix)?);
        }

        if manifests.is_empty() {
            return Err(HarnessError::NoTestsFound {
                suffix: suffix.to_string(),
            });
        }
        Ok(manifests)
    }

    /// Recursively scans `root` for files ending in `.<suffix>`.
    ///
    /// The returned list of files is sorted to ensure deterministic execution order.
    pub fn discover_manifest_files(root: &Path, suffix: &str) -> Result<Vec<PathBuf>, HarnessError> {
        let mut files = Vec::new();
        for entry in WalkDir::new(root) {
            let entry = entry.map_err(|source| HarnessError::Walk {
                root: root.to_path_buf(),
                source,
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if !Self::is_manifest(path, suffix) {
                continue;
            }
            debug!(manifest = %path.display(), "discovered manifest");
            files.push(path.to_path_buf());
        }
        files.sort();
        Ok(files)
    }

    fn is_manifest(path: &Path, suffix: &str) -> bool {
        path.extension().is_some_and(|ext| ext == suffix)
    }
}
