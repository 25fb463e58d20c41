use crate::agents::update::{LOCKFILE, MANIFEST_FILE};
use crate::agents::workspace_reconciler::WORKSPACE_MARKER;
use crate::error::{Result, TagsyncError};
use std::path::{Path, PathBuf};

/// ProjectScannerAgent validates the project structure
pub struct ProjectScannerAgent {
    project_path: PathBuf,
}

impl ProjectScannerAgent {
    pub fn new<P: AsRef<Path>>(project_path: P) -> Self {
        Self {
            project_path: project_path.as_ref().to_path_buf(),
        }
    }

    /// Validates the project structure
    pub fn validate(&self) -> Result<ProjectInfo> {
        if !self.project_path.is_dir() {
            return Err(TagsyncError::ProjectValidation(format!(
                "'{}' is not a directory",
                self.project_path.display()
            )));
        }

        let manifest_path = self.project_path.join(MANIFEST_FILE);
        if !manifest_path.is_file() {
            return Err(TagsyncError::ProjectValidation(format!(
                "{MANIFEST_FILE} not found in '{}'",
                self.project_path.display()
            )));
        }

        Ok(ProjectInfo {
            project_path: self.project_path.clone(),
            manifest_path,
            lockfile_path: self.project_path.join(LOCKFILE),
            is_workspace: self.project_path.join(WORKSPACE_MARKER).exists(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct ProjectInfo {
    pub project_path: PathBuf,
    pub manifest_path: PathBuf,
    pub lockfile_path: PathBuf,
    pub is_workspace: bool,
}
