use crate::config::DependencyKind;
use crate::error::{Result, TagsyncError};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Dependency pins recorded in a `package.json`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default)]
    pub dependencies: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub dev_dependencies: Option<BTreeMap<String, String>>,
}

impl Manifest {
    /// Read and parse the manifest at `path`
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            TagsyncError::ManifestParsing(format!("Failed to read '{}': {e}", path.display()))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            TagsyncError::ManifestParsing(format!("Failed to parse '{}': {e}", path.display()))
        })
    }

    pub fn section(&self, kind: DependencyKind) -> Option<&BTreeMap<String, String>> {
        match kind {
            DependencyKind::Production => self.dependencies.as_ref(),
            DependencyKind::Development => self.dev_dependencies.as_ref(),
        }
    }

    /// Version currently pinned for `name` in the given section
    pub fn pinned_version(&self, name: &str, kind: DependencyKind) -> Option<&str> {
        self.section(kind)
            .and_then(|deps| deps.get(name))
            .map(String::as_str)
    }
}
