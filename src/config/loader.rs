use crate::error::{Result, TagsyncError};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Files searched for a release configuration, in priority order.
const SEARCH_PLACES: &[&str] = &[
    "package.json",
    ".releaserc",
    ".releaserc.json",
    ".releaserc.yaml",
    ".releaserc.yml",
    "release.config.toml",
];

/// Release configuration shared with the release tooling of the repository
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ReleaseConfig {
    #[serde(default, deserialize_with = "one_or_many")]
    pub branches: Vec<BranchEntry>,
}

impl ReleaseConfig {
    /// Find the dependency policy declared for `branch_name`.
    ///
    /// Entries written as a bare branch name carry no policy and never match.
    pub fn find_branch(&self, branch_name: &str) -> Option<&BranchPolicy> {
        self.branches.iter().find_map(|entry| match entry {
            BranchEntry::Policy(policy) if policy.name == branch_name => Some(policy),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum BranchEntry {
    #[allow(dead_code)]
    Name(String),
    Policy(BranchPolicy),
}

/// Dependency policy for one release branch
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchPolicy {
    pub name: String,
    /// Distribution tag overriding the one inferred from the branch name.
    /// `false` and `""` both mean "no override".
    #[serde(default, deserialize_with = "channel_override")]
    pub channel: Option<String>,
    #[serde(default)]
    pub dependencies: Option<DependencySpec>,
    #[serde(default)]
    pub dev_dependencies: Option<DependencySpec>,
}

/// Either a list of package names (tags inferred) or an explicit name → tag map
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DependencySpec {
    Names(Vec<String>),
    Tags(BTreeMap<String, String>),
}

/// A configuration together with the file it came from
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub path: PathBuf,
    pub config: ReleaseConfig,
}

/// Directory entry marking the top of a git checkout
const REPOSITORY_MARKER: &str = ".git";

/// Discovers the release configuration starting at the project directory
pub struct ReleaseConfigLoader {
    project_path: PathBuf,
}

impl ReleaseConfigLoader {
    pub fn new<P: AsRef<Path>>(project_path: P) -> Self {
        Self {
            project_path: project_path.as_ref().to_path_buf(),
        }
    }

    /// Search the project directory and then each ancestor for a configuration.
    ///
    /// The walk stops after the repository root (the first directory holding
    /// `.git`). Returns `Ok(None)` when no configuration exists on the way.
    pub fn load(&self) -> Result<Option<LoadedConfig>> {
        let start = self.project_path.canonicalize().map_err(|e| {
            TagsyncError::ProjectValidation(format!(
                "Invalid path '{}': {e}",
                self.project_path.display()
            ))
        })?;

        for dir in start.ancestors() {
            for place in SEARCH_PLACES {
                let path = dir.join(place);
                if !path.is_file() {
                    continue;
                }

                if let Some(config) = Self::read_config(&path)? {
                    return Ok(Some(LoadedConfig { path, config }));
                }
            }

            if dir.join(REPOSITORY_MARKER).exists() {
                break;
            }
        }

        Ok(None)
    }

    fn read_config(path: &Path) -> Result<Option<ReleaseConfig>> {
        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let config: ReleaseConfig = match file_name.as_str() {
            "package.json" => {
                let mut manifest: serde_json::Value = serde_json::from_str(&content)
                    .map_err(|e| Self::invalid(path, e))?;
                match manifest.get_mut("release").map(serde_json::Value::take) {
                    Some(release) => serde_json::from_value(release)
                        .map_err(|e| Self::invalid(path, e))?,
                    None => return Ok(None),
                }
            }
            ".releaserc.json" => {
                serde_json::from_str(&content).map_err(|e| Self::invalid(path, e))?
            }
            "release.config.toml" => toml::from_str(&content).map_err(|e| Self::invalid(path, e))?,
            // .releaserc may hold either JSON or YAML
            _ => serde_json::from_str(&content)
                .or_else(|_| serde_yaml::from_str(&content))
                .map_err(|e| Self::invalid(path, e))?,
        };

        Ok(Some(config))
    }

    fn invalid(path: &Path, err: impl std::fmt::Display) -> TagsyncError {
        TagsyncError::Config(format!("Failed to parse '{}': {err}", path.display()))
    }
}

fn one_or_many<'de, D>(deserializer: D) -> std::result::Result<Vec<BranchEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        Many(Vec<BranchEntry>),
        One(BranchEntry),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::Many(entries)) => entries,
        Some(OneOrMany::One(entry)) => vec![entry],
        None => Vec::new(),
    })
}

fn channel_override<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    #[allow(dead_code)]
    enum Channel {
        Name(String),
        Flag(bool),
    }

    Ok(match Option::<Channel>::deserialize(deserializer)? {
        Some(Channel::Name(name)) if !name.is_empty() => Some(name),
        _ => None,
    })
}
