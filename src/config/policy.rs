use super::loader::{BranchPolicy, DependencySpec};
use std::collections::BTreeMap;
use std::fmt;

/// Branches whose listed dependencies follow the `latest` tag
pub const MAIN_BRANCHES: &[&str] = &["main", "master"];

const LATEST_TAG: &str = "latest";

/// Package name → distribution tag
pub type ResolvedDependencyMap = BTreeMap<String, String>;

/// Which section of the manifest a dependency lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyKind {
    Production,
    Development,
}

impl DependencyKind {
    /// npm flags used to save an installed version into this section
    pub fn save_flags(self) -> &'static [&'static str] {
        match self {
            DependencyKind::Production => &["--save-prod", "--save-exact"],
            DependencyKind::Development => &["--save-dev"],
        }
    }

    /// Whether `pinned` already records `resolved` the way npm saves it.
    ///
    /// Production installs are saved exact; `--save-dev` saves with npm's
    /// default `^` prefix.
    pub fn pin_matches(self, pinned: &str, resolved: &str) -> bool {
        match self {
            DependencyKind::Production => pinned == resolved,
            DependencyKind::Development => {
                pinned == resolved || pinned.strip_prefix('^') == Some(resolved)
            }
        }
    }
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DependencyKind::Production => "dependency",
            DependencyKind::Development => "dev dependency",
        };
        f.write_str(label)
    }
}

impl BranchPolicy {
    pub fn spec(&self, kind: DependencyKind) -> Option<&DependencySpec> {
        match kind {
            DependencyKind::Production => self.dependencies.as_ref(),
            DependencyKind::Development => self.dev_dependencies.as_ref(),
        }
    }

    /// Whether the branch declares the given category at all, even if empty
    pub fn manages(&self, kind: DependencyKind) -> bool {
        self.spec(kind).is_some()
    }

    /// Tag used for listed names: the channel, else `latest` on main-line
    /// branches, else the branch name itself.
    pub fn default_tag(&self) -> &str {
        if let Some(channel) = &self.channel {
            return channel;
        }

        if MAIN_BRANCHES.contains(&self.name.as_str()) {
            LATEST_TAG
        } else {
            &self.name
        }
    }
}

/// Derive the concrete name → tag map for one dependency category of a branch.
pub fn resolve_dependencies(branch: &BranchPolicy, kind: DependencyKind) -> ResolvedDependencyMap {
    match branch.spec(kind) {
        None => ResolvedDependencyMap::new(),
        Some(DependencySpec::Tags(tags)) => tags.clone(),
        Some(DependencySpec::Names(names)) => {
            let tag = branch.default_tag();
            names
                .iter()
                .map(|name| (name.clone(), tag.to_string()))
                .collect()
        }
    }
}
