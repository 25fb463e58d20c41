use std::fmt;

pub const MANIFEST_FILE: &str = "package.json";
pub const LOCKFILE: &str = "package-lock.json";
const NESTED_MANIFESTS: &str = "**/package.json";
const COMMIT_TITLE: &str = "Update dependencies";

/// One applied version change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRecord {
    pub name: String,
    pub previous: Option<String>,
    pub new: String,
}

impl UpdateRecord {
    pub fn new(name: impl Into<String>, previous: Option<String>, new: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            previous,
            new: new.into(),
        }
    }
}

impl fmt::Display for UpdateRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} -> {}",
            self.name,
            self.previous.as_deref().unwrap_or("none"),
            self.new
        )
    }
}

/// Accumulates the changes of a single run, in the order they were applied
#[derive(Debug, Clone, Default)]
pub struct ChangeReport {
    records: Vec<UpdateRecord>,
    workspace_reconciled: bool,
}

impl ChangeReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: UpdateRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[UpdateRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Mark that nested workspace manifests may have been rewritten
    pub fn mark_workspace_reconciled(&mut self) {
        self.workspace_reconciled = true;
    }

    pub fn workspace_reconciled(&self) -> bool {
        self.workspace_reconciled
    }

    /// `name: old -> new` lines joined by newlines
    pub fn summary(&self) -> String {
        self.records
            .iter()
            .map(UpdateRecord::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn commit_message(&self) -> String {
        format!("{COMMIT_TITLE}\n\n{}", self.summary())
    }

    /// Paths to stage for the commit
    pub fn changed_files(&self) -> Vec<&'static str> {
        let mut files = vec![MANIFEST_FILE, LOCKFILE];
        if self.workspace_reconciled() {
            files.push(NESTED_MANIFESTS);
        }
        files
    }
}
