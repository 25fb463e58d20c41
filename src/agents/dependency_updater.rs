use crate::agents::manifest::Manifest;
use crate::agents::npm_execution::NpmExecutionAgent;
use crate::agents::update::{ChangeReport, UpdateRecord};
use crate::config::{DependencyKind, ResolvedDependencyMap};
use crate::error::Result;
use crate::runner::CommandRunner;
use crate::utils::output::verbose;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

/// DependencyUpdater moves pinned dependencies onto the versions their tags point at
pub struct DependencyUpdater<'a> {
    npm: NpmExecutionAgent<'a>,
    manifest_path: PathBuf,
}

impl<'a> DependencyUpdater<'a> {
    pub fn new<P: AsRef<Path>>(runner: &'a dyn CommandRunner, manifest_path: P) -> Self {
        Self {
            npm: NpmExecutionAgent::new(runner),
            manifest_path: manifest_path.as_ref().to_path_buf(),
        }
    }

    /// Resolve `name@tag` and compare it with the current pin without installing.
    ///
    /// Returns the change that `update_dependency` would make, if any.
    pub fn check_dependency(
        &self,
        name: &str,
        tag: &str,
        kind: DependencyKind,
    ) -> Result<Option<UpdateRecord>> {
        // Re-read every time: an earlier install in this run may have touched the manifest
        let manifest = Manifest::load(&self.manifest_path)?;
        let current = manifest.pinned_version(name, kind).map(str::to_string);
        let resolved = self.npm.view_version(name, tag)?;

        verbose(format!(
            "{kind} {name}@{tag} resolved to {resolved} (pinned: {})",
            current.as_deref().unwrap_or("none")
        ));

        if current
            .as_deref()
            .is_some_and(|pinned| kind.pin_matches(pinned, &resolved))
        {
            return Ok(None);
        }

        Ok(Some(UpdateRecord::new(name, current, resolved)))
    }

    /// Install the version `tag` currently points at if it differs from the pin.
    pub fn update_dependency(
        &self,
        name: &str,
        tag: &str,
        kind: DependencyKind,
    ) -> Result<Option<UpdateRecord>> {
        let Some(record) = self.check_dependency(name, tag, kind)? else {
            return Ok(None);
        };

        self.npm.install(&record.name, &record.new, kind)?;
        Ok(Some(record))
    }

    /// Update every entry of `dependencies`, strictly in map order.
    ///
    /// Each update is on disk before the next entry is examined. Records are
    /// appended to `report` as they land, so on error it holds exactly the
    /// updates that were applied before the failure.
    pub fn apply(
        &self,
        dependencies: &ResolvedDependencyMap,
        kind: DependencyKind,
        report: &mut ChangeReport,
    ) -> Result<()> {
        let pb = Self::progress_bar(dependencies.len());

        for (name, tag) in dependencies {
            pb.set_message(format!("Checking {name}@{tag}"));
            let outcome = pb.suspend(|| self.update_dependency(name, tag, kind))?;
            if let Some(record) = outcome {
                report.push(record);
            }
            pb.inc(1);
        }

        pb.finish_and_clear();
        Ok(())
    }

    /// Collect the changes `apply` would make, without installing anything
    pub fn check(
        &self,
        dependencies: &ResolvedDependencyMap,
        kind: DependencyKind,
    ) -> Result<Vec<UpdateRecord>> {
        let pb = Self::progress_bar(dependencies.len());
        let mut pending = Vec::new();

        for (name, tag) in dependencies {
            pb.set_message(format!("Checking {name}@{tag}"));
            if let Some(record) = pb.suspend(|| self.check_dependency(name, tag, kind))? {
                pending.push(record);
            }
            pb.inc(1);
        }

        pb.finish_and_clear();
        Ok(pending)
    }

    fn progress_bar(len: usize) -> ProgressBar {
        if len == 0 {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(len as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  [{bar:40}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        pb
    }
}
