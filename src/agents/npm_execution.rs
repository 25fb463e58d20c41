use crate::config::DependencyKind;
use crate::error::{Result, TagsyncError};
use crate::runner::CommandRunner;

/// NpmExecutionAgent issues npm and npx commands through a runner
pub struct NpmExecutionAgent<'a> {
    runner: &'a dyn CommandRunner,
}

impl<'a> NpmExecutionAgent<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self { runner }
    }

    /// Resolve `name@tag` to a concrete version through the registry
    pub fn view_version(&self, name: &str, tag: &str) -> Result<String> {
        let spec = format!("{name}@{tag}");
        let output = self.runner.run("npm", &["view", &spec, "version"])?;
        let version = output.trim();

        if version.is_empty() {
            return Err(TagsyncError::CommandExecution {
                command: format!("npm view {spec} version"),
                message: format!("registry returned no version for '{spec}'"),
            });
        }

        Ok(version.to_string())
    }

    /// Install exactly `version` of `name` into the section selected by `kind`
    pub fn install(&self, name: &str, version: &str, kind: DependencyKind) -> Result<()> {
        let spec = format!("{name}@{version}");
        let mut args = vec!["install", spec.as_str()];
        args.extend_from_slice(kind.save_flags());
        self.runner.run("npm", &args)?;
        Ok(())
    }

    /// Plain `npm install`, regenerating the lockfile from the manifests
    pub fn install_all(&self) -> Result<()> {
        self.runner.run("npm", &["install"])?;
        Ok(())
    }

    /// Align versions of the filtered packages across every workspace manifest
    pub fn fix_mismatches(&self, filter: &str) -> Result<()> {
        self.runner.run(
            "npx",
            &[
                "-y",
                "--",
                "syncpack",
                "fix-mismatches",
                "--dev",
                "--prod",
                "--filter",
                filter,
            ],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::fake::FakeRunner;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn view_version_trims_output() {
        let dir = tempdir().unwrap();
        let runner = FakeRunner::new(dir.path()).with_version("left-pad@beta", "1.2.0");
        let npm = NpmExecutionAgent::new(&runner);

        assert_eq!(npm.view_version("left-pad", "beta").unwrap(), "1.2.0");
        assert_eq!(runner.calls(), vec!["npm view left-pad@beta version"]);
    }

    #[test]
    fn unknown_tag_is_an_error() {
        let dir = tempdir().unwrap();
        let runner = FakeRunner::new(dir.path());
        let npm = NpmExecutionAgent::new(&runner);

        assert!(npm.view_version("left-pad", "nope").is_err());
    }

    #[test]
    fn install_uses_exact_save_for_production_only() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("package.json"), "{}").unwrap();
        let runner = FakeRunner::new(dir.path());
        let npm = NpmExecutionAgent::new(&runner);

        npm.install("left-pad", "1.2.0", DependencyKind::Production)
            .unwrap();
        npm.install("jest", "29.7.0", DependencyKind::Development)
            .unwrap();

        assert_eq!(
            runner.calls(),
            vec![
                "npm install left-pad@1.2.0 --save-prod --save-exact",
                "npm install jest@29.7.0 --save-dev",
            ]
        );
    }

    #[test]
    fn dev_install_saves_a_caret_range() {
        let dir = tempdir().unwrap();
        let manifest = dir.path().join("package.json");
        fs::write(&manifest, "{}").unwrap();
        let runner = FakeRunner::new(dir.path());
        let npm = NpmExecutionAgent::new(&runner);

        npm.install("left-pad", "1.2.0", DependencyKind::Production)
            .unwrap();
        npm.install("jest", "29.7.0", DependencyKind::Development)
            .unwrap();

        let saved: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&manifest).unwrap()).unwrap();
        assert_eq!(saved["dependencies"]["left-pad"], "1.2.0");
        assert_eq!(saved["devDependencies"]["jest"], "^29.7.0");
    }

    #[test]
    fn install_without_version_is_rejected() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("package.json"), "{}").unwrap();
        let runner = FakeRunner::new(dir.path());

        for spec in ["left-pad", "left-pad@", "@scope/pkg"] {
            assert!(runner.run("npm", &["install", spec, "--save-dev"]).is_err());
        }
        assert!(runner.run("npm", &["install"]).is_ok());
        assert_eq!(fs::read_to_string(dir.path().join("package.json")).unwrap(), "{}");
    }

    #[test]
    fn fix_mismatches_passes_filter() {
        let dir = tempdir().unwrap();
        let runner = FakeRunner::new(dir.path());
        NpmExecutionAgent::new(&runner)
            .fix_mismatches("^(a|b)$")
            .unwrap();

        assert_eq!(
            runner.calls(),
            vec!["npx -y -- syncpack fix-mismatches --dev --prod --filter ^(a|b)$"]
        );
    }
}
