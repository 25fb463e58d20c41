use crate::agents::npm_execution::NpmExecutionAgent;
use crate::agents::update::LOCKFILE;
use crate::agents::version_control::VersionControlAgent;
use crate::config::{BranchPolicy, DependencyKind, ResolvedDependencyMap};
use crate::error::Result;
use crate::runner::CommandRunner;
use regex::Regex;

/// File whose presence marks a multi-package workspace
pub const WORKSPACE_MARKER: &str = "lerna.json";

/// Re-aligns sibling manifests with the versions the root manifest just received
pub struct WorkspaceReconciler<'a> {
    npm: NpmExecutionAgent<'a>,
    git: VersionControlAgent<'a>,
}

impl<'a> WorkspaceReconciler<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self {
            npm: NpmExecutionAgent::new(runner),
            git: VersionControlAgent::new(runner),
        }
    }

    /// The reconciler runs for workspaces whenever the branch configures either
    /// category, whether or not any version actually changed.
    pub fn should_run(is_workspace: bool, branch: &BranchPolicy) -> bool {
        is_workspace
            && (branch.manages(DependencyKind::Production)
                || branch.manages(DependencyKind::Development))
    }

    /// Fix mismatches for the touched packages, discard the lockfile that
    /// produced, then reinstall. The order of the three steps matters: the
    /// final install must see the reconciled manifests and a clean lockfile.
    pub fn reconcile(
        &self,
        dependencies: &ResolvedDependencyMap,
        dev_dependencies: &ResolvedDependencyMap,
    ) -> Result<()> {
        let filter = dependency_filter(
            dependencies
                .keys()
                .chain(dev_dependencies.keys())
                .map(String::as_str),
        )?;

        self.npm.fix_mismatches(&filter)?;
        self.git.restore_file(LOCKFILE)?;
        self.npm.install_all()
    }
}

/// Characters with a meaning in a JavaScript `RegExp` outside a character class
const JS_REGEX_METACHARACTERS: &str = r"[\\^$.|?*+()\[\]{}]";

/// Anchored JavaScript regex matching exactly the given package names.
///
/// syncpack compiles the filter with `new RegExp`, so only JS metacharacters
/// are escaped; `-`, `@` and `/` stay literal.
pub fn dependency_filter<'n>(names: impl IntoIterator<Item = &'n str>) -> Result<String> {
    let metacharacters = Regex::new(JS_REGEX_METACHARACTERS)?;
    let alternatives = names
        .into_iter()
        .map(|name| metacharacters.replace_all(name, r"\$0").into_owned())
        .collect::<Vec<_>>()
        .join("|");
    Ok(format!("^({alternatives})$"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::loader::DependencySpec;
    use crate::runner::fake::FakeRunner;
    use tempfile::tempdir;

    fn branch(dependencies: Option<Vec<&str>>, dev: Option<Vec<&str>>) -> BranchPolicy {
        let spec = |names: Vec<&str>| {
            DependencySpec::Names(names.into_iter().map(str::to_string).collect())
        };
        BranchPolicy {
            name: "main".to_string(),
            channel: None,
            dependencies: dependencies.map(spec),
            dev_dependencies: dev.map(spec),
        }
    }

    fn map(names: &[&str]) -> ResolvedDependencyMap {
        names
            .iter()
            .map(|name| (name.to_string(), "latest".to_string()))
            .collect()
    }

    #[test]
    fn filter_matches_exactly_the_listed_names() {
        let filter = dependency_filter(["@scope/pkg", "lodash.merge"]).unwrap();
        assert_eq!(filter, r"^(@scope/pkg|lodash\.merge)$");

        let regex = Regex::new(&filter).unwrap();
        assert!(regex.is_match("lodash.merge"));
        assert!(regex.is_match("@scope/pkg"));
        assert!(!regex.is_match("lodashXmerge"));
        assert!(!regex.is_match("@scope/pkg-extra"));
    }

    #[test]
    fn filter_escapes_only_javascript_metacharacters() {
        assert_eq!(dependency_filter(["left-pad"]).unwrap(), "^(left-pad)$");
        assert_eq!(dependency_filter(["@scope/pkg"]).unwrap(), "^(@scope/pkg)$");
        assert_eq!(
            dependency_filter(["lodash.merge"]).unwrap(),
            r"^(lodash\.merge)$"
        );
        assert_eq!(
            dependency_filter(["a+b", "c(d)"]).unwrap(),
            r"^(a\+b|c\(d\))$"
        );
    }

    #[test]
    fn empty_name_set_matches_nothing() {
        let filter = dependency_filter(std::iter::empty()).unwrap();
        assert_eq!(filter, "^()$");
        assert!(!Regex::new(&filter).unwrap().is_match("left-pad"));
    }

    #[test]
    fn runs_only_for_configured_workspaces() {
        assert!(WorkspaceReconciler::should_run(true, &branch(Some(vec![]), None)));
        assert!(WorkspaceReconciler::should_run(true, &branch(None, Some(vec!["jest"]))));
        assert!(!WorkspaceReconciler::should_run(true, &branch(None, None)));
        assert!(!WorkspaceReconciler::should_run(false, &branch(Some(vec!["a"]), None)));
    }

    #[test]
    fn reconcile_runs_the_three_steps_in_order() {
        let dir = tempdir().unwrap();
        let runner = FakeRunner::new(dir.path());

        WorkspaceReconciler::new(&runner)
            .reconcile(&map(&["left-pad"]), &map(&["jest"]))
            .unwrap();

        assert_eq!(
            runner.calls(),
            vec![
                "npx -y -- syncpack fix-mismatches --dev --prod --filter ^(left-pad|jest)$",
                "git checkout package-lock.json",
                "npm install",
            ]
        );
    }

    #[test]
    fn failed_fix_stops_the_sequence() {
        let dir = tempdir().unwrap();
        let runner = FakeRunner::new(dir.path()).failing_on("npx");

        let result = WorkspaceReconciler::new(&runner).reconcile(&map(&["a"]), &map(&[]));

        assert!(result.is_err());
        assert_eq!(runner.calls().len(), 1);
    }
}
