use crate::actions;
use crate::agents::{
    ChangeReport, DependencyUpdater, ProjectInfo, ProjectScannerAgent, UpdateRecord,
    VersionControlAgent, WorkspaceReconciler,
};
use crate::config::{
    BranchPolicy, DependencyKind, ReleaseConfigLoader, ResolvedDependencyMap,
    resolve_dependencies,
};
use crate::error::{Result, TagsyncError};
use crate::runner::{CommandRunner, SystemCommandRunner};
use crate::utils::output::{pluralize, verbose};
use colored::Colorize;
use std::path::Path;

/// Project and branch policy a command operates on
struct BranchTarget {
    project: ProjectInfo,
    branch: BranchPolicy,
}

/// Dependency maps resolved for both categories of a branch
struct ResolvedPolicy {
    dependencies: ResolvedDependencyMap,
    dev_dependencies: ResolvedDependencyMap,
}

impl ResolvedPolicy {
    fn for_branch(branch: &BranchPolicy) -> Self {
        Self {
            dependencies: resolve_dependencies(branch, DependencyKind::Production),
            dev_dependencies: resolve_dependencies(branch, DependencyKind::Development),
        }
    }

    /// Configured categories, production first
    fn categories<'b>(
        &'b self,
        branch: &BranchPolicy,
    ) -> Vec<(DependencyKind, &'b ResolvedDependencyMap)> {
        [
            (DependencyKind::Production, &self.dependencies),
            (DependencyKind::Development, &self.dev_dependencies),
        ]
        .into_iter()
        .filter(|(kind, _)| branch.manages(*kind))
        .collect()
    }
}

/// Execute the update workflow
pub fn execute_update<P: AsRef<Path>>(
    project_path: P,
    branch_override: Option<&str>,
    commit: bool,
) -> Result<()> {
    println!("{}", "Starting dependency update process...".cyan().bold());

    let Some(target) = locate_branch(project_path.as_ref(), branch_override)? else {
        return Ok(());
    };

    let runner = SystemCommandRunner::new(&target.project.project_path);
    run_update(&target.project, &target.branch, &runner, commit)?;

    println!(
        "\n{}",
        "✨ Update process completed successfully!".green().bold()
    );
    Ok(())
}

/// Execute the check workflow (dry-run)
pub fn execute_check<P: AsRef<Path>>(project_path: P, branch_override: Option<&str>) -> Result<()> {
    println!("{}", "Checking for available updates...".cyan().bold());

    let Some(target) = locate_branch(project_path.as_ref(), branch_override)? else {
        return Ok(());
    };

    let runner = SystemCommandRunner::new(&target.project.project_path);
    let pending = run_check(&target.project, &target.branch, &runner)?;
    print_available_updates(&pending);

    Ok(())
}

/// Execute the list workflow - display the tags declared for the branch
pub fn execute_list<P: AsRef<Path>>(project_path: P, branch_override: Option<&str>) -> Result<()> {
    println!("{}", "Listing managed dependencies...".cyan().bold());

    let Some(target) = locate_branch(project_path.as_ref(), branch_override)? else {
        return Ok(());
    };

    let policy = ResolvedPolicy::for_branch(&target.branch);
    print_policy(&target.branch, &policy);
    Ok(())
}

/// Find the branch policy first; the project is only validated once there is work to do
fn locate_branch(project_path: &Path, branch_override: Option<&str>) -> Result<Option<BranchTarget>> {
    println!("\n{}", "1. Determining branch...".yellow());
    let branch_name = branch_override
        .map(str::to_string)
        .or_else(actions::current_branch)
        .ok_or_else(|| {
            TagsyncError::Config(
                "Unable to determine the branch; pass --branch or set GITHUB_REF".to_string(),
            )
        })?;
    println!("   Branch: {}", branch_name.bright_cyan());

    println!("\n{}", "2. Reading release configuration...".yellow());
    let loaded = ReleaseConfigLoader::new(project_path).load()?;
    let branch = loaded.and_then(|loaded| {
        verbose(format!("Configuration found at {}", loaded.path.display()));
        loaded.config.find_branch(&branch_name).cloned()
    });

    let Some(branch) = branch else {
        println!(
            "{}",
            "Nothing to do since this is not a protected branch or a PR based on one".yellow()
        );
        return Ok(None);
    };
    println!("{}", "✓ Branch policy found".green());

    println!("\n{}", "3. Validating project structure...".yellow());
    let project = ProjectScannerAgent::new(project_path).validate()?;
    println!("{}", "✓ Project structure is valid".green());
    if project.is_workspace {
        println!("   Multi-package workspace detected");
    }

    Ok(Some(BranchTarget { project, branch }))
}

/// Apply the branch policy: update both categories, reconcile the workspace
/// and optionally commit. Returns the accumulated changes.
pub fn run_update(
    project: &ProjectInfo,
    branch: &BranchPolicy,
    runner: &dyn CommandRunner,
    commit: bool,
) -> Result<ChangeReport> {
    let policy = ResolvedPolicy::for_branch(branch);

    println!("\n{}", "4. Updating dependencies...".yellow());
    println!(
        "   Checking for updates to {} and {}",
        pluralize("dependency", policy.dependencies.len()),
        pluralize("dev dependency", policy.dev_dependencies.len())
    );

    let updater = DependencyUpdater::new(runner, &project.manifest_path);
    let mut report = ChangeReport::new();

    for (kind, dependencies) in policy.categories(branch) {
        if let Err(err) = updater.apply(dependencies, kind, &mut report) {
            print_partial_progress(&report);
            return Err(err);
        }
    }

    println!("{}", "✓ Update completed".green());
    print_update_report(&report);

    if WorkspaceReconciler::should_run(project.is_workspace, branch) {
        println!("\n{}", "5. Reconciling workspace manifests...".yellow());
        WorkspaceReconciler::new(runner)
            .reconcile(&policy.dependencies, &policy.dev_dependencies)?;
        report.mark_workspace_reconciled();
        println!(
            "{}",
            format!(
                "✓ Workspace reconciled, {} regenerated",
                project.lockfile_path.display()
            )
            .green()
        );
    }

    if commit && !report.is_empty() {
        println!("\n{}", "6. Creating Git commit...".yellow());
        VersionControlAgent::new(runner)
            .commit_files(&report.changed_files(), &report.commit_message())?;
        println!("{}", "✓ Changes committed".green());
    } else if report.is_empty() {
        println!("\n{}", "No updates were applied".yellow());
    }

    Ok(report)
}

/// Resolve every configured dependency without installing anything
pub fn run_check(
    project: &ProjectInfo,
    branch: &BranchPolicy,
    runner: &dyn CommandRunner,
) -> Result<Vec<UpdateRecord>> {
    let policy = ResolvedPolicy::for_branch(branch);
    println!("\n{}", "4. Querying the registry...".yellow());

    let updater = DependencyUpdater::new(runner, &project.manifest_path);
    let mut pending = Vec::new();
    for (kind, dependencies) in policy.categories(branch) {
        pending.extend(updater.check(dependencies, kind)?);
    }

    println!("{}", "✓ Check completed".green());
    Ok(pending)
}

fn print_partial_progress(report: &ChangeReport) {
    if report.is_empty() {
        println!("\n{}", "✗ Update failed before any dependency changed".red());
        return;
    }

    println!(
        "\n{}",
        format!(
            "✗ Update failed after applying {}:",
            pluralize("update", report.len())
        )
        .red()
    );
    for record in report.records() {
        println!("  • {record}");
    }
}

fn print_update_report(report: &ChangeReport) {
    if report.is_empty() {
        println!("\n{}", "All dependencies already match their tags".yellow());
        return;
    }

    println!("\n{}", "Update Summary:".cyan().bold());
    println!(
        "{}",
        format!("Total updates: {}", report.len()).green()
    );
    for record in report.records() {
        print_record(record);
    }
}

fn print_available_updates(pending: &[UpdateRecord]) {
    if pending.is_empty() {
        println!("\n{}", "✨ All dependencies are up to date!".green().bold());
        return;
    }

    println!("\n{}", "📦 Available Updates:".cyan().bold());
    println!(
        "{}",
        format!("Found {}", pluralize("update", pending.len())).yellow()
    );
    for record in pending {
        print_record(record);
    }

    println!("\n{}", "To apply these updates, run:".dimmed());
    println!("  {}", "tagsync update".cyan());
}

fn print_record(record: &UpdateRecord) {
    println!(
        "  • {} {} → {}",
        record.name.white().bold(),
        record.previous.as_deref().unwrap_or("none").red(),
        record.new.green()
    );
}

fn print_policy(branch: &BranchPolicy, policy: &ResolvedPolicy) {
    println!(
        "\n{}",
        format!("📦 Dependencies managed on '{}':", branch.name).cyan().bold()
    );

    for (label, kind, dependencies) in [
        ("Dependencies", DependencyKind::Production, &policy.dependencies),
        ("Dev dependencies", DependencyKind::Development, &policy.dev_dependencies),
    ] {
        if !branch.manages(kind) {
            continue;
        }

        println!("\n{}", format!("{label}:").yellow().bold());
        if dependencies.is_empty() {
            println!("  {}", "(none)".dimmed());
        }
        for (name, tag) in dependencies {
            println!("  {}@{}", name.cyan(), tag.green());
        }
    }

    println!("\n{}", "Summary:".cyan().bold());
    println!(
        "  {}",
        pluralize("dependency", policy.dependencies.len()).yellow()
    );
    println!(
        "  {}",
        pluralize("dev dependency", policy.dev_dependencies.len()).yellow()
    );
}
