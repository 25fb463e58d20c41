pub mod dependency_updater;
pub mod manifest;
pub mod npm_execution;
pub mod project_scanner;
pub mod version_control;
pub mod workspace_reconciler;

pub mod update;
pub use update::{ChangeReport, UpdateRecord};

pub use dependency_updater::DependencyUpdater;
pub use project_scanner::{ProjectInfo, ProjectScannerAgent};
pub use version_control::VersionControlAgent;
pub use workspace_reconciler::WorkspaceReconciler;
