pub mod loader;
pub mod policy;

pub use loader::{BranchPolicy, ReleaseConfigLoader};
pub use policy::{DependencyKind, ResolvedDependencyMap, resolve_dependencies};
