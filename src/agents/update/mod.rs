// Change tracking for an update run.
//
// - UpdateRecord: a single applied version change
// - ChangeReport: the ordered accumulation of records plus the commit inputs
pub mod report;

pub use report::{ChangeReport, LOCKFILE, MANIFEST_FILE, UpdateRecord};
