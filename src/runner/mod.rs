// External process boundary.
//
// Every registry lookup, install and git invocation goes through
// `CommandRunner`, so the update logic can be driven by a scripted runner
// in tests and by `SystemCommandRunner` in CI.
pub mod system;

#[cfg(test)]
pub mod fake;

pub use system::SystemCommandRunner;

use crate::error::Result;

/// Runs an external command to completion and captures its standard output.
pub trait CommandRunner {
    /// Run `program` with `args`. A non-zero exit status is an error.
    fn run(&self, program: &str, args: &[&str]) -> Result<String>;
}

/// Render a command line for logs and error messages
pub fn command_line(program: &str, args: &[&str]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}
