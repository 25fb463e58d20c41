use crate::actions::parse_input_flag;
use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "tagsync",
    about = "Pin npm dependencies to the distribution tags declared for a release branch",
    version,
    author
)]
pub struct Cli {
    /// Path to the project directory (defaults to current directory)
    #[arg(short, long, default_value = ".", global = true)]
    pub path: String,

    /// Branch to apply; defaults to GITHUB_BASE_REF, then GITHUB_REF
    #[arg(short, long, global = true)]
    pub branch: Option<String>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install the versions the branch's tags point at and reconcile the workspace
    Update {
        /// Commit the changes when any dependency was updated ("true" to enable)
        #[arg(
            long,
            env = "INPUT_COMMIT",
            default_value = "false",
            action = ArgAction::Set,
            value_parser = parse_input_flag
        )]
        commit: bool,
    },

    /// Report which dependencies would be updated without changing anything
    Check,

    /// List the dependency tags declared for the branch
    List,
}
