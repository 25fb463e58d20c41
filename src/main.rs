mod actions;
mod agents;
mod cli;
mod config;
mod error;
mod runner;
mod utils;
mod workflow;

use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use std::process;

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        unsafe {
            std::env::set_var(utils::output::VERBOSE_ENV, "1");
        }
    }

    let branch = cli.branch.as_deref();
    let result = match cli.command {
        Commands::Update { commit } => workflow::execute_update(&cli.path, branch, commit),
        Commands::Check => workflow::execute_check(&cli.path, branch),
        Commands::List => workflow::execute_list(&cli.path, branch),
    };

    if let Err(e) = result {
        if actions::is_github_actions() {
            println!("{}", actions::error_annotation(&e.to_string()));
        }
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}
