//! Glue for running inside a GitHub Actions job.

use std::env;

const BASE_REF_ENV: &str = "GITHUB_BASE_REF";
const REF_ENV: &str = "GITHUB_REF";
const ACTIONS_ENV: &str = "GITHUB_ACTIONS";
const BRANCH_REF_PREFIX: &str = "refs/heads/";

/// Branch the run applies to: the pull request's target branch when there is
/// one, otherwise the branch the push landed on.
pub fn current_branch() -> Option<String> {
    branch_from_refs(
        env::var(BASE_REF_ENV).ok().as_deref(),
        env::var(REF_ENV).ok().as_deref(),
    )
}

pub fn branch_from_refs(base_ref: Option<&str>, git_ref: Option<&str>) -> Option<String> {
    if let Some(base) = base_ref.filter(|value| !value.is_empty()) {
        return Some(base.to_string());
    }

    git_ref
        .filter(|value| !value.is_empty())
        .map(|value| value.strip_prefix(BRANCH_REF_PREFIX).unwrap_or(value).to_string())
}

/// Boolean action inputs are only true for the literal `true`
pub fn parse_input_flag(value: &str) -> Result<bool, String> {
    Ok(value.trim() == "true")
}

pub fn is_github_actions() -> bool {
    env::var(ACTIONS_ENV).is_ok_and(|value| value == "true")
}

/// Failure annotation shown on the job summary
pub fn error_annotation(message: &str) -> String {
    let escaped = message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A");
    format!("::error::{escaped}")
}
