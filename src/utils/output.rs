use colored::Colorize;
use std::env;

pub const VERBOSE_ENV: &str = "TAGSYNC_VERBOSE";

pub fn is_verbose() -> bool {
    env::var(VERBOSE_ENV).is_ok_and(|value| value == "1")
}

/// Print a diagnostic line when `--verbose` is active
pub fn verbose(message: impl AsRef<str>) {
    if is_verbose() {
        println!("{}", format!("   {}", message.as_ref()).dimmed());
    }
}

/// `1 dependency`, `3 dev dependencies`
pub fn pluralize(noun: &str, count: usize) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else if let Some(stem) = noun.strip_suffix('y') {
        format!("{count} {stem}ies")
    } else {
        format!("{count} {noun}s")
    }
}
