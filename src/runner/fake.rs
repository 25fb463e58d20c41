use super::{CommandRunner, command_line};
use crate::error::{Result, TagsyncError};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Scripted runner for tests.
///
/// `npm view <spec> version` answers from the registry table, and
/// `npm install <name>@<version> <flags>` rewrites `package.json` the way npm
/// would, so consecutive runs observe each other's effects.
pub struct FakeRunner {
    project_path: PathBuf,
    registry: HashMap<String, String>,
    fail_on: Option<String>,
    calls: RefCell<Vec<String>>,
}

impl FakeRunner {
    pub fn new<P: AsRef<Path>>(project_path: P) -> Self {
        Self {
            project_path: project_path.as_ref().to_path_buf(),
            registry: HashMap::new(),
            fail_on: None,
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Answer `npm view <spec> version` with `version`
    pub fn with_version(mut self, spec: &str, version: &str) -> Self {
        self.registry.insert(spec.to_string(), version.to_string());
        self
    }

    /// Fail any command whose rendered line starts with `prefix`
    pub fn failing_on(mut self, prefix: &str) -> Self {
        self.fail_on = Some(prefix.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn calls_starting_with(&self, prefix: &str) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter(|call| call.starts_with(prefix))
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }

    fn install(&self, args: &[&str]) -> Result<()> {
        // Bare `npm install` reinstalls from the lockfile and leaves pins alone
        let Some(&spec) = args.get(1) else {
            return Ok(());
        };
        let (name, version) = match spec.rfind('@') {
            Some(idx) if idx > 0 && idx + 1 < spec.len() => (&spec[..idx], &spec[idx + 1..]),
            _ => {
                return Err(TagsyncError::CommandExecution {
                    command: command_line("npm", args),
                    message: format!("exit code 1: invalid package spec '{spec}'"),
                });
            }
        };
        // npm saves dev installs with its default `^` range prefix
        let (section, saved) = if args.contains(&"--save-dev") {
            ("devDependencies", format!("^{version}"))
        } else {
            ("dependencies", version.to_string())
        };

        let path = self.project_path.join("package.json");
        let mut manifest: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
        let root = manifest
            .as_object_mut()
            .ok_or_else(|| TagsyncError::ManifestParsing("not an object".into()))?;
        let deps = root
            .entry(section)
            .or_insert_with(|| serde_json::json!({}));
        if let Some(map) = deps.as_object_mut() {
            map.insert(name.to_string(), serde_json::Value::String(saved));
        }
        fs::write(&path, serde_json::to_string_pretty(&manifest)?)?;
        Ok(())
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<String> {
        let rendered = command_line(program, args);
        self.calls.borrow_mut().push(rendered.clone());

        if let Some(prefix) = &self.fail_on {
            if rendered.starts_with(prefix.as_str()) {
                return Err(TagsyncError::CommandExecution {
                    command: rendered,
                    message: "exit code 1: scripted failure".to_string(),
                });
            }
        }

        match (program, args.first().copied()) {
            ("npm", Some("view")) => {
                let Some(&spec) = args.get(1) else {
                    return Ok(String::new());
                };
                Ok(self
                    .registry
                    .get(spec)
                    .map(|version| format!("{version}\n"))
                    .unwrap_or_default())
            }
            ("npm", Some("install")) => {
                self.install(args)?;
                Ok(String::new())
            }
            _ => Ok(String::new()),
        }
    }
}
