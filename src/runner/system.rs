use super::{CommandRunner, command_line};
use crate::error::{Result, TagsyncError};
use colored::Colorize;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

/// Runs commands inside the project directory, streaming their output live
pub struct SystemCommandRunner {
    project_path: PathBuf,
}

impl SystemCommandRunner {
    pub fn new<P: AsRef<Path>>(project_path: P) -> Self {
        Self {
            project_path: project_path.as_ref().to_path_buf(),
        }
    }
}

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<String> {
        let rendered = command_line(program, args);
        println!("{}", format!("[command]{rendered}").dimmed());

        let mut child = Command::new(program)
            .current_dir(&self.project_path)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| TagsyncError::CommandExecution {
                command: rendered.clone(),
                message: format!("Failed to spawn process: {e}"),
            })?;

        // Drain stderr on its own thread so a chatty process cannot block on a full pipe
        let stderr_reader = child.stderr.take().map(|mut stderr| {
            thread::spawn(move || {
                let mut buffer = Vec::new();
                let _ = stderr.read_to_end(&mut buffer);
                String::from_utf8_lossy(&buffer).into_owned()
            })
        });

        // Output is decoded lossily; a read error ends streaming but the child is still reaped
        let mut stdout = String::new();
        let mut read_error = None;
        if let Some(out) = child.stdout.take() {
            let mut reader = BufReader::new(out);
            let mut buffer = Vec::new();
            loop {
                buffer.clear();
                match reader.read_until(b'\n', &mut buffer) {
                    Ok(0) => break,
                    Ok(_) => {
                        let line = String::from_utf8_lossy(&buffer);
                        let line = line.trim_end_matches(['\n', '\r']);
                        println!("{line}");
                        stdout.push_str(line);
                        stdout.push('\n');
                    }
                    Err(e) => {
                        read_error = Some(e);
                        break;
                    }
                }
            }
        }

        let status = child.wait().map_err(|e| TagsyncError::CommandExecution {
            command: rendered.clone(),
            message: format!("Failed to wait for process: {e}"),
        })?;

        let stderr = stderr_reader
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default();
        if !stderr.is_empty() {
            eprint!("{stderr}");
        }

        if let Some(e) = read_error {
            return Err(TagsyncError::CommandExecution {
                command: rendered,
                message: format!("Failed to read process output: {e}"),
            });
        }

        if !status.success() {
            return Err(TagsyncError::CommandExecution {
                command: rendered,
                message: format!(
                    "exit code {}: {}",
                    status.code().unwrap_or(-1),
                    stderr.trim()
                ),
            });
        }

        Ok(stdout)
    }
}
