//! External build tool invocation
//!
//! Every compile is delegated to a library's own build system; depot only
//! constructs argument lists and environment maps, runs the tool, and checks
//! the exit status. [`ToolRunner`] is the seam tests use to stub tools out.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

use crate::{CoreError, Result};

/// A fully constructed invocation of an external tool
#[derive(Debug, Clone)]
pub struct ToolCommand {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    /// Overrides merged on top of the inherited environment
    pub env: BTreeMap<String, String>,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.into(),
            env: BTreeMap::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn envs(mut self, vars: &BTreeMap<String, String>) -> Self {
        self.env
            .extend(vars.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    /// Rendered like a shell command line, for logs and diagnostics
    pub fn display(&self) -> String {
        let mut parts = vec![format!("\"{}\"", self.program)];
        parts.extend(self.args.iter().map(|a| format!("\"{}\"", a)));
        parts.join(" ")
    }
}

/// Runs tool commands; the one seam recipes go through to reach a subprocess
pub trait ToolRunner {
    fn run(&self, cmd: &ToolCommand) -> Result<()>;
}

/// Runs tools as real subprocesses, inheriting the parent environment
///
/// Execution blocks until the tool exits; there is no timeout. A hung build
/// tool blocks the whole run, which is the accepted tradeoff for a
/// human-supervised bootstrap tool.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    fn run(&self, cmd: &ToolCommand) -> Result<()> {
        info!("Running {} in {}", cmd.display(), cmd.cwd.display());
        debug!(env = ?cmd.env, "environment overrides");

        let status = Command::new(&cmd.program)
            .args(&cmd.args)
            .current_dir(&cmd.cwd)
            .envs(&cmd.env)
            .status()?;

        if !status.success() {
            let status = match status.code() {
                Some(code) => format!("exit code {}", code),
                None => "terminated by signal".to_string(),
            };
            return Err(CoreError::ToolFailed {
                tool: cmd.program.clone(),
                status,
            });
        }

        Ok(())
    }
}
