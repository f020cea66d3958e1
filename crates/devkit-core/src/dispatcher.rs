//! Package manager dispatch: detect the manager governing a project and run
//! an add/remove through it.
//!
//! Two kinds of failure are kept apart:
//! - a malformed request or a project without a lockfile is an `Err`, and
//!   nothing is spawned;
//! - anything that goes wrong in the package manager itself (non-zero exit,
//!   timeout, executable missing) is an `Ok(ActionResult)` with
//!   `succeeded == false`, so batch callers can keep going.

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use crate::command::{template_for, Action};
use crate::error::{DevkitError, Result};
use crate::fs::Filesystem;
use crate::manager::{self, ManagerKind};
use crate::process::{Invocation, ProcessRunner};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    pub action: Action,
    pub package_names: Vec<String>,
    pub project_root: PathBuf,
    pub timeout: Option<Duration>,
}

impl ActionRequest {
    pub fn new(
        action: Action,
        package_names: impl IntoIterator<Item = impl Into<String>>,
        project_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            action,
            package_names: package_names.into_iter().map(Into::into).collect(),
            project_root: project_root.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionResult {
    pub succeeded: bool,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub manager: ManagerKind,
    pub timed_out: bool,
    /// Program followed by its arguments, exactly as spawned.
    pub command: Vec<String>,
}

pub struct Dispatcher<'a> {
    fs: &'a dyn Filesystem,
    runner: &'a dyn ProcessRunner,
}

impl<'a> Dispatcher<'a> {
    pub fn new(fs: &'a dyn Filesystem, runner: &'a dyn ProcessRunner) -> Self {
        Self { fs, runner }
    }

    pub fn detect(&self, project_root: &Path) -> ManagerKind {
        manager::detect(self.fs, project_root)
    }

    /// Validate the request, then run the detected manager's command.
    pub fn run(&self, request: &ActionRequest) -> Result<ActionResult> {
        validate(self.fs, request)?;

        let root = &request.project_root;
        let kind = self.detect(root);
        let template = template_for(kind, request.action).ok_or_else(|| {
            DevkitError::ManagerNotDetected {
                root: root.to_path_buf(),
            }
        })?;

        let invocation = Invocation::new(
            template.program,
            template.args(&request.package_names),
            root.clone(),
        )
        .with_timeout(request.timeout);

        let mut command = vec![invocation.program.clone()];
        command.extend(invocation.args.iter().cloned());

        let result = match self.runner.run(&invocation) {
            Ok(out) => ActionResult {
                succeeded: out.success(),
                exit_code: out.exit_code,
                stdout: out.stdout,
                stderr: out.stderr,
                manager: kind,
                timed_out: out.timed_out,
                command,
            },
            Err(e) => {
                warn!(command = %invocation.display(), error = %e, "failed to spawn package manager");
                ActionResult {
                    succeeded: false,
                    exit_code: None,
                    stdout: String::new(),
                    stderr: format!("failed to spawn {}: {e}", invocation.program),
                    manager: kind,
                    timed_out: false,
                    command,
                }
            }
        };

        info!(
            manager = %kind,
            action = %request.action,
            succeeded = result.succeeded,
            exit_code = ?result.exit_code,
            "package command finished"
        );
        Ok(result)
    }
}

fn validate(fs: &dyn Filesystem, request: &ActionRequest) -> Result<()> {
    if request.package_names.is_empty() {
        return Err(DevkitError::InvalidArgument(
            "at least one package name is required".into(),
        ));
    }
    if let Some(pos) = request.package_names.iter().position(|n| n.is_empty()) {
        return Err(DevkitError::InvalidArgument(format!(
            "package name at position {pos} is empty"
        )));
    }
    if !fs.is_dir(&request.project_root) {
        return Err(DevkitError::InvalidArgument(format!(
            "project root is not a directory: {}",
            request.project_root.display()
        )));
    }
    Ok(())
}
