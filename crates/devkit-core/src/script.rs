//! Run an ad-hoc script with an existing JavaScript runtime.
//!
//! The source is staged in a named temp file, executed in the project root
//! and removed afterwards. Sandboxing is whatever the runtime provides.

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{DevkitError, Result};
use crate::process::{Invocation, ProcessRunner};
use crate::runtime::{self, Runtime};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptLanguage {
    #[default]
    TypeScript,
    JavaScript,
}

impl ScriptLanguage {
    pub fn extension(&self) -> &'static str {
        match self {
            ScriptLanguage::TypeScript => "ts",
            ScriptLanguage::JavaScript => "js",
        }
    }
}

impl FromStr for ScriptLanguage {
    type Err = DevkitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ts" | "typescript" => Ok(ScriptLanguage::TypeScript),
            "js" | "javascript" => Ok(ScriptLanguage::JavaScript),
            other => Err(DevkitError::InvalidArgument(format!(
                "unsupported script language '{other}': expected typescript or javascript"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptOutcome {
    pub succeeded: bool,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub timed_out: bool,
    pub runtime: Runtime,
}

/// Stage `source` in a temp file and run it in `root`.
pub fn run_script(
    runner: &dyn ProcessRunner,
    config: &Config,
    root: &Path,
    source: &str,
    language: ScriptLanguage,
) -> Result<ScriptOutcome> {
    if source.trim().is_empty() {
        return Err(DevkitError::InvalidArgument("script source is empty".into()));
    }
    if !root.is_dir() {
        return Err(DevkitError::InvalidArgument(format!(
            "project root is not a directory: {}",
            root.display()
        )));
    }

    let runtime = runtime::select_runtime(config.script.runtime, runtime::on_path)?;

    let mut staged = tempfile::Builder::new()
        .prefix("devkit-script-")
        .suffix(&format!(".{}", language.extension()))
        .tempfile()?;
    staged.write_all(source.as_bytes())?;
    staged.flush()?;

    let (program, args) = runtime.command(staged.path(), language);
    let invocation = Invocation::new(program, args, root).with_timeout(config.script_timeout());

    let outcome = match runner.run(&invocation) {
        Ok(out) => ScriptOutcome {
            succeeded: out.success(),
            exit_code: out.exit_code,
            stdout: out.stdout,
            stderr: out.stderr,
            timed_out: out.timed_out,
            runtime,
        },
        Err(e) => {
            warn!(runtime = %runtime, error = %e, "failed to spawn script runtime");
            ScriptOutcome {
                succeeded: false,
                exit_code: None,
                stdout: String::new(),
                stderr: format!("failed to spawn {}: {e}", invocation.program),
                timed_out: false,
                runtime,
            }
        }
    };

    info!(runtime = %runtime, succeeded = outcome.succeeded, "script finished");
    // `staged` drops here and removes the file.
    Ok(outcome)
}
