//! Lint a single file by forwarding its content to an external linter.
//!
//! The linter is driven through its stdin interface with JSON output
//! (`--stdin --stdin-filename <file> --format json`, ESLint conventions).
//! With `fix`, `--fix-dry-run` is added and any returned `output` is
//! written back through the filesystem capability.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{DevkitError, Result};
use crate::fs::Filesystem;
use crate::paths;
use crate::process::{Invocation, ProcessRunner};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintMessage {
    #[serde(default, alias = "ruleId")]
    pub rule_id: Option<String>,
    /// 1 = warning, 2 = error.
    pub severity: u8,
    pub message: String,
    #[serde(default)]
    pub line: Option<u32>,
    #[serde(default)]
    pub column: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LinterFileResult {
    #[serde(default)]
    messages: Vec<LintMessage>,
    #[serde(default)]
    error_count: u32,
    #[serde(default)]
    warning_count: u32,
    #[serde(default)]
    output: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LintReport {
    pub file: PathBuf,
    /// The linter ran and produced a readable report.
    pub succeeded: bool,
    pub exit_code: Option<i32>,
    pub error_count: u32,
    pub warning_count: u32,
    /// Fixed content was written back to `file`.
    pub fixed: bool,
    pub messages: Vec<LintMessage>,
    pub stderr: String,
}

impl LintReport {
    fn failed(file: PathBuf, exit_code: Option<i32>, stderr: String) -> Self {
        Self {
            file,
            succeeded: false,
            exit_code,
            error_count: 0,
            warning_count: 0,
            fixed: false,
            messages: Vec::new(),
            stderr,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.succeeded && self.error_count == 0 && self.warning_count == 0
    }
}

pub fn lint_file(
    fs: &dyn Filesystem,
    runner: &dyn ProcessRunner,
    config: &Config,
    root: &Path,
    file: &Path,
    fix: bool,
) -> Result<LintReport> {
    let path = paths::resolve_in(root, file);
    if !fs.exists(&path) || fs.is_dir(&path) {
        return Err(DevkitError::InvalidArgument(format!(
            "not a file: {}",
            path.display()
        )));
    }
    let content = fs.read_to_string(&path)?;
    let (program, leading) = config.lint_command()?;

    let mut args: Vec<String> = leading.to_vec();
    args.extend([
        "--stdin".to_string(),
        "--stdin-filename".to_string(),
        path.to_string_lossy().into_owned(),
        "--format".to_string(),
        "json".to_string(),
    ]);
    if fix {
        args.push("--fix-dry-run".to_string());
    }

    let invocation = Invocation::new(program, args, root)
        .with_stdin(content.clone())
        .with_timeout(config.lint_timeout());

    let out = match runner.run(&invocation) {
        Ok(out) => out,
        Err(e) => {
            warn!(command = %invocation.display(), error = %e, "failed to spawn linter");
            return Ok(LintReport::failed(
                path,
                None,
                format!("failed to spawn {program}: {e}"),
            ));
        }
    };

    // ESLint: 0 = clean, 1 = problems found, anything else = linter crashed.
    if !matches!(out.exit_code, Some(0) | Some(1)) {
        return Ok(LintReport::failed(path, out.exit_code, out.stderr));
    }

    let results: Vec<LinterFileResult> = match serde_json::from_str(out.stdout.trim()) {
        Ok(r) => r,
        Err(e) => {
            debug!(stdout = %out.stdout, "linter output is not a JSON report");
            let mut stderr = format!("unreadable linter output: {e}");
            if !out.stderr.is_empty() {
                stderr.push('\n');
                stderr.push_str(&out.stderr);
            }
            return Ok(LintReport::failed(path, out.exit_code, stderr));
        }
    };

    let mut report = LintReport {
        file: path.clone(),
        succeeded: true,
        exit_code: out.exit_code,
        error_count: 0,
        warning_count: 0,
        fixed: false,
        messages: Vec::new(),
        stderr: out.stderr,
    };
    let mut fixed_output = None;
    for result in results {
        report.error_count += result.error_count;
        report.warning_count += result.warning_count;
        report.messages.extend(result.messages);
        if fixed_output.is_none() {
            fixed_output = result.output;
        }
    }

    if fix {
        if let Some(fixed) = fixed_output.filter(|f| *f != content) {
            fs.write(&path, &fixed)?;
            report.fixed = true;
        }
    }

    info!(
        file = %path.display(),
        errors = report.error_count,
        warnings = report.warning_count,
        fixed = report.fixed,
        "lint finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::OsFilesystem;
    use crate::process::{ProcessOutput, RecordingRunner};
    use tempfile::TempDir;

    fn linter_reply(exit_code: i32, stdout: &str) -> RecordingRunner {
        RecordingRunner::with_output(ProcessOutput {
            exit_code: Some(exit_code),
            stdout: stdout.to_string(),
            ..ProcessOutput::default()
        })
    }

    fn project_with_file(name: &str, content: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
        dir
    }

    #[test]
    fn fix_writes_linter_output_back() {
        let dir = project_with_file("src/app.js", "var a = 1\n");
        let runner = linter_reply(
            0,
            r#"[{"filePath":"src/app.js","messages":[],"errorCount":0,"warningCount":0,"output":"const a = 1;\n"}]"#,
        );

        let report = lint_file(
            &OsFilesystem,
            &runner,
            &Config::default(),
            dir.path(),
            Path::new("src/app.js"),
            true,
        )
        .unwrap();

        assert!(report.succeeded);
        assert!(report.fixed);
        assert!(report.is_clean());
        assert_eq!(
            std::fs::read_to_string(dir.path().join("src/app.js")).unwrap(),
            "const a = 1;\n"
        );

        let call = &runner.calls()[0];
        assert_eq!(call.program, "npx");
        assert_eq!(call.args[0], "eslint");
        assert!(call.args.contains(&"--fix-dry-run".to_string()));
        assert!(call.args.contains(&"--stdin".to_string()));
        assert_eq!(call.stdin.as_deref(), Some("var a = 1\n"));
        assert_eq!(call.cwd, dir.path());
    }

    #[test]
    fn problems_are_reported_without_fix() {
        let dir = project_with_file("index.ts", "let unused = 1\n");
        let runner = linter_reply(
            1,
            r#"[{"filePath":"index.ts","messages":[{"ruleId":"no-unused-vars","severity":2,"message":"'unused' is assigned a value but never used.","line":1,"column":5}],"errorCount":1,"warningCount":0}]"#,
        );

        let report = lint_file(
            &OsFilesystem,
            &runner,
            &Config::default(),
            dir.path(),
            Path::new("index.ts"),
            false,
        )
        .unwrap();

        assert!(report.succeeded);
        assert!(!report.fixed);
        assert_eq!(report.error_count, 1);
        assert_eq!(report.messages[0].rule_id.as_deref(), Some("no-unused-vars"));
        assert_eq!(report.messages[0].line, Some(1));
        assert!(!runner.calls()[0].args.contains(&"--fix-dry-run".to_string()));
        assert_eq!(
            std::fs::read_to_string(dir.path().join("index.ts")).unwrap(),
            "let unused = 1\n"
        );
    }

    #[test]
    fn unchanged_output_is_not_rewritten() {
        let dir = project_with_file("a.js", "const a = 1;\n");
        let runner = linter_reply(
            0,
            r#"[{"messages":[],"errorCount":0,"warningCount":0,"output":"const a = 1;\n"}]"#,
        );

        let report = lint_file(
            &OsFilesystem,
            &runner,
            &Config::default(),
            dir.path(),
            Path::new("a.js"),
            true,
        )
        .unwrap();
        assert!(!report.fixed);
    }

    #[test]
    fn linter_crash_is_a_failed_report() {
        let dir = project_with_file("a.js", "x");
        let runner = RecordingRunner::with_output(ProcessOutput {
            exit_code: Some(2),
            stderr: "Oops! Something went wrong!".into(),
            ..ProcessOutput::default()
        });

        let report = lint_file(
            &OsFilesystem,
            &runner,
            &Config::default(),
            dir.path(),
            Path::new("a.js"),
            true,
        )
        .unwrap();
        assert!(!report.succeeded);
        assert_eq!(report.exit_code, Some(2));
        assert!(report.stderr.contains("Something went wrong"));
    }

    #[test]
    fn garbage_output_is_a_failed_report() {
        let dir = project_with_file("a.js", "x");
        let runner = linter_reply(0, "not json");

        let report = lint_file(
            &OsFilesystem,
            &runner,
            &Config::default(),
            dir.path(),
            Path::new("a.js"),
            false,
        )
        .unwrap();
        assert!(!report.succeeded);
        assert!(report.stderr.contains("unreadable linter output"));
    }

    #[test]
    fn missing_file_is_invalid_argument() {
        let dir = TempDir::new().unwrap();
        let runner = RecordingRunner::new();
        let err = lint_file(
            &OsFilesystem,
            &runner,
            &Config::default(),
            dir.path(),
            Path::new("nope.js"),
            true,
        )
        .unwrap_err();
        assert!(matches!(err, DevkitError::InvalidArgument(_)));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn custom_linter_command_is_used() {
        let dir = project_with_file("a.js", "x");
        let runner = linter_reply(0, "[]");
        let mut config = Config::default();
        config.lint.command = vec!["eslint_d".into()];

        lint_file(
            &OsFilesystem,
            &runner,
            &config,
            dir.path(),
            Path::new("a.js"),
            false,
        )
        .unwrap();
        let call = &runner.calls()[0];
        assert_eq!(call.program, "eslint_d");
        assert_eq!(call.args[0], "--stdin");
    }
}
