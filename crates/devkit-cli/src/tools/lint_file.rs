use super::{to_json, DevTool, ToolContext};
use devkit_core::lint::lint_file;
use std::path::Path;

pub struct LintFileTool;

impl DevTool for LintFileTool {
    fn name(&self) -> &str {
        "lint_file"
    }

    fn description(&self) -> &str {
        "Lint a file with the project's linter and apply automatic fixes"
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "File to lint, relative to the project root"
                },
                "fix": {
                    "type": "boolean",
                    "description": "Write automatic fixes back to the file",
                    "default": true
                }
            },
            "required": ["path"]
        })
    }

    fn call(&self, args: serde_json::Value, ctx: &ToolContext) -> Result<serde_json::Value, String> {
        let path = args["path"]
            .as_str()
            .ok_or_else(|| "missing required argument: path".to_string())?;
        let fix = args["fix"].as_bool().unwrap_or(true);

        let report = lint_file(ctx.fs, ctx.runner, ctx.config, ctx.root, Path::new(path), fix)
            .map_err(|e| e.to_string())?;
        to_json(&report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{ctx, project_with};
    use devkit_core::config::Config;
    use devkit_core::process::{ProcessOutput, RecordingRunner};

    #[test]
    fn fixes_by_default() {
        let dir = project_with(&[]);
        std::fs::write(dir.path().join("a.js"), "var x = 1").unwrap();
        let config = Config::default();
        let runner = RecordingRunner::with_output(ProcessOutput {
            exit_code: Some(0),
            stdout: r#"[{"messages":[],"errorCount":0,"warningCount":0,"output":"const x = 1;"}]"#
                .into(),
            ..ProcessOutput::default()
        });

        let result = LintFileTool
            .call(
                serde_json::json!({"path": "a.js"}),
                &ctx(dir.path(), &config, &runner),
            )
            .unwrap();

        assert_eq!(result["fixed"], true);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("a.js")).unwrap(),
            "const x = 1;"
        );
    }

    #[test]
    fn missing_path_argument() {
        let dir = project_with(&[]);
        let config = Config::default();
        let runner = RecordingRunner::new();
        let err = LintFileTool
            .call(serde_json::json!({}), &ctx(dir.path(), &config, &runner))
            .unwrap_err();
        assert_eq!(err, "missing required argument: path");
    }
}
