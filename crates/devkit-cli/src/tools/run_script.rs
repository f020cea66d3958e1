use super::{to_json, DevTool, ToolContext};
use devkit_core::script::{run_script, ScriptLanguage};

pub struct RunScriptTool;

impl DevTool for RunScriptTool {
    fn name(&self) -> &str {
        "run_script"
    }

    fn description(&self) -> &str {
        "Run a TypeScript or JavaScript snippet in the project root and return its output"
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "code": {
                    "type": "string",
                    "description": "Script source"
                },
                "language": {
                    "type": "string",
                    "enum": ["typescript", "javascript"],
                    "default": "typescript"
                }
            },
            "required": ["code"]
        })
    }

    fn call(&self, args: serde_json::Value, ctx: &ToolContext) -> Result<serde_json::Value, String> {
        let code = args["code"]
            .as_str()
            .ok_or_else(|| "missing required argument: code".to_string())?;
        let language = match args["language"].as_str() {
            Some(l) => l.parse::<ScriptLanguage>().map_err(|e| e.to_string())?,
            None => ScriptLanguage::default(),
        };

        let outcome = run_script(ctx.runner, ctx.config, ctx.root, code, language)
            .map_err(|e| e.to_string())?;
        to_json(&outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{ctx, project_with};
    use devkit_core::config::Config;
    use devkit_core::process::RecordingRunner;
    use devkit_core::runtime::Runtime;

    fn pinned(runtime: Runtime) -> Config {
        let mut config = Config::default();
        config.script.runtime = Some(runtime);
        config
    }

    #[test]
    fn runs_javascript_with_node() {
        let dir = project_with(&[]);
        let config = pinned(Runtime::Node);
        let runner = RecordingRunner::new();

        let result = RunScriptTool
            .call(
                serde_json::json!({"code": "console.log(1)", "language": "javascript"}),
                &ctx(dir.path(), &config, &runner),
            )
            .unwrap();

        assert_eq!(result["runtime"], "node");
        assert_eq!(result["succeeded"], true);
        let call = &runner.calls()[0];
        assert_eq!(call.program, "node");
        assert!(call.args[0].ends_with(".js"));
    }

    #[test]
    fn unknown_language_is_an_error() {
        let dir = project_with(&[]);
        let config = pinned(Runtime::Bun);
        let runner = RecordingRunner::new();

        let err = RunScriptTool
            .call(
                serde_json::json!({"code": "print(1)", "language": "python"}),
                &ctx(dir.path(), &config, &runner),
            )
            .unwrap_err();
        assert!(err.contains("unsupported script language"));
        assert!(runner.calls().is_empty());
    }
}
