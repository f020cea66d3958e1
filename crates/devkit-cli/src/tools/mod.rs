use devkit_core::config::Config;
use devkit_core::fs::Filesystem;
use devkit_core::process::ProcessRunner;
use std::path::Path;

pub mod install_package;
pub mod lint_file;
pub mod remove_package;
pub mod run_script;

/// Everything a tool call may touch. Capabilities are injected so the same
/// tools run against real processes, dry runs and tests.
pub struct ToolContext<'a> {
    pub root: &'a Path,
    pub config: &'a Config,
    pub fs: &'a dyn Filesystem,
    pub runner: &'a dyn ProcessRunner,
}

pub trait DevTool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn schema(&self) -> serde_json::Value;
    fn call(&self, args: serde_json::Value, ctx: &ToolContext) -> Result<serde_json::Value, String>;
}

pub fn all_tools() -> Vec<Box<dyn DevTool>> {
    vec![
        Box::new(install_package::InstallPackageTool),
        Box::new(remove_package::RemovePackageTool),
        Box::new(lint_file::LintFileTool),
        Box::new(run_script::RunScriptTool),
    ]
}

/// Read `key` as a list of strings. A bare string is accepted as a
/// one-element list.
pub(crate) fn string_list(args: &serde_json::Value, key: &str) -> Result<Vec<String>, String> {
    match &args[key] {
        serde_json::Value::String(s) => Ok(vec![s.clone()]),
        serde_json::Value::Array(items) => items
            .iter()
            .map(|v| {
                v.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| format!("{key} must contain only strings"))
            })
            .collect(),
        serde_json::Value::Null => Err(format!("missing required argument: {key}")),
        _ => Err(format!("{key} must be a string or an array of strings")),
    }
}

pub(crate) fn to_json<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, String> {
    serde_json::to_value(value).map_err(|e| e.to_string())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_names_are_unique() {
        let tools = all_tools();
        let mut names: Vec<&str> = tools.iter().map(|t| t.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), tools.len());
    }

    #[test]
    fn schemas_are_objects() {
        for tool in all_tools() {
            assert_eq!(tool.schema()["type"], "object", "{}", tool.name());
        }
    }

    #[test]
    fn string_list_accepts_string_or_array() {
        let args = serde_json::json!({"a": "react", "b": ["x", "y"], "c": [1], "d": 3});
        assert_eq!(string_list(&args, "a").unwrap(), vec!["react"]);
        assert_eq!(string_list(&args, "b").unwrap(), vec!["x", "y"]);
        assert!(string_list(&args, "c").is_err());
        assert!(string_list(&args, "d").is_err());
        assert_eq!(
            string_list(&args, "missing").unwrap_err(),
            "missing required argument: missing"
        );
    }
}
