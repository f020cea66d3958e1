use super::{string_list, to_json, DevTool, ToolContext};
use devkit_core::command::Action;
use devkit_core::{ActionRequest, Dispatcher};

pub struct RemovePackageTool;

impl DevTool for RemovePackageTool {
    fn name(&self) -> &str {
        "remove_package"
    }

    fn description(&self) -> &str {
        "Remove packages with the project's package manager (detected from its lockfile)"
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "packages": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Package names to remove"
                }
            },
            "required": ["packages"]
        })
    }

    fn call(&self, args: serde_json::Value, ctx: &ToolContext) -> Result<serde_json::Value, String> {
        let packages = string_list(&args, "packages")?;

        let request = ActionRequest::new(Action::Remove, packages, ctx.root)
            .with_timeout(ctx.config.package_timeout());
        let result = Dispatcher::new(ctx.fs, ctx.runner)
            .run(&request)
            .map_err(|e| e.to_string())?;

        to_json(&result)
    }
}
