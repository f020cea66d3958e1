use crate::output::{print_json, print_table};
use crate::tools::all_tools;

pub fn run(json: bool) -> anyhow::Result<()> {
    let tools = all_tools();

    if json {
        let list: Vec<serde_json::Value> = tools
            .iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name(),
                    "description": t.description(),
                    "inputSchema": t.schema(),
                })
            })
            .collect();
        return print_json(&list);
    }

    let rows = tools
        .iter()
        .map(|t| vec![t.name().to_string(), t.description().to_string()])
        .collect();
    print_table(&["TOOL", "DESCRIPTION"], rows);
    Ok(())
}
