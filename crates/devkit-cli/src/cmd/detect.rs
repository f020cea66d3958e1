use crate::output::print_json;
use devkit_core::fs::OsFilesystem;
use devkit_core::manager;
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let kind = manager::detect(&OsFilesystem, root);

    if json {
        print_json(&serde_json::json!({
            "root": root,
            "manager": kind,
            "marker": kind.marker(),
        }))?;
    } else {
        match kind.marker() {
            Some(marker) => println!("{kind} ({marker})"),
            None => println!(
                "{kind} (none of {} found)",
                manager::MARKER_FILES.join(", ")
            ),
        }
    }
    Ok(())
}
