use crate::output::{print_json, print_table};
use devkit_core::config::Config;
use devkit_core::fs::OsFilesystem;
use devkit_core::lint::lint_file;
use devkit_core::process::SystemRunner;
use std::path::Path;

pub fn run(root: &Path, file: &Path, fix: bool, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root)?;
    let report = lint_file(&OsFilesystem, &SystemRunner, &config, root, file, fix)?;

    if json {
        print_json(&report)?;
    } else if report.is_clean() {
        println!(
            "{}: no problems{}",
            report.file.display(),
            if report.fixed { " (fixes applied)" } else { "" }
        );
    } else if report.succeeded {
        if !report.messages.is_empty() {
            let rows = report
                .messages
                .iter()
                .map(|m| {
                    vec![
                        format!("{}:{}", m.line.unwrap_or(0), m.column.unwrap_or(0)),
                        if m.severity >= 2 { "error" } else { "warning" }.to_string(),
                        m.rule_id.clone().unwrap_or_default(),
                        m.message.clone(),
                    ]
                })
                .collect();
            print_table(&["LOCATION", "SEVERITY", "RULE", "MESSAGE"], rows);
        }
        println!(
            "{}: {} error(s), {} warning(s){}",
            report.file.display(),
            report.error_count,
            report.warning_count,
            if report.fixed { ", fixes applied" } else { "" }
        );
    }

    if !report.succeeded {
        anyhow::bail!("linter failed: {}", report.stderr.trim());
    }
    if report.error_count > 0 {
        anyhow::bail!("{} lint error(s) remain", report.error_count);
    }
    Ok(())
}
