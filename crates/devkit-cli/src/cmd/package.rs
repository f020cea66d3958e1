//! `devkit add` / `devkit remove`.

use crate::output::{print_captured, print_json};
use devkit_core::command::Action;
use devkit_core::config::Config;
use devkit_core::fs::OsFilesystem;
use devkit_core::process::{ProcessRunner, RecordingRunner, SystemRunner};
use devkit_core::{ActionRequest, Dispatcher};
use std::path::Path;
use std::time::Duration;

pub struct PackageArgs {
    pub packages: Vec<String>,
    /// Seconds; `Some(0)` disables the timeout, `None` uses the config.
    pub timeout: Option<u64>,
    pub dry_run: bool,
}

pub fn add(root: &Path, args: PackageArgs, dev: bool, json: bool) -> anyhow::Result<()> {
    dispatch(root, Action::install(dev), args, json)
}

pub fn remove(root: &Path, args: PackageArgs, json: bool) -> anyhow::Result<()> {
    dispatch(root, Action::Remove, args, json)
}

fn dispatch(root: &Path, action: Action, args: PackageArgs, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root)?;
    let timeout = match args.timeout {
        Some(0) => None,
        Some(secs) => Some(Duration::from_secs(secs)),
        None => config.package_timeout(),
    };
    let request = ActionRequest::new(action, args.packages, root).with_timeout(timeout);

    let recorder = RecordingRunner::new();
    let runner: &dyn ProcessRunner = if args.dry_run {
        &recorder
    } else {
        &SystemRunner
    };
    let result = Dispatcher::new(&OsFilesystem, runner).run(&request)?;

    if args.dry_run {
        if json {
            print_json(&serde_json::json!({
                "dry_run": true,
                "manager": result.manager,
                "command": result.command,
            }))?;
        } else {
            println!("would run: {}", result.command.join(" "));
        }
        return Ok(());
    }

    if json {
        print_json(&result)?;
    } else {
        print_captured(&result.stdout, &result.stderr);
    }

    if !result.succeeded {
        let program = result.command.first().map(String::as_str).unwrap_or("");
        match result.exit_code {
            Some(code) => anyhow::bail!("{program} exited with code {code}"),
            None if result.timed_out => anyhow::bail!("{program} timed out"),
            None => anyhow::bail!("{program} could not be run"),
        }
    }
    Ok(())
}
