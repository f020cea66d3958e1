use crate::output::{print_captured, print_json};
use anyhow::Context;
use devkit_core::config::Config;
use devkit_core::process::SystemRunner;
use devkit_core::script::{run_script, ScriptLanguage};
use std::io::Read;
use std::path::Path;

/// `source` is a file path, or `-` for stdin.
pub fn run(root: &Path, source: &str, lang: Option<&str>, json: bool) -> anyhow::Result<()> {
    let code = if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read script from stdin")?;
        buf
    } else {
        std::fs::read_to_string(source).with_context(|| format!("failed to read {source}"))?
    };

    let language = match lang {
        Some(l) => l.parse::<ScriptLanguage>()?,
        None => language_from_path(source),
    };

    let config = Config::load(root)?;
    let outcome = run_script(&SystemRunner, &config, root, &code, language)?;

    if json {
        print_json(&outcome)?;
    } else {
        print_captured(&outcome.stdout, &outcome.stderr);
    }

    if !outcome.succeeded {
        match outcome.exit_code {
            Some(code) => anyhow::bail!("script exited with code {code}"),
            None => anyhow::bail!("script did not finish"),
        }
    }
    Ok(())
}

fn language_from_path(source: &str) -> ScriptLanguage {
    match Path::new(source).extension().and_then(|e| e.to_str()) {
        Some("js" | "mjs" | "cjs") => ScriptLanguage::JavaScript,
        _ => ScriptLanguage::TypeScript,
    }
}
