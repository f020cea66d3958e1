//! JavaScript runtime detection for ad-hoc scripts.
//!
//! # Runtime priority
//! 1. bun: fastest startup, runs TypeScript directly
//! 2. deno: built-in TypeScript
//! 3. node: plain `node` for JavaScript, `npx --yes tsx` for TypeScript

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::{DevkitError, Result};
use crate::script::ScriptLanguage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Runtime {
    Bun,
    Deno,
    Node,
}

impl Runtime {
    pub fn name(&self) -> &'static str {
        match self {
            Runtime::Bun => "bun",
            Runtime::Deno => "deno",
            Runtime::Node => "node",
        }
    }

    /// Program and arguments that execute `script`.
    pub fn command(&self, script: &Path, language: ScriptLanguage) -> (String, Vec<String>) {
        let script = script.to_string_lossy().into_owned();
        match (self, language) {
            (Runtime::Bun, _) => ("bun".into(), vec!["run".into(), script]),
            (Runtime::Deno, _) => (
                "deno".into(),
                vec![
                    "run".into(),
                    "--allow-read".into(),
                    "--allow-env".into(),
                    script,
                ],
            ),
            (Runtime::Node, ScriptLanguage::JavaScript) => ("node".into(), vec![script]),
            (Runtime::Node, ScriptLanguage::TypeScript) => (
                "npx".into(),
                vec!["--yes".into(), "tsx".into(), script],
            ),
        }
    }
}

impl fmt::Display for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const PRIORITY: [Runtime; 3] = [Runtime::Bun, Runtime::Deno, Runtime::Node];

/// First runtime in priority order for which `available` holds.
pub fn detect_runtime_with(available: impl Fn(&str) -> bool) -> Option<Runtime> {
    PRIORITY.into_iter().find(|r| available(r.name()))
}

/// The configured runtime wins; otherwise fall back to detection.
pub fn select_runtime(
    configured: Option<Runtime>,
    available: impl Fn(&str) -> bool,
) -> Result<Runtime> {
    configured
        .or_else(|| detect_runtime_with(available))
        .ok_or(DevkitError::NoScriptRuntime)
}

pub fn on_path(program: &str) -> bool {
    which::which(program).is_ok()
}
