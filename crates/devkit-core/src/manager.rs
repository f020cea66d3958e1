//! Package manager detection from lockfiles.
//!
//! Several lockfiles can coexist while a project migrates between managers,
//! so rules are checked in a fixed priority order and the first hit wins:
//!
//! 1. `bun.lock`          → bun
//! 2. `pnpm-lock.yaml`    → pnpm
//! 3. `yarn.lock`         → yarn
//! 4. `package-lock.json` → npm
//!
//! Only the project root itself is inspected; there is no upward search.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::debug;

use crate::fs::Filesystem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManagerKind {
    Pnpm,
    Yarn,
    Npm,
    Bun,
    Unknown,
}

impl ManagerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ManagerKind::Pnpm => "pnpm",
            ManagerKind::Yarn => "yarn",
            ManagerKind::Npm => "npm",
            ManagerKind::Bun => "bun",
            ManagerKind::Unknown => "unknown",
        }
    }

    /// Lockfile that selects this manager, if any.
    pub fn marker(&self) -> Option<&'static str> {
        DETECTION_RULES
            .iter()
            .find(|r| r.kind == *self)
            .map(|r| r.marker)
    }
}

impl fmt::Display for ManagerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectionRule {
    pub marker: &'static str,
    pub kind: ManagerKind,
}

/// Highest priority first.
pub const DETECTION_RULES: [DetectionRule; 4] = [
    DetectionRule {
        marker: "bun.lock",
        kind: ManagerKind::Bun,
    },
    DetectionRule {
        marker: "pnpm-lock.yaml",
        kind: ManagerKind::Pnpm,
    },
    DetectionRule {
        marker: "yarn.lock",
        kind: ManagerKind::Yarn,
    },
    DetectionRule {
        marker: "package-lock.json",
        kind: ManagerKind::Npm,
    },
];

/// Marker file names in priority order, for messages.
pub const MARKER_FILES: [&str; 4] = [
    DETECTION_RULES[0].marker,
    DETECTION_RULES[1].marker,
    DETECTION_RULES[2].marker,
    DETECTION_RULES[3].marker,
];

/// Return the manager governing `root`, or `Unknown` when no marker exists.
pub fn detect(fs: &dyn Filesystem, root: &Path) -> ManagerKind {
    let kind = DETECTION_RULES
        .iter()
        .find(|rule| fs.exists(&root.join(rule.marker)))
        .map(|rule| rule.kind)
        .unwrap_or(ManagerKind::Unknown);
    debug!(root = %root.display(), manager = %kind, "detected package manager");
    kind
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::OsFilesystem;
    use tempfile::TempDir;

    fn project_with(markers: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for m in markers {
            std::fs::write(dir.path().join(m), "").unwrap();
        }
        dir
    }

    #[test]
    fn single_marker_selects_its_manager() {
        for rule in DETECTION_RULES {
            let dir = project_with(&[rule.marker]);
            assert_eq!(
                detect(&OsFilesystem, dir.path()),
                rule.kind,
                "marker {}",
                rule.marker
            );
        }
    }

    #[test]
    fn highest_priority_marker_wins_for_every_pair() {
        for (i, high) in DETECTION_RULES.iter().enumerate() {
            for low in &DETECTION_RULES[i + 1..] {
                let dir = project_with(&[low.marker, high.marker]);
                assert_eq!(
                    detect(&OsFilesystem, dir.path()),
                    high.kind,
                    "{} + {}",
                    high.marker,
                    low.marker
                );
            }
        }
    }

    #[test]
    fn all_markers_select_bun() {
        let dir = project_with(&MARKER_FILES);
        assert_eq!(detect(&OsFilesystem, dir.path()), ManagerKind::Bun);
    }

    #[test]
    fn no_marker_is_unknown() {
        let dir = project_with(&["package.json", "bun.lockb.bak"]);
        assert_eq!(detect(&OsFilesystem, dir.path()), ManagerKind::Unknown);
    }

    #[test]
    fn markers_in_parent_are_ignored() {
        let dir = project_with(&["yarn.lock"]);
        let child = dir.path().join("packages/web");
        std::fs::create_dir_all(&child).unwrap();
        assert_eq!(detect(&OsFilesystem, &child), ManagerKind::Unknown);
    }

    #[test]
    fn detect_is_repeatable() {
        let dir = project_with(&["pnpm-lock.yaml", "package-lock.json"]);
        let first = detect(&OsFilesystem, dir.path());
        let second = detect(&OsFilesystem, dir.path());
        assert_eq!(first, second);
        assert_eq!(first, ManagerKind::Pnpm);
    }

    #[test]
    fn marker_files_follow_rule_order() {
        let from_rules: Vec<&str> = DETECTION_RULES.iter().map(|r| r.marker).collect();
        assert_eq!(from_rules, MARKER_FILES.to_vec());
        assert_eq!(ManagerKind::Yarn.marker(), Some("yarn.lock"));
        assert_eq!(ManagerKind::Unknown.marker(), None);
    }

    #[test]
    fn kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ManagerKind::Pnpm).unwrap(), "\"pnpm\"");
        assert_eq!(ManagerKind::Unknown.to_string(), "unknown");
    }
}
