use serde::{Deserialize, Serialize};
use std::fmt;

use crate::manager::ManagerKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Install,
    InstallDev,
    Remove,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Install => "install",
            Action::InstallDev => "install_dev",
            Action::Remove => "remove",
        }
    }

    /// Map an install request to the matching action. Removal has no
    /// dev/prod distinction.
    pub fn install(dev: bool) -> Self {
        if dev {
            Action::InstallDev
        } else {
            Action::Install
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Executable plus fixed leading arguments; package names follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandTemplate {
    pub program: &'static str,
    pub flags: &'static [&'static str],
}

impl CommandTemplate {
    /// Argument vector: fixed flags, then one entry per package name.
    pub fn args<S: AsRef<str>>(&self, packages: &[S]) -> Vec<String> {
        self.flags
            .iter()
            .map(|f| f.to_string())
            .chain(packages.iter().map(|p| p.as_ref().to_string()))
            .collect()
    }
}

/// Command template for `(kind, action)`; `None` for `Unknown`.
pub fn template_for(kind: ManagerKind, action: Action) -> Option<CommandTemplate> {
    const fn t(program: &'static str, flags: &'static [&'static str]) -> CommandTemplate {
        CommandTemplate { program, flags }
    }

    let template = match (kind, action) {
        (ManagerKind::Bun, Action::Install) => t("bun", &["add"]),
        (ManagerKind::Bun, Action::InstallDev) => t("bun", &["add", "-d"]),
        (ManagerKind::Bun, Action::Remove) => t("bun", &["remove"]),
        (ManagerKind::Pnpm, Action::Install) => t("pnpm", &["add"]),
        (ManagerKind::Pnpm, Action::InstallDev) => t("pnpm", &["add", "-D"]),
        (ManagerKind::Pnpm, Action::Remove) => t("pnpm", &["remove"]),
        (ManagerKind::Yarn, Action::Install) => t("yarn", &["add"]),
        (ManagerKind::Yarn, Action::InstallDev) => t("yarn", &["add", "--dev"]),
        (ManagerKind::Yarn, Action::Remove) => t("yarn", &["remove"]),
        (ManagerKind::Npm, Action::Install) => t("npm", &["install"]),
        (ManagerKind::Npm, Action::InstallDev) => t("npm", &["install", "--save-dev"]),
        (ManagerKind::Npm, Action::Remove) => t("npm", &["uninstall"]),
        (ManagerKind::Unknown, _) => return None,
    };
    Some(template)
}
