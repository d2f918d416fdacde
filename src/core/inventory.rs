//! The contracts between the engine and the package manager of the target
//! interpreter.
//!
//! Every failure is returned as a structured error kind so that no caller
//! needs to inspect the package manager's text output.

use serde_derive::{Deserialize, Serialize};
use std::fmt::Display;

/// An installed distribution.
#[derive(Debug, PartialEq, Eq, Clone, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Distribution {
    name: String,
    version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    latest_version: Option<String>,
}

impl Distribution {
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
            latest_version: None,
        }
    }

    pub fn latest(mut self, version: Option<&str>) -> Self {
        self.latest_version = version.map(|s| s.to_string());
        self
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_version(&self) -> &str {
        &self.version
    }

    pub fn get_latest_version(&self) -> Option<&str> {
        self.latest_version.as_deref()
    }

    /// Formats as a requirement pinned to the installed version.
    pub fn to_pinned(&self) -> String {
        match self.version.is_empty() {
            true => self.name.clone(),
            false => format!("{}=={}", self.name, self.version),
        }
    }
}

impl Display for Distribution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_pinned())?;
        if let Some(latest) = &self.latest_version {
            write!(f, " (latest: {})", latest)?;
        }
        Ok(())
    }
}

/// Normalizes a distribution name for comparison: lowercase with every run of
/// `-`, `_`, and `.` collapsed into a single `-`.
pub fn normalize_name(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut in_sep = false;
    for c in name.trim().chars() {
        if matches!(c, '-' | '_' | '.') {
            if in_sep == false {
                result.push('-');
            }
            in_sep = true;
        } else {
            result.push(c.to_ascii_lowercase());
            in_sep = false;
        }
    }
    result
}

#[derive(Debug, PartialEq, Clone, thiserror::Error)]
pub enum InventoryError {
    #[error("python interpreter {0:?} could not be started: {1}")]
    InterpreterUnreachable(String, String),
    #[error("package manager exited with error code {0}: {1}")]
    ExitCode(i32, String),
    #[error("package manager was terminated by signal")]
    Terminated,
    #[error("failed to understand package manager output: {0}")]
    BadOutput(String),
}

/// Answers queries about what is installed under one interpreter.
///
/// A query that cannot be answered returns an [InventoryError]; callers treat
/// that as "not installed" and report it.
pub trait PackageInventory {
    /// Finds the installed distribution published as `name`.
    fn lookup(&self, name: &str) -> Result<Option<Distribution>, InventoryError>;

    fn is_installed(&self, name: &str) -> Result<bool, InventoryError> {
        Ok(self.lookup(name)?.is_some())
    }

    fn installed_version(&self, name: &str) -> Result<Option<String>, InventoryError> {
        Ok(self.lookup(name)?.map(|d| d.get_version().to_string()))
    }
}

/// Why a package manager failed to install a requirement.
#[derive(Debug, PartialEq, Clone, thiserror::Error)]
pub enum InstallError {
    #[error("a C/C++ build toolchain is required to build this package")]
    BuildToolsRequired(String),
    #[error("no matching distribution was found")]
    NoMatchingDistribution(String),
    #[error("permission denied")]
    PermissionDenied(String),
    #[error("network connection failed")]
    Network(String),
    #[error("{0}")]
    Other(String),
    #[error(transparent)]
    Inventory(#[from] InventoryError),
}

impl InstallError {
    /// A suggestion for resolving the failure, if one is known.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::BuildToolsRequired(_) => Some("install a C/C++ compiler toolchain (on windows: Microsoft C++ Build Tools) and retry"),
            Self::NoMatchingDistribution(_) => Some("the name may be a standard library module, misspelled, or not published on the package index; try a \"--package-map\" entry"),
            Self::PermissionDenied(_) => Some("check the permissions of the environment, or use a virtual environment with \"--create-venv\""),
            Self::Network(_) => Some("check your internet connection"),
            Self::Other(_) | Self::Inventory(_) => None,
        }
    }

    /// The full output the package manager reported, if any.
    pub fn details(&self) -> Option<&str> {
        match self {
            Self::BuildToolsRequired(s)
            | Self::NoMatchingDistribution(s)
            | Self::PermissionDenied(s)
            | Self::Network(s) => Some(s.as_str()),
            Self::Other(_) | Self::Inventory(_) => None,
        }
    }
}

/// Changes what is installed under one interpreter.
pub trait PackageManager: PackageInventory {
    /// Installs the requirement `spec` (`name` or `name==version`).
    fn install(&self, spec: &str) -> Result<(), InstallError>;

    /// Upgrades `name` to its latest version.
    fn upgrade(&self, name: &str) -> Result<(), InstallError>;

    /// Lists every installed distribution, or only the outdated ones.
    fn list(&self, outdated: bool) -> Result<Vec<Distribution>, InventoryError>;

    /// Verifies installed distributions have compatible requirements.
    ///
    /// Returns the problems found (empty when consistent).
    fn check(&self) -> Result<Vec<String>, InventoryError>;

    /// Lists the names each of the given installed distributions requires.
    fn requirements_of(&self, names: &[String]) -> Result<Vec<(String, Vec<String>)>, InventoryError>;
}
