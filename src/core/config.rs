use crate::error::{Error, LastError};
use crate::util::filesystem;
use serde_derive::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const CONFIG_FILE: &str = "config.toml";

#[derive(PartialEq, Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct General {
    python: Option<String>,
    #[serde(rename = "package-map")]
    package_map: Option<PathBuf>,
}

impl General {
    pub fn get_python(&self) -> Option<&str> {
        self.python.as_deref()
    }

    pub fn get_package_map(&self) -> Option<&PathBuf> {
        self.package_map.as_ref()
    }
}

#[derive(PartialEq, Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    general: Option<General>,
    #[serde(rename = "package-map")]
    package_map: Option<HashMap<String, String>>,
}

impl Config {
    pub fn new() -> Self {
        Self {
            general: None,
            package_map: None,
        }
    }

    /// Reads the configuration file at `path`.
    ///
    /// A file that does not exist is an empty configuration. Relative paths
    /// inside the file are resolved against the file's directory.
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        if path.exists() == false {
            return Ok(Self::new());
        }
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::ConfigInvalid(path.to_path_buf(), LastError(e.to_string())))?;
        let mut cfg = Self::from_str(&contents)
            .map_err(|e| Error::ConfigInvalid(path.to_path_buf(), LastError(e.to_string())))?;
        if let Some(base) = path.parent() {
            if let Some(g) = &mut cfg.general {
                g.package_map = g
                    .package_map
                    .take()
                    .map(|p| filesystem::resolve_rel_path(base, &p));
            }
        }
        Ok(cfg)
    }

    pub fn get_python(&self) -> Option<&str> {
        self.general.as_ref()?.get_python()
    }

    /// The override file named by `general.package-map`.
    pub fn get_package_map_file(&self) -> Option<&PathBuf> {
        self.general.as_ref()?.get_package_map()
    }

    /// The inline entries of the `[package-map]` table.
    pub fn get_package_map(&self) -> Option<&HashMap<String, String>> {
        self.package_map.as_ref()
    }
}

impl FromStr for Config {
    type Err = toml::de::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        toml::from_str(s)
    }
}
