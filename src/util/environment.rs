//
//  Copyright (C) 2022-2024  Chase Ruskin
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.
//

pub const PYDEP_HOME: &str = "PYDEP_HOME";
pub const PYDEP_PYTHON: &str = "PYDEP_PYTHON";
pub const PYDEP_LOG: &str = "PYDEP_LOG";
pub const NO_COLOR: &str = "NO_COLOR";

/// Name of the virtual environment directory created within a project.
pub const VENV_DIR: &str = ".venv";

/// Default interpreter command when none is configured.
#[cfg(windows)]
pub const DEFAULT_PYTHON: &str = "python";
#[cfg(not(windows))]
pub const DEFAULT_PYTHON: &str = "python3";

pub struct Environment;

impl Environment {
    /// Reads the value of `key`, treating an unset or empty variable as `None`.
    pub fn read(key: &str) -> Option<String> {
        match std::env::var(key) {
            Ok(v) if v.trim().is_empty() == false => Some(v),
            _ => None,
        }
    }

    /// Returns the path to the interpreter inside a virtual environment rooted
    /// at `venv`.
    pub fn venv_python(venv: &std::path::Path) -> std::path::PathBuf {
        if cfg!(windows) {
            venv.join("Scripts").join("python.exe")
        } else {
            venv.join("bin").join("python")
        }
    }
}
