use super::config::Config;
use super::pkgmap::PackageNameMap;
use super::python::{self, PythonContext};
use crate::error::{Error, Hint};
use crate::util::environment::{self, Environment};
use std::path::{Path, PathBuf};

/// Everything a command needs to know about the user's setup.
pub struct Context {
    home_path: PathBuf,
    config: Config,
    python: String,
    package_map: PackageNameMap,
    python_context: Option<PythonContext>,
    verbose: bool,
}

impl Context {
    pub fn new() -> Context {
        Context {
            home_path: PathBuf::new(),
            config: Config::new(),
            python: environment::DEFAULT_PYTHON.to_string(),
            package_map: PackageNameMap::builtin(),
            python_context: None,
            verbose: false,
        }
    }

    pub fn retain_options(mut self, verbose: bool) -> Context {
        self.verbose = verbose;
        self
    }

    /// Sets the home directory. By default this is `$HOME/.pydep`, unless set
    /// by the environment variable `key`.
    ///
    /// The directory is never created here; a missing home simply has no
    /// configuration.
    pub fn home(mut self, key: &str) -> Result<Context, Error> {
        self.home_path = match Environment::read(key) {
            Some(s) => PathBuf::from(s),
            None => match home::home_dir() {
                Some(p) => p.join(".pydep"),
                None => return Err(Error::HomeNotFound(Hint::SetHome)),
            },
        };
        Ok(self)
    }

    /// Reads the configuration file `s` found directly under the home directory.
    pub fn settings(mut self, s: &str) -> Result<Context, Error> {
        self.config = Config::from_file(&self.home_path.join(s))?;
        Ok(self)
    }

    /// Selects the interpreter to work with.
    ///
    /// The command-line value wins over the environment variable `key`, which
    /// wins over the configuration file, which wins over the platform default.
    pub fn python(mut self, arg: Option<&str>, key: &str) -> Context {
        self.python = match arg {
            Some(p) => p.to_string(),
            None => match Environment::read(key) {
                Some(p) => p,
                None => self
                    .config
                    .get_python()
                    .unwrap_or(environment::DEFAULT_PYTHON)
                    .to_string(),
            },
        };
        self
    }

    /// Builds the package-name map: the built-in table, then the configuration's
    /// `[package-map]` entries, then the override file (`arg` before the
    /// configured file).
    pub fn package_map(mut self, arg: Option<&Path>) -> Context {
        let mut map = PackageNameMap::builtin();
        if let Some(entries) = self.config.get_package_map() {
            map = map.overlay(entries.iter());
        }
        let file = match arg {
            Some(p) => Some(p.to_path_buf()),
            None => self.config.get_package_map_file().cloned(),
        };
        if let Some(f) = file {
            map = map.overlay_file(&f);
        }
        self.package_map = map;
        self
    }

    /// Queries the selected interpreter for its version and environment.
    pub fn resolve_python(mut self) -> Context {
        self.python_context = Some(PythonContext::resolve(&self.python));
        self
    }

    pub fn get_home_path(&self) -> &PathBuf {
        &self.home_path
    }

    pub fn get_config(&self) -> &Config {
        &self.config
    }

    pub fn get_python(&self) -> &str {
        &self.python
    }

    pub fn get_package_map(&self) -> &PackageNameMap {
        &self.package_map
    }

    /// The interpreter's context, or its fallback if it was never resolved.
    pub fn get_python_context(&self) -> PythonContext {
        match &self.python_context {
            Some(p) => p.clone(),
            None => PythonContext::fallback(&self.python),
        }
    }

    /// The interpreter a project command works with.
    ///
    /// With `venv_root`, the virtual environment at `<venv_root>/.venv` is used
    /// (and created when absent). If it cannot be created, the selected
    /// interpreter is used instead.
    pub fn target_python(&self, venv_root: Option<&Path>) -> PythonContext {
        let root = match venv_root {
            Some(r) => r,
            None => return self.get_python_context(),
        };
        match python::create_venv(&self.python, root) {
            Ok(exe) => {
                let ctx = PythonContext::resolve(&exe.to_string_lossy());
                println!("info: switched to {}", ctx);
                ctx
            }
            Err(e) => {
                log::warn!(
                    "failed to create a virtual environment: {}; continuing with {:?}",
                    e,
                    self.python
                );
                self.get_python_context()
            }
        }
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}
