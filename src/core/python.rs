use crate::util::anyerror::{AnyError, Fault};
use crate::util::environment::{Environment, VENV_DIR};
use std::fmt::Display;
use std::path::{Path, PathBuf};

/// Version assumed when the interpreter cannot be queried.
pub const FALLBACK_VERSION: &str = "3.12";

/// Prints the version, prefix, and base prefix of the running interpreter.
const PROBE_SCRIPT: &str =
    "import sys; print(sys.version.split()[0]); print(sys.prefix); print(sys.base_prefix)";

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum EnvironmentKind {
    Local,
    Virtual,
    Unknown,
}

impl Display for EnvironmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Virtual => write!(f, "virtual"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// What is known about the interpreter dependencies are resolved against.
#[derive(Debug, PartialEq, Clone)]
pub struct PythonContext {
    executable: String,
    version: String,
    kind: EnvironmentKind,
    prefix: String,
}

impl PythonContext {
    /// Queries the interpreter `python` for its context.
    ///
    /// An interpreter that cannot be run yields the fallback version and an
    /// unknown environment kind.
    pub fn resolve(python: &str) -> Self {
        let output = std::process::Command::new(python)
            .args(["-c", PROBE_SCRIPT])
            .output();
        let probed = match output {
            Ok(out) if out.status.success() => {
                Self::from_probe(python, &String::from_utf8_lossy(&out.stdout))
            }
            Ok(out) => {
                log::warn!(
                    "interpreter {:?} failed to report its version: {}",
                    python,
                    String::from_utf8_lossy(&out.stderr).trim()
                );
                None
            }
            Err(e) => {
                log::warn!("failed to run interpreter {:?}: {}", python, e);
                None
            }
        };
        probed.unwrap_or_else(|| Self::fallback(python))
    }

    /// Builds the context assumed for an interpreter that could not be queried.
    pub fn fallback(python: &str) -> Self {
        Self {
            executable: python.to_string(),
            version: FALLBACK_VERSION.to_string(),
            kind: EnvironmentKind::Unknown,
            prefix: String::new(),
        }
    }

    /// Interprets the three lines written by the probe script.
    fn from_probe(python: &str, stdout: &str) -> Option<Self> {
        let mut lines = stdout.lines().map(|l| l.trim());
        let version = lines.next().filter(|v| v.is_empty() == false)?;
        let prefix = lines.next()?;
        let base_prefix = lines.next()?;
        Some(Self {
            executable: python.to_string(),
            version: version.to_string(),
            kind: match prefix == base_prefix {
                true => EnvironmentKind::Local,
                false => EnvironmentKind::Virtual,
            },
            prefix: prefix.to_string(),
        })
    }

    pub fn get_executable(&self) -> &str {
        &self.executable
    }

    pub fn get_version(&self) -> &str {
        &self.version
    }

    pub fn get_kind(&self) -> &EnvironmentKind {
        &self.kind
    }

    pub fn get_prefix(&self) -> &str {
        &self.prefix
    }
}

impl Display for PythonContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "python {} ({} environment)", self.version, self.kind)
    }
}

/// Creates a virtual environment at `<root>/.venv` using `python`, unless one
/// already exists there.
///
/// Returns the interpreter inside the environment.
pub fn create_venv(python: &str, root: &Path) -> Result<PathBuf, Fault> {
    let venv = root.join(VENV_DIR);
    let exe = Environment::venv_python(&venv);
    if venv.exists() == true {
        log::info!("using existing virtual environment {:?}", venv);
        return Ok(exe);
    }
    println!("info: creating virtual environment at {:?} ...", venv);
    let status = std::process::Command::new(python)
        .args(["-m", "venv"])
        .arg(&venv)
        .status()?;
    match status.code() {
        Some(0) => (),
        Some(num) => return Err(AnyError(format!("venv creation exited with error code: {}", num)))?,
        None => return Err(AnyError(format!("venv creation terminated by signal")))?,
    }
    match exe.exists() {
        true => Ok(exe),
        false => Err(AnyError(format!(
            "virtual environment has no interpreter at {:?}",
            exe
        )))?,
    }
}
