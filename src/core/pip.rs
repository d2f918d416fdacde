use super::inventory::{self, Distribution, InstallError, InventoryError};
use super::inventory::{PackageInventory, PackageManager};
use std::cell::RefCell;
use std::collections::HashMap;
use std::process::Output;

/// Maximum number of package names passed to a single `pip show` call.
const SHOW_BATCH: usize = 64;

type Listing = Result<HashMap<String, Distribution>, InventoryError>;

/// The package manager of an interpreter, driven through `python -m pip`
/// subprocesses.
///
/// The installed set is read once with `pip list` and answered from memory
/// until the next install or upgrade.
pub struct Pip {
    python: String,
    verbose: bool,
    installed: RefCell<Option<Listing>>,
}

impl Pip {
    /// Creates a `Pip` struct for the interpreter found on the path as `python`.
    pub fn new() -> Self {
        Self {
            python: String::from("python"),
            verbose: false,
            installed: RefCell::new(None),
        }
    }

    /// Sets the interpreter used to run pip.
    pub fn command(mut self, python: &str) -> Self {
        self.python = python.to_string();
        self
    }

    /// Displays every pip command before it runs.
    pub fn verbose(mut self, v: bool) -> Self {
        self.verbose = v;
        self
    }

    pub fn get_python(&self) -> &str {
        &self.python
    }

    /// Runs `python -m pip <args>` and captures its output.
    fn run(&self, args: &[&str]) -> Result<Output, InventoryError> {
        if self.verbose == true {
            println!("info: running: {} -m pip {}", self.python, args.join(" "));
        }
        log::debug!("running {} -m pip {}", self.python, args.join(" "));
        std::process::Command::new(&self.python)
            .args(["-m", "pip", "--disable-pip-version-check", "--no-input"])
            .args(args)
            .output()
            .map_err(|e| InventoryError::InterpreterUnreachable(self.python.clone(), e.to_string()))
    }

    /// Runs pip and requires it to exit successfully, returning its stdout.
    fn run_ok(&self, args: &[&str]) -> Result<String, InventoryError> {
        let output = self.run(args)?;
        match output.status.code() {
            Some(0) => Ok(String::from_utf8_lossy(&output.stdout).to_string()),
            Some(num) => Err(InventoryError::ExitCode(
                num,
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            )),
            None => Err(InventoryError::Terminated),
        }
    }

    fn parse_listing(stdout: &str) -> Result<Vec<Distribution>, InventoryError> {
        serde_json::from_str(stdout.trim()).map_err(|e| InventoryError::BadOutput(e.to_string()))
    }

    fn read_installed(&self) -> Listing {
        let stdout = self.run_ok(&["list", "--format=json"])?;
        Ok(Self::parse_listing(&stdout)?
            .into_iter()
            .map(|d| (inventory::normalize_name(d.get_name()), d))
            .collect())
    }

    /// Forgets the remembered installed set.
    fn invalidate(&self) {
        self.installed.borrow_mut().take();
    }

    /// Sorts the text a failed install printed into the kind of failure.
    fn classify_failure(stderr: String) -> InstallError {
        let has = |pats: &[&str]| pats.iter().any(|p| stderr.contains(p));
        if has(&["Microsoft Visual C++", "error: command 'gcc' failed", "Failed building wheel"]) {
            InstallError::BuildToolsRequired(stderr)
        } else if has(&["No matching distribution found", "Could not find a version that satisfies"]) {
            InstallError::NoMatchingDistribution(stderr)
        } else if has(&["Permission denied", "Access is denied", "externally-managed-environment"]) {
            InstallError::PermissionDenied(stderr)
        } else if has(&["Connection aborted", "Failed to establish a new connection", "Temporary failure in name resolution"]) {
            InstallError::Network(stderr)
        } else {
            InstallError::Other(stderr.lines().last().unwrap_or("unknown error").trim().to_string())
        }
    }

    fn install_with(&self, args: &[&str]) -> Result<(), InstallError> {
        let output = self.run(args)?;
        self.invalidate();
        match output.status.code() {
            Some(0) => Ok(()),
            Some(_) => Err(Self::classify_failure(
                String::from_utf8_lossy(&output.stderr).to_string(),
            )),
            None => Err(InventoryError::Terminated.into()),
        }
    }

    /// Parses the blocks of `pip show` output into (name, requirements) pairs.
    fn parse_show(stdout: &str) -> Vec<(String, Vec<String>)> {
        let mut result = Vec::new();
        let mut name: Option<String> = None;
        let mut requires = Vec::new();
        for line in stdout.lines().chain(std::iter::once("---")) {
            if line.trim() == "---" {
                if let Some(n) = name.take() {
                    result.push((n, std::mem::take(&mut requires)));
                }
                requires.clear();
            } else if let Some(n) = line.strip_prefix("Name:") {
                name = Some(n.trim().to_string());
            } else if let Some(r) = line.strip_prefix("Requires:") {
                requires = r
                    .split(',')
                    .map(|s| s.trim())
                    .filter(|s| s.is_empty() == false)
                    .map(|s| s.to_string())
                    .collect();
            }
        }
        result
    }
}

impl PackageInventory for Pip {
    fn lookup(&self, name: &str) -> Result<Option<Distribution>, InventoryError> {
        if self.installed.borrow().is_none() {
            let listing = self.read_installed();
            *self.installed.borrow_mut() = Some(listing);
        }
        match self.installed.borrow().as_ref() {
            Some(Ok(map)) => Ok(map.get(&inventory::normalize_name(name)).cloned()),
            Some(Err(e)) => Err(e.clone()),
            None => Ok(None),
        }
    }
}

impl PackageManager for Pip {
    fn install(&self, spec: &str) -> Result<(), InstallError> {
        self.install_with(&["install", spec])
    }

    fn upgrade(&self, name: &str) -> Result<(), InstallError> {
        self.install_with(&["install", "--upgrade", name])
    }

    fn list(&self, outdated: bool) -> Result<Vec<Distribution>, InventoryError> {
        let stdout = match outdated {
            true => self.run_ok(&["list", "--format=json", "--outdated"])?,
            false => self.run_ok(&["list", "--format=json"])?,
        };
        Self::parse_listing(&stdout)
    }

    fn check(&self) -> Result<Vec<String>, InventoryError> {
        let output = self.run(&["check"])?;
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        match output.status.code() {
            Some(0) => Ok(Vec::new()),
            // pip reports broken requirements on stdout with a failing exit code
            Some(num) => match stdout.trim().is_empty() {
                true => Err(InventoryError::ExitCode(
                    num,
                    String::from_utf8_lossy(&output.stderr).trim().to_string(),
                )),
                false => Ok(stdout.lines().map(|l| l.to_string()).collect()),
            },
            None => Err(InventoryError::Terminated),
        }
    }

    fn requirements_of(&self, names: &[String]) -> Result<Vec<(String, Vec<String>)>, InventoryError> {
        let mut result = Vec::with_capacity(names.len());
        for batch in names.chunks(SHOW_BATCH) {
            let mut args = vec!["show"];
            args.extend(batch.iter().map(|s| s.as_str()));
            let output = self.run(&args)?;
            if output.status.code().is_none() {
                return Err(InventoryError::Terminated);
            }
            // unknown names only produce a warning; keep whatever was found
            result.append(&mut Self::parse_show(&String::from_utf8_lossy(&output.stdout)));
        }
        Ok(result)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn unreachable_interpreter_is_not_installed() {
        let pip = Pip::new().command("pydep-definitely-not-a-python-interpreter");
        let result = pip.lookup("requests");
        assert_eq!(
            matches!(result, Err(InventoryError::InterpreterUnreachable(_, _))),
            true
        );
        // the failure is remembered rather than retried
        assert_eq!(pip.is_installed("numpy").is_err(), true);
        assert_eq!(
            matches!(pip.install("numpy"), Err(InstallError::Inventory(_))),
            true
        );
    }

    #[test]
    fn failure_kinds() {
        let e = Pip::classify_failure(String::from(
            "ERROR: No matching distribution found for notapkg",
        ));
        assert_eq!(matches!(e, InstallError::NoMatchingDistribution(_)), true);
        let e = Pip::classify_failure(String::from(
            "ERROR: Could not install packages due to an OSError: [Errno 13] Permission denied",
        ));
        assert_eq!(matches!(e, InstallError::PermissionDenied(_)), true);
        let e = Pip::classify_failure(String::from(
            "error: Microsoft Visual C++ 14.0 or greater is required.",
        ));
        assert_eq!(matches!(e, InstallError::BuildToolsRequired(_)), true);
        let e = Pip::classify_failure(String::from(
            "WARNING: Retrying\nFailed to establish a new connection",
        ));
        assert_eq!(matches!(e, InstallError::Network(_)), true);
        let e = Pip::classify_failure(String::from("first\nERROR: something else\n"));
        assert_eq!(e, InstallError::Other(String::from("ERROR: something else")));
    }

    #[test]
    fn show_blocks() {
        let text = "\
Name: requests
Version: 2.31.0
Requires: certifi, charset-normalizer, idna, urllib3
Required-by:
---
Name: idna
Version: 3.4
Requires:
Required-by: requests
";
        assert_eq!(
            Pip::parse_show(text),
            vec![
                (
                    String::from("requests"),
                    vec![
                        String::from("certifi"),
                        String::from("charset-normalizer"),
                        String::from("idna"),
                        String::from("urllib3")
                    ]
                ),
                (String::from("idna"), vec![]),
            ]
        );
    }

    #[test]
    fn listing_output() {
        let list = Pip::parse_listing("[{\"name\": \"numpy\", \"version\": \"1.24.0\"}]\n").unwrap();
        assert_eq!(list, vec![Distribution::new("numpy", "1.24.0")]);
        assert_eq!(Pip::parse_listing("not json").is_err(), true);
    }
}
