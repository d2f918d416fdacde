use super::reconcile::{Classification, Discovery, Finding, Provenance, Reconciler, Survey};
use crate::error::{Error, Hint, LastError};
use crate::util::filesystem;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// First line of every generated manifest.
pub const MANIFEST_HEADER: &str = "# Generated by pydep";

/// The outcome of a scan: its trace and the dependencies that are not installed.
#[derive(Debug, PartialEq, Default)]
pub struct ScanReport {
    trace: Vec<String>,
    missing: BTreeMap<String, Provenance>,
}

impl ScanReport {
    /// Records `finding` if it is missing.
    ///
    /// The first provenance recorded for an identifier is kept.
    pub fn absorb(&mut self, finding: &Finding) {
        if finding.get_classification() != &Classification::Missing {
            return;
        }
        if self.missing.contains_key(finding.get_identifier()) == false {
            self.missing.insert(
                finding.get_identifier().to_string(),
                finding.get_provenance().clone(),
            );
        }
    }

    pub fn get_trace(&self) -> &Vec<String> {
        &self.trace
    }

    /// Missing identifiers (as imported, not mapped) and where each was found.
    pub fn get_missing(&self) -> &BTreeMap<String, Provenance> {
        &self.missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

impl From<Survey> for ScanReport {
    fn from(value: Survey) -> Self {
        let (trace, findings) = value.into_parts();
        let mut report = Self {
            trace: trace,
            missing: BTreeMap::new(),
        };
        findings.iter().for_each(|f| report.absorb(f));
        match report.missing.len() {
            0 => report
                .trace
                .push(String::from("all detected dependencies are installed")),
            n => report
                .trace
                .push(format!("found {} missing dependencies", n)),
        }
        report
    }
}

/// The pinned requirements of every installed dependency of a project.
#[derive(Debug, PartialEq, Default)]
pub struct Manifest {
    trace: Vec<String>,
    entries: BTreeSet<String>,
}

impl Manifest {
    pub fn get_trace(&self) -> &Vec<String> {
        &self.trace
    }

    /// The specifier lines, sorted and without duplicates.
    pub fn get_entries(&self) -> &BTreeSet<String> {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Formats the manifest file's contents.
    pub fn render(&self) -> String {
        let mut text = format!("{}\n", MANIFEST_HEADER);
        self.entries.iter().for_each(|e| {
            text.push_str(e);
            text.push('\n');
        });
        text
    }

    /// Writes the manifest to `dest` completely or not at all.
    pub fn write(&self, dest: &Path) -> Result<(), Error> {
        filesystem::write_atomic(dest, &self.render())
            .map_err(|e| Error::ManifestWrite(dest.to_path_buf(), LastError(e.to_string())))
    }
}

impl From<Survey> for Manifest {
    fn from(value: Survey) -> Self {
        let (trace, findings) = value.into_parts();
        Self {
            trace: trace,
            entries: findings
                .iter()
                .filter(|f| f.get_provenance().get_kind() == &Discovery::Import)
                .filter_map(|f| match f.get_classification() {
                    Classification::Installed(dist) => Some(dist.to_pinned()),
                    _ => None,
                })
                .collect(),
        }
    }
}

/// Collects the installed dependencies imported by the project at `root` and
/// writes them to `dest`.
///
/// Existing requirements files are not consulted, so a dependency that is no
/// longer imported is dropped. Nothing is written when no installed
/// third-party dependency is found.
pub fn generate(
    reconciler: &Reconciler,
    root: &Path,
    recursive: bool,
    dest: &Path,
) -> Result<Manifest, Error> {
    let mut manifest = Manifest::from(reconciler.survey_sources(root, recursive)?);
    if manifest.is_empty() == true {
        return Err(Error::NoExternalDependencies(
            dest.to_path_buf(),
            match recursive {
                true => Hint::InstalledOnly,
                false => Hint::IncludeRecursive,
            },
        ));
    }
    manifest.write(dest)?;
    manifest.trace.push(format!(
        "wrote {} dependencies to {}",
        manifest.entries.len(),
        filesystem::into_rel_str(dest, root)
    ));
    Ok(manifest)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::pkgmap::PackageNameMap;
    use crate::core::reconcile::test::FakeInventory;
    use crate::core::stdlib;
    use std::fs;

    #[test]
    fn manifest_from_installed_imports() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("app.py"),
            "import requests\nimport os\nimport yaml\nimport missing_pkg\n",
        )
        .unwrap();
        fs::write(dir.path().join("requirements.txt"), "requests>=2\n").unwrap();
        let catalog = stdlib::modules_for("3.12");
        let map = PackageNameMap::builtin();
        let inv = FakeInventory::new(&[("requests", "2.31.0"), ("PyYAML", "6.0.1")]);
        let rec = Reconciler::new(&catalog, &map, &inv);
        let dest = dir.path().join("requirements.txt");
        let manifest = generate(&rec, dir.path(), false, &dest).unwrap();
        assert_eq!(
            manifest.get_entries().iter().collect::<Vec<&String>>(),
            vec!["PyYAML==6.0.1", "requests==2.31.0"]
        );
        assert_eq!(
            fs::read_to_string(&dest).unwrap(),
            "# Generated by pydep\nPyYAML==6.0.1\nrequests==2.31.0\n"
        );
    }

    #[test]
    fn no_manifest_without_installed_dependencies() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("main.py"), "import os\nimport helper\n").unwrap();
        fs::write(dir.path().join("helper.py"), "import sys\n").unwrap();
        let catalog = stdlib::modules_for("3.12");
        let map = PackageNameMap::builtin();
        let inv = FakeInventory::new(&[("requests", "2.31.0")]);
        let rec = Reconciler::new(&catalog, &map, &inv);
        let dest = dir.path().join("requirements.txt");
        let result = generate(&rec, dir.path(), true, &dest);
        assert_eq!(
            result.unwrap_err(),
            Error::NoExternalDependencies(dest.clone(), Hint::InstalledOnly)
        );
        assert_eq!(dest.exists(), false);
    }

    #[test]
    fn requirements_lines_are_not_manifest_entries() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("main.py"), "import os\nimport helper\n").unwrap();
        fs::write(dir.path().join("helper.py"), "import sys\n").unwrap();
        fs::write(dir.path().join("requirements.txt"), "numpy\n").unwrap();
        let catalog = stdlib::modules_for("3.12");
        let map = PackageNameMap::builtin();
        let inv = FakeInventory::new(&[("numpy", "1.24.0")]);
        let rec = Reconciler::new(&catalog, &map, &inv);
        let dest = dir.path().join("requirements.txt");
        let result = generate(&rec, dir.path(), false, &dest);
        assert_eq!(
            result.unwrap_err(),
            Error::NoExternalDependencies(dest.clone(), Hint::IncludeRecursive)
        );
        assert_eq!(fs::read_to_string(&dest).unwrap(), "numpy\n");
    }

    #[test]
    fn dropped_import_is_not_pinned_again() {
        let dir = tempfile::tempdir().unwrap();
        let app = dir.path().join("app.py");
        fs::write(&app, "import requests\nimport numpy\n").unwrap();
        let catalog = stdlib::modules_for("3.12");
        let map = PackageNameMap::builtin();
        let inv = FakeInventory::new(&[("requests", "2.31.0"), ("numpy", "1.24.0")]);
        let rec = Reconciler::new(&catalog, &map, &inv);
        let dest = dir.path().join("requirements.txt");
        generate(&rec, dir.path(), false, &dest).unwrap();
        assert_eq!(
            fs::read_to_string(&dest).unwrap(),
            "# Generated by pydep\nnumpy==1.24.0\nrequests==2.31.0\n"
        );

        fs::write(&app, "import requests\n").unwrap();
        generate(&rec, dir.path(), false, &dest).unwrap();
        assert_eq!(
            fs::read_to_string(&dest).unwrap(),
            "# Generated by pydep\nrequests==2.31.0\n"
        );
    }

    #[test]
    fn failed_write_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("app.py"), "import requests\n").unwrap();
        let catalog = stdlib::modules_for("3.12");
        let map = PackageNameMap::builtin();
        let inv = FakeInventory::new(&[("requests", "2.31.0")]);
        let rec = Reconciler::new(&catalog, &map, &inv);
        let dest = dir.path().join("out").join("requirements.txt");
        let result = generate(&rec, dir.path(), false, &dest);
        assert_eq!(matches!(result, Err(Error::ManifestWrite(_, _))), true);
        assert_eq!(dest.exists(), false);
    }

    #[test]
    fn first_provenance_wins() {
        let mut report = ScanReport::default();
        let first = Finding::new(
            "pandas",
            Classification::Missing,
            Provenance::new("a.py", Discovery::Import),
        );
        let second = Finding::new(
            "pandas",
            Classification::Missing,
            Provenance::new("requirements.txt", Discovery::RequirementsLine),
        );
        report.absorb(&first);
        report.absorb(&second);
        report.absorb(&Finding::new(
            "os",
            Classification::StdLib,
            Provenance::new("a.py", Discovery::Import),
        ));
        assert_eq!(report.get_missing().len(), 1);
        assert_eq!(
            report.get_missing().get("pandas").unwrap().to_string(),
            "import in a.py"
        );
    }
}
