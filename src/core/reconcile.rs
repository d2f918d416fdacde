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

//! Classifies every dependency a project declares or imports.
//!
//! Each identifier is decided in a fixed order: standard library first, then
//! local module, then the package inventory. Nothing in this module changes
//! what is installed.

use super::imports::{ImportExtractor, TextualExtractor};
use super::inventory::{Distribution, InventoryError, PackageInventory};
use super::pkgmap::PackageNameMap;
use super::report::ScanReport;
use super::requirements;
use super::stdlib::StdlibCatalog;
use super::walker::{DirectoryWalker, FsWalker};
use crate::error::Error;
use crate::util::filesystem;
use std::fmt::Display;
use std::path::Path;

/// Package marker files smaller than this many bytes hold no real code.
const PLACEHOLDER_THRESHOLD: u64 = 50;

const PACKAGE_MARKER: &str = "__init__.py";

#[derive(Debug, PartialEq, Clone)]
pub enum Classification {
    StdLib,
    LocalModule,
    Installed(Distribution),
    Missing,
}

/// How an identifier was discovered.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Discovery {
    Import,
    RequirementsLine,
}

/// Where an identifier was discovered.
#[derive(Debug, PartialEq, Clone)]
pub struct Provenance {
    file: String,
    kind: Discovery,
}

impl Provenance {
    pub fn new(file: &str, kind: Discovery) -> Self {
        Self {
            file: file.to_string(),
            kind: kind,
        }
    }

    pub fn get_kind(&self) -> &Discovery {
        &self.kind
    }
}

impl Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            Discovery::Import => write!(f, "import in {}", self.file),
            Discovery::RequirementsLine => {
                write!(f, "{} ({})", requirements::REQUIREMENTS_FILE, self.file)
            }
        }
    }
}

/// One classified identifier.
#[derive(Debug, PartialEq, Clone)]
pub struct Finding {
    identifier: String,
    classification: Classification,
    provenance: Provenance,
}

impl Finding {
    pub fn new(identifier: &str, classification: Classification, provenance: Provenance) -> Self {
        Self {
            identifier: identifier.to_string(),
            classification: classification,
            provenance: provenance,
        }
    }

    pub fn get_identifier(&self) -> &str {
        &self.identifier
    }

    pub fn get_classification(&self) -> &Classification {
        &self.classification
    }

    pub fn get_provenance(&self) -> &Provenance {
        &self.provenance
    }
}

/// Every classification made while walking a project, in walk order, along
/// with the trace of each decision.
#[derive(Debug, PartialEq, Default)]
pub struct Survey {
    trace: Vec<String>,
    findings: Vec<Finding>,
}

impl Survey {
    pub fn get_trace(&self) -> &Vec<String> {
        &self.trace
    }

    pub fn get_findings(&self) -> &Vec<Finding> {
        &self.findings
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<Finding>) {
        (self.trace, self.findings)
    }

    fn note(&mut self, msg: String) {
        self.trace.push(msg);
    }
}

/// The dependency classifier.
///
/// All tables are borrowed read-only so one set of loaded data can serve any
/// number of scans.
pub struct Reconciler<'a> {
    catalog: &'a StdlibCatalog,
    map: &'a PackageNameMap,
    inventory: &'a dyn PackageInventory,
    walker: &'a dyn DirectoryWalker,
    extractor: &'a dyn ImportExtractor,
}

impl<'a> Reconciler<'a> {
    /// Creates a reconciler that walks the real filesystem and extracts imports
    /// textually.
    pub fn new(
        catalog: &'a StdlibCatalog,
        map: &'a PackageNameMap,
        inventory: &'a dyn PackageInventory,
    ) -> Self {
        Self {
            catalog: catalog,
            map: map,
            inventory: inventory,
            walker: &FsWalker,
            extractor: &TextualExtractor,
        }
    }

    pub fn walker(mut self, w: &'a dyn DirectoryWalker) -> Self {
        self.walker = w;
        self
    }

    pub fn extractor(mut self, e: &'a dyn ImportExtractor) -> Self {
        self.extractor = e;
        self
    }

    /// Finds the missing dependencies of the project at `root`.
    pub fn scan(&self, root: &Path, recursive: bool) -> Result<ScanReport, Error> {
        Ok(ScanReport::from(self.survey(root, recursive)?))
    }

    /// Classifies every identifier found in the project at `root`.
    ///
    /// Only `root` itself is visited unless `recursive` is set. Errors only when
    /// `root` is not an existing directory; every other problem is recorded in
    /// the trace and skipped.
    pub fn survey(&self, root: &Path, recursive: bool) -> Result<Survey, Error> {
        self.survey_with(root, recursive, true)
    }

    /// Classifies only the identifiers imported by the project's source files.
    ///
    /// Requirements files are not read.
    pub fn survey_sources(&self, root: &Path, recursive: bool) -> Result<Survey, Error> {
        self.survey_with(root, recursive, false)
    }

    fn survey_with(
        &self,
        root: &Path,
        recursive: bool,
        with_requirements: bool,
    ) -> Result<Survey, Error> {
        if root.is_dir() == false {
            return Err(Error::InvalidRootPath(root.to_path_buf()));
        }
        log::debug!(
            "surveying {:?} against standard library {}",
            root,
            self.catalog.get_version()
        );
        let mut survey = Survey::default();
        for (dir, files) in self.walker.walk(root, recursive) {
            for file in files {
                let name = match file.file_name() {
                    Some(n) => n.to_string_lossy().to_string(),
                    None => continue,
                };
                if requirements::is_requirements_file(&name) == true {
                    if with_requirements == false {
                        continue;
                    }
                    self.survey_requirements(root, &file, &mut survey);
                } else if name.ends_with(".py") == true {
                    if name == PACKAGE_MARKER && Self::is_placeholder(&file) == true {
                        continue;
                    }
                    self.survey_source(root, &dir, &file, &mut survey);
                }
            }
        }
        Ok(survey)
    }

    fn is_placeholder(file: &Path) -> bool {
        match std::fs::metadata(file) {
            Ok(m) => m.len() < PLACEHOLDER_THRESHOLD,
            Err(_) => false,
        }
    }

    fn survey_requirements(&self, root: &Path, file: &Path, survey: &mut Survey) {
        let rel = filesystem::into_rel_str(file, root);
        survey.note(format!("checking requirements file {} ...", rel));
        let names = match requirements::read_file(file) {
            Ok(n) => n,
            Err(e) => {
                log::warn!("skipping requirements file {:?}: {}", file, e);
                survey.note(format!("  skipping unreadable file: {}", e));
                return;
            }
        };
        for name in names {
            let classification = match self.catalog.contains(&name) {
                true => {
                    survey.note(format!("  skipping standard library module: {}", name));
                    Classification::StdLib
                }
                false => self.reconcile(&name, survey),
            };
            survey.findings.push(Finding::new(
                &name,
                classification,
                Provenance::new(&rel, Discovery::RequirementsLine),
            ));
        }
    }

    fn survey_source(&self, root: &Path, dir: &Path, file: &Path, survey: &mut Survey) {
        let rel = filesystem::into_rel_str(file, root);
        survey.note(format!("scanning {} ...", rel));
        let record = match self.extractor.extract_file(file) {
            Ok(r) => r,
            Err(e) => {
                log::warn!("skipping source file: {}", e);
                survey.note(format!("  skipping unreadable file: {}", e));
                return;
            }
        };
        log::debug!("{} imports {} modules", rel, record.len());
        if record.is_empty() == true {
            survey.note(String::from("  no imports found"));
        }
        for identifier in &record {
            let classification = if self.catalog.contains(identifier) == true {
                survey.note(format!("  skipping standard library module: {}", identifier));
                Classification::StdLib
            } else if Self::is_local(identifier, dir, root) == true {
                survey.note(format!("  skipping local module: {}", identifier));
                Classification::LocalModule
            } else {
                self.reconcile(identifier, survey)
            };
            survey.findings.push(Finding::new(
                identifier,
                classification,
                Provenance::new(&rel, Discovery::Import),
            ));
        }
    }

    /// Checks for a module or package named `identifier` next to the scanned
    /// file or at the scan root.
    fn is_local(identifier: &str, dir: &Path, root: &Path) -> bool {
        let module = format!("{}.py", identifier);
        [dir, root]
            .iter()
            .any(|d| d.join(&module).exists() || d.join(identifier).exists())
    }

    /// Decides if a third-party `identifier` is installed.
    fn reconcile(&self, identifier: &str, survey: &mut Survey) -> Classification {
        match self.query(identifier) {
            Ok(Some(dist)) => {
                survey.note(format!("  installed: {}", dist));
                Classification::Installed(dist)
            }
            Ok(None) => {
                survey.note(format!("  missing: {}", self.map.resolve(identifier)));
                Classification::Missing
            }
            Err(e) => {
                log::warn!("failed to query {:?}: {}", identifier, e);
                survey.note(format!(
                    "  missing: {} (inventory unavailable: {})",
                    self.map.resolve(identifier),
                    e
                ));
                Classification::Missing
            }
        }
    }

    /// Looks up the mapped distribution name, then the raw identifier.
    fn query(&self, identifier: &str) -> Result<Option<Distribution>, InventoryError> {
        let mapped = self.map.resolve(identifier);
        if let Some(dist) = self.inventory.lookup(mapped)? {
            return Ok(Some(dist));
        }
        match mapped == identifier {
            true => Ok(None),
            false => self.inventory.lookup(identifier),
        }
    }
}

#[cfg(test)]
pub mod test {
    use super::*;
    use crate::core::inventory;
    use crate::core::stdlib;
    use crate::core::walker::DirFiles;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::fs;
    use std::path::PathBuf;

    /// An in-memory inventory that remembers every name it was asked about.
    pub struct FakeInventory {
        installed: HashMap<String, Distribution>,
        pub asked: RefCell<Vec<String>>,
        reachable: bool,
    }

    impl FakeInventory {
        pub fn new(installed: &[(&str, &str)]) -> Self {
            Self {
                installed: installed
                    .iter()
                    .map(|(n, v)| (inventory::normalize_name(n), Distribution::new(n, v)))
                    .collect(),
                asked: RefCell::new(Vec::new()),
                reachable: true,
            }
        }

        pub fn unreachable() -> Self {
            let mut inv = Self::new(&[]);
            inv.reachable = false;
            inv
        }
    }

    impl PackageInventory for FakeInventory {
        fn lookup(&self, name: &str) -> Result<Option<Distribution>, InventoryError> {
            self.asked.borrow_mut().push(name.to_string());
            match self.reachable {
                true => Ok(self.installed.get(&inventory::normalize_name(name)).cloned()),
                false => Err(InventoryError::InterpreterUnreachable(
                    String::from("python9"),
                    String::from("not found"),
                )),
            }
        }
    }

    /// A walker that always reports the same listing.
    struct FixedWalker(Vec<DirFiles>);

    impl DirectoryWalker for FixedWalker {
        fn walk(&self, _root: &Path, _recursive: bool) -> Vec<DirFiles> {
            self.0.clone()
        }
    }

    fn write(root: &Path, rel: &str, contents: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();
        path
    }

    fn missing_of(report: &ScanReport) -> Vec<(String, String)> {
        report
            .get_missing()
            .iter()
            .map(|(k, v)| (k.clone(), v.to_string()))
            .collect()
    }

    #[test]
    fn missing_third_party_import() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "app.py", "import requests\nimport os\n");
        let catalog = stdlib::modules_for("3.11.4");
        let map = PackageNameMap::builtin();
        let inv = FakeInventory::new(&[]);
        let report = Reconciler::new(&catalog, &map, &inv)
            .scan(dir.path(), false)
            .unwrap();
        assert_eq!(
            missing_of(&report),
            vec![(String::from("requests"), String::from("import in app.py"))]
        );
        // standard library modules never reach the inventory
        assert_eq!(inv.asked.borrow().contains(&String::from("os")), false);
    }

    #[test]
    fn installed_requirement_line() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "requirements.txt", "numpy>=1.20\n");
        let catalog = stdlib::modules_for("3.12");
        let map = PackageNameMap::builtin();
        let inv = FakeInventory::new(&[("numpy", "1.24.0")]);
        let survey = Reconciler::new(&catalog, &map, &inv)
            .survey(dir.path(), false)
            .unwrap();
        assert_eq!(
            survey.get_findings()[0].get_classification(),
            &Classification::Installed(Distribution::new("numpy", "1.24.0"))
        );
        assert_eq!(
            survey.get_findings()[0].get_provenance().get_kind(),
            &Discovery::RequirementsLine
        );
        let report = ScanReport::from(survey);
        assert_eq!(report.get_missing().is_empty(), true);
    }

    #[test]
    fn stdlib_precedes_local_module() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "main.py", "import json\nimport helpers\n");
        write(dir.path(), "json.py", "x = 1\n");
        write(dir.path(), "helpers/__init__.py", "");
        let catalog = stdlib::modules_for("3.12");
        let map = PackageNameMap::builtin();
        let inv = FakeInventory::new(&[]);
        let survey = Reconciler::new(&catalog, &map, &inv)
            .survey(dir.path(), false)
            .unwrap();
        let classes: Vec<(&str, &Classification)> = survey
            .get_findings()
            .iter()
            .map(|f| (f.get_identifier(), f.get_classification()))
            .collect();
        assert_eq!(
            classes,
            vec![
                ("helpers", &Classification::LocalModule),
                ("json", &Classification::StdLib)
            ]
        );
        assert_eq!(inv.asked.borrow().is_empty(), true);
    }

    #[test]
    fn local_module_next_to_file() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "pkg/app.py", "import sibling\nimport toplevel\nimport yaml\n");
        write(dir.path(), "pkg/sibling.py", "");
        write(dir.path(), "toplevel.py", "");
        let catalog = stdlib::modules_for("3.12");
        let map = PackageNameMap::builtin();
        let inv = FakeInventory::new(&[]);
        let report = Reconciler::new(&catalog, &map, &inv)
            .scan(dir.path(), true)
            .unwrap();
        assert_eq!(
            missing_of(&report),
            vec![(String::from("yaml"), String::from("import in pkg/app.py"))]
        );
        // the mapped name is asked first, then the raw identifier
        assert_eq!(*inv.asked.borrow(), vec!["PyYAML", "yaml"]);
    }

    #[test]
    fn mapped_distribution_is_installed() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "scrape.py", "from bs4 import BeautifulSoup\n");
        let catalog = stdlib::modules_for("3.12");
        let map = PackageNameMap::builtin();
        let inv = FakeInventory::new(&[("beautifulsoup4", "4.12.2")]);
        let report = Reconciler::new(&catalog, &map, &inv)
            .scan(dir.path(), false)
            .unwrap();
        assert_eq!(report.get_missing().is_empty(), true);
        assert_eq!(*inv.asked.borrow(), vec!["beautifulsoup4"]);
    }

    #[test]
    fn scan_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.py", "import pandas\nimport flask\n");
        write(dir.path(), "sub/b.py", "import pandas\nimport attr\n");
        write(dir.path(), "requirements.txt", "click\n");
        let catalog = stdlib::modules_for("3.10");
        let map = PackageNameMap::builtin();
        let inv = FakeInventory::new(&[("Flask", "3.0.0")]);
        let rec = Reconciler::new(&catalog, &map, &inv);
        let first = rec.scan(dir.path(), true).unwrap();
        let second = rec.scan(dir.path(), true).unwrap();
        assert_eq!(first.get_missing(), second.get_missing());
        assert_eq!(
            first.get_missing().keys().collect::<Vec<&String>>(),
            vec!["attr", "click", "pandas"]
        );
        // first discovery is kept for duplicates
        assert_eq!(
            first.get_missing().get("pandas").unwrap().to_string(),
            "import in a.py"
        );
    }

    #[test]
    fn non_recursive_ignores_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "sub/b.py", "import pandas\n");
        let catalog = stdlib::modules_for("3.12");
        let map = PackageNameMap::builtin();
        let inv = FakeInventory::new(&[]);
        let rec = Reconciler::new(&catalog, &map, &inv);
        assert_eq!(rec.scan(dir.path(), false).unwrap().get_missing().len(), 0);
        assert_eq!(rec.scan(dir.path(), true).unwrap().get_missing().len(), 1);
    }

    #[test]
    fn placeholder_package_marker_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "__init__.py", "import tiny\n");
        let catalog = stdlib::modules_for("3.12");
        let map = PackageNameMap::builtin();
        let inv = FakeInventory::new(&[]);
        let rec = Reconciler::new(&catalog, &map, &inv);
        assert_eq!(rec.survey(dir.path(), false).unwrap().get_findings().len(), 0);
        write(
            dir.path(),
            "__init__.py",
            "import tiny\n\n# this package marker has enough content to count\n",
        );
        assert_eq!(rec.survey(dir.path(), false).unwrap().get_findings().len(), 1);
    }

    #[test]
    fn requirements_lines_skip_stdlib() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "requirements-dev.txt", "# tools\npytest==7.4\nasyncio\n-r requirements.txt\n");
        let catalog = stdlib::modules_for("3.12");
        let map = PackageNameMap::builtin();
        let inv = FakeInventory::new(&[]);
        let report = Reconciler::new(&catalog, &map, &inv)
            .scan(dir.path(), false)
            .unwrap();
        assert_eq!(
            missing_of(&report),
            vec![(
                String::from("pytest"),
                String::from("requirements.txt (requirements-dev.txt)")
            )]
        );
    }

    #[test]
    fn unreachable_inventory_reports_missing() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "app.py", "import numpy\n");
        let catalog = stdlib::modules_for("3.12");
        let map = PackageNameMap::builtin();
        let inv = FakeInventory::unreachable();
        let report = Reconciler::new(&catalog, &map, &inv)
            .scan(dir.path(), false)
            .unwrap();
        assert_eq!(report.get_missing().contains_key("numpy"), true);
        assert_eq!(
            report
                .get_trace()
                .iter()
                .any(|t| t.contains("inventory unavailable")),
            true
        );
    }

    #[test]
    fn unreadable_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let good = write(dir.path(), "good.py", "import requests\n");
        let bad = write(dir.path(), "bad.py", "");
        fs::write(&bad, [0xc3, 0x28, 0x0a]).unwrap();
        let walker = FixedWalker(vec![(
            dir.path().to_path_buf(),
            vec![bad, dir.path().join("gone.py"), good],
        )]);
        let catalog = stdlib::modules_for("3.12");
        let map = PackageNameMap::builtin();
        let inv = FakeInventory::new(&[]);
        let report = Reconciler::new(&catalog, &map, &inv)
            .walker(&walker)
            .scan(dir.path(), false)
            .unwrap();
        assert_eq!(report.get_missing().len(), 1);
        assert_eq!(
            report
                .get_trace()
                .iter()
                .filter(|t| t.contains("skipping unreadable file"))
                .count(),
            2
        );
    }

    #[test]
    fn source_survey_ignores_requirements() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "requirements.txt", "numpy\n");
        write(dir.path(), "empty.py", "# nothing here\n");
        let catalog = stdlib::modules_for("3.12");
        let map = PackageNameMap::builtin();
        let inv = FakeInventory::new(&[("numpy", "1.24.0")]);
        let rec = Reconciler::new(&catalog, &map, &inv);
        let survey = rec.survey_sources(dir.path(), false).unwrap();
        assert_eq!(survey.get_findings().len(), 0);
        assert_eq!(
            survey.get_trace().iter().any(|t| t == "  no imports found"),
            true
        );
        assert_eq!(inv.asked.borrow().is_empty(), true);
        assert_eq!(rec.survey(dir.path(), false).unwrap().get_findings().len(), 1);
    }

    #[test]
    fn invalid_root_path() {
        let dir = tempfile::tempdir().unwrap();
        let file = write(dir.path(), "app.py", "import os\n");
        let catalog = stdlib::modules_for("3.12");
        let map = PackageNameMap::builtin();
        let inv = FakeInventory::new(&[]);
        let rec = Reconciler::new(&catalog, &map, &inv);
        assert_eq!(
            rec.scan(&dir.path().join("nope"), true).unwrap_err(),
            Error::InvalidRootPath(dir.path().join("nope"))
        );
        assert_eq!(
            rec.scan(&file, true).unwrap_err(),
            Error::InvalidRootPath(file.clone())
        );
    }
}
