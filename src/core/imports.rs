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

//! Line-oriented recognition of the modules a Python source file imports.
//!
//! Two statement shapes are understood:
//! - `import a.b [as c][, d ...]`
//! - `from a.b import ...` (relative imports such as `from .a import b` are local)
//!
//! Only the head of a dotted path is captured. This is a textual scan and not a
//! parser: imports built at runtime (`importlib`, `__import__`), imports written
//! inside strings, and statements continued over multiple physical lines before
//! the module name are not recognized.

use crate::util::anyerror::FileFault;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::btree_set;
use std::collections::BTreeSet;
use std::path::Path;

static IMPORT_STMT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^import\s+(.+)$").expect("valid import statement pattern")
});

static IMPORT_ITEM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)(?:\.[A-Za-z0-9_.]*)?(?:\s+as\s+[A-Za-z_][A-Za-z0-9_]*)?$")
        .expect("valid import item pattern")
});

static FROM_STMT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^from\s+([A-Za-z_][A-Za-z0-9_]*)(?:\.[A-Za-z0-9_.]*)?\s+import\b")
        .expect("valid from-import statement pattern")
});

/// The set of top-level identifiers imported by one source file.
#[derive(Debug, PartialEq, Default, Clone)]
pub struct ImportRecord(BTreeSet<String>);

impl ImportRecord {
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    pub fn insert(&mut self, identifier: &str) -> bool {
        self.0.insert(identifier.to_string())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_set::Iter<'_, String> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a ImportRecord {
    type Item = &'a String;
    type IntoIter = btree_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<T: AsRef<str>> FromIterator<T> for ImportRecord {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().map(|s| s.as_ref().to_string()).collect())
    }
}

/// Finds the imported modules within source text.
///
/// Implementations must never fail on any input text.
pub trait ImportExtractor {
    fn extract(&self, contents: &str) -> ImportRecord;

    /// Reads the file at `path` and extracts its imports.
    ///
    /// Files that cannot be read or are not valid UTF-8 return an error for the
    /// caller to report; they are never partially extracted.
    fn extract_file(&self, path: &Path) -> Result<ImportRecord, FileFault> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Ok(self.extract(&contents)),
            Err(e) => Err(FileFault(path.to_path_buf(), e)),
        }
    }
}

/// The pattern-matching extractor.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct TextualExtractor;

impl TextualExtractor {
    fn scan_statement(stmt: &str, record: &mut ImportRecord) {
        if let Some(caps) = FROM_STMT.captures(stmt) {
            record.insert(&caps[1]);
        } else if let Some(caps) = IMPORT_STMT.captures(stmt) {
            // a single statement may import several modules
            caps[1]
                .split(',')
                .filter_map(|item| IMPORT_ITEM.captures(item.trim()))
                .for_each(|item| {
                    record.insert(&item[1]);
                });
        }
    }
}

impl ImportExtractor for TextualExtractor {
    fn extract(&self, contents: &str) -> ImportRecord {
        let mut record = ImportRecord::new();
        let contents = contents.strip_prefix('\u{feff}').unwrap_or(contents);
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            // discard any trailing comment
            let code = match line.split_once('#') {
                Some((code, _)) => code,
                None => line,
            };
            code.split(';')
                .map(|stmt| stmt.trim())
                .for_each(|stmt| Self::scan_statement(stmt, &mut record));
        }
        record
    }
}
