use ignore::{DirEntry, WalkBuilder};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Marker file found at the root of every virtual environment.
const PYVENV_CFG: &str = "pyvenv.cfg";

/// One directory and the files directly inside it.
pub type DirFiles = (PathBuf, Vec<PathBuf>);

/// Enumerates the candidate files of a project.
///
/// The order of the returned directories (and of the files within each) must be
/// the same on every call for the same tree.
pub trait DirectoryWalker {
    fn walk(&self, root: &Path, recursive: bool) -> Vec<DirFiles>;
}

/// Walks the real filesystem.
///
/// Hidden entries, `__pycache__` directories, and any directory holding a
/// virtual environment are not entered.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct FsWalker;

impl FsWalker {
    fn is_skipped_dir(entry: &DirEntry) -> bool {
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        // never filter out the root itself
        if is_dir == false || entry.depth() == 0 {
            return false;
        }
        entry.file_name() == "__pycache__" || entry.path().join(PYVENV_CFG).exists()
    }
}

impl DirectoryWalker for FsWalker {
    fn walk(&self, root: &Path, recursive: bool) -> Vec<DirFiles> {
        let mut dirs: BTreeMap<PathBuf, Vec<PathBuf>> = BTreeMap::new();
        let walk = WalkBuilder::new(root)
            .standard_filters(false)
            .hidden(true)
            .max_depth(if recursive { None } else { Some(1) })
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(|e| Self::is_skipped_dir(e) == false)
            .build();
        for result in walk {
            match result {
                Ok(entry) => {
                    if entry.file_type().map(|t| t.is_file()).unwrap_or(false) == false {
                        continue;
                    }
                    let parent = match entry.path().parent() {
                        Some(p) => p.to_path_buf(),
                        None => continue,
                    };
                    dirs.entry(parent)
                        .or_default()
                        .push(entry.path().to_path_buf());
                }
                Err(e) => log::warn!("failed to read directory entry: {}", e),
            }
        }
        dirs.into_iter().collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;

    fn names(list: &[DirFiles], root: &Path) -> Vec<(String, Vec<String>)> {
        list.iter()
            .map(|(d, files)| {
                (
                    d.strip_prefix(root).unwrap().display().to_string(),
                    files
                        .iter()
                        .map(|f| f.file_name().unwrap().to_string_lossy().to_string())
                        .collect(),
                )
            })
            .collect()
    }

    fn sample_tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("main.py"), "import os\n").unwrap();
        fs::write(root.join("app.py"), "import sys\n").unwrap();
        fs::create_dir_all(root.join("pkg/sub")).unwrap();
        fs::write(root.join("pkg/util.py"), "").unwrap();
        fs::write(root.join("pkg/sub/deep.py"), "").unwrap();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::write(root.join(".git/config.py"), "").unwrap();
        fs::create_dir_all(root.join("__pycache__")).unwrap();
        fs::write(root.join("__pycache__/main.py"), "").unwrap();
        fs::create_dir_all(root.join("env/lib")).unwrap();
        fs::write(root.join("env/pyvenv.cfg"), "home = /usr/bin\n").unwrap();
        fs::write(root.join("env/lib/site.py"), "").unwrap();
        dir
    }

    #[test]
    fn flat_walk() {
        let dir = sample_tree();
        let list = FsWalker.walk(dir.path(), false);
        assert_eq!(
            names(&list, dir.path()),
            vec![(String::new(), vec![String::from("app.py"), String::from("main.py")])]
        );
    }

    #[test]
    fn recursive_walk() {
        let dir = sample_tree();
        let list = FsWalker.walk(dir.path(), true);
        let found = names(&list, dir.path());
        assert_eq!(found.len(), 3);
        assert_eq!(found[0].1, vec!["app.py", "main.py"]);
        assert_eq!(found[1], (String::from("pkg"), vec![String::from("util.py")]));
        assert_eq!(found[2].1, vec!["deep.py"]);
        // deterministic across calls
        assert_eq!(FsWalker.walk(dir.path(), true), list);
    }
}
