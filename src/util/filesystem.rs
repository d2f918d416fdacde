use std::io::Write;
use std::path::{Path, PathBuf};

/// Resolves a relative path into a full path if given relative to some `root` path.
///
/// Absolute paths are returned unmodified.
pub fn resolve_rel_path(root: &Path, s: &Path) -> PathBuf {
    if s.is_relative() == true {
        root.join(s)
    } else {
        s.to_path_buf()
    }
}

/// Displays `path` relative to `root` when it lives underneath it, otherwise
/// displays the whole path.
pub fn into_rel_str(path: &Path, root: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    // always use forward slashes for consistent reporting
    rel.display().to_string().replace('\\', "/")
}

/// Writes `contents` to `dest` all at once.
///
/// The bytes are first written to a temporary file in the same directory as
/// `dest`, which is only renamed onto `dest` once it is completely written. On
/// any failure the temporary file is removed and `dest` is left untouched.
pub fn write_atomic(dest: &Path, contents: &str) -> std::io::Result<()> {
    let dir = match dest.parent() {
        Some(p) if p.as_os_str().is_empty() == false => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(dest).map_err(|e| e.error)?;
    Ok(())
}
