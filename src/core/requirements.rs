use std::path::Path;

pub const REQUIREMENTS_FILE: &str = "requirements.txt";

/// Checks if the file `name` is a requirements-style manifest
/// (`requirements.txt`, `requirements-dev.txt`, `requirements_test.txt`, ...).
pub fn is_requirements_file(name: &str) -> bool {
    name == REQUIREMENTS_FILE
        || (name.starts_with("requirements")
            && name.ends_with(".txt")
            && name[REQUIREMENTS_FILE.len() - 4..].starts_with(['-', '_', '.']))
}

/// Extracts the bare distribution name from one line of a requirements file.
///
/// Returns `None` for blank lines, comments, and pip options (`-r`, `-e`, `--index-url`).
/// Version constraints, extras, environment markers, and trailing comments are
/// stripped: `requests[socks]>=2.0 ; python_version > "3.8"` yields `requests`.
pub fn parse_line(line: &str) -> Option<&str> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') || line.starts_with('-') {
        return None;
    }
    let end = line
        .find(|c: char| matches!(c, '<' | '>' | '=' | '~' | '!' | '[' | ';' | '#' | '@') || c.is_whitespace())
        .unwrap_or(line.len());
    let name = line[..end].trim();
    match name.is_empty() {
        true => None,
        false => Some(name),
    }
}

/// Reads every dependency name listed in the requirements file at `path`.
pub fn read_file(path: &Path) -> std::io::Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)?;
    Ok(contents
        .lines()
        .filter_map(parse_line)
        .map(|s| s.to_string())
        .collect())
}
