use colored::Colorize;
use std::{fmt::Display, path::PathBuf};

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("path {0:?} is not a valid directory to scan")]
    InvalidRootPath(PathBuf),
    #[error("failed to write {0:?}: {1}")]
    ManifestWrite(PathBuf, LastError),
    #[error("no external dependencies were found to write into {0:?}{1}")]
    NoExternalDependencies(PathBuf, Hint),
    #[error("found {0} missing dependencies{1}")]
    MissingDependencies(usize, Hint),
    #[error("cannot {0} {1:?} because it is a standard library module")]
    StdlibNotInstallable(&'static str, String),
    #[error("failed to install {0} of {1} dependencies")]
    InstallFailed(usize, usize),
    #[error("failed to install {0:?}: {1}")]
    PackageInstall(String, LastError),
    #[error("failed to upgrade {0:?}: {1}")]
    PackageUpgrade(String, LastError),
    #[error("no installed package named {0:?}{1}")]
    PackageNotFound(String, Hint),
    #[error("environment has broken requirements:\n{0}")]
    BrokenRequirements(String),
    #[error("failed to query the package inventory: {0}")]
    InventoryUnavailable(LastError),
    #[error("failed to parse configuration file {0:?}: {1}")]
    ConfigInvalid(PathBuf, LastError),
    #[error("failed to detect the user's home directory{0}")]
    HomeNotFound(Hint),
}

#[derive(Debug, PartialEq)]
pub struct LastError(pub String);

impl Display for LastError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Error::lowerize(self.0.to_string()))
    }
}

impl Error {
    pub fn lowerize(s: String) -> String {
        // get the first word
        let first_word = match s.split_whitespace().next() {
            Some(w) => w,
            None => return s,
        };
        // retain punctuation if the first word is all-caps and longer than 1 character
        if first_word.len() > 1 && first_word.chars().any(|c| c.is_ascii_lowercase()) == false {
            s
        } else {
            s.char_indices()
                .map(|(i, c)| if i == 0 { c.to_ascii_lowercase() } else { c })
                .collect()
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum Hint {
    InstallMissing,
    IncludeRecursive,
    InstalledOnly,
    ListInstalled(Option<String>),
    SetHome,
}

impl Display for Hint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            Self::InstallMissing => {
                "use `pydep install` to install the missing dependencies".to_string()
            }
            Self::IncludeRecursive => {
                "use \"--recursive\" to also scan the subdirectories".to_string()
            }
            Self::InstalledOnly => {
                "only installed packages are written; install the missing dependencies first"
                    .to_string()
            }
            Self::ListInstalled(Some(name)) => format!("did you mean {:?}?", name),
            Self::ListInstalled(None) => {
                "use `pydep list` to see the installed packages".to_string()
            }
            Self::SetHome => "set the PYDEP_HOME environment variable".to_string(),
        };
        write!(f, "\n\n{}: {}", "hint".green(), Error::lowerize(message))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn lowerize_first_letter() {
        assert_eq!(
            Error::lowerize(String::from("Permission denied")),
            String::from("permission denied")
        );
        // acronyms keep their casing
        assert_eq!(
            Error::lowerize(String::from("PEP 508 violation")),
            String::from("PEP 508 violation")
        );
        assert_eq!(Error::lowerize(String::new()), String::new());
    }
}
