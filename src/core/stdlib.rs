use super::resource::{self, Bundled, CatalogSource, ResourceError};
use once_cell::sync::OnceCell;
use std::collections::HashSet;
use std::sync::Arc;

/// The interpreter versions with a known catalog, oldest to newest.
pub const SUPPORTED_VERSIONS: [&str; 5] = ["3.8", "3.9", "3.10", "3.11", "3.12"];

/// The catalog used whenever the requested version is unknown or fails to load.
pub const NEWEST_VERSION: &str = SUPPORTED_VERSIONS[SUPPORTED_VERSIONS.len() - 1];

/// The set of module names shipped with one interpreter version.
#[derive(Debug, PartialEq)]
pub struct StdlibCatalog {
    version: String,
    modules: HashSet<String>,
}

impl StdlibCatalog {
    /// Constructs a catalog from a list of `modules`, lowercasing every name.
    pub fn new<T: AsRef<str>>(version: &str, modules: &[T]) -> Self {
        Self {
            version: version.to_string(),
            modules: modules.iter().map(|m| m.as_ref().to_lowercase()).collect(),
        }
    }

    /// Checks if `name` is a standard library module.
    ///
    /// The lookup is case-insensitive.
    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains(&name.to_lowercase())
    }

    /// The version tag of the catalog that is actually in use (after fallback).
    pub fn get_version(&self) -> &str {
        &self.version
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.modules.iter()
    }

    /// Loads the catalog for `version` from `source` without caching.
    ///
    /// Never fails: an unknown version or a catalog that does not load is
    /// replaced by the newest supported catalog, and a warning is logged.
    pub fn load(version: &str, source: &impl CatalogSource) -> Self {
        let tag = match select_tag(version) {
            Some(t) => t,
            None => {
                log::warn!(
                    "no standard library catalog for python {:?}; using {}",
                    version,
                    NEWEST_VERSION
                );
                NEWEST_VERSION
            }
        };
        match Self::try_load(tag, source) {
            Ok(c) => c,
            Err(e) if tag != NEWEST_VERSION => {
                log::warn!("{}; using the catalog for {}", e, NEWEST_VERSION);
                Self::load_newest(source)
            }
            Err(e) => {
                log::warn!("{}", e);
                Self::new::<&str>(NEWEST_VERSION, &[])
            }
        }
    }

    fn load_newest(source: &impl CatalogSource) -> Self {
        match Self::try_load(NEWEST_VERSION, source) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("{}", e);
                Self::new::<&str>(NEWEST_VERSION, &[])
            }
        }
    }

    fn try_load(tag: &str, source: &impl CatalogSource) -> Result<Self, ResourceError> {
        let name = format!("standard library catalog {}", tag);
        let text = source.catalog_text(tag)?;
        let modules = resource::parse_string_array(&name, &text)?;
        Ok(Self::new(tag, &modules))
    }
}

/// Truncates a free-form `version` to its major.minor components and finds the
/// matching supported tag.
///
/// "3.11.2" selects "3.11"; "3.1" does not select "3.10".
pub fn select_tag(version: &str) -> Option<&'static str> {
    let mut parts = version.trim().split('.');
    let major = parts.next()?;
    let minor = parts.next()?;
    // drop any pre-release suffix glued onto the minor number (ex: "12rc1")
    let minor: String = minor.chars().take_while(|c| c.is_ascii_digit()).collect();
    let key = format!("{}.{}", major, minor);
    SUPPORTED_VERSIONS.into_iter().find(|v| *v == key)
}

static BUNDLED_CATALOGS: [OnceCell<Arc<StdlibCatalog>>; SUPPORTED_VERSIONS.len()] =
    [OnceCell::new(), OnceCell::new(), OnceCell::new(), OnceCell::new(), OnceCell::new()];

/// Returns the bundled catalog for `version`.
///
/// Each catalog is parsed at most once per process and shared afterward.
pub fn modules_for(version: &str) -> Arc<StdlibCatalog> {
    let tag = match select_tag(version) {
        Some(t) => t,
        None => {
            log::warn!(
                "no standard library catalog for python {:?}; using {}",
                version,
                NEWEST_VERSION
            );
            NEWEST_VERSION
        }
    };
    let slot = match SUPPORTED_VERSIONS.iter().position(|v| *v == tag) {
        Some(i) => i,
        None => SUPPORTED_VERSIONS.len() - 1,
    };
    BUNDLED_CATALOGS[slot]
        .get_or_init(|| Arc::new(StdlibCatalog::load(tag, &Bundled)))
        .clone()
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashMap;

    struct FakeSource(HashMap<&'static str, &'static str>);

    impl CatalogSource for FakeSource {
        fn catalog_text(&self, tag: &str) -> Result<String, ResourceError> {
            match self.0.get(tag) {
                Some(t) => Ok(t.to_string()),
                None => Err(ResourceError::Missing(tag.to_string())),
            }
        }
    }

    #[test]
    fn version_prefix_selection() {
        assert_eq!(select_tag("3.11.2"), Some("3.11"));
        assert_eq!(select_tag("3.8"), Some("3.8"));
        assert_eq!(select_tag("3.12.0rc1"), Some("3.12"));
        assert_eq!(select_tag("3.10"), Some("3.10"));
        assert_eq!(select_tag("3.1"), None);
        assert_eq!(select_tag("3.7.0"), None);
        assert_eq!(select_tag("3"), None);
        assert_eq!(select_tag(""), None);
    }

    #[test]
    fn supported_versions_are_non_empty() {
        for v in SUPPORTED_VERSIONS {
            let catalog = modules_for(v);
            assert_eq!(catalog.is_empty(), false);
            assert_eq!(catalog.get_version(), v);
            assert_eq!(catalog.contains("os"), true);
            assert_eq!(catalog.contains("sys"), true);
        }
    }

    #[test]
    fn version_specific_modules() {
        let c38 = modules_for("3.8.10");
        assert_eq!(c38.contains("tomllib"), false);
        assert_eq!(c38.contains("zoneinfo"), false);
        assert_eq!(c38.contains("distutils"), true);
        let c311 = modules_for("3.11.0");
        assert_eq!(c311.contains("tomllib"), true);
        assert_eq!(c311.contains("zoneinfo"), true);
        let c312 = modules_for("3.12.1");
        assert_eq!(c312.contains("distutils"), false);
    }

    #[test]
    fn unknown_version_uses_newest() {
        let fallback = modules_for("3.7.0");
        let newest = modules_for(NEWEST_VERSION);
        assert_eq!(fallback.get_version(), NEWEST_VERSION);
        assert_eq!(fallback.len(), newest.len());
        assert_eq!(fallback.contains("tomllib"), true);
        let garbage = StdlibCatalog::load("not a version", &Bundled);
        assert_eq!(garbage.get_version(), NEWEST_VERSION);
    }

    #[test]
    fn membership_is_case_insensitive() {
        let catalog = StdlibCatalog::new("3.12", &["Tkinter", "os"]);
        assert_eq!(catalog.contains("tkinter"), true);
        assert_eq!(catalog.contains("OS"), true);
        assert_eq!(catalog.iter().all(|m| m.to_lowercase() == *m), true);
    }

    #[test]
    fn malformed_catalog_falls_back() {
        let source = FakeSource(HashMap::from([
            ("3.9", r#"{"not": "an array"}"#),
            ("3.12", r#"["os", "tomllib"]"#),
        ]));
        let catalog = StdlibCatalog::load("3.9.1", &source);
        assert_eq!(catalog.get_version(), "3.12");
        assert_eq!(catalog.contains("tomllib"), true);
        // a missing resource behaves the same
        let catalog = StdlibCatalog::load("3.10.4", &source);
        assert_eq!(catalog.get_version(), "3.12");
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn broken_newest_catalog_is_empty() {
        let source = FakeSource(HashMap::new());
        let catalog = StdlibCatalog::load("3.12", &source);
        assert_eq!(catalog.is_empty(), true);
    }
}
