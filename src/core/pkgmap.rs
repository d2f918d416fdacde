use super::resource;
use std::collections::HashMap;
use std::path::Path;

/// Known import names whose distribution is published under a different name.
const BUILTIN_MAP: [(&str, &str); 18] = [
    ("bs4", "beautifulsoup4"),
    ("PIL", "Pillow"),
    ("cv2", "opencv-python"),
    ("sklearn", "scikit-learn"),
    ("skimage", "scikit-image"),
    ("osgeo", "GDAL"),
    ("magic", "python-magic"),
    ("Crypto", "pycryptodome"),
    ("yaml", "PyYAML"),
    ("dateutil", "python-dateutil"),
    ("dotenv", "python-dotenv"),
    ("jwt", "PyJWT"),
    ("serial", "pyserial"),
    ("usb", "pyusb"),
    ("fitz", "PyMuPDF"),
    ("docx", "python-docx"),
    ("django", "Django"),
    ("flask", "Flask"),
];

/// Translates import identifiers into the names of their distributions.
///
/// Keys are stored lowercase so lookups ignore case; values keep their casing.
#[derive(Debug, PartialEq, Clone)]
pub struct PackageNameMap {
    inner: HashMap<String, String>,
}

impl Default for PackageNameMap {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PackageNameMap {
    /// Creates a map holding only the built-in table.
    pub fn builtin() -> Self {
        Self {
            inner: BUILTIN_MAP
                .iter()
                .map(|(k, v)| (k.to_lowercase(), v.to_string()))
                .collect(),
        }
    }

    /// Creates the built-in map overlaid with the override file at `path`, if any.
    ///
    /// A file that cannot be read or has the wrong shape is ignored with a
    /// warning; the built-in table is still returned.
    pub fn load(path: Option<&Path>) -> Self {
        let map = Self::builtin();
        match path {
            Some(p) => map.overlay_file(p),
            None => map,
        }
    }

    /// Merges the `entries` on top of the current table, overwriting on collision.
    pub fn overlay<K: AsRef<str>, V: AsRef<str>>(
        mut self,
        entries: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        entries.into_iter().for_each(|(k, v)| {
            self.inner
                .insert(k.as_ref().to_lowercase(), v.as_ref().to_string());
        });
        self
    }

    /// Merges the flat json object stored at `path` on top of the current table.
    pub fn overlay_file(self, path: &Path) -> Self {
        match resource::read_string_map(path) {
            Ok(entries) => self.overlay(entries),
            Err(e) => {
                log::warn!("failed to load package map: {}", e);
                self
            }
        }
    }

    /// Returns the distribution name for `identifier`, or the identifier itself
    /// when it is not mapped.
    pub fn resolve<'a>(&'a self, identifier: &'a str) -> &'a str {
        self.get(identifier).unwrap_or(identifier)
    }

    /// Returns the distribution name only when `identifier` is mapped.
    pub fn get(&self, identifier: &str) -> Option<&str> {
        self.inner
            .get(&identifier.to_lowercase())
            .map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
