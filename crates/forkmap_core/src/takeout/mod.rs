//! Takeout export input: file handle, CSV parsing and place resolution.

use std::io;
use std::path::Path;

pub mod parser;
pub mod resolver;

/// An uploaded or on-disk Takeout CSV: its file name and full text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TakeoutFile {
    pub name: String,
    pub content: String,
}

impl TakeoutFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Reads a file from disk, keeping only its file name.
    ///
    /// Bytes that are not UTF-8 are replaced with U+FFFD rather than
    /// failing the whole file.
    pub fn read(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let content = String::from_utf8_lossy(&std::fs::read(path)?).into_owned();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { name, content })
    }

    /// Base name without its last extension, cut to `max_chars` characters.
    pub fn list_name(&self, max_chars: usize) -> String {
        derive_list_name(&self.name, max_chars)
    }
}

/// `"Want to go.csv"` -> `"Want to go"`, truncated to `max_chars`.
pub fn derive_list_name(file_name: &str, max_chars: usize) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or_default();
    stem.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::{derive_list_name, TakeoutFile};
    use std::io::Write;

    #[test]
    fn list_name_drops_extension_and_truncates() {
        assert_eq!(derive_list_name("Want to go.csv", 20), "Want to go");
        assert_eq!(
            derive_list_name("Favourite places in Lisbon.csv", 20),
            "Favourite places in "
        );
        assert_eq!(derive_list_name("archive.tar.gz", 20), "archive.tar");
        assert_eq!(derive_list_name("no_extension", 20), "no_extension");
        assert_eq!(derive_list_name("", 20), "");
    }

    #[test]
    fn list_name_counts_characters() {
        assert_eq!(derive_list_name("Café Crème Brûlée.csv", 6), "Café C");
    }

    #[test]
    fn read_keeps_file_name_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Tapas.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"Title,Note,URL,Tags,Comment\n\n").unwrap();

        let takeout = TakeoutFile::read(&path).unwrap();
        assert_eq!(takeout.name, "Tapas.csv");
        assert_eq!(takeout.list_name(20), "Tapas");
        assert!(takeout.content.starts_with("Title"));
    }
}
