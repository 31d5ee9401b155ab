//! Traits for reading and writing localization dictionaries.

use std::{
    fs,
    io::{self, BufRead, Cursor, Write},
    path::Path,
};

use crate::error::Error;

/// A trait for parsing and writing one localization file.
///
/// # Example
///
/// ```rust,no_run
/// use locsync::{Tree, traits::Parser};
/// let tree = Tree::read_from("locales/en.json")?;
/// tree.write_to("locales/en_copy.json")?;
/// Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait Parser {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error>
    where
        Self: Sized;

    /// Parse from file path.
    ///
    /// A missing file is [`Error::NotFound`] and content that is not UTF-8 is
    /// [`Error::Encoding`].
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error>
    where
        Self: Sized,
    {
        let text = read_text(path.as_ref())?;
        Self::from_str(&text)
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, writer: W) -> Result<(), Error>;

    /// Write to file path, replacing it atomically.
    fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let mut buffer = Vec::new();
        self.to_writer(&mut buffer)?;
        write_atomic(path.as_ref(), &buffer)
    }

    /// Parse from a string.
    fn from_str(s: &str) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Self::from_reader(Cursor::new(s))
    }

    /// Parse from bytes.
    fn from_bytes(bytes: &[u8]) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Self::from_reader(Cursor::new(bytes))
    }
}

/// Reads a whole file as UTF-8 text.
pub fn read_text(path: &Path) -> Result<String, Error> {
    let bytes = fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => Error::NotFound(path.to_path_buf()),
        _ => Error::Io(e),
    })?;
    String::from_utf8(bytes).map_err(|source| Error::Encoding {
        path: path.to_path_buf(),
        source,
    })
}

/// Replaces `path` with `contents` so readers see either the old or the new file.
///
/// The data goes to a temporary file in the same directory first, then is
/// renamed over the destination. An existing file's permissions are kept.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), Error> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(contents)?;
    file.as_file().sync_all()?;
    if let Ok(metadata) = fs::metadata(path) {
        fs::set_permissions(file.path(), metadata.permissions())?;
    }
    file.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}
