//! Capability-based file helpers built on `cap-std` and `camino`.

use std::io;

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};

/// Open a UTF-8 path for reading.
pub(crate) fn open_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Whether `path` names a regular file.
///
/// A missing file surfaces as an [`io::ErrorKind::NotFound`] error so callers
/// can tell it apart from a directory.
pub(crate) fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "path has no file name"))?;
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    dir.metadata(name).map(|meta| meta.is_file())
}

/// Create the directory that will hold `path`, if needed.
pub(crate) fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    let (base, relative) = split_root(parent);
    if relative.as_str().is_empty() {
        return Ok(());
    }
    fs_utf8::Dir::open_ambient_dir(base, ambient_authority())?.create_dir_all(&relative)
}

/// Split a directory path into an ambient base and a path relative to it.
fn split_root(parent: &Utf8Path) -> (Utf8PathBuf, Utf8PathBuf) {
    let mut base = Utf8PathBuf::from(".");
    let mut relative = Utf8PathBuf::new();
    for component in parent.components() {
        match component {
            Utf8Component::Prefix(prefix) => base = Utf8PathBuf::from(prefix.as_str()),
            Utf8Component::RootDir => base.push(std::path::MAIN_SEPARATOR_STR),
            Utf8Component::CurDir => {}
            // cap-std refuses `..` below the base, so leading ones join it.
            Utf8Component::ParentDir if relative.as_str().is_empty() => base.push(".."),
            other => relative.push(other.as_str()),
        }
    }
    (base, relative)
}
