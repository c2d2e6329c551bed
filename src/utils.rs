/*!
Defines [`memory_map`] to read dump files without copying them into memory.
*/

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use memmap2::Mmap;
use thiserror::Error;

/**
Utility function for memory-mapping a SQL file, so that the lines passed to
[`Converter::convert_line`](crate::Converter::convert_line) can borrow from
the file's contents.

Returns `None` for an empty file, which cannot be mapped.
Returns an [`Error::Io`], which displays the action that failed as well as the path and the underlying `std::io::Error`.

# Safety

Inherits unsafe annotation from [`Mmap::map`].
*/
pub unsafe fn memory_map(path: &Path) -> Result<Option<Mmap>, Error> {
    let file = File::open(path).map_err(|source| Error::from_io("open file", source, path))?;
    let len = file
        .metadata()
        .map_err(|source| Error::from_io("read metadata of file", source, path))?
        .len();
    if len == 0 {
        return Ok(None);
    }
    Mmap::map(&file)
        .map(Some)
        .map_err(|source| Error::from_io("memory map file", source, path))
}

/// The error type used by [`memory_map`].
#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to {action} at {}", path.canonicalize().as_ref().unwrap_or(path).display())]
    Io {
        action: &'static str,
        source: std::io::Error,
        path: PathBuf,
    },
}

impl Error {
    pub fn from_io<P: Into<PathBuf>>(
        action: &'static str,
        source: std::io::Error,
        path: P,
    ) -> Self {
        Error::Io {
            action,
            source,
            path: path.into(),
        }
    }
}
