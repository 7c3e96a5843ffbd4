use crate::prelude::*;

use std::io::BufRead;
use std::path::Path;

use super::Error;

/// Read file as string
pub fn read_file(path: impl AsRef<Path>) -> Result<String, Error> {
    let path = path.as_ref();
    verboseln!("reading '{}'", path.display());
    std::fs::read_to_string(path)
        .change_context_lazy(|| Error::ReadFile(path.display().to_string()))
}

/// Read file as string, or return None if the file doesn't exist
pub fn read_file_if_exists(path: impl AsRef<Path>) -> Result<Option<String>, Error> {
    let path = path.as_ref();
    if !path.exists() {
        verboseln!("'{}' not found", path.display());
        return Ok(None);
    }
    read_file(path).map(Some)
}

/// Write content to a file
pub fn write_file(path: impl AsRef<Path>, content: impl AsRef<[u8]>) -> Result<(), Error> {
    let path = path.as_ref();
    std::fs::write(path, content)
        .change_context_lazy(|| Error::WriteFile(path.display().to_string()))
}

/// Read all lines from a stream, without line endings
///
/// Invalid UTF-8 is replaced with U+FFFD. Only I/O errors fail.
/// `name` identifies the stream in the error message
pub fn read_lines(reader: impl BufRead, name: &'static str) -> Result<Vec<String>, Error> {
    reader
        .split(b'\n')
        .map(|line| -> std::io::Result<String> {
            let mut line = line?;
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            Ok(String::from_utf8_lossy(&line).into_owned())
        })
        .collect::<std::io::Result<Vec<_>>>()
        .change_context(Error::ReadStream(name))
}
