use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{NGramError, Result};

/// Opens a buffered reader on `path`, or on standard input when `path` is `None`.
///
/// The file handle is owned by the returned reader and closed when it is dropped.
///
/// # Errors
/// Returns `NGramError::Path` if the file cannot be opened.
pub fn open_reader<P: AsRef<Path>>(path: Option<P>) -> Result<Box<dyn BufRead>> {
	match path {
		Some(path) => {
			let path = path.as_ref();
			let file = File::open(path).map_err(|source| NGramError::Path {
				path: path.to_path_buf(),
				source,
			})?;
			Ok(Box::new(BufReader::new(file)))
		}
		None => Ok(Box::new(io::stdin().lock())),
	}
}

/// Creates (or truncates) `path` and returns a buffered writer on it,
/// or on standard output when `path` is `None`.
///
/// Callers must `flush()` before dropping so that write errors are reported.
///
/// # Errors
/// Returns `NGramError::Path` if the file cannot be created.
pub fn create_writer<P: AsRef<Path>>(path: Option<P>) -> Result<Box<dyn Write>> {
	match path {
		Some(path) => {
			let path = path.as_ref();
			let file = File::create(path).map_err(|source| NGramError::Path {
				path: path.to_path_buf(),
				source,
			})?;
			Ok(Box::new(BufWriter::new(file)))
		}
		None => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
	}
}

/// Reads the next line into `buf` as raw bytes, without its `\n` or `\r\n`
/// terminator.
///
/// Unlike `BufRead::lines`, bytes that are not valid UTF-8 are handed to
/// the caller instead of failing the stream.
/// Returns `false` once the reader is exhausted.
pub fn read_line_bytes<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>) -> io::Result<bool> {
	buf.clear();
	if reader.read_until(b'\n', buf)? == 0 {
		return Ok(false);
	}
	if buf.last() == Some(&b'\n') {
		buf.pop();
		if buf.last() == Some(&b'\r') {
			buf.pop();
		}
	}
	Ok(true)
}
