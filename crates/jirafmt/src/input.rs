//! Document input from files or standard input

use std::io::Read;
use std::path::Path;

use crate::prelude::*;

/// Read a whole document from `path`, or from stdin when `path` is `None` or `-`
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => {
            log::debug!("Reading input from {}", path.display());
            std::fs::read_to_string(path).map_err(|e| {
                Error::Read {
                    path: path.display().to_string(),
                    message: e.to_string(),
                }
                .into()
            })
        }
        _ => {
            log::debug!("Reading input from stdin");
            read_source(std::io::stdin().lock(), "stdin")
        }
    }
}

/// Drain a reader into a string
fn read_source<R: Read>(mut reader: R, name: &str) -> Result<String> {
    let mut buffer = String::new();
    reader.read_to_string(&mut buffer).map_err(|e| Error::Read {
        path: name.to_string(),
        message: e.to_string(),
    })?;

    Ok(buffer)
}
