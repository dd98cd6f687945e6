//! Grammar file loader (spec.md §6 "Grammar file loader"): the
//! loader's contract is fully specified even though general grammar
//! file I/O is an external collaborator (spec.md §1 Out of scope); the
//! console/DSL that would drive it is not implemented here.

use std::fs;
use std::path::Path;

use crate::errors::Error;

/// Reads a grammar text file. Accepts only non-empty files whose name
/// ends in `.txt` (spec.md §6).
///
/// # Errors
///
/// Returns [`Error::InvalidPath`] if the path doesn't end in `.txt`,
/// can't be read, or names an empty file.
pub fn read_grammar_file(path: impl AsRef<Path>) -> Result<String, Error> {
    let path = path.as_ref();
    let has_txt_extension = path.extension().and_then(|ext| ext.to_str()) == Some("txt");
    if !has_txt_extension {
        return Err(Error::InvalidPath(format!(
            "{} does not have a .txt extension",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path)
        .map_err(|e| Error::InvalidPath(format!("{}: {e}", path.display())))?;

    if contents.trim().is_empty() {
        return Err(Error::InvalidPath(format!("{} is empty", path.display())));
    }

    Ok(contents)
}
