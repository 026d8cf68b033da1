//! Extra instructions appended to user input.

use std::path::Path;

use crate::error::{Error, Result};

/// Read an instruction file, trimming surrounding whitespace.
pub fn load_instruction_from_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "Loading instruction file");

    let content = std::fs::read_to_string(path).map_err(|source| Error::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(content.trim().to_string())
}

/// Append `instruction` to `input` in the form the assistant expects.
///
/// An empty instruction leaves the input untouched.
pub fn with_instruction(input: &str, instruction: &str) -> String {
    if instruction.is_empty() {
        input.to_string()
    } else {
        format!("{input}\n\nAdditional instruction: {instruction}")
    }
}
