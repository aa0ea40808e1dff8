//! This module provides the `ProgramLoader` struct, responsible for loading machine
//! descriptions from files and strings.

use crate::parser::{parse_description, Parsed};
use crate::types::{MachineError, MAX_DESCRIPTION_SIZE};
use std::fs;
use std::path::Path;

/// `ProgramLoader` is a utility struct for loading machine descriptions.
pub struct ProgramLoader;

impl ProgramLoader {
    /// Loads a single machine description from the specified file path.
    ///
    /// # Arguments
    ///
    /// * `path` - A reference to the `Path` of the description file to load.
    ///
    /// # Returns
    ///
    /// * `Ok(Parsed)` if the file is successfully read and parsed.
    /// * `Err(MachineError::FileError)` if the file cannot be read or is too large.
    /// * Any parser error if the file content is not a valid description.
    pub fn load_program(path: &Path) -> Result<Parsed, MachineError> {
        let metadata = fs::metadata(path).map_err(|e| {
            MachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        if metadata.len() > MAX_DESCRIPTION_SIZE as u64 {
            return Err(MachineError::FileError(format!(
                "File {} is {} bytes, the limit is {} bytes",
                path.display(),
                metadata.len(),
                MAX_DESCRIPTION_SIZE
            )));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            MachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        tracing::debug!(path = %path.display(), bytes = content.len(), "loaded description");

        Self::load_program_from_string(&content)
    }

    /// Loads a single machine description from the provided string content.
    pub fn load_program_from_string(content: &str) -> Result<Parsed, MachineError> {
        let parsed = parse_description(content)?;

        tracing::debug!(
            states = parsed.program.states.len(),
            diagnostics = parsed.diagnostics.len(),
            "parsed description"
        );

        Ok(parsed)
    }
}
