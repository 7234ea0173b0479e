//! Table loaders.
//!
//! A loader either produces a [`Table`](crate::core::Table) or fails with a
//! load error; validation never starts on a partially read file.

mod csv;

pub use csv::{CsvOptions, CsvSource};

use crate::prelude::*;
use std::path::PathBuf;

/// Expands glob patterns into the regular files they match.
///
/// Patterns without wildcards match themselves when the file exists. Matches
/// keep pattern order, then the lexical order `glob` yields within a pattern.
pub(crate) fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    use glob::glob;

    let mut paths = Vec::new();
    for pattern in patterns {
        let matches = glob(pattern).map_err(|e| {
            CaseGuardError::Configuration(format!("Invalid glob pattern '{pattern}': {e}"))
        })?;

        for entry in matches {
            let path = entry.map_err(|e| CaseGuardError::Io(e.into_error()))?;
            if path.is_file() {
                paths.push(path);
            }
        }
    }

    if paths.is_empty() {
        return Err(CaseGuardError::data_source(
            "file",
            format!("No files found matching glob patterns: {}", patterns.join(", ")),
        ));
    }

    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_expand_globs() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.csv"), "Action\n").unwrap();
        fs::write(dir.path().join("a.csv"), "Action\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::create_dir(dir.path().join("nested.csv")).unwrap();

        let pattern = dir.path().join("*.csv").to_string_lossy().into_owned();
        let paths = expand_globs(&[pattern]).unwrap();
        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["a.csv", "b.csv"]);
    }

    #[test]
    fn test_expand_globs_no_match() {
        let dir = TempDir::new().unwrap();
        let pattern = dir.path().join("*.csv").to_string_lossy().into_owned();

        let err = expand_globs(&[pattern]).unwrap_err();
        assert!(matches!(err, CaseGuardError::DataSource { .. }));
        assert!(err.is_load_error());
    }

    #[test]
    fn test_expand_globs_invalid_pattern() {
        let err = expand_globs(&["[".to_string()]).unwrap_err();
        assert!(matches!(err, CaseGuardError::Configuration(_)));
    }
}
