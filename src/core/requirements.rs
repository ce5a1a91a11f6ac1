//! Install requirements from a newline-separated list.

use std::path::Path;

use anyhow::Result;

use crate::util::fs::read_to_string_if_exists;

/// Read requirement strings from `path`.
///
/// A missing file means no extra dependencies. Blank lines and `#`
/// comments are skipped.
pub fn read_requirements(path: &Path) -> Result<Vec<String>> {
    let Some(contents) = read_to_string_if_exists(path)? else {
        tracing::debug!("no requirements file at {}", path.display());
        return Ok(Vec::new());
    };

    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}
