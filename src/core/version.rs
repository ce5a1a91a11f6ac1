//! Version extraction from a single-assignment declaration file.
//!
//! The file holds one statement such as `__version__ = "2.1.0"`. The
//! right-hand side must be a scalar literal: a quoted string, an integer or
//! a decimal number.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors extracting the package version.
#[derive(Debug, Error)]
pub enum VersionError {
    #[error("failed to read version file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed version declaration in {}: {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },
}

/// Read `path` and return the literal assigned in it.
pub fn extract_version(path: &Path) -> Result<String, VersionError> {
    let contents = std::fs::read_to_string(path).map_err(|source| VersionError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    parse_declaration(&contents).map_err(|reason| VersionError::Malformed {
        path: path.to_path_buf(),
        reason,
    })
}

/// Parse the text of a declaration and evaluate its right-hand side.
pub fn parse_declaration(contents: &str) -> Result<String, String> {
    let contents = contents.trim();
    let (_, rhs) = contents
        .rsplit_once('=')
        .ok_or_else(|| "expected an assignment".to_string())?;

    parse_scalar(rhs.trim())
}

fn parse_scalar(literal: &str) -> Result<String, String> {
    if literal.is_empty() {
        return Err("missing value after `=`".to_string());
    }

    let first = literal.chars().next().unwrap_or_default();
    if first == '"' || first == '\'' {
        let inner = literal[1..]
            .strip_suffix(first)
            .ok_or_else(|| format!("unterminated string literal {}", literal))?;
        if inner.contains(first) {
            return Err(format!("unexpected quote in {}", literal));
        }
        return Ok(inner.to_string());
    }

    if is_number(literal) {
        return Ok(literal.to_string());
    }

    Err(format!("`{}` is not a scalar literal", literal))
}

fn is_number(s: &str) -> bool {
    let digits = s.strip_prefix(['-', '+']).unwrap_or(s);
    let mut parts = digits.splitn(2, '.');
    let whole = parts.next().unwrap_or_default();
    let frac = parts.next();

    let all_digits = |p: &str| p.chars().all(|c| c.is_ascii_digit() || c == '_');
    match frac {
        None => !whole.is_empty() && all_digits(whole),
        Some(frac) => {
            (!whole.is_empty() || !frac.is_empty()) && all_digits(whole) && all_digits(frac)
        }
    }
}
