//! Environment placeholder substitution and file loading.
//!
//! Paths in network configuration (crypto roots, credential templates, the
//! configuration files themselves) may embed `${VARNAME}` placeholders. They are
//! resolved against the process environment at read time; a placeholder whose
//! variable is unset, or which is never closed, is left as literal text.

use crate::error::{Error, Result};
use std::path::Path;
use tracing::warn;

const PLACEHOLDER_PREFIX: &str = "${";
const PLACEHOLDER_SUFFIX: char = '}';

/// Replaces every `${VARNAME}` in `text` with the value of the environment
/// variable `VARNAME`.
///
/// # Example
///
/// ```rust
/// std::env::set_var("FABCONNECT_DOC_ROOT", "/opt/crypto");
/// assert_eq!(corelib::env::subst("${FABCONNECT_DOC_ROOT}/org1"), "/opt/crypto/org1");
/// assert_eq!(corelib::env::subst("${FABCONNECT_DOC_UNSET}/org1"), "${FABCONNECT_DOC_UNSET}/org1");
/// ```
pub fn subst(text: &str) -> String {
    subst_with(text, |name| std::env::var(name).ok())
}

/// Same as [`subst`] but resolves names through `lookup`.
pub fn subst_with<F>(text: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut pieces = text.split(PLACEHOLDER_PREFIX);
    let mut out = String::with_capacity(text.len());

    // text before the first placeholder is always kept
    if let Some(head) = pieces.next() {
        out.push_str(head);
    }

    for piece in pieces {
        let resolved = piece
            .find(PLACEHOLDER_SUFFIX)
            .and_then(|end| lookup(&piece[..end]).map(|value| (value, &piece[end + 1..])));
        match resolved {
            Some((value, rest)) => {
                out.push_str(&value);
                out.push_str(rest);
            }
            None => {
                out.push_str(PLACEHOLDER_PREFIX);
                out.push_str(piece);
            }
        }
    }
    out
}

/// Reads the file at `path` after placeholder substitution.
///
/// An empty file is not an error; it is logged and returned as-is.
pub fn read_file(path: impl AsRef<str>) -> Result<Vec<u8>> {
    let raw = path.as_ref();
    let resolved = subst(raw);
    let bytes = std::fs::read(Path::new(&resolved)).map_err(|source| Error::Io {
        path: resolved.clone(),
        source,
    })?;
    if bytes.is_empty() {
        warn!(path = %resolved, "file is empty");
    }
    Ok(bytes)
}
