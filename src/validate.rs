use crate::error::{Error, Result};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

fn output_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[\w\s-]+\.pdf$").expect("valid output name pattern"))
}

pub fn ensure_exists<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    if path.exists() {
        Ok(())
    } else {
        Err(Error::NotFound {
            path: path.to_path_buf(),
        })
    }
}

/// Guess the type from the extension, the same way a MIME lookup by name would
pub fn ensure_pdf<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    let is_pdf = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));

    if is_pdf {
        Ok(())
    } else {
        Err(Error::NotAPdf {
            path: path.to_path_buf(),
        })
    }
}

/// An existing file with a PDF extension
pub fn ensure_pdf_input<P: AsRef<Path>>(path: P) -> Result<()> {
    ensure_exists(&path)?;
    ensure_pdf(&path)
}

/// Merge output names are plain file names: word characters, spaces and
/// hyphens, ending in `.pdf`.
pub fn ensure_output_name(name: &str) -> Result<()> {
    if output_name_pattern().is_match(name) {
        Ok(())
    } else {
        Err(Error::InvalidOutputName {
            name: name.to_string(),
        })
    }
}
