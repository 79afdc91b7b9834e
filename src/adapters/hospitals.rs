//! Hospital list adapter.
//!
//! The hospital choices come from an optional plain-text file with one name
//! per line. Without the file, a built-in list is used.

use std::borrow::Cow;
use std::io::ErrorKind;
use std::path::Path;

/// Hospitals offered when no list file is present.
pub const DEFAULT_HOSPITALS: [&str; 5] = [
    "Sons and Miller",
    "Kim Inc",
    "Cook PLC",
    "and Williams, Brown Mckenzie",
    "Moreno Murphy, Griffith and",
];

/// Default hospital list as owned strings.
#[must_use]
pub fn default_hospitals() -> Vec<String> {
    DEFAULT_HOSPITALS.iter().map(|h| (*h).to_string()).collect()
}

/// Parse hospital names: trimmed, blank lines dropped, file order kept.
#[must_use]
pub fn parse_hospitals(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Load hospital names from `path`, falling back to [`DEFAULT_HOSPITALS`].
///
/// A missing file is the normal case and is not reported. A file that
/// exists but cannot be read is logged and also falls back. Bytes that are
/// not valid UTF-8 are replaced, so every line still yields an entry.
#[must_use]
pub fn load_hospitals(path: &Path) -> Vec<String> {
    match std::fs::read(path) {
        Ok(bytes) => {
            let content = String::from_utf8_lossy(&bytes);
            if let Cow::Owned(_) = content {
                tracing::warn!(
                    "Hospital list {:?} is not valid UTF-8; invalid bytes were replaced",
                    path
                );
            }
            let hospitals = parse_hospitals(&content);
            if hospitals.is_empty() {
                tracing::warn!(
                    "Hospital list {:?} has no entries; the form will offer none",
                    path
                );
            } else {
                tracing::info!("Loaded {} hospitals from {:?}", hospitals.len(), path);
            }
            hospitals
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!("No hospital list at {:?}, using defaults", path);
            default_hospitals()
        }
        Err(e) => {
            tracing::warn!("Failed to read hospital list {:?}: {}; using defaults", path, e);
            default_hospitals()
        }
    }
}
