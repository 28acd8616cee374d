//! Flat-file entity lists.

use std::path::Path;

use tracing::debug;

use crate::{Error, Result};

/// Reads one entity name per line, trimmed and wrapped with `prefix` and
/// `suffix`. Blank lines are skipped.
pub fn read_entities(path: impl AsRef<Path>, prefix: &str, suffix: &str) -> Result<Vec<String>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|err| Error::io(path, err))?;
    let entities = parse_entities(&content, prefix, suffix);
    debug!(path = %path.display(), count = entities.len(), "entities_read");
    Ok(entities)
}

fn parse_entities(content: &str, prefix: &str, suffix: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| format!("{prefix}{line}{suffix}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::parse_entities;

    #[test]
    fn lines_are_trimmed_and_wrapped() {
        let parsed = parse_entities("  Pune \n\n\tNashik\n", "", ", Maharashtra");
        assert_eq!(parsed, vec!["Pune, Maharashtra", "Nashik, Maharashtra"]);
    }

    #[test]
    fn blank_input_yields_nothing() {
        assert!(parse_entities("\n \n", "x", "y").is_empty());
    }
}
