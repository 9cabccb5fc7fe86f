//! Directory-scanning helpers.
//!
//! Pattern matching against directory contents is separated from the
//! I/O-performing extraction stages so it can be tested without real
//! archives. All helpers look at a directory's immediate children only and
//! return entries in sorted order, so results do not depend on filesystem
//! enumeration order.

use std::path::{Path, PathBuf};

use crate::assembly::error::{AssemblyError, AssemblyResult};

/// Lists the immediate children of `directory` whose filename satisfies
/// `predicate`, sorted by filename.
///
/// # Errors
///
/// Returns a read error if the directory cannot be enumerated.
pub fn find_matching<P>(directory: &Path, predicate: P) -> AssemblyResult<Vec<PathBuf>>
where
    P: Fn(&str) -> bool,
{
    let entries =
        std::fs::read_dir(directory).map_err(|e| AssemblyError::read(directory, e))?;

    let mut matches = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| AssemblyError::read(directory, e))?;
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            // Non-UTF-8 names cannot match any configured pattern.
            continue;
        };
        if predicate(name) {
            matches.push(entry.path());
        }
    }

    matches.sort();
    Ok(matches)
}

/// Returns the first child of `directory` (in sorted order) whose filename
/// satisfies `predicate`, or `None` if nothing matches.
///
/// # Errors
///
/// Returns a read error if the directory cannot be enumerated.
pub fn find_first<P>(directory: &Path, predicate: P) -> AssemblyResult<Option<PathBuf>>
where
    P: Fn(&str) -> bool,
{
    Ok(find_matching(directory, predicate)?.into_iter().next())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"x").unwrap();
    }

    #[test]
    fn find_matching_returns_sorted_matches() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "sonar-b-plugin.jar");
        touch(dir.path(), "sonar-a-plugin.jar");
        touch(dir.path(), "README");

        let matches = find_matching(dir.path(), |n| n.ends_with(".jar")).unwrap();
        let names: Vec<_> = matches
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["sonar-a-plugin.jar", "sonar-b-plugin.jar"]);
    }

    #[test]
    fn find_first_returns_lexicographically_first() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "plugin-2.jar");
        touch(dir.path(), "plugin-1.jar");

        let first = find_first(dir.path(), |n| n.starts_with("plugin-"))
            .unwrap()
            .unwrap();
        assert_eq!(first.file_name().unwrap(), "plugin-1.jar");
    }

    #[test]
    fn find_first_none_when_no_match() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "other.txt");

        let result = find_first(dir.path(), |n| n.ends_with(".jar")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn missing_directory_is_read_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("does-not-exist");
        let result = find_matching(&missing, |_| true);
        assert!(matches!(result, Err(AssemblyError::Read { .. })));
    }
}
