//! Glob expansion of document patterns.

use crate::{ConfigError, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Find every file under `base_dir` matched by `patterns` and not matched by
/// `exclude`.
///
/// Patterns are relative to `base_dir` and may contain one `{a,b}` brace
/// group. Files inside `node_modules` are always skipped. The result is
/// sorted and free of duplicates.
#[tracing::instrument(skip_all, fields(base = %base_dir.display(), patterns = patterns.len()))]
pub fn find_files(base_dir: &Path, patterns: &[&str], exclude: &[String]) -> Result<Vec<PathBuf>> {
    let exclude = compile_excludes(exclude)?;

    let mut files = Vec::new();
    let mut seen = HashSet::new();

    for pattern in patterns.iter().flat_map(|p| expand_braces(p)) {
        let full_pattern = base_dir.join(&pattern).display().to_string();
        let _glob_span = tracing::trace_span!("glob_match", pattern = %full_pattern).entered();

        let entries = glob::glob(&full_pattern).map_err(|e| ConfigError::InvalidGlob {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;

        for entry in entries {
            let path = entry.map_err(|e| ConfigError::Io(e.into_error()))?;
            if !path.is_file() || path.components().any(|c| c.as_os_str() == "node_modules") {
                continue;
            }

            let relative = path.strip_prefix(base_dir).unwrap_or(&path);
            if exclude.iter().any(|glob| glob.matches_path(relative)) {
                tracing::trace!(path = %relative.display(), "Excluded");
                continue;
            }

            if seen.insert(path.clone()) {
                files.push(path);
            }
        }
    }

    files.sort();
    tracing::debug!(files_found = files.len(), "Files found after glob matching");
    Ok(files)
}

fn compile_excludes(exclude: &[String]) -> Result<Vec<glob::Pattern>> {
    exclude
        .iter()
        .flat_map(|pattern| expand_braces(pattern))
        .map(|pattern| {
            glob::Pattern::new(&pattern).map_err(|e| ConfigError::InvalidGlob {
                pattern,
                message: e.to_string(),
            })
        })
        .collect()
}

/// Remove a leading `./` or `/` and collapse doubled slashes
fn normalize_pattern(pattern: &str) -> String {
    let mut normalized = pattern.trim();
    normalized = normalized.strip_prefix("./").unwrap_or(normalized);
    normalized = normalized.strip_prefix('/').unwrap_or(normalized);

    let mut normalized = normalized.to_string();
    while normalized.contains("//") {
        normalized = normalized.replace("//", "/");
    }
    normalized
}

/// Expand brace patterns like "src/**/*.{graphql,gql}" into separate
/// patterns, since the glob crate doesn't support them
fn expand_braces(pattern: &str) -> Vec<String> {
    let normalized = normalize_pattern(pattern);

    // Simple brace expansion - handles single brace group
    if let (Some(start), Some(end)) = (normalized.find('{'), normalized.find('}')) {
        if start < end {
            let before = &normalized[..start];
            let after = &normalized[end + 1..];
            let options = &normalized[start + 1..end];

            return options
                .split(',')
                .map(|opt| format!("{before}{}{after}", opt.trim()))
                .collect();
        }
    }

    vec![normalized]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "query { a }").unwrap();
    }

    fn relative(root: &Path, files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|f| f.strip_prefix(root).unwrap().display().to_string().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_expand_braces() {
        assert_eq!(
            expand_braces("src/**/*.{graphql, gql}"),
            ["src/**/*.graphql", "src/**/*.gql"]
        );
        assert_eq!(expand_braces("./src//*.graphql"), ["src/*.graphql"]);
        assert_eq!(expand_braces("/abs.graphql"), ["abs.graphql"]);
    }

    #[test]
    fn test_find_files_with_exclude() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "src/a.graphql");
        touch(dir.path(), "src/nested/b.gql");
        touch(dir.path(), "src/generated/c.graphql");
        touch(dir.path(), "node_modules/pkg/d.graphql");

        let files = find_files(
            dir.path(),
            &["**/*.{graphql,gql}"],
            &["src/generated/**".to_string()],
        )
        .unwrap();

        assert_eq!(
            relative(dir.path(), &files),
            ["src/a.graphql", "src/nested/b.gql"]
        );
    }

    #[test]
    fn test_overlapping_patterns_are_deduplicated() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.graphql");

        let files = find_files(dir.path(), &["*.graphql", "a.graphql"], &[]).unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_invalid_exclude_pattern() {
        let dir = tempfile::tempdir().unwrap();
        let result = find_files(dir.path(), &["*.graphql"], &["[".to_string()]);
        assert!(matches!(result, Err(ConfigError::InvalidGlob { .. })));
    }
}
