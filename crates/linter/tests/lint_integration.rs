//! Integration tests for the GraphQL linter
//!
//! These tests drive documents through `graphql-syntax` parsing and the
//! configured `Linter`, the same path the CLI takes.

use graphql_linter::{LintConfig, LintDiagnostic, LintSeverity, Linter};
use graphql_syntax::{parse, Document};

fn document(source: &str) -> Document {
    let parse = parse(source);
    assert!(!parse.has_errors(), "{:?}", parse.errors());
    parse.into_document()
}

fn linter(yaml: &str) -> Linter {
    let config: LintConfig = serde_yaml::from_str(yaml).unwrap();
    Linter::new(&config).unwrap()
}

fn lint(linter: &Linter, source: &str, siblings: &[&str]) -> Vec<LintDiagnostic> {
    let primary = document(source);
    let siblings: Vec<Document> = siblings.iter().map(|s| document(s)).collect();
    linter.lint_document(&primary, &siblings, "test.graphql")
}

/// Numbered message list, one diagnostic per line
fn format_messages(diagnostics: &[LintDiagnostic]) -> String {
    diagnostics
        .iter()
        .enumerate()
        .map(|(i, diagnostic)| format!("[{}] {}", i + 1, diagnostic.message))
        .collect::<Vec<_>>()
        .join("\n")
}

const DEPTH_2: &str = "rules: { selection_set_depth: [error, { maxDepth: 2 }] }";
const DEPTH_1: &str = "rules: { selection_set_depth: [error, { maxDepth: 1 }] }";

const ALBUM_FIELDS: &str = "fragment AlbumFields on Album { id }";

const ALBUM_FIELDS_DEEP: &str = r"
fragment AlbumFields on Album {
  id
  modifier {
    date
  }
}
";

#[test]
fn test_operation_within_limit() {
    let source = r"
query {
  viewer { # Level 0
    albums { # Level 1
      title # Level 2
    }
  }
}
";
    assert!(lint(&linter(DEPTH_2), source, &[]).is_empty());
}

#[test]
fn test_operation_over_limit() {
    let source = r"
query deep2 {
  viewer {
    albums {
      title
    }
  }
}
";
    let diagnostics = lint(&linter(DEPTH_1), source, &[]);
    insta::assert_snapshot!(format_messages(&diagnostics), @"[1] 'deep2' exceeds maximum operation depth of 1");
    assert_eq!(diagnostics[0].severity, LintSeverity::Error);
    assert_eq!(diagnostics[0].rule, "selection_set_depth");
}

#[test]
fn test_sibling_fragments() {
    let source = r"
query deep2 {
  viewer {
    albums {
      ...AlbumFields
    }
  }
}
";
    assert!(lint(&linter(DEPTH_2), source, &[ALBUM_FIELDS]).is_empty());

    let diagnostics = lint(&linter(DEPTH_1), source, &[ALBUM_FIELDS]);
    insta::assert_snapshot!(format_messages(&diagnostics), @"[1] 'deep2' exceeds maximum operation depth of 1");

    let ignoring_albums = linter(
        "rules: { selection_set_depth: [error, { maxDepth: 1, ignore: [albums] }] }",
    );
    assert!(lint(&ignoring_albums, source, &[ALBUM_FIELDS]).is_empty());
}

#[test]
fn test_inline_fragment_suggestion() {
    let source = r"
query {
  viewer {
    albums {
      ... on Album {
        id
      }
    }
  }
}
";
    let diagnostics = lint(&linter(DEPTH_1), source, &[ALBUM_FIELDS]);
    insta::assert_snapshot!(format_messages(&diagnostics), @"[1] '' exceeds maximum operation depth of 1");

    let fixes = &diagnostics[0].fixes;
    assert_eq!(fixes.len(), 1);
    let edit = &fixes[0].edits[0];
    assert!(edit.is_deletion());
    assert_eq!(&source[edit.offset_range.start..edit.offset_range.end], "id");
}

#[test]
fn test_deep_sibling_fragment() {
    let source = r"
query {
  viewer {
    albums {
      ...AlbumFields
    }
  }
}
";
    let diagnostics = lint(&linter(DEPTH_2), source, &[ALBUM_FIELDS_DEEP]);
    insta::assert_snapshot!(format_messages(&diagnostics), @"[1] '' exceeds maximum operation depth of 2");
    assert!(diagnostics[0].fixes.is_empty());
}

#[test]
fn test_fragment_in_same_document_gets_fix() {
    let source = r"
query {
  viewer {
    albums {
      ...AlbumFields
    }
  }
}

fragment AlbumFields on Album {
  id
  modifier {
    date
  }
}
";
    let diagnostics = lint(&linter(DEPTH_2), source, &[]);
    insta::assert_snapshot!(format_messages(&diagnostics), @"[1] '' exceeds maximum operation depth of 2");

    let edit = &diagnostics[0].fixes[0].edits[0];
    assert_eq!(&source[edit.offset_range.start..edit.offset_range.end], "date");
}

#[test]
fn test_primary_fragment_shadows_sibling() {
    let source = r"
query Q { viewer { ...AlbumFields } }
fragment AlbumFields on Album { id }
";
    // The deep sibling copy is never consulted
    assert!(lint(&linter(DEPTH_1), source, &[ALBUM_FIELDS_DEEP]).is_empty());
}

#[test]
fn test_multiple_roots() {
    let source = r"
query A { a { b { c } } }
query B { a { b } }
subscription C { a { b { c { d } } } }
fragment D on T { a { b { c } } }
";
    let diagnostics = lint(&linter(DEPTH_1), source, &[]);
    insta::assert_snapshot!(format_messages(&diagnostics), @r"
    [1] 'A' exceeds maximum operation depth of 1
    [2] 'C' exceeds maximum operation depth of 1
    [3] 'D' exceeds maximum operation depth of 1
    ");
}

#[test]
fn test_warn_severity_from_config() {
    let linter = linter(
        r"
rules:
  selection_set_depth:
    severity: warn
    options:
      maxDepth: 1
",
    );
    let diagnostics = lint(&linter, "{ a { b { c } } }", &[]);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity, LintSeverity::Warning);
}

#[test]
fn test_invalid_options_fail_before_linting() {
    let config: LintConfig =
        serde_yaml::from_str("rules: { selection_set_depth: [error, { maxDepth: 0 }] }").unwrap();
    let Err(error) = Linter::new(&config) else {
        panic!("expected a configuration error");
    };
    assert_eq!(
        error.to_string(),
        "invalid options for rule 'selection_set_depth': `maxDepth` must be a positive integer, got 0"
    );
}
