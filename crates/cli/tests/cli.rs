use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_graphql-depth"))
        .args(args)
        .arg("--no-color")
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn write(dir: &Path, name: &str, contents: &str) {
    let path = dir.join(name);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

const DEEP_QUERY: &str = "query Deep {\n  viewer {\n    albums {\n      title\n    }\n  }\n}\n";

#[test]
fn lint_reports_too_deep_operation() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "deep.graphql", DEEP_QUERY);

    let output = run(dir.path(), &["lint", "deep.graphql", "--max-depth", "1"]);

    assert_eq!(output.status.code(), Some(1));
    let stdout = stdout(&output);
    assert!(
        stdout.contains("deep.graphql:1:1: error: 'Deep' exceeds maximum operation depth of 1"),
        "{stdout}"
    );
    assert!(stdout.contains("rule: selection_set_depth"), "{stdout}");
    assert!(stdout.contains("help: Remove selections at 4:7"), "{stdout}");
}

#[test]
fn lint_passes_within_limit() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "deep.graphql", DEEP_QUERY);

    let output = run(dir.path(), &["lint", "deep.graphql", "--max-depth", "2", "--quiet"]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "");
}

#[test]
fn lint_without_max_depth_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "deep.graphql", DEEP_QUERY);

    let output = run(dir.path(), &["lint", "deep.graphql"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("maxDepth"), "{}", stderr(&output));
}

#[test]
fn lint_reports_syntax_errors() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "broken.graphql", "query {\n  viewer {\n");

    let output = run(dir.path(), &["lint", "broken.graphql", "--max-depth", "3"]);

    assert_eq!(output.status.code(), Some(5));
    assert!(stdout(&output).contains("rule: syntax"), "{}", stdout(&output));
}

#[test]
fn lint_missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();

    let output = run(dir.path(), &["lint", "missing.graphql", "--max-depth", "3"]);

    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("missing.graphql"), "{}", stderr(&output));
}

#[test]
fn lint_uses_project_config_and_siblings() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        ".graphqlrc.yml",
        r"
documents: 'src/**/*.graphql'
siblings: 'shared/*.graphql'
extensions:
  lint:
    rules:
      selection_set_depth: [warn, { maxDepth: 1 }]
",
    );
    write(
        dir.path(),
        "src/query.graphql",
        "query Albums { viewer { ...AlbumList } }\n",
    );
    write(
        dir.path(),
        "shared/fragments.graphql",
        "fragment AlbumList on User { albums { title } }\n",
    );

    let output = run(dir.path(), &["lint", "--format", "json"]);

    assert_eq!(output.status.code(), Some(0));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["success"], true);
    assert_eq!(report["stats"]["total_files"], 1);
    assert_eq!(report["stats"]["total_warnings"], 1);

    let diagnostic = &report["diagnostics"][0];
    assert_eq!(
        diagnostic["message"],
        "'Albums' exceeds maximum operation depth of 1"
    );
    assert_eq!(diagnostic["severity"], "warning");
    // The overflowing field lives in a sibling file, so nothing is suggested
    assert_eq!(diagnostic["suggestions"], serde_json::json!([]));
}

#[test]
fn lint_unknown_rule_in_config() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        ".graphqlrc.yml",
        "documents: '*.graphql'\nextensions:\n  lint:\n    rules:\n      selection_set_dept: error\n",
    );
    write(dir.path(), "query.graphql", DEEP_QUERY);

    let output = run(dir.path(), &["lint"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(
        stderr(&output).contains("selection_set_depth"),
        "{}",
        stderr(&output)
    );
}

#[test]
fn lint_github_format() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "deep.graphql", DEEP_QUERY);

    let output = run(
        dir.path(),
        &["lint", "deep.graphql", "-m", "0", "--format", "github"],
    );

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("maxDepth"), "{}", stderr(&output));

    let output = run(
        dir.path(),
        &["lint", "deep.graphql", "-m", "1", "--format", "github"],
    );
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        stdout(&output),
        "::error file=deep.graphql,line=1,col=1::'Deep' exceeds maximum operation depth of 1 [selection_set_depth]\n"
    );
}

#[test]
fn depth_prints_every_root() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "ops.graphql",
        "query Deep { viewer { ...F } }\nfragment F on User { albums { title } }\n",
    );

    let output = run(dir.path(), &["depth", "ops.graphql", "--format", "json"]);

    assert_eq!(output.status.code(), Some(0));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let roots: Vec<(String, i64)> = report["roots"]
        .as_array()
        .unwrap()
        .iter()
        .map(|root| {
            (
                root["name"].as_str().unwrap().to_string(),
                root["depth"].as_i64().unwrap(),
            )
        })
        .collect();
    assert_eq!(roots, [("Deep".to_string(), 2), ("F".to_string(), 1)]);
}
