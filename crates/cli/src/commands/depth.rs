use crate::commands::common::{CommandContext, DocumentSet};
use crate::exit_code::ExitCode;
use crate::output::{self, DiagnosticOutput};
use crate::OutputOptions;
use anyhow::{Context, Result};
use colored::Colorize;
use graphql_linter::rules::selection_set_depth::RULE_NAME;
use graphql_linter::{DepthCalculator, FragmentRegistry, IgnoreList};
use graphql_syntax::{Definition, LineIndex};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum DepthFormat {
    /// One line per operation and fragment
    Human,
    /// JSON output for tooling
    Json,
}

/// Observed depth of one root definition
#[derive(Debug, Clone, PartialEq, Eq)]
struct RootDepth {
    file: String,
    kind: String,
    name: String,
    line: u32,
    column: u32,
    depth: i64,
}

pub fn run(
    config_path: Option<PathBuf>,
    project_name: Option<&str>,
    files: &[PathBuf],
    ignore: &[String],
    format: DepthFormat,
    output_opts: OutputOptions,
) -> Result<ExitCode> {
    let ctx = CommandContext::load(config_path, project_name)?;

    let mut ignore_entries = match &ctx {
        Some(ctx) => configured_ignore(ctx)?,
        None => Vec::new(),
    };
    ignore_entries.extend(ignore.iter().cloned());
    let ignore = IgnoreList::parse(&ignore_entries).context("Invalid --ignore entry")?;

    let set = DocumentSet::load(ctx.as_ref(), files, &[], output_opts.show_info)?;

    let mut roots = Vec::new();
    let mut parse_errors = Vec::new();
    for (index, source) in set.documents.iter().enumerate() {
        let line_index = source.line_index();
        if source.parse.has_errors() {
            parse_errors.extend(source.parse.errors().iter().map(|error| {
                DiagnosticOutput::from_parse_error(&source.display, &line_index, error)
            }));
            continue;
        }

        let document = source.parse.document();
        let fragments = FragmentRegistry::register(document, set.fragment_sources(index));
        let calculator = DepthCalculator::new(&fragments, &ignore);
        roots.extend(document.definitions.iter().map(|definition| {
            root_depth(&source.display, &line_index, definition, &calculator)
        }));
    }

    match format {
        DepthFormat::Human => {
            output::print_human(&parse_errors);
            for root in &roots {
                let name = if root.name.is_empty() {
                    "<anonymous>".dimmed().to_string()
                } else {
                    root.name.bold().to_string()
                };
                println!(
                    "{}:{}:{}: {} {name} depth {}",
                    root.file,
                    root.line,
                    root.column,
                    root.kind.cyan(),
                    root.depth
                );
            }
            if output_opts.show_info {
                let deepest = roots.iter().map(|root| root.depth).max();
                if let Some(deepest) = deepest {
                    println!(
                        "\n{}",
                        format!("{} root(s), deepest at depth {deepest}", roots.len()).bold()
                    );
                } else {
                    println!("\n{}", "No operations or fragments found".yellow());
                }
            }
        }
        DepthFormat::Json => {
            let mut errors = output::json_report(&parse_errors, set.documents.len());
            let report = serde_json::json!({
                "roots": roots.iter().map(|root| serde_json::json!({
                    "file": root.file,
                    "kind": root.kind,
                    "name": root.name,
                    "depth": root.depth,
                    "location": { "line": root.line, "column": root.column },
                })).collect::<Vec<_>>(),
                "errors": errors["diagnostics"].take(),
            });
            println!("{report:#}");
        }
    }

    Ok(if parse_errors.is_empty() {
        ExitCode::Success
    } else {
        ExitCode::ParseError
    })
}

/// `ignore` entries of the configured depth rule, whatever its severity
fn configured_ignore(ctx: &CommandContext) -> Result<Vec<String>> {
    let lint_config = ctx.lint_config()?;
    let Some(entries) = lint_config
        .get_options(RULE_NAME)
        .and_then(|options| options.get("ignore"))
    else {
        return Ok(Vec::new());
    };

    serde_json::from_value(entries.clone())
        .with_context(|| format!("Invalid `ignore` option of rule '{RULE_NAME}'"))
}

fn root_depth<'a>(
    file: &str,
    line_index: &LineIndex,
    definition: &'a Definition,
    calculator: &DepthCalculator<'a>,
) -> RootDepth {
    let (kind, name) = match definition {
        Definition::Operation(operation) => (
            operation.kind.to_string(),
            operation.display_name().to_string(),
        ),
        Definition::Fragment(fragment) => ("fragment".to_string(), fragment.name.to_string()),
    };
    let position = line_index.position(definition.range().start);

    RootDepth {
        file: file.to_string(),
        kind,
        name,
        line: position.line + 1,
        column: position.character + 1,
        depth: calculator.definition_depth(definition),
    }
}
