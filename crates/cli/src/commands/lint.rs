use crate::commands::common::{CommandContext, DocumentSet};
use crate::exit_code::ExitCode;
use crate::output::{self, DiagnosticOutput};
use crate::{OutputFormat, OutputOptions};
use anyhow::{Context, Result};
use colored::Colorize;
use graphql_linter::rules::selection_set_depth::RULE_NAME;
use graphql_linter::{LintConfig, LintRuleConfig, Linter, RuleSeverity};
use serde_json::{json, Map, Value};
use std::path::PathBuf;

/// Command line settings of the `lint` command
pub struct LintArgs {
    pub files: Vec<PathBuf>,
    pub max_depth: Option<u32>,
    pub ignore: Vec<String>,
    pub siblings: Vec<String>,
    pub format: OutputFormat,
}

pub fn run(
    config_path: Option<PathBuf>,
    project_name: Option<&str>,
    args: LintArgs,
    output_opts: OutputOptions,
) -> Result<ExitCode> {
    let start_time = std::time::Instant::now();

    let ctx = CommandContext::load(config_path, project_name)?;
    let base_config = match &ctx {
        Some(ctx) => ctx.lint_config()?,
        None => LintConfig::default(),
    };

    let lint_config = apply_overrides(&base_config, args.max_depth, &args.ignore);
    let linter = Linter::new(&lint_config).context("Invalid lint configuration")?;
    if linter.is_empty() {
        if output_opts.show_info {
            println!("{}", "No lint rules enabled".yellow());
        }
        return Ok(ExitCode::Success);
    }
    tracing::info!(
        rules = ?linter.enabled_rules().collect::<Vec<_>>(),
        "Linter configured"
    );

    let files = DocumentSet::load(
        ctx.as_ref(),
        &args.files,
        &args.siblings,
        output_opts.show_info,
    )?;

    let lint_start = std::time::Instant::now();
    let mut diagnostics = Vec::new();
    let mut parse_failed = false;

    for (index, source) in files.documents.iter().enumerate() {
        let line_index = source.line_index();

        if source.parse.has_errors() {
            parse_failed = true;
            diagnostics.extend(source.parse.errors().iter().map(|error| {
                DiagnosticOutput::from_parse_error(&source.display, &line_index, error)
            }));
            continue;
        }

        let lint_diagnostics = linter.lint_document(
            source.parse.document(),
            files.fragment_sources(index),
            &source.display,
        );
        diagnostics.extend(
            lint_diagnostics
                .iter()
                .map(|d| DiagnosticOutput::from_lint(&source.display, &line_index, d)),
        );
    }
    let lint_duration = lint_start.elapsed();

    let total_errors = diagnostics.iter().filter(|d| d.is_error()).count();
    let total_warnings = diagnostics.len() - total_errors;

    match args.format {
        OutputFormat::Human => {
            output::print_human(&diagnostics);

            if output_opts.show_info {
                println!();
                let checked = files.documents.len();
                if total_errors == 0 && total_warnings == 0 {
                    println!(
                        "{}",
                        format!("✓ No depth issues found in {checked} document(s)")
                            .green()
                            .bold()
                    );
                } else if total_errors == 0 {
                    println!(
                        "{}",
                        format!("✓ Linting passed with {total_warnings} warning(s)")
                            .yellow()
                            .bold()
                    );
                } else if total_warnings == 0 {
                    println!("{}", format!("✗ Found {total_errors} error(s)").red());
                } else {
                    println!(
                        "{}",
                        format!("✗ Found {total_errors} error(s) and {total_warnings} warning(s)")
                            .red()
                    );
                }
                println!(
                    "  {} linting: {:.2}s, total: {:.2}s",
                    "⏱".dimmed(),
                    lint_duration.as_secs_f64(),
                    start_time.elapsed().as_secs_f64()
                );
            }
        }
        OutputFormat::Json => {
            let report = output::json_report(&diagnostics, files.documents.len());
            println!("{report:#}");
        }
        OutputFormat::Github => {
            for line in output::github_lines(&diagnostics) {
                println!("{line}");
            }
        }
    }

    Ok(if parse_failed {
        ExitCode::ParseError
    } else if total_errors > 0 {
        ExitCode::LintError
    } else {
        ExitCode::Success
    })
}

/// Layer `--max-depth` and `--ignore` over the configured depth rule.
///
/// A rule switched off in the config stays off unless `--max-depth` is
/// given. An unconfigured rule is enabled as an error, so running without
/// any `maxDepth` fails when the linter validates its options.
fn apply_overrides(config: &LintConfig, max_depth: Option<u32>, ignore: &[String]) -> LintConfig {
    let severity = config.get_severity(RULE_NAME);
    let unchanged = match severity {
        Some(RuleSeverity::Off) => max_depth.is_none(),
        Some(_) => max_depth.is_none() && ignore.is_empty(),
        None => false,
    };
    if unchanged {
        return config.clone();
    }

    let mut options = match config.get_options(RULE_NAME) {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    };
    if let Some(max_depth) = max_depth {
        options.remove("max_depth");
        options.insert("maxDepth".to_string(), json!(max_depth));
    }
    if !ignore.is_empty() {
        let mut entries = options
            .get("ignore")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        entries.extend(ignore.iter().map(|entry| json!(entry)));
        options.insert("ignore".to_string(), Value::Array(entries));
    }

    let severity = match severity {
        Some(severity @ RuleSeverity::Warn) => severity,
        _ => RuleSeverity::Error,
    };

    let mut overrides = LintConfig::default();
    overrides.set_rule(
        RULE_NAME,
        LintRuleConfig::Detailed {
            severity,
            options: (!options.is_empty()).then_some(Value::Object(options)),
        },
    );
    config.merge(&overrides)
}
