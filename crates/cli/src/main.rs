mod commands;
mod exit_code;
mod output;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::depth::DepthFormat;
use exit_code::ExitCode;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "graphql-depth")]
#[command(about = "Limit how deeply GraphQL selection sets nest", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to GraphQL config file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Project name (for multi-project configs)
    #[arg(short, long, global = true)]
    project: Option<String>,

    /// Force colored output even when not a TTY
    #[arg(long, global = true, conflicts_with = "no_color")]
    color: bool,

    /// Disable colored output
    #[arg(long, global = true, conflicts_with = "color")]
    no_color: bool,

    /// Suppress all output except diagnostics and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Output verbosity options
#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    /// Whether to show informational output (summaries, warnings about siblings)
    pub show_info: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Report operations and fragments whose selection sets nest too deeply
    Lint {
        /// Documents to lint (defaults to the project's `documents`)
        #[arg(value_name = "FILES")]
        files: Vec<PathBuf>,

        /// Maximum allowed depth, overriding the configured `maxDepth`
        #[arg(short, long, value_name = "N")]
        max_depth: Option<u32>,

        /// Field name, or `/regex/`, whose nesting level is not counted
        #[arg(short, long, value_name = "NAME")]
        ignore: Vec<String>,

        /// Glob of extra documents that only provide fragment definitions
        #[arg(short, long, value_name = "GLOB")]
        siblings: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// Print the depth of every operation and fragment, without a limit
    Depth {
        /// Documents to measure (defaults to the project's `documents`)
        #[arg(value_name = "FILES")]
        files: Vec<PathBuf>,

        /// Field name, or `/regex/`, whose nesting level is not counted
        #[arg(short, long, value_name = "NAME")]
        ignore: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: DepthFormat,
    },
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output with colors
    Human,
    /// JSON output for tooling
    Json,
    /// GitHub Actions workflow commands for PR annotations
    Github,
}

fn main() {
    let cli = Cli::parse();

    init_tracing();
    configure_colors(cli.color, cli.no_color);

    let output_opts = OutputOptions {
        show_info: !cli.quiet,
    };

    let result = match cli.command {
        Commands::Lint {
            files,
            max_depth,
            ignore,
            siblings,
            format,
        } => commands::lint::run(
            cli.config,
            cli.project.as_deref(),
            commands::lint::LintArgs {
                files,
                max_depth,
                ignore,
                siblings,
                format,
            },
            output_opts,
        ),
        Commands::Depth {
            files,
            ignore,
            format,
        } => commands::depth::run(
            cli.config,
            cli.project.as_deref(),
            &files,
            &ignore,
            format,
            output_opts,
        ),
    };

    match result {
        Ok(code) => code.exit(),
        Err(error) => {
            let code = ExitCode::from_error(&error);
            tracing::debug!(%code, "Command failed");
            eprintln!("{} {error:#}", "error:".red().bold());
            code.exit()
        }
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("off")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Configure colored output based on flags and environment variables.
///
/// Priority order (highest to lowest):
/// 1. `--color` flag (force colors on)
/// 2. `--no-color` flag (force colors off)
/// 3. `NO_COLOR` environment variable (if set to any value, disable colors)
/// 4. `CLICOLOR_FORCE` environment variable (if set to non-zero, force colors)
/// 5. `CLICOLOR` environment variable (if set to "0", disable colors)
/// 6. Default: colors enabled if stdout is a TTY (handled by `colored` crate)
///
/// See: <https://no-color.org/> and <https://bixense.com/clicolors/>
fn configure_colors(force_color: bool, no_color: bool) {
    use colored::control;

    let env_override = || {
        if std::env::var_os("NO_COLOR").is_some() {
            return Some(false);
        }
        if let Ok(value) = std::env::var("CLICOLOR_FORCE") {
            return (!value.is_empty() && value != "0").then_some(true);
        }
        std::env::var("CLICOLOR")
            .is_ok_and(|value| value == "0")
            .then_some(false)
    };

    let colorize = if force_color {
        Some(true)
    } else if no_color {
        Some(false)
    } else {
        env_override()
    };

    if let Some(colorize) = colorize {
        control::set_override(colorize);
    }
}
