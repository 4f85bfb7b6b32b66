//! CLI entry point for lintbridge.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, logging setup, and exit
//! codes. All orchestration lives in the `lintbridge-app` crate.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand, ValueEnum};
use lintbridge_adapters::AdapterRegistry;
use lintbridge_app::{
    parse_report_json, render_annotations, render_markdown, run_lint, runtime_error_report,
    serialize_report, to_renderable, verdict_exit_code, RunInput,
};
use lintbridge_exec::{PathProbe, ShellRunner};
use lintbridge_settings::{LintbridgeConfigV1, Overrides};
use lintbridge_types::LintbridgeReport;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a `tracing` filter directive.
const LOG_ENV: &str = "LINTBRIDGE_LOG";

#[derive(Parser, Debug)]
#[command(
    name = "lintbridge",
    version,
    about = "Run external lint and audit tools through a common adapter contract"
)]
struct Cli {
    /// Repository root; adapter directories resolve relative to it.
    #[arg(long, default_value = ".")]
    root: Utf8PathBuf,

    /// Path to lintbridge config TOML (relative to the root).
    #[arg(long, default_value = "lintbridge.toml")]
    config: Utf8PathBuf,

    /// Log at debug level unless LINTBRIDGE_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the selected adapters and write a report.
    Run {
        /// Run only this adapter (repeatable). Selected adapters run even if disabled in config.
        #[arg(long = "adapter", value_name = "NAME")]
        adapters: Vec<String>,

        /// Request auto-fix from every selected adapter.
        #[arg(long)]
        fix: bool,

        /// Command prefix placed before the tool binary (e.g. `php`, `docker compose exec app`).
        #[arg(long)]
        prefix: Option<String>,

        /// Extra arguments appended to the tool command.
        #[arg(long, allow_hyphen_values = true)]
        args: Option<String>,

        /// What to do when an adapter fails (continue|abort).
        #[arg(long)]
        on_adapter_error: Option<String>,

        /// Where to write the JSON report.
        #[arg(long, default_value = "artifacts/lintbridge/report.json")]
        report_out: Utf8PathBuf,

        /// Write a Markdown report alongside the JSON.
        #[arg(long)]
        write_markdown: bool,

        /// Where to write the Markdown report (if enabled).
        #[arg(long, default_value = "artifacts/lintbridge/comment.md")]
        markdown_out: Utf8PathBuf,
    },

    /// List registered adapters and the prerequisite each one needs.
    List,

    /// Render markdown from an existing JSON report.
    Md {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/lintbridge/report.json")]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Render GitHub Actions annotations from an existing JSON report.
    Annotations {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/lintbridge/report.json")]
        report: Utf8PathBuf,

        /// Maximum number of annotations to emit.
        #[arg(long, default_value = "10")]
        max: usize,
    },

    /// Print the JSON Schema for the report or the config file.
    Schema {
        #[arg(value_enum)]
        kind: SchemaKind,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SchemaKind {
    Report,
    Config,
}

struct RunArgs {
    overrides: Overrides,
    report_out: Utf8PathBuf,
    write_markdown: bool,
    markdown_out: Utf8PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.cmd {
        Commands::Run {
            ref adapters,
            fix,
            ref prefix,
            ref args,
            ref on_adapter_error,
            ref report_out,
            write_markdown,
            ref markdown_out,
        } => {
            let run_args = RunArgs {
                overrides: Overrides {
                    adapters: adapters.clone(),
                    fix,
                    prefix: prefix.clone(),
                    args: args.clone(),
                    on_adapter_error: on_adapter_error.clone(),
                },
                report_out: report_out.clone(),
                write_markdown,
                markdown_out: markdown_out.clone(),
            };
            cmd_run(&cli, run_args)
        }
        Commands::List => cmd_list(),
        Commands::Md { report, output } => cmd_md(report, output),
        Commands::Annotations { report, max } => cmd_annotations(report, max),
        Commands::Schema { kind } => cmd_schema(kind),
    }
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn cmd_run(cli: &Cli, args: RunArgs) -> anyhow::Result<()> {
    let root = cli
        .root
        .canonicalize_utf8()
        .unwrap_or_else(|_| cli.root.clone());

    let result = (|| -> anyhow::Result<i32> {
        if !root.is_dir() {
            anyhow::bail!("root directory does not exist: {}", root);
        }
        // Missing config is allowed (every registered adapter runs with defaults).
        let cfg_path = root.join(&cli.config);
        let cfg_text = std::fs::read_to_string(&cfg_path).unwrap_or_default();
        tracing::debug!(config = %cfg_path, found = !cfg_text.is_empty(), "loaded config");

        let input = RunInput {
            root: &root,
            config_text: &cfg_text,
            overrides: args.overrides,
        };
        let registry = AdapterRegistry::builtin();
        let output = run_lint(input, &registry, &ShellRunner, &PathProbe)?;

        write_report_file(&args.report_out, &output.report).context("write report json")?;

        if args.write_markdown {
            let renderable = to_renderable(&output.report);
            let md = render_markdown(&renderable);
            write_text_file(&args.markdown_out, &md).context("write markdown")?;
        }

        Ok(verdict_exit_code(output.report.verdict))
    })();

    match result {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(err) => {
            let report = runtime_error_report(&format!("{err:#}"));
            let _ = write_report_file(&args.report_out, &report);
            eprintln!("lintbridge error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn cmd_list() -> anyhow::Result<()> {
    let registry = AdapterRegistry::builtin();
    for adapter in registry.iter() {
        println!("{}\trequires {}", adapter.identity(), adapter.prerequisite());
    }
    Ok(())
}

fn cmd_md(report_path: Utf8PathBuf, output: Option<Utf8PathBuf>) -> anyhow::Result<()> {
    let report_text = std::fs::read_to_string(&report_path)
        .with_context(|| format!("read report: {}", report_path))?;
    let report = parse_report_json(&report_text)?;
    let md = render_markdown(&to_renderable(&report));

    if let Some(out_path) = output {
        write_text_file(&out_path, &md).context("write markdown output")?;
    } else {
        print!("{}", md);
    }

    Ok(())
}

fn cmd_annotations(report_path: Utf8PathBuf, max: usize) -> anyhow::Result<()> {
    let report_text = std::fs::read_to_string(&report_path)
        .with_context(|| format!("read report: {}", report_path))?;
    let report = parse_report_json(&report_text)?;

    for annotation in render_annotations(&to_renderable(&report), max) {
        println!("{}", annotation);
    }

    Ok(())
}

fn cmd_schema(kind: SchemaKind) -> anyhow::Result<()> {
    let schema = match kind {
        SchemaKind::Report => schemars::schema_for!(LintbridgeReport),
        SchemaKind::Config => schemars::schema_for!(LintbridgeConfigV1),
    };
    let text = serde_json::to_string_pretty(&schema).context("serialize schema")?;
    println!("{}", text);
    Ok(())
}

fn write_report_file(path: &Utf8Path, report: &LintbridgeReport) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {}", parent))?;
    }
    let data = serialize_report(report).context("serialize report")?;
    std::fs::write(path, data).with_context(|| format!("write report: {}", path))?;
    Ok(())
}

fn write_text_file(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {}", parent))?;
    }
    std::fs::write(path, text).with_context(|| format!("write text: {}", path))?;
    Ok(())
}
