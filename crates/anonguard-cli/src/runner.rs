use std::path::{Path, PathBuf};

use anonguard_core::{write_csv, AnonymizationEngine, Table};
use anonguard_reports::{JsonFormatter, MarkdownFormatter, Reporter, StdOutFormatter};
use anyhow::{Context, Result};
use chrono::Local;
use tracing::info;

use crate::{
    constructor::{construct_csv_table, construct_policy},
    parser::{parse_config, resolve_path, Config},
    writer::{default_report_path, resolve_file_path, write_report},
    Args, OutputFormat,
};

/// Report persisted to disk at the end of a run.
enum FileReport {
    Json(JsonFormatter),
    Markdown(MarkdownFormatter),
}

impl FileReport {
    fn reporter(&mut self) -> &mut dyn Reporter {
        match self {
            FileReport::Json(f) => f,
            FileReport::Markdown(f) => f,
        }
    }

    fn extension(&self) -> &'static str {
        match self {
            FileReport::Json(_) => "json",
            FileReport::Markdown(_) => "md",
        }
    }

    fn render(&self) -> Result<String> {
        match self {
            FileReport::Json(f) => f.to_json().context("Failed to serialize JSON report"),
            FileReport::Markdown(f) => Ok(f.to_markdown()),
        }
    }
}

struct Reports {
    console: Option<StdOutFormatter>,
    file: Option<FileReport>,
}

impl Reports {
    /// Console output for `stdout`; a file report for `json`, `markdown`, or
    /// when the config names a report path.
    fn new(format: &OutputFormat, report_configured: bool) -> Self {
        let version = env!("CARGO_PKG_VERSION").to_string();
        let file = match format {
            OutputFormat::Json => Some(FileReport::Json(JsonFormatter::new(version.clone()))),
            OutputFormat::Markdown => Some(FileReport::Markdown(MarkdownFormatter::new())),
            OutputFormat::Stdout if report_configured => {
                Some(FileReport::Markdown(MarkdownFormatter::new()))
            }
            OutputFormat::Stdout => None,
        };
        let console = matches!(format, OutputFormat::Stdout).then(|| StdOutFormatter::new(version));
        Self { console, file }
    }

    fn each(&mut self, mut f: impl FnMut(&mut dyn Reporter)) {
        if let Some(console) = self.console.as_mut() {
            f(console);
        }
        if let Some(file) = self.file.as_mut() {
            f(file.reporter());
        }
    }
}

/// Report location: the configured path, else the anonymized dataset's directory.
fn report_path(
    config: &Config,
    base_dir: &Path,
    output_path: &Path,
    extension: &str,
) -> Result<PathBuf> {
    let timestamp = Local::now().format("%Y%m%d-%H%M%S").to_string();
    match &config.output.report {
        Some(report) => resolve_file_path(&resolve_path(base_dir, report), &timestamp, extension),
        None => {
            let dir = output_path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            default_report_path(dir, &timestamp, extension)
        }
    }
}

/// Load, anonymize, write the dataset, then the report.
///
/// Nothing is written when any step before the dataset write fails.
pub fn run(args: Args) -> Result<()> {
    let (config, base_dir) = parse_config(Path::new(&args.config))?;
    let mut reports = Reports::new(&args.output, config.output.report.is_some());
    reports.each(|r| r.on_start());

    let policy = construct_policy(&config.anonymization, &config.generalization)?;
    let table = construct_csv_table(&config, &base_dir)?;
    let input = table.path().display().to_string();
    reports.each(|r| r.on_loading(&input));

    let batch = table
        .load()
        .with_context(|| format!("Failed to load table: '{}'", table.name()))?;
    reports.each(|r| r.on_table_load(table.name(), batch.num_rows(), batch.num_columns()));

    let engine = AnonymizationEngine::new(policy).context("Invalid anonymization policy")?;
    reports.each(|r| r.on_anonymization_start(engine.policy()));
    let anonymized = engine
        .anonymize(&batch)
        .with_context(|| format!("Failed to anonymize table: '{}'", table.name()))?;
    reports.each(|r| r.on_result(table.name(), &anonymized.metrics));

    let output_path = resolve_path(&base_dir, &config.output.path);
    if args.dry_run {
        info!(path = %output_path.display(), "dry run, anonymized dataset not written");
    } else {
        write_csv(&anonymized.table, &output_path).with_context(|| {
            format!("Failed to write anonymized dataset: {}", output_path.display())
        })?;
        let written = output_path.display().to_string();
        reports.each(|r| r.on_output_written(&written));
    }

    if let Some(file) = &reports.file {
        let destination = report_path(&config, &base_dir, &output_path, file.extension())?;
        write_report(&destination, &file.render()?)?;
        info!(path = %destination.display(), "report written");
        if reports.console.is_some() {
            println!("Report saved to: {}", destination.display());
        }
    }

    Ok(())
}
