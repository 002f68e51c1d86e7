//! Full comparison run over the screenshot directory

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Result};
use clap::Args;
use tracing::info;

use rnvisual_core::{compare_all, RnVisualConfig, SuiteReport, VisualTester};

use super::{ComparisonArgs, ResultDisplay};
use crate::output::{notify, print_list, progress_bar, Notice, OutputFormat};

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub comparison: ComparisonArgs,

    /// Comparisons run concurrently
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Directory results.json is written to
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Only compare screenshots whose name contains this text
    #[arg(long)]
    pub filter: Option<String>,
}

/// `Ok(false)` when a screenshot regressed or lacks a baseline; any
/// comparison that could not run makes the whole run an error
pub async fn execute(args: RunArgs, mut config: RnVisualConfig, format: OutputFormat) -> Result<bool> {
    args.comparison.apply(&mut config)?;
    if let Some(jobs) = args.jobs {
        config.comparison.jobs = jobs;
    }
    if let Some(output) = args.output {
        config.paths.output_dir = output;
    }

    let tester = Arc::new(VisualTester::new(config.visual_config()?)?);
    let mut names = tester.list_screenshots()?;
    if let Some(filter) = &args.filter {
        names.retain(|name| name.contains(filter.as_str()));
    }

    if names.is_empty() {
        notify(
            Notice::Warning,
            &format!(
                "No screenshots found in {}",
                config.paths.actual_dir.display()
            ),
            format,
        );
        return Ok(true);
    }

    info!(
        "Comparing {} screenshot(s) with {} job(s)",
        names.len(),
        config.comparison.jobs
    );

    let start = Instant::now();
    let bar = progress_bar(names.len() as u64, format);
    let outcomes = compare_all(tester, names, config.comparison.jobs, |outcome| {
        bar.set_message(outcome.name.clone());
        bar.inc(1);
    })
    .await?;
    bar.finish_and_clear();

    let report = SuiteReport::from_outcomes(&outcomes, start.elapsed().as_millis() as u64);
    let path = report.write_json(&config.paths.output_dir)?;

    let rows: Vec<ResultDisplay> = report.results.iter().cloned().map(ResultDisplay).collect();
    print_list(&rows, format);

    let summary = format!(
        "{} passed, {} failed, {} new baseline(s), {} missing baseline(s), {} error(s) ({} ms)",
        report.passed,
        report.failed,
        report.new_baselines,
        report.missing_baselines,
        report.errored,
        report.duration_ms
    );
    let notice = if report.success() {
        Notice::Success
    } else {
        Notice::Warning
    };
    notify(notice, &summary, format);
    if report.missing_baselines > 0 {
        notify(
            Notice::Info,
            "Create missing baselines with --update-baselines",
            format,
        );
    }
    notify(
        Notice::Info,
        &format!("Results written to {}", path.display()),
        format,
    );

    if report.errored > 0 {
        bail!(
            "{} screenshot(s) could not be compared, see {}",
            report.errored,
            path.display()
        );
    }

    Ok(report.success())
}
