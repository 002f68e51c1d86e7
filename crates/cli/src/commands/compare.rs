//! Single screenshot comparison

use anyhow::Result;
use clap::Args;

use rnvisual_core::{
    ComparisonOutcome, ComparisonResult, ComparisonStatus, RnVisualConfig, VisualError,
    VisualTester,
};

use super::{ComparisonArgs, ResultDisplay};
use crate::output::{notify, print_item, Notice, OutputFormat};

#[derive(Args)]
pub struct CompareArgs {
    /// Screenshot name, relative to the screenshot directory, without ".png"
    pub name: String,

    #[command(flatten)]
    pub comparison: ComparisonArgs,
}

/// `Ok(false)` for a regression or a missing baseline; other failures are errors
pub fn execute(args: CompareArgs, mut config: RnVisualConfig, format: OutputFormat) -> Result<bool> {
    args.comparison.apply(&mut config)?;

    let tester = VisualTester::new(config.visual_config()?)?;
    let outcome = match tester.compare(&args.name) {
        Err(e) if !matches!(e, VisualError::BaselineNotFound(_)) => return Err(e.into()),
        result => ComparisonOutcome {
            name: args.name,
            result,
        },
    };
    let result = ComparisonResult::from(&outcome);

    let status = result.status;
    let diff_image = result.diff_image_path.clone();
    print_item(&ResultDisplay(result), format);

    if let Some(path) = diff_image {
        notify(Notice::Info, &format!("Diff image: {}", path), format);
    }
    if status == ComparisonStatus::MissingBaseline {
        notify(
            Notice::Info,
            "Create the baseline with --update-baselines",
            format,
        );
    }

    Ok(matches!(
        status,
        ComparisonStatus::Passed | ComparisonStatus::NewBaseline
    ))
}
