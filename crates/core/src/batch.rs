//! Concurrent comparison of many screenshots

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::debug;

use crate::error::{VisualError, VisualResult};
use crate::visual::{VisualDiff, VisualTester};

/// A comparison result tagged with the screenshot it belongs to
#[derive(Debug)]
pub struct ComparisonOutcome {
    pub name: String,
    pub result: VisualResult<VisualDiff>,
}

/// Compare `names` with at most `jobs` comparisons in flight
///
/// `on_complete` is called in completion order; the returned outcomes are
/// sorted by name.
pub async fn compare_all<F>(
    tester: Arc<VisualTester>,
    names: Vec<String>,
    jobs: usize,
    mut on_complete: F,
) -> VisualResult<Vec<ComparisonOutcome>>
where
    F: FnMut(&ComparisonOutcome),
{
    let semaphore = Arc::new(Semaphore::new(jobs.max(1)));
    let mut set = JoinSet::new();

    for name in names {
        let tester = Arc::clone(&tester);
        let semaphore = Arc::clone(&semaphore);

        set.spawn(async move {
            let _permit = semaphore.acquire_owned().await;
            let task_name = name.clone();
            let result = tokio::task::spawn_blocking(move || tester.compare(&task_name))
                .await
                .unwrap_or_else(|e| Err(VisualError::Task(e.to_string())));
            ComparisonOutcome { name, result }
        });
    }

    let mut outcomes = Vec::with_capacity(set.len());
    while let Some(joined) = set.join_next().await {
        let outcome = joined.map_err(|e| VisualError::Task(e.to_string()))?;
        debug!("Compared '{}'", outcome.name);
        on_complete(&outcome);
        outcomes.push(outcome);
    }

    outcomes.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(outcomes)
}
