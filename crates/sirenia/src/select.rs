//! Best-of-N runs and automatic strategy selection.

use crate::config::{LayoutConfiguration, Strategy, StrategyConfig};
use crate::engine::LayoutEngine;
use crate::error::Result;
use crate::metrics::Score;
use crate::pipeline::executor::{Executor, LayoutRun};
use crate::pipeline::{ConstraintContainer, LayoutAction, Phase};
use futures::future::join4;

/// Strategies tried by [`Strategy::Automatic`], in tie-break order.
pub const AUTOMATIC_CANDIDATES: [Strategy; 4] = [
    Strategy::Stress,
    Strategy::ClusterStress,
    Strategy::Radial,
    Strategy::Spore,
];

pub(crate) struct Selection {
    pub run: LayoutRun,
    pub score: Score,
    pub strategy: Strategy,
}

/// Runs a compiled container end to end: pre-main once, main as configured, post-main once on
/// the selected result.
pub(crate) async fn run_container<E: LayoutEngine>(
    executor: &Executor<'_, E>,
    mut run: LayoutRun,
    container: &mut ConstraintContainer,
    main: &StrategyConfig,
) -> Result<Selection> {
    executor
        .run_actions(&mut run, &mut container.pre_main, Phase::PreMain, 0)
        .await?;

    let mut selection = if container.is_automatic() {
        automatic(executor, &run, main, container.runs).await?
    } else {
        let (run, score) = best_of(executor, &run, &container.main, container.runs).await?;
        Selection {
            run,
            score,
            strategy: container.strategy,
        }
    };

    if !container.post_main.is_empty() {
        executor
            .run_actions(
                &mut selection.run,
                &mut container.post_main,
                Phase::PostMain,
                0,
            )
            .await?;
        selection.score = Score::of(&selection.run.graph);
    }
    Ok(selection)
}

/// Runs `main` `runs` times on copies of `base` and keeps the lowest score; the earliest run
/// wins ties. Failed runs are skipped; when every run fails the first error is returned.
pub(crate) async fn best_of<E: LayoutEngine>(
    executor: &Executor<'_, E>,
    base: &LayoutRun,
    main: &[LayoutAction],
    runs: u32,
) -> Result<(LayoutRun, Score)> {
    let mut best = single_run(executor, base, main, 0).await;
    for ix in 1..runs.max(1) {
        let next = single_run(executor, base, main, ix).await;
        best = keep_better(best, next, |(_, score)| score.total());
    }
    best
}

async fn single_run<E: LayoutEngine>(
    executor: &Executor<'_, E>,
    base: &LayoutRun,
    main: &[LayoutAction],
    ix: u32,
) -> Result<(LayoutRun, Score)> {
    let mut run = base.clone();
    let mut actions = main.to_vec();
    match executor
        .run_actions(&mut run, &mut actions, Phase::Main, u64::from(ix))
        .await
    {
        Ok(()) => {
            let score = Score::of(&run.graph);
            tracing::debug!(run = ix, score = score.total(), "layout run finished");
            Ok((run, score))
        }
        Err(err) => {
            tracing::warn!(run = ix, error = %err, "layout run failed");
            Err(err)
        }
    }
}

/// Keeps `current` unless `next` scores strictly lower. An error only survives when both sides
/// failed, and then it is the earlier one.
fn keep_better<T>(current: Result<T>, next: Result<T>, score: impl Fn(&T) -> usize) -> Result<T> {
    match (current, next) {
        (Ok(current), Ok(next)) if score(&next) < score(&current) => Ok(next),
        (Ok(current), _) => Ok(current),
        (Err(_), Ok(next)) => Ok(next),
        (Err(first), Err(_)) => Err(first),
    }
}

/// Lays out independent copies of `base` with every candidate strategy and keeps the best.
async fn automatic<E: LayoutEngine>(
    executor: &Executor<'_, E>,
    base: &LayoutRun,
    main: &StrategyConfig,
    runs: u32,
) -> Result<Selection> {
    let candidates = AUTOMATIC_CANDIDATES.map(move |strategy| {
        let mut config = main.with_algorithm(strategy);
        config.run_layered_after = false;
        let mut config = LayoutConfiguration::new(config);
        config.runs = runs;
        let container = ConstraintContainer::compile(&config);
        async move {
            match best_of(executor, base, &container.main, container.runs).await {
                Ok((run, score)) => {
                    tracing::debug!(
                        %strategy,
                        score = score.total(),
                        "automatic candidate finished"
                    );
                    Ok(Selection {
                        run,
                        score,
                        strategy,
                    })
                }
                Err(err) => {
                    tracing::warn!(%strategy, error = %err, "automatic candidate failed");
                    Err(err)
                }
            }
        }
    });

    let [stress, cluster, radial, spore] = candidates;
    let (stress, cluster, radial, spore) = join4(stress, cluster, radial, spore).await;
    [cluster, radial, spore]
        .into_iter()
        .fold(stress, |best, next| keep_better(best, next, |s| s.score.total()))
}
