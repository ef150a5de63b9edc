//! Parallel evaluation over parameter points.
//!
//! Each point gets its own [`SpectrumEvaluator`], so no mutable state is
//! shared between threads. Results keep the order of the input points and
//! failures are reported per point.

use htt_core::Result;
use rayon::prelude::*;

use crate::evaluator::SpectrumEvaluator;
use crate::templates::SignalTemplates;

/// Build an evaluator for every point and apply `analyse` to it, in parallel.
pub fn scan_parallel<P, T, B, F>(points: &[P], build: B, analyse: F) -> Vec<Result<T>>
where
    P: Sync,
    T: Send,
    B: Fn(&P) -> Result<SpectrumEvaluator> + Sync,
    F: Fn(&mut SpectrumEvaluator) -> Result<T> + Sync,
{
    log::info!("scanning {} parameter points", points.len());

    let results: Vec<Result<T>> = points
        .par_iter()
        .map(|point| {
            let mut evaluator = build(point)?;
            analyse(&mut evaluator)
        })
        .collect();

    let n_failed = results.iter().filter(|r| r.is_err()).count();
    if n_failed > 0 {
        log::warn!("{n_failed} of {} parameter points failed", points.len());
    }
    log::info!("scan finished");
    results
}

/// Signal templates with scale variations for every point.
pub fn scan_templates<P, B>(points: &[P], build: B, edges: &[f64]) -> Vec<Result<SignalTemplates>>
where
    P: Sync,
    B: Fn(&P) -> Result<SpectrumEvaluator> + Sync,
{
    scan_parallel(points, build, |evaluator| SignalTemplates::build(evaluator, edges))
}
