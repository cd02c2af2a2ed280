//! # Observation planner
//!
//! Runs one [`VisibilityEngine`](crate::visibility::engine::VisibilityEngine) per object on
//! a fixed-size [`rayon`] pool and merges the outcomes into an [`ObservationReport`].
//!
//! ## Concurrency model
//! - Site, constraints, window and ephemeris source are shared by reference, read-only.
//! - Each object is computed independently, with its own engine; there is no shared
//!   mutable state and no locking.
//! - Results are aggregated only after every object has been computed.
//! - A panic while computing one object is caught at the worker boundary and turns
//!   that object into a failure; the other objects are unaffected.
//!
//! ## Progress
//! With the `progress` feature, an `indicatif` bar tracks the completed objects.
use std::panic::{catch_unwind, AssertUnwindSafe};

#[cfg(feature = "progress")]
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use crate::constants::ObjectId;
use crate::ephemeris::EphemerisSource;
use crate::observers::ObservatorySite;
use crate::report::{ObservationReport, ResultAggregator};
use crate::satplan_errors::SatPlanError;
use crate::visibility::engine::compute_visibility;
use crate::visibility::predicate::ObservationConstraints;
use crate::visibility::ObjectVisibilityResult;
use crate::window::ObservationWindow;

/// Run-wide inputs of a visibility computation.
#[derive(Debug, Clone)]
pub struct ObservationPlanner {
    site: ObservatorySite,
    constraints: ObservationConstraints,
    window: ObservationWindow,
    workers: Option<usize>,
    aggregator: ResultAggregator,
}

impl ObservationPlanner {
    pub fn new(
        site: ObservatorySite,
        constraints: ObservationConstraints,
        window: ObservationWindow,
    ) -> Self {
        ObservationPlanner {
            site,
            constraints,
            window,
            workers: None,
            aggregator: ResultAggregator::new(),
        }
    }

    /// Size of the worker pool; `None` (default) uses one worker per logical CPU.
    pub fn with_workers(mut self, workers: Option<usize>) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_aggregator(mut self, aggregator: ResultAggregator) -> Self {
        self.aggregator = aggregator;
        self
    }

    pub fn site(&self) -> &ObservatorySite {
        &self.site
    }

    pub fn constraints(&self) -> &ObservationConstraints {
        &self.constraints
    }

    pub fn window(&self) -> &ObservationWindow {
        &self.window
    }

    /// Compute one object, converting a panic into a failure.
    pub fn compute_one<S>(&self, source: &S, object: &str) -> ObjectVisibilityResult
    where
        S: EphemerisSource + ?Sized,
    {
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            compute_visibility(object, source, &self.site, &self.constraints, &self.window)
        }));

        outcome.unwrap_or_else(|payload| {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            warn!("{object}: computation panicked, marked as failed ({reason})");
            ObjectVisibilityResult::Failed {
                object: object.to_string(),
                reason,
            }
        })
    }

    /// Compute every object on the worker pool, in no particular order.
    ///
    /// Return
    /// ----------
    /// * One result per entry of `objects`, or [`SatPlanError::WorkerPool`] when the
    ///   pool cannot be built.
    pub fn compute_all<S>(
        &self,
        source: &S,
        objects: &[ObjectId],
    ) -> Result<Vec<ObjectVisibilityResult>, SatPlanError>
    where
        S: EphemerisSource + ?Sized,
    {
        let mut builder = ThreadPoolBuilder::new();
        if let Some(n) = self.workers {
            builder = builder.num_threads(n);
        }
        let pool = builder.build()?;

        info!(
            "{} object(s) from {} to {} every {} s, {} worker(s)",
            objects.len(),
            self.window.start(),
            self.window.end(),
            self.window.interval_seconds(),
            pool.current_num_threads()
        );

        #[cfg(feature = "progress")]
        let pb = {
            let pb = ProgressBar::new(objects.len().max(1) as u64);
            if let Ok(style) = ProgressStyle::with_template(
                "{bar:40.cyan/blue} {pos}/{len} ({percent:>3}%) | {per_sec} | ETA {eta_precise}",
            ) {
                pb.set_style(style);
            }
            pb
        };

        let results = pool.install(|| {
            objects
                .par_iter()
                .map(|object| {
                    let result = self.compute_one(source, object);
                    #[cfg(feature = "progress")]
                    pb.inc(1);
                    result
                })
                .collect::<Vec<_>>()
        });

        #[cfg(feature = "progress")]
        pb.finish_and_clear();

        Ok(results)
    }

    /// Compute every object and aggregate the results.
    pub fn plan<S>(&self, source: &S, objects: &[ObjectId]) -> Result<ObservationReport, SatPlanError>
    where
        S: EphemerisSource + ?Sized,
    {
        let results = self.compute_all(source, objects)?;
        Ok(self.aggregator.aggregate(results))
    }
}
