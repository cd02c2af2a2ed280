//! # Visibility engine
//!
//! Sampling state machine of **one** object over an [`ObservationWindow`].
//!
//! ```text
//!   Init ──(pre-start look angles)──► Stepping ──► Done
//!    │                                  │  ▲
//!    └──── fault ──► Failed             └──┘ one step per window epoch
//! ```
//!
//! * **Init** resolves the object through the [`EphemerisSource`] and queries its look
//!   angles one interval before the window opens. Any fault there fails the object.
//! * **Stepping** visits every epoch of the window. A step whose position cannot be
//!   resolved is skipped and leaves the previous position untouched. Otherwise the
//!   visibility test runs, a sample is emitted when it passes, and the current position
//!   becomes the previous one, visible or not.
//! * **Done** returns the accumulated samples, possibly none.
//!
//! Every invocation builds its own engine: the previous position is private state that
//! never outlives one object.
use hifitime::Epoch;
use log::{debug, warn};

use crate::conversion::{dec_dms, ra_hms, ra_rad_to_hours};
use crate::ephemeris::{Ephemeris, EphemerisSource, Footprint, LookAngles};
use crate::observers::ObservatorySite;
use crate::satplan_errors::PropagationError;
use crate::visibility::angular_rate::AngularRateEstimator;
use crate::visibility::predicate::ObservationConstraints;
use crate::visibility::{ObjectVisibilityResult, VisibilitySample};
use crate::window::ObservationWindow;

/// What happened at one sampled epoch.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// The position could not be resolved; the previous position is kept.
    Skipped(PropagationError),
    /// The position was resolved but a sky query failed; no sample is emitted.
    Incomplete(PropagationError),
    /// The object is not observable at this epoch.
    Hidden,
    /// The object is observable.
    Visible(Box<VisibilitySample>),
}

/// Engine of one object in the `Stepping` state.
pub struct VisibilityEngine<'a, E: Ephemeris> {
    object: &'a str,
    ephemeris: E,
    site: &'a ObservatorySite,
    constraints: &'a ObservationConstraints,
    window: &'a ObservationWindow,
    estimator: AngularRateEstimator,
    previous: LookAngles,
}

impl<'a, E: Ephemeris> VisibilityEngine<'a, E> {
    /// `Init`: resolve the object and seed the previous position at `window.pre_start()`.
    ///
    /// Return
    /// ----------
    /// * The engine ready to step, or the fault that fails the object.
    pub fn init<S>(
        object: &'a str,
        source: &S,
        site: &'a ObservatorySite,
        constraints: &'a ObservationConstraints,
        window: &'a ObservationWindow,
    ) -> Result<Self, PropagationError>
    where
        S: EphemerisSource<Ephemeris = E> + ?Sized,
    {
        let ephemeris = source.ephemeris(object)?;
        let previous = ephemeris.look(&window.pre_start(), site)?;

        Ok(VisibilityEngine {
            object,
            ephemeris,
            site,
            constraints,
            window,
            estimator: AngularRateEstimator::new(window.interval_seconds()),
            previous,
        })
    }

    pub fn object(&self) -> &str {
        self.object
    }

    /// Look angles of the last resolved position.
    pub fn previous(&self) -> &LookAngles {
        &self.previous
    }

    /// Process one epoch.
    pub fn step(&mut self, t: Epoch) -> StepOutcome {
        let resolved = self
            .ephemeris
            .footprint(&t)
            .and_then(|fp| self.ephemeris.look(&t, self.site).map(|look| (fp, look)));

        let (footprint, current) = match resolved {
            Ok(position) => position,
            Err(e) => return StepOutcome::Skipped(e),
        };

        let outcome = match self.evaluate(t, footprint, &current) {
            Ok(Some(sample)) => StepOutcome::Visible(Box::new(sample)),
            Ok(None) => StepOutcome::Hidden,
            Err(e) => StepOutcome::Incomplete(e),
        };
        self.previous = current;
        outcome
    }

    fn evaluate(
        &self,
        t: Epoch,
        footprint: Footprint,
        current: &LookAngles,
    ) -> Result<Option<VisibilitySample>, PropagationError> {
        let (sun_ra, sun_dec) = self.ephemeris.sun_ra_dec(&t)?;
        let sun_zenith = self.ephemeris.sun_zenith(&t, self.site)?;

        if !self
            .constraints
            .is_visible(current.elevation, sun_zenith)
        {
            return Ok(None);
        }

        let angular_rate = self.estimator.rate(&self.previous, current);
        let (ra, dec) =
            self.ephemeris
                .radec_of(&t, self.site, current.azimuth, current.elevation)?;

        Ok(Some(VisibilitySample {
            timestamp: t,
            sat_lon: footprint.longitude,
            sat_lat: footprint.latitude,
            sat_alt: footprint.altitude,
            azimuth: current.azimuth,
            elevation: current.elevation,
            ra: ra_hms(ra),
            dec: dec_dms(dec),
            sun_ra: ra_rad_to_hours(sun_ra),
            sun_dec: sun_dec.to_degrees(),
            sun_zenith,
            angular_rate,
        }))
    }

    /// `Stepping` until the window is exhausted, then `Done`.
    pub fn run(mut self) -> Vec<VisibilitySample> {
        let window = self.window;
        let mut samples = Vec::new();
        for t in window.epochs() {
            match self.step(t) {
                StepOutcome::Visible(sample) => samples.push(*sample),
                StepOutcome::Hidden => {}
                StepOutcome::Skipped(e) => {
                    debug!("{}: step {t} skipped: {e}", self.object);
                }
                StepOutcome::Incomplete(e) => {
                    debug!("{}: step {t} dropped: {e}", self.object);
                }
            }
        }
        samples
    }
}

/// Run the full state machine for one object.
///
/// Arguments
/// -----------------
/// * `object`: identifier understood by `source`.
/// * `source`: resolves the identifier into an [`Ephemeris`].
/// * `site`, `constraints`, `window`: run-wide, read-only inputs.
///
/// Return
/// ----------
/// * [`ObjectVisibilityResult::Computed`] with the accepted samples in time order, or
///   [`ObjectVisibilityResult::Failed`] when initialization faulted.
pub fn compute_visibility<S>(
    object: &str,
    source: &S,
    site: &ObservatorySite,
    constraints: &ObservationConstraints,
    window: &ObservationWindow,
) -> ObjectVisibilityResult
where
    S: EphemerisSource + ?Sized,
{
    match VisibilityEngine::init(object, source, site, constraints, window) {
        Ok(engine) => ObjectVisibilityResult::Computed {
            object: object.to_string(),
            samples: engine.run(),
        },
        Err(e) => {
            warn!("{object}: cannot be propagated, marked as failed ({e})");
            ObjectVisibilityResult::Failed {
                object: object.to_string(),
                reason: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod engine_test {
    use super::*;
    use hifitime::Unit;

    /// Elevation grows by one degree per minute from the window start; the position
    /// cannot be resolved during minute 3. The sun cannot be placed during `sun_fault`.
    struct Rising {
        start: Epoch,
        sun_fault: Option<f64>,
    }

    impl Rising {
        fn minutes(&self, t: &Epoch) -> f64 {
            ((*t - self.start).to_seconds() / 60.0).round()
        }
    }

    impl Ephemeris for Rising {
        fn footprint(&self, _t: &Epoch) -> Result<Footprint, PropagationError> {
            Ok(Footprint {
                longitude: 0.0,
                latitude: 0.0,
                altitude: 500.0,
            })
        }

        fn look(&self, t: &Epoch, _site: &ObservatorySite) -> Result<LookAngles, PropagationError> {
            let minutes = self.minutes(t);
            if minutes == 3.0 {
                return Err(PropagationError::Numerical("minute 3".into()));
            }
            Ok(LookAngles {
                azimuth: 90.0,
                elevation: 40.0 + minutes,
            })
        }

        fn sun_zenith(&self, t: &Epoch, _site: &ObservatorySite) -> Result<f64, PropagationError> {
            if self.sun_fault == Some(self.minutes(t)) {
                return Err(PropagationError::Numerical("sun".into()));
            }
            Ok(100.0)
        }
    }

    struct Source {
        start: Epoch,
    }

    impl EphemerisSource for Source {
        type Ephemeris = Rising;

        fn ephemeris(&self, object: &str) -> Result<Rising, PropagationError> {
            match object {
                "rising" => Ok(Rising {
                    start: self.start,
                    sun_fault: None,
                }),
                "hazy" => Ok(Rising {
                    start: self.start,
                    sun_fault: Some(1.0),
                }),
                _ => Err(PropagationError::UnknownObject(object.into())),
            }
        }
    }

    fn setup() -> (ObservatorySite, ObservationConstraints, ObservationWindow) {
        let start = Epoch::from_gregorian_utc_hms(2021, 11, 26, 0, 0, 0);
        (
            ObservatorySite::new("La Silla", -29.2567, -70.73, 2347.0, 4.0).unwrap(),
            ObservationConstraints::default(),
            ObservationWindow::new(start, start + Unit::Minute * 6.0, 60.0).unwrap(),
        )
    }

    #[test]
    fn test_skipped_step_keeps_previous() {
        let (site, constraints, window) = setup();
        let source = Source {
            start: window.start(),
        };
        let mut engine =
            VisibilityEngine::init("rising", &source, &site, &constraints, &window).unwrap();
        assert_eq!(engine.previous().elevation, 39.0);

        let epochs: Vec<Epoch> = window.epochs().collect();
        for t in &epochs[..3] {
            assert!(matches!(engine.step(*t), StepOutcome::Visible(_)));
        }
        assert!(matches!(engine.step(epochs[3]), StepOutcome::Skipped(_)));
        assert_eq!(engine.previous().elevation, 42.0);

        match engine.step(epochs[4]) {
            // two degrees of elevation since the last resolved position
            StepOutcome::Visible(sample) => assert_eq!(sample.angular_rate, 120.0),
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn test_incomplete_step_still_moves_previous() {
        let (site, constraints, window) = setup();
        let source = Source {
            start: window.start(),
        };
        let mut engine =
            VisibilityEngine::init("hazy", &source, &site, &constraints, &window).unwrap();

        let epochs: Vec<Epoch> = window.epochs().collect();
        assert!(matches!(engine.step(epochs[0]), StepOutcome::Visible(_)));
        assert!(matches!(engine.step(epochs[1]), StepOutcome::Incomplete(_)));
        assert_eq!(engine.previous().elevation, 41.0);

        match engine.step(epochs[2]) {
            // one degree since the position resolved at minute 1
            StepOutcome::Visible(sample) => assert_eq!(sample.angular_rate, 60.0),
            other => panic!("unexpected outcome {other:?}"),
        }

        let result = compute_visibility("hazy", &source, &site, &constraints, &window);
        let rates: Vec<f64> = result.samples().iter().map(|s| s.angular_rate).collect();
        // minutes 0, 2, 4 and 5; the minute 3 position is never resolved
        assert_eq!(rates, [60.0, 60.0, 120.0, 60.0]);
    }

    #[test]
    fn test_run_and_failure() {
        let (site, constraints, window) = setup();
        let source = Source {
            start: window.start(),
        };

        let result = compute_visibility("rising", &source, &site, &constraints, &window);
        assert!(!result.is_failed());
        assert_eq!(result.samples().len(), 5);
        // first step measured against the pre-start position
        assert_eq!(result.samples()[0].angular_rate, 60.0);

        let result = compute_visibility("sinking", &source, &site, &constraints, &window);
        assert_eq!(
            result,
            ObjectVisibilityResult::Failed {
                object: "sinking".into(),
                reason: "Object not found in the ephemeris source: sinking".into(),
            }
        );
    }
}
