#![allow(dead_code)]

use std::collections::HashMap;

use hifitime::Epoch;
use satplan::constants::Degree;
use satplan::ephemeris::{Ephemeris, EphemerisSource, Footprint, LookAngles};
use satplan::observers::ObservatorySite;
use satplan::window::ObservationWindow;
use satplan::PropagationError;

/// Scripted position of an object at one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Azimuth, elevation and sun zenith angle.
    At(Degree, Degree, Degree),
    /// The position cannot be resolved.
    Fault,
    /// The propagator panics.
    Panic,
}

/// Ephemeris replaying a script, one entry per window step.
///
/// Entry 0 is the pre-start query, entry `i + 1` the `i`-th epoch of the window.
#[derive(Debug, Clone)]
pub struct ScriptedEphemeris {
    start: Epoch,
    interval: f64,
    steps: Vec<Step>,
}

impl ScriptedEphemeris {
    pub fn new(window: &ObservationWindow, steps: Vec<Step>) -> Self {
        ScriptedEphemeris {
            start: window.start(),
            interval: window.interval_seconds(),
            steps,
        }
    }

    fn at(&self, t: &Epoch) -> Step {
        let index = ((*t - self.start).to_seconds() / self.interval).round() as i64 + 1;
        usize::try_from(index)
            .ok()
            .and_then(|i| self.steps.get(i).copied())
            .unwrap_or(Step::Fault)
    }

    fn resolve(&self, t: &Epoch) -> Result<(Degree, Degree, Degree), PropagationError> {
        match self.at(t) {
            Step::At(az, el, zenith) => Ok((az, el, zenith)),
            Step::Fault => Err(PropagationError::Numerical(format!("no position at {t}"))),
            Step::Panic => panic!("propagator exploded at {t}"),
        }
    }
}

impl Ephemeris for ScriptedEphemeris {
    fn footprint(&self, t: &Epoch) -> Result<Footprint, PropagationError> {
        self.resolve(t)?;
        Ok(Footprint {
            longitude: -70.0,
            latitude: -30.0,
            altitude: 1200.0,
        })
    }

    fn look(&self, t: &Epoch, _site: &ObservatorySite) -> Result<LookAngles, PropagationError> {
        let (azimuth, elevation, _) = self.resolve(t)?;
        Ok(LookAngles { azimuth, elevation })
    }

    fn sun_zenith(&self, t: &Epoch, _site: &ObservatorySite) -> Result<Degree, PropagationError> {
        Ok(self.resolve(t)?.2)
    }
}

/// Source of scripted objects; unknown names fail with [`PropagationError::UnknownObject`].
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    objects: HashMap<String, ScriptedEphemeris>,
}

impl ScriptedSource {
    pub fn with(mut self, object: &str, ephemeris: ScriptedEphemeris) -> Self {
        self.objects.insert(object.to_string(), ephemeris);
        self
    }
}

impl EphemerisSource for ScriptedSource {
    type Ephemeris = ScriptedEphemeris;

    fn ephemeris(&self, object: &str) -> Result<ScriptedEphemeris, PropagationError> {
        self.objects
            .get(object)
            .cloned()
            .ok_or_else(|| PropagationError::UnknownObject(object.to_string()))
    }
}

pub fn la_silla() -> ObservatorySite {
    satplan::observers::observatories::lookup("lasilla").unwrap()
}

/// Sun inside the default twilight band.
pub const DARK: Degree = 105.0;
/// Sun above the horizon.
pub const DAY: Degree = 60.0;
