use serde::Deserialize;

use crate::constants::{
    Degree, DEFAULT_MIN_ELEVATION, DEFAULT_SUN_ZENITH_LOWER, DEFAULT_SUN_ZENITH_UPPER,
};
use crate::satplan_errors::SatPlanError;

/// Observing constraints shared by every engine of a run.
///
/// An object is observable at an instant when it sits strictly above
/// `min_elevation` while the Sun zenith angle lies strictly inside
/// `(sun_zenith_lower, sun_zenith_upper)`, i.e. the object is lit and the
/// observatory is in twilight.
///
/// Fields
/// -----------------
/// * `min_elevation`: lowest satellite elevation considered observable (degrees).
/// * `sun_zenith_lower`: lower bound of the twilight band (degrees).
/// * `sun_zenith_upper`: upper bound of the twilight band (degrees).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "RawConstraints")]
pub struct ObservationConstraints {
    min_elevation: Degree,
    sun_zenith_lower: Degree,
    sun_zenith_upper: Degree,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConstraints {
    #[serde(default = "default_min_elevation")]
    min_elevation: Degree,
    #[serde(default = "default_sun_zenith_lower")]
    sun_zenith_lower: Degree,
    #[serde(default = "default_sun_zenith_upper")]
    sun_zenith_upper: Degree,
}

fn default_min_elevation() -> Degree {
    DEFAULT_MIN_ELEVATION
}

fn default_sun_zenith_lower() -> Degree {
    DEFAULT_SUN_ZENITH_LOWER
}

fn default_sun_zenith_upper() -> Degree {
    DEFAULT_SUN_ZENITH_UPPER
}

impl TryFrom<RawConstraints> for ObservationConstraints {
    type Error = SatPlanError;

    fn try_from(raw: RawConstraints) -> Result<Self, Self::Error> {
        ObservationConstraints::new(raw.min_elevation, raw.sun_zenith_lower, raw.sun_zenith_upper)
    }
}

impl ObservationConstraints {
    /// Build validated constraints.
    ///
    /// Return
    /// ----------
    /// * [`SatPlanError::InvalidConstraints`] if a bound is not finite or if
    ///   `sun_zenith_lower >= sun_zenith_upper`.
    pub fn new(
        min_elevation: Degree,
        sun_zenith_lower: Degree,
        sun_zenith_upper: Degree,
    ) -> Result<Self, SatPlanError> {
        if ![min_elevation, sun_zenith_lower, sun_zenith_upper]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(SatPlanError::InvalidConstraints(
                "every bound must be a finite number of degrees".into(),
            ));
        }
        if sun_zenith_lower >= sun_zenith_upper {
            return Err(SatPlanError::InvalidConstraints(format!(
                "sun zenith lower bound ({sun_zenith_lower}) must be below the upper bound ({sun_zenith_upper})"
            )));
        }
        Ok(ObservationConstraints {
            min_elevation,
            sun_zenith_lower,
            sun_zenith_upper,
        })
    }

    pub fn min_elevation(&self) -> Degree {
        self.min_elevation
    }

    pub fn sun_zenith_lower(&self) -> Degree {
        self.sun_zenith_lower
    }

    pub fn sun_zenith_upper(&self) -> Degree {
        self.sun_zenith_upper
    }

    /// Visibility test, strict on every bound.
    #[inline]
    pub fn is_visible(&self, elevation: Degree, sun_zenith: Degree) -> bool {
        elevation > self.min_elevation
            && sun_zenith > self.sun_zenith_lower
            && sun_zenith < self.sun_zenith_upper
    }
}

impl Default for ObservationConstraints {
    fn default() -> Self {
        ObservationConstraints {
            min_elevation: DEFAULT_MIN_ELEVATION,
            sun_zenith_lower: DEFAULT_SUN_ZENITH_LOWER,
            sun_zenith_upper: DEFAULT_SUN_ZENITH_UPPER,
        }
    }
}
