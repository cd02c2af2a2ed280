//! # Visibility determination
//!
//! Per-object time-stepped sampling of an [`ObservationWindow`](crate::window::ObservationWindow).
//!
//! ## Components
//! * [`predicate::ObservationConstraints`] – elevation and twilight test of one instant.
//! * [`angular_rate::AngularRateEstimator`] – apparent speed between consecutive positions.
//! * [`engine::VisibilityEngine`] – the sampling state machine of one object.
//!
//! ## Outputs
//! One [`ObjectVisibilityResult`] per object, holding the accepted [`VisibilitySample`]s
//! in time order, or a failure marker when the object could not be propagated at all.
pub mod angular_rate;
pub mod engine;
pub mod predicate;

use hifitime::Epoch;

use crate::constants::{ArcSecPerSec, Degree, Hours, Kilometer, ObjectId};
use crate::conversion::{Dms, Hms};

/// One accepted step of the sampling loop.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilitySample {
    /// Sampled instant (UTC).
    pub timestamp: Epoch,
    /// Subsatellite longitude, east positive.
    pub sat_lon: Degree,
    /// Subsatellite latitude.
    pub sat_lat: Degree,
    pub sat_alt: Kilometer,
    pub azimuth: Degree,
    pub elevation: Degree,
    /// Topocentric right ascension of the object.
    pub ra: Hms,
    /// Topocentric declination of the object, sign kept for `-0°`.
    pub dec: Dms,
    pub sun_ra: Hours,
    pub sun_dec: Degree,
    pub sun_zenith: Degree,
    pub angular_rate: ArcSecPerSec,
}

/// Outcome of the sampling of one object.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectVisibilityResult {
    /// The object could be propagated; `samples` is time ordered and empty when the
    /// object is never observable inside the window.
    Computed {
        object: ObjectId,
        samples: Vec<VisibilitySample>,
    },
    /// The object could not be propagated at the start of the window.
    /// `reason` is a diagnostic message, never written to the tables.
    Failed { object: ObjectId, reason: String },
}

impl ObjectVisibilityResult {
    pub fn object(&self) -> &str {
        match self {
            ObjectVisibilityResult::Computed { object, .. }
            | ObjectVisibilityResult::Failed { object, .. } => object,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ObjectVisibilityResult::Failed { .. })
    }

    /// Accepted samples; empty for a failed object.
    pub fn samples(&self) -> &[VisibilitySample] {
        match self {
            ObjectVisibilityResult::Computed { samples, .. } => samples,
            ObjectVisibilityResult::Failed { .. } => &[],
        }
    }
}
