//! Apparent angular speed of an object between two consecutive samples.
//!
//! ```text
//! rate = sqrt((Δaz · 3600)² + (Δel · 3600)²) / Δt      [arcsec / s]
//! ```
//!
//! The azimuth difference is not wrapped: a pass crossing north (359° → 1°) reports a
//! 358° step for that sample.
use crate::constants::{ArcSecPerSec, Seconds, ARCSEC_PER_DEG};
use crate::ephemeris::LookAngles;

/// Rate estimator bound to the constant sampling interval of a window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngularRateEstimator {
    interval: Seconds,
}

impl AngularRateEstimator {
    /// `interval` is the sampling step in seconds; it is validated upstream by
    /// [`ObservationWindow`](crate::window::ObservationWindow) and is always positive.
    pub fn new(interval: Seconds) -> Self {
        AngularRateEstimator { interval }
    }

    pub fn interval(&self) -> Seconds {
        self.interval
    }

    /// Angular speed from `previous` to `current` in arcseconds per second.
    pub fn rate(&self, previous: &LookAngles, current: &LookAngles) -> ArcSecPerSec {
        let d_az = (current.azimuth - previous.azimuth) * ARCSEC_PER_DEG;
        let d_el = (current.elevation - previous.elevation) * ARCSEC_PER_DEG;
        d_az.hypot(d_el) / self.interval
    }
}

#[cfg(test)]
mod angular_rate_test {
    use super::*;
    use approx::assert_relative_eq;

    fn look(azimuth: f64, elevation: f64) -> LookAngles {
        LookAngles {
            azimuth,
            elevation,
        }
    }

    #[test]
    fn test_rate_value() {
        let est = AngularRateEstimator::new(60.0);
        // 0.3° az and 0.4° el in one minute: 0.5° = 1800" over 60 s
        let r = est.rate(&look(10.0, 40.0), &look(10.3, 40.4));
        assert_relative_eq!(r, 30.0, epsilon = 1e-9);
        assert_eq!(est.rate(&look(10.0, 40.0), &look(10.0, 40.0)), 0.0);
    }

    #[test]
    fn test_rate_symmetry_and_scaling() {
        let est = AngularRateEstimator::new(10.0);
        let a = est.rate(&look(0.0, 0.0), &look(1.5, 0.25));
        let b = est.rate(&look(0.0, 0.0), &look(0.25, 1.5));
        assert_relative_eq!(a, b, epsilon = 1e-9);

        let slow = AngularRateEstimator::new(20.0);
        let c = slow.rate(&look(0.0, 0.0), &look(1.5, 0.25));
        assert_relative_eq!(c * 2.0, a, epsilon = 1e-9);
    }

    #[test]
    fn test_azimuth_wrap_is_not_corrected() {
        let est = AngularRateEstimator::new(1.0);
        let r = est.rate(&look(359.0, 45.0), &look(1.0, 45.0));
        assert_relative_eq!(r, 358.0 * 3600.0, epsilon = 1e-6);
    }
}
