//! SGP4/SDP4 backend of the [`Ephemeris`] trait.
//!
//! Elements are propagated with the [`sgp4`] crate into the TEME frame, rotated into the
//! Earth-fixed frame by GMST, then projected on the WGS-84 ellipsoid (footprint) or onto
//! the local horizon of the site (look angles). The sky queries use the analytic
//! defaults of the trait.
use hifitime::Epoch;
use nalgebra::Vector3;
use sgp4::{Constants, Elements};

use crate::constants::{Kilometer, ObjectId};
use crate::observers::ObservatorySite;
use crate::satplan_errors::PropagationError;
use crate::time::epoch_to_naive_utc;

use super::sky::{geodetic_from_ecef, look_from_ecef, teme_to_ecef};
use super::{Ephemeris, Footprint, LookAngles};

/// Propagator for one object initialized from its mean elements.
pub struct Sgp4Ephemeris {
    object: ObjectId,
    elements: Elements,
    constants: Constants,
}

impl Sgp4Ephemeris {
    /// Initialize the propagator from parsed elements.
    ///
    /// Return
    /// ----------
    /// * [`PropagationError::InvalidElements`] when SGP4 rejects the elements
    ///   (e.g. eccentricity out of range).
    pub fn from_elements(
        object: impl Into<ObjectId>,
        elements: Elements,
    ) -> Result<Self, PropagationError> {
        let object = object.into();
        let constants =
            Constants::from_elements(&elements).map_err(|e| PropagationError::InvalidElements {
                object: object.clone(),
                reason: e.to_string(),
            })?;
        Ok(Sgp4Ephemeris {
            object,
            elements,
            constants,
        })
    }

    /// Parse a two-line element set and initialize the propagator.
    pub fn from_tle(
        object: impl Into<ObjectId>,
        line1: &str,
        line2: &str,
    ) -> Result<Self, PropagationError> {
        let object = object.into();
        let elements = Elements::from_tle(Some(object.clone()), line1.as_bytes(), line2.as_bytes())
            .map_err(|e| PropagationError::InvalidElements {
                object: object.clone(),
                reason: e.to_string(),
            })?;
        Self::from_elements(object, elements)
    }

    pub fn object(&self) -> &str {
        &self.object
    }

    pub fn elements(&self) -> &Elements {
        &self.elements
    }

    /// Position in the TEME frame at `t` (km).
    pub fn teme_position(&self, t: &Epoch) -> Result<Vector3<Kilometer>, PropagationError> {
        let naive = epoch_to_naive_utc(t)
            .ok_or_else(|| PropagationError::TimeOutOfRange(format!("{}: {t}", self.object)))?;
        let minutes = self
            .elements
            .datetime_to_minutes_since_epoch(&naive)
            .map_err(|e| PropagationError::TimeOutOfRange(format!("{}: {e:?}", self.object)))?;
        let prediction = self
            .constants
            .propagate(minutes)
            .map_err(|e| PropagationError::Numerical(format!("{}: {e}", self.object)))?;

        let r = Vector3::from(prediction.position);
        if !r.iter().all(|c| c.is_finite()) {
            return Err(PropagationError::Numerical(format!(
                "{}: non-finite position at {t}",
                self.object
            )));
        }
        Ok(r)
    }

    /// Earth-fixed position at `t` (km). A position below the ellipsoid is a decayed orbit.
    pub fn ecef_position(&self, t: &Epoch) -> Result<Vector3<Kilometer>, PropagationError> {
        let r = teme_to_ecef(t, &self.teme_position(t)?);
        if geodetic_from_ecef(&r).altitude < 0.0 {
            return Err(PropagationError::Decayed(format!("{} at {t}", self.object)));
        }
        Ok(r)
    }
}

impl Ephemeris for Sgp4Ephemeris {
    fn footprint(&self, t: &Epoch) -> Result<Footprint, PropagationError> {
        Ok(geodetic_from_ecef(&self.ecef_position(t)?))
    }

    fn look(&self, t: &Epoch, site: &ObservatorySite) -> Result<LookAngles, PropagationError> {
        Ok(look_from_ecef(site, &self.ecef_position(t)?))
    }
}

#[cfg(test)]
mod sgp4_backend_test {
    use super::*;

    const ISS_L1: &str = "1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927";
    const ISS_L2: &str = "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537";

    #[test]
    fn test_iss_footprint_near_epoch() {
        let iss = Sgp4Ephemeris::from_tle("ISS (ZARYA)", ISS_L1, ISS_L2).unwrap();
        let t = Epoch::from_gregorian_utc_hms(2008, 9, 20, 13, 0, 0);

        let fp = iss.footprint(&t).unwrap();
        assert!(fp.altitude > 300.0 && fp.altitude < 450.0, "{fp:?}");
        assert!(fp.latitude.abs() <= 52.0);
        assert!(fp.longitude > -180.0 && fp.longitude <= 180.0);

        let r = iss.teme_position(&t).unwrap();
        assert!(r.norm() > 6600.0 && r.norm() < 6850.0);
    }

    #[test]
    fn test_iss_look_angles_are_bounded() {
        let iss = Sgp4Ephemeris::from_tle("ISS (ZARYA)", ISS_L1, ISS_L2).unwrap();
        let site = ObservatorySite::new("La Silla", -29.2567, -70.73, 2347.0, 4.0).unwrap();
        let t = Epoch::from_gregorian_utc_hms(2008, 9, 20, 13, 0, 0);
        let look = iss.look(&t, &site).unwrap();
        assert!((0.0..360.0).contains(&look.azimuth));
        assert!((-90.0..=90.0).contains(&look.elevation));
    }

    #[test]
    fn test_malformed_elements() {
        let err = Sgp4Ephemeris::from_tle("broken", ISS_L1, "2 25544  garbage").err();
        assert!(matches!(
            err,
            Some(PropagationError::InvalidElements { object, .. }) if object == "broken"
        ));
    }
}
