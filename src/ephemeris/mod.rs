//! # Ephemeris collaborators
//!
//! The visibility engine never propagates an orbit itself. It talks to an [`Ephemeris`]
//! for one object, obtained from an [`EphemerisSource`] (a TLE catalog, a scripted stub
//! in tests, …). Every query is fallible with [`PropagationError`]; how the engine reacts
//! to a fault depends on when it happens (see
//! [`VisibilityEngine`](crate::visibility::engine::VisibilityEngine)).
//!
//! ## Queries
//!
//! | Method         | Result                                         |
//! |----------------|------------------------------------------------|
//! | `footprint`    | subsatellite longitude/latitude (°), altitude (km) |
//! | `look`         | topocentric azimuth/elevation (°) from a site  |
//! | `sun_ra_dec`   | apparent Sun right ascension/declination (rad) |
//! | `sun_zenith`   | Sun zenith angle at a site (°)                 |
//! | `radec_of`     | topocentric RA/DEC (rad) of an az/el direction |
//!
//! Only `footprint` and `look` depend on the object. The three sky queries have default
//! implementations built on the analytic routines of [`sky`], so a backend only needs to
//! provide the orbit.
//!
//! ## Backends
//! * [`sgp4_backend::Sgp4Ephemeris`] – SGP4/SDP4 propagation of two-line elements.
pub mod sgp4_backend;
pub mod sky;

use hifitime::Epoch;

use crate::constants::{Degree, Kilometer, Radian};
use crate::observers::ObservatorySite;
use crate::satplan_errors::PropagationError;

/// Point of the Earth surface directly below an object, and its height above it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    /// Geodetic longitude, east positive, in `(-180, 180]`.
    pub longitude: Degree,
    /// Geodetic latitude.
    pub latitude: Degree,
    /// Height above the WGS-84 ellipsoid.
    pub altitude: Kilometer,
}

/// Topocentric direction of an object seen from a site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookAngles {
    /// Measured from north through east, in `[0, 360)`.
    pub azimuth: Degree,
    pub elevation: Degree,
}

/// Position queries for a single orbiting object.
pub trait Ephemeris {
    fn footprint(&self, t: &Epoch) -> Result<Footprint, PropagationError>;

    fn look(&self, t: &Epoch, site: &ObservatorySite) -> Result<LookAngles, PropagationError>;

    fn sun_ra_dec(&self, t: &Epoch) -> Result<(Radian, Radian), PropagationError> {
        Ok(sky::sun_ra_dec(t))
    }

    fn sun_zenith(&self, t: &Epoch, site: &ObservatorySite) -> Result<Degree, PropagationError> {
        Ok(sky::sun_zenith(t, site))
    }

    /// Topocentric right ascension and declination of the direction `(azimuth, elevation)`.
    fn radec_of(
        &self,
        t: &Epoch,
        site: &ObservatorySite,
        azimuth: Degree,
        elevation: Degree,
    ) -> Result<(Radian, Radian), PropagationError> {
        Ok(sky::radec_of(t, site, azimuth, elevation))
    }
}

/// Resolves object identifiers into [`Ephemeris`] values.
///
/// Shared read-only by every worker of a run, hence `Sync`.
pub trait EphemerisSource: Sync {
    type Ephemeris: Ephemeris;

    /// Build the ephemeris of `object`.
    ///
    /// Return
    /// ----------
    /// * [`PropagationError::UnknownObject`] when the source does not know the object,
    ///   [`PropagationError::InvalidElements`] when its elements cannot be used.
    fn ephemeris(&self, object: &str) -> Result<Self::Ephemeris, PropagationError>;
}
