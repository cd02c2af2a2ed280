//! # Observatory sites
//!
//! This module separates the two shapes a site takes during a run:
//!
//! - [`RawSite`]: coordinates exactly as found in an observatory table or a configuration
//!   file. Longitudes are **positive west** of Greenwich and angles may be written as
//!   decimal degrees or as `[deg, min, sec]` component lists with independent signs.
//! - [`ObservatorySite`]: canonical decimal degrees, **east-positive** longitude,
//!   validated ranges. It can only be obtained through [`RawSite::normalize`] (or the
//!   already-canonical [`ObservatorySite::new`]), so a canonical site can never be
//!   normalized a second time.
//!
//! ## Longitude remapping
//!
//! ```text
//! raw (west-positive)       canonical (east-positive)
//!   70.73              ->    -70.73
//!  210.9757            ->    149.0243   (360 - raw when raw > 180)
//! ```
//!
//! ## See also
//! ------------
//! * [`observatories`] – Built-in table of professional observatories as [`RawSite`]s.
//! * [`crate::conversion::sexagesimal_to_deg`] – Component list collapse.
pub mod observatories;

use ordered_float::NotNan;
use serde::Deserialize;

use crate::constants::{Degree, Meter};
use crate::conversion::sexagesimal_to_deg;
use crate::satplan_errors::SatPlanError;

/// An angle as written in a raw observatory description.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawCoordinate {
    /// Decimal degrees.
    Decimal(f64),
    /// `[deg]`, `[deg, min]` or `[deg, min, sec]`.
    Sexagesimal(Vec<f64>),
}

impl RawCoordinate {
    /// Collapse to decimal degrees, keeping the raw sign convention.
    pub fn to_degrees(&self) -> Option<Degree> {
        match self {
            RawCoordinate::Decimal(v) if v.is_finite() => Some(*v),
            RawCoordinate::Decimal(_) => None,
            RawCoordinate::Sexagesimal(components) => sexagesimal_to_deg(components),
        }
    }
}

impl From<f64> for RawCoordinate {
    fn from(v: f64) -> Self {
        RawCoordinate::Decimal(v)
    }
}

impl From<&[f64]> for RawCoordinate {
    fn from(v: &[f64]) -> Self {
        RawCoordinate::Sexagesimal(v.to_vec())
    }
}

/// An observatory as described in a raw table: west-positive longitude,
/// possibly sexagesimal angles, UTC offset in hours west of Greenwich.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawSite {
    pub name: String,
    pub longitude: RawCoordinate,
    pub latitude: RawCoordinate,
    /// Meters above sea level.
    pub altitude: Meter,
    /// Hours added to local civil time to obtain UTC.
    #[serde(alias = "tz")]
    pub utc_offset: f64,
}

impl RawSite {
    /// Normalize into a canonical [`ObservatorySite`].
    ///
    /// Both angles are collapsed to decimal degrees; the longitude is then remapped
    /// from west-positive to east-positive: `360 − lon` when `lon > 180`, `−lon` otherwise.
    ///
    /// Return
    /// ----------
    /// * The canonical site, or [`SatPlanError::InvalidSite`] if a coordinate is malformed
    ///   or out of range once normalized.
    pub fn normalize(&self) -> Result<ObservatorySite, SatPlanError> {
        let lon_west = self.longitude.to_degrees().ok_or_else(|| {
            SatPlanError::InvalidSite(format!("{}: malformed longitude", self.name))
        })?;
        let latitude = self.latitude.to_degrees().ok_or_else(|| {
            SatPlanError::InvalidSite(format!("{}: malformed latitude", self.name))
        })?;

        let longitude = if lon_west > 180.0 {
            360.0 - lon_west
        } else {
            -lon_west
        };

        ObservatorySite::new(
            self.name.clone(),
            latitude,
            longitude,
            self.altitude,
            self.utc_offset,
        )
    }
}

/// Canonical, validated observatory site.
///
/// Units
/// -----
/// * `latitude`: degrees, north positive, in `[-90, 90]`.
/// * `longitude`: degrees, east positive, in `(-180, 180]`.
/// * `altitude`: meters above sea level.
/// * `utc_offset`: hours added to local civil time to obtain UTC.
///
/// Immutable once built; shared by reference with every engine of a run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObservatorySite {
    name: String,
    latitude: NotNan<f64>,
    longitude: NotNan<f64>,
    altitude: NotNan<f64>,
    utc_offset: NotNan<f64>,
}

impl ObservatorySite {
    /// Build a site from values that are **already canonical** (east-positive longitude).
    ///
    /// A longitude of exactly `-180` is folded to `180`.
    pub fn new(
        name: impl Into<String>,
        latitude: Degree,
        longitude: Degree,
        altitude: Meter,
        utc_offset: f64,
    ) -> Result<Self, SatPlanError> {
        let name = name.into();
        let invalid = |what: &str| SatPlanError::InvalidSite(format!("{name}: {what}"));

        let not_nan = |v: f64, what: &str| {
            if v.is_finite() {
                NotNan::new(v).map_err(|_| invalid(what))
            } else {
                Err(invalid(what))
            }
        };

        if !(-90.0..=90.0).contains(&latitude) {
            return Err(invalid("latitude outside [-90, 90]"));
        }
        let longitude = if longitude == -180.0 { 180.0 } else { longitude };
        if !(longitude > -180.0 && longitude <= 180.0) {
            return Err(invalid("longitude outside (-180, 180]"));
        }

        Ok(ObservatorySite {
            latitude: not_nan(latitude, "latitude is not finite")?,
            longitude: not_nan(longitude, "longitude is not finite")?,
            altitude: not_nan(altitude, "altitude is not finite")?,
            utc_offset: not_nan(utc_offset, "UTC offset is not finite")?,
            name,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn latitude(&self) -> Degree {
        self.latitude.into_inner()
    }

    pub fn longitude(&self) -> Degree {
        self.longitude.into_inner()
    }

    pub fn altitude(&self) -> Meter {
        self.altitude.into_inner()
    }

    pub fn utc_offset(&self) -> f64 {
        self.utc_offset.into_inner()
    }
}
