//! # Civil time, UTC instants and sidereal time
//!
//! All instants handled by the crate are [`hifitime::Epoch`] values. This module converts
//! between **local civil timestamps** of an observatory and UTC instants, renders the
//! date/time columns of the output tables, and computes the **Greenwich Mean Sidereal
//! Time** used by the sky transforms.
//!
//! ## Conventions
//!
//! - A site UTC offset is the number of hours **added** to local civil time to obtain
//!   UTC (positive west of Greenwich), e.g. `+4` for Chile in winter.
//! - UT1 is approximated by UTC (|UT1 − UTC| < 0.9 s), well below the sampling interval.
use hifitime::{Epoch, Unit};
use serde::Deserialize;

use crate::constants::{DPI, SIDEREAL_RATE, T2000};
use crate::satplan_errors::SatPlanError;

/// A local civil timestamp (no time zone attached).
///
/// Used by the custom observation window and by the configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CivilTime {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    #[serde(default)]
    pub hour: u8,
    #[serde(default)]
    pub minute: u8,
    #[serde(default)]
    pub second: u8,
}

impl CivilTime {
    pub fn new(year: i32, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        CivilTime {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// Convert this local timestamp to a UTC instant.
    ///
    /// Arguments
    /// -----------------
    /// * `utc_offset_hours`: hours added to local time to obtain UTC.
    ///
    /// Return
    /// ----------
    /// * The UTC [`Epoch`], or [`SatPlanError::InvalidCivilTime`] if the calendar
    ///   fields do not describe a valid date.
    pub fn to_utc(&self, utc_offset_hours: f64) -> Result<Epoch, SatPlanError> {
        let local = Epoch::maybe_from_gregorian_utc(
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second,
            0,
        )
        .map_err(|e| SatPlanError::InvalidCivilTime(format!("{self}: {e}")))?;

        Ok(local + Unit::Hour * utc_offset_hours)
    }
}

impl std::fmt::Display for CivilTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// Render the UTC calendar date of an epoch as `YYYY-MM-DD`.
pub fn fmt_date(epoch: &Epoch) -> String {
    let (y, m, d, _, _, _, _) = epoch.to_gregorian_utc();
    format!("{y:04}-{m:02}-{d:02}")
}

/// Render the UTC time of day of an epoch as `HH:MM:SSs` (trailing literal `s`).
///
/// Sub-second digits are truncated.
pub fn fmt_time(epoch: &Epoch) -> String {
    let (_, _, _, h, mi, s, _) = epoch.to_gregorian_utc();
    format!("{h:02}:{mi:02}:{s:02}s")
}

/// Convert a UTC epoch to a naive `chrono` datetime (for propagators speaking `chrono`).
///
/// Return
/// ----------
/// * `None` when the instant falls on a leap second or outside chrono's range.
pub fn epoch_to_naive_utc(epoch: &Epoch) -> Option<chrono::NaiveDateTime> {
    let (y, m, d, h, mi, s, ns) = epoch.to_gregorian_utc();
    chrono::NaiveDate::from_ymd_opt(y, m as u32, d as u32)?.and_hms_nano_opt(
        h as u32,
        mi as u32,
        s as u32,
        ns,
    )
}

/// Compute the Greenwich Mean Sidereal Time (GMST) in radians
/// for a given Modified Julian Date (UT1 time scale).
///
/// This function implements the IAU 1982/2000 polynomial formula
/// for the mean sidereal time at 0h UT1, plus the fractional-day
/// correction term due to Earth's rotation rate.
///
/// # Arguments
/// * `tjm` - Modified Julian Date (MJD, UT1 time scale)
///
/// # Returns
/// * GMST angle in radians, normalized to the interval [0, 2π).
pub fn gmst(tjm: f64) -> f64 {
    // Polynomial coefficients for GMST at 0h UT1 (in seconds)
    const C0: f64 = 24110.54841;
    const C1: f64 = 8640184.812866;
    const C2: f64 = 9.3104e-2;
    const C3: f64 = -6.2e-6;

    let itjm = tjm.floor();
    let t = (itjm - T2000) / 36525.0;

    let mut gmst0 = ((C3 * t + C2) * t + C1) * t + C0;
    gmst0 *= DPI / 86400.0;

    let h = tjm.fract() * DPI;
    let gmst = gmst0 + h * SIDEREAL_RATE;
    gmst - (gmst / DPI).floor() * DPI
}

/// GMST (radians) of a UTC epoch, with UT1 ≈ UTC.
pub fn gmst_of(epoch: &Epoch) -> f64 {
    gmst(epoch.to_mjd_utc_days())
}
