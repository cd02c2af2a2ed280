use std::fmt;

use crate::constants::{Degree, Hours, Radian, DEG_PER_HOUR};

/// Right ascension split into hours, minutes and seconds.
///
/// Produced by [`ra_hms`]; seconds are already rounded with carry so that
/// rendering never shows `60.00`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hms {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: f64,
}

/// Declination split into sign, degrees, minutes and seconds.
///
/// The sign is carried separately so that `-0° 30'` keeps its sign.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dms {
    pub negative: bool,
    pub degrees: u32,
    pub minutes: u32,
    pub seconds: f64,
}

/// Fold a right ascension in radians into decimal hours in `[0, 24)`.
///
/// Arguments
/// ---------
/// * `ra`: right ascension in radians, any range
///
/// Return
/// ------
/// * the right ascension in hours
pub fn ra_rad_to_hours(ra: Radian) -> Hours {
    let mut deg = ra.to_degrees() % 360.0;
    if deg < 0.0 {
        deg += 360.0;
    }
    deg / DEG_PER_HOUR
}

/// Split a positive sexagesimal quantity into (units, minutes, seconds) with
/// the seconds rounded to `prec` decimals and carried upward.
fn split_with_carry(value: f64, prec: usize) -> (u32, u32, f64) {
    let scale = 10f64.powi(prec as i32);
    // Work in integer multiples of the last printed digit so carry is exact.
    let total_ticks = (value * 3600.0 * scale).round() as u64;
    let ticks_per_minute = (60.0 * scale) as u64;
    let ticks_per_unit = ticks_per_minute * 60;

    let units = total_ticks / ticks_per_unit;
    let rem = total_ticks % ticks_per_unit;
    let minutes = rem / ticks_per_minute;
    let seconds = (rem % ticks_per_minute) as f64 / scale;
    (units as u32, minutes as u32, seconds)
}

/// Convert a right ascension in radians to hours/minutes/seconds.
///
/// Seconds are rounded to two decimals with carry; a value rounding to `24h`
/// wraps back to `0h`.
///
/// Arguments
/// ---------
/// * `ra`: right ascension in radians
///
/// Return
/// ------
/// * the sexagesimal decomposition as [`Hms`]
pub fn ra_hms(ra: Radian) -> Hms {
    let (hours, minutes, seconds) = split_with_carry(ra_rad_to_hours(ra), 2);
    Hms {
        hours: hours % 24,
        minutes,
        seconds,
    }
}

/// Convert a declination in radians to sign/degrees/minutes/seconds.
///
/// Arguments
/// ---------
/// * `dec`: declination in radians
///
/// Return
/// ------
/// * the sign-preserving sexagesimal decomposition as [`Dms`]
pub fn dec_dms(dec: Radian) -> Dms {
    let deg = dec.to_degrees();
    let (degrees, minutes, seconds) = split_with_carry(deg.abs(), 2);
    Dms {
        negative: deg < 0.0 && (degrees, minutes, seconds) != (0, 0, 0.0),
        degrees,
        minutes,
        seconds,
    }
}

impl fmt::Display for Hms {
    /// Renders `HH:MM:SS.ss`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:05.2}",
            self.hours, self.minutes, self.seconds
        )
    }
}

impl fmt::Display for Dms {
    /// Renders `±DD:MM:SS.ss`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.negative { '-' } else { '+' };
        write!(
            f,
            "{sign}{:02}:{:02}:{:05.2}",
            self.degrees, self.minutes, self.seconds
        )
    }
}

/// Collapse a `[deg, min, sec]` component list into decimal degrees.
///
/// Each component contributes `|c_i| / 60^i`. Signs are independent in the
/// source tables, so the result is negated when **any** component is negative.
///
/// Arguments
/// ---------
/// * `components`: one to three sexagesimal components
///
/// Return
/// ------
/// * `Some(degrees)`, or `None` when the list is empty, longer than three, or holds a non-finite value
pub fn sexagesimal_to_deg(components: &[f64]) -> Option<Degree> {
    if components.is_empty() || components.len() > 3 {
        return None;
    }
    if components.iter().any(|c| !c.is_finite()) {
        return None;
    }

    let negative = components.iter().any(|c| *c < 0.0);
    let magnitude: f64 = components
        .iter()
        .enumerate()
        .map(|(i, c)| c.abs() / 60f64.powi(i as i32))
        .sum();

    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod conversion_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sexagesimal_to_deg() {
        assert_relative_eq!(sexagesimal_to_deg(&[70.0, 43.8]).unwrap(), 70.73, epsilon = 1e-12);
        assert_relative_eq!(
            sexagesimal_to_deg(&[-29.0, 15.4]).unwrap(),
            -29.256666666666668,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            sexagesimal_to_deg(&[210.0, 58.0, 32.4]).unwrap(),
            210.97566666666666,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            sexagesimal_to_deg(&[-35.0, 19.0, 14.34]).unwrap(),
            -35.32065,
            epsilon = 1e-12
        );
        // a sign on any component flips the whole angle
        assert_relative_eq!(sexagesimal_to_deg(&[0.0, -30.0]).unwrap(), -0.5, epsilon = 1e-12);
        assert_eq!(sexagesimal_to_deg(&[]), None);
        assert_eq!(sexagesimal_to_deg(&[1.0, 2.0, 3.0, 4.0]), None);
        assert_eq!(sexagesimal_to_deg(&[1.0, f64::NAN]), None);
    }

    #[test]
    fn test_ra_hms() {
        let ra = (343.097375f64).to_radians();
        let hms = ra_hms(ra);
        assert_eq!(hms.hours, 22);
        assert_eq!(hms.minutes, 52);
        assert_relative_eq!(hms.seconds, 23.37, epsilon = 1e-9);
        assert_eq!(hms.to_string(), "22:52:23.37");

        // negative RA folds into [0, 24h)
        assert_eq!(ra_hms(-(15f64).to_radians()).to_string(), "23:00:00.00");
    }

    #[test]
    fn test_ra_hms_carry() {
        // 23h59m59.999s rounds up to 24h and wraps to 0h
        let hours = 23.0 + 59.0 / 60.0 + 59.999 / 3600.0;
        let ra = (hours * 15.0f64).to_radians();
        assert_eq!(ra_hms(ra).to_string(), "00:00:00.00");

        let hours = 5.0 + 59.0 / 60.0 + 59.996 / 3600.0;
        let ra = (hours * 15.0f64).to_radians();
        assert_eq!(ra_hms(ra).to_string(), "06:00:00.00");
    }

    #[test]
    fn test_dec_dms() {
        let dec = (-14.784833333333333f64).to_radians();
        assert_eq!(dec_dms(dec).to_string(), "-14:47:05.40");

        let dec = (13.928527777777777f64).to_radians();
        assert_eq!(dec_dms(dec).to_string(), "+13:55:42.70");

        // the sign survives a zero-degree declination
        let dec = (-0.5039444444444444f64).to_radians();
        let dms = dec_dms(dec);
        assert!(dms.negative);
        assert_eq!(dms.degrees, 0);
        assert_eq!(dms.to_string(), "-00:30:14.20");

        // a value that rounds to zero is rendered positive
        assert_eq!(dec_dms(-1e-12).to_string(), "+00:00:00.00");
    }

    #[test]
    fn test_ra_rad_to_hours() {
        assert_relative_eq!(ra_rad_to_hours(std::f64::consts::PI), 12.0, epsilon = 1e-12);
        assert_relative_eq!(ra_rad_to_hours(-std::f64::consts::FRAC_PI_2), 18.0, epsilon = 1e-12);
    }
}
