//! # Analytic sky geometry
//!
//! Closed-form routines shared by every [`Ephemeris`](super::Ephemeris) backend:
//!
//! * [`sun_ra_dec`] – low-precision apparent Sun (Astronomical Almanac, ~0.01° over 1950–2050).
//! * [`sun_zenith`] – Sun zenith angle at a site from its local hour angle.
//! * [`radec_of`] – topocentric RA/DEC of an azimuth/elevation direction.
//! * [`observer_ecef`], [`geodetic_from_ecef`], [`look_from_ecef`] – WGS-84 geometry
//!   of the site and of the subsatellite point.
//! * [`teme_to_ecef`] – Earth rotation by GMST (polar motion and equation of the equinoxes
//!   neglected).
//!
//! Refraction is not applied anywhere: elevations and declinations are geometric.
//!
//! Conventions
//! -----------------
//! * Azimuth is measured from north through east.
//! * Longitudes are east positive.
//! * Cartesian vectors are in kilometers.
use hifitime::Epoch;
use nalgebra::{Matrix3, Rotation3, Vector3};

use crate::constants::{
    Degree, Kilometer, Radian, DPI, EARTH_E2, EARTH_EQUATORIAL_RADIUS_KM,
};
use crate::observers::ObservatorySite;
use crate::time::gmst_of;

use super::{Footprint, LookAngles};

/// Julian date of J2000.0
const J2000_JD: f64 = 2451545.0;

fn fold_two_pi(angle: Radian) -> Radian {
    let a = angle % DPI;
    if a < 0.0 {
        a + DPI
    } else {
        a
    }
}

fn fold_degrees(angle: Degree) -> Degree {
    let a = angle % 360.0;
    if a < 0.0 {
        a + 360.0
    } else {
        a
    }
}

/// Rotation of a vector by `angle` around the z axis.
fn rot_z(angle: Radian) -> Matrix3<f64> {
    Rotation3::from_axis_angle(&Vector3::z_axis(), angle).into()
}

/// Apparent geocentric right ascension and declination of the Sun (radians).
///
/// ```text
/// n = JD − 2451545.0
/// L = 280.460° + 0.9856474° n        (mean longitude)
/// g = 357.528° + 0.9856003° n        (mean anomaly)
/// λ = L + 1.915° sin g + 0.020° sin 2g
/// ε = 23.439° − 0.0000004° n
/// α = atan2(cos ε sin λ, cos λ),  δ = asin(sin ε sin λ)
/// ```
///
/// The right ascension is folded into `[0, 2π)`.
pub fn sun_ra_dec(t: &Epoch) -> (Radian, Radian) {
    let n = t.to_jde_utc_days() - J2000_JD;
    let mean_longitude = fold_degrees(280.460 + 0.985_647_4 * n);
    let mean_anomaly = fold_degrees(357.528 + 0.985_600_3 * n).to_radians();

    let ecliptic_longitude = (mean_longitude
        + 1.915 * mean_anomaly.sin()
        + 0.020 * (2.0 * mean_anomaly).sin())
    .to_radians();
    let obliquity = (23.439 - 0.000_000_4 * n).to_radians();

    let (sin_l, cos_l) = ecliptic_longitude.sin_cos();
    let ra = (obliquity.cos() * sin_l).atan2(cos_l);
    let dec = (obliquity.sin() * sin_l).asin();
    (fold_two_pi(ra), dec)
}

/// Local mean sidereal time of a site (radians, `[0, 2π)`).
pub fn local_sidereal_time(t: &Epoch, site: &ObservatorySite) -> Radian {
    fold_two_pi(gmst_of(t) + site.longitude().to_radians())
}

/// Zenith angle (degrees) of the equatorial direction `(ra, dec)` seen from `site`.
pub fn zenith_angle(t: &Epoch, site: &ObservatorySite, ra: Radian, dec: Radian) -> Degree {
    let hour_angle = local_sidereal_time(t, site) - ra;
    let lat = site.latitude().to_radians();
    let cos_z = lat.sin() * dec.sin() + lat.cos() * dec.cos() * hour_angle.cos();
    cos_z.clamp(-1.0, 1.0).acos().to_degrees()
}

/// Zenith angle of the Sun at `site` (degrees). Civil twilight ends at 96°,
/// astronomical twilight at 108°.
pub fn sun_zenith(t: &Epoch, site: &ObservatorySite) -> Degree {
    let (ra, dec) = sun_ra_dec(t);
    zenith_angle(t, site, ra, dec)
}

/// Topocentric right ascension and declination (radians) of the direction
/// `(azimuth, elevation)` seen from `site` at `t`.
///
/// ```text
/// sin δ = sin φ sin h + cos φ cos h cos A
/// H     = atan2(−sin A cos h, cos φ sin h − sin φ cos h cos A)
/// α     = LST − H
/// ```
pub fn radec_of(
    t: &Epoch,
    site: &ObservatorySite,
    azimuth: Degree,
    elevation: Degree,
) -> (Radian, Radian) {
    let lat = site.latitude().to_radians();
    let (sin_az, cos_az) = azimuth.to_radians().sin_cos();
    let (sin_el, cos_el) = elevation.to_radians().sin_cos();
    let (sin_lat, cos_lat) = lat.sin_cos();

    let dec = (sin_lat * sin_el + cos_lat * cos_el * cos_az)
        .clamp(-1.0, 1.0)
        .asin();
    let hour_angle = (-sin_az * cos_el).atan2(cos_lat * sin_el - sin_lat * cos_el * cos_az);

    (fold_two_pi(local_sidereal_time(t, site) - hour_angle), dec)
}

/// Earth-fixed position of a site on the WGS-84 ellipsoid (km).
pub fn observer_ecef(site: &ObservatorySite) -> Vector3<Kilometer> {
    let lat = site.latitude().to_radians();
    let lon = site.longitude().to_radians();
    let alt = site.altitude() / 1000.0;

    let (sin_lat, cos_lat) = lat.sin_cos();
    let n = EARTH_EQUATORIAL_RADIUS_KM / (1.0 - EARTH_E2 * sin_lat * sin_lat).sqrt();

    Vector3::new(
        (n + alt) * cos_lat * lon.cos(),
        (n + alt) * cos_lat * lon.sin(),
        (n * (1.0 - EARTH_E2) + alt) * sin_lat,
    )
}

/// Rotate a TEME position into the Earth-fixed frame at `t`.
pub fn teme_to_ecef(t: &Epoch, r_teme: &Vector3<Kilometer>) -> Vector3<Kilometer> {
    rot_z(-gmst_of(t)) * r_teme
}

/// Geodetic longitude, latitude and height of an Earth-fixed position.
///
/// Fixed-point iteration on the latitude; converges to below a micro-degree in a
/// handful of steps for any point above the ellipsoid.
pub fn geodetic_from_ecef(r: &Vector3<Kilometer>) -> Footprint {
    let p = r.x.hypot(r.y);
    let longitude = r.y.atan2(r.x).to_degrees();

    let mut lat = r.z.atan2(p * (1.0 - EARTH_E2));
    let mut n = EARTH_EQUATORIAL_RADIUS_KM;
    for _ in 0..10 {
        let sin_lat = lat.sin();
        n = EARTH_EQUATORIAL_RADIUS_KM / (1.0 - EARTH_E2 * sin_lat * sin_lat).sqrt();
        let next = (r.z + EARTH_E2 * n * sin_lat).atan2(p);
        if (next - lat).abs() < 1e-12 {
            lat = next;
            break;
        }
        lat = next;
    }

    let altitude = if lat.cos().abs() > 1e-10 {
        p / lat.cos() - n
    } else {
        r.z.abs() - n * (1.0 - EARTH_E2)
    };

    Footprint {
        longitude: if longitude == -180.0 { 180.0 } else { longitude },
        latitude: lat.to_degrees(),
        altitude,
    }
}

/// Azimuth and elevation of an Earth-fixed position seen from `site`.
pub fn look_from_ecef(site: &ObservatorySite, r: &Vector3<Kilometer>) -> LookAngles {
    let range = r - observer_ecef(site);

    let (sin_lat, cos_lat) = site.latitude().to_radians().sin_cos();
    let (sin_lon, cos_lon) = site.longitude().to_radians().sin_cos();

    // ECEF -> local east/north/up
    let enu = Matrix3::new(
        -sin_lon,
        cos_lon,
        0.0,
        -sin_lat * cos_lon,
        -sin_lat * sin_lon,
        cos_lat,
        cos_lat * cos_lon,
        cos_lat * sin_lon,
        sin_lat,
    ) * range;

    let norm = enu.norm();
    let elevation = if norm > 0.0 {
        (enu.z / norm).clamp(-1.0, 1.0).asin().to_degrees()
    } else {
        90.0
    };

    LookAngles {
        azimuth: fold_degrees(enu.x.atan2(enu.y).to_degrees()),
        elevation,
    }
}
