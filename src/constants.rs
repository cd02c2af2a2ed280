//! # Constants and type definitions for satplan
//!
//! This module centralizes the **physical constants**, **conversion factors**, and **common type
//! aliases** used throughout the `satplan` library.
//!
//! ## Overview
//!
//! - Geodetic constants of the WGS-84 ellipsoid (observer and footprint geometry)
//! - Unit conversions (degrees ↔ radians, degrees ↔ arcseconds, hours ↔ degrees)
//! - Core type aliases used across the crate
//! - Defaults of the observing constraints and of the run configuration
//!
//! These definitions are used by all main modules: observers, ephemeris backends,
//! the visibility engine, and the report stage.

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// MJD epoch of J2000.0 (2000-01-01 12:00:00 TT)
pub const T2000: f64 = 51544.5;

/// Arcseconds in one degree
pub const ARCSEC_PER_DEG: f64 = 3600.0;

/// Degrees of right ascension per hour
pub const DEG_PER_HOUR: f64 = 15.0;

/// Earth equatorial radius in kilometers (WGS-84)
pub const EARTH_EQUATORIAL_RADIUS_KM: f64 = 6378.137;

/// Earth flattening (WGS-84)
pub const EARTH_FLATTENING: f64 = 1.0 / 298.257_223_563;

/// First eccentricity squared of the WGS-84 ellipsoid
pub const EARTH_E2: f64 = EARTH_FLATTENING * (2.0 - EARTH_FLATTENING);

/// Ratio of sidereal day to solar day
pub const SIDEREAL_RATE: f64 = 1.00273790934;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Right ascension in decimal hours
pub type Hours = f64;
/// Distance in kilometers
pub type Kilometer = f64;
/// Distance in meters
pub type Meter = f64;
/// Time span in seconds
pub type Seconds = f64;
/// Apparent angular speed in arcseconds per second
pub type ArcSecPerSec = f64;

/// Identifier of an orbiting object (TLE name or catalog number)
pub type ObjectId = String;

// -------------------------------------------------------------------------------------------------
// Defaults
// -------------------------------------------------------------------------------------------------

/// Default lowest satellite elevation considered observable (degrees)
pub const DEFAULT_MIN_ELEVATION: Degree = 30.0;

/// Default lower bound on the Sun zenith angle (degrees), start of the twilight band
pub const DEFAULT_SUN_ZENITH_LOWER: Degree = 97.0;

/// Default upper bound on the Sun zenith angle (degrees), end of the twilight band
pub const DEFAULT_SUN_ZENITH_UPPER: Degree = 114.0;

/// Default sampling interval of the observation window (seconds)
pub const DEFAULT_SAMPLING_INTERVAL: Seconds = 60.0;

/// Length of a fixed "morning"/"evening" observing slot (hours)
pub const FIXED_SLOT_HOURS: f64 = 12.0;

/// Seed of the pseudo-random draw that picks one row per object in the simple table
pub const SIMPLE_TABLE_SEED: u64 = 0;
