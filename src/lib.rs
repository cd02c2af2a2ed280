//! # satplan
//!
//! Visibility planning for Earth-orbiting satellites seen from a ground observatory.
//!
//! For every object of a TLE catalog, the orbit is propagated with SGP4 over an
//! observation window sampled at a fixed interval. A sample is kept when the satellite is
//! high enough above the horizon while the Sun sits inside a twilight band, so that the
//! satellite is lit against a dark sky. Kept samples are merged into a detailed table, a
//! one-row-per-object table and a list of objects that could not be computed.
//!
//! ```rust,ignore
//! use camino::Utf8Path;
//! use satplan::config::PlanConfig;
//!
//! let config = PlanConfig::from_path(Utf8Path::new("plan.toml"))?;
//! let plan = config.resolve()?;
//! let catalog = config.load_catalog()?;
//! let objects = config.objects(&catalog)?;
//! let report = plan.planner().plan(&catalog, &objects)?;
//! config.writer().write(&report)?;
//! ```
pub mod config;
pub mod constants;
pub mod conversion;
pub mod ephemeris;
pub mod observers;
pub mod planner;
pub mod report;
pub mod satplan_errors;
pub mod time;
pub mod tle;
pub mod visibility;
pub mod window;

pub use planner::ObservationPlanner;
pub use report::{ObservationReport, ResultAggregator};
pub use satplan_errors::{PropagationError, SatPlanError};
pub use tle::TleCatalog;
pub use visibility::predicate::ObservationConstraints;
pub use window::{ObservationWindow, TimeWindowPolicy};
