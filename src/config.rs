//! # Run configuration
//!
//! A run is described by a TOML file with one table per concern:
//!
//! ```toml
//! [site]
//! observatory = "lasilla"          # built-in key, or an inline site:
//! # name = "La Silla"
//! # longitude = [70, 43.8]        # west positive, decimal or [d, m, s]
//! # latitude = [-29, 15.4]
//! # altitude = 2347.0
//! # utc_offset = 4.0
//!
//! [constraints]                   # defaults: 30 / 97 / 114
//! min_elevation = 30.0
//! sun_zenith_lower = 97.0
//! sun_zenith_upper = 114.0
//!
//! [window]
//! kind = "fixed"                  # or "custom" with `start` / `finish` tables
//! date = [2021, 11, 25]
//! slot = "evening"
//! interval = 60.0                 # seconds, default 60
//!
//! [catalog]
//! tle = "tle_oneweb.txt"
//! brand = "oneweb"                # optional, or an explicit `objects = [...]` list
//!
//! [output]
//! directory = "oneweb_2021_11_25"
//!
//! [run]
//! workers = 8                     # optional, defaults to the number of CPUs
//! ```
//!
//! Relative paths are taken from the directory of the configuration file.
//! [`PlanConfig::resolve`] performs every configuration check before any computation.
use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use itertools::Itertools;
use log::info;
use serde::Deserialize;

use crate::constants::{ObjectId, Seconds, DEFAULT_SAMPLING_INTERVAL};
use crate::observers::observatories;
use crate::observers::{ObservatorySite, RawSite};
use crate::planner::ObservationPlanner;
use crate::report::writer::{OutputNames, ReportWriter};
use crate::satplan_errors::SatPlanError;
use crate::time::CivilTime;
use crate::tle::TleCatalog;
use crate::visibility::predicate::ObservationConstraints;
use crate::window::{ObservationWindow, TimeWindowPolicy};

fn default_interval() -> Seconds {
    DEFAULT_SAMPLING_INTERVAL
}

/// `[site]`: a built-in observatory or an inline raw description.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SiteConfig {
    Observatory { observatory: String },
    Inline(RawSite),
}

impl SiteConfig {
    pub fn resolve(&self) -> Result<ObservatorySite, SatPlanError> {
        match self {
            SiteConfig::Observatory { observatory } => observatories::lookup(observatory),
            SiteConfig::Inline(raw) => raw.normalize(),
        }
    }
}

/// `[window]`, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum WindowConfig {
    Fixed {
        date: (i32, u8, u8),
        slot: String,
        #[serde(default = "default_interval")]
        interval: Seconds,
    },
    Custom {
        start: CivilTime,
        finish: CivilTime,
        #[serde(default = "default_interval")]
        interval: Seconds,
    },
}

impl From<&WindowConfig> for TimeWindowPolicy {
    fn from(config: &WindowConfig) -> Self {
        match config {
            WindowConfig::Fixed {
                date: (year, month, day),
                slot,
                interval,
            } => TimeWindowPolicy::Fixed {
                year: *year,
                month: *month,
                day: *day,
                slot: slot.clone(),
                interval: *interval,
            },
            WindowConfig::Custom {
                start,
                finish,
                interval,
            } => TimeWindowPolicy::Custom {
                start: *start,
                finish: *finish,
                interval: *interval,
            },
        }
    }
}

/// `[catalog]`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogConfig {
    pub tle: Utf8PathBuf,
    #[serde(default)]
    pub objects: Vec<ObjectId>,
    pub brand: Option<String>,
}

/// `[output]`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    pub directory: Utf8PathBuf,
    #[serde(default = "default_detailed")]
    pub detailed: String,
    #[serde(default = "default_simple")]
    pub simple: String,
    #[serde(default = "default_failed")]
    pub failed: String,
}

fn default_detailed() -> String {
    OutputNames::default().detailed
}

fn default_simple() -> String {
    OutputNames::default().simple
}

fn default_failed() -> String {
    OutputNames::default().failed
}

/// `[run]`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    pub workers: Option<usize>,
}

/// Parsed configuration file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanConfig {
    pub site: SiteConfig,
    #[serde(default)]
    pub constraints: ObservationConstraints,
    pub window: WindowConfig,
    pub catalog: CatalogConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub run: RunConfig,
    /// Directory relative paths are resolved against.
    #[serde(skip)]
    base_dir: Option<Utf8PathBuf>,
}

/// Everything needed to start the computation, validated.
#[derive(Debug, Clone)]
pub struct ResolvedPlan {
    pub site: ObservatorySite,
    pub constraints: ObservationConstraints,
    pub window: ObservationWindow,
    pub workers: Option<usize>,
}

impl ResolvedPlan {
    pub fn planner(&self) -> ObservationPlanner {
        ObservationPlanner::new(self.site.clone(), self.constraints, self.window)
            .with_workers(self.workers)
    }
}

impl PlanConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, SatPlanError> {
        Ok(toml::from_str(text)?)
    }

    /// Read a configuration file; relative paths inside are resolved from its directory.
    pub fn from_path(path: &Utf8Path) -> Result<Self, SatPlanError> {
        let text = fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&text)?;
        config.base_dir = path.parent().map(Utf8Path::to_path_buf);
        Ok(config)
    }

    fn relative(&self, path: &Utf8Path) -> Utf8PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    pub fn tle_path(&self) -> Utf8PathBuf {
        self.relative(&self.catalog.tle)
    }

    pub fn output_directory(&self) -> Utf8PathBuf {
        self.relative(&self.output.directory)
    }

    /// Check the configuration and compute the site and the observation window.
    ///
    /// Return
    /// ----------
    /// * The [`ResolvedPlan`], or the first configuration fault found.
    pub fn resolve(&self) -> Result<ResolvedPlan, SatPlanError> {
        if self.run.workers == Some(0) {
            return Err(SatPlanError::InvalidConfig(
                "run.workers must be at least 1".into(),
            ));
        }

        let site = self.site.resolve()?;
        let window = TimeWindowPolicy::from(&self.window).resolve(&site)?;
        info!(
            "site {} (lat {:.4}, lon {:.4}, UTC offset {:+} h), window {} .. {}",
            site.name(),
            site.latitude(),
            site.longitude(),
            site.utc_offset(),
            window.start(),
            window.end()
        );

        Ok(ResolvedPlan {
            site,
            constraints: self.constraints,
            window,
            workers: self.run.workers,
        })
    }

    pub fn load_catalog(&self) -> Result<TleCatalog, SatPlanError> {
        TleCatalog::from_path(&self.tle_path())
    }

    /// Objects to compute: the explicit list when given, else the brand members, else the
    /// whole catalog. Duplicates are dropped, first occurrence kept.
    pub fn objects(&self, catalog: &TleCatalog) -> Result<Vec<ObjectId>, SatPlanError> {
        let objects: Vec<ObjectId> = if !self.catalog.objects.is_empty() {
            self.catalog.objects.clone()
        } else if let Some(brand) = &self.catalog.brand {
            catalog.names_for_brand(brand)?
        } else {
            catalog.names().map(str::to_string).collect()
        };
        Ok(objects.into_iter().unique().collect())
    }

    pub fn writer(&self) -> ReportWriter {
        ReportWriter::new(self.output_directory()).with_names(OutputNames {
            detailed: self.output.detailed.clone(),
            simple: self.output.simple.clone(),
            failed: self.output.failed.clone(),
        })
    }
}
